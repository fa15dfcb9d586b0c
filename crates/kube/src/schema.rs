//! Kubernetes Pod Schema Types
//!
//! The subset of the core/v1 `Pod` object that maps onto the IR. Unknown keys
//! are ignored so full manifests decode.
//! See: <https://kubernetes.io/docs/reference/kubernetes-api/workload-resources/pod-v1/>

use podshift_convert::codec::Scalar;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A pod manifest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pod {
    /// API version, normally `v1`
    #[serde(default)]
    pub api_version: Option<String>,

    /// Object kind; only `Pod` is accepted
    #[serde(default)]
    pub kind: Option<String>,

    /// Object metadata
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// Pod spec
    #[serde(default)]
    pub spec: PodSpec,
}

/// Object metadata
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectMeta {
    /// Pod name
    #[serde(default)]
    pub name: Option<String>,

    /// Pod labels
    #[serde(default)]
    pub labels: BTreeMap<String, Scalar>,
}

/// Pod spec
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    /// Containers in the pod
    #[serde(default)]
    pub containers: Vec<KubeContainer>,

    /// Volumes mounts may reference by name
    #[serde(default)]
    pub volumes: Vec<PodVolume>,

    /// Hostname given to every container
    #[serde(default)]
    pub hostname: Option<String>,

    /// Share the host network namespace
    #[serde(default)]
    pub host_network: bool,

    /// Share the host PID namespace
    #[serde(default, rename = "hostPID")]
    pub host_pid: bool,
}

/// A container in the pod
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KubeContainer {
    /// Container name
    pub name: String,

    /// Image reference
    #[serde(default)]
    pub image: Option<String>,

    /// Entrypoint array
    #[serde(default)]
    pub command: Vec<String>,

    /// Arguments to the entrypoint
    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory
    #[serde(default)]
    pub working_dir: Option<String>,

    /// Environment variables
    #[serde(default)]
    pub env: Vec<EnvVar>,

    /// Declared ports
    #[serde(default)]
    pub ports: Vec<ContainerPort>,

    /// Volume mounts
    #[serde(default)]
    pub volume_mounts: Vec<VolumeMount>,

    /// Liveness probe
    #[serde(default)]
    pub liveness_probe: Option<ProbeSpec>,

    /// Security settings
    #[serde(default)]
    pub security_context: Option<SecurityContext>,

    /// `Always`, `IfNotPresent` or `Never`
    #[serde(default)]
    pub image_pull_policy: Option<String>,

    /// Resource limits
    #[serde(default)]
    pub resources: ResourceRequirements,
}

/// An environment variable. `valueFrom` sources are not resolved.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvVar {
    /// Variable name
    pub name: String,

    /// Literal value
    #[serde(default)]
    pub value: Scalar,
}

/// A declared container port
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    /// Name probes may refer to
    #[serde(default)]
    pub name: Option<String>,

    /// Host address to bind
    #[serde(default, rename = "hostIP")]
    pub host_ip: Option<String>,

    /// Host port
    #[serde(default)]
    pub host_port: Option<Scalar>,

    /// Container port
    #[serde(default)]
    pub container_port: Scalar,

    /// `TCP`, `UDP` or `SCTP`
    #[serde(default)]
    pub protocol: Option<String>,
}

/// A mount of a pod volume
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    /// Pod volume name
    pub name: String,

    /// Mount path in the container
    pub mount_path: String,

    /// Mount read-only
    #[serde(default)]
    pub read_only: bool,

    /// Path within the volume
    #[serde(default)]
    pub sub_path: Option<String>,
}

/// A pod volume. Only `hostPath` sources carry a host location.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodVolume {
    /// Name referenced by mounts
    pub name: String,

    /// Host directory source
    #[serde(default)]
    pub host_path: Option<HostPathSource>,
}

/// `hostPath` volume source
#[derive(Debug, Clone, Deserialize)]
pub struct HostPathSource {
    /// Directory on the host
    pub path: String,
}

/// Liveness probe
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeSpec {
    /// Run a command
    #[serde(default)]
    pub exec: Option<ExecAction>,

    /// Issue an HTTP GET
    #[serde(default)]
    pub http_get: Option<HttpGetAction>,

    /// Seconds between probes
    #[serde(default)]
    pub period_seconds: Option<Scalar>,

    /// Seconds before a probe fails
    #[serde(default)]
    pub timeout_seconds: Option<Scalar>,

    /// Failures before the container restarts
    #[serde(default)]
    pub failure_threshold: Option<Scalar>,
}

/// Command probe
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecAction {
    /// Command argv
    #[serde(default)]
    pub command: Vec<String>,
}

/// HTTP GET probe
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpGetAction {
    /// Request path
    #[serde(default)]
    pub path: Option<String>,

    /// Port number or the name of a declared container port
    #[serde(default)]
    pub port: Scalar,

    /// Target host, defaults to the pod IP
    #[serde(default)]
    pub host: Option<String>,

    /// `HTTP` or `HTTPS`
    #[serde(default)]
    pub scheme: Option<String>,

    /// Extra request headers
    #[serde(default)]
    pub http_headers: Vec<HttpHeader>,
}

/// Custom probe header
#[derive(Debug, Clone, Deserialize)]
pub struct HttpHeader {
    /// Header name
    pub name: String,

    /// Header value
    #[serde(default)]
    pub value: String,
}

/// Container security settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityContext {
    /// Run privileged
    #[serde(default)]
    pub privileged: Option<bool>,

    /// UID the process runs as
    #[serde(default)]
    pub run_as_user: Option<Scalar>,
}

/// Resource limits and requests, keyed by resource name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceRequirements {
    /// Hard limits
    #[serde(default)]
    pub limits: BTreeMap<String, Scalar>,

    /// Scheduling requests
    #[serde(default)]
    pub requests: BTreeMap<String, Scalar>,
}
