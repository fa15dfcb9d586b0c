//! Port-mapping codec for `[host-ip:][host-port:]container-port[/udp]` strings.

use crate::error::CodecError;
use crate::ir::{PortMapping, Protocol};

/// Decode a colon-delimited port string.
///
/// | Parts | Meaning |
/// |-------|---------|
/// | 1 | container port |
/// | 2 | host port : container port |
/// | 3 | host IP : host port : container port |
///
/// A trailing `/udp` (exact case) selects UDP; a trailing `/tcp` is accepted
/// and ignored.
///
/// # Errors
/// Returns [`CodecError::SegmentCount`] for anything but 1-3 parts and
/// [`CodecError::InvalidNumber`] for a port that is not an integer in
/// `0..=65535`.
pub fn decode(text: &str) -> Result<PortMapping, CodecError> {
    let (spec, protocol) = if let Some(rest) = text.strip_suffix("/udp") {
        (rest, Protocol::Udp)
    } else {
        (text.strip_suffix("/tcp").unwrap_or(text), Protocol::Tcp)
    };

    let parts: Vec<&str> = spec.split(':').collect();
    let (host_ip, host_port, container_port) = match parts.as_slice() {
        [container] => (None, 0, parse_port(container)?),
        [host, container] => (None, parse_port(host)?, parse_port(container)?),
        [ip, host, container] => (
            Some((*ip).to_string()),
            parse_port(host)?,
            parse_port(container)?,
        ),
        _ => {
            return Err(CodecError::SegmentCount {
                value: text.to_string(),
                found: parts.len(),
                expected: "1 to 3",
            });
        }
    };

    Ok(PortMapping {
        host_ip: host_ip.filter(|ip| !ip.is_empty()),
        host_port,
        container_port,
        protocol,
        name: None,
    })
}

/// Encode a port mapping, or `None` when both ports are unset.
///
/// The host IP is written only alongside a host port.
#[must_use]
pub fn encode(mapping: &PortMapping) -> Option<String> {
    let mut parts: Vec<String> = Vec::with_capacity(3);
    if mapping.host_port > 0 {
        parts.push(mapping.host_ip.clone().unwrap_or_default());
        parts.push(mapping.host_port.to_string());
    }
    if mapping.container_port > 0 {
        parts.push(mapping.container_port.to_string());
    }

    let joined = parts.join(":");
    let encoded = joined.trim_matches(':');
    if encoded.is_empty() {
        return None;
    }

    if mapping.protocol == Protocol::Udp {
        Some(format!("{encoded}/udp"))
    } else {
        Some(encoded.to_string())
    }
}

fn parse_port(text: &str) -> Result<u16, CodecError> {
    text.parse().map_err(|_| CodecError::InvalidNumber {
        value: text.to_string(),
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn canonical_strings_round_trip(
            host in 1u16..,
            container in 1u16..,
            udp in any::<bool>(),
        ) {
            let text = format!("{host}:{container}{}", if udp { "/udp" } else { "" });
            let decoded = decode(&text).unwrap();
            prop_assert_eq!(encode(&decoded), Some(text));
        }

        #[test]
        fn decode_never_panics(text in ".{0,24}") {
            let _ = decode(&text);
        }
    }
}
