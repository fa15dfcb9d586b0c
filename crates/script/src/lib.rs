//! Run-script emitter for podshift
//!
//! Renders a [`podshift_convert::PodGroup`] as a sequence of `docker run`
//! commands, one block per container. Emit only.
//!
//! ```text
//! ######## web ########
//! docker run \
//!     --env MODE=prod \
//!     --name web \
//!     --publish 8080:80 \
//!     nginx \
//!         nginx -g daemon off;
//! ```

pub mod emitter;

pub use emitter::ScriptEmitter;

/// Format name for lookups and error messages.
pub const FORMAT: &str = "script";
