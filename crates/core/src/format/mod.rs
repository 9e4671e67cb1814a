//! Format resolution.
//!
//! Normalizes user-supplied format tokens (short names or MIME strings) into
//! canonical [`ImageFormat`] identifiers, and decides which formats may be
//! routed to the remote conversion service.

mod resolver;
mod types;

pub use resolver::{resolve, resolve_extension, RemoteCapabilities};
pub use types::{ImageFormat, UnknownFormat};
