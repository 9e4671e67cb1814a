//! Remote conversion service client.
//!
//! The [`ConversionService`] trait is the boundary to a remote converter.
//! [`HttpConversionService`] posts a multipart form to `{url}/convert` with
//! the fields `file`, `format`, `quality` (0–1) and `maxWidth`, and reads the
//! converted bytes back along with their `Content-Type`.

mod error;
mod http;
mod traits;

pub use error::RemoteError;
pub use http::HttpConversionService;
pub use traits::{ConversionService, RemoteOutput};
