//! PixUp conversion server: the HTTP side of the remote conversion service.

pub mod api;
pub mod metrics;
pub mod state;
