pub mod client;
pub mod headers;
pub mod target;

pub use client::{UpstreamClient, UpstreamResponse};
pub use target::resolve_target;
