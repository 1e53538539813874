pub mod config;
pub mod error;
pub mod proxy;
pub mod rewrite;
pub mod server;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Route prefix under which percent-encoded upstream URLs are served.
/// Every URL the rewriter hands back to a client points at `{PROXY_PREFIX}/{encoded}`.
pub const PROXY_PREFIX: &str = "/proxy";
