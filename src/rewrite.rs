pub mod classifier;
pub mod context;
pub mod rewriter;

pub use classifier::{LineClassifier, LineKind};
pub use context::RewriteContext;
pub use rewriter::{is_hls_manifest, manifest_content_type, rewrite_manifest};
