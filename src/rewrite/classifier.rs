/// What a single playlist line is, for rewriting purposes.
///
/// The set is closed on purpose: every line falls into exactly one kind,
/// and kinds the rewriter leaves alone are named rather than implied, so
/// the rewriting match stays exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `#EXT-X-STREAM-INF:` marks a master playlist; the following URI
    /// line names a variant manifest.
    StreamInf,
    /// `#EXT-X-KEY:` may carry a `URI="..."` attribute naming the key.
    Key,
    /// `#EXT-X-MAP:` carries a `URI="..."` attribute naming the
    /// initialization segment.
    Map,
    /// `#EXTINF:` is the duration marker for the following segment URI.
    SegmentInf,
    /// `#EXT-X-BYTERANGE:` is the range marker for the following segment URI.
    ByteRange,
    /// Non-tag, non-empty line: a URI to resolve and route through the proxy.
    Uri,
    /// Everything else: other tags, comments, blank lines.
    Opaque,
}

/// Classifier for M3U8 lines.
pub struct LineClassifier;

impl LineClassifier {
    /// Classify a line from an M3U8 playlist.
    pub fn classify(line: &str) -> LineKind {
        let line = line.trim();

        if line.is_empty() {
            return LineKind::Opaque;
        }

        if !line.starts_with('#') {
            return LineKind::Uri;
        }

        // Fast prefix matching for the tags the rewriter cares about
        if line.starts_with("#EXT-X-STREAM-INF:") {
            LineKind::StreamInf
        } else if line.starts_with("#EXT-X-KEY:") {
            LineKind::Key
        } else if line.starts_with("#EXT-X-MAP:") {
            LineKind::Map
        } else if line.starts_with("#EXTINF:") {
            LineKind::SegmentInf
        } else if line.starts_with("#EXT-X-BYTERANGE:") {
            LineKind::ByteRange
        } else {
            LineKind::Opaque
        }
    }
}
