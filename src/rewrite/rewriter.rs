use super::{
    classifier::{LineClassifier, LineKind},
    context::RewriteContext,
};

/// Content-Type values that mark a body as an HLS playlist.
const MANIFEST_MIME_TYPES: &[&str] = &[
    "application/vnd.apple.mpegurl",
    "application/x-mpegurl",
    "audio/mpegurl",
];

/// Decide whether an upstream response is an HLS manifest.
///
/// Either the Content-Type carries a playlist MIME type or the body opens
/// with the `#EXTM3U` magic (leading whitespace tolerated). Responses that
/// fail both checks pass through the proxy byte-for-byte.
pub fn is_hls_manifest(content_type: &str, body: &[u8]) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    if MANIFEST_MIME_TYPES.iter().any(|m| content_type.contains(m)) {
        return true;
    }

    // Only the head of the body matters for the magic check
    let head = String::from_utf8_lossy(&body[..body.len().min(64)]);
    head.trim_start().starts_with("#EXTM3U")
}

/// Content-Type to stamp on a rewritten manifest: the playlist MIME type
/// upstream used if it used one, the Apple default otherwise.
pub fn manifest_content_type(upstream_content_type: &str) -> &'static str {
    let ct = upstream_content_type.to_ascii_lowercase();
    MANIFEST_MIME_TYPES
        .iter()
        .find(|m| ct.contains(*m))
        .copied()
        .unwrap_or(MANIFEST_MIME_TYPES[0])
}

/// Rewrite every reference in a playlist to route back through the proxy.
///
/// `depth` counts how many rewrite hops this manifest chain has already
/// been through; at `max_depth` the input comes back untouched, so a
/// reference cycle can never recurse without bound. Sub-manifests are not
/// fetched here: their rewritten URLs point at the proxy, and each hop is
/// rewritten on its own request at the next depth.
///
/// Known gap: `URI="..."` attributes inside #EXT-X-MEDIA and
/// #EXT-X-I-FRAME-STREAM-INF tags are passed through unrewritten, so
/// renditions reached only through them bypass the proxy.
pub fn rewrite_manifest(
    input: &str,
    context: &RewriteContext,
    depth: usize,
    max_depth: usize,
) -> String {
    if depth >= max_depth {
        tracing::debug!(
            "Rewrite depth {} reached for {}, passing manifest through",
            depth,
            context.manifest_url
        );
        return input.to_string();
    }

    let mut is_master = false;
    let mut output = Vec::new();

    for line in input.lines() {
        let line = line.trim();
        match LineClassifier::classify(line) {
            LineKind::StreamInf => {
                is_master = true;
                output.push(line.to_string());
            }
            LineKind::Key | LineKind::Map => {
                output.push(rewrite_uri_attr(line, context));
            }
            LineKind::SegmentInf | LineKind::ByteRange | LineKind::Opaque => {
                output.push(line.to_string());
            }
            LineKind::Uri => {
                let resolved = context.resolve(line);
                if is_manifest_candidate(is_master, &resolved) {
                    tracing::debug!(
                        "Deferring nested manifest to its own request: {}",
                        resolved
                    );
                }
                output.push(context.proxy_reference(line));
            }
        }
    }

    output.join("\n")
}

/// Rewrite the `URI="..."` attribute inside a tag line, leaving every
/// other byte intact. Tags without a quoted URI attribute come back
/// unchanged.
fn rewrite_uri_attr(line: &str, context: &RewriteContext) -> String {
    let Some(attr_start) = line.find("URI=\"") else {
        return line.to_string();
    };
    let value_start = attr_start + 5;
    let Some(value_len) = line[value_start..].find('"') else {
        return line.to_string();
    };

    let uri = &line[value_start..value_start + value_len];
    format!(
        "{}{}{}",
        &line[..value_start],
        context.proxy_reference(uri),
        &line[value_start + value_len..]
    )
}

/// A URI line names another manifest when the playlist is a master, or
/// when the resolved path itself looks like a playlist.
fn is_manifest_candidate(is_master: bool, resolved: &str) -> bool {
    if is_master {
        return true;
    }
    let path = resolved.split(['?', '#']).next().unwrap_or(resolved);
    let path = path.to_ascii_lowercase();
    path.ends_with(".m3u8") || path.ends_with(".m3u")
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn context() -> RewriteContext {
        RewriteContext::new(Url::parse("https://host.example/vod/master.m3u8").unwrap())
    }

    fn rewrite(input: &str) -> String {
        rewrite_manifest(input, &context(), 0, 5)
    }

    #[test]
    fn test_rewrites_key_uri_attribute() {
        let input = r#"#EXT-X-KEY:METHOD=AES-128,URI="key.bin""#;
        assert_eq!(
            rewrite(input),
            r#"#EXT-X-KEY:METHOD=AES-128,URI="/proxy/https%3A%2F%2Fhost.example%2Fvod%2Fkey.bin""#
        );
    }

    #[test]
    fn test_key_attributes_after_uri_survive() {
        let input = r#"#EXT-X-KEY:METHOD=AES-128,URI="key.bin",IV=0x0123456789abcdef"#;
        let output = rewrite(input);
        assert!(output.ends_with(r#"",IV=0x0123456789abcdef"#));
        assert!(output.starts_with("#EXT-X-KEY:METHOD=AES-128,URI=\"/proxy/"));
    }

    #[test]
    fn test_rewrites_map_uri_attribute() {
        let input = r#"#EXT-X-MAP:URI="init.mp4",BYTERANGE="720@0""#;
        assert_eq!(
            rewrite(input),
            r#"#EXT-X-MAP:URI="/proxy/https%3A%2F%2Fhost.example%2Fvod%2Finit.mp4",BYTERANGE="720@0""#
        );
    }

    #[test]
    fn test_key_without_uri_untouched() {
        let input = "#EXT-X-KEY:METHOD=NONE";
        assert_eq!(rewrite(input), input);
    }

    #[test]
    fn test_rewrites_relative_segment_uri() {
        let input = "#EXTM3U\n#EXTINF:6.0,\nsub/720p.m3u8";
        let output = rewrite(input);
        assert_eq!(
            output,
            "#EXTM3U\n#EXTINF:6.0,\n/proxy/https%3A%2F%2Fhost.example%2Fvod%2Fsub%2F720p.m3u8"
        );
    }

    #[test]
    fn test_rewrites_absolute_uri_verbatim() {
        let input = "https://cdn.example/seg/0001.ts";
        assert_eq!(
            rewrite(input),
            "/proxy/https%3A%2F%2Fcdn.example%2Fseg%2F0001.ts"
        );
    }

    #[test]
    fn test_master_playlist_variants_rewritten() {
        let input = "#EXTM3U\n\
                     #EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360\n\
                     360p.m3u8\n\
                     #EXT-X-STREAM-INF:BANDWIDTH=2500000,RESOLUTION=1280x720\n\
                     720p.m3u8";
        let output = rewrite(input);
        assert!(output.contains("#EXT-X-STREAM-INF:BANDWIDTH=800000,RESOLUTION=640x360"));
        assert!(output.contains("/proxy/https%3A%2F%2Fhost.example%2Fvod%2F360p.m3u8"));
        assert!(output.contains("/proxy/https%3A%2F%2Fhost.example%2Fvod%2F720p.m3u8"));
    }

    #[test]
    fn test_passthrough_tags_survive_byte_for_byte() {
        let input = "#EXTM3U\n\
                     #EXT-X-VERSION:4\n\
                     #EXT-X-TARGETDURATION:6\n\
                     #EXT-X-MEDIA-SEQUENCE:120\n\
                     #EXTINF:6.006,\n\
                     #EXT-X-BYTERANGE:75232@0\n\
                     seg.ts\n\
                     #EXT-X-ENDLIST";
        let output = rewrite(input);
        for passthrough in [
            "#EXTM3U",
            "#EXT-X-VERSION:4",
            "#EXT-X-TARGETDURATION:6",
            "#EXT-X-MEDIA-SEQUENCE:120",
            "#EXTINF:6.006,",
            "#EXT-X-BYTERANGE:75232@0",
            "#EXT-X-ENDLIST",
        ] {
            assert!(output.contains(passthrough), "missing line: {passthrough}");
        }
        assert!(!output.contains("\nseg.ts"));
    }

    #[test]
    fn test_media_tag_uri_not_rewritten() {
        // Renditions referenced through #EXT-X-MEDIA keep their original URI.
        let input = r#"#EXT-X-MEDIA:TYPE=AUDIO,GROUP-ID="aud",URI="audio/en.m3u8""#;
        assert_eq!(rewrite(input), input);
    }

    #[test]
    fn test_comments_and_blank_lines_untouched() {
        let input = "#EXTM3U\n# a note\n\n#EXTINF:4.0,\nseg.ts";
        let output = rewrite(input);
        assert!(output.contains("# a note"));
        assert!(output.contains("\n\n"));
    }

    #[test]
    fn test_line_padding_trimmed() {
        let input = "  #EXT-X-VERSION:4\t\n   seg.ts  ";
        let output = rewrite(input);
        assert!(output.contains("#EXT-X-VERSION:4"));
        assert!(!output.contains("  #EXT-X-VERSION"));
        assert!(output.contains("/proxy/https%3A%2F%2Fhost.example%2Fvod%2Fseg.ts"));
    }

    #[test]
    fn test_crlf_input_handled() {
        let input = "#EXTM3U\r\n#EXTINF:6.0,\r\nseg.ts\r\n";
        let output = rewrite(input);
        assert!(output.contains("/proxy/https%3A%2F%2Fhost.example%2Fvod%2Fseg.ts"));
        assert!(!output.contains('\r'));
    }

    #[test]
    fn test_depth_at_ceiling_passes_through() {
        let input = "#EXTM3U\n#EXTINF:6.0,\nseg.ts";
        assert_eq!(rewrite_manifest(input, &context(), 5, 5), input);
        assert_eq!(rewrite_manifest(input, &context(), 7, 5), input);
    }

    #[test]
    fn test_depth_below_ceiling_rewrites() {
        let input = "seg.ts";
        let output = rewrite_manifest(input, &context(), 4, 5);
        assert!(output.starts_with("/proxy/"));
    }

    #[test]
    fn test_is_hls_manifest_by_content_type() {
        assert!(is_hls_manifest("application/vnd.apple.mpegurl", b""));
        assert!(is_hls_manifest("Application/X-MpegURL; charset=utf-8", b""));
        assert!(is_hls_manifest("audio/mpegurl", b"not a playlist"));
    }

    #[test]
    fn test_is_hls_manifest_by_magic() {
        assert!(is_hls_manifest("text/plain", b"#EXTM3U\n#EXT-X-VERSION:3"));
        assert!(is_hls_manifest("", b"\n  #EXTM3U"));
    }

    #[test]
    fn test_is_hls_manifest_rejects_other_bodies() {
        assert!(!is_hls_manifest("video/mp2t", b"\x47\x40\x00\x10"));
        assert!(!is_hls_manifest("text/html", b"<html></html>"));
        assert!(!is_hls_manifest("", b""));
    }

    #[test]
    fn test_manifest_content_type_prefers_upstream_mime() {
        assert_eq!(
            manifest_content_type("application/x-mpegURL; charset=utf-8"),
            "application/x-mpegurl"
        );
        assert_eq!(manifest_content_type("audio/mpegurl"), "audio/mpegurl");
    }

    #[test]
    fn test_manifest_content_type_defaults_to_apple() {
        assert_eq!(
            manifest_content_type("text/plain"),
            "application/vnd.apple.mpegurl"
        );
        assert_eq!(manifest_content_type(""), "application/vnd.apple.mpegurl");
    }
}
