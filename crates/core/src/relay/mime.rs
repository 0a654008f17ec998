//! Extension-based content type inference.

/// Generic binary type used when nothing better is known.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Content type implied by the extension of `path`, if recognized.
#[must_use]
pub fn mime_for_path(path: &str) -> Option<&'static str> {
    let name = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = name.rsplit_once('.')?;

    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "mp4" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        "pdf" => Some("application/pdf"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

/// Extension first, then the upstream-reported type, then octet-stream.
#[must_use]
pub fn infer_content_type(path: &str, upstream: Option<&str>) -> String {
    mime_for_path(path)
        .or(upstream.filter(|ct| !ct.is_empty()))
        .unwrap_or(OCTET_STREAM)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("photos/file_1.jpg", Some("image/jpeg"))]
    #[case("photos/file_1.JPEG", Some("image/jpeg"))]
    #[case("x.png", Some("image/png"))]
    #[case("x.gif", Some("image/gif"))]
    #[case("x.webp", Some("image/webp"))]
    #[case("documents/file_3.zip", None)]
    #[case("dir.v2/noext", None)]
    fn test_mime_for_path(#[case] path: &str, #[case] expected: Option<&str>) {
        assert_eq!(mime_for_path(path), expected);
    }

    #[test]
    fn test_infer_content_type_precedence() {
        assert_eq!(
            infer_content_type("photos/a.png", Some("application/octet-stream")),
            "image/png"
        );
        assert_eq!(
            infer_content_type("documents/a.zip", Some("application/zip")),
            "application/zip"
        );
        assert_eq!(infer_content_type("documents/a.zip", Some("")), OCTET_STREAM);
        assert_eq!(infer_content_type("documents/a.zip", None), OCTET_STREAM);
    }
}
