//! Telegram HTML rendering and link rewriting for published content.

use super::types::{ContentType, NewContentBlock};
use crate::relay::{RelayError, proxy_url};

/// Marker of a direct Bot API file link: `{api}/file/bot{token}/{path}`.
const FILE_LINK_MARKER: &str = "/file/bot";

/// Escape the characters Telegram's HTML parse mode treats as markup.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render a text-like block as a Telegram HTML message.
///
/// Returns `None` for image and file blocks, which are never sent as text.
#[must_use]
pub fn relay_message(block: &NewContentBlock) -> Option<String> {
    let title = escape_html(&block.title);
    let body = match block.content_type {
        ContentType::Code => format!("<pre><code>{}</code></pre>", escape_html(&block.content)),
        ContentType::Poetry => block
            .content
            .split('\n')
            .map(|line| format!("<i>{}</i>", escape_html(line)))
            .collect::<Vec<_>>()
            .join("\n"),
        ContentType::Text => escape_html(&block.content),
        ContentType::Image | ContentType::File => return None,
    };

    Some(format!("<b>{title}</b>\n\n{body}"))
}

/// Rewrite a direct Telegram file link into the local proxy form.
///
/// Returns `Ok(None)` when `content` is not a Telegram file link. The token
/// segment is dropped so it never reaches the record store.
pub fn rewrite_file_link(content: &str, origin: &str) -> Result<Option<String>, RelayError> {
    let Some((_, after_marker)) = content.split_once(FILE_LINK_MARKER) else {
        return Ok(None);
    };
    let Some((_token, path)) = after_marker.split_once('/') else {
        return Ok(None);
    };
    let path = path.split(['?', '#']).next().unwrap_or_default();
    if path.is_empty() {
        return Ok(None);
    }

    proxy_url(origin, "path", path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(content_type: ContentType, title: &str, content: &str) -> NewContentBlock {
        NewContentBlock {
            content_type,
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_text_message() {
        let message = relay_message(&block(ContentType::Text, "Hello", "world")).expect("text");
        assert_eq!(message, "<b>Hello</b>\n\nworld");
    }

    #[test]
    fn test_poetry_lines_are_italic() {
        let message = relay_message(&block(ContentType::Poetry, "Haiku", "one\ntwo\nthree"))
            .expect("poetry");
        assert_eq!(message, "<b>Haiku</b>\n\n<i>one</i>\n<i>two</i>\n<i>three</i>");
    }

    #[test]
    fn test_code_is_wrapped_and_escaped() {
        let message = relay_message(&block(ContentType::Code, "a<b", "if a < b && c > d {}"))
            .expect("code");
        assert_eq!(
            message,
            "<b>a&lt;b</b>\n\n<pre><code>if a &lt; b &amp;&amp; c &gt; d {}</code></pre>"
        );
    }

    #[test]
    fn test_binary_blocks_have_no_message() {
        assert!(relay_message(&block(ContentType::Image, "t", "https://x/y.png")).is_none());
        assert!(relay_message(&block(ContentType::File, "t", "https://x/y.pdf")).is_none());
    }

    #[test]
    fn test_rewrite_file_link() {
        let rewritten = rewrite_file_link(
            "https://api.telegram.org/file/bot123:abc/photos/file_1.jpg",
            "https://pad.example.com",
        )
        .expect("valid origin");
        assert_eq!(
            rewritten.as_deref(),
            Some("https://pad.example.com/images/proxy?path=photos%2Ffile_1.jpg")
        );
    }

    #[test]
    fn test_rewrite_leaves_other_urls_alone() {
        let rewritten = rewrite_file_link(
            "https://pad.example.com/images/proxy?file_id=abc",
            "https://pad.example.com",
        )
        .expect("valid origin");
        assert!(rewritten.is_none());

        let rewritten = rewrite_file_link("https://x/file/bot123", "https://pad.example.com")
            .expect("valid origin");
        assert!(rewritten.is_none());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // Escaped output never contains raw markup characters from the input.
    proptest! {
        #[test]
        fn prop_escaped_text_has_no_tags(text in ".*") {
            let escaped = escape_html(&text);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
        }
    }

    // Poetry renders exactly one italic line per input line.
    proptest! {
        #[test]
        fn prop_poetry_line_count(lines in proptest::collection::vec("[a-z ]{0,10}", 1..8)) {
            let content = lines.join("\n");
            let message = relay_message(&NewContentBlock {
                content_type: ContentType::Poetry,
                title: "t".to_string(),
                content,
            }).expect("poetry renders");
            let body = message.split_once("\n\n").map(|(_, b)| b).unwrap_or_default();
            prop_assert_eq!(body.split('\n').count(), lines.len());
            prop_assert!(body.split('\n').all(|l| l.starts_with("<i>") && l.ends_with("</i>")));
        }
    }
}
