//! Helpers for pulling embedded data out of raw page markup.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>(.*?)</script>").expect("valid regex"));

/// Raw text of every `<script>` block in document order.
pub fn script_blocks(html: &str) -> Vec<&str> {
    SCRIPT_BLOCK
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// Try to extract a balanced JSON object or array from the start of `s`.
///
/// Scans `s` character-by-character tracking bracket depth, respecting
/// string literals and escape sequences. Returns the shortest prefix of `s`
/// that closes the opening bracket, or `None` if it is unterminated.
pub fn extract_balanced_json(s: &str) -> Option<&str> {
    if !(s.starts_with('{') || s.starts_with('[')) {
        return None;
    }
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Depth-first, document-order search for the first `parent.child` string
/// value anywhere in `value`.
pub fn find_first_nested_str<'a>(
    value: &'a serde_json::Value,
    parent: &str,
    child: &str,
) -> Option<&'a str> {
    match value {
        serde_json::Value::Object(map) => map.iter().find_map(|(key, inner)| {
            if key == parent {
                if let Some(found) = inner.get(child).and_then(serde_json::Value::as_str) {
                    return Some(found);
                }
            }
            find_first_nested_str(inner, parent, child)
        }),
        serde_json::Value::Array(items) => items
            .iter()
            .find_map(|item| find_first_nested_str(item, parent, child)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn script_blocks_are_returned_in_order() {
        let html = r#"<html><head><script>one</script></head>
            <body><script type="text/javascript">two</script><SCRIPT>three</SCRIPT></body></html>"#;
        assert_eq!(script_blocks(html), vec!["one", "two", "three"]);
    }

    #[test]
    fn balanced_object_ignores_brackets_inside_strings() {
        let s = r#"{"a":"}{","b":[1,{"c":"\"]"}]};trailing"#;
        assert_eq!(
            extract_balanced_json(s),
            Some(r#"{"a":"}{","b":[1,{"c":"\"]"}]}"#)
        );
    }

    #[test]
    fn balanced_json_rejects_unterminated_input() {
        assert_eq!(extract_balanced_json(r#"{"a":[1,2"#), None);
        assert_eq!(extract_balanced_json("no json"), None);
    }

    #[test]
    fn finds_first_nested_value_in_document_order() {
        let value = json!({
            "shortcode_media": {
                "edge_media_to_caption": {"edges": [{"node": {"text": "hi"}}]},
                "owner": {"id": "1", "username": "first_owner"},
                "edge_media_to_comment": {"edges": [
                    {"node": {"owner": {"username": "commenter"}}}
                ]}
            }
        });
        assert_eq!(
            find_first_nested_str(&value, "owner", "username"),
            Some("first_owner")
        );
    }

    #[test]
    fn searches_inside_arrays() {
        let value = json!([{"x": 1}, {"deep": {"owner": {"username": "arr_owner"}}}]);
        assert_eq!(
            find_first_nested_str(&value, "owner", "username"),
            Some("arr_owner")
        );
    }

    #[test]
    fn missing_path_yields_none() {
        let value = json!({"owner": {"id": "1"}});
        assert_eq!(find_first_nested_str(&value, "owner", "username"), None);
    }
}
