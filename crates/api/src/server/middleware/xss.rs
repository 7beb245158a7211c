//! Cross-site-scripting sanitizer.
//!
//! HTML-significant characters in string fields are escaped so stored or
//! reflected payloads render inert.

use axum::{extract::Request, middleware::Next, response::Response};
use serde_json::Value;

use super::body::JsonBody;
use super::rewrite_query;

/// Pipeline stage 7: escape HTML in body string leaves and query values.
///
/// Mutates the request context in place; never fails.
pub async fn escape_html(mut req: Request, next: Next) -> Response {
    if let Some(JsonBody(value)) = req.extensions_mut().get_mut::<JsonBody>() {
        escape_value(value);
    }
    rewrite_query(&mut req, |pairs| {
        for (_, value) in pairs {
            *value = escape_str(value);
        }
    });
    next.run(req).await
}

fn escape_str(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn escape_value(value: &mut Value) {
    match value {
        Value::String(s) => *s = escape_str(s),
        Value::Object(map) => {
            for child in map.values_mut() {
                escape_value(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                escape_value(item);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn escapes_script_tags() {
        assert_eq!(
            escape_str("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
    }

    #[test]
    fn ampersand_is_escaped_first() {
        assert_eq!(escape_str("a&lt;"), "a&amp;lt;");
    }

    #[test]
    fn walks_nested_structures() {
        let mut v = json!({"name": "<b>", "tags": ["<i>", 1], "count": 3});
        escape_value(&mut v);
        assert_eq!(v, json!({"name": "&lt;b&gt;", "tags": ["&lt;i&gt;", 1], "count": 3}));
    }

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(escape_str("hello world"), "hello world");
    }
}
