//! Operator-injection sanitizer.
//!
//! Document-store query operators arriving inside user input (keys starting
//! with `$` or containing `.`) are removed from the parsed body and the query
//! string before any handler can feed them to the database.

use axum::{extract::Request, middleware::Next, response::Response};
use serde_json::Value;

use super::body::JsonBody;
use super::rewrite_query;

/// Pipeline stage 5: strip operator-shaped keys from body and query.
///
/// Mutates the request context in place; never fails.
pub async fn strip_operator_keys(mut req: Request, next: Next) -> Response {
    if let Some(JsonBody(value)) = req.extensions_mut().get_mut::<JsonBody>() {
        strip_value(value);
    }
    rewrite_query(&mut req, |pairs| {
        pairs.retain(|(key, _)| !is_operator_key(key));
    });
    next.run(req).await
}

fn is_operator_key(key: &str) -> bool {
    key.starts_with('$') || key.contains('.')
}

fn strip_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| !is_operator_key(key));
            for child in map.values_mut() {
                strip_value(child);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_value(item);
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
    fn strips_dollar_prefixed_keys() {
        let mut v = json!({"email": {"$gt": ""}, "password": "x"});
        strip_value(&mut v);
        assert_eq!(v, json!({"email": {}, "password": "x"}));
    }

    #[test]
    fn strips_dotted_keys() {
        let mut v = json!({"a.b": 1, "ok": 2});
        strip_value(&mut v);
        assert_eq!(v, json!({"ok": 2}));
    }

    #[test]
    fn recurses_into_arrays() {
        let mut v = json!([{"$where": "1"}, {"name": "x"}]);
        strip_value(&mut v);
        assert_eq!(v, json!([{}, {"name": "x"}]));
    }

    #[test]
    fn scalars_pass_through() {
        let mut v = json!("$gt");
        strip_value(&mut v);
        // Only keys are operator-carrying; values are left alone.
        assert_eq!(v, json!("$gt"));
    }
}
