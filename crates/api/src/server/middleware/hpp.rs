//! HTTP parameter pollution guard.
//!
//! A repeated query parameter reaches handlers as a single scalar, never a
//! list. Policy: the **last** occurrence wins (fixed, documented choice).

use axum::{extract::Request, middleware::Next, response::Response};

use super::rewrite_query;

/// Pipeline stage 9: collapse duplicate query parameters.
pub async fn collapse_duplicate_params(mut req: Request, next: Next) -> Response {
    rewrite_query(&mut req, collapse);
    next.run(req).await
}

fn collapse(pairs: &mut Vec<(String, String)>) {
    let mut out: Vec<(String, String)> = Vec::with_capacity(pairs.len());
    for (key, value) in pairs.drain(..) {
        match out.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => out.push((key, value)),
        }
    }
    *pairs = out;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn last_value_wins() {
        let mut p = pairs(&[("tag", "a"), ("tag", "b"), ("tag", "c")]);
        collapse(&mut p);
        assert_eq!(p, pairs(&[("tag", "c")]));
    }

    #[test]
    fn distinct_keys_keep_order() {
        let mut p = pairs(&[("a", "1"), ("b", "2"), ("a", "3")]);
        collapse(&mut p);
        assert_eq!(p, pairs(&[("a", "3"), ("b", "2")]));
    }

    #[test]
    fn empty_input_is_noop() {
        let mut p = pairs(&[]);
        collapse(&mut p);
        assert!(p.is_empty());
    }
}
