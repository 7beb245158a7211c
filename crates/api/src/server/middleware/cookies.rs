//! Cookie header parsing.

use std::collections::HashMap;

use axum::{
    extract::Request, http::header::COOKIE, middleware::Next, response::Response,
};

/// Cookies sent by the client, attached as a request extension.
///
/// An absent or unreadable `Cookie` header yields an empty map; this stage
/// has no failure mode.
#[derive(Debug, Clone, Default)]
pub struct Cookies(pub HashMap<String, String>);

impl Cookies {
    /// Look up a cookie value by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

/// Pipeline stage 2: parse the `Cookie` header into a [`Cookies`] extension.
pub async fn parse_cookies(mut req: Request, next: Next) -> Response {
    let cookies = req
        .headers()
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(parse_header)
        .unwrap_or_default();

    req.extensions_mut().insert(Cookies(cookies));
    next.run(req).await
}

fn parse_header(header: &str) -> HashMap<String, String> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .collect()
}
