//! Credential attachment per platform.

use std::collections::HashMap;

/// `Authorization: Bearer <token>` header map, empty when no token is set.
pub fn bearer_headers(token: Option<&str>) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    if let Some(t) = token.map(str::trim).filter(|t| !t.is_empty()) {
        headers.insert("Authorization".to_string(), format!("Bearer {}", t));
    }
    headers
}

/// Appends `token=<value>` to `url` unless a `token` query parameter is
/// already present. Unparseable URLs are returned unchanged.
pub fn attach_query_token(url: &str, token: Option<&str>) -> String {
    let Some(token) = token.map(str::trim).filter(|t| !t.is_empty()) else {
        return url.to_string();
    };
    let Ok(mut parsed) = url::Url::parse(url) else {
        return url.to_string();
    };
    if parsed.query_pairs().any(|(k, _)| k == "token") {
        return url.to_string();
    }
    parsed.query_pairs_mut().append_pair("token", token);
    parsed.into()
}
