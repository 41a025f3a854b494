//! Content-type gating for proxy integration.
//!
//! The engine only ever sees payloads the proxy decides to rewrite. That
//! decision is: at least one rule on the active group, and a content type
//! that contains `json`. Server-sent-event streams bypass the engine
//! entirely; their `data: {...}` framing is not a JSON document.

use http::header::CONTENT_TYPE;
use http::HeaderMap;

/// Whether a response with these headers should be routed through the
/// engine.
#[must_use]
pub fn should_rewrite(headers: &HeaderMap, has_rules: bool) -> bool {
    if !has_rules {
        return false;
    }
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    should_rewrite_content_type(content_type, has_rules)
}

/// Header-free variant for callers that already extracted the content type.
#[must_use]
pub fn should_rewrite_content_type(content_type: &str, has_rules: bool) -> bool {
    if !has_rules {
        return false;
    }
    if content_type.contains("event-stream") {
        return false;
    }
    content_type.contains("json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        map
    }

    #[test]
    fn json_content_types_pass() {
        assert!(should_rewrite(&headers("application/json"), true));
        assert!(should_rewrite(
            &headers("application/json; charset=utf-8"),
            true
        ));
        assert!(should_rewrite(&headers("application/problem+json"), true));
    }

    #[test]
    fn non_json_and_sse_bypass() {
        assert!(!should_rewrite(&headers("text/plain"), true));
        assert!(!should_rewrite(&headers("text/event-stream"), true));
        assert!(!should_rewrite_content_type("text/event-stream", true));
    }

    #[test]
    fn no_rules_bypasses_everything() {
        assert!(!should_rewrite(&headers("application/json"), false));
        assert!(!should_rewrite_content_type("application/json", false));
    }

    #[test]
    fn missing_header_bypasses() {
        assert!(!should_rewrite(&HeaderMap::new(), true));
    }
}
