//! Property-based tests for the request layer and error taxonomy
//!
//! Uses proptest to check invariants over generated base URLs, paths,
//! status codes, and response bodies.

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use proptest::prelude::*;
    use url::Url;

    use crate::error::{ApiError, codes};
    use crate::http::resolve_url;

    // ===== Strategy Generators =====

    fn arb_segment() -> impl Strategy<Value = String> {
        "[a-z0-9_-]{1,12}"
    }

    fn arb_segments() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(arb_segment(), 0..4)
    }

    fn arb_code() -> impl Strategy<Value = String> {
        "[a-z_]{1,24}"
    }

    fn arb_description() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 .,]{0,60}"
    }

    fn fallback_code(status: u16) -> &'static str {
        match status {
            400 => codes::BAD_REQUEST,
            401 => codes::UNAUTHORIZED,
            403 => codes::FORBIDDEN,
            404 => codes::NOT_FOUND,
            429 => codes::RATE_LIMITED,
            500 | 502 | 503 | 504 => codes::SERVER_ERROR,
            _ => codes::UNKNOWN_ERROR,
        }
    }

    // ===== URL Composition Properties =====

    proptest! {
        /// Property: the resolved path is the base prefix, one slash, then the
        /// operation path, however the slashes were written
        #[test]
        fn prop_resolve_url_single_separator(
            prefix in arb_segments(),
            path in prop::collection::vec(arb_segment(), 1..4),
            base_slash in any::<bool>(),
            path_slash in any::<bool>(),
        ) {
            let mut base = String::from("https://h.example.com");
            for segment in &prefix {
                base.push('/');
                base.push_str(segment);
            }
            if base_slash {
                base.push('/');
            }
            let base = Url::parse(&base).unwrap();

            let joined = path.join("/");
            let op = if path_slash { format!("/{joined}") } else { joined.clone() };

            let resolved = resolve_url(&base, &op);

            let mut expected = String::new();
            for segment in &prefix {
                expected.push('/');
                expected.push_str(segment);
            }
            expected.push('/');
            expected.push_str(&joined);

            prop_assert_eq!(resolved.path(), expected.as_str());
            prop_assert!(!resolved.path().contains("//"));
            prop_assert_eq!(resolved.host_str(), Some("h.example.com"));
        }

        /// Property: leading-slash and bare paths resolve identically
        #[test]
        fn prop_leading_slash_is_optional(
            prefix in arb_segments(),
            path in arb_segment(),
        ) {
            let base = Url::parse(&format!("https://h.example.com/{}", prefix.join("/"))).unwrap();
            prop_assert_eq!(resolve_url(&base, &path), resolve_url(&base, &format!("/{path}")));
        }
    }

    // ===== Error Mapping Properties =====

    proptest! {
        /// Property: a server error object with a non-empty code passes
        /// through verbatim for any non-2xx status
        #[test]
        fn prop_server_error_passes_through(
            status in 400u16..600,
            code in arb_code(),
            description in arb_description(),
        ) {
            let status = StatusCode::from_u16(status).unwrap();
            let body = serde_json::json!({"error": code, "error_description": description}).to_string();

            let err = ApiError::from_response(status, body.as_bytes());
            prop_assert_eq!(err.code(), code.as_str());
            prop_assert_eq!(err.description(), description.as_str());
        }

        /// Property: an empty or shapeless body falls back to the status table,
        /// and unknown statuses mention the status code
        #[test]
        fn prop_fallback_by_status(
            status in 400u16..600,
            body in prop_oneof![
                Just(String::new()),
                Just("{}".to_string()),
                Just(r#"{"error":"","error_description":""}"#.to_string()),
                "[a-zA-Z <>/]{1,40}",
            ],
        ) {
            let status_code = StatusCode::from_u16(status).unwrap();
            let err = ApiError::from_response(status_code, body.as_bytes());

            prop_assert_eq!(err.code(), fallback_code(status));
            prop_assert!(!err.description().is_empty());
            if err.code() == codes::UNKNOWN_ERROR {
                prop_assert!(err.description().contains(&status.to_string()));
            }
        }

        /// Property: Display is `code` or `code: description`
        #[test]
        fn prop_display_format(code in arb_code(), description in arb_description()) {
            let rendered = ApiError::new(code.clone(), description.clone()).to_string();
            if description.is_empty() {
                prop_assert_eq!(rendered, code);
            } else {
                prop_assert_eq!(rendered, format!("{code}: {description}"));
            }
        }
    }
}
