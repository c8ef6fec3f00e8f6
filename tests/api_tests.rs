//! Integration tests for smartlink API endpoints.
//!
//! These tests verify the wire formats and validation rules of the HTTP
//! surface without requiring a database connection.

use serde_json::json;

/// Test module for request/response wire formats
mod wire_format_tests {
    use super::*;

    #[test]
    fn test_shorten_form_body() {
        let form = json!({
            "originalUrl": "example.com"
        });

        assert_eq!(form["originalUrl"], "example.com");
    }

    #[test]
    fn test_stats_response_format() {
        let stats = json!({
            "shortId": "abc123XY",
            "originalUrl": "https://example.com",
            "clicks": 1,
            "createdAt": "2024-01-01T00:00:00Z",
            "lastClicked": "2024-01-15T12:30:00Z"
        });

        assert_eq!(stats["shortId"], "abc123XY");
        assert_eq!(stats["originalUrl"], "https://example.com");
        assert_eq!(stats["clicks"], 1);
        assert!(stats["createdAt"].as_str().is_some());
    }

    #[test]
    fn test_stats_response_null_last_clicked() {
        let stats = json!({
            "shortId": "abc123XY",
            "originalUrl": "https://example.com",
            "clicks": 0,
            "createdAt": "2024-01-01T00:00:00Z",
            "lastClicked": null
        });

        assert!(stats["lastClicked"].is_null());
    }

    #[test]
    fn test_url_listing_format() {
        let listing = json!({
            "urls": [
                {
                    "shortId": "abc123XY",
                    "originalUrl": "https://example.com",
                    "createdAt": "2024-01-02T00:00:00Z",
                    "clicks": 3,
                    "lastClicked": null,
                    "isActive": true
                }
            ],
            "pagination": {
                "currentPage": 2,
                "totalPages": 3,
                "totalUrls": 3,
                "hasNext": true,
                "hasPrev": true
            }
        });

        assert_eq!(listing["urls"].as_array().unwrap().len(), 1);
        assert_eq!(listing["pagination"]["currentPage"], 2);
        assert_eq!(listing["pagination"]["hasNext"], true);
        assert_eq!(listing["pagination"]["hasPrev"], true);
    }

    #[test]
    fn test_health_response_format() {
        let health = json!({
            "status": "OK",
            "timestamp": "2024-01-01T00:00:00Z",
            "uptime": 12.5,
            "database": "Connected",
            "version": "0.1.0"
        });

        assert_eq!(health["status"], "OK");
        assert_eq!(health["database"], "Connected");
        assert!(health["uptime"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_error_response_format() {
        let error = json!({
            "error": "NOT_FOUND",
            "message": "URL not found"
        });

        assert_eq!(error["error"], "NOT_FOUND");
        assert!(!error["message"].as_str().unwrap().is_empty());
    }
}

/// Test module for redirect-path validation logic
mod validation_tests {
    fn is_valid_short_id(candidate: &str) -> bool {
        // Short ids are 6-10 characters from the nanoid alphabet
        (6..=10).contains(&candidate.len())
            && candidate
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }

    #[test]
    fn test_valid_short_ids() {
        assert!(is_valid_short_id("abc123"));
        assert!(is_valid_short_id("abc123XY"));
        assert!(is_valid_short_id("A-b_c-d_12"));
    }

    #[test]
    fn test_short_ids_outside_length_bounds() {
        assert!(!is_valid_short_id("abcde"));
        assert!(!is_valid_short_id("abcdefghijk"));
        assert!(!is_valid_short_id(""));
    }

    #[test]
    fn test_short_ids_with_foreign_characters() {
        assert!(!is_valid_short_id("abc.123"));
        assert!(!is_valid_short_id("abc/123"));
        assert!(!is_valid_short_id("abc 123"));
    }

    fn normalize(raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        }
    }

    #[test]
    fn test_normalization_prefixes_protocol() {
        assert_eq!(normalize("example.com"), "https://example.com");
        assert_eq!(normalize("http://example.com"), "http://example.com");
    }

    #[test]
    fn test_normalization_is_exact_string() {
        // Trailing slashes and query order are preserved: dedup matches on
        // the exact stored string
        assert_ne!(normalize("example.com"), normalize("example.com/"));
        assert_ne!(
            normalize("example.com?a=1&b=2"),
            normalize("example.com?b=2&a=1")
        );
    }
}

/// Test module for the shorten-redirect contract
mod shorten_redirect_tests {
    #[test]
    fn test_created_redirect_location() {
        let short_id = "abc123XY";
        let location = format!("/?success=created&shortId={}", short_id);

        assert!(location.contains("success=created"));
        assert!(location.ends_with(short_id));
    }

    #[test]
    fn test_existing_redirect_location() {
        let short_id = "abc123XY";
        let location = format!("/?success=existing&shortId={}", short_id);

        assert!(location.contains("success=existing"));
        assert!(location.contains(short_id));
    }
}

/// Test module for pagination math used by GET /api/urls
mod pagination_tests {
    fn total_pages(total: i64, limit: i64) -> i64 {
        if total == 0 {
            0
        } else {
            (total + limit - 1) / limit
        }
    }

    #[test]
    fn test_total_pages_rounding() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(3, 1), 3);
    }

    #[test]
    fn test_offset_from_page() {
        let limit = 10i64;
        for (page, expected) in [(1, 0), (2, 10), (3, 20)] {
            assert_eq!((page - 1) * limit, expected);
        }
    }

    #[test]
    fn test_page_two_of_three_records() {
        // Spec scenario: 3 records, limit 1, page 2
        let total = 3i64;
        let limit = 1i64;
        let page = 2i64;

        assert_eq!(total_pages(total, limit), 3);
        assert!(page < total_pages(total, limit)); // hasNext
        assert!(page > 1); // hasPrev
        assert_eq!((page - 1) * limit, 1); // second-most-recent record
    }
}
