//! Resolution of drained responses into typed results.
//!
//! The lookup endpoint uses one JSON object for both outcomes and tells them
//! apart by which fields are populated, so its body is trusted over the
//! status code. The taxonomy endpoint returns a bare array with no error
//! shape, so there the status code is checked first. Raw operations look
//! at the status code only.

use serde::Deserialize;

use crate::error::{CategorizationError, Result};
use crate::types::{AutonomousSystem, Category, CategoryItem, DomainCategories, RawResponse};

/// Lookup body as sent on the wire: success and error fields side by side.
///
/// Every field is optional so that both a missing key and an explicit
/// `null` read as the zero value.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct LookupEnvelope {
    domain_name: Option<String>,
    categories: Option<Vec<Category>>,
    website_responded: Option<bool>,
    #[serde(rename = "as")]
    autonomous_system: Option<AutonomousSystem>,
    created_date: Option<String>,
    code: Option<i64>,
    messages: Option<String>,
}

/// Outcome of a lookup envelope once discriminated.
#[derive(Debug)]
enum LookupOutcome {
    Success(DomainCategories),
    Failure { code: i64, message: String },
}

impl From<LookupEnvelope> for LookupOutcome {
    fn from(envelope: LookupEnvelope) -> Self {
        let code = envelope.code.unwrap_or_default();
        let message = envelope.messages.unwrap_or_default();
        if !message.is_empty() || code != 0 {
            return Self::Failure { code, message };
        }

        Self::Success(DomainCategories {
            domain_name: envelope.domain_name.unwrap_or_default(),
            categories: envelope.categories.unwrap_or_default(),
            website_responded: envelope.website_responded.unwrap_or_default(),
            autonomous_system: envelope.autonomous_system,
            created_date: envelope.created_date,
        })
    }
}

/// Resolve a lookup response.
///
/// Parse failures win over everything else and keep the raw response. An
/// envelope reporting a failure yields [`CategorizationError::Api`] and the
/// raw response is dropped.
pub(crate) fn resolve_lookup(response: RawResponse) -> Result<(DomainCategories, RawResponse)> {
    let envelope: LookupEnvelope = match serde_json::from_slice(&response.body) {
        Ok(envelope) => envelope,
        Err(source) => {
            return Err(CategorizationError::Parse {
                source,
                response: Box::new(response),
            })
        }
    };

    match LookupOutcome::from(envelope) {
        LookupOutcome::Success(result) => Ok((result, response)),
        LookupOutcome::Failure { code, message } => {
            Err(CategorizationError::Api { code, message })
        }
    }
}

/// Resolve a taxonomy listing: status first, then the array body.
pub(crate) fn resolve_categories(
    response: RawResponse,
) -> Result<(Vec<CategoryItem>, RawResponse)> {
    let response = check_status(response)?;

    match serde_json::from_slice(&response.body) {
        Ok(items) => Ok((items, response)),
        Err(source) => Err(CategorizationError::Parse {
            source,
            response: Box::new(response),
        }),
    }
}

/// Pass 2xx responses through; anything else becomes a status error that
/// keeps the response.
pub(crate) fn check_status(response: RawResponse) -> Result<RawResponse> {
    if response.is_success() {
        return Ok(response);
    }

    Err(CategorizationError::Status {
        status: response.status,
        response: Box::new(response),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CategoryId;
    use reqwest::header::HeaderMap;

    const LOOKUP_OK: &str = r#"{"categories":[{"confidence":0.9499015947838411,"id":596,
"name":"Technology & Computing"},{"confidence":0.8420597541031617,"id":618,
"name":"Information and Network Security"}],"domainName":"whoisxmlapi.com","websiteResponded":true}"#;

    const LOOKUP_ERR: &str = r#"{"code":499,"messages":"Test error message."}"#;

    const CATEGORIES_OK: &str = r#"[{"id":"IAB-1","name":"Automotive","parent":null},{"id":"CUS-1","name":"Trucks","parent":"IAB-1"},
{"id":"CUS-2","name":"Cars","parent":"IAB-1"},{"id":"IAB-25","name":"Car Culture","parent":"IAB-1"}]"#;

    const UNPARSABLE: &str = r#"<?xml version="1.0" encoding="utf-8"?><>"#;

    fn raw(status: u16, body: &'static str) -> RawResponse {
        RawResponse::new(status, HeaderMap::new(), body)
    }

    #[test]
    fn test_lookup_success() {
        let (result, response) = resolve_lookup(raw(200, LOOKUP_OK)).unwrap();

        assert_eq!(result.domain_name, "whoisxmlapi.com");
        assert_eq!(result.categories.len(), 2);
        assert_eq!(result.categories[1].id, CategoryId::Numeric(618));
        assert!(result.website_responded);
        assert_eq!(response.body.as_ref(), LOOKUP_OK.as_bytes());
    }

    #[test]
    fn test_lookup_api_error_ignores_status() {
        // Error envelopes are honoured even behind a 200.
        for status in [200, 499] {
            let err = resolve_lookup(raw(status, LOOKUP_ERR)).unwrap_err();
            match err {
                CategorizationError::Api { code, message } => {
                    assert_eq!(code, 499);
                    assert_eq!(message, "Test error message.");
                }
                other => panic!("expected API error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_lookup_error_fields_win_over_result_fields() {
        let body = r#"{"domainName":"whoisxmlapi.com","categories":[],"websiteResponded":true,
"code":0,"messages":"Quota exceeded"}"#;
        let err = resolve_lookup(raw(200, body)).unwrap_err();

        assert!(matches!(
            err,
            CategorizationError::Api { code: 0, ref message } if message == "Quota exceeded"
        ));
        assert!(err.raw_response().is_none());
    }

    #[test]
    fn test_lookup_nonzero_code_without_message() {
        let err = resolve_lookup(raw(200, r#"{"code":403}"#)).unwrap_err();

        assert!(matches!(
            err,
            CategorizationError::Api { code: 403, ref message } if message.is_empty()
        ));
        assert_eq!(err.to_string(), "API error: [403] ");
    }

    #[test]
    fn test_lookup_null_result_fields_in_error_envelope() {
        let body = r#"{"categories":null,"domainName":null,"websiteResponded":null,
"code":403,"messages":"Access restricted"}"#;
        let err = resolve_lookup(raw(200, body)).unwrap_err();

        assert!(matches!(
            err,
            CategorizationError::Api { code: 403, ref message } if message == "Access restricted"
        ));
    }

    #[test]
    fn test_lookup_null_fields_read_as_zero_values() {
        let body = r#"{"categories":null,"domainName":"example.com","websiteResponded":null,
"as":null,"createdDate":null,"code":null,"messages":null}"#;
        let (result, _) = resolve_lookup(raw(200, body)).unwrap();

        assert_eq!(result.domain_name, "example.com");
        assert!(result.categories.is_empty());
        assert!(!result.website_responded);
        assert!(result.autonomous_system.is_none());
        assert!(result.created_date.is_none());
    }

    #[test]
    fn test_lookup_parse_error_wins_over_status() {
        let err = resolve_lookup(raw(500, UNPARSABLE)).unwrap_err();

        assert!(matches!(err, CategorizationError::Parse { .. }));
        assert!(err
            .to_string()
            .starts_with("cannot parse response: expected value"));
        assert_eq!(err.raw_response().unwrap().status, 500);
    }

    #[test]
    fn test_lookup_truncated_body_is_parse_error() {
        let truncated = &LOOKUP_OK[..LOOKUP_OK.len() - 10];
        let response = RawResponse::new(200, HeaderMap::new(), truncated.to_string());
        let err = resolve_lookup(response).unwrap_err();

        assert!(matches!(err, CategorizationError::Parse { .. }));
    }

    #[test]
    fn test_lookup_wrong_top_level_shape() {
        let err = resolve_lookup(raw(200, CATEGORIES_OK)).unwrap_err();

        assert!(matches!(err, CategorizationError::Parse { .. }));
    }

    #[test]
    fn test_lookup_empty_object_is_empty_success() {
        let (result, _) = resolve_lookup(raw(200, "{}")).unwrap();

        assert!(result.domain_name.is_empty());
        assert!(result.categories.is_empty());
    }

    #[test]
    fn test_categories_success() {
        let (items, response) = resolve_categories(raw(200, CATEGORIES_OK)).unwrap();

        assert_eq!(items.len(), 4);
        assert_eq!(items[0].parent, None);
        assert_eq!(items[1].parent, Some(CategoryId::from("IAB-1")));
        assert!(response.is_success());
    }

    #[test]
    fn test_categories_status_checked_before_parse() {
        let err = resolve_categories(raw(499, LOOKUP_ERR)).unwrap_err();
        assert!(matches!(err, CategorizationError::Status { status: 499, .. }));

        let err = resolve_categories(raw(500, UNPARSABLE)).unwrap_err();
        assert!(matches!(err, CategorizationError::Status { status: 500, .. }));
        assert_eq!(err.raw_response().unwrap().body.as_ref(), UNPARSABLE.as_bytes());
    }

    #[test]
    fn test_categories_parse_error_on_2xx() {
        let err = resolve_categories(raw(200, UNPARSABLE)).unwrap_err();
        assert!(matches!(err, CategorizationError::Parse { .. }));

        // An error envelope is not an array.
        let err = resolve_categories(raw(200, LOOKUP_ERR)).unwrap_err();
        assert!(matches!(err, CategorizationError::Parse { .. }));
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(raw(204, "")).is_ok());

        let err = check_status(raw(301, "")).unwrap_err();
        assert_eq!(err.to_string(), "API failed with status code: 301");
        assert_eq!(err.status(), Some(301));
    }
}
