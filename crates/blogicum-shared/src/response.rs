//! Error bodies as RFC 7807 problem details.
//!
//! See: https://datatracker.ietf.org/doc/html/rfc7807

use serde::{Deserialize, Serialize};

/// Problem type of a text rejected by the forbidden-word filter.
pub const FORBIDDEN_WORDS_TYPE: &str = "/problems/forbidden-words";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// `about:blank` unless the problem has its own type.
    #[serde(rename = "type")]
    pub error_type: String,

    pub title: String,

    pub status: u16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Resource the problem relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Extension member of `FORBIDDEN_WORDS_TYPE` problems.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forbidden_words: Option<Vec<String>>,
}

impl ErrorResponse {
    /// A plain problem titled with the reason phrase of `status`.
    pub fn new(status: u16) -> Self {
        Self {
            error_type: "about:blank".to_string(),
            title: reason_phrase(status).to_string(),
            status,
            detail: None,
            instance: None,
            forbidden_words: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// 422 listing the blocklist words a submitted text matched.
    pub fn forbidden_words(detail: impl Into<String>, words: Vec<String>) -> Self {
        Self {
            error_type: FORBIDDEN_WORDS_TYPE.to_string(),
            title: "Forbidden words".to_string(),
            forbidden_words: Some(words),
            ..Self::new(422).with_detail(detail)
        }
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        303 => "See Other",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        409 => "Conflict",
        422 => "Unprocessable Content",
        500 => "Internal Server Error",
        _ => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_problem() {
        let json = serde_json::to_value(ErrorResponse::new(404).with_detail("post not found")).unwrap();
        assert_eq!(json["type"], "about:blank");
        assert_eq!(json["title"], "Not Found");
        assert_eq!(json["status"], 404);
        assert_eq!(json["detail"], "post not found");
        assert!(json.get("instance").is_none());
        assert!(json.get("forbidden_words").is_none());
    }

    #[test]
    fn test_forbidden_words_problem() {
        let body = ErrorResponse::forbidden_words(
            "Forbidden words are not allowed: ban, spam",
            vec!["ban".into(), "spam".into()],
        );
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["type"], FORBIDDEN_WORDS_TYPE);
        assert_eq!(json["status"], 422);
        assert_eq!(json["forbidden_words"], serde_json::json!(["ban", "spam"]));
    }
}
