use serde::{Deserialize, Serialize};

/// Тело ответа с ошибкой: `{"error": "...", "code": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl ApiErrorBody {
    pub fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: Some(code.to_string()),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code.as_deref() == Some(codes::NOT_FOUND)
    }
}

/// Машинные коды ошибок
pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const NOT_FOUND: &str = "not_found";
    pub const CONFLICT: &str = "conflict";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const INTERNAL: &str = "internal";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_body() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"error":"not found","code":"not_found"}"#).unwrap();
        assert!(body.is_not_found());
        let body: ApiErrorBody = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert!(!body.is_not_found());
    }
}
