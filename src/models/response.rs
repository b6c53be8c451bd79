use serde::Serialize;

pub const GENERIC_ERROR_DETAIL: &str = "Something went wrong";

/// JSON body shared by every endpoint. Only the keys relevant to a given
/// response are emitted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_usage: Option<String>,
}

impl ApiResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            error: None,
            message: Some(message.into()),
            correct_usage: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            message: None,
            correct_usage: None,
        }
    }

    /// 500 body. The detail is only exposed when `expose_detail` is set.
    pub fn internal_error(detail: impl Into<String>, expose_detail: bool) -> Self {
        let message = if expose_detail {
            detail.into()
        } else {
            GENERIC_ERROR_DETAIL.to_string()
        };

        Self {
            error: Some("Internal server error".to_string()),
            message: Some(message),
            correct_usage: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_correct_usage(mut self, usage: impl Into<String>) -> Self {
        self.correct_usage = Some(usage.into());
        self
    }
}
