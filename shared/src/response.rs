use serde::Serialize;

/// Uniform response envelope: `{"success": bool, "data"?: T, "error"?: string}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl Envelope<()> {
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_skips_the_error_field() {
        let body = serde_json::to_value(Envelope::ok(42)).unwrap();
        assert_eq!(body, serde_json::json!({"success": true, "data": 42}));
    }

    #[test]
    fn empty_envelope_carries_only_the_flag() {
        let body = serde_json::to_value(Envelope::ok_empty()).unwrap();
        assert_eq!(body, serde_json::json!({"success": true}));
    }

    #[test]
    fn error_envelope_skips_the_data_field() {
        let body = serde_json::to_value(Envelope::<()>::err("boom")).unwrap();
        assert_eq!(body, serde_json::json!({"success": false, "error": "boom"}));
    }
}
