use serde::Serialize;

/// Standard JSON envelope for every `/api` response.
///
/// ```json
/// { "success": false, "data": {}, "message": "You have no open attendance session", "code": "not_checked_in" }
/// ```
///
/// `code` is a stable, machine-readable error kind and is omitted on success.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
            code: None,
        }
    }

    /// Error response with `T::default()` as data.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
            code: None,
        }
    }

    pub fn error_with_code(message: impl Into<String>, code: &'static str) -> Self
    where
        T: Default,
    {
        Self {
            code: Some(code),
            ..Self::error(message)
        }
    }
}
