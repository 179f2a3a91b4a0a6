//! `{code, data, message}` response envelope

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Business success code
pub const CODE_OK: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub code: Option<Value>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default, alias = "msg")]
    pub message: Option<String>,
}

impl Envelope {
    pub fn parse(body: &str) -> AppResult<Self> {
        let value: Value = serde_json::from_str(body)?;
        if !value.is_object() {
            return Err(AppError::Decode("response is not a JSON object".to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Business code, accepting `200` or `"200"`
    pub fn code(&self) -> AppResult<i64> {
        match &self.code {
            Some(Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| AppError::Decode(format!("invalid response code {}", n))),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_| AppError::Decode(format!("invalid response code {:?}", s))),
            _ => Err(AppError::Decode("response has no code field".to_string())),
        }
    }

    /// Unwrap `data`, or fail with the backend's message when `code != 200`
    pub fn into_data<T: DeserializeOwned>(self) -> AppResult<T> {
        let code = self.code()?;
        if code != CODE_OK {
            return Err(AppError::Business {
                code,
                message: self
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| "Operation failed".to_string()),
            });
        }
        Ok(serde_json::from_value(self.data.unwrap_or(Value::Null))?)
    }
}

/// Best-effort `message` from an error body
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("msg"))
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
