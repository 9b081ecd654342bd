//! JSON 请求体提取器

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, HeaderMap},
};
use hospital_core::HospitalError;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::response::ApiError;

/// 要求 `Content-Type: application/json` 且请求体为非空 JSON 对象
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json_content_type(req.headers()) {
            return Err(HospitalError::UnsupportedMediaType.into());
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| HospitalError::InvalidJson(e.to_string()))?;

        Ok(JsonBody(parse_body(&bytes)?))
    }
}

/// 允许携带 `; charset=utf-8` 等参数
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

pub fn parse_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, HospitalError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(HospitalError::EmptyBody);
    }

    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| HospitalError::InvalidJson(e.to_string()))?;

    match &value {
        Value::Object(map) if !map.is_empty() => {}
        _ => return Err(HospitalError::EmptyBody),
    }

    serde_json::from_value(value).map_err(|e| HospitalError::InvalidJson(e.to_string()))
}
