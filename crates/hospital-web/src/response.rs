//! 响应封装与错误转换
//!
//! 成功：`{code, data}`；失败：`{code, error, message[, details]}`，`code` 与 HTTP 状态码一致。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hospital_core::HospitalError;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

/// 成功响应
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }

    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    code: u16,
    data: &'a T,
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            code: self.status.as_u16(),
            data: &self.data,
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: u16,
    error: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

/// 处理器错误，包装领域错误以便转换为HTTP响应
#[derive(Debug)]
pub struct ApiError(pub HospitalError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<HospitalError> for ApiError {
    fn from(err: HospitalError) -> Self {
        Self(err)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        Self(err.into())
    }
}

impl From<hospital_core::validation::FieldError> for ApiError {
    fn from(err: hospital_core::validation::FieldError) -> Self {
        Self(err.into())
    }
}

/// 错误对应的HTTP状态码
pub fn status_of(err: &HospitalError) -> StatusCode {
    match err {
        HospitalError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        HospitalError::EmptyBody
        | HospitalError::InvalidJson(_)
        | HospitalError::Validation(_)
        | HospitalError::BadRequest { .. }
        | HospitalError::DuplicateDepartment(_)
        | HospitalError::HasRelatedRecords { .. } => StatusCode::BAD_REQUEST,
        HospitalError::NotFound { .. } => StatusCode::NOT_FOUND,
        HospitalError::DuplicateIdentityNo(_) => StatusCode::CONFLICT,
        HospitalError::Database(_)
        | HospitalError::Io(_)
        | HospitalError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_of(&err);

        let (message, details) = match &err {
            HospitalError::Validation(errors) => (
                err.to_string(),
                Some(serde_json::to_value(errors).unwrap_or(Value::Null)),
            ),
            HospitalError::HasRelatedRecords { details, .. } => {
                (err.to_string(), Some(details.clone()))
            }
            HospitalError::DuplicateDepartment(_) => ("科室已存在".to_string(), None),
            HospitalError::DuplicateIdentityNo(_) => ("身份证号已存在".to_string(), None),
            _ if err.is_server_error() => {
                // 不向客户端暴露SQL等内部细节
                error!(error = %err, "request failed");
                ("服务器内部错误".to_string(), None)
            }
            _ => (err.to_string(), None),
        };

        let body = ErrorBody {
            code: status.as_u16(),
            error: err.code(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// 删除成功，无响应体
pub fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use hospital_core::validation::FieldError;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let response = ApiResponse::created(json!({"DeptID": 1})).into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await, json!({"code": 201, "data": {"DeptID": 1}}));
    }

    #[tokio::test]
    async fn test_validation_error_has_details() {
        let err = HospitalError::Validation(vec![FieldError::invalid("WardName", "病房名称不能为空")]);
        let response = ApiError(err).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({
                "code": 400,
                "error": "PARAM_VALIDATION_FAILED",
                "message": "参数验证失败",
                "details": [{"field": "WardName", "message": "病房名称不能为空"}]
            })
        );
    }

    #[tokio::test]
    async fn test_server_error_is_generic() {
        let response = ApiError(HospitalError::Database("relation \"x\" does not exist".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "服务器内部错误");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(&HospitalError::UnsupportedMediaType),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            status_of(&HospitalError::DuplicateIdentityNo(String::new())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(&HospitalError::DuplicateDepartment(String::new())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(&HospitalError::not_found("WARD_NOT_FOUND", "病房不存在")),
            StatusCode::NOT_FOUND
        );
    }
}
