//! 错误定义模块

use serde_json::Value;
use thiserror::Error;

use crate::validation::FieldError;

/// 唯一约束名，与建表语句保持一致
pub const UQ_DEPT_NAME: &str = "uq_departments_dept_name";
pub const UQ_IDENTITY_NO: &str = "uq_patients_identity_no";

/// 医院管理系统统一错误类型
#[derive(Error, Debug)]
pub enum HospitalError {
    #[error("必须使用 application/json 格式")]
    UnsupportedMediaType,

    #[error("请求体不能为空")]
    EmptyBody,

    #[error("请求体必须是有效的JSON格式: {0}")]
    InvalidJson(String),

    #[error("参数验证失败")]
    Validation(Vec<FieldError>),

    #[error("{message}")]
    BadRequest { code: String, message: String },

    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    #[error("科室已存在: {0}")]
    DuplicateDepartment(String),

    #[error("身份证号已存在: {0}")]
    DuplicateIdentityNo(String),

    #[error("{message}")]
    HasRelatedRecords {
        code: &'static str,
        message: String,
        details: Value,
    },

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

impl HospitalError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            message: message.into(),
        }
    }

    /// 对外暴露的错误码
    pub fn code(&self) -> &str {
        match self {
            Self::UnsupportedMediaType => "INVALID_CONTENT_TYPE",
            Self::EmptyBody => "EMPTY_REQUEST_BODY",
            Self::InvalidJson(_) => "INVALID_JSON",
            Self::Validation(_) => "PARAM_VALIDATION_FAILED",
            Self::BadRequest { code, .. } => code.as_str(),
            Self::NotFound { code, .. } => *code,
            Self::DuplicateDepartment(_) => "DUPLICATE_DEPARTMENT",
            Self::DuplicateIdentityNo(_) => "DUPLICATE_IDENTITY_NO",
            Self::HasRelatedRecords { code, .. } => *code,
            Self::Database(_) => "DATABASE_ERROR",
            Self::Io(_) | Self::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Io(_) | Self::Internal(_)
        )
    }
}

impl From<FieldError> for HospitalError {
    fn from(err: FieldError) -> Self {
        Self::BadRequest {
            code: err.code,
            message: err.message,
        }
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for HospitalError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.constraint() {
                Some(UQ_DEPT_NAME) => {
                    return Self::DuplicateDepartment(db_err.message().to_string())
                }
                Some(UQ_IDENTITY_NO) => {
                    return Self::DuplicateIdentityNo(db_err.message().to_string())
                }
                _ => {}
            }
        }
        Self::Database(err.to_string())
    }
}

/// 医院管理系统统一结果类型
pub type Result<T> = std::result::Result<T, HospitalError>;
