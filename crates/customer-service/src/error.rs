//! 客户服务错误类型定义
//!
//! 错误分为四类：参数校验（400）、资源不存在（404）、手机号冲突（409）、系统故障（500）

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

/// 字段级校验错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 客户服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),
    #[error("参数验证失败")]
    InvalidFields(Vec<FieldError>),
    #[error("no fields to update")]
    NoFieldsToUpdate,

    // 资源不存在
    #[error("客户不存在: {0}")]
    CustomerNotFound(i64),
    #[error("地址不存在: {0}")]
    AddressNotFound(i64),

    // 唯一性冲突
    #[error("手机号已被使用: {0}")]
    PhoneNumberConflict(String),

    // 系统错误
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidFields(_) | Self::NoFieldsToUpdate => {
                StatusCode::BAD_REQUEST
            }
            Self::CustomerNotFound(_) | Self::AddressNotFound(_) => StatusCode::NOT_FOUND,
            Self::PhoneNumberConflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::InvalidFields(_) => "VALIDATION_ERROR",
            Self::NoFieldsToUpdate => "NO_FIELDS_TO_UPDATE",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::AddressNotFound(_) => "ADDRESS_NOT_FOUND",
            Self::PhoneNumberConflict(_) => "PHONE_NUMBER_CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 把唯一约束冲突映射为手机号冲突，其余数据库错误原样保留
    ///
    /// customers 表上只有 phone_number 一个唯一约束
    pub fn from_unique_violation(err: sqlx::Error, phone_number: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::PhoneNumberConflict(phone_number.to_string());
        }
        Self::Database(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志，防止信息泄露
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "数据库操作失败");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            other => other.to_string(),
        };

        let mut body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
        });

        if let Self::InvalidFields(errors) = &self {
            body["errors"] = json!(errors);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// 递归展开 validator 错误，嵌套结构的字段名以 "." 连接（如 address.city）
fn collect_field_errors(
    errors: &validator::ValidationErrors,
    prefix: &str,
    out: &mut Vec<FieldError>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for e in errs {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", path));
                    out.push(FieldError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(inner, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

/// 从 validator 错误转换，展开为字段级错误列表
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = Vec::new();
        collect_field_errors(&errors, "", &mut field_errors);

        // HashMap 迭代无序，按字段名排序保证响应稳定
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        if field_errors.is_empty() {
            return Self::Validation(errors.to_string());
        }
        Self::InvalidFields(field_errors)
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, ApiError>;
