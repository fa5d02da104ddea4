//! 响应 DTO 定义
//!
//! 成功响应统一为 `{success: true, message?, data?, meta?}`，
//! 失败响应由 `ApiError::into_response` 生成

use serde::Serialize;

/// 列表分页元信息
///
/// `page`/`limit` 回显归一化后的输入，`total` 为过滤后的真实总数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

/// API 统一响应
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            meta: None,
        }
    }

    /// 创建带分页信息的成功响应
    pub fn paged(data: T, meta: PageMeta) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            meta: Some(meta),
        }
    }
}

impl ApiResponse<()> {
    /// 创建成功响应（无数据）
    pub fn success_empty() -> Self {
        Self {
            success: true,
            message: None,
            data: None,
            meta: None,
        }
    }

    /// 创建成功响应（仅消息）
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            meta: None,
        }
    }
}
