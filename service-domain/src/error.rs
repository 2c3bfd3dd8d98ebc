//! 领域层统一错误定义
//!
//! 仅承载“调用方契约被违反”一类错误（如错误贡献格式非法、序列化失败）；
//! 输入校验失败属于数据问题，始终落入 `ErrorTree`，不会以 `DomainError` 抛出。
//!
use thiserror::Error;

/// 统一错误类型（基础库最小必要集）
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DomainError {
    // --- 序列化 ---
    #[error("serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },

    // --- 错误累积 ---
    #[error("invalid contribution: {reason}")]
    InvalidContribution { reason: String },

    // --- 选项/上下文 ---
    #[error("invalid options: {reason}")]
    InvalidOptions { reason: String },
}

impl DomainError {
    pub(crate) fn invalid_contribution(reason: impl Into<String>) -> Self {
        DomainError::InvalidContribution {
            reason: reason.into(),
        }
    }
}

/// 统一 Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
