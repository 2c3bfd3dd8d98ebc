use service_domain::error::DomainError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] DomainError),

    #[error("schema not registered: service={0}")]
    SchemaNotRegistered(&'static str),

    #[error("execution failed: service={service}, reason={reason}")]
    Execution {
        service: &'static str,
        reason: String,
    },
}

impl AppError {
    /// 是否为错误贡献格式非法（调用方编程错误）
    pub fn is_invalid_contribution(&self) -> bool {
        matches!(
            self,
            AppError::Domain(DomainError::InvalidContribution { .. })
        )
    }
}
