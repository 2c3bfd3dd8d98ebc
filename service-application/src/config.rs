use bon::Builder;
use service_domain::options::DEFAULT_CONTEXT_OPTION;

/// 服务类型级配置
///
/// 通过 [`Service::config`](crate::service::Service::config) 按类型提供：
///
/// ```rust
/// use service_application::config::ServiceConfig;
///
/// let config = ServiceConfig::builder()
///     .context_option_key("current_user")
///     .log_inputs(true)
///     .build();
/// assert_eq!(config.context_option_key(), "current_user");
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// 默认选项映射中挂载上下文的键
    #[builder(into, default = String::from(DEFAULT_CONTEXT_OPTION))]
    context_option_key: String,
    /// 是否在 trace 级别输出过滤后的输入
    #[builder(default)]
    log_inputs: bool,
}

impl ServiceConfig {
    pub fn context_option_key(&self) -> &str {
        &self.context_option_key
    }

    pub fn log_inputs(&self) -> bool {
        self.log_inputs
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.context_option_key(), "current_context");
        assert!(!config.log_inputs());
    }
}
