use crate::{config::ServiceConfig, error::AppError, instance::ServiceInstance};
use serde::Serialize;
use serde_json::Value;
use service_domain::{error::DomainResult, options::Options, schema::SchemaDeclaration};

/// 校验型服务（Service）
///
/// 表达一个“先校验输入、后执行业务逻辑”的工作单元类型：
/// - `schema` 声明输入规则，构造实例时即完成校验；
/// - `options_for_context` 决定上下文以何种形式注入 schema；
/// - `execute` 是业务逻辑入口，实现中通过 [`ServiceInstance::run`] 提交逻辑块，
///   校验失败的实例不会运行该逻辑，也无法再变为成功。
///
/// 关联常量：
/// - `NAME`：服务的稳定名称，用于日志、追踪与注册表。避免依赖 `type_name::<T>()`。
pub trait Service: Sized + 'static {
    /// 服务的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 调用上下文（如当前用户）
    type Context: Serialize;

    /// 声明输入 schema
    fn schema() -> SchemaDeclaration;

    /// 类型级配置
    fn config() -> ServiceConfig {
        ServiceConfig::default()
    }

    /// 由上下文派生注入 schema 的选项，默认 `{ <context_option_key>: context }`
    fn options_for_context(context: &Self::Context) -> DomainResult<Options> {
        Options::for_context(Self::config().context_option_key(), context)
    }

    /// 业务逻辑入口
    fn execute(service: &mut ServiceInstance<'_, Self>) -> Result<(), AppError>;

    /// 构造并立即执行
    fn call(
        context: &Self::Context,
        raw_input: Value,
    ) -> Result<ServiceInstance<'_, Self>, AppError> {
        let mut service = ServiceInstance::new(context, raw_input)?;
        service.execute()?;
        Ok(service)
    }
}
