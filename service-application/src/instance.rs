//! 服务实例（ServiceInstance）
//!
//! 绑定一次调用的上下文与原始输入，并编排“解析 schema → 校验输入 → 执行业务逻辑”：
//! 1. 构造时立即解析 schema 并校验，错误进入错误树，状态据此置为 `Failed` 或 `Pending`；
//! 2. `execute` 调用服务类型的业务逻辑入口；
//! 3. 业务逻辑通过 `run` 提交逻辑块，仅在 `Pending` 状态下运行，
//!    结果为真时迁移到 `Succeeded`；
//! 4. 执行期间可通过 `add_errors` 追加业务错误，与校验错误合并到同一棵错误树。
//!
use crate::{
    error::AppError,
    outcome::Outcome,
    resolver,
    schema_source::{DeclaredSchemas, SchemaSource},
    service::Service,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use service_domain::{
    contribution::IntoContribution,
    error::DomainError,
    error_tree::ErrorTree,
    options::Options,
    state::{ServiceState, ServiceStatus},
    validation,
};
use std::fmt;
use std::marker::PhantomData;

/// 服务 `S` 的一次调用
///
/// - `'c`：借用的调用上下文的生命周期
/// - `S`：服务类型（实现 `Service`）
pub struct ServiceInstance<'c, S>
where
    S: Service,
{
    context: &'c S::Context,
    options: Options,
    state: ServiceState,
    _marker: PhantomData<S>,
}

impl<'c, S> ServiceInstance<'c, S>
where
    S: Service,
{
    /// 使用服务类型自身声明的 schema 构造并校验
    pub fn new(context: &'c S::Context, raw_input: Value) -> Result<Self, AppError> {
        Self::with_source(&DeclaredSchemas, context, raw_input)
    }

    /// 从指定的 schema 来源构造并校验
    ///
    /// 仅 schema 无法解析、选项无法派生等调用方错误会返回 `Err`；
    /// 输入校验失败体现在 `errors()`/`is_fail()` 上。
    pub fn with_source<R>(
        source: &R,
        context: &'c S::Context,
        raw_input: Value,
    ) -> Result<Self, AppError>
    where
        R: SchemaSource,
    {
        let schema = resolver::resolve::<S, R>(source, context)?;
        let state = ServiceState::from_validation(validation::validate(&schema, &raw_input));

        tracing::debug!(
            service = S::NAME,
            status = %state.status(),
            error_keys = ?state.errors().keys().collect::<Vec<_>>(),
            "service constructed"
        );
        if S::config().log_inputs() {
            if let Some(inputs) = state.inputs() {
                tracing::trace!(service = S::NAME, inputs = ?inputs, "filtered inputs");
            }
        }

        Ok(Self {
            context,
            options: schema.options().clone(),
            state,
            _marker: PhantomData,
        })
    }

    /// 运行服务类型的业务逻辑入口（`Service::execute`）
    pub fn execute(&mut self) -> Result<(), AppError> {
        S::execute(self)?;
        tracing::debug!(service = S::NAME, status = %self.state.status(), "service executed");
        Ok(())
    }

    /// 运行逻辑块
    ///
    /// - `Failed`（以及已 `Succeeded`）状态下不调用逻辑块；
    /// - `Pending` 状态下调用逻辑块，结果为真则迁移到 `Succeeded`，否则保持 `Pending`；
    /// - 逻辑块返回的 `Err` 原样传播，状态不变。
    pub fn run<F, O>(&mut self, logic: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Self) -> O,
        O: Outcome,
    {
        if !self.state.can_execute() {
            tracing::debug!(
                service = S::NAME,
                status = %self.state.status(),
                "execution skipped"
            );
            return Ok(());
        }

        let succeeded = logic(self).into_outcome()?;
        self.state.record_outcome(succeeded);
        Ok(())
    }

    /// 直接标记成功；`Failed` 状态下无效
    pub fn mark_success(&mut self) -> bool {
        self.state.mark_success()
    }

    /// 直接标记失败；终态下无效
    pub fn mark_failed(&mut self) -> bool {
        self.state.mark_failed()
    }

    /// 追加错误贡献；格式非法时立即返回错误且错误树不变
    pub fn add_errors<C: IntoContribution>(&mut self, contribution: C) -> Result<(), AppError> {
        self.state.errors_mut().add(contribution)?;
        Ok(())
    }

    pub fn errors(&self) -> &ErrorTree {
        self.state.errors()
    }

    /// 过滤后的输入，仅在初始校验通过时存在
    pub fn inputs(&self) -> Option<&Map<String, Value>> {
        self.state.inputs()
    }

    /// 将过滤后的输入解码为具体类型
    pub fn inputs_as<T: DeserializeOwned>(&self) -> Result<Option<T>, AppError> {
        let Some(inputs) = self.state.inputs() else {
            return Ok(None);
        };
        let decoded = serde_json::from_value(Value::Object(inputs.clone()))
            .map_err(DomainError::from)?;
        Ok(Some(decoded))
    }

    pub fn is_success(&self) -> bool {
        self.state.is_success()
    }

    pub fn is_fail(&self) -> bool {
        self.state.is_fail()
    }

    pub fn status(&self) -> ServiceStatus {
        self.state.status()
    }

    pub fn context(&self) -> &'c S::Context {
        self.context
    }

    /// 注入 schema 的选项
    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn state(&self) -> &ServiceState {
        &self.state
    }

    pub fn into_state(self) -> ServiceState {
        self.state
    }
}

impl<S> fmt::Debug for ServiceInstance<'_, S>
where
    S: Service,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceInstance")
            .field("service", &S::NAME)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use service_domain::schema::SchemaDeclaration;
    use std::cell::Cell;

    struct Transfer;

    impl Service for Transfer {
        const NAME: &'static str = "transfer";
        type Context = ();

        fn schema() -> SchemaDeclaration {
            SchemaDeclaration::Rules(|s| {
                s.required("amount").int();
                s.optional("memo").str();
            })
        }

        fn execute(service: &mut ServiceInstance<'_, Self>) -> Result<(), AppError> {
            service.run(|svc| -> Result<bool, AppError> {
                let amount = svc
                    .inputs()
                    .and_then(|i| i.get("amount"))
                    .and_then(Value::as_i64)
                    .unwrap_or(0);
                if amount > 100 {
                    svc.add_errors([("amount", "exceeds daily limit")])?;
                    return Ok(false);
                }
                Ok(true)
            })
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct TransferInput {
        amount: i64,
        memo: Option<String>,
    }

    #[test]
    fn typed_inputs() {
        let svc =
            ServiceInstance::<Transfer>::new(&(), json!({"amount": 5, "memo": "rent"})).unwrap();
        assert_eq!(
            svc.inputs_as::<TransferInput>().unwrap(),
            Some(TransferInput {
                amount: 5,
                memo: Some("rent".into())
            })
        );

        let svc = ServiceInstance::<Transfer>::new(&(), json!({"amount": "5"})).unwrap();
        assert_eq!(svc.inputs_as::<TransferInput>().unwrap(), None);
    }

    #[test]
    fn typed_inputs_decode_error_is_reported() {
        let svc = ServiceInstance::<Transfer>::new(&(), json!({"amount": 5})).unwrap();
        let err = svc.inputs_as::<Vec<u8>>().unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::Serde { .. })));
    }

    #[test]
    fn business_errors_merge_into_same_tree() {
        let mut svc = ServiceInstance::<Transfer>::new(&(), json!({"amount": 500})).unwrap();
        svc.execute().unwrap();

        assert!(svc.is_fail());
        assert_eq!(svc.status(), ServiceStatus::Pending);
        assert_eq!(svc.errors().to_json(), json!({"amount": "exceeds daily limit"}));
    }

    #[test]
    fn logic_is_not_invoked_when_failed() {
        let mut svc = ServiceInstance::<Transfer>::new(&(), json!({})).unwrap();
        let invoked = Cell::new(false);
        svc.run(|_| {
            invoked.set(true);
            true
        })
        .unwrap();

        assert!(!invoked.get());
        assert_eq!(svc.status(), ServiceStatus::Failed);
    }

    #[test]
    fn logic_is_not_rerun_after_success() {
        let mut svc = ServiceInstance::<Transfer>::new(&(), json!({"amount": 1})).unwrap();
        let runs = Cell::new(0);
        for _ in 0..2 {
            svc.run(|_| {
                runs.set(runs.get() + 1);
                true
            })
            .unwrap();
        }

        assert_eq!(runs.get(), 1);
        assert!(svc.is_success());
    }

    #[test]
    fn logic_error_propagates_and_keeps_state() {
        let mut svc = ServiceInstance::<Transfer>::new(&(), json!({"amount": 1})).unwrap();
        let err = svc
            .run(|svc| svc.add_errors(json!(null)).map(|_| true))
            .unwrap_err();

        assert!(err.is_invalid_contribution());
        assert_eq!(svc.status(), ServiceStatus::Pending);
        assert!(svc.errors().is_empty());
    }

    #[test]
    fn mark_failed_inside_logic_wins_over_truthy_outcome() {
        let mut svc = ServiceInstance::<Transfer>::new(&(), json!({"amount": 1})).unwrap();
        svc.run(|svc| {
            svc.mark_failed();
            true
        })
        .unwrap();

        assert!(svc.is_fail());
        assert_eq!(svc.status(), ServiceStatus::Failed);
    }

    #[test]
    fn debug_output_names_service() {
        let svc = ServiceInstance::<Transfer>::new(&(), json!({"amount": 1})).unwrap();
        let debug = format!("{svc:?}");
        assert!(debug.contains("transfer"));
        assert!(debug.contains("Pending"));
    }
}
