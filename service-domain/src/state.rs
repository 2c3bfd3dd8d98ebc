//! 执行状态机（ServiceState）
//!
//! `Pending → Failed | Succeeded`，两个终态均不可再迁移：
//! - 构造时校验失败直接进入 `Failed`，过滤后的输入保持缺省；
//! - `Failed` 状态下任何 `mark_success` 都被忽略（fail-lock）；
//! - 对外观察时只有 `Succeeded` 视为成功，`Pending` 与 `Failed` 均视为失败。
//!
use crate::error_tree::ErrorTree;
use crate::validation::ValidationResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    #[default]
    Pending,
    Failed,
    Succeeded,
}

impl ServiceStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ServiceStatus::Pending)
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceStatus::Pending => "pending",
            ServiceStatus::Failed => "failed",
            ServiceStatus::Succeeded => "succeeded",
        };
        f.write_str(s)
    }
}

/// 一次服务调用的全部可变状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceState {
    status: ServiceStatus,
    inputs: Option<Map<String, Value>>,
    errors: ErrorTree,
}

impl ServiceState {
    /// 根据初始校验结果建立状态：有错误即 `Failed`，否则 `Pending` 并记录过滤后的输入
    pub fn from_validation(result: ValidationResult) -> Self {
        let (errors, output) = result.into_parts();
        let mut state = Self::default();
        if errors.is_empty() {
            state.inputs = output;
        } else {
            state.errors.merge_tree(errors);
            state.status = ServiceStatus::Failed;
        }
        state
    }

    pub fn status(&self) -> ServiceStatus {
        self.status
    }

    pub fn inputs(&self) -> Option<&Map<String, Value>> {
        self.inputs.as_ref()
    }

    pub fn errors(&self) -> &ErrorTree {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ErrorTree {
        &mut self.errors
    }

    /// 业务逻辑是否允许运行（仅 `Pending`）
    pub fn can_execute(&self) -> bool {
        self.status == ServiceStatus::Pending
    }

    /// `Pending → Succeeded`；其他状态下忽略，返回是否发生迁移
    pub fn mark_success(&mut self) -> bool {
        self.transition(ServiceStatus::Succeeded)
    }

    /// `Pending → Failed`；其他状态下忽略，返回是否发生迁移
    pub fn mark_failed(&mut self) -> bool {
        self.transition(ServiceStatus::Failed)
    }

    /// 记录业务逻辑的结果：真值迁移到 `Succeeded`，假值保持原状态
    pub fn record_outcome(&mut self, succeeded: bool) -> bool {
        succeeded && self.mark_success()
    }

    pub fn is_success(&self) -> bool {
        self.status == ServiceStatus::Succeeded
    }

    pub fn is_fail(&self) -> bool {
        !self.is_success()
    }

    fn transition(&mut self, to: ServiceStatus) -> bool {
        if self.status.is_terminal() {
            tracing::trace!(from = %self.status, to = %to, "ignored transition from terminal state");
            return false;
        }
        tracing::trace!(from = %self.status, to = %to, "service state transition");
        self.status = to;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> ServiceState {
        let output = json!({"title": "hello"}).as_object().cloned();
        ServiceState::from_validation(ValidationResult::new(ErrorTree::new(), output))
    }

    fn invalid() -> ServiceState {
        let mut errors = ErrorTree::new();
        errors.merge("title", vec!["is missing"]);
        ServiceState::from_validation(ValidationResult::new(errors, None))
    }

    #[test]
    fn valid_input_starts_pending_with_inputs() {
        let state = valid();
        assert_eq!(state.status(), ServiceStatus::Pending);
        assert_eq!(state.inputs().unwrap()["title"], json!("hello"));
        assert!(state.errors().is_empty());
        assert!(state.can_execute());
    }

    #[test]
    fn invalid_input_starts_failed_without_inputs() {
        let state = invalid();
        assert_eq!(state.status(), ServiceStatus::Failed);
        assert!(state.inputs().is_none());
        assert!(state.is_fail());
        assert!(!state.can_execute());
        assert_eq!(state.errors().to_json(), json!({"title": ["is missing"]}));
    }

    // fail-lock：失败后无法再标记成功
    #[test]
    fn failed_state_ignores_mark_success() {
        let mut state = invalid();
        assert!(!state.mark_success());
        assert!(!state.record_outcome(true));
        assert!(!state.is_success());
        assert_eq!(state.status(), ServiceStatus::Failed);
    }

    #[test]
    fn pending_is_observed_as_failed() {
        let mut state = valid();
        assert!(!state.record_outcome(false));
        assert_eq!(state.status(), ServiceStatus::Pending);
        assert!(state.is_fail());
        assert!(!state.is_success());
    }

    #[test]
    fn succeeded_is_terminal() {
        let mut state = valid();
        assert!(state.record_outcome(true));
        assert!(state.is_success());

        assert!(!state.mark_failed());
        assert!(!state.can_execute());
        assert_eq!(state.status(), ServiceStatus::Succeeded);
    }

    #[test]
    fn mark_failed_from_pending() {
        let mut state = valid();
        assert!(state.mark_failed());
        assert!(!state.mark_success());
        assert_eq!(state.status(), ServiceStatus::Failed);
        // 已经记录的输入保留
        assert!(state.inputs().is_some());
    }

    #[test]
    fn status_display_and_serde() {
        assert_eq!(ServiceStatus::Succeeded.to_string(), "succeeded");
        assert_eq!(
            serde_json::to_string(&ServiceStatus::Pending).unwrap(),
            r#""pending""#
        );
    }
}
