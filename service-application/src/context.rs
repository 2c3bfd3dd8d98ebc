use bon::Builder;
use serde::{Deserialize, Serialize};

/// 执行者上下文（Actor Context）
///
/// 一次服务调用的发起者信息，可直接作为 `Service::Context` 使用，
/// 默认以 `current_context` 键注入到 schema 选项中：
///
/// ```rust
/// use service_application::context::ActorContext;
///
/// let ctx = ActorContext::builder()
///     .actor_type("user".to_string())
///     .actor_id("u-1".to_string())
///     .actor_name("alice".to_string())
///     .maybe_correlation_id(Some("cor-123".into()))
///     .build();
/// assert_eq!(ctx.actor_name(), Some("alice"));
/// ```
#[derive(Builder, Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    /// 主体类型（如用户、系统等）
    actor_type: Option<String>,
    /// 主体ID
    actor_id: Option<String>,
    /// 主体名称
    actor_name: Option<String>,
    /// 关联ID
    correlation_id: Option<String>,
}

impl ActorContext {
    pub fn actor_type(&self) -> Option<&str> {
        self.actor_type.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    pub fn actor_name(&self) -> Option<&str> {
        self.actor_name.as_deref()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}
