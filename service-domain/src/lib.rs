//! 校验型服务对象的领域层基础库（service-domain）
//!
//! 提供“先校验、后执行”的服务对象所需的纯领域构件：
//! - 错误树（`error_tree`）与错误贡献（`contribution`）：可合并的嵌套错误累积；
//! - 执行状态机（`state`）：`Pending → Failed | Succeeded` 及 fail-lock；
//! - schema 契约与内置规则式实现（`schema`），运行时选项（`options`）；
//! - 输入校验（`validation`）：产出错误与过滤后的输入。
//!
//! 本 crate 不做 I/O、不做并发，仅定义领域层接口与最小必要的错误类型，
//! 组合与注册由上层（`service-application`）完成。
//!
pub mod contribution;
pub mod error;
pub mod error_tree;
pub mod options;
pub mod schema;
pub mod state;
pub mod validation;

pub use contribution::{Contribution, IntoContribution};
pub use error::{DomainError, DomainResult};
pub use error_tree::{ErrorTree, ErrorValue};
pub use options::{DEFAULT_CONTEXT_OPTION, Options};
pub use schema::{BoundSchema, RuleSchema, Schema, SchemaBuilder, SchemaDeclaration};
pub use state::{ServiceState, ServiceStatus};
pub use validation::ValidationResult;
