//! 输入 schema 契约
//!
//! - [`Schema`]：对原始输入执行校验，返回错误树与过滤后的输出；
//! - [`BoundSchema`]：绑定了运行时选项的 schema（即 `with_options` 的结果）；
//! - [`SchemaDeclaration`]：服务类型声明 schema 的两种等价方式——
//!   规则声明块（DSL）或已构建好的外部 schema 对象；
//! - [`RuleSchema`]/[`SchemaBuilder`]：内置的规则式 schema 实现。
//!
mod builder;
mod predicate;

pub use builder::{KeyRule, RuleSchema, SchemaBuilder};
pub use predicate::{AndPredicate, NotPredicate, OrPredicate, Predicate};

use crate::options::Options;
use crate::validation::ValidationResult;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// 校验引擎契约
pub trait Schema: Send + Sync {
    /// 以给定选项校验原始输入
    fn call(&self, input: &Value, options: &Options) -> ValidationResult;
}

impl<T> Schema for Arc<T>
where
    T: Schema + ?Sized,
{
    fn call(&self, input: &Value, options: &Options) -> ValidationResult {
        (**self).call(input, options)
    }
}

/// 绑定了选项的 schema 实例
#[derive(Clone)]
pub struct BoundSchema {
    schema: Arc<dyn Schema>,
    options: Options,
}

impl BoundSchema {
    pub fn new(schema: Arc<dyn Schema>, options: Options) -> Self {
        Self { schema, options }
    }

    pub fn call(&self, input: &Value) -> ValidationResult {
        self.schema.call(input, &self.options)
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

impl fmt::Debug for BoundSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundSchema")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// 服务类型对 schema 的声明
#[derive(Clone)]
pub enum SchemaDeclaration {
    /// 规则声明块，交给 [`SchemaBuilder`] 构建
    Rules(fn(&mut SchemaBuilder)),
    /// 已构建好的 schema 对象
    Built(Arc<dyn Schema>),
}

impl SchemaDeclaration {
    pub fn built<S: Schema + 'static>(schema: S) -> Self {
        SchemaDeclaration::Built(Arc::new(schema))
    }

    /// 两种声明方式统一构建为 schema 对象
    pub fn build(&self) -> Arc<dyn Schema> {
        match self {
            SchemaDeclaration::Rules(declare) => Arc::new(RuleSchema::define(*declare)),
            SchemaDeclaration::Built(schema) => schema.clone(),
        }
    }
}

impl fmt::Debug for SchemaDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDeclaration::Rules(_) => f.write_str("SchemaDeclaration::Rules(..)"),
            SchemaDeclaration::Built(_) => f.write_str("SchemaDeclaration::Built(..)"),
        }
    }
}
