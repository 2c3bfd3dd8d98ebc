//! 运行时选项（Options）
//!
//! 由调用上下文派生、注入到 schema 中的键值集合，
//! 使自定义谓词能够引用运行时数据（例如“字段必须等于当前用户名”）。
//!
use crate::error::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 默认注入上下文时使用的选项键
pub const DEFAULT_CONTEXT_OPTION: &str = "current_context";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(Map<String, Value>);

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// 将上下文序列化后挂到指定键下：`{ key: context }`
    pub fn for_context<C: Serialize + ?Sized>(key: &str, context: &C) -> DomainResult<Self> {
        let mut options = Self::new();
        options.insert(key, serde_json::to_value(context)?);
        Ok(options)
    }

    /// 由 JSON 对象构造；非对象视为调用方错误
    pub fn from_value(value: Value) -> DomainResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(DomainError::InvalidOptions {
                reason: format!("options must be a JSON object, got {other}"),
            }),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// 以 JSON Pointer 读取嵌套值，例如 `/current_context/name`
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        let rest = pointer.strip_prefix('/')?;
        let (head, tail) = match rest.split_once('/') {
            Some((head, tail)) => (head, Some(tail)),
            None => (rest, None),
        };
        let root = self.0.get(head)?;
        match tail {
            Some(tail) => root.pointer(&format!("/{tail}")),
            None => Some(root),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Options {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
