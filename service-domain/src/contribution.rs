//! 错误贡献（Contribution）
//!
//! 调用方提交给错误树的一批错误，可以是映射，也可以是 `(key, value)` 键值对序列。
//! 键值对序列先转换为映射（重复键按输入顺序后者覆盖前者）。
//!
//! 贡献为空（null）或无法转换为映射（如普通字符串）属于调用方编程错误，
//! 通过 [`DomainError::InvalidContribution`] 立即返回，不会被吸收进错误树。
//!
use crate::error::{DomainError, DomainResult};
use crate::error_tree::{ErrorTree, ErrorValue};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// 规范化后的错误贡献
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contribution(BTreeMap<String, ErrorValue>);

impl Contribution {
    /// 由键值对构造；重复键后者覆盖前者
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<ErrorValue>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Contribution {
    type Item = (String, ErrorValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ErrorValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// 可转换为错误贡献的类型
pub trait IntoContribution {
    fn into_contribution(self) -> DomainResult<Contribution>;
}

impl IntoContribution for Contribution {
    fn into_contribution(self) -> DomainResult<Contribution> {
        Ok(self)
    }
}

impl IntoContribution for ErrorTree {
    fn into_contribution(self) -> DomainResult<Contribution> {
        Ok(Contribution(self.into_iter().collect()))
    }
}

impl<K, V> IntoContribution for BTreeMap<K, V>
where
    K: Into<String>,
    V: Into<ErrorValue>,
{
    fn into_contribution(self) -> DomainResult<Contribution> {
        Ok(Contribution::from_pairs(self))
    }
}

impl<K, V, S> IntoContribution for HashMap<K, V, S>
where
    K: Into<String>,
    V: Into<ErrorValue>,
{
    fn into_contribution(self) -> DomainResult<Contribution> {
        Ok(Contribution::from_pairs(self))
    }
}

impl<K, V> IntoContribution for Vec<(K, V)>
where
    K: Into<String>,
    V: Into<ErrorValue>,
{
    fn into_contribution(self) -> DomainResult<Contribution> {
        Ok(Contribution::from_pairs(self))
    }
}

impl<K, V, const N: usize> IntoContribution for [(K, V); N]
where
    K: Into<String>,
    V: Into<ErrorValue>,
{
    fn into_contribution(self) -> DomainResult<Contribution> {
        Ok(Contribution::from_pairs(self))
    }
}

impl IntoContribution for Map<String, Value> {
    fn into_contribution(self) -> DomainResult<Contribution> {
        Ok(Contribution::from_pairs(self))
    }
}

/// JSON 贡献：对象直接作为映射；数组须由 `[key, value]` 二元组组成
impl IntoContribution for Value {
    fn into_contribution(self) -> DomainResult<Contribution> {
        match self {
            Value::Object(map) => map.into_contribution(),
            Value::Array(items) => {
                let mut pairs = Vec::with_capacity(items.len());
                for item in items {
                    pairs.push(pair_from_value(item)?);
                }
                Ok(Contribution::from_pairs(pairs))
            }
            Value::Null => Err(DomainError::invalid_contribution("contribution is null")),
            other => Err(DomainError::invalid_contribution(format!(
                "expected a mapping or a sequence of pairs, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// `None` 等价于 null 贡献
impl<T: IntoContribution> IntoContribution for Option<T> {
    fn into_contribution(self) -> DomainResult<Contribution> {
        match self {
            Some(inner) => inner.into_contribution(),
            None => Err(DomainError::invalid_contribution("contribution is null")),
        }
    }
}

impl IntoContribution for &str {
    fn into_contribution(self) -> DomainResult<Contribution> {
        Err(DomainError::invalid_contribution(
            "expected a mapping or a sequence of pairs, got a string",
        ))
    }
}

impl IntoContribution for String {
    fn into_contribution(self) -> DomainResult<Contribution> {
        self.as_str().into_contribution()
    }
}

fn pair_from_value(item: Value) -> DomainResult<(String, ErrorValue)> {
    let mut pair = match item {
        Value::Array(pair) => pair,
        other => {
            return Err(DomainError::invalid_contribution(format!(
                "pair must be a [key, value] array, got {}",
                json_kind(&other)
            )));
        }
    };
    if pair.len() != 2 {
        return Err(DomainError::invalid_contribution(format!(
            "pair must have exactly 2 elements, got {}",
            pair.len()
        )));
    }
    let value = pair.pop().unwrap_or(Value::Null);
    match pair.pop() {
        Some(Value::String(key)) => Ok((key, ErrorValue::from(value))),
        Some(other) => Err(DomainError::invalid_contribution(format!(
            "pair key must be a string, got {}",
            json_kind(&other)
        ))),
        None => Err(DomainError::invalid_contribution("pair key is missing")),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
