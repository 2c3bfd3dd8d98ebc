//! 错误树（ErrorTree）与错误累积器
//!
//! 以字段键为索引累积错误消息，一个键对应单条消息或一组消息：
//! - 键首次出现时原样写入，不包装为序列；
//! - 键重复出现时，将已有值视为序列，追加新值后**仅展平一层**；
//! - 合并结果与贡献顺序相关，调用方需按稳定顺序提交。
//!
use crate::contribution::IntoContribution;
use crate::error::DomainResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::collections::btree_map::{Entry, Iter};

/// 单个字段上的错误值：单条消息或有序消息序列
///
/// 消息载荷为任意 JSON 值（通常为字符串）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorValue {
    List(Vec<Value>),
    Message(Value),
}

impl ErrorValue {
    /// 将错误值视为序列：单条消息包装为单元素序列
    pub fn into_items(self) -> Vec<Value> {
        match self {
            ErrorValue::List(items) => items,
            ErrorValue::Message(message) => vec![message],
        }
    }

    /// 还原为 JSON 值（序列 → 数组）
    pub fn into_value(self) -> Value {
        match self {
            ErrorValue::List(items) => Value::Array(items),
            ErrorValue::Message(message) => message,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, ErrorValue::List(_))
    }
}

impl From<Value> for ErrorValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => ErrorValue::List(items),
            other => ErrorValue::Message(other),
        }
    }
}

impl From<&str> for ErrorValue {
    fn from(message: &str) -> Self {
        ErrorValue::Message(Value::String(message.to_owned()))
    }
}

impl From<String> for ErrorValue {
    fn from(message: String) -> Self {
        ErrorValue::Message(Value::String(message))
    }
}

impl<T: Into<Value>> From<Vec<T>> for ErrorValue {
    fn from(items: Vec<T>) -> Self {
        ErrorValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// 嵌套、可合并的错误树
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorTree(BTreeMap<String, ErrorValue>);

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并一个贡献（映射或键值对序列）
    ///
    /// 贡献格式非法时返回 `InvalidContribution`，且错误树保持不变。
    pub fn add<C: IntoContribution>(&mut self, contribution: C) -> DomainResult<()> {
        let contribution = contribution.into_contribution()?;
        for (key, value) in contribution {
            self.merge(key, value);
        }
        Ok(())
    }

    /// 单键合并
    pub fn merge(&mut self, key: impl Into<String>, value: impl Into<ErrorValue>) {
        let value = value.into();
        match self.0.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => {
                let existing = std::mem::replace(slot.get_mut(), ErrorValue::List(Vec::new()));
                let mut combined = existing.into_items();
                combined.push(value.into_value());
                *slot.get_mut() = ErrorValue::List(flatten_once(combined));
            }
        }
    }

    /// 将另一棵错误树按键序逐个合并进来
    pub fn merge_tree(&mut self, other: ErrorTree) {
        for (key, value) in other.0 {
            self.merge(key, value);
        }
    }

    pub fn get(&self, key: &str) -> Option<&ErrorValue> {
        self.0.get(key)
    }

    /// 某个键下的全部消息（单条消息视为单元素序列）
    pub fn messages(&self, key: &str) -> Vec<&Value> {
        match self.0.get(key) {
            Some(ErrorValue::List(items)) => items.iter().collect(),
            Some(ErrorValue::Message(message)) => vec![message],
            None => Vec::new(),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> Iter<'_, String, ErrorValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.clone().into_value()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a ErrorTree {
    type Item = (&'a String, &'a ErrorValue);
    type IntoIter = Iter<'a, String, ErrorValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ErrorTree {
    type Item = (String, ErrorValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ErrorValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ErrorTree
where
    K: Into<String>,
    V: Into<ErrorValue>,
{
    /// 逐个 `merge`，因此重复键会按合并规则累积
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = ErrorTree::new();
        for (key, value) in iter {
            tree.merge(key, value);
        }
        tree
    }
}

// 只展开一层：元素本身是数组时拼接其元素，更深层保持原样
fn flatten_once(items: Vec<Value>) -> Vec<Value> {
    let mut flat = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::Array(inner) => flat.extend(inner),
            other => flat.push(other),
        }
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use serde_json::json;

    // 首次贡献原样写入，不包装为序列
    #[test]
    fn first_contribution_is_not_wrapped() {
        let mut tree = ErrorTree::new();
        tree.add(json!({"a": "x"})).unwrap();

        assert_eq!(tree.get("a"), Some(&ErrorValue::Message(json!("x"))));
        assert_eq!(tree.to_json(), json!({"a": "x"}));
    }

    #[test]
    fn distinct_keys_are_kept_side_by_side() {
        let mut tree = ErrorTree::new();
        tree.add(json!({"a": "x"})).unwrap();
        tree.add(json!({"b": "y"})).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.to_json(), json!({"a": "x", "b": "y"}));
    }

    // 重复键：追加后只展平一层
    #[test]
    fn repeated_key_appends_and_flattens_one_level() {
        let mut tree = ErrorTree::new();
        tree.add(json!({"p": "m1"})).unwrap();
        tree.add(json!({"p": "m2"})).unwrap();
        tree.add(json!({"p": ["m3"]})).unwrap();

        assert_eq!(tree.to_json(), json!({"p": ["m1", "m2", "m3"]}));
    }

    #[test]
    fn flattening_never_goes_deeper_than_one_level() {
        let mut tree = ErrorTree::new();
        tree.merge("p", "m1");
        tree.merge("p", json!(["m2", ["deep"]]));

        assert_eq!(tree.to_json(), json!({"p": ["m1", "m2", ["deep"]]}));
    }

    #[test]
    fn first_list_contribution_is_stored_verbatim() {
        let mut tree = ErrorTree::new();
        tree.merge("name", vec!["is missing"]);

        assert!(tree.get("name").unwrap().is_list());
        assert_eq!(tree.messages("name"), vec![&json!("is missing")]);
    }

    #[test]
    fn merge_order_is_observable() {
        let mut left = ErrorTree::new();
        left.merge("k", "first");
        left.merge("k", "second");

        let mut right = ErrorTree::new();
        right.merge("k", "second");
        right.merge("k", "first");

        assert_ne!(left, right);
        assert_eq!(left.to_json(), json!({"k": ["first", "second"]}));
    }

    #[test]
    fn non_string_payloads_are_accepted() {
        let mut tree = ErrorTree::new();
        tree.merge("code", json!({"reason": "taken", "status": 409}));
        tree.merge("code", json!(42));

        assert_eq!(
            tree.to_json(),
            json!({"code": [{"reason": "taken", "status": 409}, 42]})
        );
    }

    #[test]
    fn merge_tree_folds_each_key() {
        let mut tree = ErrorTree::new();
        tree.merge("title", "is missing");

        let other: ErrorTree = vec![("title", "is too short"), ("body", "must be filled")]
            .into_iter()
            .collect();
        tree.merge_tree(other);

        assert_eq!(
            tree.to_json(),
            json!({"title": ["is missing", "is too short"], "body": "must be filled"})
        );
    }

    // 非法贡献直接报错且不修改错误树
    #[test]
    fn invalid_contribution_leaves_tree_untouched() {
        let mut tree = ErrorTree::new();
        tree.merge("a", "x");
        let before = tree.clone();

        let err = tree.add(Value::Null).unwrap_err();
        assert!(matches!(err, DomainError::InvalidContribution { .. }));
        let err = tree.add("not a mapping").unwrap_err();
        assert!(matches!(err, DomainError::InvalidContribution { .. }));

        assert_eq!(tree, before);
    }

    #[test]
    fn serializes_as_plain_json_object() {
        let mut tree = ErrorTree::new();
        tree.merge("a", "x");
        tree.merge("b", vec!["y", "z"]);

        let json = serde_json::to_string(&tree).unwrap();
        assert_eq!(json, r#"{"a":"x","b":["y","z"]}"#);

        let back: ErrorTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tree);
    }
}
