//! 规则式 schema
//!
//! 以声明块描述每个字段的规则：
//!
//! ```
//! use service_domain::options::Options;
//! use service_domain::schema::{RuleSchema, Schema};
//! use serde_json::json;
//!
//! let schema = RuleSchema::define(|s| {
//!     s.required("title").filled().str().min_size(3);
//!     s.optional("tags").array();
//!     s.required("author")
//!         .filled()
//!         .rule("is_current_user", |v, o| o.pointer("/current_context/name") == Some(v));
//!     s.message("is_current_user", "must be the current user");
//! });
//!
//! let options = Options::new().with("current_context", json!({"name": "alice"}));
//! let result = schema.call(&json!({"title": "hi", "author": "bob"}), &options);
//! assert_eq!(
//!     result.errors().to_json(),
//!     json!({
//!         "author": ["must be the current user"],
//!         "title": ["size cannot be less than 3"],
//!     })
//! );
//! ```
//!
//! 校验规则：
//! - 输入必须是 JSON 对象，否则报告 `{"input": ["must be an object"]}`；
//! - 按声明顺序逐个字段检查，必填字段缺失报告 `is missing`，可选字段缺失则跳过；
//! - 字段内的检查按顺序执行，遇到第一个失败即停止；
//! - 校验通过时输出只保留声明过的字段。
//!
use super::Schema;
use super::predicate::{Predicate, builtin};
use crate::error_tree::ErrorTree;
use crate::options::Options;
use crate::validation::ValidationResult;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

const INPUT_KEY: &str = "input";

struct Check {
    name: String,
    predicate: Arc<dyn Predicate>,
    message: String,
}

/// 单个字段的规则
pub struct KeyRule {
    key: String,
    required: bool,
    checks: Vec<Check>,
}

impl KeyRule {
    fn new(key: String, required: bool) -> Self {
        Self {
            key,
            required,
            checks: Vec::new(),
        }
    }

    fn check<P>(&mut self, name: &str, message: impl Into<String>, predicate: P) -> &mut Self
    where
        P: Predicate + 'static,
    {
        self.checks.push(Check {
            name: name.to_owned(),
            predicate: Arc::new(predicate),
            message: message.into(),
        });
        self
    }

    pub fn filled(&mut self) -> &mut Self {
        self.check("filled", "must be filled", |v: &Value, _: &Options| {
            builtin::filled(v)
        })
    }

    pub fn str(&mut self) -> &mut Self {
        self.check("str", "must be a string", |v: &Value, _: &Options| {
            v.is_string()
        })
    }

    pub fn int(&mut self) -> &mut Self {
        self.check("int", "must be an integer", |v: &Value, _: &Options| {
            v.is_i64() || v.is_u64()
        })
    }

    pub fn number(&mut self) -> &mut Self {
        self.check("number", "must be a number", |v: &Value, _: &Options| {
            v.is_number()
        })
    }

    pub fn bool(&mut self) -> &mut Self {
        self.check("bool", "must be boolean", |v: &Value, _: &Options| {
            v.is_boolean()
        })
    }

    pub fn array(&mut self) -> &mut Self {
        self.check("array", "must be an array", |v: &Value, _: &Options| {
            v.is_array()
        })
    }

    pub fn object(&mut self) -> &mut Self {
        self.check("object", "must be an object", |v: &Value, _: &Options| {
            v.is_object()
        })
    }

    pub fn min_size(&mut self, min: usize) -> &mut Self {
        self.check(
            "min_size",
            format!("size cannot be less than {min}"),
            move |v: &Value, _: &Options| builtin::size(v).is_some_and(|n| n >= min),
        )
    }

    pub fn max_size(&mut self, max: usize) -> &mut Self {
        self.check(
            "max_size",
            format!("size cannot be greater than {max}"),
            move |v: &Value, _: &Options| builtin::size(v).is_some_and(|n| n <= max),
        )
    }

    pub fn eql(&mut self, expected: impl Into<Value>) -> &mut Self {
        let expected = expected.into();
        self.check(
            "eql",
            format!("must be equal to {expected}"),
            move |v: &Value, _: &Options| *v == expected,
        )
    }

    pub fn included_in<I, V>(&mut self, allowed: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let allowed: Vec<Value> = allowed.into_iter().map(Into::into).collect();
        let listed = allowed
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        self.check(
            "included_in",
            format!("must be one of: {listed}"),
            move |v: &Value, _: &Options| allowed.contains(v),
        )
    }

    /// 自定义谓词，可读取注入的运行时选项
    pub fn rule<F>(&mut self, name: &str, predicate: F) -> &mut Self
    where
        F: Fn(&Value, &Options) -> bool + Send + Sync + 'static,
    {
        self.check(name, "is invalid", predicate)
    }

    /// 使用组合谓词（见 [`Predicate`]）
    pub fn satisfies<P>(&mut self, name: &str, predicate: P) -> &mut Self
    where
        P: Predicate + 'static,
    {
        self.check(name, "is invalid", predicate)
    }

    fn evaluate(
        &self,
        value: &Value,
        options: &Options,
        messages: &HashMap<String, String>,
    ) -> Option<String> {
        self.checks
            .iter()
            .find(|check| !check.predicate.is_satisfied_by(value, options))
            .map(|check| {
                messages
                    .get(&check.name)
                    .cloned()
                    .unwrap_or_else(|| check.message.clone())
            })
    }
}

/// schema 声明构建器
#[derive(Default)]
pub struct SchemaBuilder {
    rules: Vec<KeyRule>,
    messages: HashMap<String, String>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(&mut self, key: impl Into<String>) -> &mut KeyRule {
        self.push_rule(key.into(), true)
    }

    pub fn optional(&mut self, key: impl Into<String>) -> &mut KeyRule {
        self.push_rule(key.into(), false)
    }

    /// 覆盖某个谓词的失败提示
    pub fn message(&mut self, predicate: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.messages.insert(predicate.into(), text.into());
        self
    }

    pub fn build(self) -> RuleSchema {
        RuleSchema {
            rules: self.rules,
            messages: self.messages,
        }
    }

    fn push_rule(&mut self, key: String, required: bool) -> &mut KeyRule {
        // 同名字段重复声明时以最后一次为准
        self.rules.retain(|rule| rule.key != key);
        self.rules.push(KeyRule::new(key, required));
        let last = self.rules.len() - 1;
        &mut self.rules[last]
    }
}

/// 由 [`SchemaBuilder`] 构建的规则式 schema
pub struct RuleSchema {
    rules: Vec<KeyRule>,
    messages: HashMap<String, String>,
}

impl RuleSchema {
    pub fn define<F>(declare: F) -> Self
    where
        F: FnOnce(&mut SchemaBuilder),
    {
        let mut builder = SchemaBuilder::new();
        declare(&mut builder);
        builder.build()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.key.as_str())
    }
}

impl Schema for RuleSchema {
    fn call(&self, input: &Value, options: &Options) -> ValidationResult {
        let Some(input) = input.as_object() else {
            let mut errors = ErrorTree::new();
            errors.merge(INPUT_KEY, vec!["must be an object"]);
            return ValidationResult::failure(errors);
        };

        let mut errors = ErrorTree::new();
        let mut output = Map::new();
        for rule in &self.rules {
            match input.get(&rule.key) {
                None if rule.required => errors.merge(rule.key.clone(), vec!["is missing"]),
                None => {}
                Some(value) => match rule.evaluate(value, options, &self.messages) {
                    Some(message) => errors.merge(rule.key.clone(), vec![message]),
                    None => {
                        output.insert(rule.key.clone(), value.clone());
                    }
                },
            }
        }

        ValidationResult::new(errors, Some(output))
    }
}
