//! 输入校验（InputValidator）
//!
//! 将原始输入交给已绑定选项的 schema，得到错误树与过滤后的输出。
//! 仅当错误为空时保留输出。
//!
use crate::error_tree::ErrorTree;
use crate::schema::BoundSchema;
use serde_json::{Map, Value};

/// 校验结果：`output` 仅在 `errors` 为空时存在
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    errors: ErrorTree,
    output: Option<Map<String, Value>>,
}

impl ValidationResult {
    /// 构造校验结果；存在错误时丢弃输出
    pub fn new(errors: ErrorTree, output: Option<Map<String, Value>>) -> Self {
        let output = if errors.is_empty() { output } else { None };
        Self { errors, output }
    }

    pub fn success(output: Map<String, Value>) -> Self {
        Self::new(ErrorTree::new(), Some(output))
    }

    pub fn failure(errors: ErrorTree) -> Self {
        Self::new(errors, None)
    }

    pub fn errors(&self) -> &ErrorTree {
        &self.errors
    }

    pub fn output(&self) -> Option<&Map<String, Value>> {
        self.output.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_parts(self) -> (ErrorTree, Option<Map<String, Value>>) {
        (self.errors, self.output)
    }
}

/// 对原始输入执行校验
pub fn validate(schema: &BoundSchema, raw_input: &Value) -> ValidationResult {
    let result = schema.call(raw_input);
    if result.is_success() {
        tracing::debug!("input validation passed");
    } else {
        tracing::debug!(
            error_keys = ?result.errors().keys().collect::<Vec<_>>(),
            "input validation failed"
        );
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::schema::Schema;
    use serde_json::json;
    use std::sync::Arc;

    // 无论输入如何都报告错误同时也返回输出的 schema
    struct LeakyOutput;

    impl Schema for LeakyOutput {
        fn call(&self, input: &Value, _options: &Options) -> ValidationResult {
            let mut errors = ErrorTree::new();
            errors.merge("base", "always fails");
            ValidationResult::new(errors, input.as_object().cloned())
        }
    }

    #[test]
    fn output_is_dropped_when_errors_exist() {
        let schema = BoundSchema::new(Arc::new(LeakyOutput), Options::new());
        let result = validate(&schema, &json!({"a": 1}));

        assert!(!result.is_success());
        assert!(result.output().is_none());
        assert_eq!(result.errors().to_json(), json!({"base": "always fails"}));
    }

    #[test]
    fn success_keeps_output() {
        let result = ValidationResult::success(json!({"a": 1}).as_object().cloned().unwrap());
        assert!(result.is_success());
        assert_eq!(result.output().unwrap()["a"], json!(1));
    }
}
