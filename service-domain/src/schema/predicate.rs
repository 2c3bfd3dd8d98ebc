use crate::options::Options;
use serde_json::Value;

/// 谓词：封装单条字段规则，可复用、可组合、可测试
///
/// 候选值为字段的 JSON 值，`options` 为注入的运行时选项。
/// 任意 `Fn(&Value, &Options) -> bool` 闭包都是谓词。
pub trait Predicate: Send + Sync {
    /// 检查候选值是否满足谓词
    fn is_satisfied_by(&self, value: &Value, options: &Options) -> bool;

    /// 与另一个谓词进行 AND 组合
    fn and<P>(self, other: P) -> AndPredicate
    where
        Self: Sized + 'static,
        P: Predicate + 'static,
    {
        AndPredicate::new(Box::new(self), Box::new(other))
    }

    /// 与另一个谓词进行 OR 组合
    fn or<P>(self, other: P) -> OrPredicate
    where
        Self: Sized + 'static,
        P: Predicate + 'static,
    {
        OrPredicate::new(Box::new(self), Box::new(other))
    }

    /// 对谓词取反
    fn not(self) -> NotPredicate
    where
        Self: Sized + 'static,
    {
        NotPredicate::new(Box::new(self))
    }
}

impl<F> Predicate for F
where
    F: Fn(&Value, &Options) -> bool + Send + Sync,
{
    fn is_satisfied_by(&self, value: &Value, options: &Options) -> bool {
        self(value, options)
    }
}

/// AND 组合：两个谓词都满足时才满足
pub struct AndPredicate {
    left: Box<dyn Predicate>,
    right: Box<dyn Predicate>,
}

impl AndPredicate {
    pub fn new(left: Box<dyn Predicate>, right: Box<dyn Predicate>) -> Self {
        Self { left, right }
    }
}

impl Predicate for AndPredicate {
    fn is_satisfied_by(&self, value: &Value, options: &Options) -> bool {
        self.left.is_satisfied_by(value, options) && self.right.is_satisfied_by(value, options)
    }
}

/// OR 组合：任意一个谓词满足即满足
pub struct OrPredicate {
    left: Box<dyn Predicate>,
    right: Box<dyn Predicate>,
}

impl OrPredicate {
    pub fn new(left: Box<dyn Predicate>, right: Box<dyn Predicate>) -> Self {
        Self { left, right }
    }
}

impl Predicate for OrPredicate {
    fn is_satisfied_by(&self, value: &Value, options: &Options) -> bool {
        self.left.is_satisfied_by(value, options) || self.right.is_satisfied_by(value, options)
    }
}

/// NOT：内部谓词不满足时才满足
pub struct NotPredicate {
    inner: Box<dyn Predicate>,
}

impl NotPredicate {
    pub fn new(inner: Box<dyn Predicate>) -> Self {
        Self { inner }
    }
}

impl Predicate for NotPredicate {
    fn is_satisfied_by(&self, value: &Value, options: &Options) -> bool {
        !self.inner.is_satisfied_by(value, options)
    }
}

/// 内置谓词
pub(crate) mod builtin {
    use serde_json::Value;

    pub fn filled(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            _ => true,
        }
    }

    pub fn size(value: &Value) -> Option<usize> {
        match value {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(items) => Some(items.len()),
            Value::Object(map) => Some(map.len()),
            _ => None,
        }
    }
}
