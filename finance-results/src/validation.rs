//! 校验（Validation）
//!
//! `ValidationErrors` 按字段累积错误信息，最终转换为 `Outcome`；
//! `Validate` 由请求类型实现，供管道中的校验行为调用。
//!
use crate::outcome::Outcome;
use crate::problem::FieldErrors;

/// 可自校验的请求
pub trait Validate {
    /// 将发现的问题写入 `errors`；不写入即视为通过
    fn validate(&self, errors: &mut ValidationErrors);

    /// 执行校验并得到结果
    fn validation_outcome(&self) -> Outcome<()> {
        let mut errors = ValidationErrors::new();
        self.validate(&mut errors);
        errors.into_outcome()
    }
}

/// 字段错误累积器
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: FieldErrors,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一条字段错误
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) -> &mut Self {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    /// 条件不成立时记录错误
    pub fn ensure(
        &mut self,
        condition: bool,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> &mut Self {
        if !condition {
            self.add(field, message);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// 出错的字段数
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn as_map(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn into_outcome(self) -> Outcome<()> {
        Outcome::from_field_errors(self.errors)
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        errors.errors
    }
}
