//! 问题（Problem）
//!
//! 业务失败的结构化描述：类别、标题、可选详情，以及“字段 -> 错误信息列表”的映射。
//! 字段错误仅在校验类问题或合并产生的问题中出现，其余构造方式保持为空。
//!
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 字段名 -> 错误信息列表（有序，便于稳定输出）
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub(crate) const VALIDATION_TITLE: &str = "One or more validation errors occurred.";
pub(crate) const MERGED_TITLE: &str = "One or more errors occurred.";
pub(crate) const ERRORS_DETAIL: &str = "Please refer to the errors property for additional details";

/// 问题类别
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// 不属于其它类别的通用失败
    Failure,
    /// 输入不满足约束
    Validation,
    /// 资源不存在
    NotFound,
    /// 与资源当前状态冲突（如重复创建）
    Conflict,
    /// 未认证
    Unauthorized,
    /// 已认证但无权限
    Forbidden,
}

impl ProblemKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Failure => "failure",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
        }
    }

    /// 约定的 HTTP 状态码，供接口层做转换
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Failure => 500,
            Self::Validation => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
        }
    }
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 结构化的业务失败
///
/// 字段私有，只能经由构造函数创建，以保证 `errors` 的不变式：
/// 非校验类问题的 `errors` 为空，除非该问题由多个问题合并而来。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(try_from = "ProblemRepr")]
#[error("{kind}: {title}")]
pub struct Problem {
    kind: ProblemKind,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    errors: FieldErrors,
}

/// 反序列化的中间形态，经 `TryFrom` 校验后才成为 `Problem`
#[derive(Deserialize)]
struct ProblemRepr {
    kind: ProblemKind,
    title: String,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    errors: FieldErrors,
}

/// 非校验、非合并类问题携带了字段错误
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("field errors are not allowed on {0} problems")]
pub struct UnexpectedFieldErrors(pub ProblemKind);

impl TryFrom<ProblemRepr> for Problem {
    type Error = UnexpectedFieldErrors;

    fn try_from(repr: ProblemRepr) -> Result<Self, Self::Error> {
        let carries_errors = matches!(repr.kind, ProblemKind::Validation | ProblemKind::Failure);
        if !repr.errors.is_empty() && !carries_errors {
            return Err(UnexpectedFieldErrors(repr.kind));
        }
        Ok(Self {
            kind: repr.kind,
            title: repr.title,
            detail: repr.detail,
            errors: repr.errors,
        })
    }
}

impl Problem {
    /// 创建不带字段错误的问题
    pub fn new(kind: ProblemKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            detail: None,
            errors: FieldErrors::new(),
        }
    }

    /// 附加详情
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(ProblemKind::NotFound, "NotFound").with_detail(detail)
    }

    /// 校验失败，携带字段错误
    pub fn validation(
        title: impl Into<String>,
        detail: impl Into<String>,
        errors: FieldErrors,
    ) -> Self {
        Self {
            kind: ProblemKind::Validation,
            title: title.into(),
            detail: Some(detail.into()),
            errors,
        }
    }

    /// 单字段校验失败
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        Self::validation(VALIDATION_TITLE, ERRORS_DETAIL, errors)
    }

    pub fn conflict(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(ProblemKind::Conflict, title).with_detail(detail)
    }

    pub fn unauthorized(title: impl Into<String>) -> Self {
        Self::new(ProblemKind::Unauthorized, title)
    }

    pub fn forbidden(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ProblemKind::Forbidden, code).with_detail(message)
    }

    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ProblemKind::Failure, code).with_detail(message)
    }

    /// 合并多个问题为一个 `Failure`：
    /// 字段错误取并集，同名字段的错误信息按出现顺序拼接。
    pub fn merge<'a, I>(problems: I) -> Self
    where
        I: IntoIterator<Item = &'a Problem>,
    {
        let mut errors = FieldErrors::new();

        for problem in problems {
            for (field, messages) in &problem.errors {
                errors
                    .entry(field.clone())
                    .or_default()
                    .extend(messages.iter().cloned());
            }
        }

        Self {
            kind: ProblemKind::Failure,
            title: MERGED_TITLE.to_string(),
            detail: Some(ERRORS_DETAIL.to_string()),
            errors,
        }
    }

    pub fn kind(&self) -> ProblemKind {
        self.kind
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ProblemKind::Validation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 非校验类构造不携带字段错误
    #[test]
    fn test_plain_constructors_have_no_errors() {
        let problems = [
            Problem::not_found("transaction 1 not found"),
            Problem::conflict("Conflict", "connection already exists"),
            Problem::unauthorized("Unauthorized"),
            Problem::forbidden("forbidden", "no access"),
            Problem::failure("failure", "boom"),
        ];
        for p in &problems {
            assert!(p.errors().is_empty(), "{p:?}");
            assert!(!p.is_validation());
        }
        assert_eq!(problems[0].kind(), ProblemKind::NotFound);
        assert_eq!(problems[0].detail(), Some("transaction 1 not found"));
        assert_eq!(problems[3].title(), "forbidden");
    }

    #[test]
    fn test_invalid_field() {
        let p = Problem::invalid_field("amount", "must be positive");
        assert_eq!(p.kind(), ProblemKind::Validation);
        assert_eq!(p.errors()["amount"], vec!["must be positive".to_string()]);
    }

    // 合并：字段并集，同名字段拼接
    #[test]
    fn test_merge_unions_field_errors() {
        let a = Problem::invalid_field("amount", "must be positive");
        let mut errors = FieldErrors::new();
        errors.insert("amount".into(), vec!["too large".into()]);
        errors.insert("description".into(), vec!["required".into()]);
        let b = Problem::validation("t", "d", errors);

        let merged = Problem::merge([&a, &b]);
        assert_eq!(merged.kind(), ProblemKind::Failure);
        assert_eq!(merged.title(), MERGED_TITLE);
        assert_eq!(
            merged.errors()["amount"],
            vec!["must be positive".to_string(), "too large".to_string()]
        );
        assert_eq!(merged.errors()["description"], vec!["required".to_string()]);
    }

    // 混入非校验问题时，只合并校验问题的字段错误
    #[test]
    fn test_merge_mixed_kinds_is_failure() {
        let a = Problem::invalid_field("amount", "must be positive");
        let b = Problem::not_found("category missing");
        let merged = Problem::merge([&a, &b]);
        assert_eq!(merged.kind(), ProblemKind::Failure);
        assert_eq!(merged.title(), MERGED_TITLE);
        assert_eq!(merged.errors().len(), 1);
    }

    // 反序列化同样保持字段错误的约束
    #[test]
    fn test_deserialize_rejects_errors_on_plain_kind() {
        let json = r#"{"kind":"not_found","title":"x","errors":{"amount":["bad"]}}"#;
        let err = serde_json::from_str::<Problem>(json).unwrap_err();
        assert!(err.to_string().contains("field errors are not allowed on"));

        let plain: Problem = serde_json::from_str(r#"{"kind":"not_found","title":"x"}"#).unwrap();
        assert!(plain.errors().is_empty());

        let merged = Problem::merge([&Problem::invalid_field("amount", "bad")]);
        let back: Problem = serde_json::from_str(&serde_json::to_string(&merged).unwrap()).unwrap();
        assert_eq!(back, merged);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ProblemKind::Validation.status_code(), 400);
        assert_eq!(ProblemKind::NotFound.status_code(), 404);
        assert_eq!(ProblemKind::Conflict.status_code(), 409);
        assert_eq!(ProblemKind::Unauthorized.status_code(), 401);
        assert_eq!(ProblemKind::Forbidden.status_code(), 403);
        assert_eq!(ProblemKind::Failure.status_code(), 500);
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let json = serde_json::to_value(Problem::unauthorized("Unauthorized")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"kind": "unauthorized", "title": "Unauthorized"})
        );

        let json = serde_json::to_value(Problem::invalid_field("amount", "bad")).unwrap();
        assert_eq!(json["kind"], "validation");
        assert_eq!(json["errors"]["amount"][0], "bad");
    }

    #[test]
    fn test_display() {
        let p = Problem::conflict("Connection exists", "item 7");
        assert_eq!(p.to_string(), "conflict: Connection exists");
    }
}
