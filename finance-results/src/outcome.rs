//! 处理结果（Outcome）
//!
//! 命令/查询处理器的返回值：要么成功（携带值，无返回值的命令为 `()`），
//! 要么失败（携带唯一的 `Problem`）。二者互斥，`is_success() == !is_failure()`。
//!
use crate::problem::{FieldErrors, Problem};
use serde::{Deserialize, Serialize};

/// 命令/查询的处理结果
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[must_use]
pub enum Outcome<T = ()> {
    Success(T),
    Failure(Problem),
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Self::Success(value)
    }

    pub fn failure(problem: Problem) -> Self {
        Self::Failure(problem)
    }

    /// 单字段校验失败
    pub fn validation_failed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failure(Problem::invalid_field(field, message))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(v) => Some(v),
            Self::Failure(_) => None,
        }
    }

    pub fn problem(&self) -> Option<&Problem> {
        match self {
            Self::Success(_) => None,
            Self::Failure(p) => Some(p),
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success(v) => Some(v),
            Self::Failure(_) => None,
        }
    }

    pub fn into_problem(self) -> Option<Problem> {
        match self {
            Self::Success(_) => None,
            Self::Failure(p) => Some(p),
        }
    }

    pub fn into_result(self) -> Result<T, Problem> {
        self.into()
    }

    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success(v) => Outcome::Success(f(v)),
            Self::Failure(p) => Outcome::Failure(p),
        }
    }

    pub fn and_then<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Outcome<U>,
    {
        match self {
            Self::Success(v) => f(v),
            Self::Failure(p) => Outcome::Failure(p),
        }
    }

    /// 丢弃成功值，仅保留成败状态
    pub fn discard(self) -> Outcome<()> {
        self.map(|_| ())
    }
}

impl Outcome<()> {
    /// 合并多个结果（全有或全无）：
    /// - 全部成功 => `Success(())`；
    /// - 任一失败 => 单个 `Problem`，字段错误为所有失败的并集。
    ///
    /// 不同值类型的结果可通过 `&dyn OutcomeStatus` 一起合并。
    pub fn merge<'a, I, S>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = &'a S>,
        S: OutcomeStatus + ?Sized + 'a,
    {
        let problems: Vec<&Problem> = outcomes
            .into_iter()
            .filter_map(|o| o.problem())
            .collect();

        if problems.is_empty() {
            return Self::Success(());
        }

        Self::Failure(Problem::merge(problems))
    }

    /// 由字段错误得到结果：为空视为成功
    pub fn from_field_errors(errors: FieldErrors) -> Self {
        if errors.is_empty() {
            return Self::Success(());
        }
        Self::Failure(Problem::validation(
            crate::problem::VALIDATION_TITLE,
            crate::problem::ERRORS_DETAIL,
            errors,
        ))
    }
}

impl<T> From<Problem> for Outcome<T> {
    fn from(problem: Problem) -> Self {
        Self::Failure(problem)
    }
}

impl<T> From<Result<T, Problem>> for Outcome<T> {
    fn from(result: Result<T, Problem>) -> Self {
        match result {
            Ok(v) => Self::Success(v),
            Err(p) => Self::Failure(p),
        }
    }
}

impl<T> From<Outcome<T>> for Result<T, Problem> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::Success(v) => Ok(v),
            Outcome::Failure(p) => Err(p),
        }
    }
}

/// 与值类型无关的成败视图，用于合并不同 `T` 的结果
pub trait OutcomeStatus {
    fn problem(&self) -> Option<&Problem>;

    fn is_failure(&self) -> bool {
        self.problem().is_some()
    }
}

impl<T> OutcomeStatus for Outcome<T> {
    fn problem(&self) -> Option<&Problem> {
        Outcome::problem(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ProblemKind;

    #[test]
    fn test_success_and_failure_are_exclusive() {
        let ok: Outcome<u32> = Outcome::success(7);
        assert!(ok.is_success());
        assert!(!ok.is_failure());
        assert_eq!(ok.value(), Some(&7));
        assert!(ok.problem().is_none());

        let failed: Outcome<u32> = Problem::not_found("nope").into();
        assert!(failed.is_failure());
        assert!(!failed.is_success());
        assert!(failed.value().is_none());
        assert_eq!(failed.problem().map(Problem::kind), Some(ProblemKind::NotFound));
    }

    #[test]
    fn test_result_conversions() {
        let ok: Result<u32, Problem> = Outcome::success(1).into_result();
        assert_eq!(ok, Ok(1));

        let outcome: Outcome<u32> = Err(Problem::unauthorized("no")).into();
        assert!(outcome.is_failure());
    }

    #[test]
    fn test_map_and_then() {
        let doubled = Outcome::success(21).map(|v| v * 2);
        assert_eq!(doubled, Outcome::Success(42));

        let chained: Outcome<u32> =
            Outcome::success(1).and_then(|_| Outcome::failure(Problem::failure("x", "y")));
        assert!(chained.is_failure());

        let untouched: Outcome<u32> = Outcome::<u32>::failure(Problem::failure("x", "y")).map(|v| v + 1);
        assert!(untouched.is_failure());
    }

    // 合并：[Success, Failure(A), Failure(B)] => 单个失败，字段错误为并集
    #[test]
    fn test_merge_success_and_two_failures() {
        let outcomes: [Outcome; 3] = [
            Outcome::success(()),
            Outcome::validation_failed("amount", "must be positive"),
            Outcome::validation_failed("description", "required"),
        ];

        let merged = Outcome::merge(&outcomes);
        let problem = merged.problem().expect("merged failure");
        assert_eq!(problem.errors().len(), 2);
        assert_eq!(problem.errors()["amount"], vec!["must be positive".to_string()]);
        assert_eq!(problem.errors()["description"], vec!["required".to_string()]);
    }

    #[test]
    fn test_merge_all_success() {
        let outcomes: [Outcome; 2] = [Outcome::success(()), Outcome::success(())];
        assert_eq!(Outcome::merge(&outcomes), Outcome::Success(()));

        let empty: [Outcome; 0] = [];
        assert!(Outcome::merge(&empty).is_success());
    }

    // 不同值类型的结果通过 trait 对象合并
    #[test]
    fn test_merge_heterogeneous() {
        let a: Outcome<u32> = Outcome::success(1);
        let b: Outcome<String> = Outcome::validation_failed("name", "too short");
        let merged = Outcome::merge([&a as &dyn OutcomeStatus, &b]);
        assert!(merged.is_failure());
    }

    #[test]
    fn test_from_field_errors() {
        assert!(Outcome::from_field_errors(FieldErrors::new()).is_success());

        let mut errors = FieldErrors::new();
        errors.insert("amount".into(), vec!["bad".into()]);
        let outcome = Outcome::from_field_errors(errors);
        assert_eq!(
            outcome.problem().map(Problem::kind),
            Some(ProblemKind::Validation)
        );
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Outcome::success(5u32)).unwrap();
        assert_eq!(json, serde_json::json!({"success": 5}));

        let back: Outcome<u32> = serde_json::from_value(json).unwrap();
        assert_eq!(back, Outcome::Success(5));
    }
}
