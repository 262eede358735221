//! 结果与问题（finance-results）
//!
//! 命令/查询分发的结果词汇表：
//! - `Outcome`：成功（可携带值）或失败（携带唯一的 `Problem`）；
//! - `Problem`：结构化的业务失败（类别、标题、详情、字段错误）；
//! - `ValidationErrors` / `Validate`：按字段聚合的校验错误。
//!
//! 业务失败通过 `Outcome::Failure` 返回，而不是以运行期错误抛出；
//! 两者在应用层被严格区分。
//!
pub mod outcome;
pub mod problem;
pub mod validation;

pub use outcome::{Outcome, OutcomeStatus};
pub use problem::{FieldErrors, Problem, ProblemKind, UnexpectedFieldErrors};
pub use validation::{Validate, ValidationErrors};
