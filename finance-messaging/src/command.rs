//! 应用层命令（Command）
//!
//! 表达“意图”的写操作请求，通常会修改领域状态。
//! - 可以不返回数据（`Response = ()`），也可以返回新建资源的标识等少量数据；
//! - 与 [`Query`](crate::query::Query) 相对，`Command` 应避免读写混用；
//! - 建议保持语义化的“动宾结构”命名，如 `CreateTransaction`、`StoreConnection`。
//!
//! 一般通过 `#[command]` 宏实现，而不是手写。
//!
use crate::request::Request;

/// 命令标记：由且仅由一个 `CommandHandler` 处理
pub trait Command: Request {}
