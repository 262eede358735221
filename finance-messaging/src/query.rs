//! 应用层查询（Query）
//!
//! 表达只读意图，不改变领域状态，总是返回数据。
//! 一般通过 `#[query(response = T)]` 宏实现。
//!
use crate::request::Request;

/// 查询标记：由且仅由一个 `QueryHandler` 处理
pub trait Query: Request {}
