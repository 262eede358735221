//! 进程内请求分发核心（finance-messaging）
//!
//! 以类型驱动的方式把命令、查询与通知从调用方路由到已注册的处理器：
//! - 请求模型：`Command` / `Query`（均为 `Request`）与 `Notification`；
//! - 处理器注册表：按请求的运行时类型（`TypeId`）索引，启动时一次性构建；
//! - 管道行为：`PipelineBehavior`（单一请求类型）与 `OpenBehavior`（按范围匹配多种请求），
//!   按注册顺序包裹在处理器外层；
//! - 调用缓存：按请求类型缓存处理器描述与行为链，重复分发无需再次解析；
//! - 通知广播：同一通知并发投递给全部订阅者，失败在全部结束后汇总上报；
//! - 门面：`Mediator`（实现 `Dispatcher`），对外提供 `send` / `publish`。
//!
//! 典型用法：
//! 1. 用 `#[command]` / `#[query]` / `#[notification]` 声明请求类型；
//! 2. 实现对应的处理器 trait；
//! 3. 通过 `Mediator::builder()` 注册处理器与行为并 `build()`；
//! 4. 在应用层以 `Dispatcher::send` / `Dispatcher::publish` 分发。
//!
pub mod behavior;
pub mod behaviors;
pub mod command;
pub mod command_handler;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod mediator;
pub mod notification;
pub mod notification_handler;
pub mod query;
pub mod query_handler;
pub mod request;

mod broadcaster;
mod chain;
mod cache;
mod registry;

pub use behavior::{BehaviorScope, ErasedOutcome, Next, OpenBehavior, OpenNext, PipelineBehavior};
pub use command::Command;
pub use command_handler::CommandHandler;
pub use context::DispatchContext;
pub use dispatcher::Dispatcher;
pub use error::{HandlerFailure, MediatorError, PublishFailure};
pub use mediator::{CacheStats, Mediator, MediatorBuilder, MediatorConfig};
pub use notification::{AnyNotification, Notification};
pub use notification_handler::NotificationHandler;
pub use query::Query;
pub use query_handler::QueryHandler;
pub use request::{HandlerContract, Request, RequestDescriptor, RequestKind};

pub use finance_macros::{command, notification, query};
pub use finance_results::{Outcome, Problem, ProblemKind, Validate, ValidationErrors};

// 允许过程宏生成的 ::finance_messaging 路径在本 crate 内部（单元测试）同样可解析
extern crate self as finance_messaging;
