//! 内置行为
//!
//! - [`LoggingBehavior`]：记录请求开始、结束与耗时；
//! - [`ValidationBehavior`]：对实现了 `Validate` 的请求做前置校验并短路；
//! - [`TimeoutBehavior`]：为请求施加超时，并响应上下文中的取消。
//!
mod logging;
mod timeout;
mod validation;

pub use logging::LoggingBehavior;
pub use timeout::{Interrupted, TimeoutBehavior};
pub use validation::ValidationBehavior;
