//! 通知（Notification）
//!
//! 表达“已经发生的事实”，可有零个、一个或多个订阅者；
//! 仅在进程内尽力投递，不持久化，订阅者之间无顺序保证。
//!
use std::any::Any;

pub trait Notification: Send + Sync + 'static {
    /// 通知的稳定名称
    const NAME: &'static str;
}

/// 类型擦除后的通知视图
///
/// 以 `&dyn AnyNotification` 发布时，按其背后的具体运行时类型查找订阅者。
pub trait AnyNotification: Send + Sync {
    fn as_any(&self) -> &(dyn Any + Send + Sync);

    fn notification_name(&self) -> &'static str;
}

impl<N: Notification> AnyNotification for N {
    fn as_any(&self) -> &(dyn Any + Send + Sync) {
        self
    }

    fn notification_name(&self) -> &'static str {
        N::NAME
    }
}
