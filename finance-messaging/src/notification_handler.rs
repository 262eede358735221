//! 通知处理器（NotificationHandler）
//!
//! 同一通知的全部处理器会被并发调用，彼此独立；
//! 某个处理器失败不会中断其它处理器。
//!
use crate::{context::DispatchContext, notification::Notification};
use async_trait::async_trait;

#[async_trait]
pub trait NotificationHandler<N>: Send + Sync
where
    N: Notification,
{
    /// 处理器名称（用于失败汇总与日志）
    fn handler_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn handle(&self, ctx: &DispatchContext, notification: &N) -> anyhow::Result<()>;
}
