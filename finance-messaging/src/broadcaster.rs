//! 通知广播
//!
//! 同一通知的全部处理器一起启动、并发执行，并且全部运行到结束：
//! 个别处理器失败（包括 panic）不会中断其它处理器，失败在全部结束后汇总上报。
//! 不派生任务，所有处理器的 future 都不会比 `publish` 调用活得更久。
//!
use crate::{
    context::DispatchContext,
    error::{HandlerFailure, PublishFailure},
    registry::{NotificationDescriptor, NotificationSlot},
};
use futures_util::future::join_all;
use futures_util::{FutureExt, StreamExt, stream};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::warn;

pub(crate) async fn broadcast(
    descriptor: &NotificationDescriptor,
    payload: &(dyn Any + Send + Sync),
    ctx: &DispatchContext,
    concurrency: Option<usize>,
) -> Result<(), PublishFailure> {
    let total = descriptor.handlers.len();
    if total == 0 {
        return Ok(());
    }

    let runs: Vec<_> = descriptor
        .handlers
        .iter()
        .map(|slot| run_one(slot, payload, ctx))
        .collect();

    let results: Vec<(&NotificationSlot, anyhow::Result<()>)> = match concurrency {
        Some(limit) => stream::iter(runs).buffer_unordered(limit.max(1)).collect().await,
        None => join_all(runs).await,
    };

    let failures: Vec<HandlerFailure> = results
        .into_iter()
        .filter_map(|(slot, result)| {
            let error = result.err()?;
            warn!(
                notification = descriptor.name,
                handler = %slot.handler_name,
                error = %error,
                "notification handler failed"
            );
            Some(HandlerFailure {
                handler: slot.handler_name.clone(),
                error,
            })
        })
        .collect();

    if failures.is_empty() {
        return Ok(());
    }

    Err(PublishFailure {
        notification: descriptor.name,
        total,
        failures,
    })
}

async fn run_one<'a>(
    slot: &'a NotificationSlot,
    payload: &'a (dyn Any + Send + Sync),
    ctx: &'a DispatchContext,
) -> (&'a NotificationSlot, anyhow::Result<()>) {
    let result = AssertUnwindSafe(async { (slot.invoker)(payload, ctx).await })
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(anyhow::anyhow!("handler panicked: {}", panic_message(&*panic))));
    (slot, result)
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
