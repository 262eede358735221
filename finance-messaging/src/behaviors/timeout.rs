use crate::{
    behavior::{ErasedOutcome, OpenBehavior, OpenNext},
    context::DispatchContext,
    request::RequestDescriptor,
};
use async_trait::async_trait;
use std::time::Duration;

/// 请求被中断
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum Interrupted {
    #[error("request {request} timed out after {after:?}")]
    TimedOut {
        request: &'static str,
        after: Duration,
    },

    #[error("request {request} was cancelled")]
    Cancelled { request: &'static str },
}

/// 超时行为
///
/// 在给定时限内未完成即返回 `Interrupted::TimedOut`；
/// 上下文的取消令牌被触发时返回 `Interrupted::Cancelled`。
/// 两种情况下链路的剩余部分都会被丢弃。
#[derive(Clone, Copy, Debug)]
pub struct TimeoutBehavior {
    duration: Duration,
}

impl TimeoutBehavior {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[async_trait]
impl OpenBehavior for TimeoutBehavior {
    async fn handle(
        &self,
        ctx: &DispatchContext,
        request: &RequestDescriptor,
        next: OpenNext<'_>,
    ) -> anyhow::Result<ErasedOutcome> {
        tokio::select! {
            biased;
            _ = ctx.cancellation().cancelled() => {
                Err(Interrupted::Cancelled { request: request.name() }.into())
            }
            result = tokio::time::timeout(self.duration, next.run()) => match result {
                Ok(inner) => inner,
                Err(_) => Err(Interrupted::TimedOut {
                    request: request.name(),
                    after: self.duration,
                }
                .into()),
            },
        }
    }
}
