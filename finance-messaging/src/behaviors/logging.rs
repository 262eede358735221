use crate::{
    behavior::{ErasedOutcome, OpenBehavior, OpenNext},
    context::DispatchContext,
    request::RequestDescriptor,
};
use async_trait::async_trait;
use finance_results::Outcome;
use std::time::Instant;
use tracing::{info, warn};

/// 请求日志行为：执行前后各记录一条，附带耗时
#[derive(Clone, Copy, Debug, Default)]
pub struct LoggingBehavior;

#[async_trait]
impl OpenBehavior for LoggingBehavior {
    async fn handle(
        &self,
        ctx: &DispatchContext,
        request: &RequestDescriptor,
        next: OpenNext<'_>,
    ) -> anyhow::Result<ErasedOutcome> {
        info!(
            request = request.name(),
            kind = %request.kind(),
            correlation_id = ctx.correlation_id(),
            "handling request"
        );

        let started = Instant::now();
        let result = next.run().await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(Outcome::Success(_)) => {
                info!(request = request.name(), elapsed_ms, "request handled");
            }
            Ok(Outcome::Failure(problem)) => {
                info!(
                    request = request.name(),
                    elapsed_ms,
                    problem = %problem,
                    "request finished with problem"
                );
            }
            Err(error) => {
                warn!(request = request.name(), elapsed_ms, error = %error, "request errored");
            }
        }

        result
    }
}
