use crate::{
    behavior::{Next, PipelineBehavior},
    context::DispatchContext,
    request::Request,
};
use async_trait::async_trait;
use finance_results::{Outcome, Validate};
use tracing::debug;

/// 校验行为：请求未通过 `Validate` 时直接返回校验失败，处理器不会执行
#[derive(Clone, Copy, Debug, Default)]
pub struct ValidationBehavior;

#[async_trait]
impl<R> PipelineBehavior<R> for ValidationBehavior
where
    R: Request + Validate,
{
    async fn handle(
        &self,
        _ctx: &DispatchContext,
        request: R,
        next: Next<'_, R>,
    ) -> anyhow::Result<Outcome<R::Response>> {
        if let Some(problem) = request.validation_outcome().into_problem() {
            debug!(
                request = R::NAME,
                fields = problem.errors().len(),
                "request rejected by validation"
            );
            return Ok(Outcome::Failure(problem));
        }

        next.run(request).await
    }
}
