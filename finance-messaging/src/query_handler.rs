use crate::{context::DispatchContext, query::Query};
use async_trait::async_trait;
use finance_results::Outcome;

#[async_trait]
pub trait QueryHandler<Q>: Send + Sync
where
    Q: Query,
{
    async fn handle(&self, ctx: &DispatchContext, q: Q) -> anyhow::Result<Outcome<Q::Response>>;
}
