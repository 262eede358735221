use crate::{command::Command, context::DispatchContext};
use async_trait::async_trait;
use finance_results::Outcome;

/// 命令处理器
///
/// 业务失败以 `Outcome::Failure` 返回；`Err` 仅用于预期之外的运行期错误，
/// 会原样穿过分发核心交给调用方。
#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, ctx: &DispatchContext, cmd: C) -> anyhow::Result<Outcome<C::Response>>;
}
