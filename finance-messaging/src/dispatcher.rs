use crate::{
    context::DispatchContext,
    error::MediatorError,
    notification::{AnyNotification, Notification},
    request::Request,
};
use async_trait::async_trait;
use finance_results::Outcome;

/// 分发器（Dispatcher）
///
/// - 应用层通过它发送命令/查询、发布通知，而不直接依赖具体处理器；
/// - 该 trait 带有泛型方法，通常以具体实现类型（如 `Mediator`）注入使用。
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// 发送命令或查询到其唯一处理器（途经行为链）
    ///
    /// - 未注册处理器：返回 `MediatorError::HandlerNotFound`，任何行为都不会执行；
    /// - 业务失败：`Ok(Outcome::Failure(..))`；
    /// - 处理器/行为的运行期错误：原样以 `MediatorError::Pipeline` 返回。
    async fn send<R>(&self, ctx: &DispatchContext, request: R) -> Result<Outcome<R::Response>, MediatorError>
    where
        R: Request;

    /// 发布通知给全部订阅者（可能为零个）
    async fn publish<N>(&self, ctx: &DispatchContext, notification: N) -> Result<(), MediatorError>
    where
        N: Notification;

    /// 以 trait 对象发布通知，按其背后的具体类型查找订阅者
    async fn publish_dyn(
        &self,
        ctx: &DispatchContext,
        notification: &dyn AnyNotification,
    ) -> Result<(), MediatorError>;
}
