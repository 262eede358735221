//! 中介者（Mediator）
//!
//! 分发核心的门面：持有处理器注册表、行为登记与调用缓存，
//! 以 `Arc` 共享，克隆代价低，可在各调用方之间自由传递。
//!
use crate::{
    behavior::{BehaviorScope, Next, OpenBehavior, PipelineBehavior},
    broadcaster,
    cache::InvocationCache,
    chain::BehaviorRegistry,
    command::Command,
    command_handler::CommandHandler,
    context::DispatchContext,
    dispatcher::Dispatcher,
    error::MediatorError,
    notification::{AnyNotification, Notification},
    notification_handler::NotificationHandler,
    query::Query,
    query_handler::QueryHandler,
    registry::{HandlerDescriptor, HandlerRegistry},
    request::Request,
};
use async_trait::async_trait;
use finance_results::Outcome;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tracing::{Instrument, Span, debug, debug_span, error, field};

pub use crate::cache::CacheStats;

/// 中介者配置
#[derive(Clone, Copy, Debug)]
pub struct MediatorConfig {
    /// 是否缓存解析结果（处理器描述、行为链、通知描述）
    pub cache_invocations: bool,
    /// 单个通知的处理器并发上限；`None` 表示全部同时启动
    pub notification_concurrency: Option<usize>,
}

impl Default for MediatorConfig {
    fn default() -> Self {
        Self {
            cache_invocations: true,
            notification_concurrency: None,
        }
    }
}

/// 中介者构建器
///
/// 处理器与行为只能在构建阶段注册，`build()` 之后注册表只读。
#[derive(Default)]
pub struct MediatorBuilder {
    handlers: HandlerRegistry,
    behaviors: BehaviorRegistry,
    config: MediatorConfig,
}

impl MediatorBuilder {
    /// 注册命令处理器；同一请求类型重复注册返回 `AlreadyRegistered`
    pub fn command_handler<C, H>(mut self, handler: Arc<H>) -> Result<Self, MediatorError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        self.handlers.register_command::<C, H>(handler)?;
        Ok(self)
    }

    /// 注册查询处理器；同一请求类型重复注册返回 `AlreadyRegistered`
    pub fn query_handler<Q, H>(mut self, handler: Arc<H>) -> Result<Self, MediatorError>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        self.handlers.register_query::<Q, H>(handler)?;
        Ok(self)
    }

    /// 注册通知处理器；同一通知可注册任意多个
    pub fn notification_handler<N, H>(mut self, handler: Arc<H>) -> Self
    where
        N: Notification,
        H: NotificationHandler<N> + 'static,
    {
        self.handlers.register_notification::<N, H>(handler);
        self
    }

    /// 注册单一请求类型的行为（共享实例）
    pub fn behavior<R, B>(self, behavior: Arc<B>) -> Self
    where
        R: Request,
        B: PipelineBehavior<R> + 'static,
    {
        self.scoped_behavior::<R, _, _>(move || behavior.clone())
    }

    /// 注册单一请求类型的行为（每次分发由工厂产生新实例）
    pub fn scoped_behavior<R, F, B>(mut self, factory: F) -> Self
    where
        R: Request,
        F: Fn() -> Arc<B> + Send + Sync + 'static,
        B: PipelineBehavior<R> + 'static,
    {
        self.behaviors
            .add_typed::<R>(Arc::new(move || factory() as Arc<dyn PipelineBehavior<R>>));
        self
    }

    /// 注册开放行为（共享实例），按范围匹配请求
    pub fn open_behavior<B>(self, scope: BehaviorScope, behavior: Arc<B>) -> Self
    where
        B: OpenBehavior + 'static,
    {
        self.scoped_open_behavior(scope, move || behavior.clone())
    }

    /// 注册开放行为（每次分发由工厂产生新实例）
    pub fn scoped_open_behavior<F, B>(mut self, scope: BehaviorScope, factory: F) -> Self
    where
        F: Fn() -> Arc<B> + Send + Sync + 'static,
        B: OpenBehavior + 'static,
    {
        self.behaviors
            .add_open(scope, Arc::new(move || factory() as Arc<dyn OpenBehavior>));
        self
    }

    pub fn config(mut self, config: MediatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Mediator {
        Mediator {
            inner: Arc::new(MediatorInner {
                cache: InvocationCache::new(self.config.cache_invocations),
                handlers: self.handlers,
                behaviors: self.behaviors,
                config: self.config,
            }),
        }
    }

    #[cfg(test)]
    pub(crate) fn handlers_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.handlers
    }
}

struct MediatorInner {
    handlers: HandlerRegistry,
    behaviors: BehaviorRegistry,
    cache: InvocationCache,
    config: MediatorConfig,
}

/// 进程内中介者
#[derive(Clone)]
pub struct Mediator {
    inner: Arc<MediatorInner>,
}

impl Mediator {
    pub fn builder() -> MediatorBuilder {
        MediatorBuilder::default()
    }

    pub fn config(&self) -> MediatorConfig {
        self.inner.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    /// 已注册的命令/查询名称（按名称排序）
    pub fn registered_requests(&self) -> Vec<&'static str> {
        self.inner.handlers.request_names()
    }

    /// 已注册至少一个处理器的通知名称（按名称排序）
    pub fn registered_notifications(&self) -> Vec<&'static str> {
        self.inner.handlers.notification_names()
    }

    /// 已登记的行为数（类型化 + 开放）
    pub fn behavior_count(&self) -> usize {
        self.inner.behaviors.len()
    }

    pub async fn send<R>(&self, ctx: &DispatchContext, request: R) -> Result<Outcome<R::Response>, MediatorError>
    where
        R: Request,
    {
        let span = debug_span!(
            "mediator.send",
            request = R::NAME,
            kind = field::Empty,
            behaviors = field::Empty
        );
        self.dispatch(ctx, request).instrument(span).await
    }

    pub async fn publish<N>(&self, ctx: &DispatchContext, notification: N) -> Result<(), MediatorError>
    where
        N: Notification,
    {
        self.broadcast(ctx, TypeId::of::<N>(), N::NAME, &notification)
            .await
    }

    pub async fn publish_dyn(
        &self,
        ctx: &DispatchContext,
        notification: &dyn AnyNotification,
    ) -> Result<(), MediatorError> {
        let payload = notification.as_any();
        self.broadcast(ctx, payload.type_id(), notification.notification_name(), payload)
            .await
    }

    async fn dispatch<R>(&self, ctx: &DispatchContext, request: R) -> Result<Outcome<R::Response>, MediatorError>
    where
        R: Request,
    {
        let handler = self.resolve_handler::<R>()?;
        let descriptor = handler.request;
        Span::current().record("kind", field::display(descriptor.kind()));

        let chain = self
            .inner
            .cache
            .chain::<R, _>(|| self.inner.behaviors.compose::<R>(descriptor.kind()))?;
        Span::current().record("behaviors", chain.len());
        let behaviors = chain.instantiate(descriptor);

        Next::new(ctx, &behaviors, &handler.invoker)
            .run(request)
            .await
            .map_err(MediatorError::lift)
    }

    fn resolve_handler<R: Request>(&self) -> Result<Arc<HandlerDescriptor>, MediatorError> {
        let key = TypeId::of::<R>();
        self.inner.cache.handler(key, || {
            let Some(found) = self.inner.handlers.request(&key) else {
                error!(request = R::NAME, "no handler registered for request");
                return Err(MediatorError::HandlerNotFound { request: R::NAME });
            };
            debug!(
                request = R::NAME,
                handler = found.handler_type,
                contract = %found.request.contract(),
                "resolved handler"
            );
            Ok(found.clone())
        })
    }

    async fn broadcast(
        &self,
        ctx: &DispatchContext,
        key: TypeId,
        name: &'static str,
        payload: &(dyn Any + Send + Sync),
    ) -> Result<(), MediatorError> {
        let span = debug_span!("mediator.publish", notification = name, handlers = field::Empty);
        self.fan_out(ctx, key, name, payload).instrument(span).await
    }

    async fn fan_out(
        &self,
        ctx: &DispatchContext,
        key: TypeId,
        name: &'static str,
        payload: &(dyn Any + Send + Sync),
    ) -> Result<(), MediatorError> {
        let descriptor = self
            .inner
            .cache
            .notification(key, || self.inner.handlers.notification(&key, name))?;
        Span::current().record("handlers", descriptor.handlers.len());

        broadcaster::broadcast(
            &descriptor,
            payload,
            ctx,
            self.inner.config.notification_concurrency,
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Dispatcher for Mediator {
    async fn send<R>(&self, ctx: &DispatchContext, request: R) -> Result<Outcome<R::Response>, MediatorError>
    where
        R: Request,
    {
        Mediator::send(self, ctx, request).await
    }

    async fn publish<N>(&self, ctx: &DispatchContext, notification: N) -> Result<(), MediatorError>
    where
        N: Notification,
    {
        Mediator::publish(self, ctx, notification).await
    }

    async fn publish_dyn(
        &self,
        ctx: &DispatchContext,
        notification: &dyn AnyNotification,
    ) -> Result<(), MediatorError> {
        Mediator::publish_dyn(self, ctx, notification).await
    }
}
