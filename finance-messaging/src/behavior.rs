//! 管道行为（Pipeline Behavior）
//!
//! 行为是包裹在处理器外层的拦截器，按注册顺序组成一条链：
//! 先注册者位于最外层、最先执行，最后注册者紧邻处理器。
//!
//! 行为可以：
//! - 在调用 `next.run(..)` 之前检查或替换请求；
//! - 在其之后检查或替换结果；
//! - 不调用 `next` 直接返回（短路），此时处理器不会执行；
//! - 返回错误，错误原样交给调用方。
//!
//! 两种形式：
//! - [`PipelineBehavior<R>`]：面向单一请求类型，可访问强类型的请求与结果；
//! - [`OpenBehavior`]：按 [`BehaviorScope`] 匹配多种请求，只能看到请求描述与类型擦除后的结果。
//!
use crate::{
    context::DispatchContext,
    error::MediatorError,
    registry::RequestInvoker,
    request::{Request, RequestDescriptor, RequestKind},
};
use async_trait::async_trait;
use finance_results::Outcome;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::any::{Any, type_name};
use std::sync::Arc;

/// 类型擦除后的处理结果
pub type ErasedOutcome = Outcome<Box<dyn Any + Send>>;

/// 单一请求类型的行为
#[async_trait]
pub trait PipelineBehavior<R>: Send + Sync
where
    R: Request,
{
    async fn handle(
        &self,
        ctx: &DispatchContext,
        request: R,
        next: Next<'_, R>,
    ) -> anyhow::Result<Outcome<R::Response>>;
}

/// 链路中剩余部分（其余行为 + 处理器）的续延
pub struct Next<'a, R: Request> {
    ctx: &'a DispatchContext,
    behaviors: &'a [Arc<dyn PipelineBehavior<R>>],
    invoker: &'a RequestInvoker,
}

impl<'a, R: Request> Next<'a, R> {
    pub(crate) fn new(
        ctx: &'a DispatchContext,
        behaviors: &'a [Arc<dyn PipelineBehavior<R>>],
        invoker: &'a RequestInvoker,
    ) -> Self {
        Self {
            ctx,
            behaviors,
            invoker,
        }
    }

    /// 剩余行为数（不含处理器）
    pub fn remaining(&self) -> usize {
        self.behaviors.len()
    }

    /// 继续执行链路
    pub fn run(self, request: R) -> BoxFuture<'a, anyhow::Result<Outcome<R::Response>>> {
        match self.behaviors.split_first() {
            Some((head, rest)) => {
                let next = Next::new(self.ctx, rest, self.invoker);
                head.handle(self.ctx, request, next)
            }
            None => {
                let ctx = self.ctx;
                let invoker = self.invoker;
                async move {
                    let erased = invoker(Box::new(request), ctx).await?;
                    restore::<R::Response>(erased)
                }
                .boxed()
            }
        }
    }
}

/// 行为的适用范围（仅用于 [`OpenBehavior`]）
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BehaviorScope {
    #[default]
    All,
    Commands,
    Queries,
}

impl BehaviorScope {
    pub fn matches(&self, kind: RequestKind) -> bool {
        match self {
            Self::All => true,
            Self::Commands => kind == RequestKind::Command,
            Self::Queries => kind == RequestKind::Query,
        }
    }
}

/// 面向多种请求类型的行为
///
/// 看到的是请求描述（名称、类别、类型名）与类型擦除后的结果；
/// 可以短路返回 `Outcome::Failure`，但不能替换请求本身。
#[async_trait]
pub trait OpenBehavior: Send + Sync {
    async fn handle(
        &self,
        ctx: &DispatchContext,
        request: &RequestDescriptor,
        next: OpenNext<'_>,
    ) -> anyhow::Result<ErasedOutcome>;
}

type OpenContinuation<'a> =
    Box<dyn FnOnce() -> BoxFuture<'a, anyhow::Result<ErasedOutcome>> + Send + 'a>;

/// [`OpenBehavior`] 的续延
pub struct OpenNext<'a> {
    inner: OpenContinuation<'a>,
}

impl<'a> OpenNext<'a> {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> BoxFuture<'a, anyhow::Result<ErasedOutcome>> + Send + 'a,
    {
        Self { inner: Box::new(f) }
    }

    pub fn run(self) -> BoxFuture<'a, anyhow::Result<ErasedOutcome>> {
        (self.inner)()
    }
}

/// 将 `OpenBehavior` 适配为任意请求类型的 `PipelineBehavior`
pub(crate) struct OpenAdapter {
    inner: Arc<dyn OpenBehavior>,
    descriptor: RequestDescriptor,
}

impl OpenAdapter {
    pub(crate) fn new(inner: Arc<dyn OpenBehavior>, descriptor: RequestDescriptor) -> Self {
        Self { inner, descriptor }
    }
}

#[async_trait]
impl<R> PipelineBehavior<R> for OpenAdapter
where
    R: Request,
{
    async fn handle(
        &self,
        ctx: &DispatchContext,
        request: R,
        next: Next<'_, R>,
    ) -> anyhow::Result<Outcome<R::Response>> {
        let forward = OpenNext::new(move || {
            async move {
                let outcome = next.run(request).await?;
                Ok(erase(outcome))
            }
            .boxed()
        });

        let erased = self.inner.handle(ctx, &self.descriptor, forward).await?;
        restore::<R::Response>(erased)
    }
}

pub(crate) fn erase<T: Send + 'static>(outcome: Outcome<T>) -> ErasedOutcome {
    outcome.map(|v| Box::new(v) as Box<dyn Any + Send>)
}

/// 还原类型擦除的结果；成功值类型不符时报告 `TypeMismatch`
pub(crate) fn restore<T: 'static>(erased: ErasedOutcome) -> anyhow::Result<Outcome<T>> {
    match erased {
        Outcome::Success(value) => match value.downcast::<T>() {
            Ok(v) => Ok(Outcome::Success(*v)),
            Err(_) => Err(MediatorError::TypeMismatch {
                expected: type_name::<T>(),
                found: "unknown",
            }
            .into_chain()),
        },
        Outcome::Failure(problem) => Ok(Outcome::Failure(problem)),
    }
}
