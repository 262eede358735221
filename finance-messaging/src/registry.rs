//! 处理器注册表
//!
//! 命令/查询：按请求的 `TypeId` 索引唯一处理器；
//! 通知：按通知的 `TypeId` 索引处理器列表（可为空，保持注册顺序）。
//! 由 `MediatorBuilder` 一次性填充，`build()` 之后只读。
//!
use crate::{
    behavior::{ErasedOutcome, erase},
    command::Command,
    command_handler::CommandHandler,
    context::DispatchContext,
    error::MediatorError,
    notification::Notification,
    notification_handler::NotificationHandler,
    query::Query,
    query_handler::QueryHandler,
    request::{HandlerContract, RequestDescriptor},
};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

pub(crate) type BoxAnySend = Box<dyn Any + Send>;

pub(crate) type InvokeFuture<'a> = BoxFuture<'a, anyhow::Result<ErasedOutcome>>;

pub(crate) type RequestInvoker =
    Arc<dyn for<'a> Fn(BoxAnySend, &'a DispatchContext) -> InvokeFuture<'a> + Send + Sync>;

pub(crate) type NotifyFuture<'a> = BoxFuture<'a, anyhow::Result<()>>;

pub(crate) type NotificationInvoker = Arc<
    dyn for<'a> Fn(&'a (dyn Any + Send + Sync), &'a DispatchContext) -> NotifyFuture<'a>
        + Send
        + Sync,
>;

/// 命令/查询处理器描述：请求描述 + 绑定好的调用闭包
#[derive(Clone)]
pub(crate) struct HandlerDescriptor {
    pub request: RequestDescriptor,
    pub handler_type: &'static str,
    pub invoker: RequestInvoker,
}

/// 单个通知处理器
#[derive(Clone)]
pub(crate) struct NotificationSlot {
    pub handler_name: String,
    pub invoker: NotificationInvoker,
}

/// 通知描述：名称 + 全部处理器
#[derive(Clone)]
pub(crate) struct NotificationDescriptor {
    pub name: &'static str,
    pub handlers: Vec<NotificationSlot>,
}

#[derive(Default)]
pub(crate) struct HandlerRegistry {
    requests: HashMap<TypeId, HandlerDescriptor>,
    notifications: HashMap<TypeId, NotificationDescriptor>,
}

impl HandlerRegistry {
    pub fn register_command<C, H>(&mut self, handler: Arc<H>) -> Result<(), MediatorError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        let descriptor = HandlerDescriptor {
            request: RequestDescriptor::of::<C>(HandlerContract::for_command::<C>()),
            handler_type: type_name::<H>(),
            invoker: command_invoker::<C, H>(handler),
        };
        self.insert_request(TypeId::of::<C>(), descriptor)
    }

    pub fn register_query<Q, H>(&mut self, handler: Arc<H>) -> Result<(), MediatorError>
    where
        Q: Query,
        H: QueryHandler<Q> + 'static,
    {
        let descriptor = HandlerDescriptor {
            request: RequestDescriptor::of::<Q>(HandlerContract::Query),
            handler_type: type_name::<H>(),
            invoker: query_invoker::<Q, H>(handler),
        };
        self.insert_request(TypeId::of::<Q>(), descriptor)
    }

    pub fn register_notification<N, H>(&mut self, handler: Arc<H>)
    where
        N: Notification,
        H: NotificationHandler<N> + 'static,
    {
        let slot = NotificationSlot {
            handler_name: handler.handler_name().to_string(),
            invoker: notification_invoker::<N, H>(handler),
        };

        self.notifications
            .entry(TypeId::of::<N>())
            .or_insert_with(|| NotificationDescriptor {
                name: N::NAME,
                handlers: Vec::new(),
            })
            .handlers
            .push(slot);
    }

    fn insert_request(
        &mut self,
        key: TypeId,
        descriptor: HandlerDescriptor,
    ) -> Result<(), MediatorError> {
        match self.requests.entry(key) {
            Entry::Occupied(existing) => Err(MediatorError::AlreadyRegistered {
                request: descriptor.request.name(),
                existing: existing.get().request.contract(),
                attempted: descriptor.request.contract(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(descriptor);
                Ok(())
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn insert_raw(&mut self, key: TypeId, descriptor: HandlerDescriptor) {
        self.requests.insert(key, descriptor);
    }

    pub fn request(&self, key: &TypeId) -> Option<&HandlerDescriptor> {
        self.requests.get(key)
    }

    /// 未注册的通知得到空处理器列表
    pub fn notification(&self, key: &TypeId, name: &'static str) -> NotificationDescriptor {
        self.notifications
            .get(key)
            .cloned()
            .unwrap_or_else(|| NotificationDescriptor {
                name,
                handlers: Vec::new(),
            })
    }

    pub fn request_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.requests.values().map(|d| d.request.name()).collect();
        names.sort_unstable();
        names
    }

    pub fn notification_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.notifications.values().map(|d| d.name).collect();
        names.sort_unstable();
        names
    }
}

pub(crate) fn request_invoker<F>(f: F) -> RequestInvoker
where
    F: for<'a> Fn(BoxAnySend, &'a DispatchContext) -> InvokeFuture<'a> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn notify_invoker<F>(f: F) -> NotificationInvoker
where
    F: for<'a> Fn(&'a (dyn Any + Send + Sync), &'a DispatchContext) -> NotifyFuture<'a>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

fn command_invoker<C, H>(handler: Arc<H>) -> RequestInvoker
where
    C: Command,
    H: CommandHandler<C> + 'static,
{
    request_invoker(move |boxed, ctx| {
        let handler = handler.clone();
        async move {
            // 键与闭包出自同一泛型 C，正常情况下不会失败
            let cmd = unbox::<C>(boxed)?;
            let outcome = handler.handle(ctx, cmd).await?;
            Ok(erase(outcome))
        }
        .boxed()
    })
}

fn query_invoker<Q, H>(handler: Arc<H>) -> RequestInvoker
where
    Q: Query,
    H: QueryHandler<Q> + 'static,
{
    request_invoker(move |boxed, ctx| {
        let handler = handler.clone();
        async move {
            let q = unbox::<Q>(boxed)?;
            let outcome = handler.handle(ctx, q).await?;
            Ok(erase(outcome))
        }
        .boxed()
    })
}

fn notification_invoker<N, H>(handler: Arc<H>) -> NotificationInvoker
where
    N: Notification,
    H: NotificationHandler<N> + 'static,
{
    notify_invoker(move |payload, ctx| {
        let handler = handler.clone();
        async move {
            let Some(notification) = payload.downcast_ref::<N>() else {
                return Err(MediatorError::TypeMismatch {
                    expected: N::NAME,
                    found: "unknown",
                }
                .into_chain());
            };
            handler.handle(ctx, notification).await
        }
        .boxed()
    })
}

fn unbox<T: 'static>(boxed: BoxAnySend) -> anyhow::Result<T> {
    boxed.downcast::<T>().map(|v| *v).map_err(|_| {
        MediatorError::TypeMismatch {
            expected: type_name::<T>(),
            found: "unknown",
        }
        .into_chain()
    })
}
