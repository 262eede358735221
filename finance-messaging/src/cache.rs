//! 调用缓存
//!
//! 首次分发某请求类型时解析出的处理器描述、行为链条目与通知描述会被缓存，
//! 之后的分发直接复用。并发首次填充时允许重复解析，以先写入者为准；
//! 关闭缓存时每次都重新解析，结果与缓存命中时一致。
//!
use crate::{
    chain::{ChainEntry, PairKey, pair_key},
    error::MediatorError,
    registry::{HandlerDescriptor, NotificationDescriptor},
    request::Request,
};
use dashmap::DashMap;
use std::any::{Any, TypeId, type_name};
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// 缓存统计
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// 当前缓存的条目总数（处理器 + 行为链 + 通知）
    pub entries: usize,
}

pub(crate) struct InvocationCache {
    enabled: bool,
    handlers: DashMap<TypeId, Arc<HandlerDescriptor>>,
    chains: DashMap<PairKey, Arc<dyn Any + Send + Sync>>,
    notifications: DashMap<TypeId, Arc<NotificationDescriptor>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InvocationCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            handlers: DashMap::new(),
            chains: DashMap::new(),
            notifications: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn handler<F>(&self, key: TypeId, resolve: F) -> Result<Arc<HandlerDescriptor>, MediatorError>
    where
        F: FnOnce() -> Result<HandlerDescriptor, MediatorError>,
    {
        self.get_or_resolve(&self.handlers, key, "handler", || resolve().map(Arc::new))
    }

    pub fn chain<R, F>(&self, resolve: F) -> Result<Arc<ChainEntry<R>>, MediatorError>
    where
        R: Request,
        F: FnOnce() -> Result<ChainEntry<R>, MediatorError>,
    {
        let erased = self.get_or_resolve(&self.chains, pair_key::<R>(), "chain", || {
            resolve().map(|entry| Arc::new(entry) as Arc<dyn Any + Send + Sync>)
        })?;

        erased
            .downcast::<ChainEntry<R>>()
            .map_err(|_| MediatorError::TypeMismatch {
                expected: type_name::<ChainEntry<R>>(),
                found: "unknown",
            })
    }

    pub fn notification<F>(&self, key: TypeId, resolve: F) -> Result<Arc<NotificationDescriptor>, MediatorError>
    where
        F: FnOnce() -> NotificationDescriptor,
    {
        self.get_or_resolve(&self.notifications, key, "notification", || Ok(Arc::new(resolve())))
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.handlers.len() + self.chains.len() + self.notifications.len(),
        }
    }

    fn get_or_resolve<K, V, F>(
        &self,
        map: &DashMap<K, V>,
        key: K,
        what: &'static str,
        resolve: F,
    ) -> Result<V, MediatorError>
    where
        K: Eq + Hash,
        V: Clone,
        F: FnOnce() -> Result<V, MediatorError>,
    {
        if !self.enabled {
            return resolve();
        }

        // 取出后立即释放分片锁，解析期间不持有
        if let Some(hit) = map.get(&key).map(|e| e.value().clone()) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(hit);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        trace!(cache = what, "invocation cache miss");

        let resolved = resolve()?;
        Ok(map.entry(key).or_insert(resolved).value().clone())
    }
}
