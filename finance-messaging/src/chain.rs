//! 行为链组装
//!
//! 行为以“来源”（工厂）的形式登记，每次登记分配全局递增序号；
//! 组装时取出某请求类型适用的全部来源，按序号排序，先登记者在外层。
//! 链条目（来源列表）可被缓存，行为实例则在每次分发时由来源产生。
//!
use crate::{
    behavior::{BehaviorScope, OpenAdapter, OpenBehavior, PipelineBehavior},
    error::MediatorError,
    request::{Request, RequestDescriptor, RequestKind},
};
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

pub(crate) type BehaviorFactory<R> = Arc<dyn Fn() -> Arc<dyn PipelineBehavior<R>> + Send + Sync>;

pub(crate) type OpenBehaviorFactory = Arc<dyn Fn() -> Arc<dyn OpenBehavior> + Send + Sync>;

/// 请求/响应对的键
pub(crate) type PairKey = (TypeId, TypeId);

pub(crate) fn pair_key<R: Request>() -> PairKey {
    (TypeId::of::<R>(), TypeId::of::<R::Response>())
}

struct TypedSlot {
    seq: u64,
    // BehaviorFactory<R>
    factory: Box<dyn Any + Send + Sync>,
}

struct OpenSlot {
    seq: u64,
    scope: BehaviorScope,
    factory: OpenBehaviorFactory,
}

#[derive(Default)]
pub(crate) struct BehaviorRegistry {
    typed: HashMap<PairKey, Vec<TypedSlot>>,
    open: Vec<OpenSlot>,
    next_seq: u64,
}

impl BehaviorRegistry {
    pub fn add_typed<R: Request>(&mut self, factory: BehaviorFactory<R>) {
        let seq = self.bump();
        self.typed.entry(pair_key::<R>()).or_default().push(TypedSlot {
            seq,
            factory: Box::new(factory),
        });
    }

    pub fn add_open(&mut self, scope: BehaviorScope, factory: OpenBehaviorFactory) {
        let seq = self.bump();
        self.open.push(OpenSlot {
            seq,
            scope,
            factory,
        });
    }

    pub fn len(&self) -> usize {
        self.typed.values().map(Vec::len).sum::<usize>() + self.open.len()
    }

    /// 组装某请求类型的行为来源，按登记顺序排列
    pub fn compose<R: Request>(&self, kind: RequestKind) -> Result<ChainEntry<R>, MediatorError> {
        let mut sources: Vec<(u64, BehaviorSource<R>)> = Vec::new();

        for slot in self.typed.get(&pair_key::<R>()).into_iter().flatten() {
            let Some(factory) = slot.factory.downcast_ref::<BehaviorFactory<R>>() else {
                return Err(MediatorError::TypeMismatch {
                    expected: type_name::<BehaviorFactory<R>>(),
                    found: "unknown",
                });
            };
            sources.push((slot.seq, BehaviorSource::Typed(factory.clone())));
        }

        for slot in self.open.iter().filter(|s| s.scope.matches(kind)) {
            sources.push((slot.seq, BehaviorSource::Open(slot.factory.clone())));
        }

        sources.sort_by_key(|(seq, _)| *seq);

        Ok(ChainEntry {
            sources: sources.into_iter().map(|(_, s)| s).collect(),
        })
    }

    fn bump(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

pub(crate) enum BehaviorSource<R: Request> {
    Typed(BehaviorFactory<R>),
    Open(OpenBehaviorFactory),
}

/// 某请求/响应对的行为链（来源列表）
pub(crate) struct ChainEntry<R: Request> {
    sources: Vec<BehaviorSource<R>>,
}

impl<R: Request> ChainEntry<R> {
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// 由来源产生本次分发使用的行为实例
    pub fn instantiate(&self, descriptor: RequestDescriptor) -> Vec<Arc<dyn PipelineBehavior<R>>> {
        self.sources
            .iter()
            .map(|source| match source {
                BehaviorSource::Typed(factory) => factory(),
                BehaviorSource::Open(factory) => {
                    Arc::new(OpenAdapter::new(factory(), descriptor)) as Arc<dyn PipelineBehavior<R>>
                }
            })
            .collect()
    }
}
