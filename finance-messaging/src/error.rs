use crate::request::HandlerContract;
use std::fmt;

/// 分发核心错误
///
/// 前三类为配置错误（注册缺失/重复、类型不匹配），与业务失败（`Outcome::Failure`）严格区分；
/// 处理器与行为返回的运行期错误以 `Pipeline` 原样透传。
#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum MediatorError {
    #[error("handler not found: request={request}")]
    HandlerNotFound { request: &'static str },

    #[error("handler already registered: request={request}, existing={existing}, attempted={attempted}")]
    AlreadyRegistered {
        request: &'static str,
        existing: HandlerContract,
        attempted: HandlerContract,
    },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error(transparent)]
    Pipeline(anyhow::Error),

    #[error(transparent)]
    Publish(#[from] PublishFailure),
}

impl MediatorError {
    /// 是否为配置错误（而非运行期错误）
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::HandlerNotFound { .. } | Self::AlreadyRegistered { .. } | Self::TypeMismatch { .. }
        )
    }

    /// 核心在链路内部产生的错误，带上标记后穿过 anyhow
    pub(crate) fn into_chain(self) -> anyhow::Error {
        anyhow::Error::new(CoreError(self))
    }

    /// 链路出口：带标记的核心错误还原为对应变体，其余（含处理器自身的 `MediatorError`）原样包裹
    pub(crate) fn lift(error: anyhow::Error) -> Self {
        match error.downcast::<CoreError>() {
            Ok(CoreError(own)) => own,
            Err(other) => Self::Pipeline(other),
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error(transparent)]
struct CoreError(MediatorError);

/// 通知广播的失败汇总（在全部处理器结束后上报）
#[derive(thiserror::Error, Debug)]
#[error("{count} of {total} handler(s) failed for notification {notification}", count = .failures.len())]
pub struct PublishFailure {
    pub notification: &'static str,
    pub total: usize,
    pub failures: Vec<HandlerFailure>,
}

impl PublishFailure {
    pub fn handler_names(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.handler.as_str())
    }
}

/// 单个通知处理器的失败
pub struct HandlerFailure {
    pub handler: String,
    pub error: anyhow::Error,
}

impl fmt::Debug for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerFailure")
            .field("handler", &self.handler)
            .field("error", &format_args!("{:#}", self.error))
            .finish()
    }
}
