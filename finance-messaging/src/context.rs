use bon::Builder;
use tokio_util::sync::CancellationToken;

/// 分发上下文（Dispatch Context）
///
/// 随一次 `send` / `publish` 原样传递给每个行为与处理器的横切信息：
/// - 取消令牌（`cancellation`）：调用方取消后，处理器与行为可据此提前结束；
///   分发核心本身不施加超时，也不主动检查取消；
/// - 关联追踪 `correlation_id` 与执行者 `actor_id`（可选）。
///
/// 典型用法：
/// ```rust
/// use finance_messaging::DispatchContext;
///
/// let ctx = DispatchContext::builder()
///     .correlation_id("cor-123".into())
///     .actor_id("u-1".into())
///     .build();
/// assert_eq!(ctx.correlation_id(), Some("cor-123"));
/// assert!(!ctx.is_cancelled());
/// ```
#[derive(Builder, Clone, Debug, Default)]
pub struct DispatchContext {
    #[builder(default)]
    cancellation: CancellationToken,
    correlation_id: Option<String>,
    actor_id: Option<String>,
}

impl DispatchContext {
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn actor_id(&self) -> Option<&str> {
        self.actor_id.as_deref()
    }

    /// 替换取消令牌（例如派生子令牌）
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }
}
