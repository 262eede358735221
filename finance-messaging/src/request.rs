//! 请求（Request）
//!
//! 命令与查询的公共抽象：稳定名称与响应载荷类型。
//! 无返回值的命令以 `()` 作为响应类型。
//!
use std::any::{TypeId, type_name};
use std::fmt;

/// 可经由 `Mediator::send` 分发的请求
///
/// 关联常量：
/// - `NAME`：请求的稳定名称，用于日志、追踪与错误信息。避免依赖 `type_name::<T>()`。
pub trait Request: Send + Sync + 'static {
    /// 请求的稳定名称（建议常量字符串，不随重构变化）
    const NAME: &'static str;

    /// 成功时处理器返回的载荷类型
    type Response: Send + 'static;
}

/// 请求类别
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Command,
    Query,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => f.write_str("command"),
            Self::Query => f.write_str("query"),
        }
    }
}

/// 处理器契约族
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandlerContract {
    /// `CommandHandler<C>`，响应为 `()`
    Command,
    /// `CommandHandler<C>`，响应为具体值
    CommandWithResponse,
    /// `QueryHandler<Q>`
    Query,
}

impl HandlerContract {
    pub(crate) fn for_command<R: Request>() -> Self {
        if returns_value::<R>() {
            Self::CommandWithResponse
        } else {
            Self::Command
        }
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Command | Self::CommandWithResponse => RequestKind::Command,
            Self::Query => RequestKind::Query,
        }
    }
}

impl fmt::Display for HandlerContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => f.write_str("CommandHandler<C>"),
            Self::CommandWithResponse => f.write_str("CommandHandler<C, R>"),
            Self::Query => f.write_str("QueryHandler<Q, R>"),
        }
    }
}

/// 请求的静态描述，供行为与日志使用
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestDescriptor {
    name: &'static str,
    contract: HandlerContract,
    request_type: &'static str,
    response_type: &'static str,
    returns_value: bool,
}

impl RequestDescriptor {
    pub(crate) fn of<R: Request>(contract: HandlerContract) -> Self {
        Self {
            name: R::NAME,
            contract,
            request_type: type_name::<R>(),
            response_type: type_name::<R::Response>(),
            returns_value: returns_value::<R>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> RequestKind {
        self.contract.kind()
    }

    pub fn contract(&self) -> HandlerContract {
        self.contract
    }

    pub fn request_type(&self) -> &'static str {
        self.request_type
    }

    /// 响应载荷类型名（无返回值的命令为 `()`）
    pub fn response_type(&self) -> &'static str {
        self.response_type
    }

    pub fn returns_value(&self) -> bool {
        self.returns_value
    }
}

fn returns_value<R: Request>() -> bool {
    TypeId::of::<R::Response>() != TypeId::of::<()>()
}
