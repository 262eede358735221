use proc_macro::TokenStream;

mod attr;
mod notification;
mod request;
mod utils;

/// 命令宏
/// - 为目标类型实现 `::finance_messaging::request::Request` 与 `::finance_messaging::command::Command`
/// - 合并/追加派生：Debug（可通过 `debug = false` 关闭）
/// - 参数：
///   - `name = "..."`：请求名称，默认类型名
///   - `response = Type`：成功载荷类型，默认 `()`（无返回值的命令）
///   - `debug = true|false`：默认 true
#[proc_macro_attribute]
pub fn command(attr: TokenStream, item: TokenStream) -> TokenStream {
    request::expand(request::Family::Command, attr, item)
}

/// 查询宏
/// - 为目标类型实现 `::finance_messaging::request::Request` 与 `::finance_messaging::query::Query`
/// - 参数同 `#[command]`，但 `response = Type` 必填（查询总是返回数据）
#[proc_macro_attribute]
pub fn query(attr: TokenStream, item: TokenStream) -> TokenStream {
    request::expand(request::Family::Query, attr, item)
}

/// 通知宏
/// - 为目标类型实现 `::finance_messaging::notification::Notification`
/// - 合并/追加派生：Clone, Debug（可通过 `debug = false` 关闭 Debug）
/// - 参数：`name = "..."`（默认类型名）、`debug = true|false`
#[proc_macro_attribute]
pub fn notification(attr: TokenStream, item: TokenStream) -> TokenStream {
    notification::expand(attr, item)
}
