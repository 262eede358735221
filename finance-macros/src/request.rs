use crate::attr::MessageAttrConfig;
use crate::utils::{apply_derives, type_attrs_mut, type_ident_generics};
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Item, parse_macro_input};

#[derive(Clone, Copy)]
pub(crate) enum Family {
    Command,
    Query,
}

impl Family {
    fn macro_name(&self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Query => "query",
        }
    }
}

/// #[command] / #[query] 宏实现
/// - 支持结构体（具名、tuple 或单元）与枚举
/// - 实现 `Request`（NAME、Response）与对应的标记 trait
pub(crate) fn expand(family: Family, attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as MessageAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    let response: syn::Type = match (family, cfg.response) {
        (_, Some(ty)) => ty,
        (Family::Command, None) => syn::parse_quote!(()),
        (Family::Query, None) => {
            return syn::Error::new(
                proc_macro2::Span::call_site(),
                "#[query] requires 'response = Type'",
            )
            .to_compile_error()
            .into();
        }
    };

    let mut required: Vec<syn::Path> = Vec::new();
    if cfg.debug.unwrap_or(true) {
        required.push(syn::parse_quote!(Debug));
    }

    let Some(attrs) = type_attrs_mut(&mut input) else {
        return syn::Error::new(
            input.span(),
            format!("#[{}] only supports struct or enum", family.macro_name()),
        )
        .to_compile_error()
        .into();
    };
    apply_derives(attrs, required);

    let Some((ident, generics)) = type_ident_generics(&input) else {
        return TokenStream::new();
    };
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let name = cfg
        .name
        .unwrap_or_else(|| syn::LitStr::new(&ident.to_string(), ident.span()));

    let marker = match family {
        Family::Command => quote!(::finance_messaging::command::Command),
        Family::Query => quote!(::finance_messaging::query::Query),
    };

    let out = quote! {
        #input

        impl #impl_generics ::finance_messaging::request::Request for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
            type Response = #response;
        }

        impl #impl_generics #marker for #ident #ty_generics #where_clause {}
    };

    TokenStream::from(out)
}
