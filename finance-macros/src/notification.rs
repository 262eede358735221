use crate::attr::MessageAttrConfig;
use crate::utils::{apply_derives, type_attrs_mut, type_ident_generics};
use proc_macro::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Item, parse_macro_input};

/// #[notification] 宏实现
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as MessageAttrConfig);
    if let Err(err) = cfg.reject_response("notification") {
        return err.to_compile_error().into();
    }

    let mut input = parse_macro_input!(item as Item);

    let mut required: Vec<syn::Path> = vec![syn::parse_quote!(Clone)];
    if cfg.debug.unwrap_or(true) {
        required.insert(0, syn::parse_quote!(Debug));
    }

    let Some(attrs) = type_attrs_mut(&mut input) else {
        return syn::Error::new(input.span(), "#[notification] only supports struct or enum")
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

    let out = quote! {
        #input

        impl #impl_generics ::finance_messaging::notification::Notification for #ident #ty_generics #where_clause {
            const NAME: &'static str = #name;
        }
    };

    TokenStream::from(out)
}
