use quote::ToTokens;
use syn::{Attribute, Item, Token};

// 提取非 derive 属性与已有 derive 列表
pub(crate) fn split_derives(attrs: &[Attribute]) -> (Vec<Attribute>, Vec<syn::Path>) {
    let mut retained = Vec::new();
    let mut existing = Vec::new();
    for attr in attrs.iter() {
        if attr.path().is_ident("derive") {
            if let Ok(list) = attr.parse_args_with(
                syn::punctuated::Punctuated::<syn::Path, Token![,]>::parse_terminated,
            ) {
                existing.extend(list);
            }
        } else {
            retained.push(attr.clone());
        }
    }
    (retained, existing)
}

// 合并默认与已有 derive（去重，优先保留 required）
pub(crate) fn merge_derives(existing: Vec<syn::Path>, required: Vec<syn::Path>) -> Option<Attribute> {
    let mut seen = std::collections::HashSet::<String>::new();
    let mut final_list: Vec<syn::Path> = Vec::new();
    for p in required.into_iter().chain(existing) {
        if seen.insert(derive_key(&p)) {
            final_list.push(p);
        }
    }
    if final_list.is_empty() {
        return None;
    }
    Some(syn::parse_quote!(#[derive(#(#final_list),*)]))
}

// 以末段标识归一化，避免 Debug / std::fmt::Debug 重复
pub(crate) fn derive_key(p: &syn::Path) -> String {
    match p.segments.last() {
        Some(last) => last.ident.to_string(),
        None => p.to_token_stream().to_string(),
    }
}

// 直接在 attrs 上应用默认派生合并
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<syn::Path>) {
    let (retained, existing) = split_derives(attrs);
    *attrs = merge_derives(existing, required)
        .into_iter()
        .chain(retained)
        .collect();
}

/// 取出结构体/枚举的属性列表；其它条目返回 None
pub(crate) fn type_attrs_mut(item: &mut Item) -> Option<&mut Vec<Attribute>> {
    match item {
        Item::Struct(st) => Some(&mut st.attrs),
        Item::Enum(en) => Some(&mut en.attrs),
        _ => None,
    }
}

/// 结构体/枚举的名称与泛型
pub(crate) fn type_ident_generics(item: &Item) -> Option<(&syn::Ident, &syn::Generics)> {
    match item {
        Item::Struct(st) => Some((&st.ident, &st.generics)),
        Item::Enum(en) => Some((&en.ident, &en.generics)),
        _ => None,
    }
}
