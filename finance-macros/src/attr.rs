use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Ident, LitBool, LitStr, Result, Token, Type, parse::Parse, parse::ParseStream};

/// 宏参数：`name = "..."`、`response = Type`、`debug = bool`
#[derive(Default)]
pub(crate) struct MessageAttrConfig {
    pub name: Option<LitStr>,
    pub response: Option<Type>,
    pub debug: Option<bool>,
}

impl MessageAttrConfig {
    /// 拒绝当前宏不支持的键
    pub fn reject_response(&self, macro_name: &str) -> Result<()> {
        match &self.response {
            Some(ty) => Err(syn::Error::new(
                ty.span(),
                format!("#[{macro_name}] does not accept 'response'"),
            )),
            None => Ok(()),
        }
    }
}

impl Parse for MessageAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self::default();

        if input.is_empty() {
            return Ok(cfg);
        }

        let pairs: Punctuated<MessageAttrElem, Token![,]> = Punctuated::parse_terminated(input)?;

        for elem in pairs {
            match elem {
                MessageAttrElem::Name(key, lit) => {
                    if cfg.name.is_some() {
                        return Err(duplicate(&key));
                    }
                    cfg.name = Some(lit);
                }
                MessageAttrElem::Response(key, ty) => {
                    if cfg.response.is_some() {
                        return Err(duplicate(&key));
                    }
                    cfg.response = Some(ty);
                }
                MessageAttrElem::Debug(key, b) => {
                    if cfg.debug.is_some() {
                        return Err(duplicate(&key));
                    }
                    cfg.debug = Some(b.value());
                }
            }
        }

        Ok(cfg)
    }
}

fn duplicate(key: &Ident) -> syn::Error {
    syn::Error::new(key.span(), format!("duplicate key '{key}' in attribute"))
}

enum MessageAttrElem {
    Name(Ident, LitStr),
    Response(Ident, Type),
    Debug(Ident, LitBool),
}

impl Parse for MessageAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;

        match key.to_string().as_str() {
            "name" => {
                let lit: LitStr = input.parse()?;
                if lit.value().trim().is_empty() {
                    return Err(syn::Error::new(lit.span(), "'name' must not be empty"));
                }
                Ok(Self::Name(key, lit))
            }
            "response" => Ok(Self::Response(key, input.parse()?)),
            "debug" => Ok(Self::Debug(key, input.parse()?)),
            _ => Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'name' | 'response' | 'debug'",
            )),
        }
    }
}
