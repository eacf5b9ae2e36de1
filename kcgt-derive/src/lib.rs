use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Meta, Type};

/// Derive macro that generates form field metadata from struct fields.
///
/// For each field, extracts:
/// - Column name (respects #[serde(rename = "...")])
/// - Official form line label (from #[form(line = "...")], empty if absent)
/// - Required (true if not Option<T>)
/// - Description (from doc comments)
///
/// Generates a `form_fields() -> &'static [FormField]` method. `FormField`
/// must be in scope at the derive site.
#[proc_macro_derive(FormFields, attributes(serde, form))]
pub fn derive_form_fields(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(name, "FormFields only supports named fields")
                    .to_compile_error()
                    .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "FormFields only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let entries = match fields.iter().map(form_field_entry).collect::<syn::Result<Vec<_>>>() {
        Ok(entries) => entries,
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl #name {
            pub fn form_fields() -> &'static [FormField] {
                static FIELDS: &[FormField] = &[
                    #(#entries),*
                ];
                FIELDS
            }
        }
    };

    TokenStream::from(expanded)
}

fn form_field_entry(field: &syn::Field) -> syn::Result<proc_macro2::TokenStream> {
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "FormFields only supports named fields"))?;
    let column =
        get_string_arg(&field.attrs, "serde", "rename")?.unwrap_or_else(|| ident.to_string());
    let line = get_string_arg(&field.attrs, "form", "line")?.unwrap_or_default();
    let required = !is_option_type(&field.ty);
    let description = get_doc_comment(&field.attrs);

    Ok(quote! {
        FormField {
            name: #column,
            line: #line,
            required: #required,
            description: #description,
        }
    })
}

/// Find `key = "..."` inside `#[attr_name(...)]`.
fn get_string_arg(
    attrs: &[syn::Attribute],
    attr_name: &str,
    key: &str,
) -> syn::Result<Option<String>> {
    for attr in attrs {
        if !attr.path().is_ident(attr_name) {
            continue;
        }

        let mut found = None;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(key) {
                match meta.value()?.parse::<Lit>()? {
                    Lit::Str(s) => found = Some(s.value()),
                    other => return Err(syn::Error::new_spanned(other, "expected a string literal")),
                }
            } else if attr_name == "form" {
                return Err(meta.error("unsupported form attribute, expected `line`"));
            } else if meta.input.peek(syn::Token![=]) {
                // skip other `name = value` pairs such as `default = "..."`
                meta.value()?.parse::<Lit>()?;
            } else if meta.input.peek(syn::token::Paren) {
                // skip nested lists such as `rename(serialize = "...")`
                meta.input.parse::<proc_macro2::Group>()?;
            }
            Ok(())
        })?;
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

fn get_doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(meta) = &attr.meta {
                if let syn::Expr::Lit(expr_lit) = &meta.value {
                    if let Lit::Str(lit_str) = &expr_lit.lit {
                        return Some(lit_str.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_option_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Option";
        }
    }
    false
}
