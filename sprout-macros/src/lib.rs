use proc_macro::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, LitStr, Type, parse_macro_input};

/// Derive `From<T> for sprout::props::Props` for a struct of named fields.
///
/// Every field becomes one prop. By default the field is an attribute keyed
/// by the field name and its value goes through `Into<Value>`.
///
/// # Attributes on fields
/// - `#[prop(class)]` - The field is the class name (`impl Into<String>`)
/// - `#[prop(on = "event")]` - The field is a handler for `event` (`impl Into<Handler>`)
/// - `#[prop(rename = "key")]` - Use `key` instead of the field name
/// - `#[prop(skip)]` - Leave the field out
///
/// Fields of type `Option<T>` only produce a prop when `Some`.
///
/// # Example
/// ```ignore
/// #[derive(Props)]
/// struct LinkProps {
///     #[prop(class)]
///     class: String,
///     href: String,
///     #[prop(rename = "data-id")]
///     id: u32,
///     #[prop(on = "click")]
///     on_click: Option<Handler>,
/// }
///
/// let link = h!("a", LinkProps { .. }, "home");
/// ```
#[proc_macro_derive(Props, attributes(prop))]
pub fn derive_props(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

enum PropKind {
    Attr(String),
    Class,
    On(String),
    Skip,
}

struct PropField {
    name: syn::Ident,
    kind: PropKind,
    optional: bool,
}

fn expand(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "Props can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Props can only be derived for structs",
            ));
        }
    };

    let mut prop_fields = Vec::new();
    for field in fields {
        let Some(name) = field.ident.clone() else {
            continue;
        };
        prop_fields.push(PropField {
            kind: parse_kind(field, &name)?,
            optional: is_option(&field.ty),
            name,
        });
    }

    let inserts = prop_fields.iter().filter_map(|field| {
        let name = &field.name;
        let make = |value: proc_macro2::TokenStream| match &field.kind {
            PropKind::Attr(key) => Some(quote! { ::sprout::props::Prop::attr(#key, #value) }),
            PropKind::Class => Some(quote! { ::sprout::props::Prop::class(#value) }),
            PropKind::On(event) => Some(quote! { ::sprout::props::Prop::on(#event, #value) }),
            PropKind::Skip => None,
        };

        if field.optional {
            let prop = make(quote! { value })?;
            Some(quote! {
                if let Some(value) = value.#name {
                    props.insert(#prop);
                }
            })
        } else {
            let prop = make(quote! { value.#name })?;
            Some(quote! {
                props.insert(#prop);
            })
        }
    });

    Ok(quote! {
        impl #impl_generics ::std::convert::From<#struct_name #ty_generics> for ::sprout::props::Props
        #where_clause
        {
            #[allow(unused_variables)]
            fn from(value: #struct_name #ty_generics) -> Self {
                let mut props = ::sprout::props::Props::new();
                #(#inserts)*
                props
            }
        }
    })
}

fn parse_kind(field: &syn::Field, name: &syn::Ident) -> syn::Result<PropKind> {
    let mut kind = PropKind::Attr(name.unraw().to_string());

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("prop")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("class") {
                kind = PropKind::Class;
            } else if meta.path.is_ident("skip") {
                kind = PropKind::Skip;
            } else if meta.path.is_ident("on") {
                let event: LitStr = meta.value()?.parse()?;
                kind = PropKind::On(event.value());
            } else if meta.path.is_ident("rename") {
                let key: LitStr = meta.value()?.parse()?;
                kind = PropKind::Attr(key.value());
            } else {
                return Err(meta.error("expected `class`, `skip`, `on = \"..\"` or `rename = \"..\"`"));
            }
            Ok(())
        })?;
    }

    Ok(kind)
}

fn is_option(ty: &Type) -> bool {
    let Type::Path(path) = ty else {
        return false;
    };
    path.qself.is_none()
        && path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option")
}
