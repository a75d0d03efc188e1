extern crate proc_macro;

use std::collections::HashSet;

use proc_macro2::{Span, TokenStream, TokenTree};
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Meta, Token};

/// What a single `#[location(...)]` field helper asked for.
#[derive(Debug)]
enum LocationSlot {
    /// Receives the location when the requested property equals `property`.
    Named { property: String, field: Ident },
    /// Map field that receives every property no named slot claims.
    Extra { field: Ident },
}

fn parse_location_attr(attr: &syn::Attribute, field: &Ident) -> syn::Result<LocationSlot> {
    match &attr.meta {
        Meta::Path(_) => Ok(LocationSlot::Named {
            property: field.to_string(),
            field: field.clone(),
        }),
        Meta::List(_) => {
            let mut slot = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value = meta.value()?;
                    let property: LitStr = value.parse()?;
                    slot = Some(LocationSlot::Named {
                        property: property.value(),
                        field: field.clone(),
                    });
                    return Ok(());
                }

                if meta.path.is_ident("extra") {
                    slot = Some(LocationSlot::Extra {
                        field: field.clone(),
                    });
                    return Ok(());
                }

                Err(meta.error("expected `name = \"...\"` or `extra` in location() helper"))
            })?;

            slot.ok_or_else(|| syn::Error::new_spanned(attr, "empty location() helper"))
        }
        Meta::NameValue(_) => Err(syn::Error::new_spanned(
            attr,
            "use #[location] or #[location(name = \"...\")]",
        )),
    }
}

/// The parts of a field's `#[serde(...)]` attributes that decide the key it
/// is written under.
#[derive(Debug, Default)]
struct SerdeField {
    rename: Option<String>,
    flatten: bool,
    skip: bool,
}

fn parse_serde_attrs(attrs: &[Attribute]) -> SerdeField {
    let mut serde = SerdeField::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        // Malformed serde attributes are serde's to report.
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") && meta.input.peek(Token![=]) {
                let name: LitStr = meta.value()?.parse()?;
                serde.rename = Some(name.value());
            } else if meta.path.is_ident("flatten") {
                serde.flatten = true;
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                serde.skip = true;
            } else {
                while !meta.input.is_empty() && !meta.input.peek(Token![,]) {
                    meta.input.parse::<TokenTree>()?;
                }
            }
            Ok(())
        });
    }

    serde
}

fn locate_derive_inner(ast: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &ast.ident;

    let fields = match &ast.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new(
                    Span::call_site(),
                    "derive(Locate) only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new(
                Span::call_site(),
                "derive(Locate) only supports structs",
            ))
        }
    };

    let mut named: Vec<(String, Ident)> = Vec::new();
    let mut extra: Option<Ident> = None;
    let mut range: Option<Ident> = None;
    let mut seen = HashSet::<String>::new();
    let mut keys: Vec<String> = Vec::new();

    for field in fields {
        // Named fields always carry an ident.
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };

        let serde = parse_serde_attrs(&field.attrs);
        if !serde.flatten && !serde.skip {
            keys.push(serde.rename.unwrap_or_else(|| ident.to_string()));
        }

        for attr in &field.attrs {
            if attr.path().is_ident("range") {
                if range.is_some() {
                    return Err(syn::Error::new_spanned(attr, "duplicate #[range] field"));
                }
                range = Some(ident.clone());
                continue;
            }

            if !attr.path().is_ident("location") {
                continue;
            }

            match parse_location_attr(attr, ident)? {
                LocationSlot::Named { property, field } => {
                    if !seen.insert(property.clone()) {
                        return Err(syn::Error::new_spanned(
                            attr,
                            format!("property `{}` is claimed by more than one field", property),
                        ));
                    }
                    named.push((property, field));
                }
                LocationSlot::Extra { field } => {
                    if extra.is_some() {
                        return Err(syn::Error::new_spanned(
                            attr,
                            "only one #[location(extra)] field is allowed",
                        ));
                    }
                    extra = Some(field);
                }
            }
        }
    }

    if named.is_empty() && extra.is_none() {
        return Err(syn::Error::new(
            Span::call_site(),
            "derive(Locate) requires at least one #[location] field",
        ));
    }

    // Keys the struct already serializes can't double as location properties.
    let reserved: Vec<&String> = keys
        .iter()
        .filter(|key| !seen.contains(key.as_str()))
        .collect();
    let reserves = if reserved.is_empty() {
        quote! {
            let _ = property;
            false
        }
    } else {
        quote! { ::core::matches!(property, #(#reserved)|*) }
    };

    let arms = named.iter().map(|(property, field)| {
        quote! {
            #property => self.#field = ::core::option::Option::Some(location),
        }
    });

    let fallback = match &extra {
        Some(field) => quote! {
            _ => {
                self.#field.insert(::std::string::String::from(property), location);
            }
        },
        None => quote! {
            _ => return false,
        },
    };

    let (range_snapshot, range_assign) = match &range {
        Some(field) => (
            quote! { let range = location.range(); },
            quote! { self.#field = ::core::option::Option::Some(range); },
        ),
        None => (TokenStream::new(), TokenStream::new()),
    };

    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::lexloc::Locate for #name #ty_generics #where_clause {
            fn attach_location(&mut self, property: &str, location: ::lexloc::Location) -> bool {
                if <Self as ::lexloc::Locate>::reserves_property(property) {
                    return false;
                }

                #range_snapshot
                match property {
                    #(#arms)*
                    #fallback
                }
                #range_assign
                true
            }

            fn reserves_property(property: &str) -> bool {
                #reserves
            }
        }
    })
}

/// Derives `lexloc::Locate` for a struct.
///
/// * `#[location]` on an `Option<Location>` field claims the property named
///   after the field; `#[location(name = "loc")]` claims an explicit name.
/// * `#[location(extra)]` on a `String -> Location` map receives every other
///   property. Without it, unknown properties are refused.
/// * Every other key the struct serializes (the field name, or its
///   `#[serde(rename = "...")]`) is reserved: attaching under it is refused.
/// * `#[range]` on an `Option<[usize; 2]>` field mirrors the location's range.
#[proc_macro_derive(Locate, attributes(location, range))]
pub fn locate_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    let tokens = locate_derive_inner(&ast).unwrap_or_else(|e| e.to_compile_error());
    tokens.into()
}
