use darling::{FromDeriveInput, FromField, ast::Data, util::Ignored};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    Attribute, DeriveInput, Expr, ExprLit, Generics, Ident, Lit, LitStr, Meta, Type, ext::IdentExt,
};

///
/// RecordInput
///

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(db), supports(struct_named))]
struct RecordInput {
    ident: Ident,
    generics: Generics,
    data: Data<Ignored, RecordField>,
    table: Option<String>,
}

///
/// RecordField
/// Field-level `db` attributes mix name-value and marker forms, so they are
/// forwarded and parsed by hand.
///

#[derive(Debug, FromField)]
#[darling(forward_attrs(db))]
struct RecordField {
    ident: Option<Ident>,
    ty: Type,
    attrs: Vec<Attribute>,
}

///
/// FieldKind
///

enum FieldKind {
    Column(Option<LitStr>),
    Embedded,
    Excluded,
}

// derive_record
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    expand(&input).unwrap_or_else(darling::Error::write_errors)
}

fn expand(input: &DeriveInput) -> darling::Result<TokenStream> {
    let RecordInput {
        ident,
        generics,
        data,
        table,
    } = RecordInput::from_derive_input(input)?;

    if !generics.params.is_empty() {
        return Err(
            darling::Error::custom("Record cannot be derived for generic structs")
                .with_span(&generics),
        );
    }

    let table = match table {
        Some(table) if table.trim().is_empty() => {
            return Err(darling::Error::custom("table name must not be empty").with_span(&ident));
        }
        Some(table) => quote!(::std::option::Option::Some(#table)),
        None => quote!(::std::option::Option::None),
    };

    let fields = data
        .take_struct()
        .ok_or_else(|| darling::Error::unsupported_shape("enum").with_span(&ident))?;

    let mut errors = darling::Error::accumulator();
    let mut declared = Vec::new();
    let mut refs = Vec::new();
    let mut muts = Vec::new();

    for field in fields.fields {
        let Some(field_ident) = &field.ident else {
            continue;
        };
        let Some(kind) = errors.handle(field_kind(&field.attrs).map_err(darling::Error::from))
        else {
            continue;
        };

        let name = field_ident.unraw().to_string();
        let ty = &field.ty;

        match kind {
            FieldKind::Column(tag) => {
                let tag = tag.map_or_else(
                    || quote!(::std::option::Option::None),
                    |tag| quote!(::std::option::Option::Some(#tag)),
                );
                declared.push(quote!(::rowmap::model::DeclaredField::column(#name, #tag)));
                refs.push(quote!(::rowmap::traits::FieldRef::Column(&self.#field_ident)));
                muts.push(quote!(::rowmap::traits::FieldMut::Column(&mut self.#field_ident)));
            }
            FieldKind::Embedded => {
                declared.push(quote! {
                    ::rowmap::model::DeclaredField::embedded(
                        #name,
                        <#ty as ::rowmap::traits::Introspect>::resolve,
                    )
                });
                refs.push(quote!(::rowmap::traits::FieldRef::Embedded(&self.#field_ident)));
                muts.push(quote!(::rowmap::traits::FieldMut::Embedded(&mut self.#field_ident)));
            }
            FieldKind::Excluded => {
                declared.push(quote!(::rowmap::model::DeclaredField::excluded(#name)));
                refs.push(quote!(::rowmap::traits::FieldRef::Excluded));
                muts.push(quote!(::rowmap::traits::FieldMut::Excluded));
            }
        }
    }

    errors.finish()?;

    let type_name = ident.unraw().to_string();

    Ok(quote! {
        impl ::rowmap::traits::Record for #ident {
            fn shape() -> &'static ::rowmap::model::RecordShape {
                static SHAPE: ::rowmap::model::RecordShape = ::rowmap::model::RecordShape {
                    type_name: #type_name,
                    type_id: ::std::any::TypeId::of::<#ident>,
                    table: #table,
                    fields: &[#(#declared),*],
                };

                &SHAPE
            }
        }

        impl ::rowmap::traits::Introspect for #ident {
            fn resolve() -> ::rowmap::traits::Resolved {
                ::rowmap::traits::Resolved::Composite(
                    <Self as ::rowmap::traits::Record>::shape(),
                )
            }
        }

        impl ::rowmap::traits::FieldAccess for #ident {
            fn fields(&self) -> ::std::vec::Vec<::rowmap::traits::FieldRef<'_>> {
                ::std::vec![#(#refs),*]
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<::rowmap::traits::FieldMut<'_>> {
                ::std::vec![#(#muts),*]
            }
        }
    })
}

const FIELD_FORMS: &str = "expected #[db = \"tag\"], #[db(embed)] or #[db(skip)]";

// one `db` attribute per field at most
fn field_kind(attrs: &[Attribute]) -> syn::Result<FieldKind> {
    let mut kind = None;

    for attr in attrs {
        let parsed = match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(tag), ..
                }) => {
                    if tag.value().trim() == "-" {
                        FieldKind::Excluded
                    } else {
                        FieldKind::Column(Some(tag.clone()))
                    }
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "db tag must be a string literal",
                    ));
                }
            },
            Meta::List(list) => {
                let mut marker = None;
                list.parse_nested_meta(|meta| {
                    let next = if meta.path.is_ident("embed") {
                        FieldKind::Embedded
                    } else if meta.path.is_ident("skip") {
                        FieldKind::Excluded
                    } else {
                        return Err(meta.error("expected `embed` or `skip`"));
                    };

                    if marker.replace(next).is_some() {
                        return Err(meta.error("conflicting db attributes"));
                    }

                    Ok(())
                })?;

                marker.ok_or_else(|| syn::Error::new_spanned(list, FIELD_FORMS))?
            }
            Meta::Path(path) => return Err(syn::Error::new_spanned(path, FIELD_FORMS)),
        };

        if kind.replace(parsed).is_some() {
            return Err(syn::Error::new_spanned(attr, "conflicting db attributes"));
        }
    }

    Ok(kind.unwrap_or(FieldKind::Column(None)))
}

///
/// TESTS
///
