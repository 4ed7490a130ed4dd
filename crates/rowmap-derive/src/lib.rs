use proc_macro::TokenStream;

mod record;

/// Derive `Record`, `Introspect` and `FieldAccess` for a struct with named
/// fields.
///
/// ```ignore
/// #[derive(Default, Record)]
/// #[db(table = "users")]
/// pub struct User {
///     #[db(embed)]
///     base: Base,
///     name: String,
///     #[db = "owner_id,fk=accounts.id"]
///     owner: i64,
///     #[db = "-"]
///     session: Session,
/// }
/// ```
///
/// Field forms:
/// - no attribute: column named after the normalized field name
/// - `#[db = "tag"]`: column described by a tag (`name,pk,ro,fk=t.c`)
/// - `#[db = "-"]` or `#[db(skip)]`: never mapped
/// - `#[db(embed)]`: nested record whose columns are flattened in
#[proc_macro_derive(Record, attributes(db))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input.into()).into()
}
