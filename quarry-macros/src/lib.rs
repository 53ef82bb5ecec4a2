mod decode_field;
mod decode_table;
mod entity_trait;

use decode_table::decode_table;
use entity_trait::entity_trait;
use proc_macro::TokenStream;
use syn::{ItemStruct, parse_macro_input};

/// Derive `Entity` and `FromRow` for a struct with named fields.
///
/// ```rust,ignore
/// #[derive(Entity)]
/// #[quarry(name = "users")]
/// struct User {
///     #[quarry(primary_key, auto_increment)]
///     id: i64,
///     #[quarry(name = "nick")]
///     name: Option<String>,
///     #[quarry(embedded)]
///     audit: Audit,
/// }
/// ```
#[proc_macro_derive(Entity, attributes(quarry))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let item: ItemStruct = parse_macro_input!(input as ItemStruct);
    decode_table(item)
        .map(|table| entity_trait(&table))
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
