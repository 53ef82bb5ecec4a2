use crate::decode_field::{FieldMetadata, decode_field};
use syn::{Error, Fields, ItemStruct, LitStr, Result, parse::ParseBuffer};

pub(crate) struct TableMetadata {
    pub(crate) item: ItemStruct,
    /// Explicit table name, the registry derives one otherwise.
    pub(crate) name: Option<String>,
    pub(crate) fields: Vec<FieldMetadata>,
}

pub(crate) fn decode_table(item: ItemStruct) -> Result<TableMetadata> {
    if !item.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &item.generics,
            "Entity cannot be derived for generic structs",
        ));
    }
    let Fields::Named(named) = &item.fields else {
        return Err(Error::new_spanned(
            &item.ident,
            "Entity can only be derived for structs with named fields",
        ));
    };
    let fields = named.named.iter().map(decode_field).collect::<Result<_>>()?;
    let mut name = None;
    for attr in &item.attrs {
        if !attr.path().is_ident("quarry") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let value = arg.value().and_then(ParseBuffer::parse::<LitStr>).map_err(|e| {
                    Error::new(
                        e.span(),
                        "Error while parsing `name`, use it like: `#[quarry(name = \"my_table\")]`",
                    )
                })?;
                name = Some(value.value());
                Ok(())
            } else {
                Err(arg.error("Unknown attribute, the struct accepts: `name`"))
            }
        })?;
    }
    Ok(TableMetadata {
        name,
        fields,
        item,
    })
}
