use quote::ToTokens;
use syn::{Error, Field, Ident, LitStr, Result, Type, parse::ParseBuffer};

pub(crate) enum FieldType {
    Scalar { nullable: bool },
    Embedded,
    /// Written form of a type that has no column mapping.
    Unsupported(String),
}

pub(crate) struct FieldMetadata {
    pub(crate) ident: Ident,
    pub(crate) ty: Type,
    pub(crate) column_name: Option<String>,
    pub(crate) kind: FieldType,
    pub(crate) primary_key: bool,
    pub(crate) auto_increment: bool,
}

fn unwrap_type(ty: &Type) -> &Type {
    match ty {
        Type::Group(v) => unwrap_type(&v.elem),
        Type::Paren(v) => unwrap_type(&v.elem),
        _ => ty,
    }
}

fn written(ty: &Type) -> String {
    ty.to_token_stream().to_string()
}

pub(crate) fn decode_field(field: &Field) -> Result<FieldMetadata> {
    let Some(ident) = field.ident.clone() else {
        return Err(Error::new_spanned(field, "Field is expected to have a name"));
    };
    let mut metadata = FieldMetadata {
        ident,
        ty: field.ty.clone(),
        column_name: None,
        kind: match unwrap_type(&field.ty) {
            Type::Path(path) => FieldType::Scalar {
                nullable: path.qself.is_none()
                    && path.path.segments.last().is_some_and(|v| v.ident == "Option"),
            },
            ty => FieldType::Unsupported(written(ty)),
        },
        primary_key: false,
        auto_increment: false,
    };
    let mut embedded = false;
    for attr in &field.attrs {
        if !attr.path().is_ident("quarry") {
            continue;
        }
        attr.parse_nested_meta(|arg| {
            if arg.path.is_ident("name") {
                let value = arg.value().and_then(ParseBuffer::parse::<LitStr>).map_err(|e| {
                    Error::new(
                        e.span(),
                        "Error while parsing `name`, use it like: `#[quarry(name = \"my_column\")]`",
                    )
                })?;
                metadata.column_name = Some(value.value());
            } else if arg.path.is_ident("primary_key") {
                metadata.primary_key = true;
            } else if arg.path.is_ident("auto_increment") {
                metadata.auto_increment = true;
            } else if arg.path.is_ident("embedded") {
                embedded = true;
            } else {
                return Err(arg.error(
                    "Unknown attribute, a field accepts: `name`, `primary_key`, `auto_increment`, `embedded`",
                ));
            }
            Ok(())
        })?;
    }
    if embedded {
        if !matches!(unwrap_type(&field.ty), Type::Path(..)) {
            return Err(Error::new_spanned(
                &field.ty,
                "An embedded field must be a struct deriving Entity",
            ));
        }
        if metadata.column_name.is_some() || metadata.primary_key || metadata.auto_increment {
            return Err(Error::new_spanned(
                &metadata.ident,
                "An embedded field takes its columns from the embedded struct, it cannot have `name`, `primary_key` or `auto_increment`",
            ));
        }
        metadata.kind = FieldType::Embedded;
    }
    Ok(metadata)
}
