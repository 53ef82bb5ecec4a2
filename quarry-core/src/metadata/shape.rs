use crate::Value;
use std::any::TypeId;

/// Static declaration of a record type, emitted by `#[derive(Entity)]`.
///
/// It only records what the source says. Names, flattening and validation are
/// derived on first use by the [`MetaRegistry`](crate::MetaRegistry).
#[derive(Debug)]
pub struct EntityShape {
    /// Rust type name.
    pub name: &'static str,
    /// Explicit table name, snake case of `name` otherwise.
    pub table_name: Option<&'static str>,
    /// Identity of the described type.
    pub id: fn() -> TypeId,
    pub fields: &'static [FieldShape],
}

impl EntityShape {
    pub fn type_id(&self) -> TypeId {
        (self.id)()
    }
}

#[derive(Debug)]
pub struct FieldShape {
    pub ident: &'static str,
    /// Explicit column name, snake case of `ident` otherwise.
    pub column_name: Option<&'static str>,
    pub kind: FieldKind,
    pub primary_key: bool,
    pub auto_increment: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// A value mapped to one column, `prototype` returns its typed NULL.
    Scalar {
        prototype: fn() -> Value,
        nullable: bool,
    },
    /// A record whose fields are promoted into the enclosing one.
    Embedded(fn() -> &'static EntityShape),
    /// A field whose type cannot be mapped, with the type as written.
    Unsupported(&'static str),
}
