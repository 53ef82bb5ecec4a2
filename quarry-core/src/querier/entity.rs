use crate::{EntityShape, FromRow, Result, Slots, Table};

/// Record type mapped to a table, implemented by `#[derive(Entity)]`.
pub trait Entity: FromRow {
    /// Static declaration the metadata is derived from.
    fn shape() -> &'static EntityShape;

    /// Reassemble the record consuming its flattened columns in declaration order.
    fn from_slots(slots: &mut Slots<'_>) -> Result<Self>;

    fn table() -> Table {
        Table::new(Self::shape())
    }
}
