//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.

use sea_query::Iden;

/// Items table schema.
///
/// One physical table holds parents and children. `(pk, sk)` is the
/// primary key; `data` holds the payload as JSON text.
#[derive(Iden)]
pub enum Items {
    Table,
    #[iden = "pk"]
    Pk,
    #[iden = "sk"]
    Sk,
    #[iden = "item_type"]
    ItemType,
    #[iden = "data"]
    Data,
}

/// SQL for creating the items table.
///
/// The primary key index serves partition scans; `TEXT` compares with the
/// default `BINARY` collation, i.e. byte-wise.
pub const CREATE_ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    pk TEXT NOT NULL,
    sk TEXT NOT NULL,
    item_type TEXT NOT NULL,
    data TEXT NOT NULL,
    PRIMARY KEY (pk, sk)
)
"#;
