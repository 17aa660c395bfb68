use serde::{Deserialize, Serialize};

/// One row of `information_schema.columns` for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    pub udt_name: String,
    pub is_nullable: bool,
    pub character_maximum_length: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    pub applied: bool,
}
