//! Static description of the `tokens` table.
//!
//! Column names, types and sizes are declared once here. The PostgreSQL
//! backend renders both its DDL and its statements from [`TOKENS_TABLE`],
//! and the validation rules in [`crate::token`] read their limits from the
//! same constants.

/// Maximum length of a token value, in characters.
pub const TOKEN_MAX_LEN: usize = 64;

/// Maximum length of a token type, in characters.
pub const TYPE_MAX_LEN: usize = 64;

/// Maximum length of the extra payload, in characters.
pub const EXTRA_MAX_LEN: usize = 2048;

/// SQL type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// Variable-length string with a maximum length in characters.
    Varchar(usize),
    /// 64-bit signed integer.
    BigInt,
}

impl ColumnType {
    /// Maximum length for string columns, `None` otherwise.
    #[must_use]
    pub fn max_len(self) -> Option<usize> {
        match self {
            Self::Varchar(len) => Some(len),
            Self::BigInt => None,
        }
    }
}

/// A single column of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub primary_key: bool,
}

impl ColumnDef {
    const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            nullable: false,
            primary_key: false,
        }
    }

    const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A table: its name and ordered columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [ColumnDef],
}

impl TableDef {
    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in declaration order.
    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.name)
    }

    /// The primary key column, if the table declares one.
    #[must_use]
    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.primary_key)
    }
}

/// Token value; the primary key.
pub const COLUMN_TOKEN: &str = "token";
/// Token type, indexed for the by-type operations.
pub const COLUMN_TYPE: &str = "type";
/// Opaque caller payload. Nullable.
pub const COLUMN_EXTRA: &str = "extra";
/// Creation time in Unix milliseconds. Lowercase because PostgreSQL folds
/// unquoted identifiers.
pub const COLUMN_CREATE_AT: &str = "createat";

/// The `tokens` table.
pub const TOKENS_TABLE: TableDef = TableDef {
    name: "tokens",
    columns: &[
        ColumnDef::new(COLUMN_TOKEN, ColumnType::Varchar(TOKEN_MAX_LEN)).primary_key(),
        ColumnDef::new(COLUMN_TYPE, ColumnType::Varchar(TYPE_MAX_LEN)),
        ColumnDef::new(COLUMN_EXTRA, ColumnType::Varchar(EXTRA_MAX_LEN)).nullable(),
        ColumnDef::new(COLUMN_CREATE_AT, ColumnType::BigInt),
    ],
};
