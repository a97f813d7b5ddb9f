//! Parameterized statement construction.
//!
//! Builds SELECT, DELETE and INSERT statements against a [`TableDef`].
//! Identifiers come from the table description and are validated and
//! quoted; values only ever travel as bind parameters.

use thiserror::Error;
use tokenstore_core::TableDef;

/// Errors that can occur while building a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryBuildError {
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Unknown column '{column}' on table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("INSERT into '{0}' sets no columns")]
    NoValues(String),
}

/// A bind parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    BigInt(i64),
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        Self::BigInt(value)
    }
}

/// Validate an identifier (table name, column name).
///
/// Only allows ASCII alphanumeric characters and underscores.
fn validate_identifier(name: &str) -> Result<(), QueryBuildError> {
    if name.is_empty() {
        return Err(QueryBuildError::InvalidIdentifier(
            "Empty identifier".to_string(),
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(QueryBuildError::InvalidIdentifier(name.to_string()));
    }

    Ok(())
}

/// Escape a PostgreSQL identifier (table name, column name).
pub fn escape_identifier(name: &str) -> Result<String, QueryBuildError> {
    validate_identifier(name)?;
    Ok(format!("\"{name}\""))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Eq,
    Lt,
}

impl Comparison {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
        }
    }
}

#[derive(Debug, Clone)]
struct Filter {
    column: String,
    comparison: Comparison,
    value: SqlValue,
}

fn check_column(table: &TableDef, column: &str) -> Result<(), QueryBuildError> {
    if table.column(column).is_none() {
        return Err(QueryBuildError::UnknownColumn {
            table: table.name.to_string(),
            column: column.to_string(),
        });
    }
    Ok(())
}

/// Appends `WHERE a = $n AND b < $n+1 ...`, numbering after `params`.
fn push_filters(
    table: &TableDef,
    filters: &[Filter],
    sql: &mut String,
    params: &mut Vec<SqlValue>,
) -> Result<(), QueryBuildError> {
    for (i, filter) in filters.iter().enumerate() {
        check_column(table, &filter.column)?;
        let keyword = if i == 0 { "WHERE" } else { "AND" };
        params.push(filter.value.clone());
        sql.push_str(&format!(
            " {keyword} {} {} ${}",
            escape_identifier(&filter.column)?,
            filter.comparison.as_sql(),
            params.len()
        ));
    }
    Ok(())
}

/// Builder for a SELECT with equality filters joined by `AND`.
#[derive(Debug, Clone)]
pub struct SelectQuery {
    table: TableDef,
    filters: Vec<Filter>,
}

impl SelectQuery {
    /// Selects every column of `table`, in declaration order.
    #[must_use]
    pub fn from_table(table: &TableDef) -> Self {
        Self {
            table: *table,
            filters: Vec::new(),
        }
    }

    /// Adds a `column = value` filter.
    #[must_use]
    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            comparison: Comparison::Eq,
            value: value.into(),
        });
        self
    }

    /// Renders the SQL text and the bind values in placeholder order.
    ///
    /// # Errors
    ///
    /// Fails if a filter names a column the table does not have, or an
    /// identifier contains characters outside `[A-Za-z0-9_]`.
    pub fn to_sql(&self) -> Result<(String, Vec<SqlValue>), QueryBuildError> {
        let columns = self
            .table
            .column_names()
            .map(escape_identifier)
            .collect::<Result<Vec<_>, _>>()?;

        let mut sql = format!(
            "SELECT {} FROM {}",
            columns.join(", "),
            escape_identifier(self.table.name)?
        );

        let mut params = Vec::with_capacity(self.filters.len());
        push_filters(&self.table, &self.filters, &mut sql, &mut params)?;

        Ok((sql, params))
    }
}

/// Builder for a DELETE with filters joined by `AND`.
#[derive(Debug, Clone)]
pub struct DeleteQuery {
    table: TableDef,
    filters: Vec<Filter>,
}

impl DeleteQuery {
    #[must_use]
    pub fn from_table(table: &TableDef) -> Self {
        Self {
            table: *table,
            filters: Vec::new(),
        }
    }

    /// Adds a `column = value` filter.
    #[must_use]
    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            comparison: Comparison::Eq,
            value: value.into(),
        });
        self
    }

    /// Adds a `column < value` filter.
    #[must_use]
    pub fn where_lt(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.filters.push(Filter {
            column: column.into(),
            comparison: Comparison::Lt,
            value: value.into(),
        });
        self
    }

    /// Renders the SQL text and the bind values in placeholder order.
    ///
    /// # Errors
    ///
    /// Same rules as [`SelectQuery::to_sql`].
    pub fn to_sql(&self) -> Result<(String, Vec<SqlValue>), QueryBuildError> {
        let mut sql = format!("DELETE FROM {}", escape_identifier(self.table.name)?);
        let mut params = Vec::with_capacity(self.filters.len());
        push_filters(&self.table, &self.filters, &mut sql, &mut params)?;
        Ok((sql, params))
    }
}

/// Builder for a single-row INSERT.
#[derive(Debug, Clone)]
pub struct InsertQuery {
    table: TableDef,
    values: Vec<(String, SqlValue)>,
}

impl InsertQuery {
    #[must_use]
    pub fn into_table(table: &TableDef) -> Self {
        Self {
            table: *table,
            values: Vec::new(),
        }
    }

    /// Sets `column` to `value`. Columns render in the order they are set.
    #[must_use]
    pub fn value(mut self, column: impl Into<String>, value: impl Into<SqlValue>) -> Self {
        self.values.push((column.into(), value.into()));
        self
    }

    /// Renders the SQL text and the bind values in placeholder order.
    ///
    /// # Errors
    ///
    /// Fails if no value was set, a column is unknown, or an identifier is
    /// invalid.
    pub fn to_sql(&self) -> Result<(String, Vec<SqlValue>), QueryBuildError> {
        if self.values.is_empty() {
            return Err(QueryBuildError::NoValues(self.table.name.to_string()));
        }

        let mut columns = Vec::with_capacity(self.values.len());
        let mut placeholders = Vec::with_capacity(self.values.len());
        let mut params = Vec::with_capacity(self.values.len());
        for (i, (column, value)) in self.values.iter().enumerate() {
            check_column(&self.table, column)?;
            columns.push(escape_identifier(column)?);
            placeholders.push(format!("${}", i + 1));
            params.push(value.clone());
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            escape_identifier(self.table.name)?,
            columns.join(", "),
            placeholders.join(", ")
        );

        Ok((sql, params))
    }
}
