//! The persistent symbol table: a name-keyed registry of tables (and
//! views, recorded as tables) that survives across statements within one
//! compilation unit, mutated only by the semantic analyzer.

use indexmap::IndexMap;

use sql_core::Position;

use super::types::Type;

/// A column constraint, per the data model's
/// `{PRIMARY_KEY, NOT_NULL, UNIQUE, DEFAULT(value), CHECK(expr), FOREIGN_KEY(table,column)}`.
/// `Default`/`Check` carry the constraint expression's source text rather
/// than a re-parsed tree — the analyzer only needs to report and display
/// them, never re-evaluate them (no query execution, per the Non-goals).
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Constraint {
    PrimaryKey,
    NotNull,
    Unique,
    Default(String),
    Check(String),
    ForeignKey { table: String, column: Option<String> },
}

/// One column of a [`TableDescriptor`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub declared_type: Type,
    pub constraints: Vec<Constraint>,
    /// 0-based position within the table, used for arity checks on
    /// column-less `INSERT ... VALUES`.
    pub ordinal: usize,
}

impl ColumnDescriptor {
    pub fn is_not_null(&self) -> bool {
        self.constraints.iter().any(|c| matches!(c, Constraint::NotNull | Constraint::PrimaryKey))
    }
}

/// A declared table or view. Views are recorded with columns derived from
/// their defining `SELECT`'s projection (§3: "Views are recorded as
/// tables whose columns are derived from their defining SELECT").
#[derive(Debug, Clone, serde::Serialize)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnDescriptor>,
    pub declared_at: Position,
}

impl TableDescriptor {
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut ColumnDescriptor> {
        self.columns.iter_mut().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

/// Maps unqualified table name (case-insensitive) to its descriptor.
/// Owned by the driver for the duration of one compilation invocation per
/// §5; `analyze` takes it as an explicitly threaded in/out parameter
/// rather than reaching for any process-global registry.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SymbolTable {
    tables: IndexMap<String, TableDescriptor>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn fold(name: &str) -> String {
        name.to_ascii_uppercase()
    }

    pub fn get(&self, name: &str) -> Option<&TableDescriptor> {
        self.tables.get(&Self::fold(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TableDescriptor> {
        self.tables.get_mut(&Self::fold(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(&Self::fold(name))
    }

    /// Inserts a new table. Returns `false` without mutating if a table
    /// of that name already exists — callers emit SEM_DUPLICATE on `false`.
    pub fn insert(&mut self, table: TableDescriptor) -> bool {
        let key = Self::fold(&table.name);
        if self.tables.contains_key(&key) {
            return false;
        }
        self.tables.insert(key, table);
        true
    }

    /// Removes a table. Returns `false` if it did not exist.
    pub fn remove(&mut self, name: &str) -> bool {
        self.tables.shift_remove(&Self::fold(name)).is_some()
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> TableDescriptor {
        TableDescriptor {
            name: name.to_string(),
            columns: vec![ColumnDescriptor {
                name: "id".to_string(),
                declared_type: Type::Integer,
                constraints: vec![Constraint::PrimaryKey],
                ordinal: 0,
            }],
            declared_at: Position::new(1, 1),
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut st = SymbolTable::new();
        assert!(st.insert(table("Users")));
        assert!(st.contains("users"));
        assert!(st.contains("USERS"));
        assert_eq!(st.get("uSeRs").unwrap().name, "Users");
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut st = SymbolTable::new();
        assert!(st.insert(table("t")));
        assert!(!st.insert(table("T")));
        assert_eq!(st.len(), 1);
    }

    #[test]
    fn column_lookup_is_case_insensitive() {
        let st_table = table("t");
        assert!(st_table.column("ID").is_some());
        assert!(st_table.column("missing").is_none());
    }

    #[test]
    fn remove_drops_a_table() {
        let mut st = SymbolTable::new();
        st.insert(table("t"));
        assert!(st.remove("T"));
        assert!(!st.contains("t"));
        assert!(!st.remove("t"));
    }
}
