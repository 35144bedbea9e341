//! Per-statement scope: a `FROM`-clause alias map layered on top of the
//! ambient symbol table, per §3's `Scope` and §4.3 rule 2 (reference
//! resolution). Scope is stack-discipline per statement — built fresh for
//! each statement, never retained across statements.

use std::collections::HashMap;

use sql_core::{CaseInsensitiveInterner, Symbol};

use super::symbol_table::{ColumnDescriptor, SymbolTable};

/// One table visible in the current statement's `FROM`/`JOIN` list,
/// resolved to its descriptor at scope-construction time.
struct Binding {
    /// The name used to refer to this table in this statement: its alias
    /// if it has one, otherwise its own name.
    visible_as: Symbol,
    table_name: String,
}

/// How a qualified or unqualified `ColumnRef` resolved, or why it didn't.
pub enum Resolution<'a> {
    Found { table: &'a str, column: &'a ColumnDescriptor },
    UnknownTable,
    UnknownColumn,
    Ambiguous,
}

pub struct Scope<'a> {
    symbols: &'a SymbolTable,
    bindings: Vec<Binding>,
    /// Case-folded alias/table-name interner backing `by_name`, so a
    /// resolved binding's display spelling is the first-seen casing
    /// rather than a re-uppercased string.
    names: CaseInsensitiveInterner,
    /// Fast alias/table-name symbol -> index into `bindings`.
    by_name: HashMap<Symbol, usize>,
}

impl<'a> Scope<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            bindings: Vec::new(),
            names: CaseInsensitiveInterner::new(),
            by_name: HashMap::new(),
        }
    }

    /// Binds `table_name` into scope, under `alias` if given or its own
    /// name otherwise. Returns `false` if `table_name` isn't a known
    /// table (caller emits SEM_UNKNOWN_TABLE).
    pub fn bind(&mut self, table_name: &str, alias: Option<&str>) -> bool {
        if !self.symbols.contains(table_name) {
            return false;
        }
        let visible_as = self.names.intern(alias.unwrap_or(table_name));
        let idx = self.bindings.len();
        self.bindings.push(Binding { visible_as, table_name: table_name.to_string() });
        self.by_name.insert(visible_as, idx);
        true
    }

    /// Is `name` a known alias or table name in this scope?
    pub fn has_binding(&self, name: &str) -> bool {
        self.names.lookup(name).is_some_and(|sym| self.by_name.contains_key(&sym))
    }

    fn descriptor_for(&self, idx: usize) -> Option<&super::symbol_table::TableDescriptor> {
        self.symbols.get(&self.bindings[idx].table_name)
    }

    /// Resolves `qualifier.column` (rule 2: qualified refs). `qualifier`
    /// must be a table name or declared alias in this scope.
    pub fn resolve_qualified(&self, qualifier: &str, column: &str) -> Resolution<'_> {
        let Some(sym) = self.names.lookup(qualifier) else {
            return Resolution::UnknownTable;
        };
        let Some(&idx) = self.by_name.get(&sym) else {
            return Resolution::UnknownTable;
        };
        let Some(table) = self.descriptor_for(idx) else {
            return Resolution::UnknownTable;
        };
        match table.column(column) {
            Some(col) => Resolution::Found { table: self.names.resolve(sym), column: col },
            None => Resolution::UnknownColumn,
        }
    }

    /// Resolves a bare `column` across every bound table (rule 2:
    /// unqualified refs must be unambiguous across the FROM list + joins).
    pub fn resolve_unqualified(&self, column: &str) -> Resolution<'_> {
        let mut found: Vec<(usize, &ColumnDescriptor)> = Vec::new();
        for (idx, _) in self.bindings.iter().enumerate() {
            if let Some(table) = self.descriptor_for(idx) {
                if let Some(col) = table.column(column) {
                    found.push((idx, col));
                }
            }
        }
        match found.len() {
            0 => Resolution::UnknownColumn,
            1 => {
                let (idx, col) = found[0];
                Resolution::Found { table: self.names.resolve(self.bindings[idx].visible_as), column: col }
            }
            _ => Resolution::Ambiguous,
        }
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.bindings.iter().map(|b| self.names.resolve(b.visible_as))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::symbol_table::{ColumnDescriptor, TableDescriptor};
    use super::super::types::Type;
    use sql_core::Position;

    fn symbols_with_users_and_orders() -> SymbolTable {
        let mut st = SymbolTable::new();
        st.insert(TableDescriptor {
            name: "users".to_string(),
            columns: vec![ColumnDescriptor {
                name: "id".to_string(),
                declared_type: Type::Integer,
                constraints: vec![],
                ordinal: 0,
            }],
            declared_at: Position::new(1, 1),
        });
        st.insert(TableDescriptor {
            name: "orders".to_string(),
            columns: vec![
                ColumnDescriptor {
                    name: "id".to_string(),
                    declared_type: Type::Integer,
                    constraints: vec![],
                    ordinal: 0,
                },
                ColumnDescriptor {
                    name: "user_id".to_string(),
                    declared_type: Type::Integer,
                    constraints: vec![],
                    ordinal: 1,
                },
            ],
            declared_at: Position::new(1, 1),
        });
        st
    }

    #[test]
    fn unqualified_ambiguous_across_two_tables() {
        let symbols = symbols_with_users_and_orders();
        let mut scope = Scope::new(&symbols);
        scope.bind("users", None);
        scope.bind("orders", None);
        assert!(matches!(scope.resolve_unqualified("id"), Resolution::Ambiguous));
        assert!(matches!(scope.resolve_unqualified("user_id"), Resolution::Found { .. }));
    }

    #[test]
    fn qualified_by_alias() {
        let symbols = symbols_with_users_and_orders();
        let mut scope = Scope::new(&symbols);
        scope.bind("orders", Some("o"));
        assert!(matches!(scope.resolve_qualified("o", "id"), Resolution::Found { .. }));
        assert!(matches!(scope.resolve_qualified("orders", "id"), Resolution::UnknownTable));
        assert!(matches!(scope.resolve_qualified("o", "missing"), Resolution::UnknownColumn));
    }

    #[test]
    fn binding_unknown_table_fails() {
        let symbols = symbols_with_users_and_orders();
        let mut scope = Scope::new(&symbols);
        assert!(!scope.bind("ghosts", None));
    }
}
