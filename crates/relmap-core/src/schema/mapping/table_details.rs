/// A table an entity maps to, with the columns holding its key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableDetails {
    pub name: String,

    /// Key columns in this table. For a joined subclass table these are the
    /// primary-key join columns.
    pub key_columns: Vec<String>,

    /// Whether this table holds the hierarchy's identifier.
    pub identifier_table: bool,
}

impl TableDetails {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_identifier_table(&self) -> bool {
        self.identifier_table
    }
}
