use super::JdbcMapping;

use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnSize {
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
}

/// Path of a selectable within its model part, e.g. `pk.customerId`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct SelectablePath {
    pub parts: Vec<String>,
}

impl SelectablePath {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            parts: vec![name.into()],
        }
    }

    pub fn append(&self, name: impl Into<String>) -> Self {
        let mut parts = self.parts.clone();
        parts.push(name.into());
        Self { parts }
    }

    pub fn parent(&self) -> Option<Self> {
        match self.parts.split_last() {
            Some((_, rest)) if !rest.is_empty() => Some(Self {
                parts: rest.to_vec(),
            }),
            _ => None,
        }
    }

    pub fn selectable_name(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or_default()
    }
}

impl fmt::Display for SelectablePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("."))
    }
}

/// One column or formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableMapping {
    /// Table the selectable belongs to.
    pub table: String,

    /// Column name, or the SQL of a formula.
    pub expression: String,

    pub formula: bool,

    pub custom_read: Option<String>,
    pub custom_write: Option<String>,

    pub nullable: bool,
    pub insertable: bool,
    pub updatable: bool,

    pub size: ColumnSize,

    pub jdbc_mapping: JdbcMapping,

    pub path: SelectablePath,
}

impl SelectableMapping {
    pub fn column(
        table: impl Into<String>,
        name: impl Into<String>,
        jdbc_mapping: JdbcMapping,
    ) -> Self {
        let name = name.into();
        Self {
            table: table.into(),
            path: SelectablePath::new(name.clone()),
            expression: name,
            formula: false,
            custom_read: None,
            custom_write: None,
            nullable: true,
            insertable: true,
            updatable: true,
            size: ColumnSize::default(),
            jdbc_mapping,
        }
    }

    /// Formulas are read-only.
    pub fn formula(
        table: impl Into<String>,
        expression: impl Into<String>,
        jdbc_mapping: JdbcMapping,
    ) -> Self {
        let mut selectable = Self::column(table, expression, jdbc_mapping);
        selectable.formula = true;
        selectable.insertable = false;
        selectable.updatable = false;
        selectable
    }

    pub fn is_formula(&self) -> bool {
        self.formula
    }

    pub fn column_name(&self) -> Option<&str> {
        (!self.formula).then_some(&self.expression[..])
    }

    /// Expression used to read the value, qualified with `alias`.
    pub fn read_expression(&self, alias: &str) -> String {
        match (&self.custom_read, self.formula) {
            (Some(read), _) => read.clone(),
            (None, true) => self.expression.clone(),
            (None, false) => format!("{alias}.{}", self.expression),
        }
    }

    /// Placeholder used to write the value.
    pub fn write_expression(&self) -> &str {
        self.custom_write.as_deref().unwrap_or("?")
    }

    /// The same selectable read from another table.
    pub fn with_table(&self, table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..self.clone()
        }
    }

    /// The same selectable nested under `prefix`.
    pub fn with_path_prefix(mut self, prefix: &SelectablePath) -> Self {
        let mut parts = prefix.parts.clone();
        parts.append(&mut self.path.parts);
        self.path = SelectablePath { parts };
        self
    }
}

/// An ordered list of selectables.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectableMappings {
    selectables: Vec<SelectableMapping>,
}

impl SelectableMappings {
    pub fn new(selectables: Vec<SelectableMapping>) -> Self {
        Self { selectables }
    }

    pub fn len(&self) -> usize {
        self.selectables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selectables.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SelectableMapping> {
        self.selectables.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SelectableMapping> {
        self.selectables.iter()
    }

    /// Visits each selectable with its position, starting at `offset`.
    /// Returns the number of selectables visited.
    pub fn for_each_selectable(
        &self,
        offset: usize,
        action: &mut dyn FnMut(usize, &SelectableMapping),
    ) -> usize {
        for (i, selectable) in self.selectables.iter().enumerate() {
            action(offset + i, selectable);
        }
        self.selectables.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.selectables
            .iter()
            .map(|selectable| selectable.expression.as_str())
            .collect()
    }

    /// The table shared by every selectable, if there is exactly one.
    pub fn table(&self) -> Option<&str> {
        let first = self.selectables.first()?;
        self.selectables
            .iter()
            .all(|selectable| selectable.table == first.table)
            .then_some(&first.table[..])
    }
}

impl<'a> IntoIterator for &'a SelectableMappings {
    type Item = &'a SelectableMapping;
    type IntoIter = std::slice::Iter<'a, SelectableMapping>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<SelectableMapping> for SelectableMappings {
    fn from_iter<T: IntoIterator<Item = SelectableMapping>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
