use crate::schema::mapping::ColumnSize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSource {
    pub name: String,

    /// Explicit nullability. `None` follows the attribute's optionality.
    pub nullable: Option<bool>,

    pub size: ColumnSize,
    pub insertable: bool,
    pub updatable: bool,

    /// SQL fragment used in place of the column when reading.
    pub read: Option<String>,

    /// SQL fragment used in place of `?` when writing.
    pub write: Option<String>,

    pub unique: bool,
}

impl ColumnSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: None,
            size: ColumnSize::default(),
            insertable: true,
            updatable: true,
            read: None,
            write: None,
            unique: false,
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn length(mut self, length: u32) -> Self {
        self.size.length = Some(length);
        self
    }

    pub fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.size.precision = Some(precision);
        self.size.scale = Some(scale);
        self
    }

    pub fn insertable(mut self, insertable: bool) -> Self {
        self.insertable = insertable;
        self
    }

    pub fn updatable(mut self, updatable: bool) -> Self {
        self.updatable = updatable;
        self
    }

    pub fn read(mut self, expression: impl Into<String>) -> Self {
        self.read = Some(expression.into());
        self
    }

    pub fn write(mut self, expression: impl Into<String>) -> Self {
        self.write = Some(expression.into());
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

impl From<&str> for ColumnSource {
    fn from(value: &str) -> Self {
        ColumnSource::new(value)
    }
}

/// Where a basic value lives in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationalValueSource {
    Column(ColumnSource),

    /// A read-only SQL formula
    DerivedValue(String),
}

impl RelationalValueSource {
    pub fn as_column(&self) -> Option<&ColumnSource> {
        match self {
            Self::Column(column) => Some(column),
            Self::DerivedValue(_) => None,
        }
    }
}
