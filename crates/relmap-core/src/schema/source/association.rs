use super::{BasicSource, ColumnSource, TableSource};

/// What the join columns of a to-one association reference.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum ForeignKeyTarget {
    /// The target entity's identifier.
    #[default]
    PrimaryKey,

    /// A basic or embedded attribute of the target entity.
    Attribute(String),

    /// The association is the inverse side of the named attribute of the
    /// target entity and owns no columns.
    MappedBy(String),
}

/// Behavior when a foreign key references a missing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NotFoundAction {
    Exception,
    Ignore,
}

#[derive(Debug, Clone)]
pub struct ToOneSource {
    /// Name of the associated entity
    pub target: String,

    pub join_columns: Vec<ColumnSource>,
    pub fk_target: ForeignKeyTarget,

    /// A many-to-one with a unique key, treated as one-to-one.
    pub logical_one_to_one: bool,

    pub not_found: Option<NotFoundAction>,

    /// Whether a physical constraint backs the foreign key.
    pub constraint: bool,
}

impl ToOneSource {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            join_columns: vec![],
            fk_target: ForeignKeyTarget::PrimaryKey,
            logical_one_to_one: false,
            not_found: None,
            constraint: true,
        }
    }

    pub fn join_column(mut self, column: impl Into<ColumnSource>) -> Self {
        self.join_columns.push(column.into());
        self
    }

    /// References a non-identifier attribute of the target.
    pub fn references(mut self, attribute: impl Into<String>) -> Self {
        self.fk_target = ForeignKeyTarget::Attribute(attribute.into());
        self
    }

    pub fn mapped_by(mut self, attribute: impl Into<String>) -> Self {
        self.fk_target = ForeignKeyTarget::MappedBy(attribute.into());
        self
    }

    pub fn logical_one_to_one(mut self) -> Self {
        self.logical_one_to_one = true;
        self
    }

    pub fn not_found(mut self, action: NotFoundAction) -> Self {
        self.not_found = Some(action);
        self
    }

    pub fn no_constraint(mut self) -> Self {
        self.constraint = false;
        self
    }

    pub fn mapped_by_attribute(&self) -> Option<&str> {
        match &self.fk_target {
            ForeignKeyTarget::MappedBy(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollectionClassification {
    Bag,
    IdBag,
    List,
    Set,
    Map,
}

impl CollectionClassification {
    pub fn is_indexed(self) -> bool {
        matches!(self, Self::List | Self::Map)
    }
}

#[derive(Debug, Clone)]
pub enum ElementSource {
    Basic(BasicSource),

    /// Name of the embeddable
    Composite(String),

    /// Name of the target entity. The target's table holds the key columns.
    OneToMany(String),

    /// Target entity plus the collection-table columns referencing it.
    ManyToMany {
        target: String,
        columns: Vec<ColumnSource>,
    },
}

impl ElementSource {
    pub fn one_to_many(target: impl Into<String>) -> Self {
        Self::OneToMany(target.into())
    }

    pub fn many_to_many(target: impl Into<String>) -> Self {
        Self::ManyToMany {
            target: target.into(),
            columns: vec![],
        }
    }

    pub fn composite(embeddable: impl Into<String>) -> Self {
        Self::Composite(embeddable.into())
    }

    /// The associated entity, if the elements are entities.
    pub fn target_entity(&self) -> Option<&str> {
        match self {
            Self::OneToMany(target) | Self::ManyToMany { target, .. } => Some(target),
            _ => None,
        }
    }
}

impl From<BasicSource> for ElementSource {
    fn from(value: BasicSource) -> Self {
        Self::Basic(value)
    }
}

#[derive(Debug, Clone)]
pub struct PluralSource {
    pub classification: CollectionClassification,
    pub element: ElementSource,

    /// List index or map key.
    pub index: Option<BasicSource>,

    /// Surrogate row identifier of an id-bag.
    pub collection_id: Option<BasicSource>,

    /// Collection table. Unused by one-to-many associations without a join
    /// table.
    pub table: Option<TableSource>,

    /// Columns of the collection table referencing the owner.
    pub key_columns: Vec<ColumnSource>,

    pub mapped_by: Option<String>,
    pub order_by: Option<String>,
}

impl PluralSource {
    fn new(classification: CollectionClassification, element: ElementSource) -> Self {
        Self {
            classification,
            element,
            index: None,
            collection_id: None,
            table: None,
            key_columns: vec![],
            mapped_by: None,
            order_by: None,
        }
    }

    pub fn bag(element: impl Into<ElementSource>) -> Self {
        Self::new(CollectionClassification::Bag, element.into())
    }

    pub fn set(element: impl Into<ElementSource>) -> Self {
        Self::new(CollectionClassification::Set, element.into())
    }

    pub fn list(element: impl Into<ElementSource>, index: BasicSource) -> Self {
        let mut plural = Self::new(CollectionClassification::List, element.into());
        plural.index = Some(index);
        plural
    }

    pub fn map(key: BasicSource, element: impl Into<ElementSource>) -> Self {
        let mut plural = Self::new(CollectionClassification::Map, element.into());
        plural.index = Some(key);
        plural
    }

    pub fn id_bag(element: impl Into<ElementSource>, id: BasicSource) -> Self {
        let mut plural = Self::new(CollectionClassification::IdBag, element.into());
        plural.collection_id = Some(id);
        plural
    }

    pub fn table(mut self, table: impl Into<TableSource>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn key_column(mut self, column: impl Into<ColumnSource>) -> Self {
        self.key_columns.push(column.into());
        self
    }

    pub fn mapped_by(mut self, attribute: impl Into<String>) -> Self {
        self.mapped_by = Some(attribute.into());
        self
    }

    pub fn order_by(mut self, fragment: impl Into<String>) -> Self {
        self.order_by = Some(fragment.into());
        self
    }
}
