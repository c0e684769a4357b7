use std::fmt;

/// Dotted path naming a node of the domain graph, rooted at an entity:
/// `Order`, `Order.pk`, `Order.pk.customerId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NavigableRole(String);

impl NavigableRole {
    pub fn new(root: impl Into<String>) -> Self {
        Self(root.into())
    }

    pub fn append(&self, part: &str) -> Self {
        Self(format!("{}.{part}", self.0))
    }

    pub fn full_path(&self) -> &str {
        &self.0
    }

    pub fn local_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    pub fn parent(&self) -> Option<Self> {
        self.0
            .rsplit_once('.')
            .map(|(parent, _)| Self(parent.to_string()))
    }

    pub fn is_root(&self) -> bool {
        !self.0.contains('.')
    }
}

impl fmt::Display for NavigableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_nest() {
        let role = NavigableRole::new("Order").append("pk").append("customerId");
        assert_eq!(role.full_path(), "Order.pk.customerId");
        assert_eq!(role.local_name(), "customerId");
        assert_eq!(role.parent().unwrap().full_path(), "Order.pk");
        assert!(NavigableRole::new("Order").is_root());
    }
}
