use super::{AttributeSource, DiscriminatorMatch, DiscriminatorSource};

#[derive(Debug, Clone)]
pub struct EmbeddableSource {
    pub name: String,

    /// Path of the Rust type backing the embeddable.
    pub type_name: String,

    pub attributes: Vec<AttributeSource>,

    /// Embeddable this one extends, for polymorphic embeddables.
    pub super_type: Option<String>,

    /// Discriminator of a polymorphic embeddable hierarchy. Only meaningful
    /// on the hierarchy root.
    pub discriminator: Option<DiscriminatorSource>,

    pub discriminator_value: Option<DiscriminatorMatch>,
}

impl EmbeddableSource {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            type_name: name.clone(),
            name,
            attributes: vec![],
            super_type: None,
            discriminator: None,
            discriminator_value: None,
        }
    }

    pub fn type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn attribute(mut self, attribute: AttributeSource) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn extends(mut self, super_type: impl Into<String>) -> Self {
        self.super_type = Some(super_type.into());
        self
    }

    pub fn discriminator(mut self, discriminator: DiscriminatorSource) -> Self {
        self.discriminator = Some(discriminator);
        self
    }

    pub fn discriminator_value(mut self, value: impl Into<DiscriminatorMatch>) -> Self {
        self.discriminator_value = Some(value.into());
        self
    }

    pub fn find_attribute(&self, name: &str) -> Option<&AttributeSource> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }
}
