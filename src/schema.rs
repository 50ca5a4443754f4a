//! Declarative shape schemas
//!
//! A [`Schema`] is an ordered, immutable list of [`Attribute`] declarations
//! describing one shape's legal fields. Three constructors append the fixed
//! common-field suffix for the three schema kinds: plain elements, backbone
//! (nested) structures, and top-level resources. Declared types form a
//! closed sum type so the walker can match exhaustively; the only runtime
//! string dispatch left is the genuinely dynamic case of polymorphic
//! embedded resources resolved by their own `resourceType` tag.

use crate::error::{SchemaError, SchemaResult};

/// Lexical kinds of primitive values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    UnsignedInt,
    PositiveInt,
    Decimal,
    String,
    Code,
    Id,
    Markdown,
    Base64Binary,
    Uri,
    Url,
    Canonical,
    Oid,
    Uuid,
    Date,
    DateTime,
    Instant,
    Time,
    Xhtml,
}

impl PrimitiveKind {
    /// The declared type name as it appears in the interchange specification.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::UnsignedInt => "unsignedInt",
            Self::PositiveInt => "positiveInt",
            Self::Decimal => "decimal",
            Self::String => "string",
            Self::Code => "code",
            Self::Id => "id",
            Self::Markdown => "markdown",
            Self::Base64Binary => "base64Binary",
            Self::Uri => "uri",
            Self::Url => "url",
            Self::Canonical => "canonical",
            Self::Oid => "oid",
            Self::Uuid => "uuid",
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::Instant => "instant",
            Self::Time => "time",
            Self::Xhtml => "xhtml",
        }
    }
}

/// The declared type of one attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    /// A primitive lexical kind, checked statically by the primitive validator
    Primitive(PrimitiveKind),
    /// A composite datatype shape resolved through the registry
    Complex(&'static str),
    /// A nested backbone structure resolved through the registry
    Backbone(&'static str),
    /// A named top-level resource shape resolved through the registry
    Resource(&'static str),
    /// A reference value; format-checked, then walked as the Reference shape
    Reference,
    /// Polymorphic embedded resource, dispatched by its own resourceType tag
    AnyResource,
}

impl DeclaredType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Primitive(kind) => kind.name(),
            Self::Complex(name) | Self::Backbone(name) | Self::Resource(name) => name,
            Self::Reference => "Reference",
            Self::AnyResource => "Resource",
        }
    }
}

/// One attribute declaration in a shape's schema
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: &'static str,
    pub declared_type: DeclaredType,
    pub required: bool,
    pub array: bool,
    /// Legal codes for a bound scalar or coded composite
    pub enum_values: Option<&'static [&'static str]>,
    /// Allowed resource-type targets for a reference attribute
    pub reference_targets: Option<&'static [&'static str]>,
}

impl Attribute {
    /// An optional scalar attribute of the given type.
    pub fn new(name: &'static str, declared_type: DeclaredType) -> Self {
        Self {
            name,
            declared_type,
            required: false,
            array: false,
            enum_values: None,
            reference_targets: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    pub fn with_enum(mut self, values: &'static [&'static str]) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn with_targets(mut self, targets: &'static [&'static str]) -> Self {
        self.reference_targets = Some(targets);
        self
    }
}

/// The ordered attribute list for one shape, immutable once constructed
#[derive(Debug, Clone)]
pub struct Schema {
    attributes: Vec<Attribute>,
}

impl Schema {
    /// Schema for a primitive-bearing element: shape fields plus the
    /// identity/extension suffix.
    pub fn element(fields: Vec<Attribute>) -> SchemaResult<Self> {
        Self::with_suffix(fields, Self::element_suffix())
    }

    /// Schema for a nested backbone structure: the element suffix plus the
    /// modifier-extension list.
    pub fn backbone(fields: Vec<Attribute>) -> SchemaResult<Self> {
        let mut suffix = Self::element_suffix();
        suffix.push(
            Attribute::new("modifierExtension", DeclaredType::Complex("Extension")).array(),
        );
        Self::with_suffix(fields, suffix)
    }

    /// Schema for a top-level resource: shape fields plus the resource
    /// identity, metadata, narrative, containment, and extension suffix.
    pub fn resource(fields: Vec<Attribute>) -> SchemaResult<Self> {
        let suffix = vec![
            Attribute::new("resourceType", DeclaredType::Primitive(PrimitiveKind::Code))
                .required(),
            Attribute::new("id", DeclaredType::Primitive(PrimitiveKind::Id)),
            Attribute::new("meta", DeclaredType::Complex("Meta")),
            Attribute::new("implicitRules", DeclaredType::Primitive(PrimitiveKind::Uri)),
            Attribute::new("language", DeclaredType::Primitive(PrimitiveKind::Code)),
            Attribute::new("text", DeclaredType::Complex("Narrative")),
            Attribute::new("contained", DeclaredType::AnyResource).array(),
            Attribute::new("extension", DeclaredType::Complex("Extension")).array(),
            Attribute::new("modifierExtension", DeclaredType::Complex("Extension")).array(),
        ];
        Self::with_suffix(fields, suffix)
    }

    fn element_suffix() -> Vec<Attribute> {
        vec![
            Attribute::new("id", DeclaredType::Primitive(PrimitiveKind::String)),
            Attribute::new("extension", DeclaredType::Complex("Extension")).array(),
        ]
    }

    fn with_suffix(mut fields: Vec<Attribute>, suffix: Vec<Attribute>) -> SchemaResult<Self> {
        fields.extend(suffix);
        for (index, attribute) in fields.iter().enumerate() {
            if fields[..index].iter().any(|a| a.name == attribute.name) {
                return Err(SchemaError::duplicate_attribute(attribute.name));
            }
        }
        Ok(Self { attributes: fields })
    }

    /// Look up a declaration by attribute name.
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// All declarations in schema order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_suffix_appended() {
        let schema = Schema::element(vec![Attribute::new(
            "code",
            DeclaredType::Primitive(PrimitiveKind::Code),
        )])
        .unwrap();

        let names: Vec<_> = schema.attributes().iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["code", "id", "extension"]);
    }

    #[test]
    fn test_backbone_suffix_includes_modifier_extension() {
        let schema = Schema::backbone(vec![]).unwrap();
        assert!(schema.get("modifierExtension").is_some());
        assert!(schema.get("extension").is_some());
        assert!(schema.get("id").is_some());
    }

    #[test]
    fn test_resource_suffix_fields() {
        let schema = Schema::resource(vec![]).unwrap();
        for name in [
            "resourceType",
            "id",
            "meta",
            "implicitRules",
            "language",
            "text",
            "contained",
            "extension",
            "modifierExtension",
        ] {
            assert!(schema.get(name).is_some(), "missing suffix field {name}");
        }
        assert!(schema.get("resourceType").unwrap().required);
        assert!(schema.get("contained").unwrap().array);
    }

    #[test]
    fn test_duplicate_attribute_rejected() {
        let result = Schema::element(vec![
            Attribute::new("code", DeclaredType::Primitive(PrimitiveKind::Code)),
            Attribute::new("code", DeclaredType::Primitive(PrimitiveKind::String)),
        ]);
        assert_eq!(
            result.unwrap_err(),
            SchemaError::duplicate_attribute("code")
        );
    }

    #[test]
    fn test_duplicate_with_suffix_rejected() {
        // "id" collides with the element suffix
        let result = Schema::element(vec![Attribute::new(
            "id",
            DeclaredType::Primitive(PrimitiveKind::String),
        )]);
        assert!(result.is_err());
    }

    #[test]
    fn test_declared_type_names() {
        assert_eq!(DeclaredType::Primitive(PrimitiveKind::DateTime).name(), "dateTime");
        assert_eq!(DeclaredType::Complex("Coding").name(), "Coding");
        assert_eq!(DeclaredType::Reference.name(), "Reference");
        assert_eq!(DeclaredType::AnyResource.name(), "Resource");
    }
}
