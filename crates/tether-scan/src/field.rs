//! Field descriptors: how a component describes its own fields.
//!
//! Hosts implement [`Inspect`](crate::Inspect) by returning one
//! [`FieldDescriptor`] per declared field. The scanner never needs runtime
//! reflection; everything it classifies on is carried here.

use serde::{Deserialize, Serialize};

/// Expected type reported for a generic list declared without an element
/// type argument.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// Current state of one reference slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Holds a live reference.
    Assigned,
    /// Never assigned.
    Unassigned,
    /// Was assigned, but the target has since been destroyed.
    Destroyed,
}

impl Slot {
    /// Returns `true` if the slot holds no valid reference.
    pub fn is_empty(self) -> bool {
        !matches!(self, Self::Assigned)
    }
}

/// Whether a field takes part in the component's persisted state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Externally visible.
    #[default]
    Public,
    /// Not public, but explicitly marked as serialized.
    Serialized,
    /// Implementation detail; never scanned.
    Internal,
}

impl Visibility {
    /// Returns `true` if fields with this visibility are scanned.
    pub fn is_scanned(self) -> bool {
        !matches!(self, Self::Internal)
    }
}

/// Container kind of a collection field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    Array,
    List,
}

/// Declared element type of a collection field.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// A reference-capable element type.
    Reference(String),
    /// Plain data elements; the collection is not scanned.
    Data(String),
    /// A generic list with no element type argument.
    Undeclared,
}

impl ElementType {
    /// The type name reported in findings, or `None` for data elements.
    pub fn expected_type(&self) -> Option<&str> {
        match self {
            Self::Reference(name) => Some(name),
            Self::Undeclared => Some(UNKNOWN_TYPE),
            Self::Data(_) => None,
        }
    }
}

/// Declared type and current value of a field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldShape {
    /// Embedded data (numbers, strings, structs). Never scanned.
    Data { type_name: String },
    /// A single object reference.
    Reference { type_name: String, slot: Slot },
    /// An array or single-parameter generic list.
    Collection {
        collection: CollectionKind,
        element: ElementType,
        #[serde(default)]
        slots: Vec<Slot>,
    },
}

impl FieldShape {
    /// Returns `true` if the scanner inspects fields of this shape.
    pub fn is_reference(&self) -> bool {
        match self {
            Self::Data { .. } => false,
            Self::Reference { .. } => true,
            Self::Collection { element, .. } => element.expected_type().is_some(),
        }
    }
}

/// One declared field of a component.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    /// Marked optional: emptiness is a warning rather than an error.
    #[serde(default)]
    pub optional: bool,
    pub shape: FieldShape,
}

impl FieldDescriptor {
    fn new(name: impl Into<String>, shape: FieldShape) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            optional: false,
            shape,
        }
    }

    /// A plain data field.
    pub fn data(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldShape::Data {
                type_name: type_name.into(),
            },
        )
    }

    /// A scalar reference field.
    pub fn reference(name: impl Into<String>, type_name: impl Into<String>, slot: Slot) -> Self {
        Self::new(
            name,
            FieldShape::Reference {
                type_name: type_name.into(),
                slot,
            },
        )
    }

    /// An array of references.
    pub fn array(
        name: impl Into<String>,
        element: impl Into<String>,
        slots: impl IntoIterator<Item = Slot>,
    ) -> Self {
        Self::collection(name, CollectionKind::Array, ElementType::Reference(element.into()), slots)
    }

    /// A generic list of references.
    pub fn list(
        name: impl Into<String>,
        element: impl Into<String>,
        slots: impl IntoIterator<Item = Slot>,
    ) -> Self {
        Self::collection(name, CollectionKind::List, ElementType::Reference(element.into()), slots)
    }

    /// Any collection field.
    pub fn collection(
        name: impl Into<String>,
        collection: CollectionKind,
        element: ElementType,
        slots: impl IntoIterator<Item = Slot>,
    ) -> Self {
        Self::new(
            name,
            FieldShape::Collection {
                collection,
                element,
                slots: slots.into_iter().collect(),
            },
        )
    }

    /// Mark the field optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_assigned_slots_are_filled() {
        assert!(!Slot::Assigned.is_empty());
        assert!(Slot::Unassigned.is_empty());
        assert!(Slot::Destroyed.is_empty());
    }

    #[test]
    fn internal_fields_are_not_scanned() {
        assert!(Visibility::Public.is_scanned());
        assert!(Visibility::Serialized.is_scanned());
        assert!(!Visibility::Internal.is_scanned());
    }

    #[test]
    fn reference_classification() {
        assert!(!FieldDescriptor::data("hp", "int").shape.is_reference());
        assert!(FieldDescriptor::reference("target", "Transform", Slot::Assigned)
            .shape
            .is_reference());
        assert!(FieldDescriptor::array("waypoints", "Transform", [Slot::Assigned]).shape.is_reference());

        let numbers = FieldDescriptor::collection(
            "scores",
            CollectionKind::List,
            ElementType::Data("int".into()),
            [Slot::Unassigned],
        );
        assert!(!numbers.shape.is_reference());
    }

    #[test]
    fn undeclared_list_element_reports_unknown() {
        assert_eq!(ElementType::Undeclared.expected_type(), Some(UNKNOWN_TYPE));
        assert_eq!(ElementType::Reference("Enemy".into()).expected_type(), Some("Enemy"));
        assert_eq!(ElementType::Data("float".into()).expected_type(), None);
    }

    #[test]
    fn descriptor_json_shape() {
        let field: FieldDescriptor = serde_json::from_str(
            r#"{"name":"target","optional":true,
                "shape":{"kind":"reference","type_name":"Transform","slot":"destroyed"}}"#,
        )
        .unwrap();
        assert_eq!(
            field,
            FieldDescriptor::reference("target", "Transform", Slot::Destroyed).optional()
        );

        let list: FieldDescriptor = serde_json::from_str(
            r#"{"name":"items","visibility":"serialized",
                "shape":{"kind":"collection","collection":"list","element":"undeclared",
                         "slots":["assigned","unassigned"]}}"#,
        )
        .unwrap();
        assert_eq!(list.visibility, Visibility::Serialized);
        assert_eq!(
            list.shape,
            FieldShape::Collection {
                collection: CollectionKind::List,
                element: ElementType::Undeclared,
                slots: vec![Slot::Assigned, Slot::Unassigned],
            }
        );
    }
}
