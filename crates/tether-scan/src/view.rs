use std::fmt;

use crate::field::FieldDescriptor;

/// A component that can describe its own fields.
pub trait Inspect {
    /// Runtime type name, reported as `component_type` in findings.
    fn type_name(&self) -> &str;

    /// Every declared field, in declaration order.
    fn fields(&self) -> Vec<FieldDescriptor>;
}

/// One component slot on a scene object.
pub enum ComponentSlot<'a> {
    /// The component's implementation loaded.
    Loaded(&'a dyn Inspect),
    /// The backing script failed to load.
    Missing,
}

impl fmt::Debug for ComponentSlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded(component) => f.debug_tuple("Loaded").field(&component.type_name()).finish(),
            Self::Missing => f.write_str("Missing"),
        }
    }
}

/// Read-only view of a host-owned object tree.
///
/// The scanner holds no global state: each call receives a view and a root
/// handle. Implementations must return children in a stable order.
pub trait SceneView {
    /// Handle to one object in the tree.
    type Node: Copy + fmt::Debug;

    /// Name of the active scene.
    fn scene_name(&self) -> &str;

    /// Root objects of the active scene, in scene order.
    fn roots(&self) -> Vec<Self::Node>;

    /// Object name, or `None` if the handle does not resolve.
    fn name(&self, node: Self::Node) -> Option<&str>;

    /// Direct children, in child-list order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// Component slots attached to the object.
    fn components(&self, node: Self::Node) -> Vec<ComponentSlot<'_>>;
}
