//! In-memory scene graph for tests, tooling, and embedding.
//!
//! [`SceneGraph`] is an arena of named objects with ordered children and
//! component lists. It implements [`SceneView`] directly and round-trips
//! through a nested JSON scene description:
//!
//! ```json
//! {
//!   "name": "Main",
//!   "roots": [
//!     {
//!       "name": "Player",
//!       "components": [
//!         { "type_name": "Health", "fields": [] },
//!         { "missing_script": "OldController.cs" }
//!       ],
//!       "children": []
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ScanError, ScanResult};
use crate::field::FieldDescriptor;
use crate::view::{ComponentSlot, Inspect, SceneView};

/// Handle to an object in a [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A loaded component with statically described fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub type_name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl ComponentRecord {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

impl Inspect for ComponentRecord {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn fields(&self) -> Vec<FieldDescriptor> {
        self.fields.clone()
    }
}

/// A component slot as stored in the graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComponentEntry {
    /// The script backing this slot failed to load. `missing_script` names
    /// it for diagnostics.
    Missing { missing_script: String },
    Loaded(ComponentRecord),
}

#[derive(Clone, Debug)]
struct Object {
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    components: Vec<ComponentEntry>,
}

/// Arena-backed scene graph.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(into = "SceneDescription", from = "SceneDescription")]
pub struct SceneGraph {
    name: String,
    objects: Vec<Object>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            objects: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Parse a JSON scene description.
    pub fn from_json(json: &str) -> ScanResult<Self> {
        serde_json::from_str(json).map_err(|e| ScanError::InvalidScene(e.to_string()))
    }

    /// Load a JSON scene description from disk.
    pub fn load(path: &Path) -> ScanResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Number of objects in the scene.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the scene has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // ---------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------

    /// Append a new root object.
    pub fn add_root(&mut self, name: impl Into<String>) -> NodeId {
        let id = self.push_object(name.into(), None);
        self.roots.push(id);
        id
    }

    /// Append a new child under `parent`.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> ScanResult<NodeId> {
        self.object(parent)?;
        let id = self.push_object(name.into(), Some(parent));
        self.objects[parent.0].children.push(id);
        Ok(id)
    }

    /// Attach a loaded component.
    pub fn add_component(&mut self, node: NodeId, component: ComponentRecord) -> ScanResult<()> {
        self.object_mut(node)?
            .components
            .push(ComponentEntry::Loaded(component));
        Ok(())
    }

    /// Attach a component slot whose script failed to load.
    pub fn add_missing_component(
        &mut self,
        node: NodeId,
        script: impl Into<String>,
    ) -> ScanResult<()> {
        self.object_mut(node)?.components.push(ComponentEntry::Missing {
            missing_script: script.into(),
        });
        Ok(())
    }

    fn push_object(&mut self, name: String, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.objects.len());
        self.objects.push(Object {
            name,
            parent,
            children: Vec::new(),
            components: Vec::new(),
        });
        id
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// Find an object by slash-separated path from a scene root, e.g.
    /// `"Level/Enemies/Boss"`. The first matching sibling wins.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let mut current = *self
            .roots
            .iter()
            .find(|id| self.objects[id.0].name == first)?;
        for segment in segments {
            current = *self.objects[current.0]
                .children
                .iter()
                .find(|id| self.objects[id.0].name == segment)?;
        }
        Some(current)
    }

    /// Parent of an object, `None` for roots and unknown handles.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.objects.get(node.0)?.parent
    }

    /// Full path of an object from its scene root.
    pub fn path_of(&self, node: NodeId) -> Option<String> {
        let mut names = vec![self.objects.get(node.0)?.name.as_str()];
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            names.push(&self.objects[parent.0].name);
            current = parent;
        }
        names.reverse();
        Some(names.join("/"))
    }

    fn object(&self, node: NodeId) -> ScanResult<&Object> {
        self.objects
            .get(node.0)
            .ok_or_else(|| ScanError::UnknownNode(format!("{node:?}")))
    }

    fn object_mut(&mut self, node: NodeId) -> ScanResult<&mut Object> {
        self.objects
            .get_mut(node.0)
            .ok_or_else(|| ScanError::UnknownNode(format!("{node:?}")))
    }
}

impl SceneView for SceneGraph {
    type Node = NodeId;

    fn scene_name(&self) -> &str {
        &self.name
    }

    fn roots(&self) -> Vec<NodeId> {
        self.roots.clone()
    }

    fn name(&self, node: NodeId) -> Option<&str> {
        self.objects.get(node.0).map(|o| o.name.as_str())
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.objects
            .get(node.0)
            .map(|o| o.children.clone())
            .unwrap_or_default()
    }

    fn components(&self, node: NodeId) -> Vec<ComponentSlot<'_>> {
        let Some(object) = self.objects.get(node.0) else {
            return Vec::new();
        };
        object
            .components
            .iter()
            .map(|entry| match entry {
                ComponentEntry::Loaded(record) => ComponentSlot::Loaded(record),
                ComponentEntry::Missing { .. } => ComponentSlot::Missing,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// JSON scene description
// ---------------------------------------------------------------------------

/// Nested, serializable form of a [`SceneGraph`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub name: String,
    #[serde(default)]
    pub roots: Vec<ObjectDescription>,
}

/// One object and its subtree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescription {
    pub name: String,
    #[serde(default)]
    pub components: Vec<ComponentEntry>,
    #[serde(default)]
    pub children: Vec<ObjectDescription>,
}

impl From<SceneDescription> for SceneGraph {
    fn from(description: SceneDescription) -> Self {
        let mut graph = SceneGraph::new(description.name);
        let mut pending: Vec<(Option<NodeId>, ObjectDescription)> =
            description.roots.into_iter().rev().map(|o| (None, o)).collect();

        // Pre-order with reversed pushes keeps sibling order.
        while let Some((parent, object)) = pending.pop() {
            let id = graph.push_object(object.name, parent);
            match parent {
                Some(p) => graph.objects[p.0].children.push(id),
                None => graph.roots.push(id),
            }
            graph.objects[id.0].components = object.components;
            pending.extend(object.children.into_iter().rev().map(|c| (Some(id), c)));
        }
        graph
    }
}

impl From<SceneGraph> for SceneDescription {
    fn from(graph: SceneGraph) -> Self {
        fn describe(graph: &SceneGraph, id: NodeId) -> ObjectDescription {
            let object = &graph.objects[id.0];
            ObjectDescription {
                name: object.name.clone(),
                components: object.components.clone(),
                children: object.children.iter().map(|c| describe(graph, *c)).collect(),
            }
        }

        SceneDescription {
            roots: graph.roots.iter().map(|r| describe(&graph, *r)).collect(),
            name: graph.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Slot;

    const SCENE: &str = r#"{
        "name": "Main",
        "roots": [
            {
                "name": "Player",
                "components": [
                    { "type_name": "Health" },
                    { "missing_script": "OldController.cs" }
                ],
                "children": [
                    { "name": "Camera" },
                    {
                        "name": "Weapon",
                        "components": [{
                            "type_name": "Gun",
                            "fields": [{
                                "name": "muzzle",
                                "shape": { "kind": "reference", "type_name": "Transform", "slot": "unassigned" }
                            }]
                        }]
                    }
                ]
            },
            { "name": "Lights" }
        ]
    }"#;

    #[test]
    fn parses_nested_description() {
        let scene = SceneGraph::from_json(SCENE).unwrap();
        assert_eq!(scene.scene_name(), "Main");
        assert_eq!(scene.len(), 4);
        assert_eq!(scene.roots().len(), 2);

        let player = scene.find("Player").unwrap();
        let children: Vec<&str> = scene
            .children(player)
            .into_iter()
            .filter_map(|c| scene.name(c))
            .collect();
        assert_eq!(children, vec!["Camera", "Weapon"]);

        let slots = scene.components(player);
        assert!(matches!(slots[0], ComponentSlot::Loaded(c) if c.type_name() == "Health"));
        assert!(matches!(slots[1], ComponentSlot::Missing));
    }

    #[test]
    fn find_and_path_of_agree() {
        let scene = SceneGraph::from_json(SCENE).unwrap();
        let weapon = scene.find("Player/Weapon").unwrap();
        assert_eq!(scene.path_of(weapon).unwrap(), "Player/Weapon");
        assert_eq!(scene.parent(weapon), scene.find("Player"));
        assert!(scene.find("Player/Shield").is_none());
        assert!(scene.find("").is_none());
    }

    #[test]
    fn description_round_trips() {
        let scene = SceneGraph::from_json(SCENE).unwrap();
        let json = serde_json::to_string(&scene).unwrap();
        let again = SceneGraph::from_json(&json).unwrap();
        assert_eq!(
            SceneDescription::from(scene),
            SceneDescription::from(again)
        );
    }

    #[test]
    fn builder_rejects_unknown_parent() {
        let mut scene = SceneGraph::new("Test");
        let err = scene.add_child(NodeId(7), "Orphan").unwrap_err();
        assert!(matches!(err, ScanError::UnknownNode(_)));
        assert!(scene.is_empty());
    }

    #[test]
    fn builder_components_are_visible_through_view() {
        let mut scene = SceneGraph::new("Test");
        let root = scene.add_root("Root");
        scene
            .add_component(
                root,
                ComponentRecord::new("Spawner")
                    .with_field(FieldDescriptor::reference("prefab", "GameObject", Slot::Assigned)),
            )
            .unwrap();
        let slots = scene.components(root);
        let ComponentSlot::Loaded(component) = slots[0] else {
            panic!("expected a loaded component");
        };
        assert_eq!(component.fields().len(), 1);
    }

    #[test]
    fn malformed_json_is_invalid_scene() {
        let err = SceneGraph::from_json("{\"roots\": 3}").unwrap_err();
        assert!(matches!(err, ScanError::InvalidScene(_)));
    }
}
