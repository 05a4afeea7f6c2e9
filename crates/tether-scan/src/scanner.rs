//! Depth-first reference integrity scan over a [`SceneView`].
//!
//! # Traversal
//!
//! Pre-order: each object is inspected before its children, and children
//! are visited in child-list order. `object_path` is the slash-joined chain
//! of names below the scan root; findings on the scan root itself carry the
//! root's own name.
//!
//! # Classification
//!
//! For every loaded component, each field is checked in declaration order:
//! non-reference shapes and internal fields are skipped, optional fields
//! report warnings, everything else reports errors. Scalars contribute one
//! examined slot; collections contribute one per element. Missing component
//! slots are findings in their own right and never stop the scan.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::asset::AssetLoader;
use crate::error::{ScanError, ScanResult};
use crate::field::{FieldShape, Slot, UNKNOWN_TYPE};
use crate::report::{Finding, Report, ScanWarning, Severity};
use crate::view::{ComponentSlot, Inspect, SceneView};

/// `component_type` reported for a component whose script failed to load.
pub const MISSING_SCRIPT: &str = "Missing Script";

/// Name shown for objects with an empty name.
const UNNAMED: &str = "<unnamed>";

/// What the hosting environment lets the scanner do.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostCapability {
    /// Live scene objects only.
    #[default]
    Runtime,
    /// Live scene objects plus assets on disk.
    Authoring,
}

impl HostCapability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Authoring => "authoring",
        }
    }
}

/// Reference integrity scanner.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scanner {
    capability: HostCapability,
}

impl Scanner {
    pub fn new(capability: HostCapability) -> Self {
        Self { capability }
    }

    /// A scanner for a host that only exposes live scene objects.
    pub fn runtime() -> Self {
        Self::new(HostCapability::Runtime)
    }

    /// A scanner for a host that can also open assets.
    pub fn authoring() -> Self {
        Self::new(HostCapability::Authoring)
    }

    pub fn capability(&self) -> HostCapability {
        self.capability
    }

    /// Scan one object, and its whole subtree when `include_children` is set.
    pub fn scan<V: SceneView>(
        &self,
        view: &V,
        root: V::Node,
        include_children: bool,
    ) -> ScanResult<Report> {
        let name = view
            .name(root)
            .ok_or_else(|| ScanError::UnknownNode(format!("{root:?}")))?;
        let mut report = Report::new(display_name(name));
        walk(view, root, include_children, &mut report);
        debug!(
            target = %report.scanned_target,
            fields = report.total_fields_scanned,
            nulls = report.null_count(),
            "scan complete"
        );
        Ok(report)
    }

    /// Scan every root of the active scene and all descendants into one
    /// report, in root order.
    pub fn scan_active_tree<V: SceneView>(&self, view: &V) -> Report {
        let mut report = Report::new(view.scene_name());
        let roots = view.roots();
        for root in &roots {
            walk(view, *root, true, &mut report);
        }
        debug!(
            scene = view.scene_name(),
            roots = roots.len(),
            fields = report.total_fields_scanned,
            nulls = report.null_count(),
            "scene scan complete"
        );
        report
    }

    /// Scan an asset that is not part of the active scene.
    ///
    /// Opening assets needs [`HostCapability::Authoring`]. On a runtime-only
    /// host this returns an empty report carrying a
    /// [`ScanWarning::CapabilityUnavailable`] instead of failing.
    pub fn scan_external_asset<L: AssetLoader>(
        &self,
        loader: &L,
        identifier: &str,
    ) -> ScanResult<Report> {
        if self.capability != HostCapability::Authoring {
            warn!(
                asset = identifier,
                capability = self.capability.as_str(),
                "asset scan needs authoring capability; returning empty report"
            );
            let mut report = Report::new(identifier);
            report.warnings.push(ScanWarning::CapabilityUnavailable {
                capability: HostCapability::Authoring.as_str().into(),
                detail: format!(
                    "host is {}-only; asset {identifier:?} was not inspected",
                    self.capability.as_str()
                ),
            });
            return Ok(report);
        }

        let asset = loader
            .load(identifier)?
            .ok_or_else(|| ScanError::AssetNotFound(identifier.into()))?;
        let mut report = self.scan_active_tree(&asset);
        report.scanned_target = identifier.to_string();
        Ok(report)
    }
}

/// Visit `root` (and optionally its subtree) pre-order, appending findings.
fn walk<V: SceneView>(view: &V, root: V::Node, include_children: bool, report: &mut Report) {
    // Each entry carries the node's path below the scan root; `None` marks
    // the root itself.
    let mut stack: Vec<(V::Node, Option<String>)> = vec![(root, None)];

    while let Some((node, relative)) = stack.pop() {
        let Some(name) = view.name(node) else {
            warn!(?node, "skipping unresolvable scene object");
            continue;
        };
        let object_path = relative.clone().unwrap_or_else(|| display_name(name).to_string());

        inspect_object(view, node, &object_path, report);

        if !include_children {
            continue;
        }
        // Reverse so the first child is popped first.
        for child in view.children(node).into_iter().rev() {
            let child_name = view.name(child).map(display_name).unwrap_or(UNNAMED);
            let child_path = match &relative {
                Some(parent) => format!("{parent}/{child_name}"),
                None => child_name.to_string(),
            };
            stack.push((child, Some(child_path)));
        }
    }
}

fn inspect_object<V: SceneView>(view: &V, node: V::Node, object_path: &str, report: &mut Report) {
    for slot in view.components(node) {
        match slot {
            ComponentSlot::Loaded(component) => inspect_component(component, object_path, report),
            ComponentSlot::Missing => {
                report.total_fields_scanned += 1;
                report.push(Finding {
                    object_path: object_path.to_string(),
                    component_type: MISSING_SCRIPT.into(),
                    field_name: "script".into(),
                    expected_type: "Component".into(),
                    severity: Severity::Error,
                    array_index: None,
                });
            }
        }
    }
}

fn inspect_component(component: &dyn Inspect, object_path: &str, report: &mut Report) {
    let component_type = component.type_name();

    for field in component.fields() {
        if !field.visibility.is_scanned() || !field.shape.is_reference() {
            continue;
        }
        let severity = if field.optional {
            Severity::Warning
        } else {
            Severity::Error
        };
        let finding = |expected_type: &str, array_index: Option<usize>| Finding {
            object_path: object_path.to_string(),
            component_type: component_type.to_string(),
            field_name: field.name.clone(),
            expected_type: expected_type.to_string(),
            severity,
            array_index,
        };

        match &field.shape {
            FieldShape::Data { .. } => {}
            FieldShape::Reference { type_name, slot } => {
                report.total_fields_scanned += 1;
                if slot.is_empty() {
                    report.push(finding(type_name, None));
                }
            }
            FieldShape::Collection { element, slots, .. } => {
                let expected = element.expected_type().unwrap_or(UNKNOWN_TYPE);
                report.total_fields_scanned += slots.len();
                for (index, _) in slots.iter().enumerate().filter(|(_, s)| Slot::is_empty(**s)) {
                    report.push(finding(expected, Some(index)));
                }
            }
        }
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        UNNAMED
    } else {
        name
    }
}
