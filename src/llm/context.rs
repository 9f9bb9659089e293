//! Document context for LLM prompts
//!
//! Builds a summary of the live document's feature tree so the parser can
//! disambiguate requests like "drill through it" - the model needs to know
//! what "it" currently is and how big it is.

use crate::core::types::{Axis, FeatureHandle, FeatureKind};
use crate::resolve::reference;
use crate::tree::FeatureTreeMirror;

/// Document context for LLM prompts
pub struct ModelContext {
    /// Name of the active document
    pub document: String,
    /// Confirmed features, in creation order
    pub features: Vec<FeatureSummary>,
}

/// One confirmed feature the user might reference
pub struct FeatureSummary {
    pub handle: FeatureHandle,
    pub kind: FeatureKind,
    pub order: usize,
    /// Boundary radius of the feature's top face, when circular
    pub top_radius: Option<f64>,
}

impl ModelContext {
    /// Build a context from the current mirror state
    pub fn from_mirror(document: &str, mirror: &FeatureTreeMirror) -> Self {
        let features = mirror
            .nodes()
            .iter()
            .map(|node| {
                let top_radius = reference::directional_face(node, Axis::PosZ.vector())
                    .ok()
                    .and_then(|r| mirror.face(&r).ok())
                    .and_then(|face| face.boundary_radius);
                FeatureSummary {
                    handle: node.handle,
                    kind: node.kind,
                    order: node.order,
                    top_radius,
                }
            })
            .collect();

        Self {
            document: document.to_string(),
            features,
        }
    }

    /// Render the context as prompt text
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Document '{}' with {} confirmed feature(s).",
            self.document,
            self.features.len()
        );

        if self.features.is_empty() {
            out.push_str(" The document is empty; new features start on an origin plane.");
            return out;
        }

        for feature in &self.features {
            let kind = match feature.kind {
                FeatureKind::Pad => "PAD",
                FeatureKind::Pocket => "POCKET",
            };
            match feature.top_radius {
                Some(radius) => out.push_str(&format!(
                    "\n- #{} {} (id {}), top face radius {:.3} mm",
                    feature.order, kind, feature.handle.0, radius
                )),
                None => out.push_str(&format!(
                    "\n- #{} {} (id {})",
                    feature.order, kind, feature.handle.0
                )),
            }
        }
        out
    }
}
