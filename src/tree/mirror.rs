//! Local mirror of the kernel's feature tree

use crate::core::error::{EngineError, Result};
use crate::core::types::{FaceHandle, FeatureHandle, FeatureKind};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Geometry of one face, cached at confirm time
///
/// Face queries against the live kernel are the expensive, flaky part of
/// the pipeline, so each face is queried exactly once - when its owning
/// feature is confirmed - and resolution reads the cache from then on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceInfo {
    pub handle: FaceHandle,
    /// Outward normal in document coordinates
    pub normal: DVec3,
    pub planar: bool,
    /// Radius of the face's circular boundary, if it has one
    pub boundary_radius: Option<f64>,
}

/// One feature successfully created in the live kernel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureNode {
    /// Kernel-assigned identity; stable for the lifetime of the run
    pub handle: FeatureHandle,
    pub kind: FeatureKind,
    /// Faces owned by this feature, in kernel enumeration order,
    /// available as supports for later features
    pub faces: Vec<FaceInfo>,
    /// Single parent in the tree; `None` for features built on a datum plane
    pub parent: Option<FeatureHandle>,
    /// Direction this feature was extruded along (sign included)
    pub axis: DVec3,
    /// Creation-order index, assigned by the mirror on confirm
    pub order: usize,
}

impl FeatureNode {
    pub fn new(
        handle: FeatureHandle,
        kind: FeatureKind,
        faces: Vec<FaceInfo>,
        parent: Option<FeatureHandle>,
        axis: DVec3,
    ) -> Self {
        Self {
            handle,
            kind,
            faces,
            parent,
            axis,
            order: 0,
        }
    }
}

/// A resolved pointer to a specific face of a specific feature
///
/// A relation, never an owning pointer: look it up through
/// [`FeatureTreeMirror::face`], which re-checks that the node and face
/// still exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometricReference {
    pub node: FeatureHandle,
    pub face_index: usize,
    pub role: FaceRole,
}

/// What a resolved reference is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FaceRole {
    /// Planar face carrying a new sketch
    Support,
    /// Revolution axis derived from a feature
    Axis,
}

/// Arena of confirmed features, indexed by creation order and by handle
#[derive(Debug, Clone, Default)]
pub struct FeatureTreeMirror {
    nodes: Vec<FeatureNode>,
    by_handle: HashMap<FeatureHandle, usize>,
}

impl FeatureTreeMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All confirmed nodes in creation order
    pub fn nodes(&self) -> &[FeatureNode] {
        &self.nodes
    }

    /// Most recently confirmed node
    pub fn latest(&self) -> Option<&FeatureNode> {
        self.nodes.last()
    }

    pub fn get(&self, handle: FeatureHandle) -> Option<&FeatureNode> {
        self.by_handle.get(&handle).map(|&i| &self.nodes[i])
    }

    pub fn by_order(&self, order: usize) -> Option<&FeatureNode> {
        self.nodes.get(order)
    }

    pub fn index_of(&self, handle: FeatureHandle) -> Option<usize> {
        self.by_handle.get(&handle).copied()
    }

    /// Append a confirmed feature, assigning its creation-order index.
    ///
    /// This is the mirror's only mutation point. The node's parent must
    /// already be present and its handle must be new; either violation
    /// means the mirror and the kernel have drifted apart.
    pub fn confirm(&mut self, mut node: FeatureNode) -> Result<&FeatureNode> {
        if self.by_handle.contains_key(&node.handle) {
            return Err(EngineError::PostCondition(format!(
                "kernel returned duplicate feature handle {:?}",
                node.handle
            )));
        }
        if let Some(parent) = node.parent {
            if !self.by_handle.contains_key(&parent) {
                return Err(EngineError::PostCondition(format!(
                    "parent {:?} of {:?} is not in the mirror",
                    parent, node.handle
                )));
            }
        }

        let order = self.nodes.len();
        node.order = order;
        self.by_handle.insert(node.handle, order);
        self.nodes.push(node);
        Ok(&self.nodes[order])
    }

    /// Dereference a geometric reference, checking it is still valid
    pub fn face(&self, reference: &GeometricReference) -> Result<&FaceInfo> {
        let node = self.get(reference.node).ok_or_else(|| {
            EngineError::ReferenceNotFound(format!(
                "feature {:?} is no longer in the mirror",
                reference.node
            ))
        })?;
        node.faces.get(reference.face_index).ok_or_else(|| {
            EngineError::ReferenceNotFound(format!(
                "feature {:?} has no face with local index {}",
                reference.node, reference.face_index
            ))
        })
    }
}
