//! Geometric Reference Resolver - symbolic roles to concrete entities
//!
//! Ambiguous references ("the top face") are resolved through a closed set
//! of rules rather than free-form matching, so that identical snapshots
//! always yield identical references.

use crate::core::error::{EngineError, Result};
use crate::core::types::{DatumPlane, FeatureHandle};
use crate::plan::PlannedSupport;
use crate::tree::{FaceRole, FeatureNode, FeatureTreeMirror, GeometricReference};
use glam::DVec3;

/// Concrete support for a new sketch
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SketchSupport {
    /// One of the three fixed origin planes
    Datum(DatumPlane),
    /// Planar face of a confirmed feature
    Face(GeometricReference),
}

/// Revolution axis derived from a confirmed feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisReference {
    pub node: FeatureHandle,
    pub direction: DVec3,
}

/// Resolve a planned support against a snapshot of the mirror.
///
/// `run_base` is the mirror length at run start; plan-step supports are
/// offset by it so resumed runs address their own steps, not features
/// confirmed by earlier runs.
pub fn resolve_support(
    support: &PlannedSupport,
    snapshot: &FeatureTreeMirror,
    run_base: usize,
) -> Result<SketchSupport> {
    match support {
        PlannedSupport::Datum(plane) => Ok(SketchSupport::Datum(*plane)),
        PlannedSupport::Previous(axis) => {
            let node = snapshot.latest().ok_or_else(|| {
                EngineError::ReferenceNotFound(
                    "no previous feature: the document is empty".into(),
                )
            })?;
            Ok(SketchSupport::Face(directional_face(node, axis.vector())?))
        }
        PlannedSupport::Step { index, axis } => {
            let node = snapshot.by_order(run_base + index).ok_or_else(|| {
                EngineError::ReferenceNotFound(format!(
                    "plan step {} has not been confirmed yet",
                    index
                ))
            })?;
            Ok(SketchSupport::Face(directional_face(node, axis.vector())?))
        }
        PlannedSupport::Feature { handle, axis } => {
            let node = snapshot.get(*handle).ok_or_else(|| {
                EngineError::ReferenceNotFound(format!(
                    "feature {:?} is not in the mirror",
                    handle
                ))
            })?;
            Ok(SketchSupport::Face(directional_face(node, axis.vector())?))
        }
    }
}

/// Pick the planar face of `node` whose outward normal best matches the
/// requested direction (dot-product maximization; ties broken by lowest
/// local face index).
pub fn directional_face(node: &FeatureNode, axis: DVec3) -> Result<GeometricReference> {
    let mut best: Option<(usize, f64)> = None;

    for (index, face) in node.faces.iter().enumerate() {
        if !face.planar {
            continue;
        }
        let score = face.normal.dot(axis);
        // Strict comparison keeps the lowest index on ties
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((index, score));
        }
    }

    let (face_index, _) = best.ok_or_else(|| {
        EngineError::InvalidSupport(format!(
            "feature {:?} has no planar face to sketch on",
            node.handle
        ))
    })?;

    Ok(GeometricReference {
        node: node.handle,
        face_index,
        role: FaceRole::Support,
    })
}

/// Resolve an "axis-of" role reference to a feature's extrusion axis.
pub fn resolve_axis(
    handle: FeatureHandle,
    snapshot: &FeatureTreeMirror,
) -> Result<AxisReference> {
    let node = snapshot.get(handle).ok_or_else(|| {
        EngineError::ReferenceNotFound(format!("feature {:?} is not in the mirror", handle))
    })?;
    Ok(AxisReference {
        node: node.handle,
        direction: node.axis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Axis, FaceHandle, FeatureKind};
    use crate::tree::FaceInfo;

    fn face(handle: u64, normal: DVec3, planar: bool) -> FaceInfo {
        FaceInfo {
            handle: FaceHandle(handle),
            normal,
            planar,
            boundary_radius: Some(10.0),
        }
    }

    fn node_with_faces(handle: u64, faces: Vec<FaceInfo>) -> FeatureNode {
        FeatureNode::new(FeatureHandle(handle), FeatureKind::Pad, faces, None, DVec3::Z)
    }

    fn one_pad_mirror() -> FeatureTreeMirror {
        let mut mirror = FeatureTreeMirror::new();
        mirror
            .confirm(node_with_faces(
                1,
                vec![
                    face(10, -DVec3::Z, true),
                    face(11, DVec3::X, false),
                    face(12, DVec3::Z, true),
                ],
            ))
            .unwrap();
        mirror
    }

    #[test]
    fn test_top_of_previous_maximizes_dot_product() {
        let mirror = one_pad_mirror();
        let support = resolve_support(
            &PlannedSupport::Previous(Axis::PosZ),
            &mirror,
            0,
        )
        .unwrap();
        match support {
            SketchSupport::Face(r) => {
                assert_eq!(r.face_index, 2);
                assert_eq!(r.node, FeatureHandle(1));
            }
            other => panic!("expected face support, got {:?}", other),
        }
    }

    #[test]
    fn test_bottom_of_previous() {
        let mirror = one_pad_mirror();
        let support = resolve_support(
            &PlannedSupport::Previous(Axis::NegZ),
            &mirror,
            0,
        )
        .unwrap();
        match support {
            SketchSupport::Face(r) => assert_eq!(r.face_index, 0),
            other => panic!("expected face support, got {:?}", other),
        }
    }

    #[test]
    fn test_non_planar_faces_are_skipped() {
        // Only non-planar faces point along +X; the lookup must not pick them
        let node = node_with_faces(
            2,
            vec![face(20, DVec3::X, false), face(21, DVec3::Z, true)],
        );
        let r = directional_face(&node, DVec3::X).unwrap();
        assert_eq!(r.face_index, 1);
    }

    #[test]
    fn test_tie_broken_by_lowest_index() {
        let node = node_with_faces(
            3,
            vec![face(30, DVec3::Z, true), face(31, DVec3::Z, true)],
        );
        let r = directional_face(&node, DVec3::Z).unwrap();
        assert_eq!(r.face_index, 0);
    }

    #[test]
    fn test_no_planar_face_is_invalid_support() {
        let node = node_with_faces(4, vec![face(40, DVec3::X, false)]);
        assert!(matches!(
            directional_face(&node, DVec3::Z),
            Err(EngineError::InvalidSupport(_))
        ));
    }

    #[test]
    fn test_previous_on_empty_mirror_fails() {
        let mirror = FeatureTreeMirror::new();
        let result = resolve_support(&PlannedSupport::Previous(Axis::PosZ), &mirror, 0);
        assert!(matches!(result, Err(EngineError::ReferenceNotFound(_))));
    }

    #[test]
    fn test_base_plane_resolves_on_empty_mirror() {
        let mirror = FeatureTreeMirror::new();
        let support =
            resolve_support(&PlannedSupport::Datum(DatumPlane::Xy), &mirror, 0).unwrap();
        assert_eq!(support, SketchSupport::Datum(DatumPlane::Xy));
    }

    #[test]
    fn test_unknown_feature_id_fails() {
        let mirror = one_pad_mirror();
        let result = resolve_support(
            &PlannedSupport::Feature {
                handle: FeatureHandle(99),
                axis: Axis::PosZ,
            },
            &mirror,
            0,
        );
        assert!(matches!(result, Err(EngineError::ReferenceNotFound(_))));
    }

    #[test]
    fn test_step_support_respects_run_base() {
        let mut mirror = one_pad_mirror();
        mirror
            .confirm(node_with_faces(
                2,
                vec![face(20, -DVec3::Z, true), face(22, DVec3::Z, true)],
            ))
            .unwrap();

        // With run_base 1, plan step 0 is the second mirror node
        let support = resolve_support(
            &PlannedSupport::Step {
                index: 0,
                axis: Axis::PosZ,
            },
            &mirror,
            1,
        )
        .unwrap();
        match support {
            SketchSupport::Face(r) => assert_eq!(r.node, FeatureHandle(2)),
            other => panic!("expected face support, got {:?}", other),
        }
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let mirror = one_pad_mirror();
        let a = resolve_support(&PlannedSupport::Previous(Axis::PosZ), &mirror, 0).unwrap();
        let b = resolve_support(&PlannedSupport::Previous(Axis::PosZ), &mirror, 0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_axis_of_feature() {
        let mirror = one_pad_mirror();
        let axis = resolve_axis(FeatureHandle(1), &mirror).unwrap();
        assert_eq!(axis.direction, DVec3::Z);
        assert!(resolve_axis(FeatureHandle(9), &mirror).is_err());
    }
}
