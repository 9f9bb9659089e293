//! In-memory kernel session for tests and dry runs
//!
//! Models the behaviors a live modeller exhibits and that the engine has
//! to handle: faces enumerated bottom / lateral / top, lateral faces
//! non-planar, empty sketches rejected at feature creation, and injectable
//! failures for exercising partial-success reporting.

use crate::core::types::{FaceHandle, FeatureHandle, ProfileSpec, SketchHandle};
use crate::exec::kernel::{ExtrusionDirection, KernelError, KernelSession, SketchPlane};
use glam::DVec3;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct SimSketch {
    origin: DVec3,
    normal: DVec3,
    profile: Option<ProfileSpec>,
}

#[derive(Debug, Clone)]
struct SimFace {
    normal: DVec3,
    planar: bool,
    boundary_radius: Option<f64>,
    /// A point on the face, used as the origin for sketches placed on it
    origin: DVec3,
}

#[derive(Debug, Clone, Default)]
struct SimFeature {
    faces: Vec<FaceHandle>,
}

/// Deterministic in-memory implementation of [`KernelSession`]
#[derive(Debug, Default)]
pub struct SimulatedKernel {
    next_id: u64,
    sketches: HashMap<SketchHandle, SimSketch>,
    faces: HashMap<FaceHandle, SimFace>,
    features: HashMap<FeatureHandle, SimFeature>,
    feature_calls: usize,
    fail_feature_at: Option<usize>,
    zero_volume_at: Option<usize>,
}

impl SimulatedKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the nth pad/pocket creation call (0-indexed) fail
    pub fn fail_feature_creation_at(&mut self, call: usize) {
        self.fail_feature_at = Some(call);
    }

    /// Make the nth pad/pocket creation call return a face-less feature
    pub fn zero_volume_at(&mut self, call: usize) {
        self.zero_volume_at = Some(call);
    }

    /// Number of features currently in the simulated document
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    fn next_handle(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn add_face(&mut self, face: SimFace) -> FaceHandle {
        let handle = FaceHandle(self.next_handle());
        self.faces.insert(handle, face);
        handle
    }

    /// Pads and pockets share the creation path; they differ only in which
    /// side of the new volume exposes a planar face.
    fn create_feature(
        &mut self,
        sketch: SketchHandle,
        extent: f64,
        direction: &ExtrusionDirection,
        is_pocket: bool,
    ) -> Result<FeatureHandle, KernelError> {
        let sk = self
            .sketches
            .get(&sketch)
            .cloned()
            .ok_or_else(|| KernelError::UnknownHandle(format!("sketch {:?}", sketch)))?;
        let profile = sk.profile.ok_or_else(|| {
            KernelError::Rejected("update failed: sketch has no closed profile".into())
        })?;
        if !extent.is_finite() || extent <= 0.0 {
            return Err(KernelError::Rejected(format!(
                "extent must be positive, got {}",
                extent
            )));
        }

        let call = self.feature_calls;
        self.feature_calls += 1;
        if self.fail_feature_at == Some(call) {
            return Err(KernelError::Rejected(
                "simulated kernel failure injected".into(),
            ));
        }

        let feature = FeatureHandle(self.next_handle());
        if self.zero_volume_at == Some(call) {
            self.features.insert(feature, SimFeature::default());
            return Ok(feature);
        }

        let along = direction.along();
        let (near, far) = if direction.symmetric {
            (sk.origin - along * (extent / 2.0), sk.origin + along * (extent / 2.0))
        } else {
            (sk.origin, sk.origin + along * extent)
        };
        let radius = match profile {
            ProfileSpec::Circle { radius } => Some(radius),
            ProfileSpec::Rectangle { .. } => None,
        };

        let faces = if is_pocket {
            // Walls plus the floor the cut leaves behind; the floor's
            // outward normal points back out of the removed volume
            vec![
                self.add_face(SimFace {
                    normal: any_perpendicular(along),
                    planar: false,
                    boundary_radius: radius,
                    origin: near,
                }),
                self.add_face(SimFace {
                    normal: -along.normalize(),
                    planar: true,
                    boundary_radius: radius,
                    origin: far,
                }),
            ]
        } else {
            vec![
                self.add_face(SimFace {
                    normal: -along.normalize(),
                    planar: true,
                    boundary_radius: radius,
                    origin: near,
                }),
                self.add_face(SimFace {
                    normal: any_perpendicular(along),
                    planar: false,
                    boundary_radius: radius,
                    origin: near,
                }),
                self.add_face(SimFace {
                    normal: along.normalize(),
                    planar: true,
                    boundary_radius: radius,
                    origin: far,
                }),
            ]
        };

        self.features.insert(feature, SimFeature { faces });
        Ok(feature)
    }
}

impl KernelSession for SimulatedKernel {
    fn create_sketch(&mut self, plane: &SketchPlane) -> Result<SketchHandle, KernelError> {
        let (origin, normal) = match plane {
            SketchPlane::Datum(datum) => (DVec3::ZERO, datum.normal()),
            SketchPlane::Face { feature, face } => {
                if !self.features.contains_key(feature) {
                    return Err(KernelError::UnknownHandle(format!("feature {:?}", feature)));
                }
                let sim_face = self
                    .faces
                    .get(face)
                    .ok_or_else(|| KernelError::UnknownHandle(format!("face {:?}", face)))?;
                if !sim_face.planar {
                    return Err(KernelError::Rejected(
                        "sketch support must be a planar face".into(),
                    ));
                }
                (sim_face.origin, sim_face.normal)
            }
        };

        let handle = SketchHandle(self.next_handle());
        self.sketches.insert(
            handle,
            SimSketch {
                origin,
                normal,
                profile: None,
            },
        );
        Ok(handle)
    }

    fn draw_profile(
        &mut self,
        sketch: SketchHandle,
        profile: &ProfileSpec,
    ) -> Result<(), KernelError> {
        let sk = self
            .sketches
            .get_mut(&sketch)
            .ok_or_else(|| KernelError::UnknownHandle(format!("sketch {:?}", sketch)))?;
        sk.profile = Some(*profile);
        Ok(())
    }

    fn create_pad(
        &mut self,
        sketch: SketchHandle,
        length: f64,
        direction: &ExtrusionDirection,
    ) -> Result<FeatureHandle, KernelError> {
        self.create_feature(sketch, length, direction, false)
    }

    fn create_pocket(
        &mut self,
        sketch: SketchHandle,
        depth: f64,
        direction: &ExtrusionDirection,
    ) -> Result<FeatureHandle, KernelError> {
        self.create_feature(sketch, depth, direction, true)
    }

    fn list_faces(&self, feature: &FeatureHandle) -> Result<Vec<FaceHandle>, KernelError> {
        self.features
            .get(feature)
            .map(|f| f.faces.clone())
            .ok_or_else(|| KernelError::UnknownHandle(format!("feature {:?}", feature)))
    }

    fn face_normal(&self, face: &FaceHandle) -> Result<DVec3, KernelError> {
        self.faces
            .get(face)
            .map(|f| f.normal)
            .ok_or_else(|| KernelError::UnknownHandle(format!("face {:?}", face)))
    }

    fn face_is_planar(&self, face: &FaceHandle) -> Result<bool, KernelError> {
        self.faces
            .get(face)
            .map(|f| f.planar)
            .ok_or_else(|| KernelError::UnknownHandle(format!("face {:?}", face)))
    }

    fn face_boundary_radius(&self, face: &FaceHandle) -> Result<Option<f64>, KernelError> {
        self.faces
            .get(face)
            .map(|f| f.boundary_radius)
            .ok_or_else(|| KernelError::UnknownHandle(format!("face {:?}", face)))
    }
}

/// Any unit vector perpendicular to `v`, for lateral-face normals
fn any_perpendicular(v: DVec3) -> DVec3 {
    let candidate = if v.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
    v.cross(candidate).normalize()
}
