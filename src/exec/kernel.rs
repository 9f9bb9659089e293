//! Kernel collaborator capability set
//!
//! Every call is synchronous, may be slow, and may fail; any failure
//! aborts the running plan. Timeouts are the collaborator's concern and
//! surface here as errors.

use crate::core::types::{DatumPlane, FaceHandle, FeatureHandle, ProfileSpec, SketchHandle};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Plane a new sketch is created on
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SketchPlane {
    Datum(DatumPlane),
    /// Planar face of an existing feature
    Face {
        feature: FeatureHandle,
        face: FaceHandle,
    },
}

/// Fully resolved extrusion direction for a pad or pocket call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionDirection {
    /// Outward normal of the support
    pub axis: DVec3,
    /// +1 along the axis, -1 against it
    pub sign: f64,
    /// Extent split evenly across the sketch plane
    pub symmetric: bool,
}

impl ExtrusionDirection {
    /// The signed direction the feature actually grows along
    pub fn along(&self) -> DVec3 {
        self.axis * self.sign
    }
}

/// Collaborator-side failure
#[derive(Error, Debug)]
pub enum KernelError {
    #[error("session rejected the call: {0}")]
    Rejected(String),

    #[error("unknown handle: {0}")]
    UnknownHandle(String),

    #[error("call timed out: {0}")]
    Timeout(String),
}

/// Capability set the engine requires from the CAD automation binding.
///
/// `&mut self` on the mutating calls makes the single-session discipline a
/// compile-time property: one run borrows the session exclusively, so no
/// two plans can interleave against the same document.
pub trait KernelSession {
    fn create_sketch(&mut self, plane: &SketchPlane) -> Result<SketchHandle, KernelError>;

    /// Draw a closed profile into an open sketch
    fn draw_profile(
        &mut self,
        sketch: SketchHandle,
        profile: &ProfileSpec,
    ) -> Result<(), KernelError>;

    fn create_pad(
        &mut self,
        sketch: SketchHandle,
        length: f64,
        direction: &ExtrusionDirection,
    ) -> Result<FeatureHandle, KernelError>;

    fn create_pocket(
        &mut self,
        sketch: SketchHandle,
        depth: f64,
        direction: &ExtrusionDirection,
    ) -> Result<FeatureHandle, KernelError>;

    fn list_faces(&self, feature: &FeatureHandle) -> Result<Vec<FaceHandle>, KernelError>;

    fn face_normal(&self, face: &FaceHandle) -> Result<DVec3, KernelError>;

    fn face_is_planar(&self, face: &FaceHandle) -> Result<bool, KernelError>;

    /// Radius of the face's circular boundary, `None` for non-circular faces
    fn face_boundary_radius(&self, face: &FaceHandle) -> Result<Option<f64>, KernelError>;
}
