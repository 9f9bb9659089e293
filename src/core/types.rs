//! Core type definitions used throughout the engine

use glam::DVec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kernel-assigned identity of a confirmed feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureHandle(pub u64);

/// Kernel-assigned identity of a face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaceHandle(pub u64);

/// Kernel-assigned identity of a sketch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SketchHandle(pub u64);

/// Unique identifier for one engine run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind of parametric feature in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureKind {
    /// Solid extrusion from a closed sketch
    Pad,
    /// Material removal from a closed sketch
    Pocket,
}

/// The three fixed origin planes of a part document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatumPlane {
    Xy,
    Yz,
    Zx,
}

impl DatumPlane {
    /// Outward normal of the plane in document coordinates
    pub fn normal(&self) -> DVec3 {
        match self {
            DatumPlane::Xy => DVec3::Z,
            DatumPlane::Yz => DVec3::X,
            DatumPlane::Zx => DVec3::Y,
        }
    }
}

impl Default for DatumPlane {
    fn default() -> Self {
        Self::Xy
    }
}

/// Signed principal axis, used to phrase directional face lookups
/// ("top of previous" is the face best aligned with `PosZ`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Axis {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl Axis {
    pub fn vector(&self) -> DVec3 {
        match self {
            Axis::PosX => DVec3::X,
            Axis::NegX => -DVec3::X,
            Axis::PosY => DVec3::Y,
            Axis::NegY => -DVec3::Y,
            Axis::PosZ => DVec3::Z,
            Axis::NegZ => -DVec3::Z,
        }
    }
}

impl Default for Axis {
    fn default() -> Self {
        Self::PosZ
    }
}

/// Closed sketch profile, dimensions in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileSpec {
    Circle { radius: f64 },
    Rectangle { width: f64, height: f64 },
}

impl ProfileSpec {
    /// Radius of the smallest circle containing the profile.
    ///
    /// This is the contact radius checked against the parent face's
    /// boundary radius when features are chained.
    pub fn contact_radius(&self) -> f64 {
        match self {
            ProfileSpec::Circle { radius } => *radius,
            ProfileSpec::Rectangle { width, height } => {
                (width * width + height * height).sqrt() / 2.0
            }
        }
    }

    /// True when every dimension is finite and strictly positive
    pub fn is_valid(&self) -> bool {
        match self {
            ProfileSpec::Circle { radius } => radius.is_finite() && *radius > 0.0,
            ProfileSpec::Rectangle { width, height } => {
                width.is_finite() && *width > 0.0 && height.is_finite() && *height > 0.0
            }
        }
    }
}
