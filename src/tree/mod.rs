//! Feature-Tree State Mirror
//!
//! The live kernel model is mutable, externally owned, and observable only
//! through round-trip calls. The mirror is the engine's own authoritative
//! record of what has been confirmed so far, kept in lock-step with the
//! kernel so that reference and dependency resolution can be pure reads
//! of a local snapshot.

pub mod mirror;

pub use mirror::{FaceInfo, FaceRole, FeatureNode, FeatureTreeMirror, GeometricReference};
