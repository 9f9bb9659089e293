//! Resolution pipeline
//!
//! Turns symbolic support roles into concrete geometry against a snapshot
//! of the feature-tree mirror:
//! PlannedFeature -> DependencyResolver -> ResolvedFeature
//!
//! Everything here is a pure read of the mirror; the mirror only changes
//! when the execution sequencer confirms a kernel call.

pub mod dependency;
pub mod reference;

pub use dependency::{DependencyResolver, ResolvedFeature};
pub use reference::{AxisReference, SketchSupport};
