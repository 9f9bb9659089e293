//! Feature planning
//!
//! Converts a structured [`CadIntent`](crate::intent::CadIntent) into an
//! ordered, dependency-correct sequence of primitive feature steps:
//! CadIntent -> FeaturePlanBuilder -> FeaturePlan -> DependencyResolver

pub mod builder;

pub use builder::{FeaturePlan, FeaturePlanBuilder, PlannedFeature, PlannedSupport};
