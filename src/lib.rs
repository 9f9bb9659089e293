//! Partsmith - CAD intent resolution and feature-tree construction
//!
//! Takes a structured geometric intent, decomposes it into an ordered,
//! dependency-correct sequence of kernel feature operations, resolves
//! ambiguous geometric references against a local mirror of the feature
//! tree, and applies the result step by step to a live kernel session.

pub mod core;
pub mod exec;
pub mod intent;
pub mod llm;
pub mod plan;
pub mod resolve;
pub mod tree;
