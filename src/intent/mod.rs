//! Structured CAD intents
//!
//! A [`CadIntent`] is the inbound interface of the engine: one immutable,
//! already-parsed description of the geometry the user asked for. The LLM
//! front end produces these from free text (see [`crate::llm::parser`]),
//! but callers can also construct them directly.

use crate::core::types::{Axis, DatumPlane, ProfileSpec};
use serde::{Deserialize, Serialize};

/// One user request, parsed into typed geometry
///
/// Dimensions are millimetres. Composite variants are decomposed into
/// primitive pad/pocket steps by the plan builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CadIntent {
    /// Single solid cylinder on a datum plane
    Cylinder {
        radius: f64,
        height: f64,
        #[serde(default)]
        plane: DatumPlane,
    },
    /// Two stacked coaxial cylinders, optionally drilled through
    ///
    /// `through_holes` lists hole radii in the order they were specified;
    /// that order is preserved in the plan.
    SteppedCylinder {
        base_radius: f64,
        base_height: f64,
        step_radius: f64,
        step_height: f64,
        #[serde(default)]
        through_holes: Vec<f64>,
    },
    /// Solid extrusion of a profile on an explicit support
    Pad {
        profile: ProfileSpec,
        length: f64,
        #[serde(default)]
        support: SupportRole,
        #[serde(default)]
        direction: DirectionQualifier,
    },
    /// Material removal below a profile on an explicit support
    Pocket {
        profile: ProfileSpec,
        depth: f64,
        #[serde(default)]
        support: SupportRole,
        #[serde(default)]
        direction: DirectionQualifier,
    },
    /// Revolution of a profile around an axis
    ///
    /// Declared for completeness of the intent vocabulary; the kernel
    /// capability set has no revolve call, so planning reports it as
    /// unsupported rather than silently dropping it.
    Revolve { profile: ProfileSpec, angle_deg: f64 },
    /// Edge fillet on the most recent feature (unsupported, as above)
    Fillet { radius: f64 },
    /// Ordered sequence of sub-intents, planned in the given order
    Compound { steps: Vec<CadIntent> },
}

/// Soft reference to the support a feature is built on
///
/// These are the symbolic roles the resolver understands; they become
/// concrete face/plane references only at resolution time, against the
/// feature tree as it exists then.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupportRole {
    /// One of the three fixed origin planes
    BasePlane {
        #[serde(default)]
        plane: DatumPlane,
    },
    /// Directional face of the most recently created feature
    /// ("top of previous" is `axis: POS_Z`)
    OfPrevious {
        #[serde(default)]
        axis: Axis,
    },
    /// Directional face of an explicitly named feature
    Feature {
        id: u64,
        #[serde(default)]
        axis: Axis,
    },
}

impl Default for SupportRole {
    fn default() -> Self {
        Self::BasePlane {
            plane: DatumPlane::Xy,
        }
    }
}

/// Which way a feature extends relative to its support's outward normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectionQualifier {
    /// Along the outward normal, away from the parent solid
    Outward,
    /// Against the outward normal, into the parent solid
    Inward,
    /// Centered on the sketch plane, half the extent each way
    Symmetric,
}

impl Default for DirectionQualifier {
    fn default() -> Self {
        Self::Outward
    }
}
