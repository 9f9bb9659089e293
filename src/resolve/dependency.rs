//! Dependency & Direction Resolver
//!
//! Annotates each planned feature with its concrete support, its parent in
//! the tree, and the signed extrusion direction. Applied in plan order;
//! a failure here invalidates every later step, so the sequencer stops at
//! the first error.

use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{FeatureHandle, FeatureKind};
use crate::exec::kernel::ExtrusionDirection;
use crate::intent::DirectionQualifier;
use crate::plan::PlannedFeature;
use crate::resolve::reference::{self, SketchSupport};
use crate::tree::FeatureTreeMirror;

/// A planned feature with every reference made concrete
///
/// Produced fresh rather than by mutating the planned step, so the plan
/// stays auditable after the run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFeature {
    pub planned: PlannedFeature,
    pub support: SketchSupport,
    /// Parent feature in the tree; `None` for datum-plane supports
    pub parent: Option<FeatureHandle>,
    pub direction: ExtrusionDirection,
}

/// Resolves planned features against the current mirror state
pub struct DependencyResolver<'a> {
    mirror: &'a FeatureTreeMirror,
    config: &'a EngineConfig,
    /// Mirror length at run start; offsets plan-step support references
    run_base: usize,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(mirror: &'a FeatureTreeMirror, config: &'a EngineConfig, run_base: usize) -> Self {
        Self {
            mirror,
            config,
            run_base,
        }
    }

    /// Resolve one planned feature. Reads the mirror, never writes it.
    pub fn resolve(&self, planned: &PlannedFeature) -> Result<ResolvedFeature> {
        let support = reference::resolve_support(&planned.support, self.mirror, self.run_base)?;

        let (normal, parent, boundary_radius) = match &support {
            SketchSupport::Datum(plane) => (plane.normal(), None, None),
            SketchSupport::Face(r) => {
                let face = self.mirror.face(r)?;
                if !face.planar {
                    return Err(EngineError::InvalidSupport(format!(
                        "face {} of {:?} is not planar and cannot carry a sketch",
                        r.face_index, r.node
                    )));
                }
                (face.normal, Some(r.node), face.boundary_radius)
            }
        };

        if planned.kind == FeatureKind::Pocket && parent.is_none() {
            return Err(EngineError::InvalidSupport(format!(
                "{} removes material but its support is a bare datum plane",
                planned.label
            )));
        }

        // Pockets always cut into the retained solid; pads follow the
        // intent's qualifier relative to the support's outward normal.
        let (sign, symmetric) = match planned.kind {
            FeatureKind::Pocket => (-1.0, false),
            FeatureKind::Pad => match planned.direction {
                DirectionQualifier::Outward => (1.0, false),
                DirectionQualifier::Inward => (-1.0, false),
                DirectionQualifier::Symmetric => (1.0, true),
            },
        };

        self.check_continuity(planned, boundary_radius)?;

        Ok(ResolvedFeature {
            planned: planned.clone(),
            support,
            parent,
            direction: ExtrusionDirection {
                axis: normal,
                sign,
                symmetric,
            },
        })
    }

    /// A chained profile must stay within its parent face's boundary.
    ///
    /// Stacking a smaller profile on a larger face is fine; overhanging the
    /// boundary by more than the tolerance needs an explicit transition
    /// feature the intent did not ask for. Dimensions are never corrected
    /// here.
    fn check_continuity(
        &self,
        planned: &PlannedFeature,
        boundary_radius: Option<f64>,
    ) -> Result<()> {
        let Some(boundary) = boundary_radius else {
            return Ok(());
        };

        let contact = planned.profile.contact_radius();
        if contact > boundary + self.config.continuity_tolerance {
            return Err(EngineError::Continuity(format!(
                "{} has contact radius {:.4} mm but its support face ends at \
                 {:.4} mm (tolerance {} mm)",
                planned.label, contact, boundary, self.config.continuity_tolerance
            )));
        }
        Ok(())
    }
}
