//! Feature Plan Builder - decomposes intents into ordered primitive steps

use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::{Axis, DatumPlane, FeatureHandle, FeatureKind, ProfileSpec};
use crate::intent::{CadIntent, DirectionQualifier, SupportRole};

/// Where a planned feature's sketch goes, in plan-relative terms
///
/// `Step` addresses an earlier step of the same plan, which is how a
/// decomposed composite keeps several children on one parent (two holes
/// both drilled through the step pad, say). Its index is always strictly
/// smaller than the owning step's index, so plans contain no forward
/// references by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlannedSupport {
    /// One of the three fixed origin planes
    Datum(DatumPlane),
    /// Directional face of the most recently created feature
    Previous(Axis),
    /// Directional face of the feature created by an earlier plan step
    Step { index: usize, axis: Axis },
    /// Directional face of a feature that already exists in the mirror
    Feature { handle: FeatureHandle, axis: Axis },
}

/// One entry in the ordered plan: an intent fragment plus an unresolved
/// support reference. Never mutated after the plan is built.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedFeature {
    pub kind: FeatureKind,
    pub profile: ProfileSpec,
    /// Pad length or pocket depth, millimetres
    pub extent: f64,
    pub support: PlannedSupport,
    pub direction: DirectionQualifier,
    /// Human-readable step name, used in logs and reports
    pub label: String,
}

/// Ordered, dependency-correct sequence of planned features
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturePlan {
    steps: Vec<PlannedFeature>,
}

impl FeaturePlan {
    pub fn steps(&self) -> &[PlannedFeature] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Builds plans from intents. Pure: same intent, same plan.
pub struct FeaturePlanBuilder<'a> {
    config: &'a EngineConfig,
}

impl<'a> FeaturePlanBuilder<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Decompose an intent into an ordered plan.
    ///
    /// Fails with a planning error when the intent is structurally
    /// incomplete; no partial plan is returned.
    pub fn build(&self, intent: &CadIntent) -> Result<FeaturePlan> {
        let mut steps = Vec::new();
        self.push_intent(intent, &mut steps)?;

        if steps.is_empty() {
            return Err(EngineError::Planning(
                "intent produced no feature steps".into(),
            ));
        }
        if steps.len() > self.config.max_plan_steps {
            return Err(EngineError::Planning(format!(
                "plan has {} steps, exceeding the limit of {}",
                steps.len(),
                self.config.max_plan_steps
            )));
        }

        Ok(FeaturePlan { steps })
    }

    fn push_intent(&self, intent: &CadIntent, steps: &mut Vec<PlannedFeature>) -> Result<()> {
        match intent {
            CadIntent::Cylinder {
                radius,
                height,
                plane,
            } => {
                let profile = ProfileSpec::Circle { radius: *radius };
                require_profile(&profile, "cylinder")?;
                require_extent(*height, "cylinder height")?;
                steps.push(PlannedFeature {
                    kind: FeatureKind::Pad,
                    profile,
                    extent: *height,
                    support: PlannedSupport::Datum(*plane),
                    direction: DirectionQualifier::Outward,
                    label: "cylinder pad".into(),
                });
                Ok(())
            }
            CadIntent::SteppedCylinder {
                base_radius,
                base_height,
                step_radius,
                step_height,
                through_holes,
            } => self.push_stepped_cylinder(
                *base_radius,
                *base_height,
                *step_radius,
                *step_height,
                through_holes,
                steps,
            ),
            CadIntent::Pad {
                profile,
                length,
                support,
                direction,
            } => {
                require_profile(profile, "pad")?;
                require_extent(*length, "pad length")?;
                steps.push(PlannedFeature {
                    kind: FeatureKind::Pad,
                    profile: *profile,
                    extent: *length,
                    support: convert_support(support),
                    direction: *direction,
                    label: "pad".into(),
                });
                Ok(())
            }
            CadIntent::Pocket {
                profile,
                depth,
                support,
                direction,
            } => {
                require_profile(profile, "pocket")?;
                require_extent(*depth, "pocket depth")?;
                steps.push(PlannedFeature {
                    kind: FeatureKind::Pocket,
                    profile: *profile,
                    extent: *depth,
                    support: convert_support(support),
                    direction: *direction,
                    label: "pocket".into(),
                });
                Ok(())
            }
            CadIntent::Revolve { .. } => Err(EngineError::Planning(
                "revolve is not expressible through the kernel capability set".into(),
            )),
            CadIntent::Fillet { .. } => Err(EngineError::Planning(
                "fillet is not expressible through the kernel capability set".into(),
            )),
            CadIntent::Compound { steps: sub } => {
                if sub.is_empty() {
                    return Err(EngineError::Planning("compound intent is empty".into()));
                }
                // Sub-intents keep the order they were specified in.
                for intent in sub {
                    self.push_intent(intent, steps)?;
                }
                Ok(())
            }
        }
    }

    /// Base pad on the datum, step pad on the base's top face, then one
    /// through-hole pocket per requested hole - every hole cut from the
    /// step's top face, in the order the holes were specified.
    fn push_stepped_cylinder(
        &self,
        base_radius: f64,
        base_height: f64,
        step_radius: f64,
        step_height: f64,
        through_holes: &[f64],
        steps: &mut Vec<PlannedFeature>,
    ) -> Result<()> {
        let base_profile = ProfileSpec::Circle {
            radius: base_radius,
        };
        let step_profile = ProfileSpec::Circle {
            radius: step_radius,
        };
        require_profile(&base_profile, "stepped cylinder base")?;
        require_profile(&step_profile, "stepped cylinder step")?;
        require_extent(base_height, "stepped cylinder base height")?;
        require_extent(step_height, "stepped cylinder step height")?;

        let base_index = steps.len();
        steps.push(PlannedFeature {
            kind: FeatureKind::Pad,
            profile: base_profile,
            extent: base_height,
            support: PlannedSupport::Datum(DatumPlane::Xy),
            direction: DirectionQualifier::Outward,
            label: "base pad".into(),
        });

        let step_index = steps.len();
        steps.push(PlannedFeature {
            kind: FeatureKind::Pad,
            profile: step_profile,
            extent: step_height,
            support: PlannedSupport::Step {
                index: base_index,
                axis: Axis::PosZ,
            },
            direction: DirectionQualifier::Outward,
            label: "step pad".into(),
        });

        for (i, hole_radius) in through_holes.iter().enumerate() {
            let profile = ProfileSpec::Circle {
                radius: *hole_radius,
            };
            require_profile(&profile, "through hole")?;
            steps.push(PlannedFeature {
                kind: FeatureKind::Pocket,
                profile,
                // Through the step and the base both
                extent: base_height + step_height,
                support: PlannedSupport::Step {
                    index: step_index,
                    axis: Axis::PosZ,
                },
                direction: DirectionQualifier::Inward,
                label: format!("through hole {}", i + 1),
            });
        }

        Ok(())
    }
}

fn convert_support(role: &SupportRole) -> PlannedSupport {
    match role {
        SupportRole::BasePlane { plane } => PlannedSupport::Datum(*plane),
        SupportRole::OfPrevious { axis } => PlannedSupport::Previous(*axis),
        SupportRole::Feature { id, axis } => PlannedSupport::Feature {
            handle: FeatureHandle(*id),
            axis: *axis,
        },
    }
}

fn require_profile(profile: &ProfileSpec, what: &str) -> Result<()> {
    if !profile.is_valid() {
        return Err(EngineError::Planning(format!(
            "{} has a degenerate profile: {:?}",
            what, profile
        )));
    }
    Ok(())
}

fn require_extent(extent: f64, what: &str) -> Result<()> {
    if !extent.is_finite() || extent <= 0.0 {
        return Err(EngineError::Planning(format!(
            "{} must be finite and positive, got {}",
            what, extent
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_config() -> EngineConfig {
        EngineConfig::default()
    }

    fn stepped_flange() -> CadIntent {
        CadIntent::SteppedCylinder {
            base_radius: 30.0,
            base_height: 10.0,
            step_radius: 20.0,
            step_height: 15.0,
            through_holes: vec![5.0],
        }
    }

    #[test]
    fn test_stepped_cylinder_decomposition() {
        let config = builder_config();
        let plan = FeaturePlanBuilder::new(&config)
            .build(&stepped_flange())
            .unwrap();

        assert_eq!(plan.len(), 3);
        assert_eq!(plan.steps()[0].kind, FeatureKind::Pad);
        assert_eq!(plan.steps()[1].kind, FeatureKind::Pad);
        assert_eq!(plan.steps()[2].kind, FeatureKind::Pocket);

        // Through hole is cut from the step's top face, through both solids
        assert_eq!(
            plan.steps()[2].support,
            PlannedSupport::Step {
                index: 1,
                axis: Axis::PosZ
            }
        );
        assert!((plan.steps()[2].extent - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_forward_references_by_construction() {
        let config = builder_config();
        let intent = CadIntent::SteppedCylinder {
            base_radius: 30.0,
            base_height: 10.0,
            step_radius: 20.0,
            step_height: 15.0,
            through_holes: vec![5.0, 3.0],
        };
        let plan = FeaturePlanBuilder::new(&config).build(&intent).unwrap();

        for (i, step) in plan.steps().iter().enumerate() {
            if let PlannedSupport::Step { index, .. } = step.support {
                assert!(index < i, "step {} references later step {}", i, index);
            }
        }
    }

    #[test]
    fn test_hole_order_follows_intent_order() {
        let config = builder_config();
        let intent = CadIntent::SteppedCylinder {
            base_radius: 30.0,
            base_height: 10.0,
            step_radius: 20.0,
            step_height: 15.0,
            through_holes: vec![5.0, 3.0],
        };
        let plan = FeaturePlanBuilder::new(&config).build(&intent).unwrap();

        assert_eq!(plan.len(), 4);
        assert_eq!(
            plan.steps()[2].profile,
            ProfileSpec::Circle { radius: 5.0 }
        );
        assert_eq!(
            plan.steps()[3].profile,
            ProfileSpec::Circle { radius: 3.0 }
        );
    }

    #[test]
    fn test_missing_parameter_is_a_planning_error() {
        let config = builder_config();
        let intent = CadIntent::Cylinder {
            radius: 0.0,
            height: 20.0,
            plane: DatumPlane::Xy,
        };
        let result = FeaturePlanBuilder::new(&config).build(&intent);
        assert!(matches!(result, Err(EngineError::Planning(_))));
    }

    #[test]
    fn test_degenerate_hole_fails_whole_plan() {
        let config = builder_config();
        let intent = CadIntent::SteppedCylinder {
            base_radius: 30.0,
            base_height: 10.0,
            step_radius: 20.0,
            step_height: 15.0,
            through_holes: vec![-1.0],
        };
        let result = FeaturePlanBuilder::new(&config).build(&intent);
        assert!(matches!(result, Err(EngineError::Planning(_))));
    }

    #[test]
    fn test_revolve_reported_unsupported() {
        let config = builder_config();
        let intent = CadIntent::Revolve {
            profile: ProfileSpec::Circle { radius: 5.0 },
            angle_deg: 360.0,
        };
        let result = FeaturePlanBuilder::new(&config).build(&intent);
        assert!(matches!(result, Err(EngineError::Planning(_))));
    }

    #[test]
    fn test_empty_compound_rejected() {
        let config = builder_config();
        let result =
            FeaturePlanBuilder::new(&config).build(&CadIntent::Compound { steps: vec![] });
        assert!(matches!(result, Err(EngineError::Planning(_))));
    }

    #[test]
    fn test_compound_concatenates_in_order() {
        let config = builder_config();
        let intent = CadIntent::Compound {
            steps: vec![
                CadIntent::Cylinder {
                    radius: 30.0,
                    height: 10.0,
                    plane: DatumPlane::Xy,
                },
                CadIntent::Pocket {
                    profile: ProfileSpec::Circle { radius: 4.0 },
                    depth: 10.0,
                    support: SupportRole::OfPrevious { axis: Axis::PosZ },
                    direction: DirectionQualifier::Inward,
                },
            ],
        };
        let plan = FeaturePlanBuilder::new(&config).build(&intent).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.steps()[0].kind, FeatureKind::Pad);
        assert_eq!(plan.steps()[1].kind, FeatureKind::Pocket);
        assert_eq!(plan.steps()[1].support, PlannedSupport::Previous(Axis::PosZ));
    }

    #[test]
    fn test_plan_step_limit() {
        let config = EngineConfig {
            max_plan_steps: 2,
            ..EngineConfig::default()
        };
        let result = FeaturePlanBuilder::new(&config).build(&stepped_flange());
        assert!(matches!(result, Err(EngineError::Planning(_))));
    }

    #[test]
    fn test_build_is_deterministic() {
        let config = builder_config();
        let builder = FeaturePlanBuilder::new(&config);
        let a = builder.build(&stepped_flange()).unwrap();
        let b = builder.build(&stepped_flange()).unwrap();
        assert_eq!(a, b);
    }
}
