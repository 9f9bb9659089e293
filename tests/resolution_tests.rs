//! Determinism, direction, and continuity properties of the resolution
//! pipeline, exercised with the deterministic simulated kernel

use partsmith::core::config::EngineConfig;
use partsmith::core::types::{Axis, DatumPlane, ProfileSpec};
use partsmith::exec::{ExecutionSequencer, RunStatus, SimulatedKernel};
use partsmith::intent::{CadIntent, DirectionQualifier, SupportRole};
use partsmith::plan::FeaturePlanBuilder;
use partsmith::resolve::DependencyResolver;
use partsmith::tree::{FeatureNode, FeatureTreeMirror};

use proptest::prelude::*;

/// Plan and execute an intent on a fresh simulated kernel, returning the
/// confirmed node sequence
fn run_fresh(intent: &CadIntent, config: &EngineConfig) -> (RunStatus, Vec<FeatureNode>) {
    let plan = FeaturePlanBuilder::new(config).build(intent).unwrap();
    let mut kernel = SimulatedKernel::new();
    let mut mirror = FeatureTreeMirror::new();
    let report = ExecutionSequencer::new(&mut kernel, config).run(&plan, &mut mirror);
    (report.status, report.confirmed)
}

/// Mirror state after padding a single cylinder on XY
fn mirror_with_cylinder(radius: f64, height: f64, config: &EngineConfig) -> FeatureTreeMirror {
    let intent = CadIntent::Cylinder {
        radius,
        height,
        plane: DatumPlane::Xy,
    };
    let plan = FeaturePlanBuilder::new(config).build(&intent).unwrap();
    let mut kernel = SimulatedKernel::new();
    let mut mirror = FeatureTreeMirror::new();
    let report = ExecutionSequencer::new(&mut kernel, config).run(&plan, &mut mirror);
    assert_eq!(report.status, RunStatus::Completed);
    mirror
}

fn pad_on_previous(radius: f64, direction: DirectionQualifier) -> CadIntent {
    CadIntent::Pad {
        profile: ProfileSpec::Circle { radius },
        length: 10.0,
        support: SupportRole::OfPrevious { axis: Axis::PosZ },
        direction,
    }
}

#[test]
fn test_identical_runs_resolve_identically() {
    let config = EngineConfig::default();
    let intent = CadIntent::SteppedCylinder {
        base_radius: 30.0,
        base_height: 10.0,
        step_radius: 20.0,
        step_height: 15.0,
        through_holes: vec![5.0],
    };

    let (status_a, confirmed_a) = run_fresh(&intent, &config);
    let (status_b, confirmed_b) = run_fresh(&intent, &config);

    assert_eq!(status_a, RunStatus::Completed);
    assert_eq!(status_a, status_b);
    assert_eq!(confirmed_a, confirmed_b);
}

#[test]
fn test_resolver_is_pure_over_a_snapshot() {
    let config = EngineConfig::default();
    let mirror = mirror_with_cylinder(30.0, 10.0, &config);

    let plan = FeaturePlanBuilder::new(&config)
        .build(&pad_on_previous(20.0, DirectionQualifier::Outward))
        .unwrap();
    let resolver = DependencyResolver::new(&mirror, &config, mirror.len());

    let a = resolver.resolve(&plan.steps()[0]).unwrap();
    let b = resolver.resolve(&plan.steps()[0]).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_outward_direction_sign_is_positive() {
    let config = EngineConfig::default();
    let mirror = mirror_with_cylinder(30.0, 10.0, &config);

    let plan = FeaturePlanBuilder::new(&config)
        .build(&pad_on_previous(20.0, DirectionQualifier::Outward))
        .unwrap();
    let resolved = DependencyResolver::new(&mirror, &config, mirror.len())
        .resolve(&plan.steps()[0])
        .unwrap();

    // Support face outward normal is +Z; "outward" extrudes along it
    assert_eq!(resolved.direction.axis, glam::DVec3::Z);
    assert_eq!(resolved.direction.sign, 1.0);
}

#[test]
fn test_inward_direction_sign_is_negative() {
    let config = EngineConfig::default();
    let mirror = mirror_with_cylinder(30.0, 10.0, &config);

    let plan = FeaturePlanBuilder::new(&config)
        .build(&pad_on_previous(20.0, DirectionQualifier::Inward))
        .unwrap();
    let resolved = DependencyResolver::new(&mirror, &config, mirror.len())
        .resolve(&plan.steps()[0])
        .unwrap();

    assert_eq!(resolved.direction.sign, -1.0);
}

#[test]
fn test_matching_step_radius_within_tolerance_resolves() {
    let config = EngineConfig::default();
    let mirror = mirror_with_cylinder(20.0, 10.0, &config);

    // 20 mm step on a 20 mm base, off by well under the tolerance
    let plan = FeaturePlanBuilder::new(&config)
        .build(&pad_on_previous(20.0005, DirectionQualifier::Outward))
        .unwrap();
    let result = DependencyResolver::new(&mirror, &config, mirror.len())
        .resolve(&plan.steps()[0]);
    assert!(result.is_ok());
}

#[test]
fn test_overhanging_step_radius_raises_continuity_error() {
    let config = EngineConfig::default();
    let mirror = mirror_with_cylinder(20.0, 10.0, &config);

    let plan = FeaturePlanBuilder::new(&config)
        .build(&pad_on_previous(25.0, DirectionQualifier::Outward))
        .unwrap();
    let result = DependencyResolver::new(&mirror, &config, mirror.len())
        .resolve(&plan.steps()[0]);
    assert!(matches!(
        result,
        Err(partsmith::core::error::EngineError::Continuity(_))
    ));
}

proptest! {
    /// Same intent, same empty document, same kernel behavior: the whole
    /// resolved run must come out identical both times.
    #[test]
    fn prop_runs_are_deterministic(
        base_radius in 10.0..50.0f64,
        base_height in 5.0..40.0f64,
        step_radius in 1.0..9.0f64,
        step_height in 1.0..20.0f64,
    ) {
        let config = EngineConfig::default();
        let intent = CadIntent::SteppedCylinder {
            base_radius,
            base_height,
            step_radius,
            step_height,
            through_holes: vec![],
        };

        let (status_a, confirmed_a) = run_fresh(&intent, &config);
        let (status_b, confirmed_b) = run_fresh(&intent, &config);

        prop_assert_eq!(status_a, RunStatus::Completed);
        prop_assert_eq!(status_a, status_b);
        prop_assert_eq!(confirmed_a, confirmed_b);
    }
}
