//! Execution Sequencer - applies a resolved plan against the kernel
//!
//! Per step: Pending -> Resolving -> Executing -> Confirmed, with Aborted
//! terminal for the whole run. The mirror is mutated in exactly one place,
//! on confirm, so it stays in lock-step with the live model.

use crate::core::config::EngineConfig;
use crate::core::error::EngineError;
use crate::core::types::{FeatureKind, RunId};
use crate::exec::kernel::{KernelSession, SketchPlane};
use crate::plan::FeaturePlan;
use crate::resolve::dependency::{DependencyResolver, ResolvedFeature};
use crate::resolve::reference::SketchSupport;
use crate::tree::{FaceInfo, FeatureNode, FeatureTreeMirror};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle of one plan step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepState {
    Pending,
    Resolving,
    Executing,
    Confirmed,
    Aborted,
}

/// Outcome of a whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Completed,
    PartialFailure,
}

/// The step a run stopped on, with a readable reason
#[derive(Debug, Clone, Serialize)]
pub struct FailingStep {
    /// 0-indexed position in the plan
    pub index: usize,
    pub reason: String,
}

/// What a run did: every confirmed feature in creation order, plus the
/// failing step if the run did not complete. No rollback is attempted;
/// confirmed features stay in the live model either way.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub status: RunStatus,
    pub confirmed: Vec<FeatureNode>,
    pub failing_step: Option<FailingStep>,
}

/// Applies resolved steps one at a time against an exclusively borrowed
/// kernel session. Construction per run; steps are never concurrent.
pub struct ExecutionSequencer<'a, K: KernelSession> {
    kernel: &'a mut K,
    config: &'a EngineConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a, K: KernelSession> ExecutionSequencer<'a, K> {
    pub fn new(kernel: &'a mut K, config: &'a EngineConfig) -> Self {
        Self {
            kernel,
            config,
            cancel: None,
        }
    }

    /// Install a between-steps cancellation flag. A step already dispatched
    /// to the kernel is never preempted; the flag only stops the next
    /// Pending step from being dequeued.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Run a plan to completion or first failure, updating `mirror` as
    /// steps are confirmed.
    pub fn run(&mut self, plan: &FeaturePlan, mirror: &mut FeatureTreeMirror) -> RunReport {
        let run_id = RunId::new();
        let run_base = mirror.len();
        tracing::info!(
            "run {:?}: {} steps against {} existing features",
            run_id,
            plan.len(),
            run_base
        );

        let mut failing_step = None;
        let mut cancelled = false;

        for (index, planned) in plan.steps().iter().enumerate() {
            if self.is_cancelled() {
                tracing::warn!("run {:?} cancelled before step {}", run_id, index);
                cancelled = true;
                break;
            }

            let mut state = StepState::Resolving;
            tracing::debug!("step {} ({}): {:?}", index, planned.label, state);

            let resolver = DependencyResolver::new(mirror, self.config, run_base);
            let resolved = match resolver.resolve(planned) {
                Ok(resolved) => resolved,
                Err(error) => {
                    tracing::warn!("step {} failed to resolve: {}", index, error);
                    failing_step = Some(FailingStep {
                        index,
                        reason: error.to_string(),
                    });
                    break;
                }
            };

            state = StepState::Executing;
            tracing::debug!("step {} ({}): {:?}", index, planned.label, state);

            match self.execute_step(&resolved, mirror) {
                Ok(node) => {
                    state = StepState::Confirmed;
                    tracing::debug!("step {} ({}): {:?}", index, planned.label, state);
                    match mirror.confirm(node) {
                        Ok(node) => {
                            tracing::info!(
                                "confirmed {} as {:?} (order {})",
                                planned.label,
                                node.handle,
                                node.order
                            );
                        }
                        Err(error) => {
                            failing_step = Some(FailingStep {
                                index,
                                reason: error.to_string(),
                            });
                            break;
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!("step {} aborted: {}", index, error);
                    failing_step = Some(FailingStep {
                        index,
                        reason: error.to_string(),
                    });
                    break;
                }
            }
        }

        let confirmed: Vec<FeatureNode> = mirror.nodes()[run_base..].to_vec();
        let status = if failing_step.is_none() && !cancelled {
            RunStatus::Completed
        } else {
            RunStatus::PartialFailure
        };

        RunReport {
            run_id,
            status,
            confirmed,
            failing_step,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::SeqCst))
    }

    /// Dispatch one resolved step to the kernel and build its mirror node.
    ///
    /// The face cache is filled here, immediately after the kernel
    /// confirms the feature, so resolution of later steps never has to go
    /// back to the kernel.
    fn execute_step(
        &mut self,
        resolved: &ResolvedFeature,
        mirror: &FeatureTreeMirror,
    ) -> Result<FeatureNode, EngineError> {
        let plane = match &resolved.support {
            SketchSupport::Datum(datum) => SketchPlane::Datum(*datum),
            SketchSupport::Face(reference) => SketchPlane::Face {
                feature: reference.node,
                face: mirror.face(reference)?.handle,
            },
        };

        let sketch = self.kernel.create_sketch(&plane)?;
        self.kernel.draw_profile(sketch, &resolved.planned.profile)?;

        let handle = match resolved.planned.kind {
            FeatureKind::Pad => {
                self.kernel
                    .create_pad(sketch, resolved.planned.extent, &resolved.direction)?
            }
            FeatureKind::Pocket => {
                self.kernel
                    .create_pocket(sketch, resolved.planned.extent, &resolved.direction)?
            }
        };

        let face_handles = self.kernel.list_faces(&handle)?;
        if face_handles.is_empty() {
            return Err(EngineError::PostCondition(format!(
                "{} produced a zero-volume result ({:?} has no faces)",
                resolved.planned.label, handle
            )));
        }

        let mut faces = Vec::with_capacity(face_handles.len());
        for face_handle in face_handles {
            faces.push(FaceInfo {
                handle: face_handle,
                normal: self.kernel.face_normal(&face_handle)?,
                planar: self.kernel.face_is_planar(&face_handle)?,
                boundary_radius: self.kernel.face_boundary_radius(&face_handle)?,
            });
        }

        Ok(FeatureNode::new(
            handle,
            resolved.planned.kind,
            faces,
            resolved.parent,
            resolved.direction.along(),
        ))
    }
}
