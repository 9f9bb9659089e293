//! Execution against the kernel collaborator
//!
//! The kernel automation binding is an external collaborator; this module
//! defines the capability set the engine requires from it, an in-memory
//! simulation of that capability set for tests and dry runs, and the
//! sequencer that applies a resolved plan step by step.

pub mod kernel;
pub mod sequencer;
pub mod sim;

pub use kernel::{ExtrusionDirection, KernelError, KernelSession, SketchPlane};
pub use sequencer::{ExecutionSequencer, FailingStep, RunReport, RunStatus, StepState};
pub use sim::SimulatedKernel;
