//! Runtime Sampler — observes live hook dispatches.
//!
//! The sampler is single-threaded by construction (`Rc`/`Cell`): one
//! instance lives inside one request. Independent requests each get their
//! own sampler and write through a store that tolerates concurrent appends.

pub mod bus;
pub mod sampler;
pub mod sampling;
pub mod stack;

pub use bus::{HookBus, HookListener, LocalHookBus};
pub use sampler::{RuntimeSampler, SampleOutcome};
pub use sampling::{RandomSource, SamplePolicy};
pub use stack::{FrameGuard, ShadowStack, StackFrame, StackProbe};
