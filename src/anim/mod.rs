//! Timeline tweening driven by a logical clock.
//!
//! A [`Timeline`] lists position/rotation steps for one node. The [`Tweener`]
//! starts timelines at the current logical time, applies them to the scene
//! graph each time it is advanced and resolves an [`AnimationHandle`] when a
//! timeline completes or is cancelled.

pub mod clock;
pub mod easing;
pub mod timeline;
pub mod tweener;

pub use clock::{FrameClock, LogicalClock};
pub use easing::Ease;
pub use timeline::{AxisTargets, Property, Timeline};
pub use tweener::{
    AnimationHandle, AnimationId, AnimationOutcome, CancellationToken, Finished, Tweener,
};
