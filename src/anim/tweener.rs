//! Scheduling timelines against the logical clock.
//!
//! Every scheduled timeline gets an [`AnimationHandle`] that resolves when it
//! completes or is cancelled.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::gfx::scene::SceneGraph;

use super::clock::LogicalClock;
use super::timeline::Timeline;

/// Identifies one scheduled timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationOutcome {
    Completed,
    Cancelled,
}

/// Shared flag that stops a running timeline at its next update.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Future resolving when its timeline completes or is cancelled.
///
/// Dropping the handle does not stop the animation.
#[derive(Debug)]
pub struct AnimationHandle {
    id: AnimationId,
    token: CancellationToken,
    receiver: oneshot::Receiver<AnimationOutcome>,
}

impl AnimationHandle {
    pub fn id(&self) -> AnimationId {
        self.id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Future for AnimationHandle {
    type Output = AnimationOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            // The scheduler went away without finishing the timeline.
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(AnimationOutcome::Cancelled),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// A timeline that finished during [`Tweener::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finished {
    pub id: AnimationId,
    pub outcome: AnimationOutcome,
}

struct Running {
    id: AnimationId,
    timeline: Timeline,
    started_at: f64,
    token: CancellationToken,
    sender: Option<oneshot::Sender<AnimationOutcome>>,
}

impl Running {
    fn resolve(&mut self, outcome: AnimationOutcome) -> Finished {
        if let Some(sender) = self.sender.take() {
            // The handle may have been dropped; nobody is waiting then.
            let _ = sender.send(outcome);
        }
        Finished {
            id: self.id,
            outcome,
        }
    }
}

/// Drives every scheduled [`Timeline`] from a [`LogicalClock`].
///
/// Timelines run independently of each other; nothing stops two timelines
/// from targeting the same node, that discipline belongs to the caller.
pub struct Tweener {
    clock: LogicalClock,
    running: Vec<Running>,
    next_id: u64,
}

impl Tweener {
    pub fn new() -> Self {
        Self {
            clock: LogicalClock::new(),
            running: Vec::new(),
            next_id: 0,
        }
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Starts `timeline` at the current logical time.
    pub fn schedule(&mut self, timeline: Timeline) -> AnimationHandle {
        let id = AnimationId(self.next_id);
        self.next_id += 1;

        let (sender, receiver) = oneshot::channel();
        let token = CancellationToken::new();

        log::trace!(
            "Scheduling {:?} on {:?} ({:.2}s)",
            id,
            timeline.node(),
            timeline.duration()
        );

        self.running.push(Running {
            id,
            timeline,
            started_at: self.clock.now(),
            token: token.clone(),
            sender: Some(sender),
        });

        AnimationHandle {
            id,
            token,
            receiver,
        }
    }

    /// Advances logical time by `dt` seconds and applies every running timeline.
    pub fn advance(&mut self, dt: f32, scene: &mut SceneGraph) -> Vec<Finished> {
        let now = self.clock.advance(dt);
        let mut finished = Vec::new();

        self.running.retain_mut(|running| {
            if running.token.is_cancelled() {
                finished.push(running.resolve(AnimationOutcome::Cancelled));
                return false;
            }

            let elapsed = (now - running.started_at) as f32;
            if running.timeline.apply(elapsed, scene) {
                finished.push(running.resolve(AnimationOutcome::Completed));
                return false;
            }
            true
        });

        finished
    }

    pub fn cancel(&mut self, id: AnimationId) -> bool {
        match self.running.iter().find(|r| r.id == id) {
            Some(running) => {
                running.token.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self, id: AnimationId) -> bool {
        self.running.iter().any(|r| r.id == id)
    }

    pub fn running_count(&self) -> usize {
        self.running.len()
    }
}

impl Default for Tweener {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::{AxisTargets, Ease, Property};
    use cgmath::Vector3;
    use futures::FutureExt;

    fn scene_with_node() -> (SceneGraph, crate::gfx::scene::NodeId) {
        let mut scene = SceneGraph::new();
        let node = scene.create_node("folder");
        scene.add_to_root(node);
        (scene, node)
    }

    #[test]
    fn test_handle_resolves_after_duration() {
        let (mut scene, node) = scene_with_node();
        let mut tweener = Tweener::new();
        let mut handle = tweener.schedule(
            Timeline::new(node).to(Property::Position, AxisTargets::only_y(4.0), 1.0, Ease::Linear),
        );

        assert!(tweener.advance(0.5, &mut scene).is_empty());
        assert_eq!((&mut handle).now_or_never(), None);
        assert!(tweener.is_running(handle.id()));

        let finished = tweener.advance(0.5, &mut scene);
        assert_eq!(
            finished,
            vec![Finished {
                id: handle.id(),
                outcome: AnimationOutcome::Completed
            }]
        );
        assert_eq!(handle.now_or_never(), Some(AnimationOutcome::Completed));
        assert_eq!(scene.transform(node).unwrap().position.y, 4.0);
    }

    #[test]
    fn test_cancel_stops_motion_in_place() {
        let (mut scene, node) = scene_with_node();
        let mut tweener = Tweener::new();
        let handle = tweener.schedule(Timeline::new(node).to(
            Property::Position,
            Vector3::new(10.0, 0.0, 0.0),
            1.0,
            Ease::Linear,
        ));

        tweener.advance(0.25, &mut scene);
        handle.cancel();
        let finished = tweener.advance(0.25, &mut scene);

        assert_eq!(finished[0].outcome, AnimationOutcome::Cancelled);
        assert_eq!(tweener.running_count(), 0);
        assert!((scene.transform(node).unwrap().position.x - 2.5).abs() < 1e-4);
        assert_eq!(
            futures::executor::block_on(handle),
            AnimationOutcome::Cancelled
        );
    }

    #[test]
    fn test_dropped_scheduler_cancels_handle() {
        let (_, node) = scene_with_node();
        let mut tweener = Tweener::new();
        let handle = tweener.schedule(Timeline::new(node).set(Property::Position, AxisTargets::only_y(1.0)));
        drop(tweener);
        assert_eq!(futures::executor::block_on(handle), AnimationOutcome::Cancelled);
    }

    #[test]
    fn test_timelines_start_at_schedule_time() {
        let (mut scene, node) = scene_with_node();
        let mut tweener = Tweener::new();
        tweener.advance(5.0, &mut scene);

        let handle = tweener.schedule(Timeline::new(node).to(
            Property::Position,
            AxisTargets::only_y(2.0),
            1.0,
            Ease::Linear,
        ));
        tweener.advance(0.5, &mut scene);
        assert!(tweener.is_running(handle.id()));
        assert!((scene.transform(node).unwrap().position.y - 1.0).abs() < 1e-4);
    }
}
