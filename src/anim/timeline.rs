//! Sequenced position and rotation tweens for one node.

use cgmath::Vector3;

use crate::gfx::scene::{NodeId, SceneGraph, Transform};

use super::easing::Ease;

/// Steps that end within this many seconds of the current time count as finished,
/// absorbing float drift from accumulated frame deltas.
const TIME_EPSILON: f32 = 1e-4;

/// Transform channel a step writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Position,
    /// Euler angles in radians.
    Rotation,
}

impl Property {
    fn read(self, transform: &Transform) -> Vector3<f32> {
        match self {
            Property::Position => transform.position,
            Property::Rotation => transform.rotation,
        }
    }

    fn write(self, transform: &mut Transform) -> &mut Vector3<f32> {
        match self {
            Property::Position => &mut transform.position,
            Property::Rotation => &mut transform.rotation,
        }
    }
}

/// Per-axis target values; `None` axes are left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisTargets {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl AxisTargets {
    pub fn all(v: Vector3<f32>) -> Self {
        Self {
            x: Some(v.x),
            y: Some(v.y),
            z: Some(v.z),
        }
    }

    pub fn only_y(y: f32) -> Self {
        Self {
            y: Some(y),
            ..Self::default()
        }
    }

    fn axes(&self) -> [Option<f32>; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<Vector3<f32>> for AxisTargets {
    fn from(v: Vector3<f32>) -> Self {
        Self::all(v)
    }
}

#[derive(Debug, Clone)]
struct Step {
    property: Property,
    target: AxisTargets,
    /// Seconds after the timeline delay.
    start: f32,
    duration: f32,
    ease: Ease,
    /// Captured when the step first activates.
    from: Option<Vector3<f32>>,
    done: bool,
}

impl Step {
    /// Writes the interpolated value for `local_time` and reports completion.
    fn apply(&mut self, local_time: f32, transform: &mut Transform) -> bool {
        let from = *self
            .from
            .get_or_insert_with(|| self.property.read(transform));

        let finished = local_time + TIME_EPSILON >= self.start + self.duration;
        let progress = if finished || self.duration <= 0.0 {
            1.0
        } else {
            self.ease.apply((local_time - self.start) / self.duration)
        };

        let value = self.property.write(transform);
        for (axis, target) in self.target.axes().into_iter().enumerate() {
            if let Some(target) = target {
                value[axis] = if finished {
                    target
                } else {
                    from[axis] + (target - from[axis]) * progress
                };
            }
        }

        self.done = finished;
        finished
    }
}

/// Ordered tween steps for a single node.
///
/// Steps are positioned like a sequencer: [`Timeline::to`] and [`Timeline::set`]
/// append at the current end, [`Timeline::with_previous`] starts together with
/// the step declared just before it. Steps are applied in declaration order, so
/// a frame that crosses several boundaries settles each one before the next
/// captures its start value.
#[derive(Debug, Clone)]
pub struct Timeline {
    node: NodeId,
    delay: f32,
    steps: Vec<Step>,
    cursor: f32,
    last_start: f32,
}

impl Timeline {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            delay: 0.0,
            steps: Vec::new(),
            cursor: 0.0,
            last_start: 0.0,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Idle time before the first step begins.
    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds.max(0.0);
        self
    }

    /// Tweens `property` towards `target`, starting when the previous step ends.
    pub fn to(self, property: Property, target: impl Into<AxisTargets>, duration: f32, ease: Ease) -> Self {
        let start = self.cursor;
        self.push(property, target.into(), start, duration, ease)
    }

    /// Tweens `property` towards `target`, starting together with the previous step.
    pub fn with_previous(
        self,
        property: Property,
        target: impl Into<AxisTargets>,
        duration: f32,
        ease: Ease,
    ) -> Self {
        let start = self.last_start;
        self.push(property, target.into(), start, duration, ease)
    }

    /// Instantly assigns `property` when the previous step ends.
    pub fn set(self, property: Property, value: impl Into<AxisTargets>) -> Self {
        let start = self.cursor;
        self.push(property, value.into(), start, 0.0, Ease::Linear)
    }

    fn push(mut self, property: Property, target: AxisTargets, start: f32, duration: f32, ease: Ease) -> Self {
        let duration = duration.max(0.0);
        self.steps.push(Step {
            property,
            target,
            start,
            duration,
            ease,
            from: None,
            done: false,
        });
        self.last_start = start;
        self.cursor = self.cursor.max(start + duration);
        self
    }

    /// Total length including the delay.
    pub fn duration(&self) -> f32 {
        self.delay + self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.steps.iter().all(|s| s.done)
    }

    /// Evaluates the timeline `elapsed` seconds after it was scheduled.
    ///
    /// Returns `true` once every step has finished. A node that no longer
    /// exists finishes the timeline immediately.
    pub fn apply(&mut self, elapsed: f32, scene: &mut SceneGraph) -> bool {
        let Some(transform) = scene.transform_mut(self.node) else {
            log::warn!("Tween target {:?} is gone; finishing its timeline", self.node);
            self.steps.iter_mut().for_each(|s| s.done = true);
            return true;
        };

        let local_time = elapsed - self.delay;
        for step in self.steps.iter_mut().filter(|s| !s.done) {
            if local_time + TIME_EPSILON < step.start {
                continue;
            }
            step.apply(local_time, transform);
        }

        self.is_finished()
    }
}
