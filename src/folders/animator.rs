//! The lift, re-entry and slide sequence that carries folders onto the table.

use std::collections::HashMap;

use cgmath::Vector3;
use rand::Rng;

use crate::anim::{
    AnimationHandle, AnimationId, AnimationOutcome, AxisTargets, Ease, Property, Timeline,
    Tweener,
};
use crate::gfx::scene::SceneGraph;

use super::layout;
use super::spawner::FolderInstance;

/// Delay between consecutive folders of one batch.
pub const STAGGER: f32 = 0.1;
pub const LIFT_HEIGHT: f32 = 10.0;
pub const LIFT_DURATION: f32 = 0.3;
/// Off-screen re-entry point; X is randomized in `[-2, 2]`.
pub const REENTRY_Y: f32 = 3.0;
pub const REENTRY_Z: f32 = 5.0;
pub const REENTRY_X_RANGE: f32 = 2.0;
pub const SLIDE_DURATION: f32 = 1.0;
pub const TABLE_HEIGHT: f32 = -0.7;

/// Total time from `animate` until the folder rests, for a given stagger slot.
pub fn sequence_duration(stagger_index: usize) -> f32 {
    stagger_index as f32 * STAGGER + LIFT_DURATION + SLIDE_DURATION
}

/// Runs the lift, re-entry and slide sequence that moves folders onto the table.
pub struct FolderAnimator {
    tweener: Tweener,
    /// Running sequence to folder index.
    in_flight: HashMap<AnimationId, usize>,
}

impl FolderAnimator {
    pub fn new() -> Self {
        Self {
            tweener: Tweener::new(),
            in_flight: HashMap::new(),
        }
    }

    /// Starts the table sequence for `folder`.
    ///
    /// A folder that is already moving is left alone and `None` is returned.
    pub fn animate(
        &mut self,
        folder: &mut FolderInstance,
        stagger_index: usize,
        total_folders: usize,
    ) -> Option<AnimationHandle> {
        self.animate_with(&mut rand::rng(), folder, stagger_index, total_folders)
    }

    pub fn animate_with<R: Rng>(
        &mut self,
        rng: &mut R,
        folder: &mut FolderInstance,
        stagger_index: usize,
        total_folders: usize,
    ) -> Option<AnimationHandle> {
        if folder.is_animating() {
            log::debug!("Folder {} is already animating; ignoring", folder.index);
            return None;
        }

        let reentry = Vector3::new(
            rng.random_range(-REENTRY_X_RANGE..=REENTRY_X_RANGE),
            REENTRY_Y,
            REENTRY_Z,
        );
        let target =
            layout::compute_target_with(rng, stagger_index, TABLE_HEIGHT, total_folders.max(1));

        let timeline = Timeline::new(folder.node)
            .delay(stagger_index as f32 * STAGGER)
            .to(
                Property::Position,
                AxisTargets::only_y(LIFT_HEIGHT),
                LIFT_DURATION,
                Ease::Power2In,
            )
            .set(Property::Position, reentry)
            .to(Property::Position, target.position, SLIDE_DURATION, Ease::Power2Out)
            .with_previous(Property::Rotation, target.rotation, SLIDE_DURATION, Ease::Power2Out);

        folder.set_animating(true);
        let handle = self.tweener.schedule(timeline);
        self.in_flight.insert(handle.id(), folder.index);

        log::debug!(
            "Folder {} heading to x:{:.2}, y:{:.2}, z:{:.2}",
            folder.index,
            target.position.x,
            target.position.y,
            target.position.z
        );
        Some(handle)
    }

    /// Stops the folder's running sequence where it is.
    ///
    /// Its busy flag clears on the next [`FolderAnimator::update`].
    pub fn cancel(&mut self, folder: &FolderInstance) -> bool {
        let id = self
            .in_flight
            .iter()
            .find_map(|(id, index)| (*index == folder.index).then_some(*id));
        match id {
            Some(id) => self.tweener.cancel(id),
            None => false,
        }
    }

    /// Advances every sequence by `dt` seconds and releases folders that finished.
    pub fn update(&mut self, dt: f32, scene: &mut SceneGraph, folders: &mut [FolderInstance]) {
        for finished in self.tweener.advance(dt, scene) {
            let Some(index) = self.in_flight.remove(&finished.id) else {
                continue;
            };
            let Some(folder) = folders.iter_mut().find(|f| f.index == index) else {
                continue;
            };
            folder.set_animating(false);

            match finished.outcome {
                AnimationOutcome::Completed => log::info!("Folder {} animation complete", index),
                AnimationOutcome::Cancelled => log::info!("Folder {} animation cancelled", index),
            }
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

impl Default for FolderAnimator {
    fn default() -> Self {
        Self::new()
    }
}
