//! Folder state owned by the app: spawned folders, holder, roles and animator.

use crate::anim::AnimationHandle;
use crate::gfx::scene::{NodeId, SceneGraph};

use super::animator::FolderAnimator;
use super::roles::RoleMap;
use super::spawner::{self, FolderInstance};

/// Owns every piece of folder state: the spawned clones, the holder, the
/// click role lookup and the animator.
///
/// The app builds one of these up front; it stays inert until
/// [`FolderDesk::install_world`] provides a holder.
#[derive(Default)]
pub struct FolderDesk {
    folders: Vec<FolderInstance>,
    holder: Option<NodeId>,
    roles: RoleMap,
    animator: FolderAnimator,
}

impl FolderDesk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the prepared world's holder and its role lookup.
    pub fn install_world(&mut self, holder: Option<NodeId>, roles: RoleMap) {
        if holder.is_none() {
            log::warn!("World has no fileHolder; folder interaction stays disabled");
        }
        self.holder = holder;
        self.roles = roles;
    }

    /// Clones the folder template into the holder. Runs once; later calls are ignored.
    pub fn spawn_folders(&mut self, scene: &mut SceneGraph, template: NodeId, count: usize) -> usize {
        if !self.folders.is_empty() {
            log::warn!("Folders already spawned; ignoring another spawn request");
            return 0;
        }
        self.folders = spawner::spawn(scene, template, self.holder, count);
        self.folders.len()
    }

    pub fn holder(&self) -> Option<NodeId> {
        self.holder
    }

    pub fn roles(&self) -> &RoleMap {
        &self.roles
    }

    pub fn folders(&self) -> &[FolderInstance] {
        &self.folders
    }

    pub fn first_idle(&self) -> Option<&FolderInstance> {
        self.folders.iter().find(|f| !f.is_animating())
    }

    /// `None` animates every idle folder, staggered by index; `Some(i)` animates folder `i`.
    pub fn dispatch(&mut self, request: Option<usize>) -> Vec<AnimationHandle> {
        let total = self.folders.len();
        let animator = &mut self.animator;

        match request {
            None => self
                .folders
                .iter_mut()
                .filter(|f| !f.is_animating())
                .filter_map(|folder| {
                    let index = folder.index;
                    animator.animate(folder, index, total)
                })
                .collect(),
            Some(index) => {
                let Some(folder) = self.folders.iter_mut().find(|f| f.index == index) else {
                    log::warn!("No folder with index {}", index);
                    return Vec::new();
                };
                log::info!("Animating folder {}", index);
                animator.animate(folder, index, total).into_iter().collect()
            }
        }
    }

    pub fn cancel(&mut self, index: usize) -> bool {
        match self.folders.iter().find(|f| f.index == index) {
            Some(folder) => self.animator.cancel(folder),
            None => false,
        }
    }

    /// Advances running folder animations by `dt` seconds.
    pub fn update(&mut self, dt: f32, scene: &mut SceneGraph) {
        self.animator.update(dt, scene, &mut self.folders);
    }

    pub fn animating_count(&self) -> usize {
        self.folders.iter().filter(|f| f.is_animating()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desk_with_folders(count: usize) -> (SceneGraph, FolderDesk) {
        let mut scene = SceneGraph::new();
        let holder = scene.create_node("fileHolder");
        scene.add_to_root(holder);
        let template = scene.create_node("folder");

        let mut desk = FolderDesk::new();
        let roles = RoleMap::build(&scene, Some(holder));
        desk.install_world(Some(holder), roles);
        assert_eq!(desk.spawn_folders(&mut scene, template, count), count);
        (scene, desk)
    }

    fn run_for(desk: &mut FolderDesk, scene: &mut SceneGraph, seconds: f32) {
        for _ in 0..(seconds / 0.01).round() as usize {
            desk.update(0.01, scene);
        }
    }

    #[test]
    fn test_spawn_without_holder_is_empty() {
        let mut scene = SceneGraph::new();
        let template = scene.create_node("folder");
        let mut desk = FolderDesk::new();
        assert_eq!(desk.spawn_folders(&mut scene, template, 10), 0);
        assert!(desk.first_idle().is_none());
    }

    #[test]
    fn test_dispatch_all_animates_idle_folders() {
        let (mut scene, mut desk) = desk_with_folders(4);

        assert_eq!(desk.dispatch(Some(1)).len(), 1);
        assert_eq!(desk.first_idle().map(|f| f.index), Some(0));

        let handles = desk.dispatch(None);
        assert_eq!(handles.len(), 3);
        assert_eq!(desk.animating_count(), 4);
        assert!(desk.first_idle().is_none());

        // Last folder: 0.3 stagger + 1.3 sequence.
        run_for(&mut desk, &mut scene, 1.7);
        assert_eq!(desk.animating_count(), 0);
    }

    #[test]
    fn test_second_spawn_is_ignored() {
        let (mut scene, mut desk) = desk_with_folders(3);
        let template = scene.create_node("folder");
        assert_eq!(desk.spawn_folders(&mut scene, template, 3), 0);
        assert_eq!(desk.folders().len(), 3);
    }

    #[test]
    fn test_cancel_by_index() {
        let (mut scene, mut desk) = desk_with_folders(2);
        desk.dispatch(Some(0));
        assert!(desk.cancel(0));
        assert!(!desk.cancel(1));
        desk.update(0.01, &mut scene);
        assert_eq!(desk.animating_count(), 0);
    }
}
