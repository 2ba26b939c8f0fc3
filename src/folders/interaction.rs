//! Click routing: pointer position to ray to folder request.

use crate::events::{ClickEvent, EventSource, Subscription};
use crate::gfx::camera::PerspectiveCamera;
use crate::gfx::picking::{Hit, Raycaster, Viewport};
use crate::gfx::scene::{NodeId, SceneGraph};

use super::desk::FolderDesk;
use super::roles::NodeRole;
use super::spawner::FolderInstance;

/// What a click resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The world (and with it the holder) has not been installed yet.
    NotReady,
    /// Zero-sized window; no ray can be built.
    NoViewport,
    /// The trigger was hit: every idle folder was requested.
    Trigger,
    /// The holder was hit and this folder was requested.
    Holder(usize),
    /// The holder was hit but every folder is busy.
    AllBusy,
    /// The holder was hit but no folders were ever spawned.
    NoFolders,
    Missed,
}

/// Turns pointer clicks into folder requests.
///
/// Hits are classified by priority rather than distance: a trigger anywhere
/// along the ray beats a nearer holder.
#[derive(Default)]
pub struct InteractionRouter {
    raycaster: Raycaster,
    clicks: Option<Subscription<ClickEvent>>,
}

impl InteractionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `source`; a previous subscription is replaced.
    pub fn attach(&mut self, source: &mut EventSource<ClickEvent>) {
        if let Some(old) = self.clicks.take() {
            old.detach(source);
        }
        self.clicks = Some(source.subscribe());
    }

    pub fn detach(&mut self, source: &mut EventSource<ClickEvent>) {
        if let Some(subscription) = self.clicks.take() {
            subscription.detach(source);
        }
    }

    pub fn is_attached(&self) -> bool {
        self.clicks.is_some()
    }

    /// Hit-tests one click and hands the resulting request to `dispatch`.
    ///
    /// `dispatch` receives `None` for "every idle folder" and `Some` for a
    /// single folder; it is not called on a miss or while loading.
    pub fn on_click<F>(
        &self,
        click: ClickEvent,
        viewport: Viewport,
        camera: &PerspectiveCamera,
        scene: &SceneGraph,
        desk: &FolderDesk,
        mut dispatch: F,
    ) -> ClickOutcome
    where
        F: FnMut(Option<&FolderInstance>),
    {
        if desk.holder().is_none() {
            log::debug!("Click ignored: file holder not loaded yet");
            return ClickOutcome::NotReady;
        }
        if viewport.is_degenerate() {
            return ClickOutcome::NoViewport;
        }

        let ndc = viewport.to_ndc(click.x, click.y);
        let hits = self.raycaster.intersect_scene(&camera.ray_from_ndc(ndc), scene);
        log::debug!(
            "Click at ({:.2}, {:.2}) hit {} objects",
            ndc.x,
            ndc.y,
            hits.len()
        );
        if log::log_enabled!(log::Level::Trace) {
            for (i, hit) in hits.iter().enumerate() {
                log::trace!("  {}: {} ({:.2})", i, node_name(scene, hit.node), hit.distance);
            }
        }

        let role_of = |hit: &Hit| desk.roles().role(hit.node);

        if hits.iter().any(|h| role_of(h) == Some(NodeRole::Trigger)) {
            log::info!("Folder trigger clicked");
            dispatch(None);
            return ClickOutcome::Trigger;
        }

        if let Some(hit) = hits.iter().find(|h| role_of(h) == Some(NodeRole::Holder)) {
            log::debug!("Holder hit at distance {:.2}", hit.distance);
            return match desk.first_idle() {
                Some(folder) => {
                    dispatch(Some(folder));
                    ClickOutcome::Holder(folder.index)
                }
                None if desk.folders().is_empty() => {
                    log::info!("No folders in the holder; the folder template may have failed to load");
                    ClickOutcome::NoFolders
                }
                None => {
                    log::info!("All folders are currently animating");
                    ClickOutcome::AllBusy
                }
            };
        }

        ClickOutcome::Missed
    }

    /// Handles every click queued since the last frame and starts the requested animations.
    pub fn process_pending(
        &mut self,
        viewport: Viewport,
        camera: &PerspectiveCamera,
        scene: &SceneGraph,
        desk: &mut FolderDesk,
    ) -> Vec<ClickOutcome> {
        let Some(clicks) = self.clicks.as_mut() else {
            return Vec::new();
        };
        let pending = clicks.drain();

        pending
            .into_iter()
            .map(|click| {
                let mut request = None;
                let outcome = self.on_click(click, viewport, camera, scene, desk, |folder| {
                    request = Some(folder.map(|f| f.index));
                });
                if let Some(request) = request {
                    desk.dispatch(request);
                }
                outcome
            })
            .collect()
    }
}

impl InteractionRouter {
    /// Runs one frame of folder work: advances running animations by `dt`,
    /// then handles the clicks queued since the last frame.
    ///
    /// Clicks are dispatched after the advance so a folder started this frame
    /// only moves on time that passes after its click.
    pub fn advance_frame(
        &mut self,
        dt: f32,
        viewport: Viewport,
        camera: &PerspectiveCamera,
        scene: &mut SceneGraph,
        desk: &mut FolderDesk,
    ) -> Vec<ClickOutcome> {
        desk.update(dt, scene);
        self.process_pending(viewport, camera, scene, desk)
    }
}

fn node_name(scene: &SceneGraph, id: NodeId) -> &str {
    scene.node(id).map(|n| n.name.as_str()).unwrap_or("<missing>")
}
