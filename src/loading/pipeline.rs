use std::path::Path;
use std::thread::{self, JoinHandle};

use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use futures::{FutureExt, StreamExt};

use crate::config::AssetPaths;
use crate::error::LoadError;

use super::obj_loader::{AssetLoader, ModelBundle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    World,
    FolderTemplate,
}

impl AssetKind {
    pub fn label(self) -> &'static str {
        match self {
            AssetKind::World => "world scene",
            AssetKind::FolderTemplate => "folder template",
        }
    }
}

/// Messages from the loading thread, in the order they happen.
#[derive(Debug)]
pub enum LoadEvent {
    Progress { asset: AssetKind, fraction: f32 },
    World(Result<ModelBundle, LoadError>),
    /// Always the last event; `Aborted` when the world was unusable.
    Template(Result<ModelBundle, LoadError>),
}

/// Loads the world, then the folder template, reporting through `emit`.
///
/// The template is never fetched when the world fails to load or is empty,
/// since folders cannot be placed without the world's holder.
pub fn run_pipeline<L, F>(loader: &L, paths: &AssetPaths, mut emit: F)
where
    L: AssetLoader + ?Sized,
    F: FnMut(LoadEvent),
{
    let world = load_one(loader, &paths.world, AssetKind::World, &mut emit);
    let world_ok = world.is_ok();
    emit(LoadEvent::World(world));

    if !world_ok {
        emit(LoadEvent::Template(Err(LoadError::Aborted(
            paths.folder_template.clone(),
        ))));
        return;
    }

    let template = load_one(loader, &paths.folder_template, AssetKind::FolderTemplate, &mut emit);
    emit(LoadEvent::Template(template));
}

fn load_one<L, F>(
    loader: &L,
    path: &Path,
    asset: AssetKind,
    emit: &mut F,
) -> Result<ModelBundle, LoadError>
where
    L: AssetLoader + ?Sized,
    F: FnMut(LoadEvent),
{
    let bundle = loader.load(path, &mut |fraction| {
        emit(LoadEvent::Progress { asset, fraction })
    })?;
    if bundle.is_empty() {
        return Err(LoadError::EmptyScene(path.to_path_buf()));
    }
    Ok(bundle)
}

/// Receiving end of a background load.
pub struct LoadingHandle {
    receiver: UnboundedReceiver<LoadEvent>,
    thread: Option<JoinHandle<()>>,
}

impl LoadingHandle {
    /// Events that arrived since the last poll; never blocks.
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Some(Some(event)) = self.receiver.next().now_or_never() {
            events.push(event);
        }
        events
    }

    /// Whether the loading thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Blocks until every remaining event has arrived.
    pub fn wait(mut self) -> Vec<LoadEvent> {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Asset loading thread panicked");
            }
        }
        futures::executor::block_on(self.receiver.collect())
    }
}

/// Runs [`run_pipeline`] on a background thread.
pub fn start_loading<L>(loader: L, paths: AssetPaths) -> LoadingHandle
where
    L: AssetLoader + Send + 'static,
{
    let (sender, receiver) = unbounded();

    let spawned = thread::Builder::new()
        .name("asset-loader".to_string())
        .spawn(move || {
            run_pipeline(&loader, &paths, |event| {
                // The app may have shut down; dropping events is fine then.
                let _ = sender.unbounded_send(event);
            });
        });

    let thread = match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::error!("Failed to spawn asset loading thread: {}", e);
            None
        }
    };

    LoadingHandle { receiver, thread }
}
