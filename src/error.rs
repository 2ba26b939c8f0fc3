use std::path::PathBuf;

/// Failure while fetching or parsing one model bundle.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("{0} contains no scene graph")]
    EmptyScene(PathBuf),
    #[error("loading aborted before {0} was fetched")]
    Aborted(PathBuf),
}

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error(transparent)]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error(transparent)]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface does not support any usable format")]
    UnsupportedSurface,
}
