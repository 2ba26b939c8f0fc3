use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;

use crate::error::LoadError;
use crate::gfx::scene::{Material, Mesh, NodeId, SceneGraph};

/// Bytes read between progress reports.
const READ_CHUNK: usize = 64 * 1024;

/// One named mesh with its material, ready to be placed in a scene.
#[derive(Debug, Clone)]
pub struct ModelPart {
    pub name: String,
    pub mesh: Mesh,
    pub material: Material,
}

/// Everything one model file produced.
#[derive(Debug, Clone, Default)]
pub struct ModelBundle {
    pub name: String,
    pub parts: Vec<ModelPart>,
}

impl ModelBundle {
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Builds a detached root node with one mesh child per part.
    ///
    /// An empty bundle has no scene graph and yields `None`.
    pub fn instantiate(&self, scene: &mut SceneGraph) -> Option<NodeId> {
        if self.is_empty() {
            return None;
        }

        let root = scene.create_node(&self.name);
        for part in &self.parts {
            let mesh = scene.add_mesh(part.mesh.clone());
            let node = scene.create_mesh_node(&part.name, mesh, part.material.clone());
            scene.add_child(root, node);
        }
        Some(root)
    }
}

/// Source of model bundles.
///
/// `progress` receives the fraction of the file read so far, in `[0, 1]`.
pub trait AssetLoader {
    fn load(&self, path: &Path, progress: &mut dyn FnMut(f32)) -> Result<ModelBundle, LoadError>;
}

/// Loads Wavefront OBJ files (with MTL materials) through `tobj`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjLoader;

impl ObjLoader {
    fn read_with_progress(path: &Path, progress: &mut dyn FnMut(f32)) -> Result<Vec<u8>, LoadError> {
        let io_err = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let total = file.metadata().map(|m| m.len() as usize).unwrap_or(0);

        let mut bytes = Vec::with_capacity(total);
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            let n = file.read(&mut chunk).map_err(io_err)?;
            if n == 0 {
                break;
            }
            bytes.extend_from_slice(&chunk[..n]);
            if total > 0 {
                progress((bytes.len() as f32 / total as f32).min(1.0));
            }
        }
        Ok(bytes)
    }

    /// Parses OBJ text; `base_dir` resolves `mtllib` references.
    pub fn parse(name: &str, bytes: &[u8], base_dir: &Path) -> Result<ModelBundle, tobj::LoadError> {
        let (models, materials) = tobj::load_obj_buf(
            &mut Cursor::new(bytes),
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
            |mtl_path| tobj::load_mtl(base_dir.join(mtl_path)),
        )?;

        let materials = materials.unwrap_or_else(|e| {
            log::info!("No MTL materials for {} ({}), using defaults", name, e);
            Vec::new()
        });

        let parts = models
            .into_iter()
            .enumerate()
            .filter(|(_, m)| !m.mesh.positions.is_empty())
            .map(|(i, m)| {
                let material = m
                    .mesh
                    .material_id
                    .and_then(|id| materials.get(id))
                    .map(|mtl| {
                        let diffuse = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);
                        Material::new(
                            &mtl.name,
                            [diffuse[0], diffuse[1], diffuse[2], mtl.dissolve.unwrap_or(1.0)],
                        )
                    })
                    .unwrap_or_default();

                let name = if m.name.is_empty() {
                    format!("object_{}", i)
                } else {
                    m.name
                };

                ModelPart {
                    name,
                    mesh: Mesh::new(&m.mesh.positions, &m.mesh.normals, m.mesh.indices),
                    material,
                }
            })
            .collect();

        Ok(ModelBundle {
            name: name.to_string(),
            parts,
        })
    }
}

impl AssetLoader for ObjLoader {
    fn load(&self, path: &Path, progress: &mut dyn FnMut(f32)) -> Result<ModelBundle, LoadError> {
        let bytes = Self::read_with_progress(path, progress)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        Self::parse(&name, &bytes, base_dir).map_err(|source| LoadError::Obj {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_OBJECTS: &str = "\
o desk
v 0 0 0
v 1 0 0
v 1 0 1
f 1 2 3
o fileHolder
v 0 1 0
v 1 1 0
v 1 2 0
v 0 2 0
f 4 5 6 7
";

    #[test]
    fn test_parse_objects_into_parts() {
        let bundle = ObjLoader::parse("world", TWO_OBJECTS.as_bytes(), Path::new(".")).unwrap();

        assert_eq!(bundle.parts.len(), 2);
        assert_eq!(bundle.parts[0].name, "desk");
        assert_eq!(bundle.parts[1].name, "fileHolder");
        // The quad is triangulated.
        assert_eq!(bundle.parts[1].mesh.index_count(), 6);
        // Missing normals are computed.
        assert_ne!(bundle.parts[0].mesh.vertices()[0].normal, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_instantiate_builds_named_children() {
        let bundle = ObjLoader::parse("world", TWO_OBJECTS.as_bytes(), Path::new(".")).unwrap();
        let mut scene = SceneGraph::new();
        let root = bundle.instantiate(&mut scene).unwrap();

        assert_eq!(scene.node(root).unwrap().children().len(), 2);
        assert!(scene.find_by_name(root, "fileHolder").is_some());
        assert!(!scene.is_attached(root));
    }

    #[test]
    fn test_empty_bundle_has_no_scene() {
        let bundle = ObjLoader::parse("empty", b"# nothing here\n", Path::new(".")).unwrap();
        assert!(bundle.is_empty());
        assert!(bundle.instantiate(&mut SceneGraph::new()).is_none());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ObjLoader
            .load(Path::new("does/not/exist.obj"), &mut |_| {})
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
