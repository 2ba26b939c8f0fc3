//! Cloning the folder template into the holder stack.

use std::f32::consts::FRAC_PI_2;

use cgmath::Vector3;

use crate::gfx::scene::{NodeId, SceneGraph};

/// First slot in the holder, world units.
pub const HOLDER_START: Vector3<f32> = Vector3::new(-2.25, 4.70, -2.10);
/// Depth the whole stack occupies regardless of count (five folders 0.03 apart).
pub const HOLDER_DEPTH_SPAN: f32 = 0.12;
/// Folders stand upright in the holder.
pub const HOLDER_ROTATION: Vector3<f32> = Vector3::new(FRAC_PI_2, 0.0, 0.0);

/// One spawned folder clone.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderInstance {
    pub node: NodeId,
    pub index: usize,
    is_animating: bool,
}

impl FolderInstance {
    pub fn new(node: NodeId, index: usize) -> Self {
        Self {
            node,
            index,
            is_animating: false,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub(super) fn set_animating(&mut self, animating: bool) {
        self.is_animating = animating;
    }
}

/// Depth step between neighbouring folders in the holder.
pub fn holder_step_z(count: usize) -> f32 {
    if count > 1 {
        HOLDER_DEPTH_SPAN / (count - 1) as f32
    } else {
        0.0
    }
}

/// Clones `template` `count` times into the holder slots and attaches each clone to the root.
///
/// Without a holder nothing is created.
pub fn spawn(
    scene: &mut SceneGraph,
    template: NodeId,
    holder: Option<NodeId>,
    count: usize,
) -> Vec<FolderInstance> {
    let Some(holder) = holder else {
        log::warn!("fileHolder not found, cannot position folders");
        return Vec::new();
    };

    let holder_pos = scene.world_position(holder);
    log::debug!(
        "FileHolder world position: x:{:.2}, y:{:.2}, z:{:.2}",
        holder_pos.x,
        holder_pos.y,
        holder_pos.z
    );

    let step_z = holder_step_z(count);
    let mut folders = Vec::with_capacity(count);

    for i in 0..count {
        let Some(clone) = scene.clone_subtree(template) else {
            log::warn!("Folder template {:?} is missing; stopping after {} clones", template, i);
            break;
        };

        if let Some(transform) = scene.transform_mut(clone) {
            transform.position = HOLDER_START + Vector3::new(0.0, 0.0, i as f32 * step_z);
            transform.rotation = HOLDER_ROTATION;
        }

        scene.traverse_mut(clone, |_, node| {
            if node.is_mesh() {
                node.cast_shadow = true;
                node.receive_shadow = true;
            }
        });

        scene.add_to_root(clone);
        folders.push(FolderInstance::new(clone, i));

        let pos = scene.world_position(clone);
        log::debug!(
            "Folder {} position: x:{:.2}, y:{:.2}, z:{:.2}",
            i,
            pos.x,
            pos.y,
            pos.z
        );
    }

    log::info!("Created {} folder clones", folders.len());
    folders
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_sphere;
    use crate::gfx::scene::Material;

    fn scene_with_template() -> (SceneGraph, NodeId, NodeId) {
        let mut scene = SceneGraph::new();
        let holder = scene.create_node("fileHolder");
        scene.add_to_root(holder);

        let mesh = scene.add_mesh(generate_sphere(8, 8).into_mesh());
        let template = scene.create_node("folder");
        let cover = scene.create_mesh_node("cover", mesh, Material::default());
        scene.add_child(template, cover);
        (scene, template, holder)
    }

    #[test]
    fn test_no_holder_spawns_nothing() {
        let (mut scene, template, _) = scene_with_template();
        let before = scene.len();
        for n in [0, 1, 10] {
            assert!(spawn(&mut scene, template, None, n).is_empty());
        }
        assert_eq!(scene.len(), before);
    }

    #[test]
    fn test_spawn_indices_and_distinct_depths() {
        let (mut scene, template, holder) = scene_with_template();
        let folders = spawn(&mut scene, template, Some(holder), 10);

        assert_eq!(folders.len(), 10);
        for (i, folder) in folders.iter().enumerate() {
            assert_eq!(folder.index, i);
            assert!(!folder.is_animating());
            assert!(scene.is_attached(folder.node));
            assert_eq!(scene.node(folder.node).unwrap().parent(), Some(scene.root()));
        }

        let zs: Vec<f32> = folders
            .iter()
            .map(|f| scene.transform(f.node).unwrap().position.z)
            .collect();
        for pair in zs.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert!((zs[9] - zs[0] - HOLDER_DEPTH_SPAN).abs() < 1e-5);
    }

    #[test]
    fn test_spawned_meshes_cast_and_receive_shadows() {
        let (mut scene, template, holder) = scene_with_template();
        let folders = spawn(&mut scene, template, Some(holder), 2);

        let cover = scene.node(folders[1].node).unwrap().children()[0];
        let node = scene.node(cover).unwrap();
        assert!(node.cast_shadow && node.receive_shadow);

        // The template itself stays untouched and detached.
        let template_cover = scene.node(template).unwrap().children()[0];
        assert!(!scene.node(template_cover).unwrap().cast_shadow);
        assert!(!scene.is_attached(template));
    }

    #[test]
    fn test_single_folder_sits_at_start() {
        let (mut scene, template, holder) = scene_with_template();
        let folders = spawn(&mut scene, template, Some(holder), 1);
        let t = scene.transform(folders[0].node).unwrap();
        assert_eq!(t.position, HOLDER_START);
        assert_eq!(t.rotation, HOLDER_ROTATION);
    }
}
