//! Flattening the scene graph into per-frame draw items.

use crate::gfx::camera::camera_utils::convert_matrix4_to_array;
use crate::gfx::scene::{MeshId, NodeId, SceneGraph};

/// MUST match `Object` in scene.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub mesh: MeshId,
    pub uniform: ObjectUniform,
    pub transparent: bool,
}

/// Collects every drawable mesh node reachable from the root.
///
/// Hidden subtrees and fully transparent materials are skipped; opaque items
/// come first so blended ones composite over a finished depth buffer.
pub fn collect_draws(scene: &SceneGraph) -> Vec<DrawItem> {
    let mut hidden = Vec::new();
    let mut items = Vec::new();

    for (id, world) in scene.world_matrices() {
        let Some(node) = scene.node(id) else {
            continue;
        };
        let parent_hidden = node.parent().is_some_and(|p| hidden.contains(&p));
        if !node.visible || parent_hidden {
            hidden.push(id);
            continue;
        }

        let Some(mesh) = node.mesh else {
            continue;
        };
        let opacity = node.material.opacity();
        if opacity <= 0.0 {
            continue;
        }

        items.push(DrawItem {
            node: id,
            mesh,
            uniform: ObjectUniform {
                model: convert_matrix4_to_array(world),
                color: node.material.base_color,
            },
            transparent: opacity < 1.0,
        });
    }

    // Stable, so scene order is kept within each group.
    items.sort_by_key(|item| item.transparent);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_sphere;
    use crate::gfx::scene::Material;

    #[test]
    fn test_skips_invisible_and_transparent() {
        let mut scene = SceneGraph::new();
        let sphere = scene.add_mesh(generate_sphere(4, 4).into_mesh());

        let glass = scene.create_mesh_node("glass", sphere, Material::new("glass", [1.0, 1.0, 1.0, 0.5]));
        let trigger = scene.create_mesh_node("trigger", sphere, Material::new("t", [1.0, 0.0, 1.0, 0.0]));
        let solid = scene.create_mesh_node("solid", sphere, Material::default());
        let group = scene.create_node("group");
        let hidden_child = scene.create_mesh_node("inside", sphere, Material::default());
        let detached = scene.create_mesh_node("detached", sphere, Material::default());

        scene.add_to_root(glass);
        scene.add_to_root(trigger);
        scene.add_to_root(solid);
        scene.add_to_root(group);
        scene.add_child(group, hidden_child);
        scene.node_mut(group).unwrap().visible = false;

        let draws = collect_draws(&scene);
        let nodes: Vec<NodeId> = draws.iter().map(|d| d.node).collect();
        assert_eq!(nodes, vec![solid, glass]);
        assert!(draws[1].transparent);
        assert!(!nodes.contains(&detached));
    }
}
