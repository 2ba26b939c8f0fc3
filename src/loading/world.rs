use crate::config::TriggerConfig;
use crate::folders::HOLDER_NAME;
use crate::gfx::geometry::generate_sphere;
use crate::gfx::scene::{Material, NodeId, NodeTag, SceneGraph};

/// Nodes the folder logic needs from a freshly loaded world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreparedWorld {
    pub root: NodeId,
    pub holder: Option<NodeId>,
    pub trigger: Option<NodeId>,
}

/// Attaches the world below the scene root, turns on shadows for its meshes,
/// locates the holder and adds the invisible trigger sphere next to it.
pub fn prepare_world(scene: &mut SceneGraph, world_root: NodeId, trigger: &TriggerConfig) -> PreparedWorld {
    scene.add_to_root(world_root);

    scene.traverse_mut(world_root, |_, node| {
        if node.is_mesh() {
            node.cast_shadow = true;
            node.receive_shadow = true;
        }
    });

    let holder = scene.find_by_name(world_root, HOLDER_NAME);
    let trigger = match holder {
        Some(holder) => {
            log_holder(scene, holder);
            Some(create_trigger(scene, trigger))
        }
        None => {
            log::warn!("World has no node named {}", HOLDER_NAME);
            None
        }
    };

    PreparedWorld {
        root: world_root,
        holder,
        trigger,
    }
}

fn log_holder(scene: &SceneGraph, holder: NodeId) {
    let Some(transform) = scene.transform(holder) else {
        return;
    };
    let local = transform.position;
    let rotation = transform.rotation;
    let world = scene.world_position(holder);

    log::info!("Found {}:", HOLDER_NAME);
    log::info!("  Local position: x:{:.2}, y:{:.2}, z:{:.2}", local.x, local.y, local.z);
    log::info!("  World position: x:{:.2}, y:{:.2}, z:{:.2}", world.x, world.y, world.z);
    log::info!("  Rotation: x:{:.2}, y:{:.2}, z:{:.2}", rotation.x, rotation.y, rotation.z);
}

fn create_trigger(scene: &mut SceneGraph, config: &TriggerConfig) -> NodeId {
    let mesh = scene.add_mesh(generate_sphere(config.segments, config.segments).into_mesh());

    // Fully transparent: never drawn, still hit by picking.
    let mut material = Material::new("folderTrigger", [1.0, 0.0, 1.0, 0.0]);
    material.double_sided = true;

    let node = scene.create_mesh_node("folderTrigger", mesh, material);
    if let Some(n) = scene.node_mut(node) {
        n.tag = Some(NodeTag::FolderTrigger);
        n.transform.position = config.position;
        n.transform.scale = cgmath::Vector3::new(config.radius, config.radius, config.radius);
    }
    scene.add_to_root(node);

    log::info!(
        "Created invisible click sphere (radius {}) at x:{:.2}, y:{:.2}, z:{:.2}",
        config.radius,
        config.position.x,
        config.position.y,
        config.position.z
    );
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folders::{NodeRole, RoleMap};
    use crate::gfx::scene::Mesh;
    use cgmath::Vector3;

    fn world(scene: &mut SceneGraph, with_holder: bool) -> NodeId {
        let quad = Mesh::new(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0],
            &[],
            vec![0, 1, 2],
        );
        let mesh = scene.add_mesh(quad);
        let root = scene.create_node("world_scene");
        let desk = scene.create_mesh_node("desk", mesh, Material::default());
        scene.add_child(root, desk);
        if with_holder {
            let holder = scene.create_mesh_node(HOLDER_NAME, mesh, Material::default());
            scene.transform_mut(holder).unwrap().position = Vector3::new(-2.25, 4.5, -2.0);
            scene.add_child(root, holder);
        }
        root
    }

    #[test]
    fn test_prepare_finds_holder_and_adds_trigger() {
        let mut scene = SceneGraph::new();
        let root = world(&mut scene, true);
        let prepared = prepare_world(&mut scene, root, &TriggerConfig::default());

        assert!(scene.is_attached(root));
        let holder = prepared.holder.unwrap();
        let trigger = prepared.trigger.unwrap();

        let node = scene.node(trigger).unwrap();
        assert_eq!(node.tag, Some(NodeTag::FolderTrigger));
        assert_eq!(node.material.opacity(), 0.0);
        assert!(node.material.double_sided);
        assert_eq!(node.transform.position, Vector3::new(-2.5, 5.0, 2.7));
        assert!(scene.is_attached(trigger));

        let roles = RoleMap::build(&scene, prepared.holder);
        assert_eq!(roles.role(holder), Some(NodeRole::Holder));
        assert_eq!(roles.role(trigger), Some(NodeRole::Trigger));
    }

    #[test]
    fn test_world_meshes_get_shadows() {
        let mut scene = SceneGraph::new();
        let root = world(&mut scene, true);
        prepare_world(&mut scene, root, &TriggerConfig::default());

        let desk = scene.find_by_name(root, "desk").unwrap();
        let node = scene.node(desk).unwrap();
        assert!(node.cast_shadow && node.receive_shadow);
        assert!(!scene.node(root).unwrap().cast_shadow);
    }

    #[test]
    fn test_no_holder_means_no_trigger() {
        let mut scene = SceneGraph::new();
        let root = world(&mut scene, false);
        let prepared = prepare_world(&mut scene, root, &TriggerConfig::default());
        assert_eq!(prepared.holder, None);
        assert_eq!(prepared.trigger, None);
    }
}
