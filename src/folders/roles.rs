//! Node to click-role lookup, built once when the world is installed.

use std::collections::HashMap;

use crate::gfx::scene::{NodeId, NodeTag, SceneGraph};

/// Name the world model gives its folder holder.
pub const HOLDER_NAME: &str = "fileHolder";

/// What a clicked node means for folder interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Trigger,
    Holder,
}

/// Node to role lookup, built once after the world is prepared.
#[derive(Debug, Clone, Default)]
pub struct RoleMap {
    roles: HashMap<NodeId, NodeRole>,
}

impl RoleMap {
    /// Tags every trigger node and every node inside a holder subtree.
    ///
    /// A holder subtree is `holder` itself or any node named [`HOLDER_NAME`],
    /// together with all of its descendants. Trigger tags take precedence.
    pub fn build(scene: &SceneGraph, holder: Option<NodeId>) -> Self {
        let mut roles = HashMap::new();
        let everything = scene.descendants(scene.root());

        let holder_roots = everything
            .iter()
            .copied()
            .filter(|id| {
                Some(*id) == holder || scene.node(*id).is_some_and(|n| n.name == HOLDER_NAME)
            })
            .chain(holder);

        for root in holder_roots {
            for id in scene.descendants(root) {
                roles.insert(id, NodeRole::Holder);
            }
        }

        for id in everything {
            if scene.node(id).and_then(|n| n.tag) == Some(NodeTag::FolderTrigger) {
                roles.insert(id, NodeRole::Trigger);
            }
        }

        log::debug!("Role map built with {} entries", roles.len());
        Self { roles }
    }

    pub fn role(&self, node: NodeId) -> Option<NodeRole> {
        self.roles.get(&node).copied()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holder_descendants_are_holder() {
        let mut scene = SceneGraph::new();
        let world = scene.create_node("world");
        let holder = scene.create_node(HOLDER_NAME);
        let slot = scene.create_node("slot");
        let desk = scene.create_node("desk");
        scene.add_to_root(world);
        scene.add_child(world, holder);
        scene.add_child(holder, slot);
        scene.add_child(world, desk);

        let roles = RoleMap::build(&scene, Some(holder));
        assert_eq!(roles.role(holder), Some(NodeRole::Holder));
        assert_eq!(roles.role(slot), Some(NodeRole::Holder));
        assert_eq!(roles.role(desk), None);
        assert_eq!(roles.role(world), None);
    }

    #[test]
    fn test_name_match_and_trigger_tag() {
        let mut scene = SceneGraph::new();
        let holder = scene.create_node("rack");
        let named = scene.create_node(HOLDER_NAME);
        let inner = scene.create_node("inner");
        let trigger = scene.create_node("trigger");
        scene.add_to_root(holder);
        scene.add_to_root(named);
        scene.add_child(named, inner);
        scene.add_to_root(trigger);
        scene.node_mut(trigger).unwrap().tag = Some(NodeTag::FolderTrigger);

        let roles = RoleMap::build(&scene, Some(holder));
        assert_eq!(roles.role(holder), Some(NodeRole::Holder));
        assert_eq!(roles.role(inner), Some(NodeRole::Holder));
        assert_eq!(roles.role(trigger), Some(NodeRole::Trigger));
        assert_eq!(roles.len(), 4);
    }
}
