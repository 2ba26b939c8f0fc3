use std::sync::Arc;

use cgmath::{Matrix4, Rad, SquareMatrix, Vector3, Vector4, Zero};

use super::mesh::Mesh;

/// Handle to a node stored in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to geometry registered with a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(usize);

/// Marker attached to nodes that carry interaction meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    /// Invisible hit region that fans a click out to every idle folder.
    FolderTrigger,
}

/// Local transform with Euler rotation applied in X, Y, Z order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    /// Euler angles in radians.
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Composes `T * Rx * Ry * Rz * S`.
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Per-node surface description.
///
/// Every node owns its material, so tinting or fading one clone never leaks
/// into its siblings or the template.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// Linear RGB plus opacity in the alpha channel.
    pub base_color: [f32; 4],
    pub double_sided: bool,
}

impl Material {
    pub fn new(name: &str, base_color: [f32; 4]) -> Self {
        Self {
            name: name.to_string(),
            base_color,
            double_sided: false,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.base_color[3]
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default", [0.8, 0.8, 0.8, 1.0])
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<MeshId>,
    pub material: Material,
    pub visible: bool,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    pub tag: Option<NodeTag>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::default(),
            mesh: None,
            material: Material::default(),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            tag: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_mesh(&self) -> bool {
        self.mesh.is_some()
    }
}

/// Arena-backed scene graph.
///
/// Nodes are never removed; a node created with [`SceneGraph::create_node`]
/// stays detached (and invisible to rendering and picking) until it is
/// attached somewhere below the root.
pub struct SceneGraph {
    nodes: Vec<Node>,
    meshes: Vec<Arc<Mesh>>,
    root: NodeId,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("Scene")],
            meshes: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshId {
        self.meshes.push(Arc::new(mesh));
        MeshId(self.meshes.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Arc<Mesh>> {
        self.meshes.get(id.0)
    }

    /// Creates a detached node.
    pub fn create_node(&mut self, name: &str) -> NodeId {
        self.nodes.push(Node::new(name));
        NodeId(self.nodes.len() - 1)
    }

    /// Creates a node with geometry and a material, detached.
    pub fn create_mesh_node(&mut self, name: &str, mesh: MeshId, material: Material) -> NodeId {
        let id = self.create_node(name);
        let node = &mut self.nodes[id.0];
        node.mesh = Some(mesh);
        node.material = material;
        id
    }

    /// Re-parents `child` under `parent`, detaching it from any previous parent.
    ///
    /// Refuses to create cycles and returns `false` in that case.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || self.is_ancestor(child, parent) {
            log::warn!(
                "Refusing to attach {:?} under its own descendant {:?}",
                child,
                parent
            );
            return false;
        }
        if self.node(parent).is_none() || self.node(child).is_none() {
            return false;
        }

        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|c| *c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        true
    }

    /// Attaches `child` directly below the root.
    pub fn add_to_root(&mut self, child: NodeId) -> bool {
        self.add_child(self.root, child)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.node(id).map(|n| &n.transform)
    }

    pub fn transform_mut(&mut self, id: NodeId) -> Option<&mut Transform> {
        self.node_mut(id).map(|n| &mut n.transform)
    }

    /// Returns true when `ancestor` appears on the parent chain of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.node(node).and_then(Node::parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(Node::parent);
        }
        false
    }

    /// Whether the node is reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.is_ancestor(self.root, id)
    }

    /// Depth-first pre-order list of `from` and all of its descendants.
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.node(from).is_none() {
            return out;
        }
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    /// First node named `name` in depth-first order below (and including) `from`.
    pub fn find_by_name(&self, from: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(from)
            .into_iter()
            .find(|id| self.nodes[id.0].name == name)
    }

    /// Deep-copies the subtree rooted at `source` and returns the new, detached root.
    ///
    /// Transforms and materials are copied; geometry handles are shared.
    pub fn clone_subtree(&mut self, source: NodeId) -> Option<NodeId> {
        let source_node = self.node(source)?.clone();
        let copy = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            ..source_node.clone()
        });

        for child in source_node.children {
            if let Some(child_copy) = self.clone_subtree(child) {
                self.nodes[child_copy.0].parent = Some(copy);
                self.nodes[copy.0].children.push(child_copy);
            }
        }
        Some(copy)
    }

    /// Applies `f` to `from` and every descendant.
    pub fn traverse_mut<F>(&mut self, from: NodeId, mut f: F)
    where
        F: FnMut(NodeId, &mut Node),
    {
        for id in self.descendants(from) {
            f(id, &mut self.nodes[id.0]);
        }
    }

    pub fn world_matrix(&self, id: NodeId) -> Matrix4<f32> {
        let mut matrix = Matrix4::identity();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.node(node_id) else {
                break;
            };
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    pub fn world_position(&self, id: NodeId) -> Vector3<f32> {
        let p = self.world_matrix(id) * Vector4::new(0.0, 0.0, 0.0, 1.0);
        Vector3::new(p.x, p.y, p.z)
    }

    /// World matrices for every node reachable from the root, computed in one pass.
    pub fn world_matrices(&self) -> Vec<(NodeId, Matrix4<f32>)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root, Matrix4::identity())];
        while let Some((id, parent_matrix)) = stack.pop() {
            let node = &self.nodes[id.0];
            let matrix = parent_matrix * node.transform.matrix();
            out.push((id, matrix));
            stack.extend(node.children.iter().rev().map(|c| (*c, matrix)));
        }
        out
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude2() < 1e-8, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_world_position_accumulates_parents() {
        let mut scene = SceneGraph::new();
        let parent = scene.create_node("parent");
        let child = scene.create_node("child");
        scene.add_to_root(parent);
        scene.add_child(parent, child);

        scene.transform_mut(parent).unwrap().position = Vector3::new(1.0, 2.0, 3.0);
        scene.transform_mut(child).unwrap().position = Vector3::new(0.5, 0.0, -1.0);

        assert_close(scene.world_position(child), Vector3::new(1.5, 2.0, 2.0));
    }

    #[test]
    fn test_clone_subtree_is_independent() {
        let mut scene = SceneGraph::new();
        let template = scene.create_node("folder");
        let inner = scene.create_node("cover");
        scene.add_child(template, inner);
        scene.node_mut(inner).unwrap().material.base_color = [1.0, 0.0, 0.0, 1.0];

        let copy = scene.clone_subtree(template).unwrap();
        let copy_inner = scene.node(copy).unwrap().children()[0];

        scene.transform_mut(copy).unwrap().position.x = 5.0;
        scene.node_mut(copy_inner).unwrap().material.base_color[0] = 0.0;

        assert_eq!(scene.transform(template).unwrap().position.x, 0.0);
        assert_eq!(scene.node(inner).unwrap().material.base_color[0], 1.0);
        assert_eq!(scene.node(copy).unwrap().parent(), None);
        assert_eq!(scene.node(copy_inner).unwrap().parent(), Some(copy));
    }

    #[test]
    fn test_find_by_name_and_attachment() {
        let mut scene = SceneGraph::new();
        let world = scene.create_node("world");
        let holder = scene.create_node("fileHolder");
        scene.add_child(world, holder);

        assert_eq!(scene.find_by_name(world, "fileHolder"), Some(holder));
        assert!(!scene.is_attached(holder));

        scene.add_to_root(world);
        assert!(scene.is_attached(holder));
        assert_eq!(scene.find_by_name(scene.root(), "fileHolder"), Some(holder));
    }

    #[test]
    fn test_add_child_rejects_cycles() {
        let mut scene = SceneGraph::new();
        let a = scene.create_node("a");
        let b = scene.create_node("b");
        assert!(scene.add_child(a, b));
        assert!(!scene.add_child(b, a));
        assert!(!scene.add_child(a, a));
    }

    #[test]
    fn test_rotation_order_matches_xyz() {
        let transform = Transform {
            rotation: Vector3::new(std::f32::consts::FRAC_PI_2, 0.0, 0.0),
            ..Transform::default()
        };
        // Rotating +Y by 90 degrees about X lands on +Z.
        let v = transform.matrix() * Vector4::new(0.0, 1.0, 0.0, 0.0);
        assert_close(Vector3::new(v.x, v.y, v.z), Vector3::new(0.0, 0.0, 1.0));
    }
}
