//! Flat node storage keyed by stable ids.

use std::collections::HashMap;

use super::{NodeId, SceneNode};

pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    next_id: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        SceneGraph {
            nodes: HashMap::new(),
            next_id: 0,
        }
    }

    /// Add a node, returning its id.
    pub fn insert(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    /// Detach a node. Unknown ids return `None`, so repeating a removal is
    /// harmless.
    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        self.nodes.remove(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
