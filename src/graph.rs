//! Static point-of-interest graph used for discrete navigation.
//!
//! Nodes are created once from the immediate children of a waypoint
//! container. Adjacency is authored per child as a list of sibling names; the
//! graph resolves those names to [`NodeId`]s but never infers links on its
//! own, and it does not require links to be symmetric. A graph whose nodes
//! are not all reachable from the start is accepted; it simply blocks
//! movement at runtime.

use bevy::prelude::Resource;
use glam::{Quat, Vec3};
use hashbrown::HashMap;
use log::{debug, warn};

use crate::raycast::RayHit;
use crate::scene::{SceneContainer, SceneEntity};

/// Index of a node within its [`PointGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Returns the underlying index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A named point of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    name: String,
    entity: SceneEntity,
    position: Vec3,
    rotation: Option<Quat>,
    neighbours: Vec<NodeId>,
}

impl Node {
    /// Identity of the node within its graph.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Node name as authored in the scene.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scene object the node was built from.
    #[must_use]
    pub const fn entity(&self) -> SceneEntity {
        self.entity
    }

    /// World-space position.
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Authored orientation, if any.
    #[must_use]
    pub const fn rotation(&self) -> Option<Quat> {
        self.rotation
    }

    /// Nodes reachable in one step, in authored order.
    #[must_use]
    pub fn neighbours(&self) -> &[NodeId] {
        &self.neighbours
    }

    /// Returns `true` when `other` is listed as a neighbour of this node.
    #[must_use]
    pub fn links_to(&self, other: NodeId) -> bool {
        self.neighbours.contains(&other)
    }
}

/// Ordered collection of nodes plus derived lookups.
#[derive(Resource, Debug, Clone, Default)]
pub struct PointGraph {
    nodes: Vec<Node>,
    by_name: HashMap<String, NodeId>,
    by_entity: HashMap<SceneEntity, NodeId>,
}

impl PointGraph {
    /// Creates an empty, unbuilt graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph and builds it from `container` straight away.
    #[must_use]
    pub fn from_container(container: &SceneContainer) -> Self {
        let mut graph = Self::new();
        graph.build(container);
        graph
    }

    /// Rebuilds the graph from the immediate children of `container`.
    ///
    /// Children are taken in authored order. A child whose name repeats an
    /// earlier sibling is skipped. Neighbour names that match no sibling are
    /// dropped. Both cases are logged as warnings; neither is an error. An
    /// empty container yields an empty graph.
    pub fn build(&mut self, container: &SceneContainer) -> &[Node] {
        self.nodes.clear();
        self.by_name.clear();
        self.by_entity.clear();

        let mut owners = Vec::with_capacity(container.children.len());
        for child in &container.children {
            if self.by_name.contains_key(&child.name) {
                warn!(
                    "duplicate waypoint '{}' under '{}' ignored",
                    child.name, container.name
                );
                owners.push(None);
                continue;
            }
            let id = NodeId(self.nodes.len());
            owners.push(Some(id));
            self.by_name.insert(child.name.clone(), id);
            self.by_entity.entry(child.entity).or_insert(id);
            self.nodes.push(Node {
                id,
                name: child.name.clone(),
                entity: child.entity,
                position: child.position,
                rotation: child.rotation,
                neighbours: Vec::new(),
            });
        }

        for (child, owner) in container.children.iter().zip(owners) {
            let Some(id) = owner else {
                continue;
            };
            let mut links = Vec::with_capacity(child.neighbours.len());
            for neighbour in &child.neighbours {
                match self.by_name.get(neighbour) {
                    Some(&target) if !links.contains(&target) => links.push(target),
                    Some(_) => {}
                    None => warn!(
                        "waypoint '{}' lists unknown neighbour '{neighbour}'",
                        child.name
                    ),
                }
            }
            if let Some(node) = self.nodes.get_mut(id.0) {
                node.neighbours = links;
            }
        }

        debug!(
            "built point graph from '{}' with {} nodes",
            container.name,
            self.nodes.len()
        );
        &self.nodes
    }

    /// Builds the graph from `container` only if it has no nodes yet.
    pub fn ensure_built(&mut self, container: &SceneContainer) -> &[Node] {
        if self.nodes.is_empty() {
            self.build(container);
        }
        &self.nodes
    }

    /// All nodes in authored order; empty before the graph is built.
    #[must_use]
    pub fn all_nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns `true` when the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Looks up a node by its authored name.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        self.by_name.get(name).and_then(|&id| self.node(id))
    }

    /// Looks up the node built from `entity`.
    #[must_use]
    pub fn node_for_entity(&self, entity: SceneEntity) -> Option<&Node> {
        self.by_entity.get(&entity).and_then(|&id| self.node(id))
    }

    /// Resolves the node struck by a ray-cast hit.
    ///
    /// The struck entity is tried first, then its ancestors from the nearest
    /// parent outwards, so colliders nested under a waypoint object resolve
    /// to that waypoint.
    #[must_use]
    pub fn node_for_hit(&self, hit: &RayHit) -> Option<&Node> {
        std::iter::once(&hit.entity)
            .chain(hit.ancestors.iter())
            .find_map(|&entity| self.node_for_entity(entity))
    }

    /// Neighbours of `id`; empty when the id is unknown.
    #[must_use]
    pub fn neighbours(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::neighbours).unwrap_or_default()
    }

    /// Returns `true` when `to` is listed as a neighbour of `from`.
    #[must_use]
    pub fn is_neighbour(&self, from: NodeId, to: NodeId) -> bool {
        self.node(from).is_some_and(|node| node.links_to(to))
    }

    /// Euclidean distance between two nodes.
    #[must_use]
    pub fn distance(&self, from: NodeId, to: NodeId) -> Option<f32> {
        let start = self.node(from)?;
        let end = self.node(to)?;
        Some(start.position.distance(end.position))
    }
}
