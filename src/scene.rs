//! Authored scene data consumed when the point graph is built.
//!
//! A [`SceneContainer`] stands in for the designated parent object whose
//! immediate children are the points of interest. Each [`SceneObject`]
//! carries the transform data a node needs plus the names of the siblings it
//! may step to. The types are serde-friendly so scenes can be authored as
//! JSON and loaded by the binary or by tests.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Opaque identity of an object in the host scene.
///
/// Ray-cast hits report the struck object and its ancestors with this id, and
/// the point graph indexes its nodes by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneEntity(pub u64);

impl From<u64> for SceneEntity {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// One immediate child of the waypoint container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Object name, used as the node name.
    pub name: String,
    /// Scene identity of the object.
    pub entity: SceneEntity,
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation, when the author set one.
    #[serde(default)]
    pub rotation: Option<Quat>,
    /// Names of sibling objects reachable in one step.
    #[serde(default)]
    pub neighbours: Vec<String>,
}

impl SceneObject {
    /// Creates an object with no rotation and no neighbours.
    pub fn new(name: impl Into<String>, entity: impl Into<SceneEntity>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            entity: entity.into(),
            position,
            rotation: None,
            neighbours: Vec::new(),
        }
    }

    /// Sets the authored orientation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = Some(rotation);
        self
    }

    /// Appends neighbour names.
    #[must_use]
    pub fn with_neighbours<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.neighbours.extend(names.into_iter().map(Into::into));
        self
    }
}

/// Designated parent object whose children become graph nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneContainer {
    /// Container name, used only in diagnostics.
    #[serde(default)]
    pub name: String,
    /// Immediate children in authored order.
    #[serde(default)]
    pub children: Vec<SceneObject>,
}

impl SceneContainer {
    /// Creates a container from its name and children.
    pub fn new(name: impl Into<String>, children: Vec<SceneObject>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Returns `true` when the container has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
