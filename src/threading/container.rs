//! Arena storage for the reply forest
//!
//! Nodes live in a single `Vec` and refer to each other by [`NodeId`]. Index
//! zero is the synthetic root that has no message. A node's parent always has
//! a smaller index than the node itself, since parents are resolved against
//! messages that were already inserted, so the structure cannot contain a
//! cycle.

use crate::models::{Epoch, Message};

use super::release_pattern::ReleaseToken;

/// Stable handle to a node in a [`ThreadForest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node in the reply forest.
#[derive(Debug, Clone)]
pub struct Node {
    /// `<YYYY-MM>.<archive key>`, or `root` for the synthetic root
    pub name: String,

    /// Backing message (None only for the synthetic root)
    pub message: Option<Message>,

    /// Month the message arrived in
    pub epoch: Option<Epoch>,

    /// Release this message announces, if any
    pub release: Option<ReleaseToken>,

    /// Parent node (None only for the synthetic root)
    pub parent: Option<NodeId>,

    /// Direct replies in insertion order
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn subject(&self) -> &str {
        self.message
            .as_ref()
            .and_then(|message| message.subject.as_deref())
            .unwrap_or_default()
    }

    pub fn message_id(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(|message| message.message_id.as_deref())
    }

    pub fn is_release(&self) -> bool {
        self.release.is_some()
    }
}

/// Append-only forest of messages under one synthetic root.
#[derive(Debug, Clone)]
pub struct ThreadForest {
    nodes: Vec<Node>,
}

impl ThreadForest {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        ThreadForest {
            nodes: vec![Node {
                name: "root".to_string(),
                message: None,
                epoch: None,
                release: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Access a node by id.
    ///
    /// Ids are only handed out by this forest and nodes are never removed,
    /// so an id obtained from it is always valid.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Number of nodes, including the synthetic root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Insert a message below `parent` and return its id.
    pub fn attach(
        &mut self,
        parent: NodeId,
        name: String,
        message: Message,
        epoch: Epoch,
        release: Option<ReleaseToken>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name,
            message: Some(message),
            epoch: Some(epoch),
            release,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }
}

impl Default for ThreadForest {
    fn default() -> Self {
        Self::new()
    }
}
