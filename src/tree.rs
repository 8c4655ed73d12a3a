use serde::Serialize;

use crate::point::Point;

/// Position of a node in the tree's node storage.
pub type NodeId = u32;

/// A single split of the tree.
///
/// The node owns its point. Children are referenced by their slot in the
/// owning [`KdTree`]; every slot is referenced by exactly one parent (or is the root).
#[derive(Clone, Debug)]
pub struct KdNode {
    pub(crate) point: Point,
    pub(crate) axis: usize,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
}

impl KdNode {
    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Coordinate of the node's point along its split axis.
    pub fn split_value(&self) -> f64 {
        self.point.vec[self.axis]
    }
}

/// Balanced k-d tree over points of a fixed dimension.
///
/// Nodes live in one contiguous buffer, written in post-order by the builder:
/// both children of a node always sit in lower slots than the node itself, and
/// the root, when present, is the last slot. The tree is never mutated after
/// construction.
#[derive(Debug)]
pub struct KdTree {
    pub(crate) nodes: Vec<KdNode>,
    pub(crate) root: Option<NodeId>,
    pub(crate) dimension: usize,
}

impl KdTree {
    pub(crate) fn empty(dimension: usize) -> Self {
        KdTree {
            nodes: Vec::new(),
            root: None,
            dimension,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<&KdNode> {
        self.root.map(|id| self.node(id))
    }

    pub fn left(&self, node: &KdNode) -> Option<&KdNode> {
        node.left.map(|id| self.node(id))
    }

    pub fn right(&self, node: &KdNode) -> Option<&KdNode> {
        node.right.map(|id| self.node(id))
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &KdNode {
        &self.nodes[id as usize]
    }

    /// All nodes in storage order (children before parents).
    pub fn nodes(&self) -> impl Iterator<Item = &KdNode> {
        self.nodes.iter()
    }

    /// Number of nodes on the longest root-to-leaf path; 0 for an empty tree.
    pub fn height(&self) -> usize {
        // Children precede parents, so one forward pass sees every child first.
        let mut heights = vec![0usize; self.nodes.len()];
        for (i, node) in self.nodes.iter().enumerate() {
            let l = node.left.map_or(0, |id| heights[id as usize]);
            let r = node.right.map_or(0, |id| heights[id as usize]);
            heights[i] = 1 + l.max(r);
        }
        self.root.map_or(0, |id| heights[id as usize])
    }

    /// Releases every node exactly once, children before their parent, and
    /// returns how many nodes were released.
    pub fn destroy(mut self) -> usize {
        self.root = None;
        let mut released = 0;
        // Storage order is post-order, so draining from the front never
        // drops a parent ahead of its children.
        for node in self.nodes.drain(..) {
            drop(node);
            released += 1;
        }
        released
    }

    /// Nested view of the top `max_depth` levels of the tree.
    pub fn preview(&self, max_depth: usize) -> Option<NodePreview> {
        self.root.and_then(|id| self.preview_recursive(id, max_depth))
    }

    fn preview_recursive(&self, id: NodeId, depth_left: usize) -> Option<NodePreview> {
        if depth_left == 0 {
            return None;
        }
        let node = self.node(id);
        Some(NodePreview {
            id: node.point.id,
            label: node.point.label,
            axis: node.axis,
            split: node.split_value(),
            left: node
                .left
                .and_then(|c| self.preview_recursive(c, depth_left - 1))
                .map(Box::new),
            right: node
                .right
                .and_then(|c| self.preview_recursive(c, depth_left - 1))
                .map(Box::new),
        })
    }
}

/// Serializable summary of a subtree, used for visualising the splits.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodePreview {
    pub id: usize,
    pub label: i32,
    pub axis: usize,
    pub split: f64,
    pub left: Option<Box<NodePreview>>,
    pub right: Option<Box<NodePreview>>,
}
