use crate::error::Result;
use crate::point::{distance_squared, Point};
use crate::tree::{KdNode, KdTree, NodeId};

/// Closest indexed point found for a target.
#[derive(Clone, Copy, Debug)]
pub struct Nearest<'a> {
    pub node: &'a KdNode,
    /// Squared Euclidean distance to the target.
    pub distance_sq: f64,
}

impl Nearest<'_> {
    pub fn distance(&self) -> f64 {
        self.distance_sq.sqrt()
    }
}

struct Best<'a> {
    node: Option<&'a KdNode>,
    distance_sq: f64,
}

impl KdTree {
    /// Exact nearest indexed point to `target`, never `target` itself.
    ///
    /// A node whose point id equals `target.id` is skipped, so querying with a
    /// member of the indexed set returns its nearest *other* point. Among equally
    /// close points the first one reached by the near-first traversal wins.
    ///
    /// Fails with `InvalidDimension` before any distance is computed if the
    /// target does not match the tree's dimension.
    pub fn nearest(&self, target: &Point) -> Result<Option<Nearest<'_>>> {
        target.check_dimension(self.dimension)?;

        let mut best = Best {
            node: None,
            distance_sq: f64::INFINITY,
        };
        if let Some(root) = self.root {
            self.nearest_recursive(root, target, &mut best);
        }

        Ok(best.node.map(|node| Nearest {
            node,
            distance_sq: best.distance_sq,
        }))
    }

    fn nearest_recursive<'a>(&'a self, node_id: NodeId, target: &Point, best: &mut Best<'a>) {
        let node = self.node(node_id);

        let d2 = distance_squared(&target.vec, &node.point.vec);
        if d2 < best.distance_sq && node.point.id != target.id {
            best.distance_sq = d2;
            best.node = Some(node);
        }

        let diff = target.vec[node.axis] - node.point.vec[node.axis];
        let (near, far) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(near) = near {
            self.nearest_recursive(near, target, best);
        }

        // Every point beyond the splitting plane is at least diff^2 away.
        if diff * diff < best.distance_sq {
            if let Some(far) = far {
                self.nearest_recursive(far, target, best);
            }
        }
    }
}
