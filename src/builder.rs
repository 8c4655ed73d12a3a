use std::collections::HashSet;

use tracing::{debug, warn};

use crate::config::{BuildStrategy, IndexConfig};
use crate::error::{Error, Result};
use crate::point::Point;
use crate::tree::{KdNode, KdTree, NodeId};

/// Builds a balanced k-d tree, consuming `points`.
///
/// Each level splits on `depth % dimension` and places the median at `n / 2`,
/// so the left half is never smaller than the right one and the height is
/// `ceil(log2(n + 1))`. An empty batch yields an empty tree.
///
/// Every point must have `dimension` finite coordinates. Storage for every
/// node is reserved up front; if that fails the build returns
/// `ResourceExhausted` and nothing is built.
pub fn build_tree(mut points: Vec<Point>, config: &IndexConfig) -> Result<KdTree> {
    config.validate()?;
    let dimension = config.dimension;

    for p in &points {
        p.check_dimension(dimension)?;
        // NaN breaks both the split order and the pruning bound.
        p.check_finite()?;
    }
    warn_duplicate_ids(&points);

    let count = points.len();
    if count == 0 {
        return Ok(KdTree::empty(dimension));
    }
    if count > NodeId::MAX as usize {
        return Err(Error::ResourceExhausted { requested: count });
    }

    let mut nodes = Vec::new();
    nodes
        .try_reserve_exact(count)
        .map_err(|_| Error::ResourceExhausted { requested: count })?;

    let mut builder = Builder {
        nodes,
        dimension,
        strategy: config.strategy,
    };
    let root = builder.build(&mut points, 0);
    debug!(count, dimension, strategy = ?config.strategy, "k-d tree built");

    Ok(KdTree {
        nodes: builder.nodes,
        root,
        dimension,
    })
}

struct Builder {
    nodes: Vec<KdNode>,
    dimension: usize,
    strategy: BuildStrategy,
}

impl Builder {
    fn build(&mut self, points: &mut [Point], depth: usize) -> Option<NodeId> {
        if points.is_empty() {
            return None;
        }

        let axis = depth % self.dimension;
        let mid = points.len() / 2;
        match self.strategy {
            BuildStrategy::Sort => {
                points.sort_by(|a, b| a.vec[axis].total_cmp(&b.vec[axis]));
            }
            BuildStrategy::Select => {
                points.select_nth_unstable_by(mid, |a, b| a.vec[axis].total_cmp(&b.vec[axis]));
            }
        }

        // The median is moved out; the recursive calls never touch its slot.
        let point = std::mem::take(&mut points[mid]);
        let left = self.build(&mut points[..mid], depth + 1);
        let right = self.build(&mut points[mid + 1..], depth + 1);

        // Capacity was reserved for every point, so this push never reallocates.
        let id = self.nodes.len() as NodeId;
        self.nodes.push(KdNode {
            point,
            axis,
            left,
            right,
        });
        Some(id)
    }
}

fn warn_duplicate_ids(points: &[Point]) {
    let mut seen = HashSet::with_capacity(points.len());
    let duplicates = points.iter().filter(|p| !seen.insert(p.id)).count();
    if duplicates > 0 {
        warn!(duplicates, "batch contains duplicate point ids; self-exclusion will skip all of them");
    }
}
