use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::builder::build_tree;
use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::point::Point;
use crate::tree::KdTree;

/// Result of a nearest-neighbour query.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Match {
    pub id: usize,
    pub label: i32,
    /// Euclidean distance to the query point.
    pub distance: f64,
}

/// An immutable nearest-neighbour index.
///
/// Queries take `&self` and never write to the tree, so one index can be
/// shared across threads and searched concurrently without locking.
#[derive(Debug)]
pub struct Index {
    tree: KdTree,
}

impl Index {
    pub fn tree(&self) -> &KdTree {
        &self.tree
    }

    pub fn dimension(&self) -> usize {
        self.tree.dimension()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn query(&self, target: &Point) -> Result<Option<Match>> {
        query_nearest(self, target)
    }

    /// Runs [`query_nearest`] for every target in parallel; results keep the input order.
    pub fn query_batch(&self, targets: &[Point]) -> Vec<Result<Option<Match>>> {
        targets.par_iter().map(|t| query_nearest(self, t)).collect()
    }
}

/// Builds an index from a private copy of `points`; the caller's batch is left untouched.
pub fn build_index(points: &[Point], config: &IndexConfig) -> Result<Index> {
    let mut snapshot = Vec::new();
    snapshot
        .try_reserve_exact(points.len())
        .map_err(|_| Error::ResourceExhausted { requested: points.len() })?;
    snapshot.extend(points.iter().cloned());

    let tree = build_tree(snapshot, config)?;
    info!(
        points = tree.len(),
        dimension = tree.dimension(),
        height = tree.height(),
        "index built"
    );
    Ok(Index { tree })
}

/// Nearest indexed point other than `target`, or `None` if there is none.
pub fn query_nearest(index: &Index, target: &Point) -> Result<Option<Match>> {
    let found = index.tree.nearest(target)?;
    Ok(found.map(|n| Match {
        id: n.node.point().id,
        label: n.node.point().label,
        distance: n.distance(),
    }))
}

/// Releases the index, returning the number of tree nodes freed.
pub fn destroy_index(index: Index) -> usize {
    index.tree.destroy()
}
