use std::sync::Arc;

use arc_swap::ArcSwap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::index::{build_index, query_nearest, Index};
use crate::point::Point;
use crate::tree::NodePreview;

/// Answer to "which indexed point is most similar to point `query_id`?".
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub query_id: usize,
    pub query_label: i32,
    pub match_id: usize,
    pub match_label: i32,
    pub distance: f64,
}

impl SearchResponse {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// The ingested points together with the index built from them.
#[derive(Debug)]
pub struct Snapshot {
    points: Vec<Point>,
    index: Index,
}

impl Snapshot {
    fn build(points: Vec<Point>, config: &IndexConfig) -> Result<Self> {
        let index = build_index(&points, config)?;
        Ok(Self { points, index })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    fn point(&self, id: usize) -> Option<&Point> {
        // Ingested ids are row indices; fall back to a scan for other batches.
        match self.points.get(id) {
            Some(p) if p.id == id => Some(p),
            _ => self.points.iter().find(|p| p.id == id),
        }
    }

    fn search(&self, query_id: usize) -> Result<SearchResponse> {
        if query_id >= self.points.len() {
            return Err(Error::InvalidId {
                id: query_id,
                len: self.points.len(),
            });
        }
        let target = self.point(query_id).ok_or(Error::UnknownId { id: query_id })?;
        self.respond(target)
    }

    /// Nearest other indexed point to `target`, which must be one of `self.points`.
    fn respond(&self, target: &Point) -> Result<SearchResponse> {
        let found = query_nearest(&self.index, target)?.ok_or(Error::NoMatch { id: target.id })?;
        Ok(SearchResponse {
            query_id: target.id,
            query_label: target.label,
            match_id: found.id,
            match_label: found.label,
            distance: found.distance,
        })
    }
}

/// Searchable collection of points whose index can be replaced while in use.
///
/// [`Catalog::search`] expects query ids in `0..len`, the ids assigned by
/// ingestion; [`Catalog::search_all`] covers every point whatever its id.
///
/// Readers load the current [`Snapshot`] without locking; [`Catalog::reindex`]
/// builds a complete new snapshot before publishing it, so a search always
/// sees either the old points and index or the new ones.
pub struct Catalog {
    config: IndexConfig,
    current: ArcSwap<Snapshot>,
}

impl Catalog {
    pub fn new(points: Vec<Point>, config: IndexConfig) -> Result<Self> {
        let snapshot = Snapshot::build(points, &config)?;
        Ok(Self {
            config,
            current: ArcSwap::from_pointee(snapshot),
        })
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.current.load().points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The snapshot currently being served.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    pub fn search(&self, query_id: usize) -> Result<SearchResponse> {
        let result = self.current.load().search(query_id);
        match &result {
            Ok(r) => debug!(query_id, match_id = r.match_id, distance = r.distance, "search"),
            Err(e) => debug!(query_id, error = %e, "search failed"),
        }
        result
    }

    /// Nearest other point for every indexed point, computed in parallel.
    pub fn search_all(&self) -> Vec<Result<SearchResponse>> {
        let snapshot = self.current.load_full();
        snapshot
            .points
            .par_iter()
            .map(|p| snapshot.respond(p))
            .collect()
    }

    /// Builds an index over `points` and publishes it in place of the current one.
    ///
    /// If the build fails the current snapshot stays in service.
    pub fn reindex(&self, points: Vec<Point>) -> Result<()> {
        let snapshot = Snapshot::build(points, &self.config)?;
        info!(points = snapshot.points.len(), "publishing new index");
        self.current.store(Arc::new(snapshot));
        Ok(())
    }

    /// Top `max_depth` levels of the current tree.
    pub fn tree_preview(&self, max_depth: usize) -> Option<NodePreview> {
        self.current.load().index.tree().preview(max_depth)
    }
}
