use crate::catalog::{Catalog, SearchResponse};
use crate::config::IndexConfig;
use crate::error::{Error, Result};
use crate::point::Point;
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

#[wasm_bindgen(typescript_custom_section)]
const TS_SEARCH_RESPONSE: &'static str = r#"
export interface SearchResponse {
    queryId: number;
    queryLabel: number;
    matchId: number;
    matchLabel: number;
    distance: number;
}
"#;

/// WASM wrapper around a [`Catalog`].
///
/// Points are passed as one flat coordinate buffer, `dimension` values per
/// point, with ids assigned from their position.
#[wasm_bindgen]
pub struct NearestIndex {
    inner: Catalog,
}

#[wasm_bindgen]
impl NearestIndex {
    #[wasm_bindgen(constructor)]
    pub fn new(data: Vec<f64>, labels: Vec<i32>, dimension: usize) -> std::result::Result<NearestIndex, JsValue> {
        let points = points_from_flat(&data, &labels, dimension).map_err(js_error)?;
        let inner = Catalog::new(points, IndexConfig::with_dimension(dimension)).map_err(js_error)?;
        Ok(NearestIndex { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[wasm_bindgen(getter)]
    pub fn dimension(&self) -> usize {
        self.inner.config().dimension
    }

    /// Nearest other point to point `id`, or `undefined` when there is none.
    pub fn nearest(&self, id: usize) -> std::result::Result<JsValue, JsValue> {
        match optional_match(self.inner.search(id)).map_err(js_error)? {
            Some(response) => response_to_js(&response),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Replaces the indexed points; the previous index keeps serving if this fails.
    pub fn reindex(&self, data: Vec<f64>, labels: Vec<i32>) -> std::result::Result<(), JsValue> {
        let points = points_from_flat(&data, &labels, self.dimension()).map_err(js_error)?;
        self.inner.reindex(points).map_err(js_error)
    }

    /// JSON description of the top `max_depth` levels of the tree.
    pub fn tree_preview(&self, max_depth: usize) -> std::result::Result<String, JsValue> {
        serde_json::to_string(&self.inner.tree_preview(max_depth)).map_err(|e| js_error(e.into()))
    }
}

fn js_error(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Maps "no other point" to `None`; every other failure stays an error.
fn optional_match(result: Result<SearchResponse>) -> Result<Option<SearchResponse>> {
    match result {
        Ok(response) => Ok(Some(response)),
        Err(Error::NoMatch { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

fn points_from_flat(data: &[f64], labels: &[i32], dimension: usize) -> Result<Vec<Point>> {
    if dimension == 0 || data.len() % dimension != 0 {
        return Err(Error::config(format!(
            "data length {} must be a non-zero multiple of dimension {}",
            data.len(),
            dimension
        )));
    }
    let count = data.len() / dimension;
    if labels.len() != count {
        return Err(Error::config(format!("expected {} labels, found {}", count, labels.len())));
    }
    Ok(data
        .chunks_exact(dimension)
        .zip(labels)
        .enumerate()
        .map(|(id, (vec, &label))| Point::new(id, label, vec.to_vec()))
        .collect())
}

fn response_to_js(response: &SearchResponse) -> std::result::Result<JsValue, JsValue> {
    let obj = Object::new();
    Reflect::set(&obj, &"queryId".into(), &(response.query_id as f64).into())?;
    Reflect::set(&obj, &"queryLabel".into(), &response.query_label.into())?;
    Reflect::set(&obj, &"matchId".into(), &(response.match_id as f64).into())?;
    Reflect::set(&obj, &"matchLabel".into(), &response.match_label.into())?;
    Reflect::set(&obj, &"distance".into(), &response.distance.into())?;
    Ok(obj.into())
}
