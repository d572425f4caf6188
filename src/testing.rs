//! in-memory map server for tests

use std::sync::Mutex;

use geojson::{FeatureCollection, GeoJson};
use rustc_hash::FxHashMap;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::{
    client::MapApi,
    error::{MapError, Result},
    geo::Coordinate,
};

/// serves fixed collections. every processed click replaces the point and line
/// collections with a point at the click and a line from it to (0, 0), like the
/// real server does with its connection search.
#[derive(Default)]
pub struct MockApi {
    collections: Mutex<FxHashMap<String, FeatureCollection>>,
    posts: Mutex<Vec<Coordinate>>,
    held: Mutex<FxHashMap<String, oneshot::Receiver<()>>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// `features` is a json array of features, `type` may be omitted
    pub fn serve(&self, path: &str, features: Value) {
        let features: Vec<Value> = features
            .as_array()
            .unwrap()
            .iter()
            .map(|f| {
                let mut f = f.clone();
                f["type"] = json!("Feature");
                f
            })
            .collect();
        let geojson: GeoJson = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": features,
        }))
        .unwrap();
        let collection = FeatureCollection::try_from(geojson).unwrap();
        self.collections
            .lock()
            .unwrap()
            .insert(path.to_string(), collection);
    }

    /// a POST for `lat` blocks until the returned sender fires or is dropped
    pub fn hold(&self, lat: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.held.lock().unwrap().insert(lat.to_string(), rx);
        tx
    }

    pub fn posts(&self) -> Vec<Coordinate> {
        self.posts.lock().unwrap().clone()
    }
}

impl MapApi for MockApi {
    async fn fetch_collection(&self, path: &str) -> Result<FeatureCollection> {
        self.collections
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| MapError::Status {
                url: path.to_string(),
                status: reqwest::StatusCode::NOT_FOUND,
            })
    }

    async fn process(&self, coordinate: &Coordinate) -> Result<()> {
        self.posts.lock().unwrap().push(coordinate.clone());
        let gate = self.held.lock().unwrap().remove(&coordinate.lat);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let lat: f64 = coordinate.lat.parse().unwrap();
        let lon: f64 = coordinate.lon.parse().unwrap();
        self.serve(
            "/geojson/point",
            json!([{
                "geometry": {"type": "Point", "coordinates": [lon, lat]},
                "properties": {"numConnections": 1, "connectedPopulation": 1000}
            }]),
        );
        self.serve(
            "/geojson/lines",
            json!([{
                "geometry": {"type": "LineString", "coordinates": [[lon, lat], [0.0, 0.0]]},
                "properties": {}
            }]),
        );
        Ok(())
    }
}
