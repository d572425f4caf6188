use futures::future::join_all;
use geojson::FeatureCollection;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::{
    client::MapApi,
    endpoint::Endpoint,
    error::Result,
    layer::{Shape, ViewState},
};

/// one styled shape per feature. features without geometry cannot be drawn and are skipped.
pub fn build_shapes(endpoint: &Endpoint, collection: FeatureCollection) -> Vec<Shape> {
    let total = collection.features.len();
    let shapes: Vec<Shape> = collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(index, feature)| {
            let popup = endpoint.popup_for(&feature);
            let style = endpoint.styler.style(&feature);
            feature.geometry.map(|geometry| Shape {
                geometry,
                popup,
                style,
                feature: index,
            })
        })
        .collect();
    if shapes.len() < total {
        debug!(
            path = endpoint.path,
            skipped = total - shapes.len(),
            "features without geometry"
        );
    }
    shapes
}

pub async fn fetch_shapes<A: MapApi>(api: &A, endpoint: &Endpoint) -> Result<Vec<Shape>> {
    let collection = api.fetch_collection(endpoint.path).await?;
    Ok(build_shapes(endpoint, collection))
}

/// fetch an endpoint and replace the contents of its layer group.
/// on failure the group is left as it was.
pub async fn load_layer<A: MapApi>(
    api: &A,
    view: &Mutex<ViewState>,
    endpoint: &Endpoint,
) -> Result<usize> {
    let shapes = fetch_shapes(api, endpoint).await?;
    let count = shapes.len();
    view.lock().await.group_mut(endpoint.layer).replace(shapes);
    debug!(layer = %endpoint.layer, count, "layer loaded");
    Ok(count)
}

/// load several layers concurrently. a failing endpoint only leaves its own layer empty.
pub async fn load_all<A: MapApi>(api: &A, view: &Mutex<ViewState>, endpoints: &[Endpoint]) {
    let results = join_all(endpoints.iter().map(|e| load_layer(api, view, e))).await;
    for (endpoint, result) in endpoints.iter().zip(results) {
        if let Err(e) = result {
            warn!(path = endpoint.path, error = %e, "could not load layer");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        endpoint::{CountryScheme, Endpoint},
        layer::LayerId,
        testing::MockApi,
    };
    use serde_json::json;

    #[tokio::test]
    async fn load_fills_the_target_layer() {
        let api = MockApi::new();
        api.serve(
            "/geojson/cities",
            json!([
                {"geometry": {"type": "Point", "coordinates": [3.4, 6.5]},
                 "properties": {"NAME": "Lagos", "POP_MAX": 15000000}},
                {"geometry": {"type": "Point", "coordinates": [13.4, 52.5]},
                 "properties": {"NAME": "Berlin"}}
            ]),
        );
        let view = Mutex::new(ViewState::default());

        let count = load_layer(&api, &view, &Endpoint::cities()).await.unwrap();
        assert_eq!(count, 2);

        let view = view.lock().await;
        let shapes = view.shapes(LayerId::Cities);
        assert_eq!(shapes[0].popup, "Lagos, Population: 15000000");
        assert_eq!(shapes[1].popup, "Berlin, Population: undefined");
        assert_eq!(shapes[1].style.fill, "gray");
        assert!(view.shapes(LayerId::Point).is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_leaves_layer_unpopulated() {
        let api = MockApi::new();
        api.serve(
            "/geojson/airports",
            json!([{"geometry": {"type": "Point", "coordinates": [0.0, 0.0]}, "properties": {}}]),
        );
        let view = Mutex::new(ViewState::default());
        let endpoints = [Endpoint::countries(CountryScheme::Coverage), Endpoint::airports()];

        load_all(&api, &view, &endpoints).await;

        let view = view.lock().await;
        assert!(view.shapes(LayerId::Countries).is_empty());
        assert_eq!(view.shapes(LayerId::Airports).len(), 1);
    }

    #[tokio::test]
    async fn features_without_geometry_are_skipped() {
        let api = MockApi::new();
        api.serve(
            "/geojson/point",
            json!([
                {"geometry": null, "properties": {}},
                {"geometry": {"type": "Point", "coordinates": [1.0, 2.0]}, "properties": {}}
            ]),
        );
        let shapes = fetch_shapes(&api, &Endpoint::point()).await.unwrap();
        assert_eq!(shapes.len(), 1);
        assert_eq!(shapes[0].feature, 1);
    }
}
