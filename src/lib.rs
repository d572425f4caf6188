pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod fetcher;
pub mod geo;
pub mod interaction;
pub mod layer;
pub mod popup;
pub mod style;
pub mod vis;

#[cfg(test)]
mod testing;

use tokio::sync::Mutex;

use client::MapApi;
use config::Config;
use endpoint::base_layers;
use fetcher::load_all;
use interaction::Session;
use layer::ViewState;

// helper functions for opening a map

/// start a session and load the base layers of the configured variant
pub async fn open_map<A: MapApi>(api: A, config: &Config) -> Session<A> {
    let session = Session::new(api, ViewState::new(config.base), config.placing());
    let endpoints = base_layers(config.variant, config.country_scheme);
    load_all(session.api(), session.view(), &endpoints).await;
    session
}

/// a snapshot of the view, for rendering without holding the session lock
pub async fn snapshot(view: &Mutex<ViewState>) -> ViewState {
    view.lock().await.clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{geo::LatLon, layer::LayerId, testing::MockApi};
    use serde_json::json;

    #[tokio::test]
    async fn open_then_click() {
        let api = MockApi::new();
        api.serve(
            "/geojson/airports",
            json!([{
                "geometry": {"type": "Point", "coordinates": [3.32, 6.58]},
                "properties": {"name": "Lagos", "numConnections": 4, "connectedPopulation": 20000000}
            }]),
        );
        api.serve(
            "/geojson/countries",
            json!([{
                "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [5.0, 0.0], [5.0, 5.0], [0.0, 0.0]]]},
                "properties": {"name": "Nigeria", "pop_est": 200000000, "connectedPopulation": 90000000}
            }]),
        );
        let session = open_map(api, &Config::default()).await;
        {
            let view = session.view().lock().await;
            assert_eq!(
                view.shapes(LayerId::Airports)[0].popup,
                "Airport: Lagos, Connections: 4, Connected population: 20000000"
            );
            // 45% coverage
            assert_eq!(view.shapes(LayerId::Countries)[0].style.fill, "#f3903f");
            assert!(view.shapes(LayerId::Point).is_empty());
        }

        session.click(LatLon::new(6.5, 3.3)).await;
        let view = snapshot(session.view()).await;
        assert_eq!(view.shapes(LayerId::Point).len(), 1);
        assert_eq!(view.shapes(LayerId::Airports).len(), 1);
    }
}
