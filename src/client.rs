use std::{future::Future, time::Duration};

use geojson::{FeatureCollection, GeoJson};
use reqwest::Client;
use tracing::debug;

use crate::{
    endpoint::PROCESS_PATH,
    error::{MapError, Result},
    geo::Coordinate,
};

/// the map server, as seen by the client
pub trait MapApi: Send + Sync {
    /// GET a geojson endpoint
    fn fetch_collection(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<FeatureCollection>> + Send;

    /// POST a coordinate to the processing endpoint. the response body is ignored.
    fn process(&self, coordinate: &Coordinate) -> impl Future<Output = Result<()>> + Send;
}

pub struct HttpApi {
    client: Client,
    base: String,
}

impl HttpApi {
    pub fn new(base: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).gzip(true).build()?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        [self.base.as_str(), path].concat()
    }
}

impl MapApi for HttpApi {
    async fn fetch_collection(&self, path: &str) -> Result<FeatureCollection> {
        let url = self.url(path);
        debug!(%url, "fetching");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(MapError::Status {
                url,
                status: response.status(),
            });
        }
        let body = response.text().await?;
        let geojson: GeoJson = body.parse()?;
        let collection = FeatureCollection::try_from(geojson)?;
        debug!(%url, features = collection.features.len(), "fetched");
        Ok(collection)
    }

    async fn process(&self, coordinate: &Coordinate) -> Result<()> {
        let url = self.url(PROCESS_PATH);
        debug!(%url, lat = %coordinate.lat, lon = %coordinate.lon, "posting click");
        let response = self.client.post(&url).json(coordinate).send().await?;
        if !response.status().is_success() {
            return Err(MapError::Status {
                url,
                status: response.status(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_without_double_slash() {
        let api = HttpApi::new("http://localhost:3000/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.url("/geojson/point"), "http://localhost:3000/geojson/point");
    }
}
