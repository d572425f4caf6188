use std::{fs::File, io::BufReader, time::Duration};

use serde::Deserialize;

use crate::{
    endpoint::{CountryScheme, Variant},
    error::Result,
    interaction::Placing,
    layer::BaseLayer,
};

/// settings of a map session. every field has a default, a config file only
/// needs the ones it changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// map server base url
    pub server: String,
    pub variant: Variant,
    pub country_scheme: CountryScheme,
    /// require the placing button before clicks are processed
    pub gated: bool,
    pub timeout_secs: u64,
    pub base: BaseLayer,
    pub width: u32,
    pub height: u32,
    /// tile url templates for the static image, `{z}`, `{x}` and `{y}` are filled in
    pub street_tiles: String,
    pub satellite_tiles: String,
}

pub const STREET_TILES: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const SATELLITE_TILES: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";

impl Default for Config {
    fn default() -> Self {
        Self {
            server: String::from("http://localhost:3000"),
            variant: Variant::default(),
            country_scheme: CountryScheme::default(),
            gated: false,
            timeout_secs: 30,
            base: BaseLayer::default(),
            width: 1600,
            height: 1000,
            street_tiles: String::from(STREET_TILES),
            satellite_tiles: String::from(SATELLITE_TILES),
        }
    }
}

impl Config {
    pub fn from_file(filename: &str) -> Result<Self> {
        let file = File::open(filename)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn tiles(&self, base: BaseLayer) -> &str {
        match base {
            BaseLayer::Street => &self.street_tiles,
            BaseLayer::Satellite => &self.satellite_tiles,
        }
    }

    /// gated sessions start with placing off
    pub fn placing(&self) -> Placing {
        if self.gated {
            Placing::Gated { active: false }
        } else {
            Placing::Ungated
        }
    }
}
