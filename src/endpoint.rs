//! the per-endpoint descriptor table: which url fills which layer, and how its
//! features are styled and labelled.

use geojson::{Feature, JsonObject, Value};
use serde::Deserialize;

use crate::{
    geo::LatLon,
    layer::LayerId,
    popup::PopupTemplate,
    style::{
        coverage_color, coverage_percent, feature_class_color, population_color, Style, LINE_RED,
    },
};

pub const PROCESS_PATH: &str = "/process";

/// how countries are colored. the coloring changed between iterations of the
/// product, so it is a setting.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CountryScheme {
    Population,
    #[default]
    Coverage,
    FeatureClass,
}

impl std::str::FromStr for CountryScheme {
    type Err = crate::error::MapError;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s {
            "population" => Ok(Self::Population),
            "coverage" => Ok(Self::Coverage),
            "featureclass" => Ok(Self::FeatureClass),
            _ => Err(crate::error::MapError::Config(format!(
                "unknown country scheme '{}'",
                s
            ))),
        }
    }
}

/// which set of base layers the map shows
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Airports,
    Cities,
}

impl std::str::FromStr for Variant {
    type Err = crate::error::MapError;

    fn from_str(s: &str) -> crate::error::Result<Self> {
        match s {
            "airports" => Ok(Self::Airports),
            "cities" => Ok(Self::Cities),
            _ => Err(crate::error::MapError::Config(format!(
                "unknown variant '{}'",
                s
            ))),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Styler {
    /// population_color of a numeric property
    Population(&'static str),
    /// feature_class_color of a string property
    FeatureClass(&'static str),
    /// coverage_color of connected / total population
    Coverage {
        connected: &'static str,
        total: &'static str,
    },
    Fixed(Style),
}

impl Styler {
    pub fn style(&self, feature: &Feature) -> Style {
        let props = feature.properties.as_ref();
        match *self {
            Styler::Population(field) => Style::filled(population_color(number(props, field))),
            Styler::FeatureClass(field) => {
                let class = props
                    .and_then(|p| p.get(field))
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                Style::filled(feature_class_color(class))
            }
            Styler::Coverage { connected, total } => Style::filled(coverage_color(
                coverage_percent(number(props, connected), number(props, total)),
            )),
            Styler::Fixed(style) => style,
        }
    }
}

// missing or non-numeric properties count as NaN, which every classifier maps to gray
fn number(props: Option<&JsonObject>, field: &str) -> f64 {
    match props.and_then(|p| p.get(field)) {
        Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

#[derive(Clone, Debug)]
pub struct Endpoint {
    pub path: &'static str,
    pub layer: LayerId,
    pub popup: PopupTemplate,
    pub styler: Styler,
}

impl Endpoint {
    pub fn new(path: &'static str, layer: LayerId, popup: &str, styler: Styler) -> Self {
        Self {
            path,
            layer,
            popup: PopupTemplate::new(popup),
            styler,
        }
    }

    pub fn airports() -> Self {
        Self::new(
            "/geojson/airports",
            LayerId::Airports,
            "Airport: {name}, Connections: {numConnections}, Connected population: {connectedPopulation}",
            Styler::Population("connectedPopulation"),
        )
    }

    /// `{coverage}` is computed from the feature, see [`Endpoint::popup_for`]
    pub fn countries(scheme: CountryScheme) -> Self {
        let styler = match scheme {
            CountryScheme::Population => Styler::Population("pop_est"),
            CountryScheme::Coverage => Styler::Coverage {
                connected: "connectedPopulation",
                total: "pop_est",
            },
            CountryScheme::FeatureClass => Styler::FeatureClass("featurecla"),
        };
        Self::new(
            "/geojson/countries",
            LayerId::Countries,
            "Country: {brk_name}, Connected population: {connectedPopulation}, \
             Total population: {pop_est}, Coverage percentage: {coverage}%, \
             Number of airports: {numberAirports}",
            styler,
        )
    }

    pub fn cities() -> Self {
        Self::new(
            "/geojson/cities",
            LayerId::Cities,
            "{NAME}, Population: {POP_MAX}",
            Styler::Population("POP_MAX"),
        )
    }

    pub fn geography() -> Self {
        Self::new(
            "/geojson/geography",
            LayerId::Geography,
            "{name}, Class: {featurecla}",
            Styler::FeatureClass("featurecla"),
        )
    }

    /// `{distance}` is computed from the line itself, see [`Endpoint::popup_for`]
    pub fn lines() -> Self {
        Self::new(
            "/geojson/lines",
            LayerId::Lines,
            "Distance: {distance} km",
            Styler::Fixed(Style::filled(LINE_RED)),
        )
    }

    pub fn point() -> Self {
        Self::new(
            "/geojson/point",
            LayerId::Point,
            "Connections: {numConnections}, Connected population: {connectedPopulation}",
            Styler::Population("connectedPopulation"),
        )
    }

    pub fn popup_for(&self, feature: &Feature) -> String {
        let computed = match self.layer {
            LayerId::Lines => line_length_km(feature).map(|km| ("distance", format!("{:.1}", km))),
            LayerId::Countries => Some(("coverage", country_coverage(feature))),
            _ => None,
        };
        match computed {
            Some((field, value)) => {
                let mut props = feature.properties.clone().unwrap_or_default();
                props.insert(field.to_string(), value.into());
                self.popup.render(Some(&props))
            }
            None => self.popup.render(feature.properties.as_ref()),
        }
    }
}

/// rounded coverage percentage of a country, "NaN" when its population is unknown
fn country_coverage(feature: &Feature) -> String {
    let props = feature.properties.as_ref();
    let coverage = coverage_percent(
        number(props, "connectedPopulation"),
        number(props, "pop_est"),
    );
    if coverage.is_finite() {
        format!("{:.0}", coverage)
    } else {
        String::from("NaN")
    }
}

/// sum of great-circle distances along a line string
pub fn line_length_km(feature: &Feature) -> Option<f64> {
    match &feature.geometry.as_ref()?.value {
        Value::LineString(positions) => {
            let points: Vec<LatLon> = positions
                .iter()
                .filter_map(|p| LatLon::from_position(p))
                .collect();
            Some(points.windows(2).map(|w| w[0].distance_km(&w[1])).sum())
        }
        _ => None,
    }
}

/// the endpoints filled once when the map is opened
pub fn base_layers(variant: Variant, scheme: CountryScheme) -> Vec<Endpoint> {
    match variant {
        Variant::Airports => vec![Endpoint::countries(scheme), Endpoint::airports()],
        Variant::Cities => vec![Endpoint::geography(), Endpoint::cities()],
    }
}

/// the endpoints refilled after every processed interaction
pub fn result_layers() -> Vec<Endpoint> {
    vec![Endpoint::point(), Endpoint::lines()]
}
