use std::{fs::File, io::BufWriter};

use geojson::{Feature, FeatureCollection, Value};
use serde_json::{to_value, Map};

use crate::{error::Result, layer::Shape};

use super::{Color, VisBuilder};

/// writes shapes as geojson with simplestyle properties, readable by most map viewers
pub struct GeoJsonBuilder {
    geojson: FeatureCollection,
}

impl GeoJsonBuilder {
    pub fn new() -> Self {
        Self {
            geojson: FeatureCollection {
                bbox: None,
                features: vec![],
                foreign_members: None,
            },
        }
    }

    pub fn collection(&self) -> &FeatureCollection {
        &self.geojson
    }
}

impl Default for GeoJsonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VisBuilder for GeoJsonBuilder {
    fn save(&mut self, filename: &str) -> Result<()> {
        let file = File::create(filename)?;
        let buf = BufWriter::new(file);

        serde_json::to_writer(buf, &self.geojson)?;
        Ok(())
    }

    fn shape(&mut self, shape: &Shape) -> Result<()> {
        let fill = Color::from_css(shape.style.fill)?;
        let stroke = Color::from_css(shape.style.stroke)?;

        let mut properties = Map::new();
        match shape.geometry.value {
            Value::Point(_) | Value::MultiPoint(_) => {
                properties.insert(String::from("marker-color"), to_value(fill.hex())?);
            }
            Value::LineString(_) | Value::MultiLineString(_) => {
                properties.insert(String::from("stroke"), to_value(stroke.hex())?);
            }
            _ => {
                properties.insert(String::from("fill"), to_value(fill.hex())?);
                properties.insert(String::from("stroke"), to_value(stroke.hex())?);
            }
        }
        properties.insert(String::from("description"), to_value(&shape.popup)?);

        let feature = Feature {
            bbox: None,
            geometry: Some(shape.geometry.clone()),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        };

        self.geojson.features.push(feature);
        Ok(())
    }
}
