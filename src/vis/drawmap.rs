use geojson::Value;
use staticmap::{
    tools::{CircleBuilder, LineBuilder},
    StaticMap, StaticMapBuilder,
};

use crate::{error::Result, geo::LatLon, layer::Shape};

use super::{Color, VisBuilder};

/// renders shapes onto map tiles and writes a png
pub struct MapBuilder {
    map: StaticMap,
}

impl MapBuilder {
    /// the map zooms to fit whatever is drawn
    pub fn new(width: u32, height: u32, url_template: &str) -> Result<Self> {
        let map = StaticMapBuilder::new()
            .width(width)
            .height(height)
            .url_template(url_template)
            .build()?;
        Ok(Self { map })
    }

    // positions without both coordinates are dropped
    fn line_with_color(&mut self, positions: &[Vec<f64>], color: Color, width: f32) -> Result<()> {
        let points: Vec<LatLon> = positions
            .iter()
            .filter_map(|p| LatLon::from_position(p))
            .collect();
        if points.len() < 2 {
            return Ok(());
        }
        let lat: Vec<f64> = points.iter().map(|p| p.lat).collect();
        let lon: Vec<f64> = points.iter().map(|p| p.lon).collect();

        let line = LineBuilder::new()
            .lat_coordinates(lat)
            .lon_coordinates(lon)
            .width(width)
            .simplify(true)
            .color(color.into())
            .build()?;

        self.map.add_tool(line);
        Ok(())
    }

    fn point_with_color_size(&mut self, position: &[f64], c: Color, size: f32) -> Result<()> {
        let Some(p) = LatLon::from_position(position) else {
            return Ok(());
        };
        let point = CircleBuilder::new()
            .lat_coordinate(p.lat)
            .lon_coordinate(p.lon)
            .radius(size)
            .color(c.into())
            .build()?;

        self.map.add_tool(point);
        Ok(())
    }

    fn geometry(&mut self, value: &Value, fill: Color, stroke: Color) -> Result<()> {
        match value {
            Value::Point(p) => self.point_with_color_size(p, fill, 4.)?,
            Value::MultiPoint(points) => {
                for p in points {
                    self.point_with_color_size(p, fill, 4.)?;
                }
            }
            Value::LineString(line) => self.line_with_color(line, stroke, 2.)?,
            Value::MultiLineString(lines) => {
                for line in lines {
                    self.line_with_color(line, stroke, 2.)?;
                }
            }
            // staticmap has no fill, polygons are drawn as outlines
            Value::Polygon(rings) => {
                for ring in rings {
                    self.line_with_color(ring, fill, 1.)?;
                }
            }
            Value::MultiPolygon(polygons) => {
                for ring in polygons.iter().flatten() {
                    self.line_with_color(ring, fill, 1.)?;
                }
            }
            Value::GeometryCollection(geometries) => {
                for g in geometries {
                    self.geometry(&g.value, fill, stroke)?;
                }
            }
            #[allow(unreachable_patterns)]
            _ => {}
        }
        Ok(())
    }
}

impl VisBuilder for MapBuilder {
    fn save(&mut self, filename: &str) -> Result<()> {
        self.map.save_png(filename)?;
        Ok(())
    }

    fn shape(&mut self, shape: &Shape) -> Result<()> {
        let fill = Color::from_css(shape.style.fill)?;
        let stroke = Color::from_css(shape.style.stroke)?;
        self.geometry(&shape.geometry.value, fill, stroke)
    }
}
