use derive_more::{Deref, Display, IntoIterator};
use geojson::Geometry;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{error::MapError, style::Style};

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerId {
    #[display(fmt = "airports")]
    Airports,
    #[display(fmt = "cities")]
    Cities,
    #[display(fmt = "countries")]
    Countries,
    #[display(fmt = "geography")]
    Geography,
    #[display(fmt = "lines")]
    Lines,
    #[display(fmt = "point")]
    Point,
}

impl LayerId {
    pub const ALL: [LayerId; 6] = [
        LayerId::Countries,
        LayerId::Geography,
        LayerId::Airports,
        LayerId::Cities,
        LayerId::Lines,
        LayerId::Point,
    ];

    /// layers that only hold the result of the last interaction
    pub fn is_transient(self) -> bool {
        matches!(self, LayerId::Lines | LayerId::Point)
    }

    /// opening a popup on these layers fetches connections from the feature
    pub fn has_connections(self) -> bool {
        matches!(self, LayerId::Airports | LayerId::Cities)
    }
}

impl std::str::FromStr for LayerId {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, MapError> {
        LayerId::ALL
            .iter()
            .copied()
            .find(|l| l.to_string() == s)
            .ok_or_else(|| MapError::Config(format!("unknown layer '{}'", s)))
    }
}

/// background tiles of the map
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BaseLayer {
    #[default]
    Street,
    Satellite,
}

/// one rendered feature
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub geometry: Geometry,
    pub popup: String,
    pub style: Style,
    /// index of the source feature in its collection
    pub feature: usize,
}

/// named, ordered collection of shapes, toggled on the map as a unit
#[derive(Clone, Debug, Deref, IntoIterator)]
pub struct LayerGroup {
    pub name: LayerId,
    pub visible: bool,
    #[deref]
    #[into_iterator(ref)]
    shapes: Vec<Shape>,
}

impl LayerGroup {
    pub fn new(name: LayerId) -> Self {
        Self {
            name,
            visible: true,
            shapes: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn extend(&mut self, shapes: impl IntoIterator<Item = Shape>) {
        self.shapes.extend(shapes);
    }

    pub fn replace(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
    }
}

/// everything drawn on the map. replaces the page globals of a browser map.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    pub base: BaseLayer,
    groups: FxHashMap<LayerId, LayerGroup>,
}

impl ViewState {
    pub fn new(base: BaseLayer) -> Self {
        Self {
            base,
            groups: FxHashMap::default(),
        }
    }

    pub fn group(&self, id: LayerId) -> Option<&LayerGroup> {
        self.groups.get(&id)
    }

    /// the group is created on first use
    pub fn group_mut(&mut self, id: LayerId) -> &mut LayerGroup {
        self.groups.entry(id).or_insert_with(|| LayerGroup::new(id))
    }

    pub fn shapes(&self, id: LayerId) -> &[Shape] {
        self.groups.get(&id).map_or(&[][..], |g| g.as_slice())
    }

    pub fn clear(&mut self, id: LayerId) {
        if let Some(g) = self.groups.get_mut(&id) {
            g.clear();
        }
    }

    pub fn clear_transient(&mut self) {
        for g in self.groups.values_mut().filter(|g| g.name.is_transient()) {
            g.clear();
        }
    }

    pub fn set_visible(&mut self, id: LayerId, visible: bool) {
        self.group_mut(id).visible = visible;
    }

    /// visible groups in drawing order: polygons below lines below points
    pub fn visible_groups(&self) -> impl Iterator<Item = &LayerGroup> {
        LayerId::ALL
            .into_iter()
            .filter_map(move |id| self.groups.get(&id))
            .filter(|g| g.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::Value;

    fn point(x: f64, y: f64) -> Shape {
        Shape {
            geometry: Geometry::new(Value::Point(vec![x, y])),
            popup: String::new(),
            style: Style::filled("red"),
            feature: 0,
        }
    }

    #[test]
    fn groups_are_created_on_demand() {
        let mut view = ViewState::default();
        assert!(view.group(LayerId::Point).is_none());
        assert!(view.shapes(LayerId::Point).is_empty());
        view.group_mut(LayerId::Point).extend(vec![point(1., 2.)]);
        assert_eq!(view.shapes(LayerId::Point).len(), 1);
    }

    #[test]
    fn clear_transient_keeps_base_layers() {
        let mut view = ViewState::default();
        for id in LayerId::ALL {
            view.group_mut(id).extend(vec![point(0., 0.), point(1., 1.)]);
        }
        view.clear_transient();
        for id in LayerId::ALL {
            assert_eq!(view.shapes(id).is_empty(), id.is_transient(), "{}", id);
        }
    }

    #[test]
    fn replace_drops_old_shapes() {
        let mut group = LayerGroup::new(LayerId::Lines);
        group.extend(vec![point(0., 0.), point(1., 1.)]);
        group.replace(vec![point(5., 5.)]);
        assert_eq!(group.len(), 1);
        assert_eq!(group[0], point(5., 5.));
    }

    #[test]
    fn hidden_groups_are_not_drawn() {
        let mut view = ViewState::default();
        view.group_mut(LayerId::Point);
        view.group_mut(LayerId::Countries);
        view.set_visible(LayerId::Countries, false);
        let drawn: Vec<LayerId> = view.visible_groups().map(|g| g.name).collect();
        assert_eq!(drawn, vec![LayerId::Point]);
    }

    #[test]
    fn layer_names_round_trip() {
        for id in LayerId::ALL {
            assert_eq!(id.to_string().parse::<LayerId>().unwrap(), id);
        }
        assert!("rivers".parse::<LayerId>().is_err());
    }
}
