mod drawmap;
mod geojsonbuilder;

pub use drawmap::MapBuilder;
pub use geojsonbuilder::GeoJsonBuilder;

use crate::{
    error::{MapError, Result},
    layer::{Shape, ViewState},
};

pub trait VisBuilder {
    fn save(&mut self, file: &str) -> Result<()>;
    fn shape(&mut self, shape: &Shape) -> Result<()>;

    /// draws every visible layer group, bottom to top
    fn view(&mut self, view: &ViewState) -> Result<()> {
        for group in view.visible_groups() {
            for shape in group {
                self.shape(shape)?;
            }
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`, `#rgb` or one of the named colors the styles use
    pub fn from_css(css: &str) -> Result<Self> {
        let invalid = || MapError::InvalidColor(css.to_string());
        if let Some(hex) = css.strip_prefix('#') {
            let digit = |i: usize, len: usize| {
                u8::from_str_radix(hex.get(i..i + len).ok_or_else(invalid)?, 16).map_err(|_| invalid())
            };
            return match hex.len() {
                6 => Ok(Self::new(digit(0, 2)?, digit(2, 2)?, digit(4, 2)?)),
                3 => Ok(Self::new(digit(0, 1)? * 17, digit(1, 1)? * 17, digit(2, 1)? * 17)),
                _ => Err(invalid()),
            };
        }
        match css.to_ascii_lowercase().as_str() {
            "gray" | "grey" => Ok(Self::GRAY),
            "red" => Ok(Self::RED),
            "black" => Ok(Self::BLACK),
            "blue" => Ok(Self::new(0, 0, 255)),
            "white" => Ok(Self::new(255, 255, 255)),
            "green" => Ok(Self::new(0, 128, 0)),
            "orange" => Ok(Self::new(255, 165, 0)),
            "yellow" => Ok(Self::new(255, 255, 0)),
            _ => Err(invalid()),
        }
    }

    pub fn hex(&self) -> String {
        // format: {:02X} -> two digit with leading zero, hex with uppercase
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub const RED: Self = Self { r: 255, g: 0, b: 0 };
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    pub const GRAY: Self = Self {
        r: 128,
        g: 128,
        b: 128,
    };
}

impl From<Color> for staticmap::tools::Color {
    fn from(c: Color) -> Self {
        Self::new(true, c.r, c.g, c.b, 255)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{TIERS, GRAY};

    #[test]
    fn parses_hex_and_names() {
        assert_eq!(Color::from_css("#e93e3a").unwrap(), Color::new(0xe9, 0x3e, 0x3a));
        assert_eq!(Color::from_css("#fff").unwrap(), Color::new(255, 255, 255));
        assert_eq!(Color::from_css("Gray").unwrap(), Color::GRAY);
        assert_eq!(Color::from_css("#e93e3a").unwrap().hex(), "#E93E3A");
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "#", "#12345", "#zzzzzz", "chartreuse", "#ééé"] {
            assert!(Color::from_css(bad).is_err(), "{}", bad);
        }
    }

    #[test]
    fn every_style_color_is_drawable() {
        for c in TIERS.iter().chain([GRAY, crate::style::LINE_RED].iter()) {
            assert!(Color::from_css(c).is_ok(), "{}", c);
        }
        for class in ["Island group", "Continent", "Range/mtn", "Basin"] {
            assert!(Color::from_css(crate::style::feature_class_color(class)).is_ok());
        }
    }
}
