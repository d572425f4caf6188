use geojson::JsonObject;
use serde_json::Value;

/// rendered in place of a property the feature does not carry
pub const UNDEFINED: &str = "undefined";

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
}

/// popup text with `{FIELD}` placeholders filled from feature properties
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PopupTemplate {
    segments: Vec<Segment>,
}

impl PopupTemplate {
    pub fn new(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = template;
        while let Some(open) = rest.find('{') {
            match rest[open..].find('}') {
                Some(close) => {
                    if open > 0 {
                        segments.push(Segment::Text(rest[..open].to_string()));
                    }
                    let field = &rest[open + 1..open + close];
                    segments.push(Segment::Field(field.to_string()));
                    rest = &rest[open + close + 1..];
                }
                // unbalanced brace, keep as text
                None => break,
            }
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }
        Self { segments }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(f) => Some(f.as_str()),
            Segment::Text(_) => None,
        })
    }

    pub fn render(&self, properties: Option<&JsonObject>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Field(f) => {
                    out.push_str(&display_value(properties.and_then(|p| p.get(f))))
                }
            }
        }
        out
    }
}

/// formats a property the way a browser would print it into a string
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None => UNDEFINED.to_string(),
        Some(v) => display_json(v),
    }
}

fn display_json(value: &Value) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.is_finite() && f.fract() == 0. && f.abs() < 1e21 => {
                format!("{:.0}", f)
            }
            _ => n.to_string(),
        },
        // null elements print as nothing inside a list
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_json(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => String::from("[object Object]"),
    }
}
