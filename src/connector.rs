//! Connectors: extract gallery options and images from loaded source data.
//!
//! A connector is picked per request by type tag (see
//! [`Classes`](crate::types::Classes)). The stock [`DataConnector`] reads the
//! source as loosely-typed JSON, which is how views, fields, and entities
//! arrive at this boundary:
//!
//! ```json
//! {
//!   "title": "Galleries",
//!   "options": { "backgroundColor": "rgba(0,0,0,.8)" },
//!   "images": [
//!     { "imageurl": "a.jpg", "thumburl": "a-t.jpg", "title": "Dawn", "caption": "..." }
//!   ]
//! }
//! ```
//!
//! Options are applied in a fixed order, each step overriding the previous:
//!
//! 1. `source.title` → `gallerytitle`
//! 2. `source.options`
//! 3. settings `jlib_*`, then `width` / `height`
//! 4. settings `manual_config` lines

use crate::assemble::ConfigurationError;
use crate::gallery::Gallery;
use crate::types::{ImageEntry, Settings, SourceInfo};
use serde_json::Value;

/// Settings prefix for gallery options.
pub const OPTION_PREFIX: &str = "jlib_";

/// Builds a gallery from source data.
pub trait Connector {
    fn build(
        &self,
        source: &SourceInfo,
        settings: &Settings,
        gallery: &mut dyn Gallery,
    ) -> Result<(), ConfigurationError>;
}

/// Stock connector for JSON-shaped source data.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataConnector;

impl Connector for DataConnector {
    fn build(
        &self,
        source: &SourceInfo,
        settings: &Settings,
        gallery: &mut dyn Gallery,
    ) -> Result<(), ConfigurationError> {
        let malformed = |reason: String| ConfigurationError::MalformedSource {
            xml_path: source.xml_path.to_string(),
            reason,
        };

        if let Some(title) = source.source.get("title").and_then(Value::as_str) {
            gallery.add_option("gallerytitle", title, true);
        }

        match source.source.get("options") {
            None | Some(Value::Null) => {}
            Some(Value::Object(options)) => {
                for (name, value) in options {
                    let value = scalar_to_string(value)
                        .map_err(|kind| malformed(format!("option '{name}' is {kind}")))?;
                    if let Some(value) = value {
                        gallery.add_option(name, &value, true);
                    }
                }
            }
            Some(other) => {
                return Err(malformed(format!(
                    "'options' must be an object, found {}",
                    json_kind(other)
                )));
            }
        }

        match source.source.get("images") {
            None | Some(Value::Null) => {}
            Some(Value::Array(images)) => {
                for (idx, raw) in images.iter().enumerate() {
                    let image =
                        image_from_value(raw).map_err(|r| malformed(format!("image {idx}: {r}")))?;
                    gallery.add_image(image);
                }
            }
            Some(other) => {
                return Err(malformed(format!(
                    "'images' must be an array, found {}",
                    json_kind(other)
                )));
            }
        }

        for (key, value) in settings {
            match key.strip_prefix(OPTION_PREFIX) {
                Some(name) if !name.is_empty() => {
                    gallery.add_option(name, value, true);
                }
                _ => {}
            }
        }
        if let Some(width) = settings.get("width") {
            gallery.add_option("gallerywidth", width, true);
        }
        if let Some(height) = settings.get("height") {
            gallery.add_option("galleryheight", height, true);
        }

        if let Some(manual) = settings.get("manual_config") {
            let options = parse_manual_config(manual).map_err(malformed)?;
            for (name, value) in options {
                gallery.add_option(&name, &value, true);
            }
        }

        Ok(())
    }
}

fn image_from_value(raw: &Value) -> Result<ImageEntry, String> {
    let Value::Object(fields) = raw else {
        return Err(format!("expected an object, found {}", json_kind(raw)));
    };
    let mut image = ImageEntry::default();
    for (name, value) in fields {
        let value = scalar_to_string(value).map_err(|kind| format!("'{name}' is {kind}"))?;
        let Some(value) = value else { continue };
        match name.as_str() {
            "title" => image.title = Some(value),
            "caption" => image.caption = Some(value),
            _ => {
                image.attributes.insert(name.to_lowercase(), value);
            }
        }
    }
    Ok(image)
}

/// Stringify a JSON scalar. `Ok(None)` for null, `Err(kind)` for arrays and
/// objects.
fn scalar_to_string(value: &Value) -> Result<Option<String>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(json_kind(other)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse free-form option lines of the form `name="value"`.
///
/// Quotes around the value are optional, whitespace around name and value is
/// trimmed, and blank lines are skipped. A line without `=` or with an empty
/// name is an error naming the 1-based line number.
pub fn parse_manual_config(text: &str) -> Result<Vec<(String, String)>, String> {
    let mut options = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((name, value)) = line.split_once('=') else {
            return Err(format!("manual_config line {}: expected name=\"value\"", idx + 1));
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("manual_config line {}: empty option name", idx + 1));
        }
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .unwrap_or(value);
        options.push((name.to_string(), value.to_string()));
    }
    Ok(options)
}
