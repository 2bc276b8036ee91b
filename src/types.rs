//! Shared types passed between the connector, the extension points, and the
//! downstream consumer of an assembled gallery.
//!
//! Everything here lives for exactly one assembly: it is built fresh from the
//! source data and dropped once the configuration has been handed on.

use crate::xml_path::XmlPath;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque key/value bag handed to connectors and raw-data alterers.
///
/// Keys the built-in connector understands:
/// - `jlib_<name>`: becomes gallery option `<name>`
/// - `width` / `height`: become `gallerywidth` / `galleryheight`
/// - `manual_config`: newline-separated `name="value"` option lines
pub type Settings = BTreeMap<String, String>;

/// The finalized gallery description consumed by the XML/markup producer.
///
/// Both containers are always present. `images` order is the gallery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryConfiguration {
    pub options: BTreeMap<String, String>,
    pub images: Vec<ImageEntry>,
}

/// One image: its attributes (`imageurl`, `thumburl`, `linkurl`, ...) plus
/// optional nested title and caption text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl ImageEntry {
    pub fn new(image_url: impl Into<String>) -> Self {
        let mut attributes = BTreeMap::new();
        attributes.insert("imageurl".to_string(), image_url.into());
        Self {
            attributes,
            title: None,
            caption: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Where a gallery came from: its xml path (the unique gallery id) and the
/// raw loaded source data.
///
/// Read-only for every extension point.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceInfo {
    pub xml_path: XmlPath,
    /// Loaded source data. `Value::Null` when nothing was preloaded, e.g.
    /// when rebuilding a gallery for an XML request.
    pub source: serde_json::Value,
}

impl SourceInfo {
    pub fn new(xml_path: XmlPath, source: serde_json::Value) -> Self {
        Self { xml_path, source }
    }

    /// The type tag, i.e. the first xml-path component.
    pub fn kind(&self) -> &str {
        self.xml_path.kind()
    }
}

/// Implementation names instantiated for one gallery request.
///
/// Class selectors rewrite these to substitute another connector or gallery
/// implementation registered in the [`ClassRegistry`](crate::registry::ClassRegistry).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classes {
    pub connector_plugin: String,
    pub gallery: String,
}

impl Classes {
    /// Default gallery implementation name.
    pub const DEFAULT_GALLERY: &'static str = "juicebox";

    /// Defaults for a type tag: the connector registered under the tag itself
    /// and the stock gallery object.
    pub fn defaults_for(kind: &str) -> Self {
        Self {
            connector_plugin: kind.to_string(),
            gallery: Self::DEFAULT_GALLERY.to_string(),
        }
    }
}

/// Client widget library metadata, from the `[library]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryInfo {
    pub name: String,
    /// Version string as reported by the library, e.g. `"Pro 1.4"`. Empty
    /// when unknown.
    pub version: String,
}

impl Default for LibraryInfo {
    fn default() -> Self {
        Self {
            name: "Juicebox-Lite".to_string(),
            version: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_entry_builder() {
        let image = ImageEntry::new("a.jpg")
            .with_title("Dawn")
            .with_caption("Early light")
            .with_attribute("thumburl", "a-thumb.jpg");
        assert_eq!(image.attributes["imageurl"], "a.jpg");
        assert_eq!(image.attributes["thumburl"], "a-thumb.jpg");
        assert_eq!(image.title.as_deref(), Some("Dawn"));
        assert_eq!(image.caption.as_deref(), Some("Early light"));
    }

    #[test]
    fn default_configuration_is_empty_not_absent() {
        let config = GalleryConfiguration::default();
        assert!(config.options.is_empty());
        assert!(config.images.is_empty());
    }

    #[test]
    fn configuration_serializes_both_containers() {
        let json = serde_json::to_value(GalleryConfiguration::default()).unwrap();
        assert!(json.get("options").unwrap().is_object());
        assert!(json.get("images").unwrap().is_array());
    }

    #[test]
    fn image_without_texts_omits_them() {
        let json = serde_json::to_string(&ImageEntry::new("a.jpg")).unwrap();
        assert!(!json.contains("title"));
        assert!(!json.contains("caption"));
    }

    #[test]
    fn classes_defaults_use_type_tag() {
        let classes = Classes::defaults_for("view");
        assert_eq!(classes.connector_plugin, "view");
        assert_eq!(classes.gallery, "juicebox");
    }
}
