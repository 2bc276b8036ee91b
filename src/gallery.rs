//! The gallery object: a typed wrapper around one in-progress
//! [`GalleryConfiguration`].
//!
//! Connectors fill a gallery, object-level alterers adjust it, and the
//! assembler finally unwraps it into the raw configuration with
//! [`Gallery::into_configuration`]. A gallery never outlives its assembly.
//!
//! Option names are case-insensitive: they are stored lower-cased, so
//! `galleryTitle` and `gallerytitle` address the same option.

use crate::types::{GalleryConfiguration, ImageEntry};

/// Gallery object interface. Alternate implementations can be registered in
/// the [`ClassRegistry`](crate::registry::ClassRegistry) and selected per
/// request by a class selector.
pub trait Gallery {
    /// Gallery identifier (the xml path it was created for).
    fn id(&self) -> &str;

    /// Add an option. Returns `false` when the option already exists and
    /// `overwrite` is not set, leaving the existing value in place.
    fn add_option(&mut self, name: &str, value: &str, overwrite: bool) -> bool;

    /// Remove an option, returning its previous value.
    fn remove_option(&mut self, name: &str) -> Option<String>;

    fn option(&self, name: &str) -> Option<&str>;

    fn add_image(&mut self, image: ImageEntry);

    /// Remove the image at `index`, shifting later images down.
    fn remove_image(&mut self, index: usize) -> Option<ImageEntry>;

    fn images(&self) -> &[ImageEntry];

    /// Copy of the current state, used to roll back a failed alteration.
    fn snapshot(&self) -> GalleryConfiguration;

    /// Replace the current state wholesale.
    fn restore(&mut self, config: GalleryConfiguration);

    /// Unwrap into the raw configuration.
    fn into_configuration(self: Box<Self>) -> GalleryConfiguration;
}

/// Stock gallery object.
#[derive(Debug, Clone, Default)]
pub struct JuiceboxGallery {
    id: String,
    config: GalleryConfiguration,
}

impl JuiceboxGallery {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            config: GalleryConfiguration::default(),
        }
    }
}

/// Canonical option name.
pub fn option_key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Gallery for JuiceboxGallery {
    fn id(&self) -> &str {
        &self.id
    }

    fn add_option(&mut self, name: &str, value: &str, overwrite: bool) -> bool {
        let key = option_key(name);
        if !overwrite && self.config.options.contains_key(&key) {
            return false;
        }
        self.config.options.insert(key, value.to_string());
        true
    }

    fn remove_option(&mut self, name: &str) -> Option<String> {
        self.config.options.remove(&option_key(name))
    }

    fn option(&self, name: &str) -> Option<&str> {
        self.config.options.get(&option_key(name)).map(String::as_str)
    }

    fn add_image(&mut self, image: ImageEntry) {
        self.config.images.push(image);
    }

    fn remove_image(&mut self, index: usize) -> Option<ImageEntry> {
        (index < self.config.images.len()).then(|| self.config.images.remove(index))
    }

    fn images(&self) -> &[ImageEntry] {
        &self.config.images
    }

    fn snapshot(&self) -> GalleryConfiguration {
        self.config.clone()
    }

    fn restore(&mut self, config: GalleryConfiguration) {
        self.config = config;
    }

    fn into_configuration(self: Box<Self>) -> GalleryConfiguration {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_names_are_lowercased() {
        let mut g = JuiceboxGallery::new("view/a");
        g.add_option("galleryDescription", "X", true);
        assert_eq!(g.option("gallerydescription"), Some("X"));
        assert_eq!(g.option("GALLERYDESCRIPTION"), Some("X"));
        assert_eq!(g.snapshot().options.keys().collect::<Vec<_>>(), ["gallerydescription"]);
    }

    #[test]
    fn add_option_without_overwrite_keeps_existing() {
        let mut g = JuiceboxGallery::new("view/a");
        assert!(g.add_option("textcolor", "red", true));
        assert!(!g.add_option("TextColor", "blue", false));
        assert_eq!(g.option("textcolor"), Some("red"));
        assert!(g.add_option("textcolor", "blue", true));
        assert_eq!(g.option("textcolor"), Some("blue"));
    }

    #[test]
    fn remove_option_returns_value() {
        let mut g = JuiceboxGallery::new("view/a");
        g.add_option("a", "1", true);
        assert_eq!(g.remove_option("A").as_deref(), Some("1"));
        assert_eq!(g.remove_option("a"), None);
    }

    #[test]
    fn images_keep_insertion_order() {
        let mut g = JuiceboxGallery::new("view/a");
        g.add_image(ImageEntry::new("1.jpg"));
        g.add_image(ImageEntry::new("2.jpg"));
        g.add_image(ImageEntry::new("3.jpg"));
        assert_eq!(g.remove_image(1).unwrap().attributes["imageurl"], "2.jpg");
        let urls: Vec<&str> = g
            .images()
            .iter()
            .map(|i| i.attributes["imageurl"].as_str())
            .collect();
        assert_eq!(urls, ["1.jpg", "3.jpg"]);
    }

    #[test]
    fn remove_image_out_of_range() {
        let mut g = JuiceboxGallery::new("view/a");
        assert!(g.remove_image(0).is_none());
    }

    #[test]
    fn restore_replaces_state() {
        let mut g = JuiceboxGallery::new("view/a");
        g.add_option("a", "1", true);
        let snap = g.snapshot();
        g.add_option("b", "2", true);
        g.add_image(ImageEntry::new("x.jpg"));
        g.restore(snap.clone());
        assert_eq!(g.snapshot(), snap);
    }

    #[test]
    fn into_configuration_unwraps() {
        let mut g = JuiceboxGallery::new("view/a");
        g.add_option("a", "1", true);
        g.add_image(ImageEntry::new("x.jpg"));
        let boxed: Box<dyn Gallery> = Box::new(g);
        assert_eq!(boxed.id(), "view/a");
        let config = boxed.into_configuration();
        assert_eq!(config.options["a"], "1");
        assert_eq!(config.images.len(), 1);
    }
}
