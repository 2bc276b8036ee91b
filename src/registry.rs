//! Factory registry for connector and gallery implementations.
//!
//! Implementations are registered under a name. [`Classes`](crate::types::Classes)
//! holds the names chosen for one request, and class selectors substitute an
//! implementation by rewriting a name rather than swapping types at runtime.

use crate::connector::{Connector, DataConnector};
use crate::gallery::{Gallery, JuiceboxGallery};
use crate::types::Classes;
use crate::xml_path::XmlPath;
use std::collections::BTreeMap;

pub type ConnectorFactory = Box<dyn Fn() -> Box<dyn Connector>>;
pub type GalleryFactory = Box<dyn Fn(&XmlPath) -> Box<dyn Gallery>>;

/// Type tags served by the stock [`DataConnector`].
pub const STOCK_CONNECTORS: [&str; 3] = ["view", "field", "entity"];

pub struct ClassRegistry {
    connectors: BTreeMap<String, ConnectorFactory>,
    galleries: BTreeMap<String, GalleryFactory>,
}

impl ClassRegistry {
    /// An empty registry, with nothing registered.
    pub fn empty() -> Self {
        Self {
            connectors: BTreeMap::new(),
            galleries: BTreeMap::new(),
        }
    }

    /// Register (or replace) a connector factory.
    pub fn register_connector<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Connector> + 'static,
    {
        self.connectors.insert(name.to_string(), Box::new(factory));
    }

    /// Register (or replace) a gallery factory.
    pub fn register_gallery<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&XmlPath) -> Box<dyn Gallery> + 'static,
    {
        self.galleries.insert(name.to_string(), Box::new(factory));
    }

    pub fn connector(&self, name: &str) -> Option<Box<dyn Connector>> {
        self.connectors.get(name).map(|factory| factory())
    }

    pub fn gallery(&self, name: &str, xml_path: &XmlPath) -> Option<Box<dyn Gallery>> {
        self.galleries.get(name).map(|factory| factory(xml_path))
    }

    pub fn connector_names(&self) -> impl Iterator<Item = &str> {
        self.connectors.keys().map(String::as_str)
    }

    pub fn gallery_names(&self) -> impl Iterator<Item = &str> {
        self.galleries.keys().map(String::as_str)
    }
}

impl Default for ClassRegistry {
    /// Stock registry: [`DataConnector`] for each of [`STOCK_CONNECTORS`] and
    /// [`JuiceboxGallery`] as the default gallery.
    fn default() -> Self {
        let mut registry = Self::empty();
        for name in STOCK_CONNECTORS {
            registry.register_connector(name, || Box::new(DataConnector));
        }
        registry.register_gallery(Classes::DEFAULT_GALLERY, |xml_path| {
            Box::new(JuiceboxGallery::new(xml_path.to_string()))
        });
        registry
    }
}
