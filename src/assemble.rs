//! Gallery configuration assembly.
//!
//! [`Assembler::assemble`] turns one [`SourceInfo`] plus a [`Settings`] bag into
//! a finalized [`GalleryConfiguration`]. The stages run in a fixed order:
//!
//! ```text
//! class selectors   → pick connector + gallery implementation names
//! registry          → instantiate both
//! connector         → fill the gallery from source data + settings
//! object alterers   → adjust the gallery through its API
//! into_configuration→ unwrap to raw options + images
//! data alterers     → adjust options + images directly
//! normalize         → lower-case option keys (after each data alterer)
//! ```
//!
//! ## Extension failures
//!
//! Extensions are isolated from each other and from the caller. An extension
//! that returns `Err` or panics has its partial changes rolled back, a warning
//! is logged, and the remaining extensions still run. Only errors in the
//! gallery's own data (bad xml path, unknown implementation, malformed source)
//! reach the caller, as a [`ConfigurationError`].

use crate::gallery::option_key;
use crate::hooks::{
    ClassContext, ClassSelector, GalleryDataAlterer, GalleryObjectAlterer, HookError, Juicebox,
};
use crate::registry::ClassRegistry;
use crate::types::{Classes, GalleryConfiguration, LibraryInfo, Settings, SourceInfo};
use crate::xml_path::XmlPath;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("invalid xml path '{xml_path}': {reason}")]
    InvalidXmlPath { xml_path: String, reason: String },
    #[error("no connector named '{name}' for gallery '{xml_path}'")]
    UnknownConnector { xml_path: String, name: String },
    #[error("no gallery implementation named '{name}' for gallery '{xml_path}'")]
    UnknownGallery { xml_path: String, name: String },
    #[error("malformed source data for gallery '{xml_path}': {reason}")]
    MalformedSource { xml_path: String, reason: String },
}

/// Builds gallery configurations and runs the registered extensions.
///
/// An assembler holds no per-gallery state; one instance can serve any number
/// of independent assemblies.
#[derive(Default)]
pub struct Assembler {
    registry: ClassRegistry,
    library: LibraryInfo,
    class_selectors: Vec<Box<dyn ClassSelector>>,
    object_alterers: Vec<Box<dyn GalleryObjectAlterer>>,
    data_alterers: Vec<Box<dyn GalleryDataAlterer>>,
}

impl Assembler {
    pub fn new(registry: ClassRegistry, library: LibraryInfo) -> Self {
        Self {
            registry,
            library,
            ..Self::default()
        }
    }

    pub fn registry_mut(&mut self) -> &mut ClassRegistry {
        &mut self.registry
    }

    pub fn library(&self) -> &LibraryInfo {
        &self.library
    }

    pub fn with_class_selector(mut self, selector: impl ClassSelector + 'static) -> Self {
        self.class_selectors.push(Box::new(selector));
        self
    }

    pub fn with_object_alterer(mut self, alterer: impl GalleryObjectAlterer + 'static) -> Self {
        self.object_alterers.push(Box::new(alterer));
        self
    }

    pub fn with_data_alterer(mut self, alterer: impl GalleryDataAlterer + 'static) -> Self {
        self.data_alterers.push(Box::new(alterer));
        self
    }

    /// Resolve implementation names for a gallery, running class selectors.
    pub fn select_classes(&self, source: &SourceInfo) -> Classes {
        let mut classes = Classes::defaults_for(source.kind());
        let context = ClassContext {
            data: (!source.source.is_null()).then_some(&source.source),
            library: &self.library,
        };
        for (idx, selector) in self.class_selectors.iter().enumerate() {
            let before = classes.clone();
            let outcome = isolate(|| {
                selector.alter_classes(&mut classes, source.xml_path.args(), &context)
            });
            if let Err(err) = outcome {
                warn!(
                    xml_path = %source.xml_path,
                    selector = idx,
                    "class selector failed, keeping previous classes: {err}"
                );
                classes = before;
            }
        }
        classes
    }

    /// Assemble a finalized configuration for one gallery.
    pub fn assemble(
        &self,
        source: &SourceInfo,
        settings: &Settings,
    ) -> Result<GalleryConfiguration, ConfigurationError> {
        let xml_path = &source.xml_path;
        let classes = self.select_classes(source);
        debug!(
            %xml_path,
            connector = %classes.connector_plugin,
            gallery = %classes.gallery,
            "assembling gallery"
        );

        let connector = self.registry.connector(&classes.connector_plugin).ok_or_else(|| {
            ConfigurationError::UnknownConnector {
                xml_path: xml_path.to_string(),
                name: classes.connector_plugin.clone(),
            }
        })?;
        let mut gallery = self.registry.gallery(&classes.gallery, xml_path).ok_or_else(|| {
            ConfigurationError::UnknownGallery {
                xml_path: xml_path.to_string(),
                name: classes.gallery.clone(),
            }
        })?;

        connector.build(source, settings, gallery.as_mut())?;
        debug!(
            %xml_path,
            images = gallery.images().len(),
            "connector built gallery"
        );

        for (idx, alterer) in self.object_alterers.iter().enumerate() {
            let before = gallery.snapshot();
            let outcome = isolate(|| {
                let mut juicebox = Juicebox {
                    kind: source.kind(),
                    xml_path,
                    settings,
                    gallery: gallery.as_mut(),
                };
                alterer.alter_gallery(&mut juicebox, &source.source)
            });
            if let Err(err) = outcome {
                warn!(
                    %xml_path,
                    alterer = idx,
                    "gallery alterer failed, changes discarded: {err}"
                );
                gallery.restore(before);
            }
        }

        let mut config = normalize(gallery.into_configuration(), xml_path);

        for (idx, alterer) in self.data_alterers.iter().enumerate() {
            let before = config.clone();
            let outcome = isolate(|| alterer.alter_data(&mut config, settings, source));
            match outcome {
                Ok(()) => config = normalize(config, xml_path),
                Err(err) => {
                    warn!(
                        %xml_path,
                        alterer = idx,
                        "gallery data alterer failed, changes discarded: {err}"
                    );
                    config = before;
                }
            }
        }

        debug!(
            %xml_path,
            options = config.options.len(),
            images = config.images.len(),
            "gallery assembled"
        );
        Ok(config)
    }
}

/// Run an extension, turning a panic into an error.
///
/// The process-wide panic hook still fires before the unwind is caught, so an
/// isolated panic also shows up on stderr as a regular panic message (and a
/// backtrace when `RUST_BACKTRACE` is set) ahead of the `warn!` naming the
/// extension. The hook is left alone: it belongs to the embedding program.
fn isolate<F>(f: F) -> Result<(), HookError>
where
    F: FnOnce() -> Result<(), HookError>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(format!("panicked: {message}").into())
        }
    }
}

/// Lower-case option keys and drop blank ones.
///
/// Runs after every data alterer, so on entry every key is canonical except
/// the ones the alterer just wrote. A mixed-case key therefore overrides its
/// canonical twin: it is the newer write.
fn normalize(config: GalleryConfiguration, xml_path: &XmlPath) -> GalleryConfiguration {
    let (canonical, mixed): (Vec<_>, Vec<_>) = config
        .options
        .into_iter()
        .partition(|(key, _)| option_key(key) == *key);
    let mut options = BTreeMap::new();
    for (key, value) in canonical.into_iter().chain(mixed) {
        let canonical_key = option_key(&key);
        if canonical_key.is_empty() {
            warn!(%xml_path, "dropping option with blank name {key:?}");
            continue;
        }
        options.insert(canonical_key, value);
    }
    GalleryConfiguration {
        options,
        images: config.images,
    }
}
