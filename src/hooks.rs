//! Extension points.
//!
//! Three kinds of callbacks can be registered on an
//! [`Assembler`](crate::assemble::Assembler). Each kind runs in registration
//! order, at a fixed stage:
//!
//! 1. [`ClassSelector`]: before anything is instantiated; may substitute the
//!    connector and gallery implementations.
//! 2. [`GalleryObjectAlterer`]: after the connector filled the gallery
//!    object; works through the [`Gallery`] API.
//! 3. [`GalleryDataAlterer`]: after the gallery object was unwrapped into its
//!    raw [`GalleryConfiguration`]; mutates options and images directly.
//!
//! Raw-data alterers run last, so they win on any option they touch.
//!
//! A callback that returns an error or panics is rolled back and logged;
//! assembly carries on with the state from just before it ran.

use crate::gallery::Gallery;
use crate::types::{Classes, GalleryConfiguration, LibraryInfo, Settings, SourceInfo};
use crate::xml_path::XmlPath;
use serde_json::Value;

/// Error type returned by extension callbacks.
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Context for class selection.
#[derive(Debug, Clone, Copy)]
pub struct ClassContext<'a> {
    /// Loaded source data. `None` when nothing was preloaded, typically while
    /// rebuilding a gallery for an XML request.
    pub data: Option<&'a Value>,
    pub library: &'a LibraryInfo,
}

/// What object-level alterers see.
///
/// Only `gallery` is mutable; the rest is context. Mutations therefore can
/// only ever reach the gallery object.
pub struct Juicebox<'a> {
    /// Type discriminator, e.g. `view` or `field`.
    pub kind: &'a str,
    pub xml_path: &'a XmlPath,
    pub settings: &'a Settings,
    pub gallery: &'a mut dyn Gallery,
}

/// Substitutes which connector and gallery implementations are instantiated.
pub trait ClassSelector {
    /// `xml_path_args[0]` is the type tag.
    fn alter_classes(
        &self,
        classes: &mut Classes,
        xml_path_args: &[String],
        context: &ClassContext<'_>,
    ) -> Result<(), HookError>;
}

/// Adjusts the gallery object before it is unwrapped.
pub trait GalleryObjectAlterer {
    /// `data` is the untransformed source data, for context only.
    fn alter_gallery(&self, juicebox: &mut Juicebox<'_>, data: &Value) -> Result<(), HookError>;
}

/// Adjusts the raw options and images after the object-level pass.
pub trait GalleryDataAlterer {
    fn alter_data(
        &self,
        data: &mut GalleryConfiguration,
        settings: &Settings,
        source: &SourceInfo,
    ) -> Result<(), HookError>;
}
