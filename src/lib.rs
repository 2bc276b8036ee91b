//! # Juicebox Gal
//!
//! Gallery configuration assembly and embed markup for the
//! [Juicebox](https://www.juicebox.net/) image-gallery widget.
//!
//! A gallery is identified by its xml path (`view/galleries/page_1`), built
//! from loaded source data, adjusted by registered extensions, and finally
//! handed to whatever serializes it for the widget. The page that shows the
//! gallery embeds a small script pointing the widget at the gallery's
//! configuration URL.
//!
//! ```text
//! source data ─┐
//! settings ────┼─> Assembler ─> GalleryConfiguration ─> (XML producer)
//! xml path ────┘       │
//!                      ├─ class selectors    (which connector / gallery)
//!                      ├─ object alterers    (through the Gallery API)
//!                      └─ data alterers      (raw options + images, last word)
//!
//! config url + width + height ─> embed::render ─> <script> + <div>
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`assemble`] | The assembler: stage ordering, extension isolation, [`ConfigurationError`](assemble::ConfigurationError) |
//! | [`hooks`] | Extension point traits and the context they receive |
//! | [`registry`] | Name → factory map for connector and gallery implementations |
//! | [`connector`] | Extracting options and images from source data |
//! | [`gallery`] | The gallery object wrapping an in-progress configuration |
//! | [`embed`] | The embed script/container fragment and configuration URLs |
//! | [`xml_path`] | Parsing gallery identifiers |
//! | [`config`] | `juicebox.toml` loading, merging, and validation |
//! | [`types`] | Shared data types |
//! | [`output`] | CLI output formatting |
//!
//! # Extension Ordering
//!
//! Extensions of each kind run in registration order. Object alterers always
//! run before data alterers, so a data alterer has the last word on any option
//! it sets. An extension that errors or panics is rolled back and logged; it
//! never fails the gallery.

pub mod assemble;
pub mod config;
pub mod connector;
pub mod embed;
pub mod gallery;
pub mod hooks;
pub mod output;
pub mod registry;
pub mod types;
pub mod xml_path;

pub use assemble::{Assembler, ConfigurationError};
pub use types::{GalleryConfiguration, ImageEntry, Settings, SourceInfo};
pub use xml_path::XmlPath;
