//! Parsing for gallery xml paths.
//!
//! Every gallery is identified by the path its XML is served from. The path
//! components carry everything needed to rebuild the gallery, and the first
//! component is the type tag that picks the connector:
//!
//! - `view/galleries/page_1/12` → kind `view`
//! - `juicebox/xml/field/node/7/field_images/full` → kind `field`
//!   (the route prefix is stripped)
//! - `/entity/media/3/` → kind `entity` (outer slashes ignored)

use crate::assemble::ConfigurationError;
use std::fmt;

/// Route prefix the XML is served under.
pub const ROUTE_PREFIX: &str = "juicebox/xml";

/// Ordered xml-path components. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XmlPath {
    args: Vec<String>,
}

impl XmlPath {
    /// Parse a path, stripping outer slashes and the optional route prefix.
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let trimmed = raw.trim().trim_matches('/');
        let trimmed = match trimmed.strip_prefix(ROUTE_PREFIX) {
            Some("") => "",
            Some(rest) if rest.starts_with('/') => &rest[1..],
            // e.g. "juicebox/xmlfoo": not the prefix
            _ => trimmed,
        };
        if trimmed.is_empty() {
            return Err(ConfigurationError::InvalidXmlPath {
                xml_path: raw.to_string(),
                reason: "path has no components".into(),
            });
        }
        let args: Vec<String> = trimmed.split('/').map(str::to_string).collect();
        if let Some(pos) = args.iter().position(|a| a.is_empty()) {
            return Err(ConfigurationError::InvalidXmlPath {
                xml_path: raw.to_string(),
                reason: format!("component {} is empty", pos + 1),
            });
        }
        Ok(Self { args })
    }

    /// The type tag (first component).
    pub fn kind(&self) -> &str {
        &self.args[0]
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Full route the XML is served from, without a leading slash.
    pub fn route(&self) -> String {
        format!("{}/{}", ROUTE_PREFIX, self)
    }
}

impl fmt::Display for XmlPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.args.join("/"))
    }
}

impl std::str::FromStr for XmlPath {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
