//! CLI output formatting.
//!
//! Output is information-first: each image leads with its positional index and
//! title, with its URL as an indented context line. Options are listed after
//! the images, one per line.
//!
//! ```text
//! Gallery view/galleries/page_1 (3 images)
//!     001 Dawn
//!         Source: 1.jpg
//!         Early light over the ridge
//!     002 (2.jpg)
//!     003 (3.jpg)
//!
//! Options
//!     gallerytitle = Galleries
//!     textcolor = rgba(255,255,255,1)
//! ```
//!
//! Each `format_*` function returns `Vec<String>` and is pure. The inventory
//! is a report for humans, so [`write_configuration`] targets any writer and
//! the CLI points it at stderr, keeping stdout for the JSON document.

use crate::types::GalleryConfiguration;
use crate::xml_path::XmlPath;
use std::io::{self, Write};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an image line: titled images show title, untitled show their URL in parens.
fn image_line(index: usize, title: Option<&str>, url: &str) -> String {
    match title {
        Some(t) if !t.is_empty() => format!("{} {}", format_index(index), t),
        _ => format!("{} ({})", format_index(index), url),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut)
    }
}

/// Format an assembled gallery as an image/option inventory.
pub fn format_configuration(xml_path: &XmlPath, config: &GalleryConfiguration) -> Vec<String> {
    let mut lines = Vec::new();
    let noun = if config.images.len() == 1 { "image" } else { "images" };
    lines.push(format!(
        "Gallery {} ({} {})",
        xml_path,
        config.images.len(),
        noun
    ));

    for (i, image) in config.images.iter().enumerate() {
        let url = image
            .attributes
            .get("imageurl")
            .map(String::as_str)
            .unwrap_or("?");
        lines.push(format!(
            "{}{}",
            indent(1),
            image_line(i + 1, image.title.as_deref(), url)
        ));
        if image.title.as_deref().is_some_and(|t| !t.is_empty()) {
            lines.push(format!("{}Source: {}", indent(2), url));
        }
        if let Some(caption) = &image.caption {
            let truncated = truncate_desc(caption.trim(), 60);
            if !truncated.is_empty() {
                lines.push(format!("{}{}", indent(2), truncated));
            }
        }
    }

    if !config.options.is_empty() {
        lines.push(String::new());
        lines.push("Options".to_string());
        for (name, value) in &config.options {
            lines.push(format!("{}{} = {}", indent(1), name, value));
        }
    }

    lines
}

/// Write the gallery inventory, one line at a time.
pub fn write_configuration(
    out: &mut impl Write,
    xml_path: &XmlPath,
    config: &GalleryConfiguration,
) -> io::Result<()> {
    for line in format_configuration(xml_path, config) {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageEntry;

    fn path() -> XmlPath {
        XmlPath::parse("view/galleries/page_1").unwrap()
    }

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn image_line_titled_and_untitled() {
        assert_eq!(image_line(1, Some("Dawn"), "1.jpg"), "001 Dawn");
        assert_eq!(image_line(2, None, "2.jpg"), "002 (2.jpg)");
        assert_eq!(image_line(3, Some(""), "3.jpg"), "003 (3.jpg)");
    }

    #[test]
    fn truncate_desc_is_char_safe() {
        assert_eq!(truncate_desc("short", 60), "short");
        assert_eq!(truncate_desc("ééééé", 3), "ééé...");
    }

    #[test]
    fn empty_gallery() {
        let lines = format_configuration(&path(), &GalleryConfiguration::default());
        assert_eq!(lines, vec!["Gallery view/galleries/page_1 (0 images)"]);
    }

    #[test]
    fn full_gallery() {
        let mut config = GalleryConfiguration::default();
        config.images.push(
            ImageEntry::new("1.jpg")
                .with_title("Dawn")
                .with_caption("Early light"),
        );
        config.images.push(ImageEntry::new("2.jpg"));
        config
            .options
            .insert("gallerytitle".into(), "Galleries".into());

        let lines = format_configuration(&path(), &config);
        assert_eq!(
            lines,
            vec![
                "Gallery view/galleries/page_1 (2 images)",
                "    001 Dawn",
                "        Source: 1.jpg",
                "        Early light",
                "    002 (2.jpg)",
                "",
                "Options",
                "    gallerytitle = Galleries",
            ]
        );
    }

    #[test]
    fn singular_image_count() {
        let mut config = GalleryConfiguration::default();
        config.images.push(ImageEntry::new("1.jpg"));
        let lines = format_configuration(&path(), &config);
        assert_eq!(lines[0], "Gallery view/galleries/page_1 (1 image)");
    }
}
