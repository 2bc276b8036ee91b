//! Embed markup for the client-side Juicebox widget.
//!
//! The fragment is fixed: a script constructing the widget against the
//! gallery's configuration URL, followed by the container it renders into.
//!
//! ```text
//! <!--START JUICEBOX EMBED-->
//! <script>
//!   new juicebox({
//!     configUrl : '/juicebox/xml/view/galleries/page_1',
//!     containerId : 'juicebox-container',
//!     galleryWidth : '100%',
//!     galleryHeight : '100%'
//!   });
//!
//! </script>
//! <div id="juicebox-container"></div>
//! <!--END JUICEBOX EMBED-->
//! ```
//!
//! Width and height often come straight from user-editable display settings,
//! so they are HTML-escaped before interpolation, single quotes included (a
//! bare `'` would end the script string literal). The configuration URL is
//! inserted as is; [`config_url`] builds it with every xml path component
//! percent-encoded, so ids carrying quotes or markup stay inside the literal.

use crate::xml_path::{ROUTE_PREFIX, XmlPath};
use maud::{Markup, PreEscaped, html};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Characters escaped in a path component: URL delimiters plus everything
/// that could end a JS string literal or open a tag.
const COMPONENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Fixed id of the element the widget renders into.
pub const CONTAINER_ID: &str = "juicebox-container";

/// Render the embed fragment. Pure; never fails.
pub fn render(config_url: &str, width: &str, height: &str) -> Markup {
    let script = format!(
        "\n  new juicebox({{\n    configUrl : '{config_url}',\n    containerId : '{CONTAINER_ID}',\n    galleryWidth : '{width}',\n    galleryHeight : '{height}'\n  }});\n\n",
        width = escape_attr(width),
        height = escape_attr(height),
    );
    html! {
        (PreEscaped("<!--START JUICEBOX EMBED-->\n"))
        script { (PreEscaped(script)) }
        "\n"
        div id=(CONTAINER_ID) {}
        (PreEscaped("\n<!--END JUICEBOX EMBED-->\n"))
    }
}

/// Build the URL the widget fetches gallery XML from.
///
/// `base_url` may be empty (site-relative URL) or carry trailing slashes.
pub fn config_url(base_url: &str, xml_path: &XmlPath) -> String {
    let mut url = format!("{}/{}", base_url.trim_end_matches('/'), ROUTE_PREFIX);
    for arg in xml_path.args() {
        url.push('/');
        url.extend(utf8_percent_encode(arg, COMPONENT));
    }
    url
}

/// HTML-escape, covering `'` which maud's escaper leaves alone.
fn escape_attr(value: &str) -> String {
    let escaped = html! { (value) }.into_string();
    escaped.replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_contains_widget_contract() {
        let html = render("https://x/config.xml", "640", "480").into_string();
        assert!(html.contains("configUrl : 'https://x/config.xml'"));
        assert!(html.contains("containerId : 'juicebox-container'"));
        assert!(html.contains("galleryWidth : '640'"));
        assert!(html.contains("galleryHeight : '480'"));
        assert!(html.contains(r#"<div id="juicebox-container"></div>"#));
    }

    #[test]
    fn render_exact_fragment() {
        let html = render("/juicebox/xml/view/a", "100%", "100%").into_string();
        let expected = "<!--START JUICEBOX EMBED-->\n\
<script>\n  new juicebox({\n    configUrl : '/juicebox/xml/view/a',\n    containerId : 'juicebox-container',\n    galleryWidth : '100%',\n    galleryHeight : '100%'\n  });\n\n</script>\n\
<div id=\"juicebox-container\"></div>\n\
<!--END JUICEBOX EMBED-->\n";
        assert_eq!(html, expected);
    }

    #[test]
    fn script_precedes_container() {
        let html = render("u", "1", "2").into_string();
        let script = html.find("<script>").unwrap();
        let div = html.find("<div").unwrap();
        assert!(script < div);
    }

    #[test]
    fn dimensions_are_escaped() {
        let html = render("https://x/config.xml", "<b>640</b>", "480").into_string();
        assert!(!html.contains("<b>"));
        assert!(html.contains("galleryWidth : '&lt;b&gt;640&lt;/b&gt;'"));
    }

    #[test]
    fn quotes_in_dimensions_cannot_break_out_of_literal() {
        let html = render("u", "1px'});alert(1);//", "\"2\"").into_string();
        assert!(!html.contains("1px'"));
        assert!(html.contains("1px&#39;});alert(1);//"));
        assert!(html.contains("galleryHeight : '&quot;2&quot;'"));
    }

    #[test]
    fn empty_config_url_still_renders() {
        let html = render("", "100%", "100%").into_string();
        assert!(html.contains("configUrl : ''"));
    }

    #[test]
    fn render_is_deterministic() {
        assert_eq!(
            render("u", "1", "2").into_string(),
            render("u", "1", "2").into_string()
        );
    }

    #[test]
    fn config_url_joins_route() {
        let path = XmlPath::parse("view/galleries/page_1").unwrap();
        assert_eq!(config_url("", &path), "/juicebox/xml/view/galleries/page_1");
        assert_eq!(
            config_url("https://example.org/", &path),
            "https://example.org/juicebox/xml/view/galleries/page_1"
        );
        assert_eq!(
            config_url("https://example.org//", &path),
            "https://example.org/juicebox/xml/view/galleries/page_1"
        );
    }

    #[test]
    fn config_url_encodes_hostile_components() {
        let path = XmlPath::parse("view/it's</script><script>alert(1)").unwrap();
        let url = config_url("", &path);
        assert_eq!(
            url,
            "/juicebox/xml/view/it%27s%3C/script%3E%3Cscript%3Ealert(1)"
        );

        let html = render(&url, "100%", "100%").into_string();
        assert!(!html.contains("it's"));
        assert!(!html.contains("</script><script>"));
        assert_eq!(html.matches("</script>").count(), 1);
    }

    #[test]
    fn config_url_keeps_unicode_components_addressable() {
        let path = XmlPath::parse("field/node/7/photos de été").unwrap();
        assert_eq!(
            config_url("", &path),
            "/juicebox/xml/field/node/7/photos%20de%20%C3%A9t%C3%A9"
        );
    }
}
