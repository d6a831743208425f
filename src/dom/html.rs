//! Construct a [`Document`] from an HTML string.
//!
//! Fixture pages and captured markup carry their layout hints as inline
//! `style` attributes; this loader maps the declarations the filter cares
//! about (`position`, `z-index`, `overflow`, `width`, `height`) onto the
//! document model. Lengths resolve `px`, `vw`, `vh`, and `%` against the
//! viewport. Everything else in a style attribute is ignored.

use scraper::{ElementRef, Html};

use super::element::{Element, ElementData};
use super::style::{Overflow, Position, Rect, Viewport};
use super::{Document, ReadyState};

impl Document {
    /// Parse an HTML document. The result is in `Interactive` state, as if
    /// structural parsing just completed.
    pub fn from_html(html: &str, viewport: Viewport) -> Document {
        let parsed = Html::parse_document(html);
        let mut doc = Document::new(viewport);
        let root_el = parsed.root_element();

        let mut root_data = ElementData::new("html");
        apply_attributes(&mut root_data, root_el.value(), viewport);
        doc.with_data(doc.root(), |d| *d = root_data);

        for child in root_el.children() {
            let Some(child_el) = ElementRef::wrap(child) else {
                continue;
            };
            match child_el.value().name() {
                // Head content is non-visual; the filter never looks at it.
                "head" => {}
                "body" => {
                    let mut body_data = ElementData::new("body");
                    apply_attributes(&mut body_data, child_el.value(), viewport);
                    let body = doc.body();
                    doc.with_data(body, |d| *d = body_data);
                    let mut body_text = String::new();
                    for node in child_el.children() {
                        if let Some(el) = ElementRef::wrap(node) {
                            let _ = doc.append(body, convert(el, viewport));
                        } else if let Some(text) = node.value().as_text() {
                            push_text(&mut body_text, text.trim());
                        }
                    }
                    doc.with_data(body, |d| d.text = body_text);
                }
                _ => {
                    let root = doc.root();
                    let _ = doc.append(root, convert(child_el, viewport));
                }
            }
        }

        debug_assert_eq!(doc.ready_state(), ReadyState::Loading);
        doc.finish_parsing();
        doc
    }
}

fn convert(el: ElementRef, viewport: Viewport) -> Element {
    let mut element = Element::new(el.value().name());
    apply_attributes(element.data_mut(), el.value(), viewport);

    let mut own_text = String::new();
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            element.push_child(convert(child_el, viewport));
        } else if let Some(text) = child.value().as_text() {
            push_text(&mut own_text, text.trim());
        }
    }
    element.data_mut().text = own_text;
    element
}

fn apply_attributes(data: &mut ElementData, el: &scraper::node::Element, viewport: Viewport) {
    if let Some(id) = el.attr("id") {
        data.id = id.to_string();
    }
    if let Some(classes) = el.attr("class") {
        data.classes = classes.split_whitespace().map(|c| c.to_string()).collect();
    }
    if let Some(role) = el.attr("role") {
        data.role = role.to_string();
    }
    if let Some(label) = el.attr("aria-label") {
        data.aria_label = label.to_string();
    }
    data.aria_modal = el.attr("aria-modal") == Some("true");
    if let Some(style) = el.attr("style") {
        apply_inline_style(data, style, viewport);
    }
}

fn apply_inline_style(data: &mut ElementData, style: &str, viewport: Viewport) {
    for declaration in style.split(';') {
        let Some((property, value)) = declaration.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match property.trim().to_ascii_lowercase().as_str() {
            "position" => {
                if let Some(position) = Position::from_css(value) {
                    data.style.position = position;
                }
            }
            "z-index" => data.style.z_index = value.to_string(),
            "overflow" => {
                if let Some(overflow) = Overflow::from_css(value) {
                    data.style.overflow = overflow;
                }
            }
            "overflow-x" => data.style.overflow_x = Overflow::from_css(value),
            "overflow-y" => data.style.overflow_y = Overflow::from_css(value),
            "width" => {
                if let Some(width) = parse_length(value, viewport, true) {
                    data.rect = Rect::new(width, data.rect.height);
                }
            }
            "height" => {
                if let Some(height) = parse_length(value, viewport, false) {
                    data.rect = Rect::new(data.rect.width, height);
                }
            }
            _ => {}
        }
    }
}

/// Resolve a CSS length against the viewport. `horizontal` picks the axis
/// that percentages resolve against.
fn parse_length(value: &str, viewport: Viewport, horizontal: bool) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    if let Some(px) = value.strip_suffix("px") {
        px.trim().parse().ok()
    } else if let Some(vw) = value.strip_suffix("vw") {
        Some(vw.trim().parse::<f64>().ok()? / 100.0 * viewport.width)
    } else if let Some(vh) = value.strip_suffix("vh") {
        Some(vh.trim().parse::<f64>().ok()? / 100.0 * viewport.height)
    } else if let Some(pct) = value.strip_suffix('%') {
        let base = if horizontal { viewport.width } else { viewport.height };
        Some(pct.trim().parse::<f64>().ok()? / 100.0 * base)
    } else {
        value.parse().ok()
    }
}

fn push_text(buffer: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !buffer.is_empty() {
        buffer.push(' ');
    }
    buffer.push_str(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
        <html style="overflow: hidden">
          <head><title>Fixture</title><style>.x{}</style></head>
          <body class="modal-open">
            <article id="story">Actual content</article>
            <div id="wall" class="paywall-overlay"
                 style="position: fixed; z-index: 999; width: 100vw; height: 100vh">
              Subscribe now
            </div>
          </body>
        </html>
    "#;

    #[test]
    fn test_fixture_round_trip() {
        let viewport = Viewport::new(1000.0, 600.0);
        let doc = Document::from_html(FIXTURE, viewport);

        assert_eq!(doc.ready_state(), ReadyState::Interactive);
        assert_eq!(doc.get(doc.root()).unwrap().resolved_overflow(), Overflow::Hidden);
        assert_eq!(doc.get(doc.body()).unwrap().classes, vec!["modal-open"]);

        let children = doc.children(doc.body());
        assert_eq!(children.len(), 2);

        let wall = doc.get(children[1]).unwrap();
        assert_eq!(wall.id, "wall");
        assert_eq!(wall.resolved_position(), Position::Fixed);
        assert_eq!(wall.z_index(), Some(999));
        assert_eq!(wall.rect, Rect::new(1000.0, 600.0));
        assert_eq!(doc.visible_text(children[1]), "Subscribe now");
    }

    #[test]
    fn test_head_is_skipped() {
        let doc = Document::from_html(FIXTURE, Viewport::default());
        let root_children = doc.children(doc.root());
        // Only body remains under html.
        assert_eq!(root_children, vec![doc.body()]);
    }

    #[test]
    fn test_length_units() {
        let viewport = Viewport::new(800.0, 400.0);
        assert_eq!(parse_length("120px", viewport, true), Some(120.0));
        assert_eq!(parse_length("50vw", viewport, true), Some(400.0));
        assert_eq!(parse_length("25vh", viewport, false), Some(100.0));
        assert_eq!(parse_length("50%", viewport, false), Some(200.0));
        assert_eq!(parse_length("300", viewport, true), Some(300.0));
        assert_eq!(parse_length("calc(100% - 2em)", viewport, true), None);
    }

    #[test]
    fn test_garbage_styles_are_ignored() {
        let doc = Document::from_html(
            r#"<body><div id="d" style="position: unknowable; z-index: banana; flex: 1"></div></body>"#,
            Viewport::default(),
        );
        let div = doc.children(doc.body())[0];
        let data = doc.get(div).unwrap();
        assert_eq!(data.resolved_position(), Position::Static);
        assert_eq!(data.z_index(), None); // stored raw, parses to nothing
    }
}
