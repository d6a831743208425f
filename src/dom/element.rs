//! Per-element data and the subtree builder used to grow a document.

use super::style::{ComputedStyle, Overflow, Position, Rect};

/// Everything the filter can observe about a single element.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercase tag name.
    pub tag: String,
    pub id: String,
    pub classes: Vec<String>,
    pub aria_label: String,
    pub role: String,
    pub aria_modal: bool,
    /// Text directly inside this element (not descendants).
    pub text: String,
    pub style: ComputedStyle,
    pub rect: Rect,
    /// Inline override applied with `!important` precedence by the
    /// remediation engine; wins over `style` when resolving overflow.
    pub(crate) overflow_override: Option<Overflow>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        ElementData {
            tag: tag.to_ascii_lowercase(),
            id: String::new(),
            classes: Vec::new(),
            aria_label: String::new(),
            role: String::new(),
            aria_modal: false,
            text: String::new(),
            style: ComputedStyle::default(),
            rect: Rect::default(),
            overflow_override: None,
        }
    }

    /// Class list and id concatenated, the string attribute patterns match
    /// against. Missing pieces contribute empty strings.
    pub fn attr_string(&self) -> String {
        format!("{} {}", self.classes.join(" "), self.id)
    }

    /// Native dialog element, ARIA dialog role, or explicit aria-modal.
    pub fn is_dialog_like(&self) -> bool {
        self.tag == "dialog" || self.role.eq_ignore_ascii_case("dialog") || self.aria_modal
    }

    pub fn resolved_position(&self) -> Position {
        self.style.position
    }

    pub fn z_index(&self) -> Option<i32> {
        self.style.z_index_value()
    }

    pub fn resolved_overflow(&self) -> Overflow {
        self.overflow_override.unwrap_or(self.style.overflow)
    }

    pub fn resolved_overflow_x(&self) -> Overflow {
        self.overflow_override
            .unwrap_or_else(|| self.style.overflow_x.unwrap_or(self.style.overflow))
    }

    pub fn resolved_overflow_y(&self) -> Overflow {
        self.overflow_override
            .unwrap_or_else(|| self.style.overflow_y.unwrap_or(self.style.overflow))
    }
}

/// Builder for an element subtree, consumed by [`Document::append`].
///
/// [`Document::append`]: super::Document::append
#[derive(Debug, Clone)]
pub struct Element {
    data: ElementData,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element { data: ElementData::new(tag), children: Vec::new() }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.data.id = id.to_string();
        self
    }

    /// Append one class to the class list.
    pub fn class(mut self, class: &str) -> Self {
        self.data.classes.push(class.to_string());
        self
    }

    pub fn role(mut self, role: &str) -> Self {
        self.data.role = role.to_string();
        self
    }

    pub fn aria_label(mut self, label: &str) -> Self {
        self.data.aria_label = label.to_string();
        self
    }

    pub fn aria_modal(mut self, modal: bool) -> Self {
        self.data.aria_modal = modal;
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.data.text = text.to_string();
        self
    }

    pub fn position(mut self, position: Position) -> Self {
        self.data.style.position = position;
        self
    }

    pub fn z_index(mut self, z: i32) -> Self {
        self.data.style.z_index = z.to_string();
        self
    }

    /// Raw z-index string, for modeling unparseable stylesheet values.
    pub fn z_index_raw(mut self, z: &str) -> Self {
        self.data.style.z_index = z.to_string();
        self
    }

    pub fn overflow(mut self, overflow: Overflow) -> Self {
        self.data.style.overflow = overflow;
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.data.rect = Rect::new(width, height);
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub(crate) fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    pub(crate) fn data_mut(&mut self) -> &mut ElementData {
        &mut self.data
    }

    pub(crate) fn into_parts(self) -> (ElementData, Vec<Element>) {
        (self.data, self.children)
    }
}
