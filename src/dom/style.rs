//! Style and geometry primitives: the slice of CSS the filter inspects.

/// Resolved CSS `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl Position {
    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "static" => Some(Position::Static),
            "relative" => Some(Position::Relative),
            "absolute" => Some(Position::Absolute),
            "fixed" => Some(Position::Fixed),
            "sticky" => Some(Position::Sticky),
            _ => None,
        }
    }

    /// Fixed or sticky: the element does not scroll with page content.
    pub fn is_pinned(self) -> bool {
        matches!(self, Position::Fixed | Position::Sticky)
    }
}

/// Resolved CSS `overflow` on a single axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Auto,
    Scroll,
}

impl Overflow {
    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "visible" => Some(Overflow::Visible),
            "hidden" => Some(Overflow::Hidden),
            "auto" => Some(Overflow::Auto),
            "scroll" => Some(Overflow::Scroll),
            _ => None,
        }
    }
}

/// An element's bounding box. Only the dimensions matter to the coverage
/// heuristic, so offsets are not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(width: f64, height: f64) -> Self {
        Rect { width, height }
    }
}

/// The host page's viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Viewport { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::new(1280.0, 800.0)
    }
}

/// The computed style values the classifier reads. These model what a
/// stylesheet cascade resolved to; inline `!important` overrides applied by
/// the remediation engine live on the element, above this layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub position: Position,
    /// Raw z-index value; anything unparseable ("auto", garbage) degrades
    /// to "no stacking priority" rather than an error.
    pub z_index: String,
    pub overflow: Overflow,
    /// Per-axis values, falling back to the shorthand when absent.
    pub overflow_x: Option<Overflow>,
    pub overflow_y: Option<Overflow>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        ComputedStyle {
            position: Position::Static,
            z_index: "auto".to_string(),
            overflow: Overflow::Visible,
            overflow_x: None,
            overflow_y: None,
        }
    }
}

impl ComputedStyle {
    /// Parsed z-index, or `None` for absent/unparseable values.
    pub fn z_index_value(&self) -> Option<i32> {
        self.z_index.trim().parse().ok()
    }
}
