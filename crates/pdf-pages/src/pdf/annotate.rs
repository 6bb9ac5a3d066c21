//! Annotation rendering
//!
//! Annotations are drawn into the page content (not as PDF annotation
//! dictionaries), so every viewer and every later merge shows them.

use super::rebuild::{ANNOTATION_FONT_NAME, HIGHLIGHT_GS_NAME};
use crate::constants::{
    ANNOTATION_FONT_SIZE, ANNOTATION_LINE_WIDTH, BEZIER_CIRCLE_FACTOR, DEFAULT_HIGHLIGHT_SIZE,
};
use crate::geometry::{Point, Rect};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RGB colour, written and parsed as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    fn components(&self) -> String {
        format!(
            "{:.3} {:.3} {:.3}",
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value).ok_or_else(|| format!("invalid colour '{value}', expected #rrggbb"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Shape drawn by an annotation tool
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "tool", rename_all = "lowercase")
)]
pub enum AnnotationKind {
    /// Text with its baseline starting at (`x`, `y`)
    Text { x: f32, y: f32, text: String },
    /// Translucent filled box; an empty rectangle gets the default size
    Highlight { rect: Rect },
    /// Freehand polyline
    Draw { points: Vec<Point> },
    Rectangle { rect: Rect },
    /// Circle inscribed in `rect`
    Circle { rect: Rect },
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Annotation {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub kind: AnnotationKind,
    #[cfg_attr(feature = "serde", serde(default = "default_fill"))]
    pub fill: Color,
    #[cfg_attr(feature = "serde", serde(default = "default_stroke"))]
    pub stroke: Color,
}

#[cfg(feature = "serde")]
fn default_fill() -> Color {
    Color::YELLOW
}

#[cfg(feature = "serde")]
fn default_stroke() -> Color {
    Color::BLACK
}

impl Annotation {
    /// Annotation with the editor's default colours (yellow fill, black stroke)
    pub fn new(kind: AnnotationKind) -> Self {
        Self {
            kind,
            fill: Color::YELLOW,
            stroke: Color::BLACK,
        }
    }
}

/// Content operators for a set of annotations, plus the resources they need
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationOverlay {
    pub ops: String,
    pub uses_font: bool,
    pub uses_transparency: bool,
}

/// Render annotations, in order, to content stream operators.
pub fn render_annotations(annotations: &[Annotation]) -> AnnotationOverlay {
    let mut overlay = AnnotationOverlay::default();

    for annotation in annotations {
        let fill = annotation.fill.components();
        let stroke = annotation.stroke.components();
        let ops = &mut overlay.ops;

        ops.push_str("q\n");
        ops.push_str(&format!("{} rg {} RG {} w\n", fill, stroke, ANNOTATION_LINE_WIDTH));

        match &annotation.kind {
            AnnotationKind::Text { x, y, text } => {
                overlay.uses_font = true;
                ops.push_str(&format!(
                    "BT /{} {} Tf {} {} Td ({}) Tj ET\n",
                    ANNOTATION_FONT_NAME,
                    ANNOTATION_FONT_SIZE,
                    x,
                    y,
                    escape_text(text)
                ));
            }
            AnnotationKind::Highlight { rect } => {
                overlay.uses_transparency = true;
                let rect = highlight_rect(rect);
                ops.push_str(&format!(
                    "/{} gs {} {} {} {} re f\n",
                    HIGHLIGHT_GS_NAME, rect.x, rect.y, rect.width, rect.height
                ));
            }
            AnnotationKind::Draw { points } => {
                ops.push_str(&polyline(points));
            }
            AnnotationKind::Rectangle { rect } => {
                let rect = rect.normalized();
                ops.push_str(&format!(
                    "{} {} {} {} re B\n",
                    rect.x, rect.y, rect.width, rect.height
                ));
            }
            AnnotationKind::Circle { rect } => {
                ops.push_str(&circle(rect));
            }
        }

        ops.push_str("Q\n");
    }

    overlay
}

fn highlight_rect(rect: &Rect) -> Rect {
    let rect = rect.normalized();
    if rect.is_empty() {
        Rect::new(rect.x, rect.y, DEFAULT_HIGHLIGHT_SIZE.0, DEFAULT_HIGHLIGHT_SIZE.1)
    } else {
        rect
    }
}

/// Stroked polyline; fewer than two points draws nothing
fn polyline(points: &[Point]) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    if rest.is_empty() {
        return String::new();
    }

    let mut ops = format!("{} {} m\n", first.x, first.y);
    for point in rest {
        ops.push_str(&format!("{} {} l\n", point.x, point.y));
    }
    ops.push_str("S\n");
    ops
}

/// Filled and stroked circle centered in `rect`, diameter = shorter side
fn circle(rect: &Rect) -> String {
    let rect = rect.normalized();
    let r = rect.width.min(rect.height) / 2.0;
    if r <= 0.0 {
        return String::new();
    }
    let cx = rect.x + rect.width / 2.0;
    let cy = rect.y + rect.height / 2.0;
    let k = r * BEZIER_CIRCLE_FACTOR;

    let mut ops = format!("{} {} m\n", cx + r, cy);
    ops.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        cx + r,
        cy + k,
        cx + k,
        cy + r,
        cx,
        cy + r
    ));
    ops.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        cx - k,
        cy + r,
        cx - r,
        cy + k,
        cx - r,
        cy
    ));
    ops.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        cx - r,
        cy - k,
        cx - k,
        cy - r,
        cx,
        cy - r
    ));
    ops.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        cx + k,
        cy - r,
        cx + r,
        cy - k,
        cx + r,
        cy
    ));
    ops.push_str("B\n");
    ops
}

/// Escape a string for a PDF literal. Helvetica's standard encoding only
/// covers ASCII reliably, so everything else becomes `?`.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ' '..='~' => escaped.push(ch),
            _ => escaped.push('?'),
        }
    }
    escaped
}
