//! Formatting vocabulary shared by the hosts and the applicator
//!
//! Inline styles (size, color, font family), block tags and the
//! weight/decoration toggles the toolbar exposes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Zero-width character placed in typing spans and measurement markers
pub const ZERO_WIDTH_SPACE: &str = "\u{200B}";
pub const ZERO_WIDTH_CHAR: char = '\u{200B}';

/// Continuous CSS property that can be applied to a run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleProperty {
    FontSize,
    Color,
    FontFamily,
}

impl StyleProperty {
    /// CSS property name
    pub fn css_name(&self) -> &'static str {
        match self {
            StyleProperty::FontSize => "font-size",
            StyleProperty::Color => "color",
            StyleProperty::FontFamily => "font-family",
        }
    }
}

/// A style property with its CSS value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineStyle {
    pub property: StyleProperty,
    pub value: String,
}

impl InlineStyle {
    pub fn new(property: StyleProperty, value: impl Into<String>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }

    /// Font size in points, as chosen in the size box
    pub fn font_size(points: f32) -> Self {
        Self::new(StyleProperty::FontSize, format!("{}pt", points))
    }

    /// Text color as a hex string (e.g. "#ff0000")
    pub fn color(hex: &str) -> Self {
        Self::new(StyleProperty::Color, hex)
    }

    pub fn font_family(name: &str) -> Self {
        Self::new(StyleProperty::FontFamily, name)
    }

    pub fn css_name(&self) -> &'static str {
        self.property.css_name()
    }
}

/// Weight/decoration attributes toggled by the B / I / U buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatKind {
    Bold,
    Italic,
    Underline,
}

impl FormatKind {
    pub const ALL: [FormatKind; 3] = [FormatKind::Bold, FormatKind::Italic, FormatKind::Underline];

    /// Name used by the browser's editing commands
    pub fn command_name(&self) -> &'static str {
        match self {
            FormatKind::Bold => "bold",
            FormatKind::Italic => "italic",
            FormatKind::Underline => "underline",
        }
    }

    /// Element tag used when the format is applied by wrapping
    pub fn tag_name(&self) -> &'static str {
        match self {
            FormatKind::Bold => "b",
            FormatKind::Italic => "i",
            FormatKind::Underline => "u",
        }
    }
}

/// Block-level tags available in the style dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockTag {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
}

impl BlockTag {
    pub fn tag_name(&self) -> &'static str {
        match self {
            BlockTag::Paragraph => "p",
            BlockTag::Heading1 => "h1",
            BlockTag::Heading2 => "h2",
            BlockTag::Heading3 => "h3",
            BlockTag::Heading4 => "h4",
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

impl FromStr for BlockTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().trim_start_matches('<').trim_end_matches('>');
        match tag.to_ascii_lowercase().as_str() {
            "p" => Ok(BlockTag::Paragraph),
            "h1" => Ok(BlockTag::Heading1),
            "h2" => Ok(BlockTag::Heading2),
            "h3" => Ok(BlockTag::Heading3),
            "h4" => Ok(BlockTag::Heading4),
            other => Err(format!("Unsupported block style: '{}'", other)),
        }
    }
}

/// Pressed/unpressed state of the B / I / U toggles
///
/// Always a projection of the live selection, never written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFormatState {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl ActiveFormatState {
    pub fn get(&self, kind: FormatKind) -> bool {
        match kind {
            FormatKind::Bold => self.bold,
            FormatKind::Italic => self.italic,
            FormatKind::Underline => self.underline,
        }
    }

    pub fn set(&mut self, kind: FormatKind, value: bool) {
        match kind {
            FormatKind::Bold => self.bold = value,
            FormatKind::Italic => self.italic = value,
            FormatKind::Underline => self.underline = value,
        }
    }
}
