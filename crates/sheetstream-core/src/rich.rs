//! Rich text values

use crate::style::{Font, Underline};
use std::fmt;

/// A contiguous span of text with one font treatment
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RichTextRun {
    /// Text of the run
    pub text: String,
    /// Font override; `None` inherits the default font
    pub font: Option<Font>,
}

impl RichTextRun {
    /// Create an unstyled run
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            font: None,
        }
    }

    /// Create a run with a font
    pub fn styled<S: Into<String>>(text: S, font: Font) -> Self {
        Self {
            text: text.into(),
            font: Some(font),
        }
    }
}

/// A cell value as an ordered sequence of runs.
///
/// Runs are kept in reading order and never merged. The empty value is a
/// single run with empty text and no font.
#[derive(Debug, Clone, PartialEq)]
pub struct RichText {
    /// Runs in reading order
    pub runs: Vec<RichTextRun>,
}

impl RichText {
    /// The empty value, also used to pad gaps in sparse rows
    pub fn empty() -> Self {
        Self::plain("")
    }

    /// A single unstyled run
    pub fn plain<S: Into<String>>(text: S) -> Self {
        Self {
            runs: vec![RichTextRun::new(text)],
        }
    }

    /// Build from explicit runs
    pub fn from_runs(runs: Vec<RichTextRun>) -> Self {
        Self { runs }
    }

    /// True for a run-less value or the single empty unstyled run
    pub fn is_empty(&self) -> bool {
        match self.runs.first() {
            None => true,
            Some(run) => run.text.is_empty() && run.font.is_none(),
        }
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Merge `font` into every run.
    ///
    /// Flags only switch on, an underline replaces `None`, and a color is
    /// only set when `font` has one. Runs without a font get one.
    pub fn apply(mut self, font: Option<&Font>) -> Self {
        let Some(font) = font else {
            return self;
        };
        for run in &mut self.runs {
            let target = run.font.get_or_insert_with(Font::default);
            if font.bold {
                target.bold = true;
            }
            if font.italic {
                target.italic = true;
            }
            if font.strike {
                target.strike = true;
            }
            if font.underline != Underline::None {
                target.underline = font.underline;
            }
            if let Some(color) = font.color.as_ref().filter(|c| !c.is_empty()) {
                target.color = Some(color.clone());
            }
        }
        self
    }
}

impl Default for RichText {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}

impl From<&str> for RichText {
    fn from(text: &str) -> Self {
        RichText::plain(text)
    }
}

impl From<String> for RichText {
    fn from(text: String) -> Self {
        RichText::plain(text)
    }
}
