//! First-seen-ordered color registry.
//!
//! Every slice color passes through [`Palette::register`]; the returned
//! index is the color's id in both output files, so insertion order is
//! part of the output contract.

use std::collections::HashMap;

use crate::types::Rgb;

/// Deduplicated colors in the order they were first registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<String>,
    index: HashMap<String, usize>,
}

impl Palette {
    /// Create an empty palette.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of `hex`, appending it first if it is new.
    ///
    /// Matching is by exact string, so callers should register the
    /// canonical lowercase form produced by [`Rgb::to_hex`].
    pub fn register(&mut self, hex: &str) -> usize {
        if let Some(&existing) = self.index.get(hex) {
            return existing;
        }

        let position = self.colors.len();
        self.colors.push(hex.to_owned());
        self.index.insert(hex.to_owned(), position);
        tracing::debug!(color = hex, id = position, "new palette color");
        position
    }

    /// Register a color by its canonical hex form.
    pub fn register_color(&mut self, color: Rgb) -> usize {
        self.register(&color.to_hex())
    }

    /// Index of `hex` if it has been registered.
    #[must_use]
    pub fn index_of(&self, hex: &str) -> Option<usize> {
        self.index.get(hex).copied()
    }

    /// Hex string at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.colors.get(index).map(String::as_str)
    }

    /// Number of distinct colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Returns `true` if no color has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// `(index, hex)` pairs in registration order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (usize, &str)> {
        self.colors.iter().map(String::as_str).enumerate()
    }
}
