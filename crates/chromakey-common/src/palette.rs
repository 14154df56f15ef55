//! The fixed symbol/color bijection behind graphical passwords.
//!
//! A [`Palette`] is built once from two ordered lists of equal length and is
//! read-only afterwards, so it can be shared freely between threads. The
//! assignment of symbols to colors must never change for a deployment:
//! every stored credential was derived through it.

use std::collections::HashMap;

use crate::constants::{STANDARD_COLORS, STANDARD_SYMBOLS};
use crate::error::{CodecError, PaletteError};
use crate::types::ColorCode;

/// Bijection between palette symbols and color codes
#[derive(Debug, Clone)]
pub struct Palette {
    /// Colors in palette order
    colors: Vec<ColorCode>,
    symbols: Vec<char>,
    char_by_color: HashMap<ColorCode, char>,
    color_by_char: HashMap<char, usize>,
}

impl Palette {
    /// Build a palette pairing `symbols[i]` with `colors[i]`.
    pub fn new<S: AsRef<str>>(symbols: &[char], colors: &[S]) -> Result<Self, PaletteError> {
        if symbols.len() != colors.len() {
            return Err(PaletteError::LengthMismatch {
                symbols: symbols.len(),
                colors: colors.len(),
            });
        }
        if symbols.is_empty() {
            return Err(PaletteError::Empty);
        }

        let mut char_by_color = HashMap::with_capacity(colors.len());
        let mut color_by_char = HashMap::with_capacity(symbols.len());
        let mut ordered = Vec::with_capacity(colors.len());

        for (index, (&symbol, raw)) in symbols.iter().zip(colors).enumerate() {
            let color = ColorCode::new(raw.as_ref());
            if !color.is_well_formed() {
                return Err(PaletteError::InvalidColor(raw.as_ref().to_string()));
            }
            if color_by_char.insert(symbol, index).is_some() {
                return Err(PaletteError::DuplicateSymbol(symbol));
            }
            if char_by_color.insert(color.clone(), symbol).is_some() {
                return Err(PaletteError::DuplicateColor(color.to_string()));
            }
            ordered.push(color);
        }

        Ok(Self {
            colors: ordered,
            symbols: symbols.to_vec(),
            char_by_color,
            color_by_char,
        })
    }

    /// The default 62 symbol palette (`a-z`, `A-Z`, `0-9`).
    pub fn standard() -> Result<Self, PaletteError> {
        let symbols: Vec<char> = STANDARD_SYMBOLS.chars().collect();
        Self::new(&symbols, &STANDARD_COLORS)
    }

    /// Build from a symbol string, one symbol per character.
    pub fn from_table<S: AsRef<str>>(symbols: &str, colors: &[S]) -> Result<Self, PaletteError> {
        let symbols: Vec<char> = symbols.chars().collect();
        Self::new(&symbols, colors)
    }

    /// Symbol for a canonical color
    pub fn char_for_color(&self, color: &ColorCode) -> Result<char, CodecError> {
        self.char_by_color
            .get(color)
            .copied()
            .ok_or_else(|| CodecError::UnknownColor(color.to_string()))
    }

    /// Color for a symbol
    pub fn color_for_char(&self, symbol: char) -> Result<&ColorCode, CodecError> {
        self.color_by_char
            .get(&symbol)
            .map(|&index| &self.colors[index])
            .ok_or(CodecError::UnknownSymbol(symbol))
    }

    pub fn contains_color(&self, color: &ColorCode) -> bool {
        self.char_by_color.contains_key(color)
    }

    /// Colors in palette order
    pub fn colors(&self) -> &[ColorCode] {
        &self.colors
    }

    /// Symbols in palette order
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
