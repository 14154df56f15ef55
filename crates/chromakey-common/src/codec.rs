//! Graphical password codec.
//!
//! Clients submit a graphical password as a list of color pairs, e.g.
//! `[["#FF0000","#00FF00"], ["#0000FF","#FFFF00"]]`. Each pair becomes two
//! symbols (inner, then outer) and the symbols are concatenated in
//! submission order. Order is part of the secret: nothing is sorted,
//! deduplicated or dropped, and any invalid pair rejects the whole input.

use serde_json::Value;

use crate::constants::PAIR_ARITY;
use crate::error::CodecError;
use crate::palette::Palette;
use crate::types::{CanonicalPassword, ColorCode, ColorPair};

/// Ordered color pairs as submitted by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicalPasswordInput {
    pairs: Vec<ColorPair>,
}

impl GraphicalPasswordInput {
    pub fn from_pairs(pairs: Vec<ColorPair>) -> Self {
        Self { pairs }
    }

    /// Parse the serialized client form (a JSON list of 2-element lists).
    pub fn parse(raw: &str) -> Result<Self, CodecError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| CodecError::MalformedInput(format!("invalid JSON: {e}")))?;
        Self::from_pairs_value(&value)
    }

    /// Accept either the JSON list itself or a JSON string holding it.
    pub fn from_value(value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::String(raw) => Self::parse(raw),
            other => Self::from_pairs_value(other),
        }
    }

    fn from_pairs_value(value: &Value) -> Result<Self, CodecError> {
        let Value::Array(items) = value else {
            return Err(CodecError::MalformedInput(
                "expected a list of color pairs".to_string(),
            ));
        };

        let pairs = items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_pair(index, item))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[ColorPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serialized client form
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.pairs).unwrap_or_else(|_| "[]".to_string())
    }
}

fn parse_pair(index: usize, item: &Value) -> Result<ColorPair, CodecError> {
    let Value::Array(colors) = item else {
        return Err(CodecError::MalformedInput(format!(
            "pair {index} is not a list"
        )));
    };
    if colors.len() != PAIR_ARITY {
        return Err(CodecError::MalformedInput(format!(
            "pair {index} has {} colors, expected {PAIR_ARITY}",
            colors.len()
        )));
    }

    let color = |slot: usize| match &colors[slot] {
        Value::String(code) => Ok(ColorCode::new(code)),
        _ => Err(CodecError::MalformedInput(format!(
            "pair {index} contains a non-string color"
        ))),
    };

    Ok(ColorPair {
        inner: color(0)?,
        outer: color(1)?,
    })
}

/// Derive the canonical password for `input`.
///
/// The result always has exactly `2 * input.len()` characters.
pub fn decode(
    palette: &Palette,
    input: &GraphicalPasswordInput,
) -> Result<CanonicalPassword, CodecError> {
    if input.is_empty() {
        return Err(CodecError::EmptyInput);
    }

    let mut password = String::with_capacity(input.len() * PAIR_ARITY);
    for pair in input.pairs() {
        password.push(palette.char_for_color(&pair.inner)?);
        password.push(palette.char_for_color(&pair.outer)?);
    }

    Ok(CanonicalPassword::new(password))
}

/// Parse and decode the serialized client form in one step.
pub fn decode_str(palette: &Palette, raw: &str) -> Result<CanonicalPassword, CodecError> {
    decode(palette, &GraphicalPasswordInput::parse(raw)?)
}

/// Inverse of [`decode`]: the color pairs that produce `password`.
pub fn encode(palette: &Palette, password: &str) -> Result<GraphicalPasswordInput, CodecError> {
    let symbols: Vec<char> = password.chars().collect();
    if symbols.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    if symbols.len() % PAIR_ARITY != 0 {
        return Err(CodecError::MalformedInput(format!(
            "password has {} characters, expected an even number",
            symbols.len()
        )));
    }

    let pairs = symbols
        .chunks(PAIR_ARITY)
        .map(|chunk| -> Result<ColorPair, CodecError> {
            Ok(ColorPair {
                inner: palette.color_for_char(chunk[0])?.clone(),
                outer: palette.color_for_char(chunk[1])?.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(GraphicalPasswordInput { pairs })
}
