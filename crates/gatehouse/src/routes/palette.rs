//! Palette endpoint for clients rendering the color picker.

use axum::{Json, extract::State};
use chromakey_common::{ColorCode, constants::PAIR_ARITY};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct PaletteResponse {
    colors: Vec<ColorCode>,
    pair_arity: usize,
}

/// Selectable colors in palette order. Symbols are never exposed.
pub async fn get_palette(State(state): State<AppState>) -> Json<PaletteResponse> {
    Json(PaletteResponse {
        colors: state.palette.colors().to_vec(),
        pair_arity: PAIR_ARITY,
    })
}
