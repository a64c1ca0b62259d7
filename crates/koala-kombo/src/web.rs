//! Browser entry point and JavaScript handle.

use wasm_bindgen::prelude::*;

use crate::board::{Coord, KoalaKombo};
use crate::shape::Shape;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    log("koala_kombo initialized");
}

/// Game handle exposed to JavaScript.
#[wasm_bindgen]
pub struct WebGame {
    inner: KoalaKombo,
}

#[wasm_bindgen]
impl WebGame {
    /// Start a game with a random seed.
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        Self::with_seed(seed as u32)
    }

    #[wasm_bindgen(js_name = withSeed)]
    pub fn with_seed(seed: u32) -> WebGame {
        Self {
            inner: KoalaKombo::with_seed(seed as u64),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u32 {
        self.inner.score
    }

    #[wasm_bindgen(js_name = cellFilled)]
    pub fn cell_filled(&self, column: usize, row: usize) -> bool {
        self.inner.cell_filled(Coord::new(column, row))
    }

    /// Index of the piece's shape in the shape table, or `None` for a bad index.
    #[wasm_bindgen(js_name = pieceShape)]
    pub fn piece_shape(&self, piece: usize) -> Option<usize> {
        let shape = self.inner.pieces.get(piece)?.shape;
        Shape::ALL.iter().position(|&s| s == shape)
    }

    #[wasm_bindgen(js_name = pieceUsed)]
    pub fn piece_used(&self, piece: usize) -> bool {
        self.inner.pieces.get(piece).is_none_or(|p| p.used)
    }

    /// Board indices the piece would cover, empty if it does not fit.
    #[wasm_bindgen(js_name = canPlace)]
    pub fn can_place(&self, piece: usize, column: usize, row: usize) -> Vec<u32> {
        self.inner
            .can_place(piece, Coord::new(column, row))
            .map(|cells| cells.into_iter().map(|pos| pos.to_index() as u32).collect())
            .unwrap_or_default()
    }

    pub fn place(&mut self, piece: usize, column: usize, row: usize) -> bool {
        self.inner.place_shape(piece, Coord::new(column, row))
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}
