//! Koala Kombo - an 8x8 block placement puzzle.
//!
//! Players drag pieces from a tray of three onto the board. Completing a row
//! or column clears it and scores points; once all three pieces are placed a
//! new tray is dealt.
//!
//! On `wasm32` the crate also exports a start function and a [`WebGame`]
//! handle for the browser build.

mod board;
mod shape;
#[cfg(target_arch = "wasm32")]
mod web;

pub use board::{Coord, GRID_SIZE, KoalaKombo, Piece, TRAY_SIZE};
pub use shape::Shape;
#[cfg(target_arch = "wasm32")]
pub use web::WebGame;
