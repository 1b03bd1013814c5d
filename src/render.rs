//! Canvas 2D drawing (wasm only)
//!
//! Read-only over the game state; called by the harness after each tick.

use web_sys::CanvasRenderingContext2d;

use crate::cell_to_px;
use crate::sim::GameState;

const BOARD_COLOR: &str = "#161b22";
const SNAKE_COLOR: &str = "#57ab5a";
const FOOD_GLYPH: &str = "\u{20bf}"; // ₿

/// Draw the full frame: background, snake, food
pub fn draw(ctx: &CanvasRenderingContext2d, state: &GameState, tile_size: u32) {
    let board_px = cell_to_px(state.board_tiles, tile_size);
    let tile = tile_size as f64;

    ctx.set_fill_style_str(BOARD_COLOR);
    ctx.fill_rect(0.0, 0.0, board_px, board_px);

    ctx.set_fill_style_str(SNAKE_COLOR);
    for segment in &state.snake {
        ctx.fill_rect(
            cell_to_px(segment.x, tile_size),
            cell_to_px(segment.y, tile_size),
            tile,
            tile,
        );
    }

    ctx.set_font(&format!("{tile_size}px sans-serif"));
    let _ = ctx.fill_text(
        FOOD_GLYPH,
        cell_to_px(state.food.x, tile_size),
        cell_to_px(state.food.y, tile_size) + tile - 2.0,
    );
}
