//! Deterministic raster rendering of a board.
//!
//! Geometry follows the classic chat-bot layout: 30 px square cells, a
//! margin on every side carrying 1-based coordinate labels (duplicated on
//! both opposite edges), 2 px black grid lines. Persisting or encoding the
//! returned image is the adapter's job.

use image::{Rgb, RgbImage};

use roomsweeper_common::models::Pos;

use crate::data::{Board, CellState};

pub const CELL_SIZE: u32 = 30;
const MARGIN_X: u32 = 30;
const MARGIN_Y: u32 = 20;
const LINE_WIDTH: u32 = 2;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);
/// Fill for cells the players have not opened yet.
const HIDDEN_BLUE: Rgb<u8> = Rgb([50, 150, 250]);

const CELL_TEXT_SCALE: u32 = 3;
const LABEL_SCALE: u32 = 2;

/// Renders the in-progress view: mines stay hidden unless one has been
/// detonated. Pure function of the board state, repeatable at any time.
pub fn render(board: &Board) -> RgbImage {
    render_board(board, false)
}

/// Renders the end-of-game view with every mine position highlighted,
/// whatever its reveal state. Used for the closing message of a game.
pub fn render_revealed(board: &Board) -> RgbImage {
    render_board(board, true)
}

fn render_board(board: &Board, reveal_mines: bool) -> RgbImage {
    let width = board.width() as u32;
    let height = board.height() as u32;
    let mut image = RgbImage::from_pixel(
        (width + 2) * CELL_SIZE,
        (height + 2) * CELL_SIZE,
        WHITE,
    );

    draw_grid(&mut image, width, height);
    draw_labels(&mut image, width, height);

    for y in 0..board.height() {
        for x in 0..board.width() {
            draw_cell(&mut image, board, Pos::new(x, y), reveal_mines);
        }
    }

    image
}

fn draw_cell(image: &mut RgbImage, board: &Board, pos: Pos, reveal_mines: bool) {
    if reveal_mines && board.is_mine(pos) {
        fill_cell(image, pos, RED);
        return;
    }

    match board.cell(pos) {
        CellState::Unopened => fill_cell(image, pos, HIDDEN_BLUE),
        CellState::Flagged => {
            fill_cell(image, pos, HIDDEN_BLUE);
            draw_cell_glyph(image, pos, '!', RED);
        }
        CellState::Maybe => {
            fill_cell(image, pos, HIDDEN_BLUE);
            draw_cell_glyph(image, pos, '?', RED);
        }
        CellState::Opened { .. } if board.is_mine(pos) => fill_cell(image, pos, RED),
        CellState::Opened { adjacent: 0 } => fill_cell(image, pos, WHITE),
        CellState::Opened { adjacent } => {
            fill_cell(image, pos, WHITE);
            draw_cell_glyph(image, pos, (b'0' + adjacent) as char, BLACK);
        }
    }
}

fn cell_origin(pos: Pos) -> (u32, u32) {
    (
        MARGIN_X + pos.x as u32 * CELL_SIZE,
        MARGIN_Y + pos.y as u32 * CELL_SIZE,
    )
}

/// Fills the cell interior, leaving the 2 px grid lines visible.
fn fill_cell(image: &mut RgbImage, pos: Pos, color: Rgb<u8>) {
    let (x, y) = cell_origin(pos);
    fill_rect(
        image,
        x + LINE_WIDTH,
        y + LINE_WIDTH,
        CELL_SIZE - LINE_WIDTH,
        CELL_SIZE - LINE_WIDTH,
        color,
    );
}

fn draw_cell_glyph(image: &mut RgbImage, pos: Pos, glyph: char, color: Rgb<u8>) {
    let (x, y) = cell_origin(pos);
    let text = glyph.to_string();
    let offset_x = (CELL_SIZE - text_width(&text, CELL_TEXT_SCALE)) / 2;
    let offset_y = (CELL_SIZE - GLYPH_HEIGHT * CELL_TEXT_SCALE) / 2;
    draw_text(image, x + offset_x, y + offset_y, &text, CELL_TEXT_SCALE, color);
}

fn draw_grid(image: &mut RgbImage, width: u32, height: u32) {
    for row in 0..=height {
        fill_rect(
            image,
            MARGIN_X,
            MARGIN_Y + row * CELL_SIZE,
            width * CELL_SIZE + LINE_WIDTH,
            LINE_WIDTH,
            BLACK,
        );
    }
    for col in 0..=width {
        fill_rect(
            image,
            MARGIN_X + col * CELL_SIZE,
            MARGIN_Y,
            LINE_WIDTH,
            height * CELL_SIZE + LINE_WIDTH,
            BLACK,
        );
    }
}

/// 1-based labels on all four edges, so coordinates can be read off from
/// anywhere in a large room screenshot.
fn draw_labels(image: &mut RgbImage, width: u32, height: u32) {
    for col in 1..=width {
        let text = col.to_string();
        let x = MARGIN_X + (col - 1) * CELL_SIZE
            + (CELL_SIZE - text_width(&text, LABEL_SCALE)) / 2;
        let label_height = GLYPH_HEIGHT * LABEL_SCALE;
        draw_text(image, x, MARGIN_Y - label_height - 2, &text, LABEL_SCALE, BLACK);
        draw_text(
            image,
            x,
            MARGIN_Y + height * CELL_SIZE + 4,
            &text,
            LABEL_SCALE,
            BLACK,
        );
    }
    for row in 1..=height {
        let text = row.to_string();
        let y = MARGIN_Y + (row - 1) * CELL_SIZE
            + (CELL_SIZE - GLYPH_HEIGHT * LABEL_SCALE) / 2;
        let width_px = text_width(&text, LABEL_SCALE);
        draw_text(image, MARGIN_X - width_px - 4, y, &text, LABEL_SCALE, BLACK);
        draw_text(
            image,
            MARGIN_X + width * CELL_SIZE + 5,
            y,
            &text,
            LABEL_SCALE,
            BLACK,
        );
    }
}

fn fill_rect(image: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
    for dy in 0..h {
        for dx in 0..w {
            if x + dx < image.width() && y + dy < image.height() {
                image.put_pixel(x + dx, y + dy, color);
            }
        }
    }
}

const GLYPH_WIDTH: u32 = 5;
const GLYPH_HEIGHT: u32 = 7;
/// Horizontal advance between characters, in glyph pixels.
const GLYPH_ADVANCE: u32 = 6;

fn text_width(text: &str, scale: u32) -> u32 {
    let chars = text.chars().count() as u32;
    (chars * GLYPH_ADVANCE - (GLYPH_ADVANCE - GLYPH_WIDTH)) * scale
}

fn draw_text(image: &mut RgbImage, x: u32, y: u32, text: &str, scale: u32, color: Rgb<u8>) {
    let mut cursor = x;
    for ch in text.chars() {
        draw_glyph(image, cursor, y, ch, scale, color);
        cursor += GLYPH_ADVANCE * scale;
    }
}

fn draw_glyph(image: &mut RgbImage, x: u32, y: u32, ch: char, scale: u32, color: Rgb<u8>) {
    let Some(pattern) = glyph(ch) else { return };
    for (row, line) in pattern.iter().enumerate() {
        for (col, dot) in line.bytes().enumerate() {
            if dot != b'#' {
                continue;
            }
            fill_rect(
                image,
                x + col as u32 * scale,
                y + row as u32 * scale,
                scale,
                scale,
                color,
            );
        }
    }
}

/// 5x7 bitmap glyphs for everything the board ever prints: coordinate
/// labels, adjacency digits, and the flag/maybe markers.
fn glyph(ch: char) -> Option<&'static [&'static str; 7]> {
    let pattern = match ch {
        '0' => &[
            " ### ", //
            "#   #", "#  ##", "# # #", "##  #", "#   #", " ### ",
        ],
        '1' => &[
            "  #  ", //
            " ##  ", "  #  ", "  #  ", "  #  ", "  #  ", " ### ",
        ],
        '2' => &[
            " ### ", //
            "#   #", "    #", "   # ", "  #  ", " #   ", "#####",
        ],
        '3' => &[
            " ### ", //
            "#   #", "    #", "  ## ", "    #", "#   #", " ### ",
        ],
        '4' => &[
            "   # ", //
            "  ## ", " # # ", "#  # ", "#####", "   # ", "   # ",
        ],
        '5' => &[
            "#####", //
            "#    ", "#### ", "    #", "    #", "#   #", " ### ",
        ],
        '6' => &[
            " ### ", //
            "#    ", "#    ", "#### ", "#   #", "#   #", " ### ",
        ],
        '7' => &[
            "#####", //
            "    #", "   # ", "  #  ", "  #  ", "  #  ", "  #  ",
        ],
        '8' => &[
            " ### ", //
            "#   #", "#   #", " ### ", "#   #", "#   #", " ### ",
        ],
        '9' => &[
            " ### ", //
            "#   #", "#   #", " ####", "    #", "    #", " ### ",
        ],
        '!' => &[
            "  #  ", //
            "  #  ", "  #  ", "  #  ", "  #  ", "     ", "  #  ",
        ],
        '?' => &[
            " ### ", //
            "#   #", "    #", "   # ", "  #  ", "     ", "  #  ",
        ],
        _ => return None,
    };
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use roomsweeper_common::models::Outcome;

    use super::*;

    fn mines(list: &[(usize, usize)]) -> Vec<Pos> {
        list.iter().map(|&(x, y)| Pos::new(x, y)).collect()
    }

    /// A pixel just inside the cell fill, clear of any glyph.
    fn probe(pos: Pos) -> (u32, u32) {
        let (x, y) = cell_origin(pos);
        (x + 3, y + 3)
    }

    fn cell_has_color(image: &RgbImage, pos: Pos, color: Rgb<u8>) -> bool {
        let (x, y) = cell_origin(pos);
        (LINE_WIDTH..CELL_SIZE)
            .flat_map(|dy| (LINE_WIDTH..CELL_SIZE).map(move |dx| (dx, dy)))
            .any(|(dx, dy)| *image.get_pixel(x + dx, y + dy) == color)
    }

    #[test]
    fn image_has_margin_sized_dimensions() {
        let board = Board::with_mine_layout(5, 4, &mines(&[(0, 0), (4, 3), (2, 2)]));
        let image = render(&board);
        assert_eq!(image.width(), 7 * CELL_SIZE);
        assert_eq!(image.height(), 6 * CELL_SIZE);
    }

    #[test]
    fn cells_fill_according_to_state() {
        let mut board = Board::with_mine_layout(4, 4, &mines(&[(0, 0), (2, 0)]));
        board.click(Pos::new(1, 1));
        board.set_flag(Pos::new(3, 3));
        board.set_maybe(Pos::new(0, 3));

        let image = render(&board);
        let (x, y) = probe(Pos::new(1, 2));
        assert_eq!(*image.get_pixel(x, y), HIDDEN_BLUE);
        let (x, y) = probe(Pos::new(1, 1));
        assert_eq!(*image.get_pixel(x, y), WHITE);
        // Markers keep the hidden fill and add a red glyph.
        let (x, y) = probe(Pos::new(3, 3));
        assert_eq!(*image.get_pixel(x, y), HIDDEN_BLUE);
        assert!(cell_has_color(&image, Pos::new(3, 3), RED));
        assert!(cell_has_color(&image, Pos::new(0, 3), RED));
        // The digit on the opened cell is black.
        assert!(cell_has_color(&image, Pos::new(1, 1), BLACK));
    }

    #[test]
    fn in_progress_view_keeps_mines_hidden() {
        let board = Board::with_mine_layout(4, 4, &mines(&[(2, 2)]));
        let image = render(&board);
        let (x, y) = probe(Pos::new(2, 2));
        assert_eq!(*image.get_pixel(x, y), HIDDEN_BLUE);
    }

    #[test]
    fn detonated_mine_renders_red_in_both_views() {
        let mut board = Board::with_mine_layout(4, 4, &mines(&[(1, 1), (3, 3)]));
        board.click(Pos::new(1, 1));
        assert_eq!(board.outcome(), Outcome::Lost);

        for image in [render(&board), render_revealed(&board)] {
            let (x, y) = probe(Pos::new(1, 1));
            assert_eq!(*image.get_pixel(x, y), RED);
        }
    }

    #[test]
    fn revealed_view_highlights_every_mine() {
        let layout = mines(&[(0, 0), (3, 1), (2, 3)]);
        let board = Board::with_mine_layout(4, 4, &layout);
        let image = render_revealed(&board);
        for pos in layout {
            let (x, y) = probe(pos);
            assert_eq!(*image.get_pixel(x, y), RED);
        }
        // Non-mine cells still render as hidden.
        let (x, y) = probe(Pos::new(1, 1));
        assert_eq!(*image.get_pixel(x, y), HIDDEN_BLUE);
    }

    #[test]
    fn rendering_is_pure_and_deterministic() {
        let mut board = Board::with_mine_layout(5, 5, &mines(&[(0, 0), (4, 4), (2, 0)]));
        board.click(Pos::new(2, 3));
        board.set_flag(Pos::new(0, 0));

        let before = board.snapshot();
        let first = render(&board);
        let second = render(&board);
        assert_eq!(first.as_raw(), second.as_raw());
        assert_eq!(board.snapshot(), before);
    }

    #[test]
    fn grid_lines_and_labels_are_drawn() {
        let board = Board::with_mine_layout(3, 3, &mines(&[(0, 0)]));
        let image = render(&board);
        // Top-left corner of the grid frame.
        assert_eq!(*image.get_pixel(MARGIN_X, MARGIN_Y), BLACK);
        // Some label ink must exist above the grid.
        let has_label_ink = (0..image.width())
            .flat_map(|x| (0..MARGIN_Y.saturating_sub(LINE_WIDTH)).map(move |y| (x, y)))
            .any(|(x, y)| *image.get_pixel(x, y) == BLACK);
        assert!(has_label_ink);
    }
}
