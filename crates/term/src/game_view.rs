//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! The board is drawn with row 0 at the bottom of the frame. Each board cell is
//! `cell_w` columns wide and holds the tile's number centred on its colour.

use crate::core::GameSnapshot;
use crate::fb::{digit_count, CellStyle, FrameBuffer, Rgb};
use crate::palette;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the game.
#[derive(Debug, Clone)]
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // Wide enough for "2048" plus a gap between neighbours.
        Self {
            cell_w: 5,
            cell_h: 1,
            anchor_y: AnchorY::Center,
        }
    }
}

/// Board frame placement inside the viewport.
#[derive(Debug, Clone, Copy)]
struct Layout {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
    rows: usize,
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render the snapshot into an existing framebuffer.
    ///
    /// Callers can reuse the framebuffer across frames and only resize when
    /// the terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let board_px_w = (snap.width as u16).saturating_mul(self.cell_w);
        let board_px_h = (snap.height as u16).saturating_mul(self.cell_h);
        let frame_w = board_px_w.saturating_add(2);
        let frame_h = board_px_h.saturating_add(2);

        let layout = Layout {
            x: viewport.width.saturating_sub(frame_w) / 2,
            y: match self.anchor_y {
                AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
                AnchorY::Top => 0,
            },
            w: frame_w,
            h: frame_h,
            rows: snap.height,
        };

        let border = CellStyle::new(palette::BOUNDARY, Rgb::new(0, 0, 0));
        self.draw_border(fb, layout, border);

        // Settled tiles.
        for row in 0..snap.height {
            for col in 0..snap.width {
                match snap.value_at(col, row) {
                    0 => self.draw_empty_cell(fb, layout, col, row),
                    v => self.draw_tile(fb, layout, col, row, v),
                }
            }
        }

        // Ghost piece.
        if snap.playable() {
            let ghost_style = CellStyle::new(palette::BOUNDARY, palette::EMPTY_CELL).dim();
            for pos in snap.ghost.iter() {
                if let Some((col, row)) = on_board(snap, pos.col, pos.row) {
                    self.fill_cell(fb, layout, col, row, '░', ghost_style);
                }
            }
        }

        // Active piece (tiles above the board are not drawn).
        for tile in snap.active.iter() {
            if let Some((col, row)) = on_board(snap, tile.pos.col, tile.pos.row) {
                self.draw_tile(fb, layout, col, row, tile.value);
            }
        }

        self.draw_side_panel(fb, snap, viewport, layout);

        // Overlays.
        if snap.win {
            self.draw_overlay_text(fb, layout, "YOU WIN");
        } else if snap.game_over {
            self.draw_overlay_text(fb, layout, "GAME OVER");
        } else if snap.paused {
            self.draw_overlay_text(fb, layout, "PAUSED");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, l: Layout, style: CellStyle) {
        if l.w < 2 || l.h < 2 {
            return;
        }

        fb.put_char(l.x, l.y, '┌', style);
        fb.put_char(l.x + l.w - 1, l.y, '┐', style);
        fb.put_char(l.x, l.y + l.h - 1, '└', style);
        fb.put_char(l.x + l.w - 1, l.y + l.h - 1, '┘', style);

        for dx in 1..l.w - 1 {
            fb.put_char(l.x + dx, l.y, '─', style);
            fb.put_char(l.x + dx, l.y + l.h - 1, '─', style);
        }
        for dy in 1..l.h - 1 {
            fb.put_char(l.x, l.y + dy, '│', style);
            fb.put_char(l.x + l.w - 1, l.y + dy, '│', style);
        }
    }

    /// Top-left terminal position of a board cell. Row 0 is the bottom row.
    fn cell_origin(&self, l: Layout, col: usize, row: usize) -> (u16, u16) {
        let flipped = (l.rows - 1 - row) as u16;
        (
            l.x + 1 + (col as u16) * self.cell_w,
            l.y + 1 + flipped * self.cell_h,
        )
    }

    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        l: Layout,
        col: usize,
        row: usize,
        ch: char,
        style: CellStyle,
    ) {
        let (px, py) = self.cell_origin(l, col, row);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_empty_cell(&self, fb: &mut FrameBuffer, l: Layout, col: usize, row: usize) {
        let (px, py) = self.cell_origin(l, col, row);
        let style = palette::empty_style();
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        fb.put_char(px + self.cell_w / 2, py + self.cell_h / 2, '·', style);
    }

    fn draw_tile(&self, fb: &mut FrameBuffer, l: Layout, col: usize, row: usize, value: u32) {
        let (px, py) = self.cell_origin(l, col, row);
        self.draw_tile_at(fb, px, py, value);
    }

    fn draw_tile_at(&self, fb: &mut FrameBuffer, px: u16, py: u16, value: u32) {
        let style = palette::tile_style(value);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);
        let digits = digit_count(value);
        let ty = py + self.cell_h / 2;
        if digits <= self.cell_w {
            fb.put_u32(px + (self.cell_w - digits) / 2, ty, value, style);
        } else {
            fb.put_char(px + self.cell_w / 2, ty, '+', style);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        viewport: Viewport,
        l: Layout,
    ) {
        let panel_x = l.x.saturating_add(l.w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 12 {
            return;
        }

        let label = CellStyle::default().bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let dim = value.dim();

        let mut y = l.y;
        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "BEST TILE", label);
        y = y.saturating_add(1);
        let written = fb.put_u32(panel_x, y, snap.max_value, value);
        let x = panel_x + written;
        let x = x + fb.put_str(x, y, " / ", dim);
        fb.put_u32(x, y, snap.win_threshold, dim);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        y = self.draw_next_preview(fb, snap, panel_x, y, panel_w);
        y = y.saturating_add(1);

        fb.put_str(panel_x, y, "LAST LOCK", label);
        y = y.saturating_add(1);
        match snap.last_lock {
            Some(ev) => {
                let x = panel_x + fb.put_str(panel_x, y, "+", value);
                fb.put_u32(x, y, ev.points, value);
                y = y.saturating_add(1);
                let x = panel_x + fb.put_str(panel_x, y, "merges ", dim);
                fb.put_u32(x, y, ev.merges, value);
                y = y.saturating_add(1);
                let x = panel_x + fb.put_str(panel_x, y, "lines  ", dim);
                fb.put_u32(x, y, ev.lines_cleared, value);
            }
            None => {
                fb.put_str(panel_x, y, "-", value);
            }
        }
    }

    /// Draw the preview piece and return the first row below it.
    fn draw_next_preview(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        x: u16,
        y: u16,
        panel_w: u16,
    ) -> u16 {
        let Some(shape) = snap.next_shape else {
            fb.put_str(x, y, "-", CellStyle::default());
            return y.saturating_add(1);
        };

        let cols = snap.next.iter().map(|t| t.pos.col).max().unwrap_or(0) + 1;
        let rows = snap.next.iter().map(|t| t.pos.row).max().unwrap_or(0) + 1;
        if (cols as u16).saturating_mul(self.cell_w) > panel_w {
            fb.put_str(x, y, shape.as_str(), CellStyle::default());
            return y.saturating_add(1);
        }

        for tile in snap.next.iter() {
            let flipped = (rows - 1 - tile.pos.row) as u16;
            let px = x + (tile.pos.col as u16) * self.cell_w;
            let py = y + flipped * self.cell_h;
            self.draw_tile_at(fb, px, py, tile.value);
        }
        y.saturating_add((rows as u16) * self.cell_h)
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, l: Layout, text: &str) {
        let mid_y = l.y.saturating_add(l.h / 2);
        let text_w = text.chars().count() as u16;
        let x = l.x.saturating_add(l.w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        fb.put_str(x, mid_y, text, style);
    }
}

fn on_board(snap: &GameSnapshot, col: i32, row: i32) -> Option<(usize, usize)> {
    if col < 0 || row < 0 || col as usize >= snap.width || row as usize >= snap.height {
        return None;
    }
    Some((col as usize, row as usize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameSnapshot, Session};
    use crate::types::GameAction;

    fn row_text(fb: &FrameBuffer, y: u16) -> String {
        (0..fb.width())
            .map(|x| fb.get(x, y).unwrap_or_default().ch)
            .collect()
    }

    fn all_text(fb: &FrameBuffer) -> String {
        (0..fb.height())
            .map(|y| row_text(fb, y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn board_snapshot(width: usize, height: usize) -> GameSnapshot {
        GameSnapshot {
            width,
            height,
            cells: vec![0; width * height],
            win_threshold: 2048,
            started: true,
            ..GameSnapshot::default()
        }
    }

    #[test]
    fn test_bottom_row_is_drawn_last() {
        let mut snap = board_snapshot(4, 4);
        snap.cells[0] = 16;
        let view = GameView::default().with_anchor_y(AnchorY::Top);
        let fb = view.render(&snap, Viewport::new(22, 6));

        // Frame rows: 0 = top border, 1..=4 = board rows 3..=0, 5 = bottom border.
        assert!(row_text(&fb, 4).contains("16"));
        assert!(!row_text(&fb, 1).contains("16"));
    }

    #[test]
    fn test_tile_uses_palette_colour() {
        let mut snap = board_snapshot(4, 4);
        snap.cells[0] = 8;
        let view = GameView::default().with_anchor_y(AnchorY::Top);
        let fb = view.render(&snap, Viewport::new(22, 6));
        let cell = fb.get(1, 4).unwrap_or_default();
        assert_eq!(cell.style.bg, palette::tile_bg(8));
    }

    #[test]
    fn test_overlay_priority() {
        let mut snap = board_snapshot(4, 4);
        snap.game_over = true;
        snap.win = true;
        let fb = GameView::default().render(&snap, Viewport::new(40, 10));
        let text = all_text(&fb);
        assert!(text.contains("YOU WIN"));
        assert!(!text.contains("GAME OVER"));

        snap.win = false;
        let fb = GameView::default().render(&snap, Viewport::new(40, 10));
        assert!(all_text(&fb).contains("GAME OVER"));
    }

    #[test]
    fn test_side_panel_shows_score_and_next() {
        let mut session = Session::new(GameConfig::default(), 5).unwrap();
        session.start();
        session.apply_action(GameAction::HardDrop);
        let snap = session.snapshot();

        let fb = GameView::default().render(&snap, Viewport::new(100, 30));
        let text = all_text(&fb);
        assert!(text.contains("SCORE"));
        assert!(text.contains("NEXT"));
        assert!(text.contains("LAST LOCK"));
        assert!(text.contains("merges"));
    }

    #[test]
    fn test_tiny_viewport_does_not_panic() {
        let snap = board_snapshot(12, 20);
        let fb = GameView::default().render(&snap, Viewport::new(3, 2));
        assert_eq!(fb.width(), 3);
        assert_eq!(fb.height(), 2);
    }
}
