//! Terminal surface: a grid of styled character cells.
//!
//! Playfield units map onto cells through a fixed cell size. Each frame is
//! drawn into the grid, then `present` writes the whole grid out with
//! crossterm commands.

use std::io::{self, Write};

use crossterm::{
    QueueableCommand, cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
};
use glam::Vec2;

use super::{Sprite, Surface};
use crate::sim::{Playfield, Rgb, TextMetrics};

const PLAYER_GLYPH: &str = "/^\\";
const SHOT_GLYPH: char = '•';

/// Per-cell styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub underline: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            underline: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    cell_size: Vec2,
    cells: Vec<Cell>,
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16, cell_width: f32, cell_height: f32) -> Self {
        Self {
            cols,
            rows,
            cell_size: Vec2::new(cell_width.max(1.0), cell_height.max(1.0)),
            cells: vec![Cell::default(); cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Playfield covered by the grid
    pub fn playfield(&self) -> Playfield {
        let size = self.size();
        Playfield::new(size.x, size.y)
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.cells
            .resize(cols as usize * rows as usize, Cell::default());
    }

    #[inline]
    fn idx(&self, col: i64, row: i64) -> Option<usize> {
        if col < 0 || row < 0 || col >= i64::from(self.cols) || row >= i64::from(self.rows) {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<Cell> {
        self.idx(i64::from(col), i64::from(row)).map(|i| self.cells[i])
    }

    /// Characters of one row, for inspection
    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|col| self.cell(col, row).map(|c| c.ch))
            .collect()
    }

    fn column_of(&self, x: f32) -> i64 {
        (x / self.cell_size.x).floor() as i64
    }

    /// Row holding text whose baseline sits at `y`
    fn text_row(&self, y: f32) -> i64 {
        ((y - self.cell_size.y) / self.cell_size.y).round() as i64
    }

    fn put_str(&mut self, text: &str, pos: Vec2, style: CellStyle) {
        let row = self.text_row(pos.y);
        let start = self.column_of(pos.x);
        for (i, ch) in text.chars().enumerate() {
            if let Some(idx) = self.idx(start + i as i64, row) {
                self.cells[idx].ch = ch;
                self.cells[idx].style.fg = style.fg;
                self.cells[idx].style.underline = style.underline;
            }
        }
    }

    /// Write the grid to `out`, changing styles only where they differ
    pub fn present<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut current: Option<CellStyle> = None;
        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            for col in 0..self.cols {
                let Some(cell) = self.cell(col, row) else {
                    continue;
                };
                if current != Some(cell.style) {
                    out.queue(SetForegroundColor(to_color(cell.style.fg)))?;
                    out.queue(SetBackgroundColor(to_color(cell.style.bg)))?;
                    out.queue(SetAttribute(if cell.style.underline {
                        Attribute::Underlined
                    } else {
                        Attribute::NoUnderline
                    }))?;
                    current = Some(cell.style);
                }
                out.queue(Print(cell.ch))?;
            }
        }
        out.queue(ResetColor)?;
        out.flush()
    }
}

impl TextMetrics for TerminalSurface {
    fn measure_text(&self, text: &str) -> Vec2 {
        Vec2::new(text.chars().count() as f32 * self.cell_size.x, self.cell_size.y)
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(
            f32::from(self.cols) * self.cell_size.x,
            f32::from(self.rows) * self.cell_size.y,
        )
    }

    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Rgb) {
        let c0 = self.column_of(pos.x);
        let r0 = (pos.y / self.cell_size.y).floor() as i64;
        let c1 = self.column_of(pos.x + size.x - f32::EPSILON);
        let r1 = ((pos.y + size.y - f32::EPSILON) / self.cell_size.y).floor() as i64;
        for row in r0..=r1 {
            for col in c0..=c1 {
                if let Some(idx) = self.idx(col, row) {
                    self.cells[idx] = Cell {
                        ch: ' ',
                        style: CellStyle {
                            bg: color,
                            ..CellStyle::default()
                        },
                    };
                }
            }
        }
    }

    fn sprite_size(&self, sprite: Sprite) -> Option<Vec2> {
        match sprite {
            Sprite::Player => Some(self.measure_text(PLAYER_GLYPH)),
        }
    }

    fn draw_image(&mut self, sprite: Sprite, pos: Vec2, size: Vec2) {
        match sprite {
            Sprite::Player => {
                // Sprite position is its top-left corner
                let baseline = Vec2::new(pos.x, pos.y + size.y);
                let style = CellStyle {
                    fg: Rgb::new(255, 255, 255),
                    ..CellStyle::default()
                };
                self.put_str(PLAYER_GLYPH, baseline, style);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, _radius: f32, color: Rgb) {
        let col = self.column_of(center.x);
        let row = (center.y / self.cell_size.y).floor() as i64;
        if let Some(idx) = self.idx(col, row) {
            self.cells[idx].ch = SHOT_GLYPH;
            self.cells[idx].style.fg = color;
        }
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, color: Rgb) {
        let style = CellStyle {
            fg: color,
            ..CellStyle::default()
        };
        self.put_str(text, pos, style);
    }

    fn stroke_text(&mut self, text: &str, pos: Vec2, color: Rgb) {
        let style = CellStyle {
            fg: color,
            underline: true,
            ..CellStyle::default()
        };
        self.put_str(text, pos, style);
    }
}
