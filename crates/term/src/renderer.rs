//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Frames are diffed against the previously presented one and only changed
//! runs of cells are re-emitted. The first frame and any size change fall back
//! to a full redraw.

use std::io::{self, Write};

use anyhow::{Context, Result};

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    /// Last presented frame; `None` forces a full redraw.
    prev: Option<FrameBuffer>,
    buf: Vec<u8>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            prev: None,
            buf: Vec::with_capacity(64 * 1024),
        }
    }

    /// Switch the terminal into raw mode on the alternate screen.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()
    }

    /// Restore the terminal. Safe to call after a failed `enter`.
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode().context("disable raw mode")?;
        Ok(())
    }

    /// Force the next draw to be a full redraw (e.g. after a resize).
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    /// Present a frame.
    ///
    /// The presented frame is kept for the next diff and the caller gets the
    /// previous frame's buffer back in `fb`, ready to be drawn over.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        match self.prev.take() {
            Some(mut prev) if prev.width() == fb.width() && prev.height() == fb.height() => {
                encode_diff_into(&prev, fb, &mut self.buf)?;
                std::mem::swap(&mut prev, fb);
                self.prev = Some(prev);
            }
            stale => {
                encode_full_into(fb, &mut self.buf)?;
                let mut back =
                    stale.unwrap_or_else(|| FrameBuffer::new(fb.width(), fb.height()));
                back.resize(fb.width(), fb.height());
                std::mem::swap(&mut back, fb);
                self.prev = Some(back);
            }
        }
        self.flush_buf()
    }

    /// Consume the renderer and return its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out.write_all(&self.buf)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Tracks the active terminal style so unchanged styles are not re-sent.
struct Pen<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> Pen<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn print(&mut self, ch: char, style: CellStyle) -> Result<()> {
        if self.style != Some(style) {
            self.out.queue(SetForegroundColor(to_color(style.fg)))?;
            self.out.queue(SetBackgroundColor(to_color(style.bg)))?;
            self.out.queue(SetAttribute(Attribute::Reset))?;
            if style.bold {
                self.out.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                self.out.queue(SetAttribute(Attribute::Dim))?;
            }
            self.style = Some(style);
        }
        self.out.queue(Print(ch))?;
        Ok(())
    }

    fn finish(self) -> Result<()> {
        self.out.queue(ResetColor)?;
        self.out.queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;

    let mut pen = Pen::new(out);
    for y in 0..fb.height() {
        for x in 0..fb.width() {
            let cell = fb.get(x, y).unwrap_or_default();
            pen.print(cell.ch, cell.style)?;
        }
        if y + 1 < fb.height() {
            pen.out.queue(Print("\r\n"))?;
        }
    }
    pen.finish()
}

/// Encode only the runs that differ between `prev` and `next` into `out`.
///
/// Both framebuffers must have the same size; otherwise every row is emitted.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut pen = Pen::new(out);
    for run in changed_runs(prev, next) {
        pen.out.queue(cursor::MoveTo(run.x, run.y))?;
        for x in run.x..run.x + run.len {
            let cell = next.get(x, run.y).unwrap_or_default();
            pen.print(cell.ch, cell.style)?;
        }
    }
    pen.finish()
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// A horizontal span of changed cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    x: u16,
    y: u16,
    len: u16,
}

fn changed_runs<'a>(prev: &'a FrameBuffer, next: &'a FrameBuffer) -> impl Iterator<Item = Run> + 'a {
    let w = next.width();
    let same_size = prev.width() == w && prev.height() == next.height();

    (0..next.height()).flat_map(move |y| {
        let mut runs = Vec::new();
        if !same_size {
            runs.push(Run { x: 0, y, len: w });
            return runs;
        }
        let differs = |x: u16| prev.get(x, y) != next.get(x, y);
        let mut x = 0;
        while x < w {
            if !differs(x) {
                x += 1;
                continue;
            }
            let start = x;
            while x < w && differs(x) {
                x += 1;
            }
            runs.push(Run {
                x: start,
                y,
                len: x - start,
            });
        }
        runs
    })
}
