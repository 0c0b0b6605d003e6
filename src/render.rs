//! Renderer capability interface for the diagnostic overlay.

use alloc::string::String;
use alloc::vec::Vec as AllocVec;

/// Minimal immediate-mode text surface.
pub trait Renderer {
    fn clear(&mut self);
    fn draw_text(&mut self, x: i32, y: i32, text: &str);
    fn present(&mut self);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn clear(&mut self) { (**self).clear() }
    fn draw_text(&mut self, x: i32, y: i32, text: &str) { (**self).draw_text(x, y, text) }
    fn present(&mut self) { (**self).present() }
}

/// Discards everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn clear(&mut self) {}
    fn draw_text(&mut self, _x: i32, _y: i32, _text: &str) {}
    fn present(&mut self) {}
}

/// Writes presented frames to the log at trace level.
///
/// Only every `every`-th frame is emitted.
#[derive(Debug)]
pub struct LogRenderer {
    lines: AllocVec<String>,
    every: u64,
    presented: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        LogRenderer {
            lines: AllocVec::new(),
            every: every.max(1),
            presented: 0,
        }
    }

    pub fn presented(&self) -> u64 { self.presented }

    /// Whether the next `present` writes to the log.
    fn due(&self) -> bool {
        self.presented % self.every == 0
    }
}

impl Default for LogRenderer {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl Renderer for LogRenderer {
    fn clear(&mut self) {
        self.lines.clear();
    }

    fn draw_text(&mut self, _x: i32, _y: i32, text: &str) {
        self.lines.push(String::from(text));
    }

    fn present(&mut self) {
        if self.due() {
            log::trace!(target: "hapticsim::overlay", "{}", self.lines.join(" | "));
        }
        self.presented += 1;
    }
}
