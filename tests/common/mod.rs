//! Shared test doubles.
#![allow(dead_code)]

use hapticsim::Clock;
use std::cell::Cell;

/// Clock under test control. Every reading is counted and then advanced by
/// `step_ms`, so busy-waits terminate.
pub struct ScriptedClock {
    now_ms: Cell<f64>,
    step_ms: f64,
    reads: Cell<u64>,
}

impl ScriptedClock {
    pub fn fixed(now_ms: f64) -> Self {
        Self::stepping(now_ms, 0.0)
    }

    pub fn stepping(start_ms: f64, step_ms: f64) -> Self {
        ScriptedClock {
            now_ms: Cell::new(start_ms),
            step_ms,
            reads: Cell::new(0),
        }
    }

    pub fn set(&self, now_ms: f64) {
        self.now_ms.set(now_ms);
    }

    pub fn now(&self) -> f64 {
        self.now_ms.get()
    }

    pub fn reads(&self) -> u64 {
        self.reads.get()
    }
}

impl Clock for ScriptedClock {
    fn elapsed_ms(&self) -> f64 {
        let now = self.now_ms.get();
        self.now_ms.set(now + self.step_ms);
        self.reads.set(self.reads.get() + 1);
        now
    }
}

use hapticsim::{DeviceStatus, IterationReport, LoopObserver, Renderer, StopFlag};

/// Keeps every presented frame's text lines.
#[derive(Default)]
pub struct RecordingRenderer {
    pending: Vec<String>,
    pub frames: Vec<Vec<String>>,
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn draw_text(&mut self, _x: i32, _y: i32, text: &str) {
        self.pending.push(text.to_string());
    }

    fn present(&mut self) {
        self.frames.push(std::mem::take(&mut self.pending));
    }
}

/// Records statuses and reports; optionally raises a stop after a frame.
#[derive(Default)]
pub struct RecordingObserver {
    pub statuses: Vec<DeviceStatus>,
    pub reports: Vec<IterationReport>,
    pub laws_applied: u64,
    pub integrations: u64,
    pub stop_after: Option<(u64, StopFlag)>,
}

impl LoopObserver for RecordingObserver {
    fn on_laws_applied(&mut self) {
        self.laws_applied += 1;
    }

    fn on_integrate(&mut self) {
        self.integrations += 1;
    }

    fn on_device_status(&mut self, status: DeviceStatus) {
        self.statuses.push(status);
    }

    fn on_iteration(&mut self, report: &IterationReport) {
        self.reports.push(*report);
        if let Some((frame, stop)) = &self.stop_after {
            if report.frame == *frame {
                stop.request();
            }
        }
    }
}
