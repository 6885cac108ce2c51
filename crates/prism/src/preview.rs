//! Minimal minifb preview windows (feature `preview-window`).

use std::{
    collections::{HashMap, hash_map::Entry},
    time::Duration,
};

use minifb::{Key, KeyRepeat, Window, WindowOptions};

use prism_core::prelude::*;

use crate::present::{DisplaySink, InputEvent, InputPoll, PresentError};

struct WindowState {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

/// One window per displayed stream, plus key input.
///
/// Up/Down raise/lower the compression target; Escape (or closing any
/// window) requests shutdown.
///
/// # Example
/// ```rust,ignore
/// use prism::prelude::*;
///
/// let mut ui = PreviewUi::new();
/// let outcome = PresentLoop::new().run(&mut pipeline, &mut ui)?;
/// # Ok::<(), prism::present::PresentError>(())
/// ```
#[derive(Default)]
pub struct PreviewUi {
    windows: HashMap<String, WindowState>,
    closed: bool,
}

impl PreviewUi {
    /// Create an empty UI; windows open lazily on first display.
    pub fn new() -> Self {
        Self::default()
    }

    fn window_for(
        &mut self,
        name: &str,
        width: usize,
        height: usize,
    ) -> Result<&mut WindowState, PresentError> {
        match self.windows.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let mut window = Window::new(name, width, height, WindowOptions::default())
                    .map_err(|e| PresentError::Display(e.to_string()))?;
                window.limit_update_rate(Some(Duration::from_millis(16)));
                Ok(entry.insert(WindowState {
                    window,
                    buffer: vec![0; width * height],
                    width,
                    height,
                }))
            }
        }
    }
}

impl DisplaySink for PreviewUi {
    fn display(&mut self, name: &str, frame: &Frame) -> Result<(), PresentError> {
        let width = frame.width();
        let height = frame.height();
        let state = self.window_for(name, width, height)?;
        if state.window.is_open() {
            if state.width != width || state.height != height {
                state.width = width;
                state.height = height;
                state.buffer.resize(width * height, 0);
            }

            for y in 0..height {
                let row = frame.row(y);
                for x in 0..width {
                    let i = x * RGB24_BYTES_PER_PIXEL;
                    if i + RGB24_BYTES_PER_PIXEL > row.len() {
                        break;
                    }
                    let (r, g, b) = (row[i], row[i + 1], row[i + 2]);
                    state.buffer[y * width + x] =
                        (0xFF << 24) | (r as u32) << 16 | (g as u32) << 8 | (b as u32);
                }
            }
            return state
                .window
                .update_with_buffer(&state.buffer, width, height)
                .map_err(|e| PresentError::Display(e.to_string()));
        }
        self.closed = true;
        Ok(())
    }

    fn status(&mut self, line: &str) {
        if let Some(state) = self.windows.get_mut("encoded") {
            state.window.set_title(&format!("encoded — {line}"));
        }
    }
}

impl InputPoll for PreviewUi {
    fn poll(&mut self) -> InputEvent {
        if self.closed || self.windows.values().any(|s| !s.window.is_open()) {
            return InputEvent::Shutdown;
        }
        for state in self.windows.values() {
            if state.window.is_key_down(Key::Escape) {
                return InputEvent::Shutdown;
            }
            if state.window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
                return InputEvent::RaiseTarget;
            }
            if state.window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
                return InputEvent::LowerTarget;
            }
        }
        InputEvent::None
    }
}
