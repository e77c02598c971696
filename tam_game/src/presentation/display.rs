//! Display worker.
//!
//! Screens: startup animation (runs until stopped), a line of text, and the
//! score. Drawing goes through the [`Canvas`] primitives so any 178×128
//! monochrome panel can back it.

use super::PresentationError;
use super::latch::CommandLatch;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tam_common::consts::TITLE;
use tracing::{debug, error, trace};

/// Panel width [px].
pub const SCREEN_WIDTH: i32 = 178;

/// Panel height [px].
pub const SCREEN_HEIGHT: i32 = 128;

const CENTER_X: i32 = SCREEN_WIDTH / 2;

// ─── Primitives ─────────────────────────────────────────────────────

/// Panel fonts, smallest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Small,
    Default,
    Large,
}

impl Font {
    /// Glyph height [px].
    pub const fn height(self) -> i32 {
        match self {
            Self::Small => 8,
            Self::Default => 16,
            Self::Large => 32,
        }
    }
}

/// Horizontal anchor of a text position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    HCenter,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Black,
    White,
}

/// Drawing primitives of a monochrome panel.
pub trait Canvas: Send {
    fn clear(&mut self) -> Result<(), PresentationError>;

    /// Outline a rectangle.
    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), PresentationError>;

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, ink: Ink)
    -> Result<(), PresentationError>;

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font: Font,
        anchor: Anchor,
    ) -> Result<(), PresentationError>;

    fn draw_dotted_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32)
    -> Result<(), PresentationError>;

    /// Rendered width of `text` [px].
    fn text_width(&self, text: &str, font: Font) -> i32;

    /// Keep the current frame on screen.
    fn hold(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

// ─── Commands ───────────────────────────────────────────────────────

/// Request for the display worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCommand {
    /// Intro, then the idle scene until `stop_animation`.
    StartupAnimation,
    /// One centred line in the largest font that fits.
    Text(String),
    /// Score screen.
    Score { player1: u32, player2: u32 },
}

/// Frame times of the startup animation.
#[derive(Debug, Clone, Copy)]
pub struct DisplayTiming {
    /// Per growing square
    pub square: Duration,
    /// Per title size
    pub title: Duration,
    /// Per step of the idle ball
    pub frame: Duration,
}

impl Default for DisplayTiming {
    fn default() -> Self {
        Self {
            square: Duration::from_millis(50),
            title: Duration::from_millis(1000),
            frame: Duration::from_millis(30),
        }
    }
}

// ─── Screens ────────────────────────────────────────────────────────

struct Screens<'a> {
    canvas: &'a mut dyn Canvas,
    timing: DisplayTiming,
}

impl Screens<'_> {
    fn startup_animation(&mut self, animating: &AtomicBool) -> Result<(), PresentationError> {
        let c = &mut *self.canvas;
        let running = || animating.load(Ordering::Acquire);
        c.clear()?;

        for n in (0..SCREEN_WIDTH / 2).step_by(2) {
            if !running() {
                return c.clear();
            }
            c.draw_rect(CENTER_X - n, SCREEN_HEIGHT / 2 - n, 2 * n, 2 * n)?;
            c.hold(self.timing.square);
        }

        let pad = 5;
        for (size, font) in [(8, Font::Small), (16, Font::Default), (32, Font::Large)] {
            if !running() {
                return c.clear();
            }
            let k = if size == 8 { 5 } else { 6 };
            c.fill_rect(
                (SCREEN_WIDTH - size * k) / 2 - pad,
                SCREEN_HEIGHT / 2 - size / 2 - pad,
                size * k + 2 * pad,
                size + 2 * pad,
                Ink::White,
            )?;
            c.draw_text(TITLE, CENTER_X, SCREEN_HEIGHT / 2 - size / 2, font, Anchor::HCenter)?;
            c.hold(self.timing.title);
        }

        c.clear()?;
        c.draw_text(TITLE, CENTER_X, 0, Font::Default, Anchor::HCenter)?;
        let (pad_w, pad_h) = (5, 20);
        c.fill_rect(0, SCREEN_HEIGHT / 2 - pad_h / 2, pad_w, pad_h, Ink::Black)?;
        c.fill_rect(
            SCREEN_WIDTH - pad_w,
            SCREEN_HEIGHT / 2 - pad_h / 2,
            pad_w,
            pad_h,
            Ink::Black,
        )?;

        let row = SCREEN_HEIGHT / 2;
        while running() {
            for i in (5..=CENTER_X).rev() {
                if !running() {
                    break;
                }
                c.fill_rect(i, row, 2, 2, Ink::Black)?;
                c.hold(self.timing.frame);
                c.fill_rect(i + 2, row, 2, 2, Ink::White)?;
            }
            for j in 6..172 {
                if !running() {
                    break;
                }
                c.fill_rect(j, row, 2, 2, Ink::Black)?;
                c.hold(self.timing.frame);
                if j > 6 {
                    c.fill_rect(j - 2, row, 2, 2, Ink::White)?;
                }
            }
            for k in (CENTER_X + 1..=172).rev() {
                if !running() {
                    break;
                }
                c.fill_rect(k, row, 2, 2, Ink::Black)?;
                c.hold(self.timing.frame);
                if k < 170 {
                    c.fill_rect(k + 2, row, 2, 2, Ink::White)?;
                }
            }
        }

        c.clear()
    }

    fn text(&mut self, text: &str) -> Result<(), PresentationError> {
        let c = &mut *self.canvas;
        c.clear()?;
        let font = [Font::Large, Font::Default]
            .into_iter()
            .find(|&font| c.text_width(text, font) <= SCREEN_WIDTH)
            .unwrap_or(Font::Small);
        c.draw_text(
            text,
            CENTER_X,
            SCREEN_HEIGHT / 2 - font.height() / 2,
            font,
            Anchor::HCenter,
        )
    }

    fn score(&mut self, player1: u32, player2: u32) -> Result<(), PresentationError> {
        let c = &mut *self.canvas;
        let offset = 40;
        c.clear()?;
        c.draw_text(TITLE, CENTER_X, 0, Font::Default, Anchor::HCenter)?;
        c.draw_text(
            &player1.to_string(),
            CENTER_X + offset,
            48,
            Font::Large,
            Anchor::Left,
        )?;
        c.draw_text(
            &player2.to_string(),
            CENTER_X - offset,
            48,
            Font::Large,
            Anchor::Right,
        )?;
        c.draw_dotted_line(CENTER_X, 20, CENTER_X, SCREEN_HEIGHT)
    }
}

// ─── Worker ─────────────────────────────────────────────────────────

/// Handle to the display worker thread.
pub struct Display {
    latch: Arc<CommandLatch<DisplayCommand>>,
    animating: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Display {
    /// Start the worker on its own thread.
    pub fn spawn(
        mut canvas: Box<dyn Canvas>,
        timing: DisplayTiming,
    ) -> Result<Self, PresentationError> {
        let latch = Arc::new(CommandLatch::new());
        let animating = Arc::new(AtomicBool::new(false));

        let worker = {
            let latch = latch.clone();
            let animating = animating.clone();
            thread::Builder::new()
                .name("display".to_string())
                .spawn(move || {
                    let mut screens = Screens {
                        canvas: canvas.as_mut(),
                        timing,
                    };
                    run_display(&mut screens, &latch, &animating);
                })
                .map_err(|e| PresentationError::Device(e.to_string()))?
        };

        Ok(Self {
            latch,
            animating,
            worker: Some(worker),
        })
    }

    /// Run the startup animation until [`Display::stop_animation`].
    pub fn startup_animation(&self) {
        self.animating.store(true, Ordering::Release);
        self.latch.post(DisplayCommand::StartupAnimation);
    }

    pub fn stop_animation(&self) {
        self.animating.store(false, Ordering::Release);
    }

    /// Show one line of text; an empty string blanks the screen.
    pub fn print(&self, text: impl Into<String>) {
        self.latch.post(DisplayCommand::Text(text.into()));
    }

    pub fn show_score(&self, player1: u32, player2: u32) {
        self.latch.post(DisplayCommand::Score { player1, player2 });
    }

    /// Stop the worker once the pending command is drawn.
    pub fn shutdown(mut self) {
        self.close();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }

    fn close(&self) {
        self.stop_animation();
        self.latch.close();
    }
}

impl Drop for Display {
    fn drop(&mut self) {
        self.close();
    }
}

fn run_display(
    screens: &mut Screens<'_>,
    latch: &CommandLatch<DisplayCommand>,
    animating: &AtomicBool,
) {
    while let Some(command) = latch.wait() {
        trace!("Display: {:?}", command);
        let result = match &command {
            DisplayCommand::StartupAnimation => screens.startup_animation(animating),
            DisplayCommand::Text(text) => screens.text(text),
            DisplayCommand::Score { player1, player2 } => screens.score(*player1, *player2),
        };
        if let Err(e) = result {
            error!("Display worker stopped on {:?}: {}", command, e);
            return;
        }
    }
    debug!("Display worker finished");
}

// ─── Tracing canvas ─────────────────────────────────────────────────

/// Canvas that logs what it would draw and keeps every line of text.
pub struct TracingCanvas {
    texts: Arc<Mutex<Vec<String>>>,
    paced: bool,
}

impl TracingCanvas {
    /// Holds frames for their full duration.
    pub fn new() -> Self {
        Self {
            texts: Arc::default(),
            paced: true,
        }
    }

    /// Never waits between frames.
    pub fn unpaced() -> Self {
        Self {
            paced: false,
            ..Self::new()
        }
    }

    /// Shared list of every text drawn so far.
    pub fn transcript(&self) -> Arc<Mutex<Vec<String>>> {
        self.texts.clone()
    }
}

impl Default for TracingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for TracingCanvas {
    fn clear(&mut self) -> Result<(), PresentationError> {
        trace!("lcd: clear");
        Ok(())
    }

    fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<(), PresentationError> {
        trace!("lcd: rect ({}, {}) {}x{}", x, y, w, h);
        Ok(())
    }

    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        ink: Ink,
    ) -> Result<(), PresentationError> {
        trace!("lcd: fill {:?} ({}, {}) {}x{}", ink, x, y, w, h);
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        font: Font,
        anchor: Anchor,
    ) -> Result<(), PresentationError> {
        debug!("lcd: \"{}\" at ({}, {}) {:?} {:?}", text, x, y, font, anchor);
        self.texts.lock().push(text.to_string());
        Ok(())
    }

    fn draw_dotted_line(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
    ) -> Result<(), PresentationError> {
        trace!("lcd: dotted ({}, {}) -> ({}, {})", x0, y0, x1, y1);
        Ok(())
    }

    fn text_width(&self, text: &str, font: Font) -> i32 {
        let glyph = match font {
            Font::Small => 6,
            Font::Default => 10,
            Font::Large => 20,
        };
        glyph * text.chars().count() as i32
    }

    fn hold(&mut self, duration: Duration) {
        if self.paced {
            thread::sleep(duration);
        }
    }
}
