//! Frame loop
//!
//! Drives `sim::tick` once per frame and talks to the outside world through
//! three seams: an input source, a render sink and a frame pacer. The
//! platform side (windows, keyboards, pixels) implements those.

use std::time::{Duration, Instant};

use crate::settings::Settings;
use crate::sim::{ControlInput, Entity, ExitReason, GameState, Groups, Ship, TickStats, tick};

/// Largest dt handed to the simulation after a stall (seconds)
pub const MAX_FRAME_DT: f32 = 0.25;

/// Supplies the control snapshot for each tick
pub trait InputSource {
    fn poll_input(&mut self) -> ControlInput;
}

impl<F> InputSource for F
where
    F: FnMut() -> ControlInput,
{
    fn poll_input(&mut self) -> ControlInput {
        self()
    }
}

/// Receives the drawable set once per tick
pub trait RenderSink {
    fn render(&mut self, frame: &Frame<'_>);
}

impl<F> RenderSink for F
where
    F: FnMut(&Frame<'_>),
{
    fn render(&mut self, frame: &Frame<'_>) {
        self(frame)
    }
}

/// Paces the loop; returns seconds since the previous call
pub trait FramePacer {
    fn advance_frame(&mut self, target_fps: u32) -> f32;
}

/// Read-only view of the state after a tick
pub struct Frame<'a> {
    state: &'a GameState,
    stats: TickStats,
}

impl<'a> Frame<'a> {
    pub fn new(state: &'a GameState, stats: TickStats) -> Self {
        Self { state, stats }
    }

    /// Everything in the drawable group, in id order
    pub fn drawables(&self) -> impl Iterator<Item = &'a Entity> + 'a {
        self.state.registry.iter(Groups::DRAWABLE)
    }

    /// Live asteroids only
    pub fn asteroids(&self) -> impl Iterator<Item = &'a Entity> + 'a {
        self.state.registry.iter(Groups::ASTEROIDS)
    }

    /// The ship entity
    pub fn ship(&self) -> Option<&'a Entity> {
        self.state.registry.get(self.state.ship_id)
    }

    /// The ship's control state
    pub fn ship_state(&self) -> Option<Ship> {
        self.state.ship()
    }

    pub fn tick(&self) -> u64 {
        self.state.time_ticks
    }

    /// What happened during the tick that produced this frame
    pub fn stats(&self) -> TickStats {
        self.stats
    }
}

/// Outcome of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: ExitReason,
    pub ticks: u64,
    pub totals: TickStats,
}

/// Run the session until it terminates
///
/// Per iteration: poll input, tick, render, pace. The first tick runs with
/// `dt = 0`; later ticks use whatever the pacer measured. The loop leaves as
/// soon as the state is terminated, without rendering that tick.
pub fn run<I, S, P>(
    state: &mut GameState,
    settings: &Settings,
    input: &mut I,
    sink: &mut S,
    pacer: &mut P,
) -> RunSummary
where
    I: InputSource + ?Sized,
    S: RenderSink + ?Sized,
    P: FramePacer + ?Sized,
{
    log::info!(
        "Starting session (seed {}, target {} fps)",
        state.seed,
        settings.fps
    );

    let mut totals = TickStats::default();
    let mut dt = 0.0;

    let reason = loop {
        let controls = input.poll_input();
        let stats = tick(state, settings, &controls, dt);
        totals += stats;

        if let Some(reason) = state.exit_reason() {
            break reason;
        }

        sink.render(&Frame::new(state, stats));
        dt = pacer.advance_frame(settings.fps);
    };

    log::info!("{} ({} ticks)", reason.message(), state.time_ticks);
    RunSummary {
        reason,
        ticks: state.time_ticks,
        totals,
    }
}

/// Real-time pacer: sleeps out the rest of each frame budget
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
    // FPS tracking
    frame_times: [f32; 60],
    frame_index: usize,
    frames_seen: usize,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            frame_times: [0.0; 60],
            frame_index: 0,
            frames_seen: 0,
        }
    }

    /// Measured rate over the last (up to) 60 frames
    pub fn fps(&self) -> f32 {
        let n = self.frames_seen.min(self.frame_times.len());
        if n == 0 {
            return 0.0;
        }
        let total: f32 = self.frame_times[..n].iter().sum();
        if total > 0.0 { n as f32 / total } else { 0.0 }
    }
}

impl FramePacer for FrameClock {
    fn advance_frame(&mut self, target_fps: u32) -> f32 {
        let budget = Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1)));
        let elapsed = self.last.elapsed();
        if elapsed < budget {
            std::thread::sleep(budget - elapsed);
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;

        self.frame_times[self.frame_index] = dt;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();
        self.frames_seen += 1;

        dt.min(MAX_FRAME_DT)
    }
}

/// Pacer that never waits: every frame is exactly `1 / fps`
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedStep;

impl FramePacer for FixedStep {
    fn advance_frame(&mut self, target_fps: u32) -> f32 {
        1.0 / target_fps.max(1) as f32
    }
}

/// Render sink that logs a status line every `every` ticks
#[derive(Debug, Clone)]
pub struct StatusLog {
    pub every: u64,
}

impl RenderSink for StatusLog {
    fn render(&mut self, frame: &Frame<'_>) {
        if self.every == 0 || frame.tick() % self.every != 0 {
            return;
        }
        let asteroids = frame.asteroids().count();
        let drawn = frame.drawables().count();
        match frame.ship() {
            Some(ship) => log::debug!(
                "Tick {}: {} drawables, {} asteroids, ship at ({:.0}, {:.0})",
                frame.tick(),
                drawn,
                asteroids,
                ship.body.pos.x,
                ship.body.pos.y
            ),
            None => log::debug!("Tick {}: {} drawables, {} asteroids", frame.tick(), drawn, asteroids),
        }
    }
}
