//! Run a headless preview simulation of an edit.
//!
//! Drives the preview scheduler against the simulated surface and
//! prints the phase transitions, which makes loop and boomerang
//! behavior inspectable without a window. By default simulated time
//! runs as fast as possible; `--realtime` paces the loop off the
//! monotonic clock instead.

use std::path::PathBuf;

use clipstick_common::clock::{FramePacer, TickClock};
use clipstick_edit_model::EditSpec;
use clipstick_preview::{PlaybackPhase, PlaybackSurface, PreviewScheduler, SimulatedSurface};
use clipstick_render_engine::probe_media;

use super::EditArgs;

const TICK_HZ: u32 = 60;

pub fn run(path: PathBuf, edit: EditArgs, secs: f64, realtime: bool) -> anyhow::Result<()> {
    let info = probe_media(&path)?;
    let spec = edit.to_spec(&info)?;

    let mut surface = SimulatedSurface::new(info.duration_secs);
    let mut scheduler = PreviewScheduler::new();
    scheduler.reset(&spec, &mut surface);

    println!(
        "Simulating {secs:.1}s of preview over a {:.2}s selection",
        spec.trim.duration_secs()
    );

    if realtime {
        run_realtime(&spec, &mut surface, &mut scheduler, secs);
    } else {
        run_simulated(&spec, &mut surface, &mut scheduler, secs);
    }

    println!(
        "Final: playhead={:.3}s rate={:.2} {}",
        surface.position_secs(),
        surface.rate(),
        if surface.is_paused() { "(paused)" } else { "" }
    );

    Ok(())
}

/// Tick at a fixed simulated cadence, as fast as the host allows.
fn run_simulated(
    spec: &EditSpec,
    surface: &mut SimulatedSurface,
    scheduler: &mut PreviewScheduler,
    secs: f64,
) {
    let dt = 1.0 / f64::from(TICK_HZ);
    let steps = (secs / dt).ceil() as usize;
    let mut now = 0.0;
    let mut watcher = PhaseWatcher::new(scheduler.phase());

    for _ in 0..steps {
        now += dt;
        surface.advance(dt);
        scheduler.tick(spec, surface, now);
        watcher.report(scheduler, surface, now);
    }
}

/// Tick off the monotonic clock, paced to the target cadence.
fn run_realtime(
    spec: &EditSpec,
    surface: &mut SimulatedSurface,
    scheduler: &mut PreviewScheduler,
    secs: f64,
) {
    let clock = TickClock::start();
    let mut pacer = FramePacer::new(TICK_HZ);
    let mut watcher = PhaseWatcher::new(scheduler.phase());
    let mut last = 0.0;

    println!("Session started at {}", clock.epoch_wall());

    while clock.now_secs() < secs {
        let now = clock.now_secs();
        if pacer.should_tick(now) {
            surface.advance(now - last);
            scheduler.tick(spec, surface, now);
            watcher.report(scheduler, surface, now);
            last = now;
        }
        std::thread::sleep(std::time::Duration::from_millis(2));
    }
}

/// Prints a line whenever the loop phase flips.
struct PhaseWatcher {
    last_phase: PlaybackPhase,
}

impl PhaseWatcher {
    fn new(phase: PlaybackPhase) -> Self {
        Self { last_phase: phase }
    }

    fn report(&mut self, scheduler: &PreviewScheduler, surface: &SimulatedSurface, now: f64) {
        let phase = scheduler.phase();
        if phase != self.last_phase {
            let label = match phase {
                PlaybackPhase::Forward => "forward",
                PlaybackPhase::Reversing => "reversing",
            };
            println!(
                "  t={now:.2}s  playhead={:.3}s  rate={:.2}  -> {label}",
                surface.position_secs(),
                surface.rate(),
            );
            self.last_phase = phase;
        }
    }
}
