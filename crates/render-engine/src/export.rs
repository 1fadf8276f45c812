//! Export job management and the ffmpeg transform engine.

use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};

use clipstick_common::{ClipstickError, ClipstickResult};
use clipstick_edit_model::EditSpec;
use clipstick_timeline_core::check_duration;

use crate::compile::compile;
use crate::encode::EncoderConstraints;

/// An export job ready to be rendered.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// Source media file.
    pub input_path: PathBuf,

    /// Output sticker path.
    pub output_path: PathBuf,

    /// The edit to render.
    pub spec: EditSpec,
}

/// Progress callback for export rendering.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send>;

/// Export progress report.
#[derive(Debug, Clone)]
pub struct ExportProgress {
    /// Current progress [0.0, 1.0].
    pub progress: f64,

    /// Output seconds encoded so far.
    pub out_time_secs: f64,

    /// Expected output duration (from the oracle).
    pub expected_secs: f64,

    /// Current stage.
    pub stage: ExportStage,
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    Encoding,
    Finalizing,
    Complete,
}

/// A fully planned engine invocation: argument list plus the compiled
/// filtergraph text kept for diagnostics.
#[derive(Debug, Clone)]
pub struct ExportPlan {
    pub ffmpeg_args: Vec<String>,
    pub filtergraph: String,
    pub expected_duration_secs: f64,
}

/// Trait for transform engines executing a compiled plan.
pub trait TransformEngine: Send {
    /// Execute the planned invocation.
    fn run(&mut self, plan: &ExportPlan, progress: Option<ProgressCallback>)
        -> ClipstickResult<()>;

    /// Check if this engine is available on the system.
    fn is_available(&self) -> bool;

    /// Engine name.
    fn name(&self) -> &str;
}

/// Plan the engine invocation for a job: validate, check the duration
/// policy (fail fast, no engine involved), compile the graph, and
/// derive the bitrate envelope.
pub fn build_plan(job: &ExportJob) -> ClipstickResult<ExportPlan> {
    job.spec
        .validate()
        .map_err(|e| ClipstickError::invariant(e.to_string()))?;

    let report = check_duration(&job.spec);
    if !report.within_limit() {
        return Err(ClipstickError::DurationExceeded {
            output_secs: report.output_secs,
            max_secs: report.max_secs,
        });
    }

    let graph = compile(&job.spec);
    let filtergraph = graph.to_filter_complex();
    let envelope = EncoderConstraints::derive(&job.spec.constraints, report.output_secs);

    let mut args = vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-nostats".to_string(),
        "-progress".to_string(),
        "pipe:1".to_string(),
        "-i".to_string(),
        job.input_path.display().to_string(),
        "-filter_complex".to_string(),
        filtergraph.clone(),
        "-map".to_string(),
        graph.sink().to_string(),
        "-an".to_string(),
        "-r".to_string(),
        job.spec.constraints.target_fps.to_string(),
        "-f".to_string(),
        "webm".to_string(),
        "-c:v".to_string(),
        "libvpx-vp9".to_string(),
    ];
    args.extend(envelope.to_ffmpeg_args());
    args.push(job.output_path.display().to_string());

    tracing::info!(
        expected_secs = report.output_secs,
        stages = graph.stages().len(),
        target_kbps = envelope.target_kbps,
        filter_len = filtergraph.len(),
        "Export plan built"
    );

    Ok(ExportPlan {
        ffmpeg_args: args,
        filtergraph,
        expected_duration_secs: report.output_secs,
    })
}

/// Export the job to a sticker file.
///
/// This is the main entry point for rendering.
pub async fn export_clip(
    job: ExportJob,
    progress: Option<ProgressCallback>,
) -> ClipstickResult<PathBuf> {
    tracing::info!(
        input = %job.input_path.display(),
        output = %job.output_path.display(),
        "Starting export"
    );

    if !job.input_path.exists() {
        return Err(ClipstickError::FileNotFound {
            path: job.input_path,
        });
    }

    if let Some(parent) = job.output_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if let Some(cb) = &progress {
        cb(ExportProgress {
            progress: 0.0,
            out_time_secs: 0.0,
            expected_secs: 0.0,
            stage: ExportStage::Preparing,
        });
    }

    let engine = FfmpegEngine::new();
    if !engine.is_available() {
        return Err(ClipstickError::unsupported(
            "No supported transform engine found (expected ffmpeg in PATH)",
        ));
    }

    let plan = build_plan(&job)?;
    tracing::info!(engine = engine.name(), "Using transform engine");

    // The engine blocks on the child process; keep it off the runtime.
    tokio::task::spawn_blocking(move || {
        let mut engine = engine;
        engine.run(&plan, progress)
    })
    .await
    .map_err(|e| ClipstickError::render(format!("Export task failed: {e}")))??;

    Ok(job.output_path)
}

/// Guards the one-export-at-a-time rule for an editing session.
///
/// No queuing and no cancellation: while an export is in flight a
/// second request is rejected with [`ClipstickError::ExportBusy`] until
/// the first settles, success or failure.
#[derive(Debug, Default)]
pub struct ExportSession {
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the export settles.
#[derive(Debug)]
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ExportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an export is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> ClipstickResult<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ClipstickError::ExportBusy)?;
        Ok(InFlightGuard(&self.in_flight))
    }

    /// Run an export under the session's in-flight gate.
    pub async fn export(
        &self,
        job: ExportJob,
        progress: Option<ProgressCallback>,
    ) -> ClipstickResult<PathBuf> {
        let _guard = self.try_begin()?;
        export_clip(job, progress).await
    }
}

/// The ffmpeg-backed transform engine.
pub struct FfmpegEngine;

impl FfmpegEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformEngine for FfmpegEngine {
    fn run(
        &mut self,
        plan: &ExportPlan,
        progress: Option<ProgressCallback>,
    ) -> ClipstickResult<()> {
        tracing::debug!(args = ?plan.ffmpeg_args, "Running ffmpeg");
        let mut cmd = Command::new("ffmpeg");
        cmd.args(&plan.ffmpeg_args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let started = std::time::Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|e| ClipstickError::render(format!("Failed to start ffmpeg: {e}")))?;

        tracing::info!(
            pid = child.id(),
            expected_secs = plan.expected_duration_secs,
            "ffmpeg process started"
        );

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ClipstickError::render("Failed to capture ffmpeg stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| ClipstickError::render("Failed to capture ffmpeg stderr"))?;

        // Drain stderr concurrently to avoid ffmpeg blocking on a full
        // stderr pipe.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        let mut reader = BufReader::new(stdout);
        let mut line = String::new();
        let mut state = ProgressState::default();

        loop {
            line.clear();
            let bytes = reader.read_line(&mut line).map_err(|e| {
                ClipstickError::render(format!("Failed reading ffmpeg progress: {e}"))
            })?;
            if bytes == 0 {
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some((key, value)) = trimmed.split_once('=') {
                state.update(key, value);
                if key == "progress" {
                    if let Some(cb) = &progress {
                        cb(progress_report(&state, plan.expected_duration_secs));
                    }
                }
            }
        }

        let status = child
            .wait()
            .map_err(|e| ClipstickError::render(format!("Failed to wait on ffmpeg: {e}")))?;

        let stderr_output = stderr_task
            .join()
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        if !status.success() {
            // Hand back the compiled graph alongside the engine log so a
            // failing invocation can be inspected end to end.
            return Err(ClipstickError::EngineFailure {
                diagnostic: format!(
                    "ffmpeg exited with {}: {}",
                    status,
                    stderr_output.trim()
                ),
                filtergraph: plan.filtergraph.clone(),
            });
        }

        if let Some(cb) = &progress {
            cb(ExportProgress {
                progress: 1.0,
                out_time_secs: plan.expected_duration_secs,
                expected_secs: plan.expected_duration_secs,
                stage: ExportStage::Complete,
            });
        }

        tracing::info!(
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Export finished"
        );
        Ok(())
    }

    fn is_available(&self) -> bool {
        command_exists("ffmpeg")
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Check that both engine binaries are reachable.
pub fn engine_available() -> (bool, bool) {
    (command_exists("ffmpeg"), command_exists("ffprobe"))
}

#[derive(Debug, Default)]
struct ProgressState {
    out_time_secs: f64,
    complete: bool,
}

impl ProgressState {
    fn update(&mut self, key: &str, value: &str) {
        match key {
            "out_time_ms" => {
                if let Ok(ms) = value.parse::<f64>() {
                    self.out_time_secs = ms / 1_000_000.0;
                }
            }
            "out_time_us" => {
                if let Ok(us) = value.parse::<f64>() {
                    self.out_time_secs = us / 1_000_000.0;
                }
            }
            "progress" => {
                self.complete = value == "end";
            }
            _ => {}
        }
    }
}

fn progress_report(state: &ProgressState, expected_secs: f64) -> ExportProgress {
    let progress = if expected_secs <= 0.0 {
        0.0
    } else {
        (state.out_time_secs / expected_secs).clamp(0.0, 1.0)
    };

    ExportProgress {
        progress: if state.complete { 1.0 } else { progress },
        out_time_secs: state.out_time_secs,
        expected_secs,
        stage: if state.complete {
            ExportStage::Finalizing
        } else {
            ExportStage::Encoding
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipstick_edit_model::{Boomerang, EditSpec, OutputConstraints, TrimRange};

    fn job_with_trim(start: f64, end: f64) -> ExportJob {
        let mut spec = EditSpec::for_source(30.0, OutputConstraints::default());
        spec.trim = TrimRange::new(start, end);
        ExportJob {
            input_path: PathBuf::from("in.mp4"),
            output_path: PathBuf::from("out.webm"),
            spec,
        }
    }

    #[test]
    fn test_plan_args_shape() {
        let plan = build_plan(&job_with_trim(0.0, 2.0)).unwrap();
        let args = &plan.ffmpeg_args;

        let filter_idx = args.iter().position(|a| a == "-filter_complex").unwrap();
        assert_eq!(args[filter_idx + 1], plan.filtergraph);

        let map_idx = args.iter().position(|a| a == "-map").unwrap();
        assert_eq!(args[map_idx + 1], "[out]");

        assert!(args.contains(&"-an".to_string()));
        assert!(args.contains(&"libvpx-vp9".to_string()));
        assert_eq!(args.last().unwrap(), "out.webm");
        assert!((plan.expected_duration_secs - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_plan_rejects_overlong_edit_before_engine() {
        let mut job = job_with_trim(0.0, 2.0);
        job.spec.boomerang = Boomerang {
            enabled: true,
            frame_trim: 1,
        };
        // 2s doubled exceeds the 3s policy
        let err = build_plan(&job).unwrap_err();
        assert!(matches!(err, ClipstickError::DurationExceeded { .. }));
    }

    #[test]
    fn test_plan_rejects_invalid_spec_loudly() {
        let job = job_with_trim(2.0, 1.0);
        let err = build_plan(&job).unwrap_err();
        assert!(matches!(err, ClipstickError::InvariantViolation { .. }));
    }

    #[test]
    fn test_progress_state_parses_engine_keys() {
        let mut state = ProgressState::default();
        state.update("out_time_us", "1500000");
        assert!((state.out_time_secs - 1.5).abs() < 1e-9);
        state.update("progress", "continue");
        assert!(!state.complete);
        state.update("progress", "end");
        assert!(state.complete);
    }

    #[test]
    fn test_progress_report_clamps_and_finalizes() {
        let state = ProgressState {
            out_time_secs: 5.0,
            complete: false,
        };
        let report = progress_report(&state, 2.0);
        assert!((report.progress - 1.0).abs() < 1e-9);
        assert_eq!(report.stage, ExportStage::Encoding);

        let done = ProgressState {
            out_time_secs: 2.0,
            complete: true,
        };
        assert_eq!(progress_report(&done, 2.0).stage, ExportStage::Finalizing);
    }

    #[test]
    fn test_session_gate_rejects_second_export() {
        let session = ExportSession::new();
        let guard = session.try_begin().unwrap();
        assert!(session.is_busy());
        assert!(matches!(
            session.try_begin().unwrap_err(),
            ClipstickError::ExportBusy
        ));

        drop(guard);
        assert!(!session.is_busy());
        assert!(session.try_begin().is_ok());
    }
}
