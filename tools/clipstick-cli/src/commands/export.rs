//! Render the sticker.

use std::path::PathBuf;

use clipstick_common::config::AppConfig;
use clipstick_render_engine::{probe_media, ExportJob, ExportProgress, ExportSession};

use super::EditArgs;

pub async fn run(path: PathBuf, output: Option<PathBuf>, edit: EditArgs) -> anyhow::Result<()> {
    println!("Exporting: {}", path.display());

    let info = probe_media(&path)?;
    let spec = edit.to_spec(&info)?;

    let output_path = output.unwrap_or_else(|| {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sticker".to_string());
        AppConfig::load().output_dir.join(format!("{stem}.webm"))
    });

    println!("  Output: {}", output_path.display());
    println!("  Selection: {:.2}s", spec.trim.duration_secs());

    let job = ExportJob {
        input_path: path,
        output_path: output_path.clone(),
        spec,
    };

    let progress_cb: Box<dyn Fn(ExportProgress) + Send> = Box::new(|p| {
        print!(
            "\r  Progress: {:.1}% ({:.2}s / {:.2}s)  ",
            p.progress * 100.0,
            p.out_time_secs,
            p.expected_secs,
        );
    });

    let session = ExportSession::new();
    match session.export(job, Some(progress_cb)).await {
        Ok(path) => {
            println!("\nExport complete: {}", path.display());
        }
        Err(e) => {
            println!("\nExport failed: {e}");
        }
    }

    Ok(())
}
