//! Report the effective output duration of an edit.

use std::path::PathBuf;

use clipstick_render_engine::probe_media;
use clipstick_timeline_core::check_duration;

use super::EditArgs;

pub fn run(path: PathBuf, edit: EditArgs) -> anyhow::Result<()> {
    let info = probe_media(&path)?;
    let spec = edit.to_spec(&info)?;
    let report = check_duration(&spec);

    println!("Selection: {:.2}s", spec.trim.duration_secs());
    println!(
        "Output duration: {:.2}s (limit {:.2}s)",
        report.output_secs, report.max_secs
    );

    if report.within_limit() {
        println!("Edit fits the sticker duration limit.");
    } else {
        println!(
            "Edit exceeds the limit by {:.2}s. Shorten the selection or speed it up.",
            report.output_secs - report.max_secs
        );
    }

    Ok(())
}
