//! Show probed media metadata.

use std::path::PathBuf;

use clipstick_render_engine::probe_media;

pub fn run(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let info = probe_media(&path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Media: {}", info.path.display());
    println!("  Duration: {:.3}s", info.duration_secs);
    println!("  Resolution: {}x{}", info.width, info.height);
    println!("  Probed at: {}", info.probed_at);

    Ok(())
}
