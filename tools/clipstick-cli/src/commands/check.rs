//! Check system capabilities.

use clipstick_common::config::AppConfig;
use clipstick_render_engine::engine_available;

pub fn run() -> anyhow::Result<()> {
    println!("Clipstick System Check");
    println!("{}", "=".repeat(50));

    let (ffmpeg, ffprobe) = engine_available();
    if ffmpeg {
        println!("[OK] ffmpeg found in PATH");
    } else {
        println!("[FAIL] ffmpeg not found: install it to export stickers");
    }
    if ffprobe {
        println!("[OK] ffprobe found in PATH");
    } else {
        println!("[FAIL] ffprobe not found: install it to probe media");
    }

    let config = AppConfig::load();
    println!("[OK] Output directory: {}", config.output_dir.display());
    println!(
        "[OK] Policy: {} fps, {} px max edge, {:.1}s max, {} KiB max",
        config.policy.target_fps,
        config.policy.max_edge_pixels,
        config.policy.max_duration_secs,
        config.policy.max_bytes / 1024,
    );

    println!();
    if ffmpeg && ffprobe {
        println!("All required tools are available. Clipstick is ready.");
    } else {
        println!("Some required tools are missing. See above.");
    }

    Ok(())
}
