//! Print the compiled transform graph for an edit.

use std::path::PathBuf;

use clipstick_render_engine::{compile, probe_media};

use super::EditArgs;

pub fn run(path: PathBuf, edit: EditArgs, json: bool) -> anyhow::Result<()> {
    let info = probe_media(&path)?;
    let spec = edit.to_spec(&info)?;
    let graph = compile(&spec);

    if json {
        println!("{}", serde_json::to_string_pretty(&graph)?);
        return Ok(());
    }

    println!("Stages: {}", graph.stages().len());
    println!("Implied duration: {:.3}s", graph.implied_duration_secs());
    println!();
    for chain in graph.to_filter_complex().split(';') {
        println!("  {chain}");
    }

    Ok(())
}
