//! `docweave list`: show which content root supplies each document.

use crate::{
    config::DocConfig,
    vfs::{PROP_CONTENT_ROOT, RelativePath, VirtualFileLayer},
};
use anyhow::Result;
use std::io::{self, Write};

pub fn list_inputs(config: &DocConfig, physical: bool) -> Result<()> {
    let layer = config.build_layer();
    let mut stdout = io::stdout().lock();
    for line in render(&layer, physical)? {
        writeln!(stdout, "{line}")?;
    }
    Ok(())
}

fn render(layer: &VirtualFileLayer, physical: bool) -> Result<Vec<String>> {
    layer
        .list_inputs()?
        .iter()
        .map(|path| render_one(layer, path, physical))
        .collect()
}

fn render_one(layer: &VirtualFileLayer, path: &RelativePath, physical: bool) -> Result<String> {
    if physical {
        return Ok(layer.physical_path(path)?.display().to_string());
    }
    let properties = layer.properties(path)?;
    let root = properties
        .get(PROP_CONTENT_ROOT)
        .map_or("", String::as_str);
    Ok(format!("{path}\t{root}"))
}
