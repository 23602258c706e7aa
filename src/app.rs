use anyhow::Context;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use crate::architecture::{self, Variant};
use crate::cli::Config;
use crate::render::{self, Renderer};

pub async fn run(config: Config) -> anyhow::Result<Vec<PathBuf>> {
    let mut renderer = render::renderer_for(config.format, &config.dot_exe);
    let mut written = Vec::with_capacity(config.variants.len());

    for variant in &config.variants {
        let path = render_variant(renderer.as_mut(), *variant, &config).await?;
        show_output(&config, &path);
        written.push(path);
    }

    Ok(written)
}

/// Opens `path` in the viewer when `--show` was given and the output is a picture.
fn show_output(config: &Config, path: &Path) -> bool {
    config.show && config.format.is_image() && config.viewer.open(path)
}

/// Builds one variant, writes it under `config.output_dir`, and prints its confirmation line.
pub async fn render_variant(
    renderer: &mut dyn Renderer,
    variant: Variant,
    config: &Config,
) -> anyhow::Result<PathBuf> {
    let diagram = architecture::build(variant);
    debug!(
        nodes = diagram.nodes.len(),
        clusters = diagram.clusters.len(),
        edges = diagram.edges.len();
        "Declared {}", diagram.filename
    );

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.output_dir.display()
        )
    })?;
    let file_name = format!("{}.{}", diagram.filename, config.format.extension());
    let path = config.output_dir.join(&file_name);

    renderer
        .render(&diagram, &path)
        .await
        .with_context(|| format!("failed to render {}", file_name))?;
    info!(output_file:? = path; "Diagram rendered");

    println!("{}", variant.confirmation(&file_name));
    Ok(path)
}
