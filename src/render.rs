//! Rendering backends: Graphviz for raster/vector images, plus direct writers for
//! the DOT source and the JSON topology description.
use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use clap::ValueEnum;
use log::{debug, warn};
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::diagram::Diagram;
use crate::dot::to_dot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
    Jpg,
    Pdf,
    /// Graphviz source, written without invoking Graphviz
    Dot,
    /// Node/cluster/edge table as JSON
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Dot => "dot",
            OutputFormat::Json => "json",
        }
    }

    /// Whether the output is a picture a viewer can open.
    pub fn is_image(self) -> bool {
        !matches!(self, OutputFormat::Dot | OutputFormat::Json)
    }
}

/// Turns a declared diagram into a file at `output`.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&mut self, diagram: &Diagram, output: &Path) -> anyhow::Result<()>;
}

pub fn renderer_for(format: OutputFormat, dot_exe: &str) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Dot => Box::new(DotSourceRenderer),
        OutputFormat::Json => Box::new(JsonRenderer),
        image => Box::new(GraphvizRenderer::new(dot_exe, image)),
    }
}

pub struct GraphvizRenderer {
    exe: String,
    format: OutputFormat,
}

impl GraphvizRenderer {
    pub fn new(exe: impl Into<String>, format: OutputFormat) -> Self {
        GraphvizRenderer {
            exe: exe.into(),
            format,
        }
    }
}

#[async_trait]
impl Renderer for GraphvizRenderer {
    async fn render(&mut self, diagram: &Diagram, output: &Path) -> anyhow::Result<()> {
        let source = to_dot(diagram);
        debug!(exe = self.exe.as_str(), bytes = source.len(); "Spawning Graphviz");

        let mut child = Command::new(&self.exe)
            .arg(format!("-T{}", self.format.extension()))
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start Graphviz `{}`", self.exe))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("failed to take renderer stdin"))?;
        stdin.write_all(source.as_bytes()).await?;
        stdin.shutdown().await?;
        drop(stdin);

        let result = child.wait_with_output().await?;
        if !result.status.success() {
            bail!(
                "`{}` exited with {}: {}",
                self.exe,
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            );
        }
        if !output.exists() {
            bail!("`{}` did not write {}", self.exe, output.display());
        }
        Ok(())
    }
}

pub struct DotSourceRenderer;

#[async_trait]
impl Renderer for DotSourceRenderer {
    async fn render(&mut self, diagram: &Diagram, output: &Path) -> anyhow::Result<()> {
        tokio::fs::write(output, to_dot(diagram))
            .await
            .with_context(|| format!("failed to write {}", output.display()))
    }
}

pub struct JsonRenderer;

#[async_trait]
impl Renderer for JsonRenderer {
    async fn render(&mut self, diagram: &Diagram, output: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(diagram)?;
        tokio::fs::write(output, json)
            .await
            .with_context(|| format!("failed to write {}", output.display()))
    }
}

/// External program used to open rendered diagrams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    exe: String,
    args: Vec<String>,
}

impl Viewer {
    pub fn new(exe: impl Into<String>) -> Self {
        Viewer {
            exe: exe.into(),
            args: Vec::new(),
        }
    }

    pub fn platform() -> Self {
        if cfg!(target_os = "macos") {
            Viewer::new("open")
        } else if cfg!(windows) {
            Viewer {
                exe: "cmd".to_string(),
                args: ["/C", "start", ""].map(String::from).to_vec(),
            }
        } else {
            Viewer::new("xdg-open")
        }
    }

    /// Launches the viewer on `path` without waiting for it. A viewer that cannot be
    /// started is logged and reported as `false`.
    pub fn open(&self, path: &Path) -> bool {
        let spawned = Command::new(&self.exe)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(_) => {
                debug!(viewer = self.exe.as_str(), path:? = path; "Opened rendered diagram");
                true
            }
            Err(e) => {
                warn!(
                    viewer = self.exe.as_str(),
                    path:? = path;
                    "Could not open rendered diagram: {}", e
                );
                false
            }
        }
    }
}
