use clap::Parser;
use std::path::PathBuf;

use crate::architecture::{Detail, Language, Variant};
use crate::render::{OutputFormat, Viewer};

#[derive(Debug, Clone)]
pub struct Config {
    pub variants: Vec<Variant>,
    pub format: OutputFormat,
    pub output_dir: PathBuf,
    pub show: bool,
    pub viewer: Viewer,
    pub dot_exe: String,
}

#[derive(Parser, Debug)]
#[command(name = "gen_awsdiagram")]
#[command(about = "Render the AWS three-tier architecture diagram via Graphviz", long_about = None)]
pub struct Cli {
    /// Label language
    #[arg(long, value_enum, default_value_t = Language::En)]
    pub language: Language,
    /// Plain diagram, or one with a user node, edge labels and custom styling
    #[arg(long, value_enum, default_value_t = Detail::Basic)]
    pub detail: Detail,
    /// Render all four language/detail combinations
    #[arg(long, conflicts_with_all = ["language", "detail"])]
    pub all: bool,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Png)]
    pub format: OutputFormat,
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
    /// Open each diagram after it is written
    #[arg(long)]
    pub show: bool,
    /// Program used by --show instead of the platform default opener
    #[arg(long)]
    pub viewer: Option<String>,
    /// Graphviz executable used for image formats
    #[arg(long, env = "GRAPHVIZ_DOT", default_value = "dot")]
    pub dot_exe: String,
    /// Log level (off, error, warn, info, debug, trace); RUST_LOG applies when omitted
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Cli {
    pub fn from_args() -> Self {
        Self::parse()
    }

    pub fn into_config(self) -> Config {
        let variants = if self.all {
            Variant::all().to_vec()
        } else {
            vec![Variant::new(self.language, self.detail)]
        };
        Config {
            variants,
            format: self.format,
            output_dir: self.output_dir,
            show: self.show,
            viewer: self.viewer.map(Viewer::new).unwrap_or_else(Viewer::platform),
            dot_exe: self.dot_exe,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(args: &[&str]) -> Config {
        let argv = std::iter::once("gen_awsdiagram").chain(args.iter().copied());
        Cli::try_parse_from(argv).expect("args parse").into_config()
    }

    #[test]
    fn test_defaults_match_basic_english_script() {
        let config = config(&[]);
        assert_eq!(config.variants, vec![Variant::new(Language::En, Detail::Basic)]);
        assert_eq!(config.format, OutputFormat::Png);
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert!(!config.show);
        assert_eq!(config.viewer, Viewer::platform());
    }

    #[test]
    fn test_viewer_override() {
        let config = config(&["--show", "--viewer", "feh"]);
        assert!(config.show);
        assert_eq!(config.viewer, Viewer::new("feh"));
    }

    #[test]
    fn test_language_and_detail_select_one_variant() {
        let config = config(&["--language", "ja", "--detail", "detailed", "-f", "svg"]);
        assert_eq!(config.variants, vec![Variant::new(Language::Ja, Detail::Detailed)]);
        assert_eq!(config.format, OutputFormat::Svg);
    }

    #[test]
    fn test_all_expands_to_every_variant() {
        let config = config(&["--all", "--format", "dot", "-o", "out"]);
        assert_eq!(config.variants, Variant::all().to_vec());
        assert_eq!(config.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_all_conflicts_with_single_variant_flags() {
        let argv = ["gen_awsdiagram", "--all", "--language", "ja"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let argv = ["gen_awsdiagram", "--format", "bmp"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
