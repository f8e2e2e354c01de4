//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use serde::Deserialize;
use vue_transformer::ComponentShape;

/// Converts Vue options-API components into React TSX components.
#[derive(Debug, Parser)]
#[command(name = "vue-to-react")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// A `.vue` file or a directory to convert recursively
    #[arg(short, long)]
    pub input: Utf8PathBuf,

    /// Directory the converted components are written to
    #[arg(short, long)]
    pub output: Utf8PathBuf,

    /// Shape of the generated components
    #[arg(long, value_enum)]
    pub shape: Option<Shape>,

    /// Glob patterns to ignore, relative to the input directory
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Report format
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Print the generated code to stdout
    #[arg(long)]
    pub emit: bool,

    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(long)]
    pub jobs: Option<usize>,

    /// Print timing breakdowns
    #[arg(long)]
    pub timings: bool,

    /// List every converted file
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to vue-to-react.json (defaults to the working directory)
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,
}

/// Component shape options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Function component with hooks
    Function,
    /// Class component extending the component base
    Class,
}

impl From<Shape> for ComponentShape {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Function => ComponentShape::Function,
            Shape::Class => ComponentShape::Class,
        }
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable output on stderr (default)
    #[default]
    Human,
    /// JSON report on stdout
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["vue-to-react", "-i", "src", "-o", "out"]);
        assert_eq!(args.input.as_str(), "src");
        assert_eq!(args.output.as_str(), "out");
        assert_eq!(args.shape, None);
        assert_eq!(args.format, OutputFormat::Human);
        assert!(!args.emit);
        assert!(args.jobs.is_none());
    }

    #[test]
    fn test_long_flags() {
        let args = Args::parse_from([
            "vue-to-react",
            "--input",
            "a.vue",
            "--output",
            "out",
            "--shape",
            "class",
            "--format",
            "json",
            "--jobs",
            "2",
            "--verbose",
        ]);
        assert_eq!(args.shape, Some(Shape::Class));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.jobs, Some(2));
        assert!(args.verbose);
    }

    #[test]
    fn test_repeated_ignore() {
        let args = Args::parse_from([
            "vue-to-react",
            "-i",
            "src",
            "-o",
            "out",
            "--ignore",
            "**/legacy/**",
            "--ignore",
            "*.test.vue",
        ]);
        assert_eq!(args.ignore, vec!["**/legacy/**", "*.test.vue"]);
    }

    #[test]
    fn test_input_and_output_are_required() {
        assert!(Args::try_parse_from(["vue-to-react", "-i", "src"]).is_err());
        assert!(Args::try_parse_from(["vue-to-react", "-o", "out"]).is_err());
    }
}
