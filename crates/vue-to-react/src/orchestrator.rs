//! Main orchestration logic.

use crate::cli::{Args, OutputFormat};
use crate::config::Settings;
use crate::error::{ConvertError, OrchestratorError};
use crate::output;
use crate::paths::{output_paths, OutputPaths};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::time::{Duration, Instant};
use vue_parser::{LineCol, LineIndex};
use vue_transformer::{convert_source, Diagnostic, Severity, TransformOptions};
use walkdir::WalkDir;

/// Directories that are never searched.
const SKIPPED_DIRECTORIES: &[&str] = &["node_modules"];

/// A successfully converted file.
#[derive(Debug)]
pub struct ConvertedFile {
    pub input: Utf8PathBuf,
    pub outputs: OutputPaths,
    /// The generated code, kept only with `--emit`.
    pub code: Option<String>,
}

/// A diagnostic with its resolved position.
#[derive(Debug)]
pub struct FileDiagnostic {
    pub path: Utf8PathBuf,
    pub diagnostic: Diagnostic,
    /// 0-indexed position of the span start.
    pub position: Option<LineCol>,
}

/// A file whose conversion failed.
#[derive(Debug)]
pub struct FileFailure {
    pub path: Utf8PathBuf,
    pub error: ConvertError,
}

/// Everything a batch run produced.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub converted: Vec<ConvertedFile>,
    pub failures: Vec<FileFailure>,
    pub diagnostics: Vec<FileDiagnostic>,
    /// Number of files using each custom tag.
    pub tag_tally: BTreeMap<String, usize>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.diagnostic.severity == severity)
            .count()
    }

    fn record(&mut self, path: Utf8PathBuf, outcome: Result<FileOutcome, ConvertError>) {
        match outcome {
            Ok(outcome) => {
                self.diagnostics.extend(outcome.diagnostics);
                for tag in outcome.custom_tags {
                    *self.tag_tally.entry(tag).or_default() += 1;
                }
                self.converted.push(outcome.converted);
            }
            Err(error) => self.failures.push(FileFailure { path, error }),
        }
    }
}

/// Phase timings of a run.
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    pub scan: Duration,
    pub convert: Duration,
    pub total: Duration,
    pub file_count: usize,
}

/// The result of converting one file, before it is merged into the report.
struct FileOutcome {
    converted: ConvertedFile,
    diagnostics: Vec<FileDiagnostic>,
    custom_tags: Vec<String>,
}

/// Per-run state shared by the workers.
struct Job<'a> {
    root: &'a Utf8Path,
    output: &'a Utf8Path,
    options: TransformOptions,
    emit: bool,
}

/// Runs the conversion and prints the report.
pub fn run(args: &Args) -> Result<BatchReport, OrchestratorError> {
    let total_start = Instant::now();
    let cwd = current_dir()?;
    let settings = Settings::load(args, &cwd)?;

    if !args.input.exists() {
        return Err(OrchestratorError::InputNotFound(args.input.clone()));
    }

    let scan_start = Instant::now();
    let (root, files) = if args.input.is_dir() {
        let ignore = ignore_set(&settings.ignore)?;
        (args.input.clone(), discover(&args.input, &settings, &ignore))
    } else {
        let root = args.input.parent().map(Utf8Path::to_path_buf).unwrap_or_default();
        (root, vec![args.input.clone()])
    };
    let scan = scan_start.elapsed();

    let convert_start = Instant::now();
    let report = convert_all(
        &files,
        &Job {
            root: &root,
            output: &args.output,
            options: TransformOptions {
                filename: None,
                shape: settings.shape,
                imports: settings.imports.clone(),
                style_file_name: settings.style_file_name.clone(),
            },
            emit: args.emit,
        },
        args.jobs,
    )?;
    let convert = convert_start.elapsed();

    if args.emit {
        for file in &report.converted {
            if let Some(code) = &file.code {
                println!("=== {} ===\n{}", file.outputs.component, code);
            }
        }
    }

    match args.format {
        OutputFormat::Json => println!("{}", output::format_json(&report)),
        OutputFormat::Human => eprint!("{}", output::format_human(&report, args.verbose)),
    }

    if args.timings {
        eprint!(
            "{}",
            output::format_timings(&Timings {
                scan,
                convert,
                total: total_start.elapsed(),
                file_count: files.len(),
            })
        );
    }

    Ok(report)
}

/// Converts `files` on a worker pool of `jobs` threads.
fn convert_all(
    files: &[Utf8PathBuf],
    job: &Job<'_>,
    jobs: Option<usize>,
) -> Result<BatchReport, OrchestratorError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.unwrap_or(0))
        .build()
        .map_err(|e| OrchestratorError::ThreadPool(e.to_string()))?;

    let outcomes: Vec<_> = pool.install(|| {
        files
            .par_iter()
            .map(|path| (path.clone(), convert_file(path, job)))
            .collect()
    });

    let mut report = BatchReport::default();
    for (path, outcome) in outcomes {
        report.record(path, outcome);
    }
    Ok(report)
}

/// Reads, converts and writes one file.
fn convert_file(path: &Utf8Path, job: &Job<'_>) -> Result<FileOutcome, ConvertError> {
    let source = fs::read_to_string(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let options = TransformOptions {
        filename: Some(path.to_string()),
        ..job.options.clone()
    };
    let result = convert_source(&source, &options).map_err(|source| ConvertError::Transform {
        path: path.to_path_buf(),
        source,
    })?;

    let outputs = output_paths(
        job.root,
        path,
        job.output,
        &result.names.converted,
        &result.stylesheet.file_name,
    );
    write(&outputs.dir, None)?;
    write(&outputs.component, Some(&result.code))?;
    write(&outputs.stylesheet, Some(&result.stylesheet.content))?;

    let line_index = LineIndex::new(&source);
    let diagnostics = result
        .diagnostics
        .into_iter()
        .map(|diagnostic| FileDiagnostic {
            path: path.to_path_buf(),
            position: diagnostic.span.map(|span| line_index.line_col(span.start)),
            diagnostic,
        })
        .collect();

    Ok(FileOutcome {
        converted: ConvertedFile {
            input: path.to_path_buf(),
            outputs,
            code: job.emit.then_some(result.code),
        },
        diagnostics,
        custom_tags: result.custom_tags.iter().map(|t| t.to_string()).collect(),
    })
}

/// Writes `content` to `path`, or creates the directory `path` when `None`.
fn write(path: &Utf8Path, content: Option<&str>) -> Result<(), ConvertError> {
    let written = match content {
        Some(content) => fs::write(path, content),
        None => fs::create_dir_all(path),
    };
    written.map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Finds every file under `root` with a configured extension.
fn discover(root: &Utf8Path, settings: &Settings, ignore: &GlobSet) -> Vec<Utf8PathBuf> {
    let mut files: Vec<Utf8PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && e.file_name()
                    .to_str()
                    .is_some_and(|name| SKIPPED_DIRECTORIES.contains(&name)))
        })
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                eprintln!("Warning: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
        .filter(|p| settings.matches_extension(p.file_name().unwrap_or("")))
        .filter(|p| {
            let relative = p.strip_prefix(root).unwrap_or(p);
            !ignore.is_match(relative.as_str())
        })
        .collect();
    files.sort();
    files
}

fn ignore_set(patterns: &[String]) -> Result<GlobSet, OrchestratorError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))
}

fn current_dir() -> Result<Utf8PathBuf, OrchestratorError> {
    let cwd = std::env::current_dir()
        .map_err(|e| OrchestratorError::NonUtf8Path(e.to_string()))?;
    Utf8PathBuf::try_from(cwd).map_err(|e| OrchestratorError::NonUtf8Path(e.to_string()))
}
