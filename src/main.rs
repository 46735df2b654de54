//! tdoc: generate tests and documentation from embedded `test:`/`doc:` blocks.
//!
//! Supports two modes:
//!
//! - **stdin mode**: `tdoc -f tests < calc.py` writes generated text to stdout
//! - **file mode**: `tdoc -o generated -f markdown src/*.py`

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tdoc::{render, SourceDocument};

#[derive(Parser)]
#[command(
    name = "tdoc",
    about = "Generate tests and documentation from embedded test:/doc: blocks"
)]
struct Cli {
    /// Input files (glob patterns supported). If omitted, reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: tests (default), markdown, json
    #[arg(short = 'f', long, default_value = "tests")]
    format: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        return stdin_mode(&cli);
    }

    file_mode(&cli)
}

/// stdin mode: read source from stdin, write generated text to stdout.
fn stdin_mode(cli: &Cli) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let document = tdoc::parse("<stdin>", &input);
    report_skipped(&document);
    let renderer = render::create_renderer(&cli.format)?;
    print!("{}", renderer.render(&document)?);
    Ok(())
}

/// file mode: parse each input file, write one output file per input.
fn file_mode(cli: &Cli) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = expand_globs(&cli.files)?;
    let renderer = render::create_renderer(&cli.format)?;

    for path in &input_files {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("warning: skipping {}: {}", path.display(), e);
                continue;
            }
        };

        let source_file = path.to_string_lossy().to_string();
        let document = tdoc::parse(&source_file, &content);
        report_skipped(&document);

        let text = renderer.render(&document)?;
        // Nothing to emit in this format; don't leave empty files around.
        if text.is_empty() {
            continue;
        }

        let stem = derive_output_name(&source_file);
        let out_path = output_dir.join(renderer.file_name(&stem));
        fs::write(&out_path, &text)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    Ok(())
}

fn report_skipped(document: &SourceDocument) {
    let skipped = document.unparseable_count();
    if skipped > 0 {
        eprintln!(
            "warning: {}: skipped {} unparseable test statement(s)",
            document.path, skipped
        );
    }
}

/// File extensions recognized as source files.
const SUPPORTED_EXTENSIONS: &[&str] = &["py"];

/// Expand glob patterns into concrete input paths. Bare directories are
/// scanned for supported source files, non-recursively.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                let supported = p
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext));
                if supported && p.is_file() {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            eprintln!("warning: no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Deterministic input order.
    files.sort();
    files.dedup();
    Ok(files)
}

/// Derive the output file name stem from a source path.
/// "src/calc.py" → "calc"
fn derive_output_name(source: &str) -> String {
    let filename = source.rsplit('/').next().unwrap_or(source);
    filename.strip_suffix(".py").unwrap_or(filename).to_string()
}
