//! fontpath CLI (made by FontLab https://www.fontlab.com/)

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};
use regex::Regex;
use serde::Serialize;

use fontpath_core::output::{write_json_pretty, write_ndjson};
use fontpath_core::platform::FixedDirectories;
use fontpath_core::tags::tag_to_string;
use fontpath_core::{Font, FontEntry, FontRegistry, ScanOptions};

/// CLI entrypoint for fontpath.
#[derive(Debug, Parser)]
#[command(
    name = "fontpath",
    about = "Resolve a font family and style to an installed font file (made by FontLab https://www.fontlab.com/)"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Scan these directories instead of the platform font directories
    #[arg(long = "font-dir", global = true, value_hint = ValueHint::DirPath)]
    font_dirs: Vec<PathBuf>,

    /// Follow symlinks while walking font directories
    #[arg(long = "follow-symlinks", global = true, action = ArgAction::SetTrue)]
    follow_symlinks: bool,

    /// Worker threads used to parse fonts
    #[arg(short = 'j', long = "jobs", global = true)]
    jobs: Option<usize>,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the path of the font matching a family and style
    Find(FindArgs),
    /// List every installed font the registry knows about
    List(ListArgs),
    /// Parse font files directly and print what they declare
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
struct FindArgs {
    /// Family name as stored in the font, e.g. "Arial"
    family: String,

    /// Require the bold style
    #[arg(short = 'b', long = "bold", action = ArgAction::SetTrue)]
    bold: bool,

    /// Require the italic style
    #[arg(short = 'i', long = "italic", action = ArgAction::SetTrue)]
    italic: bool,
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Regex patterns; an entry is listed if its family matches any of them
    #[arg(short = 'n', long = "name", value_hint = ValueHint::Other)]
    name_patterns: Vec<String>,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,

    /// Format output as padded columns
    #[arg(long = "columns", action = ArgAction::SetTrue)]
    columns: bool,

    /// Control colorized output (auto|always|never)
    #[arg(long = "color", default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,
}

#[derive(Debug, Args)]
struct InspectArgs {
    /// Font files to parse
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    files: Vec<PathBuf>,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// What `inspect` reports for one successfully parsed file.
#[derive(Debug, Serialize)]
struct InspectReport {
    #[serde(flatten)]
    entry: FontEntry,
    tables: Vec<String>,
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match &cli.command {
        Command::Find(args) => run_find(&cli.global, args, &mut handle),
        Command::List(args) => run_list(&cli.global, args, &mut handle),
        Command::Inspect(args) => run_inspect(args, &mut handle),
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    // A logger may already be installed when running inside tests.
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn build_registry(global: &GlobalArgs) -> FontRegistry {
    let registry = if global.font_dirs.is_empty() {
        FontRegistry::system()
    } else {
        FontRegistry::new(FixedDirectories(global.font_dirs.clone()))
    };

    registry.with_options(ScanOptions {
        follow_symlinks: global.follow_symlinks,
        jobs: global.jobs,
    })
}

fn run_find(global: &GlobalArgs, args: &FindArgs, mut w: impl Write) -> Result<()> {
    let registry = build_registry(global);
    let path = registry.find(&args.family, args.bold, args.italic)?;
    writeln!(w, "{}", path.display())?;
    Ok(())
}

fn run_list(global: &GlobalArgs, args: &ListArgs, mut w: impl Write) -> Result<()> {
    let patterns = compile_patterns(&args.name_patterns)?;
    let registry = build_registry(global);
    let entries = filter_entries(registry.entries()?, &patterns);

    let use_color = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stdout().is_terminal(),
    };

    if args.ndjson {
        write_ndjson(&entries, &mut w)?;
    } else if args.json {
        write_json_pretty(&entries, &mut w)?;
    } else if args.columns {
        write_columns(&entries, &mut w, use_color)?;
    } else {
        write_plain(&entries, &mut w, use_color)?;
    }

    Ok(())
}

fn run_inspect(args: &InspectArgs, mut w: impl Write) -> Result<()> {
    let mut reports = Vec::new();
    let mut failures = 0usize;

    for path in &args.files {
        match inspect_file(path) {
            Ok(report) => reports.push(report),
            Err(err) => {
                failures += 1;
                eprintln!("{}: {err:#}", path.display());
            }
        }
    }

    if args.json {
        serde_json::to_writer_pretty(&mut w, &reports)?;
        writeln!(w)?;
    } else {
        for report in &reports {
            writeln!(
                w,
                "{}: {} [{}]",
                report.entry.path.display(),
                report.entry.descriptor,
                report.tables.join(" ")
            )?;
        }
    }

    if failures > 0 {
        return Err(anyhow!(
            "{failures} of {} files could not be parsed",
            args.files.len()
        ));
    }
    Ok(())
}

fn inspect_file(path: &Path) -> Result<InspectReport> {
    let font = Font::open(path)?;
    let descriptor = font
        .descriptor()
        .with_context(|| format!("reading descriptor of {}", path.display()))?;
    let tables = font
        .table_records()
        .iter()
        .map(|record| tag_to_string(record.tag))
        .collect();

    Ok(InspectReport {
        entry: FontEntry {
            descriptor,
            path: path.to_path_buf(),
        },
        tables,
    })
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).with_context(|| format!("invalid regex: {p}")))
        .collect()
}

fn filter_entries(entries: Vec<FontEntry>, patterns: &[Regex]) -> Vec<FontEntry> {
    if patterns.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|e| patterns.iter().any(|re| re.is_match(&e.descriptor.family_name)))
        .collect()
}

fn write_plain(entries: &[FontEntry], mut w: impl Write, color: bool) -> Result<()> {
    for entry in entries {
        let rendered = apply_color(&entry.path.display().to_string(), color, AnsiColor::Cyan);
        writeln!(w, "{rendered}")?;
    }
    Ok(())
}

fn write_columns(entries: &[FontEntry], mut w: impl Write, color: bool) -> Result<()> {
    let rows: Vec<(String, String, &str)> = entries
        .iter()
        .map(|e| {
            let style = match (e.descriptor.is_bold, e.descriptor.is_italic) {
                (false, false) => "regular",
                (true, false) => "bold",
                (false, true) => "italic",
                (true, true) => "bold italic",
            };
            (
                e.path.display().to_string(),
                e.descriptor.family_name.clone(),
                style,
            )
        })
        .collect();

    let path_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0).min(120);
    let name_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0).min(80);

    for (path, name, style) in rows {
        let padded_path = format!("{:<path_width$}", path);
        let padded_name = format!("{:<name_width$}", name);
        let rendered_path = apply_color(&padded_path, color, AnsiColor::Cyan);
        let rendered_name = apply_color(&padded_name, color, AnsiColor::Yellow);
        let rendered_style = apply_color(style, color, AnsiColor::Green);

        writeln!(w, "{rendered_path}  {rendered_name}  {rendered_style}")?;
    }

    Ok(())
}

#[derive(Copy, Clone)]
enum AnsiColor {
    Cyan,
    Yellow,
    Green,
}

fn apply_color(text: &str, color: bool, code: AnsiColor) -> String {
    if !color {
        return text.to_string();
    }

    let code_str = match code {
        AnsiColor::Cyan => "36",
        AnsiColor::Yellow => "33",
        AnsiColor::Green => "32",
    };

    format!("\u{1b}[{}m{}\u{1b}[0m", code_str, text)
}
