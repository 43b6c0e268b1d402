use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tilewire_tools::{
    decode_fields, encode_fields, find_dumps, format_fields_pretty, inspect_frame,
    key_report_from_coords, key_report_from_key, FieldKind, FieldValue, InspectReport,
};

#[derive(Parser)]
#[command(
    name = "tilewire-tools",
    version,
    about = "tilewire key and packet inspection tools"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode or decode coordinate keys.
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
    /// Inspect framed packet dumps (a file or a directory).
    Inspect {
        /// Path to the packet bytes.
        packet_path: PathBuf,
        /// File name pattern when inspecting a directory.
        #[arg(long)]
        glob: Option<String>,
        /// Inspect the largest dumps first.
        #[arg(long)]
        largest: bool,
        /// Inspect at most this many dumps.
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Decode typed fields from a framed packet dump.
    Decode {
        /// Path to the packet bytes.
        packet_file: PathBuf,
        /// Field types in the order they were written.
        #[arg(long, value_enum, value_delimiter = ',', required = true)]
        fields: Vec<FieldArg>,
    },
    /// Build a framed packet from a JSON list of fields.
    Encode {
        /// JSON file with `[{"kind": "int", "value": 1}, ...]`.
        fields_json: PathBuf,
        /// Where to write the packet bytes.
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum KeyAction {
    /// Pack coordinates into a key.
    Encode {
        #[arg(allow_negative_numbers = true)]
        x: i32,
        #[arg(allow_negative_numbers = true)]
        y: i32,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        z: i32,
        /// Reject components that would be truncated.
        #[arg(long)]
        checked: bool,
    },
    /// Unpack a key into coordinates.
    Decode {
        #[arg(allow_negative_numbers = true)]
        key: i64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FieldArg {
    Byte,
    Bool,
    Short,
    Int,
    Long,
    String,
}

impl From<FieldArg> for FieldKind {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Byte => Self::Byte,
            FieldArg::Bool => Self::Bool,
            FieldArg::Short => Self::Short,
            FieldArg::Int => Self::Int,
            FieldArg::Long => Self::Long,
            FieldArg::String => Self::String,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Key { action } => {
            let report = match action {
                KeyAction::Encode { x, y, z, checked } => key_report_from_coords(x, y, z, checked)?,
                KeyAction::Decode { key } => key_report_from_key(key),
            };
            match cli.format {
                OutputFormat::Json => print_json(&report)?,
                OutputFormat::Pretty => {
                    println!("key: {} (0x{:013x})", report.key, report.key);
                    println!("position: {},{},{}", report.x, report.y, report.z);
                }
            }
        }
        Command::Inspect {
            packet_path,
            glob,
            largest,
            limit,
        } => {
            if packet_path.is_dir() {
                let dumps = find_dumps(&packet_path, glob.as_deref(), largest)?;
                for dump in dumps.iter().take(limit.unwrap_or(usize::MAX)) {
                    let report = inspect_path(&dump.path)?;
                    if matches!(cli.format, OutputFormat::Pretty) {
                        println!("== {} ({} bytes) ==", dump.path.display(), dump.len);
                    }
                    print_inspect_report(&report, cli.format)?;
                }
            } else {
                let report = inspect_path(&packet_path)?;
                print_inspect_report(&report, cli.format)?;
            }
        }
        Command::Decode {
            packet_file,
            fields,
        } => {
            let bytes = fs::read(&packet_file)
                .with_context(|| format!("read packet {}", packet_file.display()))?;
            let kinds: Vec<FieldKind> = fields.into_iter().map(FieldKind::from).collect();
            let values = decode_fields(&bytes, &kinds)?;
            match cli.format {
                OutputFormat::Json => print_json(&values)?,
                OutputFormat::Pretty => print!("{}", format_fields_pretty(&values)),
            }
        }
        Command::Encode { fields_json, out } => {
            let contents = fs::read_to_string(&fields_json)
                .with_context(|| format!("read fields {}", fields_json.display()))?;
            let values: Vec<FieldValue> =
                serde_json::from_str(&contents).context("parse fields json")?;
            let bytes = encode_fields(&values)?;
            fs::write(&out, &bytes).with_context(|| format!("write packet {}", out.display()))?;
            log::info!("wrote {} bytes to {}", bytes.len(), out.display());
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{json}");
    Ok(())
}

fn inspect_path(path: &Path) -> Result<InspectReport> {
    let bytes = fs::read(path).with_context(|| format!("read packet {}", path.display()))?;
    inspect_frame(&bytes).with_context(|| format!("inspect packet {}", path.display()))
}

fn print_inspect_report(report: &InspectReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Pretty => {
            println!(
                "header: {} payload bytes declared, {} present",
                report.declared_payload, report.actual_payload
            );
            if report.trailing > 0 {
                println!("trailing: {} bytes after the frame", report.trailing);
            } else if report.actual_payload < report.declared_payload {
                println!(
                    "truncated: missing {} payload bytes",
                    report.declared_payload - report.actual_payload
                );
            }
        }
    }
    Ok(())
}
