use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use romgfx_core::logging::{LogConfig, LogLevel};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

mod commands;

#[derive(Parser)]
#[command(name = "romgfx", about = "Sprite and palette extraction for System 16 ROM dumps")]
struct Cli {
    /// Core log level: off, error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Append core log messages to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// The three ROM images every sprite command reads.
#[derive(Args)]
struct SourceArgs {
    /// Game code binary holding the sprite descriptor tables
    code: PathBuf,

    /// Joined sprite data binary
    sprites: PathBuf,

    /// Flat RGB palette file (48 bytes per palette)
    palettes: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Pack the sprites listed in a CSV index into one atlas PNG
    Atlas {
        #[command(flatten)]
        source: SourceArgs,

        /// CSV of descriptor offsets and palettes
        index: PathBuf,

        output: PathBuf,

        /// Gap around and between sprites (at most 4096)
        #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u32).range(..=4096))]
        padding: u32,

        /// Also write a label overlay PNG here
        #[arg(long)]
        overlay: Option<PathBuf>,

        /// Also write a box overlay PNG here
        #[arg(long = "box")]
        boxes: Option<PathBuf>,

        /// Visit every descriptor between the lowest and highest listed offset
        #[arg(long, default_value_t = false)]
        variations: bool,

        /// JSON file overriding the ROM layout
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Write a JSON run report here
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Decode one sprite through the pointer table
    Plot {
        #[command(flatten)]
        source: SourceArgs,

        /// Pointer table slot (decimal)
        index: usize,

        /// Palette number (hex)
        #[arg(value_parser = parse_hex_u32)]
        palette: u32,

        output: PathBuf,

        #[arg(long)]
        layout: Option<PathBuf>,
    },

    /// Write every sprite listed in a CSV index to its own PNG
    Extract {
        #[command(flatten)]
        source: SourceArgs,

        index: PathBuf,

        /// Output directory, created when missing
        output_dir: PathBuf,

        #[arg(long, default_value_t = false)]
        variations: bool,

        /// Save 4bpp indexed PNGs instead of RGBA (also `-16`)
        #[arg(long, default_value_t = false)]
        indexed: bool,

        #[arg(long)]
        layout: Option<PathBuf>,

        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Convert a System 16 palette RAM dump to a flat RGB palette file
    PaletteDecode { input: PathBuf, output: PathBuf },

    /// Render every palette in a palette file as a reference sheet
    PaletteSheet {
        input: PathBuf,
        output: PathBuf,

        #[arg(long, default_value_t = 1)]
        columns: u32,
    },

    /// Swap the high and low nibble of every byte in a file
    SwapNibbles {
        input: PathBuf,

        /// Defaults to `swapped_<name>` next to the input
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn parse_hex_u32(s: &str) -> Result<u32, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).map_err(|e| format!("{:?} is not a hex number: {}", s, e))
}

/// `-16` is the historical spelling of `--indexed`; clap has no multi-digit
/// short flags, so rewrite it before parsing.
fn normalize_args<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    args.into_iter()
        .map(|a| if a == "-16" { OsString::from("--indexed") } else { a })
        .collect()
}

fn init_core_logging(level: &str, file: Option<&Path>) -> Result<()> {
    let level =
        LogLevel::from_str(level).with_context(|| format!("unknown log level {:?}", level))?;
    let config = LogConfig::global();
    config.set_global_level(level);
    if let Some(path) = file {
        config
            .set_log_file(path.to_path_buf())
            .with_context(|| format!("opening log file {}", path.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    init_core_logging(&cli.log_level, cli.log_file.as_deref())?;

    match cli.command {
        Command::Atlas {
            source,
            index,
            output,
            padding,
            overlay,
            boxes,
            variations,
            layout,
            report,
        } => commands::atlas(commands::AtlasJob {
            source: &source,
            index: &index,
            output: &output,
            padding,
            overlay: overlay.as_deref(),
            boxes: boxes.as_deref(),
            variations,
            layout: layout.as_deref(),
            report: report.as_deref(),
        }),
        Command::Plot {
            source,
            index,
            palette,
            output,
            layout,
        } => commands::plot(&source, index, palette, &output, layout.as_deref()),
        Command::Extract {
            source,
            index,
            output_dir,
            variations,
            indexed,
            layout,
            report,
        } => commands::extract(commands::ExtractJob {
            source: &source,
            index: &index,
            output_dir: &output_dir,
            variations,
            indexed,
            layout: layout.as_deref(),
            report: report.as_deref(),
        }),
        Command::PaletteDecode { input, output } => commands::palette_decode(&input, &output),
        Command::PaletteSheet {
            input,
            output,
            columns,
        } => commands::palette_sheet(&input, &output, columns),
        Command::SwapNibbles { input, output } => {
            commands::swap_nibbles(&input, output.as_deref())
        }
    }
}
