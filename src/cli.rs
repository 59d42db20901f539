// Command line interface module
// Handles parsing of command line arguments

use crate::i18n::Language;
use crate::image_loader::Surface;
use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

/// Largest drawing surface accepted on either axis
const MAX_SURFACE_SIZE: u32 = 16384;

/// rpick - Show random images from a folder, drag them in and out
#[derive(Parser, Debug)]
#[command(name = "rpick")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Folder to scan for images at startup
    #[arg(value_name = "FOLDER")]
    pub folder: Option<PathBuf>,

    /// Interface language
    #[arg(short, long, value_enum, default_value_t = Language::Fr)]
    pub lang: Language,

    /// Width of the drawing surface in pixels
    #[arg(long, default_value = "800", value_parser = parse_dimension)]
    pub width: u32,

    /// Height of the drawing surface in pixels
    #[arg(long, default_value = "600", value_parser = parse_dimension)]
    pub height: u32,

    /// Use native dialogs for folder selection and messages
    #[arg(long, default_value = "false")]
    pub dialogs: bool,

    /// Seed for the random picker, for reproducible sessions
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Parsed arguments with resolved settings
#[derive(Debug)]
pub struct ParsedArgs {
    pub folder: Option<PathBuf>,
    pub language: Language,
    pub surface: Surface,
    pub use_dialogs: bool,
    pub seed: Option<u64>,
    /// Whether commands are typed by a person (prompt shown)
    pub interactive: bool,
}

/// Parse a surface dimension and ensure it's within valid range
fn parse_dimension(s: &str) -> Result<u32, String> {
    let value: u32 = s.parse().map_err(|_| "Invalid dimension")?;
    if !(1..=MAX_SURFACE_SIZE).contains(&value) {
        return Err(format!("Dimension must be between 1 and {}", MAX_SURFACE_SIZE));
    }
    Ok(value)
}

/// Check if stdin is attached to a terminal
fn stdin_is_terminal() -> bool {
    atty::is(atty::Stream::Stdin)
}

fn resolve(args: Args) -> Result<ParsedArgs> {
    if let Some(folder) = &args.folder {
        if !folder.is_dir() {
            bail!("Not a folder: {}", folder.display());
        }
    }

    Ok(ParsedArgs {
        folder: args.folder,
        language: args.lang,
        surface: Surface {
            width: args.width,
            height: args.height,
        },
        use_dialogs: args.dialogs,
        seed: args.seed,
        interactive: stdin_is_terminal(),
    })
}

/// Parse command line arguments
pub fn parse_args() -> Result<ParsedArgs> {
    resolve(Args::parse())
}
