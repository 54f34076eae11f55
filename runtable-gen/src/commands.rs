//! The `encode` and `lookup` subcommands.

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use runtable::EncodedTable;

use crate::config::Settings;
use crate::error::Error;
use crate::ucd::UcdFile;

/// Arguments of `runtable-gen encode`.
#[derive(Debug, Clone, clap::Args)]
pub struct EncodeArgs {
    /// Range file to read.
    #[clap(short, long)]
    pub input: PathBuf,

    /// Name stored in the artifact. Defaults to the input file stem.
    #[clap(short, long)]
    pub name: Option<String>,

    /// Value for code points neither listed nor covered by `@missing`.
    #[clap(short, long)]
    pub default: Option<String>,

    /// Where to write the artifact. Defaults to stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// Arguments of `runtable-gen lookup`.
#[derive(Debug, Clone, clap::Args)]
pub struct LookupArgs {
    /// Artifact written by `encode`.
    #[clap(short, long)]
    pub table: PathBuf,

    /// Code points to look up: `U+0041`, `0x41` or `65`.
    #[clap(required = true, value_parser = parse_code_point)]
    pub code_points: Vec<u32>,
}

/// Builds the artifact for `args.input` and writes it as JSON to
/// `args.output`, or to `out` when no output file is given.
#[tracing::instrument(skip_all, fields(input = %args.input.display()))]
pub fn encode<W: Write>(
    args: &EncodeArgs,
    settings: &Settings,
    out: &mut W,
) -> Result<EncodedTable<String>, Error> {
    let text = std::fs::read_to_string(&args.input)?;
    let file = UcdFile::parse(&text)?;

    let (runs, values) = file.assign(args.default.as_deref(), settings.codec.domain_max)?;
    let config = settings.codec.codec_config(values.len())?;

    let name = args.name.clone().unwrap_or_else(|| table_name(&args.input));
    let table = EncodedTable::generate(&name, &runs, values, config)?;

    let json = serde_json::to_string_pretty(&table)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(output = %path.display(), "wrote table");
        }
        None => writeln!(out, "{json}")?,
    }

    Ok(table)
}

/// Prints `U+XXXX<TAB>value` for every requested code point.
pub fn lookup<W: Write>(args: &LookupArgs, out: &mut W) -> Result<(), Error> {
    let text = std::fs::read_to_string(&args.table)?;
    let table: EncodedTable<String> = serde_json::from_str(&text)?;

    tracing::debug!(name = %table.name, "loaded table");
    let codec = table.into_codec()?;

    for &code_point in &args.code_points {
        let value = codec.decode(code_point)?;
        writeln!(out, "U+{code_point:04X}\t{value}")?;
    }

    Ok(())
}

/// Parses `U+0041`, `0x41` or a decimal number.
pub fn parse_code_point(text: &str) -> Result<u32, Error> {
    let invalid = || Error::InvalidCodePoint(text.to_string());

    let hex = ["U+", "u+", "0x", "0X"]
        .iter()
        .find_map(|prefix| text.strip_prefix(prefix));

    match hex {
        Some(digits) => u32::from_str_radix(digits, 16).map_err(|_| invalid()),
        None => text.parse().map_err(|_| invalid()),
    }
}

fn table_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_lowercase())
        .unwrap_or_else(|| "table".to_string())
}
