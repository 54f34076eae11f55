use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use runtable_gen::commands;
use runtable_gen::commands::EncodeArgs;
use runtable_gen::commands::LookupArgs;
use runtable_gen::config::Settings;
use runtable_gen::logging;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogOutputFormat {
    Json,
    Pretty,
}

/// Command line arguments for the table generator.
#[derive(Debug, Parser)]
#[clap(name = "runtable-gen", version)]
struct GenArgs {
    /// Optional path to the configuration file. If not provided, defaults
    /// and environment variables are used.
    #[clap(short = 'c', long, global = true, required = false)]
    config: Option<PathBuf>,

    #[clap(short = 'o', long = "output-format", global = true, default_value = "pretty")]
    output_format: Option<LogOutputFormat>,

    /// Log codec internals at debug level.
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Encode a range file into a JSON table artifact.
    Encode(EncodeArgs),
    /// Look up code points in a table artifact.
    Lookup(LookupArgs),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse the command line arguments.
    let args = GenArgs::parse();

    // Configure the binary's stderr output based on the provided output format.
    let pretty = matches!(args.output_format, Some(LogOutputFormat::Pretty));
    let directives = match args.verbose {
        true => logging::VERBOSE_DIRECTIVES,
        false => logging::DEFAULT_DIRECTIVES,
    };
    logging::setup_logging(directives, pretty);

    let mut stdout = std::io::stdout().lock();

    match &args.command {
        Command::Encode(encode_args) => {
            // Load the configuration file and/or environment variables.
            let settings = Settings::new(args.config.as_ref())?;
            commands::encode(encode_args, &settings, &mut stdout)?;
        }
        Command::Lookup(lookup_args) => commands::lookup(lookup_args, &mut stdout)?,
    }

    Ok(())
}
