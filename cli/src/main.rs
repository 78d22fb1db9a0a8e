use std::io;
use std::path::PathBuf;

use clap::Parser;
use pipeopts_core::{
    EXIT_SUCCESS, EXIT_USAGE, Exporter, PipeoptsConfig, PipeoptsError,
    ShellExporter, StructuredExporter, StructuredFormat, ValueStyle, invoke,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PIPEOPTS_LOG";

/// Output format for the exported values.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    /// Bash assignments, for `eval "$(pipeopts ...)"`.
    Shell,
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "pipeopts")]
#[command(about = "Getopts for process pipelines")]
#[command(
    long_about = "Processes a pipe (`|') delimited getopts style option string against \
each ARG, putting the parsed result for each group into its corresponding position \
of the PIPEOPTS array, last group first. Remaining arguments are concatenated and \
placed into PIPEOPTSARG."
)]
struct Cli {
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Name of the exported group array.
    #[arg(long)]
    options_var: Option<String>,
    /// Name of the exported residual string.
    #[arg(long)]
    residual_var: Option<String>,
    /// Do not export the residual string.
    #[arg(long)]
    no_residual: bool,
    /// Never quote option values.
    #[arg(long)]
    no_quote: bool,
    /// Separate values from their letter with a space (`-a x`).
    #[arg(long)]
    separate_values: bool,
    /// Output format.
    #[arg(long, value_enum, default_value = "shell")]
    format: CliOutputFormat,
    /// Log parse details to stderr.
    #[arg(short, long)]
    verbose: bool,
    /// Option definition (groups separated by `|`, e.g. "vx:|n|o:") followed
    /// by the arguments to classify.
    #[arg(
        value_name = "OPTSTRING [ARG]...",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match run(cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(PipeoptsError::Usage) => {
            eprintln!("{}", PipeoptsError::Usage);
            EXIT_USAGE
        }
        Err(err) => {
            eprintln!("error: {err}");
            err.exit_code()
        }
    };

    std::process::exit(code);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<PipeoptsConfig, PipeoptsError> {
    let mut config = match &cli.config {
        Some(path) => PipeoptsConfig::load(path)?,
        None => PipeoptsConfig::default(),
    };

    if let Some(name) = &cli.options_var {
        config.export.options_var = name.clone();
    }
    if let Some(name) = &cli.residual_var {
        config.export.residual_var = name.clone();
    }
    if cli.no_residual {
        config.export.export_residual = false;
    }
    if cli.no_quote {
        config.format.quote_values = false;
    }
    if cli.separate_values {
        config.format.value_style = ValueStyle::Separate;
    }

    Ok(config)
}

fn run(cli: Cli) -> Result<(), PipeoptsError> {
    let config = load_config(&cli)?;
    debug!(?config, "loaded configuration");

    let names = config.export.names();
    let stdout = io::stdout().lock();

    let mut exporter: Box<dyn Exporter> = match cli.format {
        CliOutputFormat::Shell => Box::new(ShellExporter::new(names, stdout)),
        CliOutputFormat::Json => Box::new(StructuredExporter::new(
            names,
            StructuredFormat::Json,
            stdout,
        )),
        CliOutputFormat::Yaml => Box::new(StructuredExporter::new(
            names,
            StructuredFormat::Yaml,
            stdout,
        )),
    };

    invoke(&cli.args, &config, exporter.as_mut())?;
    Ok(())
}
