// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::{Path, PathBuf};

use qrbatch::app_config::{self, Config, EcLevel};
use qrbatch::app_controller::Controller;

/// CLI Wrapper for EcLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliEcLevel {
    Low,
    Medium,
    Quartile,
    High,
}

impl From<CliEcLevel> for EcLevel {
    fn from(cli_level: CliEcLevel) -> Self {
        match cli_level {
            CliEcLevel::Low => EcLevel::Low,
            CliEcLevel::Medium => EcLevel::Medium,
            CliEcLevel::Quartile => EcLevel::Quartile,
            CliEcLevel::High => EcLevel::High,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate QR codes from a record list (default command)
    Generate(GenerateArgs),

    /// Generate shell completions for qrbatch
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct GenerateArgs {
    /// Record list file, one `name payload` or `payload` per line ('-' for stdin)
    #[arg(value_name = "RECORDS")]
    records: String,

    /// Folder the images are written to
    #[arg(short, long, value_name = "FOLDER")]
    output: PathBuf,

    /// Extension appended to each record name
    #[arg(short, long, default_value = ".png")]
    extension: String,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Number of workers (0 = one per CPU)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Image width and height in pixels
    #[arg(long)]
    pixel_size: Option<u32>,

    /// QR error-correction level
    #[arg(long, value_enum)]
    ec_level: Option<CliEcLevel>,
}

/// qrbatch - concurrent QR code batch generator
#[derive(Parser, Debug)]
#[command(name = "qrbatch")]
#[command(version = "1.0.0")]
#[command(about = "Generate one QR code image per record")]
#[command(long_about = "qrbatch reads a record list and writes one QR code image per record.

EXAMPLES:
    qrbatch codes.txt -o out                  # Write out/<name>.png for every record
    qrbatch codes.txt -o out -e .jpg          # Use a different file extension
    cat codes.txt | qrbatch - -o out          # Read records from stdin
    qrbatch codes.txt -o out -w 2             # Limit to two workers
    qrbatch codes.txt -o out --ec-level high  # Higher error correction
    qrbatch completions bash > qrbatch.bash   # Generate bash completions

RECORD FORMAT:
    alice 123     -> out/alice.png encoding '123'
    carol         -> out/carol.png encoding 'carol'
    Blank lines are skipped, lines with more than two tokens are reported.

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Record list file ('-' for stdin)
    #[arg(value_name = "RECORDS")]
    records: Option<String>,

    /// Folder the images are written to
    #[arg(short, long, value_name = "FOLDER")]
    output: Option<PathBuf>,

    /// Extension appended to each record name
    #[arg(short, long, default_value = ".png")]
    extension: String,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Number of workers (0 = one per CPU)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Image width and height in pixels
    #[arg(long)]
    pixel_size: Option<u32>,

    /// QR error-correction level
    #[arg(long, value_enum)]
    ec_level: Option<CliEcLevel>,
}

// @struct: Custom logger implementation, filtered by the global max level
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Info by default; the level is raised or lowered once the config is loaded
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "qrbatch", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Generate(args)) => run_generate(args),
        None => {
            let records = cli.records.ok_or_else(|| {
                anyhow!("RECORDS is required when no subcommand is specified")
            })?;
            let output = cli.output.ok_or_else(|| {
                anyhow!("--output is required when no subcommand is specified")
            })?;

            run_generate(GenerateArgs {
                records,
                output,
                extension: cli.extension,
                config_path: cli.config_path,
                log_level: cli.log_level,
                workers: cli.workers,
                pixel_size: cli.pixel_size,
                ec_level: cli.ec_level,
            })
        }
    }
}

fn run_generate(options: GenerateArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(Path::new(&options.config_path))?;

    if let Some(workers) = options.workers {
        config.generation.worker_count = workers;
    }
    if let Some(pixel_size) = options.pixel_size {
        config.generation.pixel_size = pixel_size;
    }
    if let Some(ec_level) = &options.ec_level {
        config.generation.error_correction = ec_level.clone().into();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;
    let record_list = Controller::read_records(&options.records)?;

    let report = controller.run(&record_list, &options.output, &options.extension)?;
    info!("{}", report.summary);

    Ok(())
}
