use std::path::PathBuf;
use std::process::exit;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use scripture_backend::app_settings::AppSettings;
use scripture_backend::logger;

use scripture_cli::integration::BookConverter;
use scripture_cli::passage::{
    book_code_from_path, extract_passage, read_book_html, sync_passage, PassageFormat, PassageRequest,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "USX Scripture conversion and passage tools", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Optional path to a JSON settings file.
    /// If not provided, the SCRIPTURE_SETTINGS environment variable will be used.
    #[arg(long, global = true, value_name = "FILE_PATH", env = "SCRIPTURE_SETTINGS")]
    settings: Option<PathBuf>,

    /// Log level: silent, error, warn, info or debug. Overrides LOG_LEVEL.
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a directory of USX books into HTML and JSON assets
    #[command(arg_required_else_help = true)]
    Convert {
        /// Directory containing .usx files (searched recursively)
        #[arg(value_name = "DIRECTORY_PATH")]
        input_dir: PathBuf,

        /// Directory to write html/, html_verses/ and txt/ into
        #[arg(value_name = "DIRECTORY_PATH")]
        output_dir: PathBuf,

        /// Keep word-alignment spans in the output
        #[arg(long, default_value_t = false)]
        alignment: bool,

        /// Log every converted book
        #[arg(long, short, default_value_t = false)]
        verbose: bool,
    },

    /// Extract a passage from a converted book HTML file
    #[command(arg_required_else_help = true)]
    Passage {
        /// Path to a consolidated book HTML file, e.g. out/html/JHN.html
        #[arg(value_name = "FILE_PATH")]
        html_file: PathBuf,

        /// Reference such as "3:16-18", "JHN 3" or "John 3:16-4:2"
        reference: String,

        #[arg(long, value_enum, default_value_t = PassageFormat::Html)]
        format: PassageFormat,

        /// HTML appended after the passage, overrides the settings
        #[arg(long)]
        attribution: Option<String>,
    },

    /// Align a passage across translations of the same book and print JSON rows
    #[command(arg_required_else_help = true)]
    Sync {
        /// Reference such as "3" or "3:16-18"
        reference: String,

        /// Consolidated book HTML files, the first one provides the headings
        #[arg(value_name = "FILE_PATH", required = true, num_args = 1..)]
        html_files: Vec<PathBuf>,
    },
}

fn load_settings(path: Option<PathBuf>) -> Result<AppSettings> {
    let mut settings = match path {
        Some(path) => AppSettings::load_from_file(&path)?,
        None => AppSettings::default(),
    };
    settings.apply_env();
    Ok(settings)
}

fn convert(settings: AppSettings, input_dir: PathBuf, output_dir: PathBuf, verbose: bool) -> Result<()> {
    let start = Instant::now();
    // One log file per conversion run
    logger::info_with_options(
        &format!("Converting {} into {}", input_dir.display(), output_dir.display()),
        true,
    );
    let converter = BookConverter::new(settings, verbose)?;
    let stats = converter.process_directory(&input_dir, &output_dir)?;

    logger::info(&format!(
        "Converted {} of {} books in {}, {} errors ({} numbering)",
        stats.books_converted,
        stats.files_processed,
        logger::format_duration(start.elapsed()),
        stats.errors,
        stats.sequence_errors
    ));

    for path in &stats.failed_files {
        eprintln!("Failed: {}", path.display());
    }

    if stats.files_processed > 0 && stats.books_converted == 0 {
        anyhow::bail!("No book could be converted");
    }
    Ok(())
}

fn passage(
    settings: &AppSettings,
    html_file: PathBuf,
    reference: &str,
    format: PassageFormat,
    attribution: Option<String>,
) -> Result<()> {
    let html = read_book_html(&html_file)?;
    let request = PassageRequest::parse(reference)?;
    let file_book = book_code_from_path(&html_file);

    if let (Some(book), Some(code)) = (request.book, &file_book) {
        if book.code != code.as_str() {
            logger::warn(&format!("Reference names {} but the file is {}", book.code, html_file.display()));
        }
    }

    let attribution = attribution.or_else(|| settings.attribution.clone());
    let title = request.title(file_book.as_deref());
    let output = extract_passage(&html, &request, format, attribution.as_deref(), &title, &settings.language)?;

    println!("{}", output);
    Ok(())
}

fn sync(reference: &str, html_files: Vec<PathBuf>) -> Result<()> {
    let request = PassageRequest::parse(reference)?;
    let htmls = html_files
        .iter()
        .map(|path| read_book_html(path))
        .collect::<Result<Vec<String>>>()?;

    let rows = sync_passage(&htmls, &request);
    let json = serde_json::to_string_pretty(&rows).context("Failed to serialize rows")?;

    println!("{}", json);
    Ok(())
}

fn main() {
    // .env may set LOG_LEVEL, LOG_DIR or SCRIPTURE_SETTINGS. Clap will pick
    // up the latter via `env = "SCRIPTURE_SETTINGS"`.
    dotenv().ok();

    let cli = Cli::parse();
    logger::init_tracing();

    if let Some(level) = &cli.log_level {
        if !logger::set_log_level_str(level) {
            eprintln!("Invalid log level: {}", level);
            exit(1);
        }
    }

    let settings = match load_settings(cli.settings) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading settings: {:#}", e);
            exit(1);
        }
    };
    logger::debug(&format!("Settings: {:?}", settings));

    let command_result = match cli.command {
        Commands::Convert { input_dir, output_dir, alignment, verbose } => {
            let mut settings = settings;
            settings.alignment |= alignment;
            convert(settings, input_dir, output_dir, verbose)
        }

        Commands::Passage { html_file, reference, format, attribution } => {
            passage(&settings, html_file, &reference, format, attribution)
        }

        Commands::Sync { reference, html_files } => sync(&reference, html_files),
    };

    if let Err(e) = command_result {
        eprintln!("Error executing command: {:#}", e);
        exit(1);
    }
}
