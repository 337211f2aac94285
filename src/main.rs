//! Cafeteria Menu OCR
//!
//! Splits a weekly cafeteria menu image into per-day columns and turns each
//! day's column into a formatted lunch menu using a multimodal model.

mod config;
mod error;
mod ocr;
mod paths;
mod split;

use anyhow::Result;
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use config::MenuConfig;
use ocr::{GeminiClient, MenuExtractor};
use split::OutputNaming;

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("menu_ocr.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

#[derive(Parser, Debug)]
#[command(name = "menu-ocr", version, about = "Split a weekly menu and extract daily lunch menus")]
struct Cli {
    /// JSON config file (defaults: menu_ocr.json next to the executable, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split the weekly menu image into five day columns
    Split(SplitArgs),
    /// Extract the lunch menu for one day or the whole week
    Ocr(OcrArgs),
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SplitMethod {
    /// Five equal-width columns
    Fixed,
    /// Columns at detected table lines, falling back to fixed
    Detect,
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// Menu image (default: source_image from config)
    #[arg(long)]
    image: Option<PathBuf>,

    /// Output directory (default: output_dir from config)
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = SplitMethod::Fixed)]
    method: SplitMethod,

    /// Name files 1.png..5.png instead of by day label
    #[arg(long, default_value_t = false)]
    numbered: bool,
}

#[derive(Args, Debug)]
struct OcrArgs {
    /// Day to process (1 = Monday .. 5 = Friday)
    #[arg(long, default_value_t = 1, conflicts_with = "week")]
    day: u32,

    /// Process all five days in order
    #[arg(long, default_value_t = false)]
    week: bool,

    /// Directory holding 0.png and the day images (default: output_dir from config)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Do not keep combined_<day>.png
    #[arg(long, default_value_t = false)]
    no_composite: bool,

    /// Date label put in the prompt instead of the day name
    #[arg(long, conflicts_with = "week")]
    date: Option<String>,
}

fn main() -> ExitCode {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = if let Some(loc) = panic_info.location() {
            format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column())
        } else {
            String::new()
        };
        log(&format!("[PANIC]{} {}", location, msg));
    }));

    let cli = Cli::parse();

    if let Err(e) = paths::ensure_directories() {
        eprintln!("Warning: cannot create logs directory: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log(&format!("Error: {:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref());
    config.validate()?;

    match cli.command {
        Command::Split(args) => run_split(&config, args),
        Command::Ocr(args) => run_ocr(&config, args),
    }
}

fn run_split(config: &MenuConfig, args: SplitArgs) -> Result<()> {
    let image = args.image.unwrap_or_else(|| config.source_image.clone());
    let output = args.output.unwrap_or_else(|| config.output_dir.clone());
    let naming = if args.numbered {
        OutputNaming::Index
    } else {
        OutputNaming::Label
    };

    log(&format!(
        "Splitting {} ({:?}) into {}",
        image.display(),
        args.method,
        output.display()
    ));

    let days = match args.method {
        SplitMethod::Fixed => split::split_fixed(&image, &config.day_labels, &output, naming)?,
        SplitMethod::Detect => split::split_by_detected_boundaries(
            &image,
            &config.day_labels,
            &output,
            naming,
            &config.detection,
        )?,
    };

    for day in &days {
        println!(
            "{}. {} ({}x{}): {}",
            day.index + 1,
            day.label,
            day.image.width(),
            day.image.height(),
            day.path.display()
        );
    }
    Ok(())
}

fn run_ocr(config: &MenuConfig, args: OcrArgs) -> Result<()> {
    let output = args.output.unwrap_or_else(|| config.output_dir.clone());
    let save_composite = !args.no_composite;

    let client = GeminiClient::from_config(config)?;
    let extractor = MenuExtractor::new(&client, config);

    if args.week {
        let texts = extractor.process_week(&output, save_composite)?;
        for (day, text) in (1..).zip(texts) {
            print_menu(config, &output, day, &text);
        }
    } else {
        let text = extractor.process_day(args.day, &output, save_composite, args.date.as_deref())?;
        print_menu(config, &output, args.day, &text);
    }
    Ok(())
}

fn print_menu(config: &MenuConfig, output: &std::path::Path, day: u32, text: &str) {
    println!("===== {} menu =====", config.day_label(day));
    println!("{}", text);
    println!("{}", "=".repeat(30));
    println!("Saved: {}", paths::result_path(output, day).display());
}
