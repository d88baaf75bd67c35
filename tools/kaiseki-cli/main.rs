use clap::error::ErrorKind;
use clap::{ArgAction, Parser, ValueEnum};
use kaiseki::error::InspectError;
use kaiseki::prelude::*;
use log::LevelFilter;
use std::path::PathBuf;

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExtractorCli {
    Auto,
    Mediainfo,
    Native,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatCli {
    Text,
    Json,
}

/// Shows the prompts, LoRAs and models stored in a ComfyUI video's metadata
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the video file
    video: PathBuf,

    /// Backend used to read container tags
    #[arg(long, value_enum, env = "KAISEKI_EXTRACTOR", default_value = "auto")]
    extractor: ExtractorCli,

    /// MediaInfo executable used by the `auto` and `mediainfo` backends
    #[arg(long, env = "KAISEKI_MEDIAINFO", default_value = "mediainfo")]
    mediainfo: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: FormatCli,

    /// Additional node class treated as a text-prompt encoder (repeatable)
    #[arg(long = "text-encoder", value_name = "CLASS")]
    text_encoders: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(InspectError::Usage(e.to_string()).exit_code());
        }
    };

    init_logger(cli.verbose);
    run(cli);
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn run(cli: Cli) {
    let extractor = match cli.extractor {
        ExtractorCli::Auto => ExtractorChoice::Auto,
        ExtractorCli::Mediainfo => ExtractorChoice::MediaInfo,
        ExtractorCli::Native => ExtractorChoice::Native,
    };
    let analyzer = cli
        .text_encoders
        .iter()
        .fold(WorkflowAnalyzer::builder(), |builder, class_type| {
            builder.with_text_encoder(class_type)
        })
        .build();
    let inspector = Inspector::new(
        extractor.build(&cli.mediainfo),
        PayloadRecoverer::default(),
        analyzer,
    );
    let text = matches!(cli.format, FormatCli::Text);

    Inspector::check_file(&cli.video).unwrap_or_else(|e| exit_with_error(&e, None));

    if text {
        let file_name = cli
            .video
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| cli.video.display().to_string());
        print!("{}", ReportFormatter::banner(&file_name));
    }

    let raw = inspector
        .read_payload(&cli.video)
        .unwrap_or_else(|e| exit_with_error(&e, None));
    let result = inspector
        .analyze_payload(&raw)
        .unwrap_or_else(|e| exit_with_error(&e, Some(&raw)));
    let report = Report::from(&result);

    if text {
        print!("{}", ReportFormatter::format_text(&report));
        println!("{}", ReportFormatter::rule());
    } else {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("[!] Error: could not serialize report: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn exit_with_error(error: &InspectError, raw: Option<&str>) -> ! {
    println!("[!] Error: {}", error);
    if matches!(error, InspectError::NoMetadata) {
        println!(" Make sure 'save_metadata' was enabled in ComfyUI.");
    }
    if let (true, Some(raw)) = (error.wants_preview(), raw) {
        println!("{}", ReportFormatter::preview(raw));
    }
    std::process::exit(error.exit_code());
}
