use std::{
    fmt::Arguments,
    io::Read,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand, ValueEnum};
use fern::colors::{Color, ColoredLevelConfig};
use log::{info, warn};
use miette::IntoDiagnostic;
use serde::Serialize;

use wlkv::{
    config::{Config, LogConfig},
    core::{
        protocol::{self, EventParser, MultilineParser, Tokenizer},
        survey::{SurveyEntry, SurveyInfo},
        types::{Record, RecordSeq},
    },
    timeit,
    utils::DebugDump,
};

#[derive(Debug, Parser)]
#[command(name = "wlkv", version, about = "Parse wireless driver key=value output")]
struct Cli {
    /// TOML or JSON config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read from this file instead of stdin.
    #[arg(short, long)]
    input: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Pretty JSON on stdout.
    Json,
    /// Debug dump through the logger.
    Dump,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Accumulate every line into a single record.
    Line,
    /// One record per block.
    Multiline,
    /// One record per event line, using the configured event shape.
    Event,
    /// Channel utilization from survey blocks.
    Survey,
}

#[derive(Debug, Serialize)]
struct SurveyReport<'a> {
    channel_utilization: Option<u8>,
    entries: &'a [SurveyEntry],
}

fn setup_logger(cfg: &LogConfig, level: log::LevelFilter) -> Result<(), fern::InitError> {
    let colors = ColoredLevelConfig::new()
        .debug(Color::Cyan)
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::White)
        .trace(Color::Magenta);

    let module = cfg.module.clone();
    let make_formatter = move |use_color: bool| {
        let module = module.clone();
        move |out: fern::FormatCallback, message: &Arguments, record: &log::Record| {
            let now = jiff::Zoned::now();
            let now = now.strftime("%Y-%m-%d %H:%M:%S");

            let target = record.target();
            let mut target = target.replacen("wlkv", &module, 1);
            if let Some(line) = record.line() {
                target = format!("{}:{}", target, line);
            }
            let target = target;

            if use_color {
                out.finish(format_args!(
                    "[{} {} {}] {}",
                    now,
                    colors.color(record.level()),
                    target,
                    message
                ))
            } else {
                out.finish(format_args!(
                    "[{} {} {}] {}",
                    now,
                    record.level(),
                    target,
                    message
                ))
            }
        }
    };

    let mut dispatch = fern::Dispatch::new().level(level);

    if cfg.console {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(make_formatter(true))
                .chain(std::io::stderr()),
        );
    }

    if let Some(path) = &cfg.file {
        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(make_formatter(false))
                .chain(fern::log_file(path)?),
        );
    }

    dispatch.apply()?;

    Ok(())
}

fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    let buf = match path {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buf)?;
            buf
        }
    };

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn emit<T>(value: &T, format: Format) -> miette::Result<()>
where
    T: Serialize + DebugDump + ?Sized,
{
    match format {
        Format::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
        }
        Format::Dump => value.debug_dump(),
    }

    Ok(())
}

pub fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    let mut level = config.log.level_filter();
    if cli.format == Format::Dump && level < log::LevelFilter::Debug {
        level = log::LevelFilter::Debug;
    }
    setup_logger(&config.log, level).into_diagnostic()?;

    if let Some(path) = &cli.config {
        info!("Loaded config from {}", path.display());
    }

    let input = read_input(cli.input.as_deref()).into_diagnostic()?;

    match cli.command {
        Command::Line => {
            let tokenizer = Tokenizer::from_config(&config.tokenizer);
            let mut record = Record::new();
            timeit!("line parse", tokenizer.parse_text(&input, &mut record));
            emit(&record, cli.format)?;
        }
        Command::Multiline => {
            let parser = MultilineParser::from_config(&config.tokenizer, &config.multiline);
            let records = timeit!("multiline parse", parser.parse(&input));
            emit(&records, cli.format)?;
        }
        Command::Event => {
            let parser = EventParser::from_config(&config.event);
            let records = timeit!(
                "event parse",
                protocol::lines(&input)
                    .filter(|line| !line.trim().is_empty())
                    .map(|line| parser.parse_event(line))
                    .collect::<RecordSeq>()
            );
            emit(&records, cli.format)?;
        }
        Command::Survey => {
            let parser = MultilineParser::from_config(&config.tokenizer, &config.multiline);
            let records = timeit!("survey parse", parser.parse(&input));
            let survey = SurveyInfo::from_records(&records);
            let utilization = survey.channel_utilization();

            match cli.format {
                Format::Json => {
                    let report = SurveyReport {
                        channel_utilization: utilization,
                        entries: &survey.entries,
                    };
                    let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
                    println!("{}", json);
                }
                Format::Dump => {
                    records.debug_dump();
                    match utilization {
                        Some(percent) => info!("Channel utilization: {}%", percent),
                        None => warn!("No in-use channel with active time in survey"),
                    }
                }
            }
        }
    }

    Ok(())
}
