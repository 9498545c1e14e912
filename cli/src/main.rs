//! `algolens` command-line front end
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::PathBuf;

use anyhow::{bail, Context};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;

use algolens_core::config::AppConfig;
use algolens_core::execution::history::HistoryCache;
use algolens_core::query::{GeminiClient, QueryError, SampleLibrary, TraceGenerator};
use algolens_core::playback::PlaybackState;
use algolens_core::session::{SessionOutcome, VisualizerSession};
use algolens_core::storage::FileStore;
use algolens_core::trace::ProblemTrace;
use algolens_visualization::{render_frame, SceneDescription};

/// Generate algorithm traces and play them back step by step
#[derive(Parser)]
#[command(name = "algolens", version, about)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a trace and print it
    Generate {
        query: String,

        /// Also lay out every step as a scene
        #[arg(long)]
        render: bool,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Generate a trace and autoplay it until Ctrl-C
    Play {
        query: String,

        /// Speed multiplier
        #[arg(long, default_value_t = 1.0)]
        speed: f64,

        /// Stop after this many passes through the trace
        #[arg(long, default_value_t = 1)]
        loops: u32,
    },

    /// Generate a trace and ask the tutor about one of its steps
    Ask {
        query: String,

        /// Question, or `go to step N`
        question: String,

        /// 1-based step the question is about
        #[arg(long, default_value_t = 1)]
        step: usize,
    },

    /// Inspect or clear stored traces
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// List the built-in sample queries
    Samples,
}

#[derive(Subcommand)]
enum HistoryCommand {
    List,
    Show { index: usize },
    Clear,
}

/// Gemini when a key is configured; otherwise every request fails so the
/// session falls back to samples
enum Backend {
    Gemini(GeminiClient),
    Unconfigured(String),
}

impl Backend {
    fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        match GeminiClient::from_config(&config.query) {
            Ok(client) => Ok(Self::Gemini(client)),
            Err(QueryError::MissingApiKey(var)) => {
                warn!("No API key configured; only built-in samples are available");
                Ok(Self::Unconfigured(var))
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl TraceGenerator for Backend {
    fn name(&self) -> &str {
        match self {
            Self::Gemini(client) => client.name(),
            Self::Unconfigured(_) => "unconfigured",
        }
    }

    async fn generate(&self, prompt: &str) -> Result<ProblemTrace, QueryError> {
        match self {
            Self::Gemini(client) => client.generate(prompt).await,
            Self::Unconfigured(var) => Err(QueryError::MissingApiKey(var.clone())),
        }
    }

    async fn complete(&self, prompt: &str) -> Result<String, QueryError> {
        match self {
            Self::Gemini(client) => client.complete(prompt).await,
            Self::Unconfigured(var) => Err(QueryError::MissingApiKey(var.clone())),
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn open_store(config: &AppConfig) -> anyhow::Result<FileStore> {
    match &config.history.data_dir {
        Some(dir) => Ok(FileStore::new(dir)),
        None => FileStore::in_data_dir().context("Cannot locate a data directory"),
    }
}

fn open_history(config: &AppConfig) -> anyhow::Result<HistoryCache<FileStore>> {
    Ok(HistoryCache::restore(
        open_store(config)?,
        config.history.storage_key.as_str(),
        config.history.capacity,
    ))
}

fn open_session(config: &AppConfig) -> anyhow::Result<VisualizerSession<Backend, FileStore>> {
    Ok(VisualizerSession::new(
        Backend::from_config(config)?,
        open_store(config)?,
        config,
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::discover(cli.config.as_deref())?;

    match cli.command {
        Command::Generate {
            query,
            render,
            json,
        } => {
            let mut session = open_session(&config)?;
            let outcome = session.submit(&query).await?;
            report_notice(&outcome);
            print_trace(&outcome.trace, render, json)
        }
        Command::Play {
            query,
            speed,
            loops,
        } => {
            let mut session = open_session(&config)?;
            let outcome = session.submit(&query).await?;
            report_notice(&outcome);
            play(&mut session, &outcome.trace, speed, loops).await
        }
        Command::Ask {
            query,
            question,
            step,
        } => {
            let mut session = open_session(&config)?;
            let outcome = session.submit(&query).await?;
            report_notice(&outcome);
            let index = isize::try_from(step).unwrap_or(isize::MAX).saturating_sub(1);
            session.driver_mut().go_to(index);
            match session.ask_tutor(&question).await? {
                Some(reply) => println!("{reply}"),
                None => eprintln!("No step number found in '{question}'"),
            }
            Ok(())
        }
        Command::History { command } => run_history(&config, command),
        Command::Samples => {
            for key in SampleLibrary::builtin().keys() {
                println!("{key}");
            }
            Ok(())
        }
    }
}

/// `generate --render --json` output
#[derive(Serialize)]
struct RenderedTrace<'a> {
    trace: &'a ProblemTrace,
    scenes: &'a [SceneDescription],
}

fn report_notice(outcome: &SessionOutcome) {
    if let Some(notice) = &outcome.notice {
        eprintln!("{notice}");
    }
}

fn print_trace(trace: &ProblemTrace, render: bool, json: bool) -> anyhow::Result<()> {
    let scenes: Vec<SceneDescription> = if render {
        (0..trace.step_count())
            .map(|index| render_frame(trace, &at_step(index)))
            .collect()
    } else {
        Vec::new()
    };

    if json {
        let output = if render {
            serde_json::to_string_pretty(&RenderedTrace {
                trace,
                scenes: &scenes,
            })?
        } else {
            serde_json::to_string_pretty(trace)?
        };
        println!("{output}");
        return Ok(());
    }

    print_summary(trace);
    for scene in &scenes {
        let meshes: usize = scene.fragments.iter().map(|f| f.meshes().count()).sum();
        let labels: usize = scene.fragments.iter().map(|f| f.labels().count()).sum();
        println!(
            "  scene {}: {} meshes, {} labels",
            scene.step_index + 1,
            meshes,
            labels
        );
        for skipped in scene.skipped() {
            println!("    skipped {skipped}");
        }
    }
    Ok(())
}

fn print_summary(trace: &ProblemTrace) {
    println!("{} [{}] ({})", trace.title, trace.difficulty, trace.category);
    if !trace.description.is_empty() {
        println!("{}", trace.description);
    }
    let complexity = &trace.time_complexity;
    println!(
        "Time: best {} / average {} / worst {}, space {}",
        complexity.best, complexity.average, complexity.worst, complexity.space
    );
    for point in &trace.key_points {
        println!("  * {point}");
    }
    for (index, step) in trace.steps.iter().enumerate() {
        println!("{:>3}. {}", index + 1, step.description);
    }
}

fn at_step(index: usize) -> PlaybackState {
    PlaybackState {
        current_step_index: index,
        ..PlaybackState::default()
    }
}

fn print_step(trace: &ProblemTrace, index: usize) {
    let Some(step) = trace.step(index) else {
        return;
    };
    println!(
        "[{}/{}] {}",
        index + 1,
        trace.step_count(),
        step.description
    );
    for line in trace.code_view(index).into_iter().filter(|l| l.highlighted) {
        match line.annotation {
            Some(note) => println!("      {:>3} | {}  // {note}", line.number, line.text),
            None => println!("      {:>3} | {}", line.number, line.text),
        }
    }
}

async fn play(
    session: &mut VisualizerSession<Backend, FileStore>,
    trace: &ProblemTrace,
    speed: f64,
    loops: u32,
) -> anyhow::Result<()> {
    if loops == 0 {
        bail!("--loops must be at least 1");
    }

    let driver = session.driver_mut();
    driver.set_speed(speed)?;
    let mut position = driver.subscribe();
    print_step(trace, 0);
    if !driver.toggle_play() {
        return Ok(());
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut completed = 0;

    loop {
        tokio::select! {
            changed = position.changed() => {
                if changed.is_err() {
                    break;
                }
                let index = *position.borrow_and_update();
                if index == 0 {
                    completed += 1;
                    if completed >= loops {
                        break;
                    }
                }
                print_step(trace, index);
            }
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
        }
    }

    session.driver_mut().pause();
    Ok(())
}

fn run_history(config: &AppConfig, command: HistoryCommand) -> anyhow::Result<()> {
    let mut history = open_history(config)?;
    match command {
        HistoryCommand::List => {
            if history.is_empty() {
                println!("No history");
            }
            for (index, entry) in history.entries().iter().enumerate() {
                println!(
                    "{index:>2}  {}  {} ({})  \"{}\"",
                    entry.timestamp.format("%Y-%m-%d %H:%M"),
                    entry.title,
                    entry.category,
                    entry.original_query
                );
            }
        }
        HistoryCommand::Show { index } => {
            let Some(trace) = history.select(index) else {
                bail!("No history entry at index {index}");
            };
            print_summary(&trace);
        }
        HistoryCommand::Clear => {
            history.clear()?;
            println!("History cleared");
        }
    }
    Ok(())
}
