// SPDX-License-Identifier: MIT OR Apache-2.0
//! Formation Editor - headless driver for choreography shows.
//!
//! Creates, inspects and plays back show files in the JSON exchange format
//! used by the editor.

mod playback;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use formation_sequencer::{
    formation_label, palette, EditorSettings, FormationEditor, SHOW_FILE_NAME,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "formation_editor", version)]
struct Cli {
    /// Editor settings file (RON)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a new show with the starter cast.
    New {
        /// Output show path
        #[arg(default_value = SHOW_FILE_NAME)]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// List the dancers and formations of a show.
    Info {
        /// Show path
        path: PathBuf,
    },
    /// Play every formation transition in real time.
    Play {
        /// Show path
        path: PathBuf,
        /// Frames per second
        #[arg(long, default_value_t = 60)]
        fps: u32,
        /// Playback speed multiplier
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
    },
    /// Write the default settings file.
    InitSettings {
        /// Output settings path
        #[arg(default_value = formation_sequencer::SETTINGS_FILE_NAME)]
        path: PathBuf,
    },
}

/// Default log filter: `RUST_LOG` plus debug output from this binary and
/// the sequencer
fn log_filter() -> anyhow::Result<tracing_subscriber::EnvFilter> {
    Ok(tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("formation_editor=debug".parse()?)
        .add_directive("formation_sequencer=debug".parse()?))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(log_filter()?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!("Starting Formation Editor v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let settings = load_settings(cli.settings.as_deref())?;

    match cli.cmd {
        Command::New { path, force } => cmd_new(settings, &path, force),
        Command::Info { path } => cmd_info(settings, &path),
        Command::Play { path, fps, speed } => cmd_play(settings, &path, fps, speed),
        Command::InitSettings { path } => {
            EditorSettings::default()
                .save(&path)
                .with_context(|| format!("write settings '{}'", path.display()))
        }
    }
}

fn load_settings(path: Option<&Path>) -> anyhow::Result<EditorSettings> {
    match path {
        Some(path) => EditorSettings::load(path)
            .with_context(|| format!("load settings '{}'", path.display())),
        None => Ok(EditorSettings::default()),
    }
}

fn open_show(settings: EditorSettings, path: &Path) -> anyhow::Result<FormationEditor> {
    let mut editor = FormationEditor::new(settings);
    editor
        .load(path)
        .with_context(|| format!("load show '{}'", path.display()))?;
    Ok(editor)
}

fn cmd_new(settings: EditorSettings, path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("'{}' already exists (use --force to overwrite)", path.display());
    }
    FormationEditor::with_starter_cast(settings)
        .save(path)
        .with_context(|| format!("write show '{}'", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn cmd_info(settings: EditorSettings, path: &Path) -> anyhow::Result<()> {
    let editor = open_show(settings, path)?;

    println!("Dancers ({}):", editor.dancers().len());
    for d in editor.dancers() {
        let family = palette::palette_of(&d.color).map_or("custom", |p| p.name);
        println!(
            "  #{:<4} {:<16} {} ({family})  at ({}, {})",
            d.id.value(), d.name, d.color, d.x, d.y
        );
    }

    println!("Formations ({}):", editor.keyframes().len());
    for (index, kf) in editor.keyframes().iter().enumerate() {
        println!(
            "  {:<14} id {:<6} {:>6.1}s  {} positions",
            formation_label(index),
            kf.id.value(),
            kf.duration_seconds(),
            kf.positions.len()
        );
    }
    Ok(())
}

fn cmd_play(settings: EditorSettings, path: &Path, fps: u32, speed: f64) -> anyhow::Result<()> {
    if !(speed > 0.0 && speed.is_finite()) {
        anyhow::bail!("speed must be a positive number, got {speed}");
    }
    let mut editor = open_show(settings, path)?;
    let report = playback::play_all(&mut editor, &mut playback::FrameClock::new(fps), speed);

    println!(
        "Played {} transitions in {} frames",
        report.transitions, report.frames
    );
    for d in editor.dancers() {
        println!("  {:<16} ({}, {})", d.name, d.x, d.y);
    }
    Ok(())
}
