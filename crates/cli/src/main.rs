mod persistence;
mod play;
mod render;

use anyhow::Context;
use persistence::{default_save_path, FileStore};
use render::{format_summary, Style};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wretched_core::{EventBus, RandomSource, RngState, SaveStore, Session, SessionError, StoreError};
use wretched_data::{
    load_catalog_partial, load_config, load_game_dir, validate_game_dir, GameSummary, CARDS_FILE,
    CONFIG_FILE, STORY_FILE,
};

const USAGE: &str = "\
wretched - solitaire journaling games from YAML

usage:
  wretched [--no-color] [--debug] <command> ...

commands:
  validate <game_dir>                          check config.yaml and cards.yaml
  info <game_dir> [--json]                     show game metadata and mechanics
  play <game_dir> [--save PATH] [--seed N] [--fresh]
                                               play in the terminal

environment:
  WRETCHED_SAVE   save file (default ~/.wretched_save.json)
  WRETCHED_LOG    log filter, e.g. debug or wretched::tower=trace";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct GlobalOptions {
    no_color: bool,
    debug: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlayOptions {
    game_dir: PathBuf,
    save: Option<PathBuf>,
    seed: Option<u64>,
    fresh: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Validate { game_dir: PathBuf },
    Info { game_dir: PathBuf, json: bool },
    Play(PlayOptions),
    Help,
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (globals, command) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(msg) => {
            eprintln!("{msg}\n\n{USAGE}");
            std::process::exit(2);
        }
    };
    init_tracing(globals.debug);
    let style = Style::new(!globals.no_color && io::stdout().is_terminal());
    let code = match run(command, &style) {
        Ok(code) => code,
        Err(err) => {
            println!("{}", style.error(&format!("{err:#}")));
            1
        }
    };
    std::process::exit(code);
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("WRETCHED_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn parse_args(args: &[String]) -> Result<(GlobalOptions, Command), String> {
    let mut globals = GlobalOptions::default();
    let mut rest = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--no-color" => globals.no_color = true,
            "--debug" => globals.debug = true,
            _ => rest.push(arg.as_str()),
        }
    }
    let Some((&name, tail)) = rest.split_first() else {
        return Ok((globals, Command::Help));
    };
    let command = match name {
        "validate" => Command::Validate {
            game_dir: game_dir_arg(tail)?,
        },
        "info" => Command::Info {
            game_dir: game_dir_arg(tail)?,
            json: tail.contains(&"--json"),
        },
        "play" => Command::Play(parse_play(tail)?),
        "help" | "--help" | "-h" => Command::Help,
        other => return Err(format!("unknown command '{other}'")),
    };
    Ok((globals, command))
}

fn game_dir_arg(tail: &[&str]) -> Result<PathBuf, String> {
    tail.iter()
        .find(|arg| !arg.starts_with("--"))
        .map(PathBuf::from)
        .ok_or_else(|| "missing <game_dir>".to_string())
}

fn parse_play(tail: &[&str]) -> Result<PlayOptions, String> {
    let mut game_dir = None;
    let mut save = None;
    let mut seed = None;
    let mut fresh = false;
    let mut idx = 0usize;
    while idx < tail.len() {
        match tail[idx] {
            "--save" | "-s" => {
                let value = tail.get(idx + 1).ok_or("--save needs a path")?;
                save = Some(PathBuf::from(value));
                idx += 1;
            }
            "--seed" => {
                let value = tail.get(idx + 1).ok_or("--seed needs a number")?;
                seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("invalid seed '{value}'"))?,
                );
                idx += 1;
            }
            "--fresh" => fresh = true,
            other if other.starts_with('-') => return Err(format!("unknown option '{other}'")),
            other => game_dir = Some(PathBuf::from(other)),
        }
        idx += 1;
    }
    Ok(PlayOptions {
        game_dir: game_dir.ok_or("missing <game_dir>")?,
        save,
        seed,
        fresh,
    })
}

fn run(command: Command, style: &Style) -> anyhow::Result<i32> {
    match command {
        Command::Help => {
            println!("{USAGE}");
            Ok(0)
        }
        Command::Validate { game_dir } => validate_command(&game_dir, style),
        Command::Info { game_dir, json } => info_command(&game_dir, json, style),
        Command::Play(options) => play_command(options, style),
    }
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    if !dir.exists() {
        anyhow::bail!("game directory not found: {}", dir.display());
    }
    if !dir.is_dir() {
        anyhow::bail!("path is not a directory: {}", dir.display());
    }
    Ok(())
}

fn validate_command(dir: &Path, style: &Style) -> anyhow::Result<i32> {
    ensure_dir(dir)?;
    println!("\n{} {}\n", style.bold("Validating game:"), dir.display());
    println!("{}", style.info("Checking for required files..."));
    for name in [CONFIG_FILE, CARDS_FILE, STORY_FILE] {
        let found = dir.join(name).exists();
        let line = match (found, name == STORY_FILE) {
            (true, _) => style.success(&format!("{name}: Found")),
            (false, true) => style.warning(&format!("{name}: not found (optional)")),
            (false, false) => style.error(&format!("{name}: NOT FOUND")),
        };
        println!("{line}");
    }

    println!("\n{}", style.bold("Validating content..."));
    let problems = validate_game_dir(dir);
    if problems.is_empty() {
        println!("{}", style.success("All validations passed!"));
        println!("\nGame configuration is valid and ready to play!\n");
        return Ok(0);
    }
    println!(
        "{}",
        style.error(&format!(
            "Validation failed with {} error(s):",
            problems.len()
        ))
    );
    for problem in &problems {
        println!("{}", style.bullet(problem));
    }
    Ok(1)
}

fn info_command(dir: &Path, json: bool, style: &Style) -> anyhow::Result<i32> {
    ensure_dir(dir)?;
    let config = load_config(dir)?;
    let catalog = load_catalog_partial(dir)?;
    let summary = GameSummary::from_parts(&config, &catalog);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("encode summary")?
        );
        return Ok(0);
    }
    println!();
    for line in format_summary(&summary, style) {
        println!("{line}");
    }
    println!();
    Ok(0)
}

fn play_command(options: PlayOptions, style: &Style) -> anyhow::Result<i32> {
    ensure_dir(&options.game_dir)?;
    let loaded = load_game_dir(&options.game_dir)
        .with_context(|| format!("load game from {}", options.game_dir.display()))?;
    let save_path = match options.save {
        Some(path) => path,
        None => default_save_path().context("save path unavailable; pass --save")?,
    };
    let mut store = FileStore::new(save_path.clone());
    if options.fresh {
        store.clear().context("discard previous save")?;
    }
    let rng: Box<dyn RandomSource> = match options.seed {
        Some(seed) => Box::new(RngState::from_seed(seed)),
        None => Box::new(RngState::from_entropy()),
    };
    tracing::info!(
        target: "wretched::cli",
        game = %loaded.config.game.title,
        save = %store.path().display(),
        seed = ?options.seed,
        "play.start"
    );

    println!(
        "\n{}\n",
        style.bold(&format!(
            "{} by {}",
            loaded.config.game.title, loaded.config.game.author
        ))
    );
    let mut events = EventBus::default();
    let mut session = match Session::open(loaded.config, loaded.catalog, store, rng, &mut events)
    {
        Ok(session) => session,
        Err(SessionError::Store(
            err @ (StoreError::ContentMismatch { .. } | StoreError::Invalid(_)),
        )) => anyhow::bail!(
            "{err}\nthe save at {} cannot be resumed; run again with --fresh to start over",
            save_path.display()
        ),
        Err(err) => return Err(err).context("open save"),
    };
    if let Some(story) = loaded.story.as_deref() {
        if session.game().history().is_empty() && session.game().pending().is_none() {
            println!("{}\n", story.trim());
        }
    }
    // report what `open` did before the loop takes over the bus
    for event in events.drain() {
        if let Some(line) = render::format_event(&event, session.game().catalog()) {
            println!("{line}");
        }
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    play::run_repl(
        &mut session,
        loaded.story.as_deref(),
        stdin.lock(),
        &mut stdout,
        style,
    )?;
    Ok(0)
}
