//! arkcalc CLI
//!
//! Command-line tool for resolving operator skill sheets and calculating
//! skill damage.

mod session;

use arkcalc_core::report::rank_line;
use arkcalc_core::{
    load_skills, render_tree, update_structure_file, CalcReport, Config, DamageKind, Lookup, Rank,
    Roster, Scenario, TranscriptLog, TreeOptions,
};
use clap::{Parser, Subcommand};
use session::Prompter;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arkcalc")]
#[command(about = "Arknights operator skill damage calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Data directory holding the roster, sheets and log
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// JSON config file; overrides --data-dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log resolver decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List operators in the roster
    Characters {
        /// Only show names containing this text
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show resolved rank tables for every skill of an operator
    Skills {
        /// Operator name, index or partial name
        #[arg(short, long)]
        character: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive calculation session (default)
    Calc,

    /// Calculate damage for one skill rank without prompting
    Damage {
        /// Operator name, index or partial name
        #[arg(short, long)]
        character: String,

        /// Skill number
        #[arg(short, long)]
        skill: u32,

        /// Rank (1-7, 特化I-III or m1-m3)
        #[arg(short, long)]
        rank: String,

        /// Treat hits as arts damage
        #[arg(long, conflicts_with = "physical")]
        arts: bool,

        /// Treat hits as physical damage
        #[arg(long)]
        physical: bool,

        /// Enemy defense (physical)
        #[arg(long, default_value_t = 300)]
        enemy_def: i64,

        /// Enemy resistance in percent (arts)
        #[arg(long, default_value_t = 0)]
        enemy_res: i64,

        /// Number of targets hit at once
        #[arg(short, long, default_value_t = 1)]
        targets: u32,

        /// Attack multiplier, required when it cannot be read from the sheet
        #[arg(short, long)]
        multiplier: Option<f64>,

        /// Duration in seconds, overriding the sheet
        #[arg(short, long)]
        duration: Option<f64>,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Do not append to the transcript log
        #[arg(long)]
        no_log: bool,
    },

    /// Refresh the tree block of a structure document
    Structure {
        /// Directory to render
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Markdown file whose first code block holds the tree
        #[arg(short, long, default_value = "STRUCTURE.md")]
        file: PathBuf,
    },

    /// Create a config file template
    InitConfig {
        /// Output path for the config file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> arkcalc_core::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::from_data_dir(&cli.data_dir),
    };

    match cli.command.unwrap_or(Commands::Calc) {
        Commands::Characters { filter } => cmd_characters(&config, filter.as_deref()),
        Commands::Skills { character, json } => cmd_skills(&config, &character, json),
        Commands::Calc => cmd_calc(&config),
        Commands::Damage {
            character,
            skill,
            rank,
            arts,
            physical,
            enemy_def,
            enemy_res,
            targets,
            multiplier,
            duration,
            json,
            no_log,
        } => {
            let kind = match (arts, physical) {
                (true, _) => Some(DamageKind::Arts),
                (_, true) => Some(DamageKind::Physical),
                _ => None,
            };
            let request = DamageRequest {
                character,
                skill,
                rank,
                kind,
                enemy_def,
                enemy_res,
                targets,
                multiplier,
                duration,
            };
            cmd_damage(&config, &request, json, no_log)
        }
        Commands::Structure { root, file } => cmd_structure(&root, &file),
        Commands::InitConfig { output } => cmd_init_config(&config, &output),
    }
}

fn load_roster(config: &Config) -> arkcalc_core::Result<Roster> {
    let roster = Roster::load(&config.characters_csv)?;
    tracing::debug!(count = roster.len(), "loaded roster");
    Ok(roster)
}

fn find_character<'a>(
    roster: &'a Roster,
    query: &str,
) -> arkcalc_core::Result<&'a arkcalc_core::CharacterStats> {
    match roster.lookup(query) {
        Lookup::Found(c) => Ok(c),
        Lookup::Ambiguous(matches) => {
            let names: Vec<&str> = matches.iter().map(|c| c.name.as_str()).collect();
            Err(arkcalc_core::Error::CharacterNotFound(format!(
                "'{}' is ambiguous: {}",
                query,
                names.join(", ")
            )))
        }
        Lookup::NotFound => Err(arkcalc_core::Error::CharacterNotFound(query.to_string())),
    }
}

fn cmd_characters(config: &Config, filter: Option<&str>) -> arkcalc_core::Result<()> {
    let roster = load_roster(config)?;

    println!("Characters ({}):", roster.len());
    println!();

    for (i, c) in roster.characters.iter().enumerate() {
        if filter.is_some_and(|f| !c.name.contains(f)) {
            continue;
        }
        println!("  {:3}. {}", i + 1, session::character_label(c));
    }

    Ok(())
}

fn cmd_skills(config: &Config, query: &str, json: bool) -> arkcalc_core::Result<()> {
    let roster = load_roster(config)?;
    let character = find_character(&roster, query)?;

    let Some(skills) = load_skills(&config.sheets_dir, &character.name) else {
        println!("No skill data for '{}'", character.name);
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&skills)?);
        return Ok(());
    }

    println!("{} ({} / {})", character.name, character.class, character.subclass);
    for skill in &skills {
        println!();
        println!("スキル{} {}", skill.number, skill.name);
        if skill.sheet.is_empty() {
            println!("  ランクデータがありません。");
            continue;
        }
        for (rank, record) in skill.sheet.iter() {
            println!("{}", rank_line(rank, record));
        }
    }

    Ok(())
}

fn cmd_calc(config: &Config) -> arkcalc_core::Result<()> {
    println!("{}", "=".repeat(60));
    println!("  アークナイツ キャラ火力計算ツール");
    println!("{}", "=".repeat(60));

    println!("\nキャラクターデータを読み込み中...");
    let roster = load_roster(config)?;
    println!("  {} キャラクター読み込み完了", roster.len());

    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());
    session::run_interactive(&mut prompter, &roster, config)
}

/// Inputs for a non-interactive calculation
struct DamageRequest {
    character: String,
    skill: u32,
    rank: String,
    /// `None` infers the kind from class and effect
    kind: Option<DamageKind>,
    enemy_def: i64,
    enemy_res: i64,
    targets: u32,
    multiplier: Option<f64>,
    duration: Option<f64>,
}

fn cmd_damage(
    config: &Config,
    request: &DamageRequest,
    json: bool,
    no_log: bool,
) -> arkcalc_core::Result<()> {
    let roster = load_roster(config)?;
    let character = find_character(&roster, &request.character)?;

    let skills = load_skills(&config.sheets_dir, &character.name).unwrap_or_default();
    let skill = skills
        .iter()
        .find(|s| s.number == request.skill)
        .ok_or_else(|| arkcalc_core::Error::SkillNotFound {
            character: character.name.clone(),
            number: request.skill,
        })?;

    let (rank, record) = Rank::from_input(&request.rank)
        .and_then(|r| skill.sheet.get(r).map(|rec| (r, rec)))
        .ok_or_else(|| arkcalc_core::Error::RankNotFound(request.rank.clone()))?;

    if record.needs_review {
        eprintln!(
            "Warning: {} of skill {} was resolved by fallback; check the sheet",
            rank.label(),
            skill.number
        );
    }

    let multiplier = request
        .multiplier
        .or(record.multiplier)
        .ok_or_else(|| {
            arkcalc_core::Error::MultiplierUnresolved(format!("{} {}", skill.name, rank.label()))
        })?;

    let kind = request
        .kind
        .unwrap_or_else(|| DamageKind::infer(&character.class, record.effect.as_deref()));
    let scenario = Scenario {
        kind,
        enemy_def: if kind.is_arts() { 0 } else { request.enemy_def },
        enemy_res: if kind.is_arts() { request.enemy_res } else { 0 },
        targets: request.targets,
    };
    let duration = request.duration.or(record.duration.seconds());

    let report = CalcReport::calculate(
        character,
        skill.number,
        &skill.name,
        rank,
        record,
        scenario,
        multiplier,
        duration,
    );

    let lines = report.lines();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in &lines {
            println!("{}", line);
        }
    }

    if !no_log {
        let log = TranscriptLog::new(&config.log_file);
        if let Err(e) = log.append(&lines) {
            eprintln!("Warning: failed to write log: {}", e);
        }
    }

    Ok(())
}

fn cmd_structure(root: &Path, file: &Path) -> arkcalc_core::Result<()> {
    // Canonical path so "." renders under the directory's real name
    let root = root.canonicalize()?;
    let tree = render_tree(&root, &TreeOptions::default());

    if update_structure_file(file, &tree)? {
        println!("Updated {}", file.display());
    } else {
        println!("{} is up to date", file.display());
    }

    Ok(())
}

fn cmd_init_config(config: &Config, output: &Path) -> arkcalc_core::Result<()> {
    config.save(output)?;
    println!("Created config file: {}", output.display());
    println!();
    println!("Edit the paths, then run:");
    println!("  arkcalc --config {} calc", output.display());

    Ok(())
}
