//! Dawn of Justice - console front end
//!
//! Collects fighter names (flags first, then an interactive prompt), runs
//! one fight and prints it turn by turn, or dumps the full report as JSON.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use dawn_of_justice::core::{DuelError, FightConfig, Randomness, Result, SeededRng};
use dawn_of_justice::fight::{
    ArchetypeCatalog, Fight, FightPhase, FightResult, Roster, SpecialSkill, TurnResult,
};

const RULE: &str =
    "===============================================================================";
const THIN_RULE: &str =
    "-------------------------------------------------------------------------------";

/// Dawn of Justice - turn-based duels between roster fighters
#[derive(Parser, Debug)]
#[command(name = "doj")]
#[command(about = "Dawn of Justice")]
struct Args {
    /// Fighter name (repeatable); missing fighters are prompted for
    #[arg(long = "fighter", short = 'f')]
    fighters: Vec<String>,

    /// Random seed for reproducible fights
    #[arg(long)]
    seed: Option<u64>,

    /// Maximum number of rounds
    #[arg(long)]
    rounds: Option<u32>,

    /// Pacing multiplier (0 disables pauses)
    #[arg(long)]
    speed: Option<f32>,

    /// Fight config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Archetype catalog file (TOML, `[[archetype]]` tables)
    #[arg(long)]
    archetypes: Option<PathBuf>,

    /// Roster file (TOML, `names = [...]`)
    #[arg(long)]
    roster: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the roster and archetypes, then exit
    #[arg(long)]
    list: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dawn_of_justice=info,doj=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let catalog_file;
    let catalog = match &args.archetypes {
        Some(path) => {
            catalog_file = ArchetypeCatalog::load(path)?;
            tracing::info!(
                path = %path.display(),
                archetypes = catalog_file.len(),
                "catalog loaded"
            );
            &catalog_file
        }
        None => ArchetypeCatalog::standard(),
    };

    let roster_file;
    let roster = match &args.roster {
        Some(path) => {
            roster_file = Roster::load(path)?;
            tracing::info!(path = %path.display(), fighters = roster_file.len(), "roster loaded");
            &roster_file
        }
        None => Roster::standard(),
    };

    if args.list {
        print_listing(catalog, roster);
        return Ok(());
    }

    let config = build_config(&args)?;
    let rng = match config.seed {
        Some(seed) => SeededRng::new(seed),
        None => SeededRng::from_entropy(),
    };
    let seed = rng.seed();
    tracing::info!(seed, max_rounds = config.max_rounds, "starting fight");

    let speed = config.speed;
    let mut fight = Fight::new(config, catalog, roster, rng)?;

    match args.format {
        Format::Json => {
            add_fighters(&mut fight, &args.fighters, false)?;
            let report = fight.run_report()?;
            tracing::info!(summary = %report.summary(), "fight finished");
            println!("{}", report.to_json()?);
        }
        Format::Text => {
            let pacer = Pacer(speed);
            show_header(seed);
            add_fighters(&mut fight, &args.fighters, true)?;
            fight.compute_turn_order()?;
            show_fight_card(&fight, &pacer);
            let_battle_commence(&mut fight, &pacer)?;
            show_fight_result(&fight);
        }
    }

    Ok(())
}

/// File values first, flags on top
fn build_config(args: &Args) -> Result<FightConfig> {
    let mut config = match &args.config {
        Some(path) => FightConfig::load(path)?,
        None => FightConfig::default(),
    };

    if let Some(rounds) = args.rounds {
        config = config.with_max_rounds(rounds);
    }
    if let Some(speed) = args.speed {
        config = config.with_speed(speed);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    config.validate()?;
    Ok(config)
}

fn add_fighters<R>(fight: &mut Fight<'_, R>, names: &[String], interactive: bool) -> Result<()>
where
    R: Randomness,
{
    for name in names {
        fight.add_fighter(name)?;
    }

    let capacity = fight.config().max_fighters;
    if fight.fighters().len() < capacity && !interactive {
        return Err(DuelError::RosterIncomplete {
            have: fight.fighters().len(),
            need: capacity,
        });
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    while !fight.is_full() {
        let slot = fight.fighters().len() + 1;
        let name = choose_fighter(fight.roster(), slot, &mut input)?;
        fight.add_fighter(&name)?;
    }
    Ok(())
}

/// Ask until a valid roster name or number is given; empty input picks the first entry
fn choose_fighter(roster: &Roster, slot: usize, input: &mut impl BufRead) -> Result<String> {
    loop {
        println!("Choose fighter {}:", slot);
        for (i, name) in roster.names().iter().enumerate() {
            println!("  [{}] {}", i, name);
        }
        print!(" > ");
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(DuelError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no fighter chosen",
            )));
        }

        match parse_choice(roster, line.trim()) {
            Some(name) => return Ok(name),
            None => println!("Fighter {} is invalid. Please choose again", line.trim()),
        }
    }
}

fn parse_choice(roster: &Roster, answer: &str) -> Option<String> {
    if answer.is_empty() {
        return roster.names().first().cloned();
    }
    if let Ok(index) = answer.parse::<usize>() {
        return roster.names().get(index).cloned();
    }
    roster.is_valid(answer).then(|| answer.to_string())
}

struct Pacer(f32);

impl Pacer {
    /// Pause for `beats` scaled by the speed; durations that cannot be represented are skipped
    fn beat(&self, beats: f32) {
        match Duration::try_from_secs_f32(beats * self.0) {
            Ok(pause) if !pause.is_zero() => thread::sleep(pause),
            _ => {}
        }
    }
}

fn show_header(seed: u64) {
    println!("{}", RULE);
    println!("   D A W N - O F - J U S T I C E");
    println!("   seed {}", seed);
    println!("{}", RULE);
}

fn show_fight_card<R>(fight: &Fight<'_, R>, pacer: &Pacer)
where
    R: Randomness,
{
    println!("{}", RULE);
    println!("F I G H T - N I G H T");
    println!("{}", THIN_RULE);
    pacer.beat(1.0);
    println!("{}", fight.card());
    pacer.beat(1.0);
    show_fight_stats(fight);
    pacer.beat(1.0);
    println!();
    println!("LET THEM FIGHT!");
    println!("{}", RULE);
    pacer.beat(1.0);
}

fn let_battle_commence<R>(fight: &mut Fight<'_, R>, pacer: &Pacer) -> Result<()>
where
    R: Randomness,
{
    let mut shown_round = 0;

    while let Some(turn) = fight.next_turn()? {
        if turn.round != shown_round {
            shown_round = turn.round;
            println!("R O U N D - {}", turn.round);
            println!("{}", THIN_RULE);
            pacer.beat(1.0);

            if turn.round == 1 {
                if let Some(first) = fight.order().first().and_then(|&p| fight.fighter(p)) {
                    println!("- {} threw the first punch!", first.name());
                }
                pacer.beat(1.0);
            }
        }

        show_turn(fight, &turn);

        let round_over = fight.phase() == FightPhase::Resolved || fight.round() != turn.round;
        if round_over {
            show_fight_stats(fight);
            println!("{}", RULE);
            pacer.beat(2.0);
        } else {
            pacer.beat(1.0);
        }
    }
    Ok(())
}

fn show_turn<R>(fight: &Fight<'_, R>, turn: &TurnResult)
where
    R: Randomness,
{
    let name = |position: usize| fight.fighter(position).map(|f| f.name()).unwrap_or("?");
    let attacker = name(turn.fighter);

    let Some(outcome) = &turn.outcome else {
        println!("- {} didn't attack because they were stunned", attacker);
        return;
    };

    let opponent = name(outcome.opponent);
    let knocked_out = fight
        .fighter(outcome.opponent)
        .map(|f| f.is_knocked_out())
        .unwrap_or(false);
    let strike = &outcome.strike;

    println!(
        "- {} {} {}{}",
        attacker,
        strike.verb,
        opponent,
        strike_tail(opponent, knocked_out, strike.damage)
    );

    match strike.special {
        Some(SpecialSkill::LuckyStrike) => println!("- {} got in a lucky strike", attacker),
        Some(SpecialSkill::StunningBlow) => println!(
            "- {}'s attack has taken {} by surprise and stunned the opponent",
            attacker, opponent
        ),
        Some(SpecialSkill::CounterAttack) => {
            println!("- {} countered {}'s attack", opponent, attacker);
            if fight.fighter(turn.fighter).is_some_and(|f| f.is_knocked_out()) {
                println!("- {} was knocked out by the counter!", attacker);
            }
        }
        None => {}
    }
}

/// Closing clause of a turn line; an attack that did no damage reads as a miss
fn strike_tail(opponent: &str, knocked_out: bool, damage: i32) -> String {
    if knocked_out {
        format!(", knocking {} out!", opponent)
    } else if damage > 0 {
        format!(
            ", wounding {} and inflicting {} damage points.",
            opponent, damage
        )
    } else {
        format!(" but {} managed to dodge the attack and it missed.", opponent)
    }
}

fn show_fight_result<R>(fight: &Fight<'_, R>)
where
    R: Randomness,
{
    println!("F I G H T - R E S U L T");
    println!("{}", THIN_RULE);

    let name = |position: usize| fight.fighter(position).map(|f| f.name()).unwrap_or("?");
    match fight.result() {
        FightResult::Knockout { winner, .. } => {
            println!("The winner, by way of knock out is: {}", name(winner))
        }
        FightResult::Decision { winner } => println!(
            "The winner, on remaining health after {} rounds, is: {}",
            fight.round(),
            name(winner)
        ),
        FightResult::Draw => println!("The fight ended as a draw"),
    }
    println!("{}", RULE);
}

fn show_fight_stats<R>(fight: &Fight<'_, R>)
where
    R: Randomness,
{
    println!();
    let headers = [
        "No.", "Name", "Type", "Health", "Strength", "Defense", "Speed", "Luck", "Special",
    ];
    let rows: Vec<Vec<String>> = fight
        .snapshots()
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            vec![
                (i + 1).to_string(),
                s.name,
                s.archetype,
                s.health.to_string(),
                s.strength.to_string(),
                s.defense.to_string(),
                s.speed.to_string(),
                format!("{:.2}", s.luck),
                s.special,
            ]
        })
        .collect();
    print!("{}", render_table(&headers, &rows));
}

fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let border = format!("+{}+\n", border);
    let line = |cells: Vec<&str>| {
        let cells = cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!(" {:<w$} ", cell, w = *w))
            .collect::<Vec<_>>()
            .join("|");
        format!("|{}|\n", cells)
    };

    let mut out = border.clone();
    out.push_str(&line(headers.to_vec()));
    out.push_str(&border);
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
    }
    out.push_str(&border);
    out
}

fn print_listing(catalog: &ArchetypeCatalog, roster: &Roster) {
    println!("Fighters:");
    for (i, name) in roster.names().iter().enumerate() {
        println!("  [{}] {}", i, name);
    }
    println!();
    println!("Archetypes:");
    for archetype in catalog.iter() {
        println!(
            "  {:<10} health {}  strength {}  defense {}  speed {}  luck {}  special {}",
            archetype.name,
            archetype.health,
            archetype.strength,
            archetype.defense,
            archetype.speed,
            archetype.luck,
            archetype.special
        );
    }
}
