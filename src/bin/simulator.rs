//! Headless battle simulator
//!
//! Runs auto battles back to back on the logical clock and prints a summary.
//! Useful for checking encounter balance and progression pacing.
//!
//! Usage:
//!   cargo run --bin simulator -- [OPTIONS]
//!
//! Options:
//!   --battles N     Battles to fight (default: 100)
//!   --seed N        RNG seed (default: 42)
//!   --zone ID       Zone to hunt in (default: outskirts)
//!   --settings FILE Battle settings JSON
//!   --auto-capture  Try to capture weakened enemies
//!   --verbose       Print every battle log
//!   --quiet         Only final summary line

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;
use wendao::battle::{BattleEngine, BattleSettings, LogKind, Phase};
use wendao::character::{companion_pending_exp, get_sect, AttributeType, Element, Party, Player};
use wendao::core::constants::SECT_JOIN_LEVEL;

/// Logical time allowed for a single battle before it is abandoned.
const BATTLE_TIMEOUT_MS: u64 = 3_600_000;

// ── CLI Configuration ────────────────────────────────────────────────

struct SimConfig {
    battles: u32,
    seed: u64,
    zone: String,
    settings_path: Option<String>,
    auto_capture: bool,
    verbose: bool,
    quiet: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            battles: 100,
            seed: 42,
            zone: "outskirts".to_string(),
            settings_path: None,
            auto_capture: false,
            verbose: false,
            quiet: false,
        }
    }
}

fn parse_args() -> Result<SimConfig, String> {
    let args: Vec<String> = std::env::args().collect();
    let mut config = SimConfig::default();
    let mut i = 1;
    while i < args.len() {
        let value = |i: usize| {
            args.get(i + 1)
                .cloned()
                .ok_or_else(|| format!("{} requires a value", args[i]))
        };
        match args[i].as_str() {
            "--battles" => {
                config.battles = value(i)?
                    .parse()
                    .map_err(|_| "--battles requires a number".to_string())?;
                i += 1;
            }
            "--seed" => {
                config.seed = value(i)?
                    .parse()
                    .map_err(|_| "--seed requires a number".to_string())?;
                i += 1;
            }
            "--zone" => {
                config.zone = value(i)?;
                i += 1;
            }
            "--settings" => {
                config.settings_path = Some(value(i)?);
                i += 1;
            }
            "--auto-capture" => config.auto_capture = true,
            "--verbose" => config.verbose = true,
            "--quiet" => config.quiet = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("Unknown argument: {other}")),
        }
        i += 1;
    }
    Ok(config)
}

fn print_usage() {
    eprintln!(
        "Wendao Battle Simulator\n\
         \n\
         Usage: simulator [OPTIONS]\n\
         \n\
         Options:\n\
         \x20 --battles N     Battles to fight (default: 100)\n\
         \x20 --seed N        RNG seed (default: 42)\n\
         \x20 --zone ID       Zone to hunt in (default: outskirts)\n\
         \x20 --settings FILE Battle settings JSON\n\
         \x20 --auto-capture  Try to capture weakened enemies\n\
         \x20 --verbose       Print every battle log\n\
         \x20 --quiet         Only final summary line\n\
         \x20 --help, -h      Show this help"
    );
}

// ── Between Battles ──────────────────────────────────────────────────

/// Spends attribute points and picks up sect skills the way a steady
/// player would.
fn tend_party(engine: &mut BattleEngine<ChaCha8Rng>) {
    let mut skill_to_use = None;
    if let Ok(party) = engine.party_mut() {
        let player = &mut party.player;
        while player.attribute_points > 0 {
            let attr = match player.attribute_points % 3 {
                0 => AttributeType::Strength,
                1 => AttributeType::Constitution,
                _ => AttributeType::Agility,
            };
            if player.allocate_point(attr).is_err() {
                break;
            }
        }

        if player.sect.is_none() && player.level >= SECT_JOIN_LEVEL {
            let _ = player.join_sect();
        }
        if let Some(sect) = player.sect {
            for skill in get_sect(sect).skills {
                let _ = player.learn_skill(skill.id);
            }
            skill_to_use = player.skills.iter().max_by_key(|s| s.level_req).map(|s| s.id);
        }

        if party.active_companion.is_none() {
            if let Some(id) = party.companions.first().map(|c| c.id) {
                let _ = party.set_active_companion(Some(id));
            }
        }
    }
    if skill_to_use.is_some() {
        engine.settings_mut().auto_skill_id = skill_to_use;
    }
}

// ── Main ─────────────────────────────────────────────────────────────

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("{msg}");
            print_usage();
            std::process::exit(1);
        }
    };

    let default_level = if config.verbose { "wendao=debug" } else { "wendao=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut settings = match &config.settings_path {
        Some(path) => match BattleSettings::from_json_file(path) {
            Ok(settings) => settings,
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(1);
            }
        },
        None => BattleSettings::default(),
    };
    settings.auto_battle = true;
    settings.heal_on_entry = true;
    settings.auto_capture |= config.auto_capture;

    let mut party = Party::new(Player::new("Wanderer", Element::Metal));
    party.current_zone = config.zone.clone();
    let mut engine =
        BattleEngine::new(party, settings, ChaCha8Rng::seed_from_u64(config.seed));

    let mut timeouts = 0u32;
    for n in 1..=config.battles {
        tend_party(&mut engine);
        engine.clear_log();
        if let Err(err) = engine.start_battle(false) {
            eprintln!("Battle {n}: {err}");
            std::process::exit(1);
        }
        engine.run_until_idle(BATTLE_TIMEOUT_MS);
        if engine.is_running() {
            engine.stop_battle();
            timeouts += 1;
        }

        if config.verbose {
            println!("── Battle {n} ──");
            for entry in engine.log().entries() {
                let marker = match entry.kind {
                    LogKind::Round => "#",
                    LogKind::Reward => "+",
                    LogKind::Rejected => "!",
                    LogKind::System | LogKind::Action => " ",
                };
                println!("{marker} [r{}] {}", entry.round, entry.message);
            }
        } else if !config.quiet {
            let result = match engine.phase() {
                Phase::Concluded(outcome) => format!("{outcome:?}"),
                other => other.to_string(),
            };
            println!(
                "Battle {n:>4}: {result:<8} clock {:>8}ms  level {}",
                engine.clock_ms(),
                engine.party().player.level
            );
        }
    }

    print_summary(&engine, &config, timeouts);
}

// ── Report Output ────────────────────────────────────────────────────

fn print_summary(engine: &BattleEngine<ChaCha8Rng>, config: &SimConfig, timeouts: u32) {
    let record = engine.record();
    let party = engine.party();
    let player = &party.player;
    let win_rate = if record.started > 0 {
        record.victories as f64 / record.started as f64 * 100.0
    } else {
        0.0
    };

    if config.quiet {
        println!(
            "seed={} battles={} wins={} losses={} captures={} level={} money={}",
            config.seed,
            record.started,
            record.victories,
            record.defeats,
            record.captures,
            player.level,
            party.money
        );
        return;
    }

    println!();
    println!("═══ Summary (seed {}, zone {}) ═══", config.seed, config.zone);
    println!("  Battles:    {}", record.started);
    println!("  Victories:  {} ({win_rate:.1}%)", record.victories);
    println!("  Defeats:    {}", record.defeats);
    println!("  Timeouts:   {timeouts}");
    println!("  Captures:   {}", record.captures);
    println!("  Exp gained: {}", record.exp_gained);
    println!("  Clock:      {}ms", engine.clock_ms());
    println!();
    println!(
        "  {} Lv.{} ({}/{} exp)  money {}",
        player.name, player.level, player.exp, player.exp_max, party.money
    );
    for companion in &party.companions {
        let active = party.active_companion == Some(companion.id);
        println!(
            "  {}{} Lv.{} ({}/{} exp, {} banked, {} pending)",
            if active { "*" } else { " " },
            companion.name,
            companion.level,
            companion.exp,
            companion.exp_max,
            companion.stored_exp,
            companion_pending_exp(companion)
        );
    }
    if !party.inventory.is_empty() {
        let items: Vec<String> = party
            .inventory
            .iter()
            .map(|(id, count)| format!("{id} x{count}"))
            .collect();
        println!("  Inventory: {}", items.join(", "));
    }
}
