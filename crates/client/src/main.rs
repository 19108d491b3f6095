use anyhow::{Context, Result};
use palladium_client::{ClientConfig, Skirmish, logging};
use palladium_content::{ConfigLoader, RosterLoader};
use palladium_core::RulesConfig;
use palladium_runtime::DiceRoller;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClientConfig::from_env();
    let _log_guard = logging::init(&config)?;

    let rules = match &config.rules {
        Some(path) => ConfigLoader::load(path)
            .with_context(|| format!("Failed to load rules from {}", path.display()))?,
        None => RulesConfig::default(),
    };
    let roster = RosterLoader::load(&config.roster, &rules)
        .with_context(|| format!("Failed to load roster from {}", config.roster.display()))?;
    tracing::info!(
        roster = %config.roster.display(),
        actors = roster.actors.len(),
        seed = ?config.seed,
        "starting skirmish"
    );

    let dice = match config.seed {
        Some(seed) => DiceRoller::seeded(seed),
        None => DiceRoller::from_entropy(),
    };

    let mut skirmish = Skirmish::start(config.runtime_config(rules), roster, dice)?;
    let mut stdout = std::io::stdout().lock();
    let summary = skirmish.play(config.max_turns, &mut stdout).await?;
    skirmish.finish().await?;

    tracing::info!(turns = summary.turns, rounds = summary.rounds, "skirmish over");
    println!(
        "After {} turn(s) over {} round(s), still standing: {}",
        summary.turns,
        summary.rounds,
        summary.standing.join(", ")
    );
    Ok(())
}
