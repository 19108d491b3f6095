//! Roster loader.
//!
//! Loads characters, NPCs and effect items from a single RON file.

use std::collections::BTreeSet;
use std::path::Path;

use palladium_core::{ActorState, EffectItem, RulesConfig, prepare_skills};

use crate::loaders::{LoadResult, read_file};

/// Everything a table brings to an encounter.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub actors: Vec<ActorState>,
    /// Effect templates that may be applied to actors during play.
    #[serde(default)]
    pub effects: Vec<EffectItem>,
}

impl Roster {
    pub fn actor(&self, name: &str) -> Option<&ActorState> {
        self.actors.iter().find(|actor| actor.name == name)
    }

    pub fn effect(&self, name: &str) -> Option<&EffectItem> {
        self.effects.iter().find(|effect| effect.name == name)
    }
}

/// Loader for rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file.
    ///
    /// RON format: `(actors: [ActorState, ...], effects: [EffectItem, ...])`
    ///
    /// Skill totals in the file are ignored and recomputed with `config`, so
    /// the loaded actors are ready for play.
    pub fn load(path: &Path, config: &RulesConfig) -> LoadResult<Roster> {
        let content = read_file(path)?;
        Self::parse(&content, config)
    }

    pub fn parse(content: &str, config: &RulesConfig) -> LoadResult<Roster> {
        let mut roster: Roster = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for actor in &mut roster.actors {
            if !seen.insert(actor.id) {
                anyhow::bail!("Duplicate actor id {} ('{}') in roster", actor.id, actor.name);
            }
            if actor.actions.max <= 0 {
                anyhow::bail!(
                    "Actor '{}' must have at least one action per exchange",
                    actor.name
                );
            }
            prepare_skills(actor, config);
        }

        tracing::debug!(
            actors = roster.actors.len(),
            effects = roster.effects.len(),
            "loaded roster"
        );

        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palladium_core::{ActorKind, AppliesTo, Maneuver};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ROSTER: &str = r#"
(
    actors: [
        (
            id: 1,
            name: "Kira",
            level: 3,
            attributes: (iq: (value: 18), pp: (value: 14, modifier: 1)),
            actions: (value: 4, max: 4),
            pools: (
                worn_armor_rating: 12,
                worn_armor_sdc: (value: 30, max: 30),
                natural_armor_rating: 0,
                character_sdc: (value: 20, max: 20),
                health: (value: 18, max: 18),
            ),
            maneuvers: { "strike": (label: "Strike", bonus: 2) },
            skills: [
                (id: 10, name: "Climbing", base: 40, per_level: 5),
            ],
            weapons: [
                (id: 20, name: "Longbow", maneuver: "proficientRanged", damage_formula: "2d6"),
            ],
        ),
        (
            id: 2,
            name: "Bandit",
            kind: npc,
            actions: (value: 2, max: 2),
            pools: (health: (value: 10, max: 10)),
        ),
    ],
    effects: [
        (id: 30, name: "Shaken", penalty: -2, applies_to: "WEAPON_ATTACKS | SAVING_THROWS"),
    ],
)
"#;

    #[test]
    fn loads_roster_and_derives_skills() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(ROSTER.as_bytes()).unwrap();

        let roster = RosterLoader::load(file.path(), &RulesConfig::default()).unwrap();
        assert_eq!(roster.actors.len(), 2);

        let kira = roster.actor("Kira").unwrap();
        // 40 + (3 - 1) * 5 + (18 - 14)
        assert_eq!(kira.skills[0].total, 54);
        assert_eq!(kira.weapons[0].maneuver, Maneuver::ProficientRanged);
        assert_eq!(kira.maneuvers["strike"].bonus, 2);

        let bandit = roster.actor("Bandit").unwrap();
        assert_eq!(bandit.kind, ActorKind::Npc);
        assert_eq!(bandit.level, 1);

        let shaken = roster.effect("Shaken").unwrap();
        assert_eq!(
            shaken.applies_to,
            AppliesTo::WEAPON_ATTACKS | AppliesTo::SAVING_THROWS
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let content = r#"(actors: [
            (id: 1, name: "A", actions: (value: 1, max: 1), pools: (health: (value: 5, max: 5))),
            (id: 1, name: "B", actions: (value: 1, max: 1), pools: (health: (value: 5, max: 5))),
        ])"#;
        let err = RosterLoader::parse(content, &RulesConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Duplicate actor id"));
    }

    #[test]
    fn actors_without_actions_are_rejected() {
        let content = r#"(actors: [(id: 1, name: "A", actions: (value: 0, max: 0), pools: (health: (value: 5, max: 5)))])"#;
        assert!(RosterLoader::parse(content, &RulesConfig::default()).is_err());
    }
}
