use palladium_core::{
    ActorId, AttackCard, AttackOutcome, ItemId, LookupError, Maneuver, Roll, RulesConfig,
    ShotModifiers, TargetType, combat::formulas, resolve_attack,
};
use tracing::{debug, info};

use crate::api::{ActionContext, Announcement, Collaborators, Result};

/// Result of a weapon attack roll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackReport {
    pub roll: Roll,
    pub outcome: AttackOutcome,
    /// Present on a hit; carries what damage and defense resolution need.
    pub card: Option<AttackCard>,
}

/// Weapon attacks and sheet maneuver rolls.
#[derive(Clone)]
pub struct AttackService {
    collaborators: Collaborators,
    rules: RulesConfig,
}

impl AttackService {
    pub fn new(collaborators: Collaborators, rules: RulesConfig) -> Self {
        Self {
            collaborators,
            rules,
        }
    }

    /// Aimed/called toggles as currently stored in the attacker's flags.
    pub async fn shot_modifiers(&self, actor: ActorId) -> Result<ShotModifiers> {
        Ok(ShotModifiers {
            aimed: self.shot_flag(actor, RulesConfig::AIMED_SHOT_FLAG).await?,
            called: self.shot_flag(actor, RulesConfig::CALLED_SHOT_FLAG).await?,
        })
    }

    async fn shot_flag(&self, actor: ActorId, key: &str) -> Result<bool> {
        let value = self
            .collaborators
            .host
            .flag(actor, RulesConfig::FLAG_SCOPE, key)
            .await?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    pub async fn set_aimed_shot(&self, actor: ActorId, enabled: bool) -> Result<()> {
        self.collaborators
            .host
            .set_flag(
                actor,
                RulesConfig::FLAG_SCOPE,
                RulesConfig::AIMED_SHOT_FLAG,
                enabled.into(),
            )
            .await
    }

    pub async fn set_called_shot(&self, actor: ActorId, enabled: bool) -> Result<()> {
        self.collaborators
            .host
            .set_flag(
                actor,
                RulesConfig::FLAG_SCOPE,
                RulesConfig::CALLED_SHOT_FLAG,
                enabled.into(),
            )
            .await
    }

    /// Rolls `weapon` against the user's first target.
    ///
    /// `target_type` overrides the default classification (armor hit when the
    /// defender wears armor).
    pub async fn weapon_attack(
        &self,
        attacker: ActorId,
        weapon: ItemId,
        ctx: &ActionContext,
        target_type: Option<TargetType>,
    ) -> Result<AttackReport> {
        let target = ctx.require_target("Please target a token.")?;
        let host = &self.collaborators.host;

        let attacker = host.actor(attacker).await?;
        let weapon = attacker
            .weapon(weapon)
            .cloned()
            .ok_or(LookupError::ItemNotFound {
                actor: attacker.id,
                item: weapon,
            })?;
        let defender = host.actor(target).await?;

        let shot = self.shot_modifiers(attacker.id).await?;
        let formula = formulas::attack(&attacker, &weapon.maneuver, shot, &self.rules);
        let roll = self
            .collaborators
            .dice
            .evaluate(&formula, &attacker.roll_data())
            .await?;

        let target_type = target_type.unwrap_or_else(|| TargetType::for_defender(&defender.pools));
        let outcome = resolve_attack(
            roll.total,
            &weapon.maneuver,
            &defender.pools,
            target_type,
            &self.rules,
        );
        info!(
            attacker = %attacker.id,
            defender = %defender.id,
            weapon = %weapon.name,
            total = roll.total,
            hit = outcome.is_hit,
            "weapon attack"
        );

        let verdict = match outcome.miss_reason() {
            None => "HIT!".to_owned(),
            Some(reason) => format!("MISS! ({reason})"),
        };
        self.collaborators
            .sink
            .announce(Announcement::new(
                &attacker.name,
                format!(
                    "{}: {} attacks {}. Target Number: {}. Roll: {roll}. {verdict}",
                    weapon.name, attacker.name, defender.name, outcome.target_armor_rating
                ),
            ))
            .await;

        let card = outcome
            .is_hit
            .then(|| AttackCard::new(attacker.id, defender.id, &weapon, &outcome));
        Ok(AttackReport {
            roll,
            outcome,
            card,
        })
    }

    /// Sheet maneuver roll. A maneuver missing from the sheet is a silent no-op.
    pub async fn maneuver_roll(&self, actor: ActorId, maneuver: &Maneuver) -> Result<Option<Roll>> {
        let actor = self.collaborators.host.actor(actor).await?;
        let Some(label) = actor.maneuver_label(maneuver).map(str::to_owned) else {
            debug!(actor = %actor.id, %maneuver, "maneuver not on sheet");
            return Ok(None);
        };

        let formula = formulas::maneuver(&actor, maneuver);
        let roll = self
            .collaborators
            .dice
            .evaluate(&formula, &actor.roll_data())
            .await?;
        self.collaborators
            .sink
            .announce(Announcement::new(
                &actor.name,
                format!("Attack: {label}. Roll: {roll}."),
            ))
            .await;
        Ok(Some(roll))
    }
}
