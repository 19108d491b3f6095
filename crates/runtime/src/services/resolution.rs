//! Follow-up actions triggered from a posted attack or power card.

use palladium_core::{
    ActorId, ActorState, AttackCard, CheckResult, DamageCard, DamageReport, DefenseKind, PowerCard, Roll,
    RulesConfig, apply_damage, apply_direct_hp_damage, apply_power_damage, combat::formulas,
    defense_penalty, resolve_defense, resolve_save,
};
use tracing::{debug, info};

use crate::api::{ActionContext, Announcement, Collaborators, Notice, Result};
use crate::events::EventBus;
use crate::handlers::DefeatHandler;

/// A button on an attack, power or damage card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolutionAction {
    /// Roll the weapon's damage formula against the card's target.
    RollDamage(AttackCard),
    /// Apply rolled weapon damage to the card's target, full or half.
    ApplyDamage {
        attack: AttackCard,
        damage: DamageCard,
        half: bool,
    },
    /// The card's target parries or dodges; the attack total is the DC.
    RollDefense {
        attack: AttackCard,
        defense: DefenseKind,
    },
    /// Roll damage and apply half of it straight to health.
    RollApplyHpDamage(AttackCard),
    /// Every controlled token rolls a save against the power.
    RollPowerSave(PowerCard),
    RollPowerDamage(PowerCard),
    /// Apply rolled power damage to every controlled token.
    ApplyPowerDamage { damage: DamageCard, half: bool },
}

/// Damage applied to one actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedDamage {
    pub actor: ActorId,
    pub report: DamageReport,
    pub defeated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    DamageRolled { roll: Roll, card: DamageCard },
    Damage(Vec<AppliedDamage>),
    Defense(CheckResult),
    Saves(Vec<(ActorId, CheckResult)>),
    /// Nothing to do: no damage formula, or a direct hit too small to matter.
    Nothing,
}

#[derive(Clone)]
pub struct ResolutionService {
    collaborators: Collaborators,
    defeat: DefeatHandler,
    rules: RulesConfig,
}

impl ResolutionService {
    pub fn new(collaborators: Collaborators, events: EventBus, rules: RulesConfig) -> Self {
        Self {
            defeat: DefeatHandler::new(collaborators.clone(), events),
            collaborators,
            rules,
        }
    }

    /// Runs one resolution action. A failure aborts the steps not yet taken.
    pub async fn resolve(&self, action: ResolutionAction, ctx: &ActionContext) -> Result<Resolution> {
        debug!(user = %ctx.user, ?action, "resolving card action");
        match action {
            ResolutionAction::RollDamage(attack) => self.roll_damage(&attack).await,
            ResolutionAction::ApplyDamage {
                attack,
                damage,
                half,
            } => self.apply_weapon_damage(&attack, damage.amount(half)).await,
            ResolutionAction::RollDefense { attack, defense } => {
                self.roll_defense(&attack, defense).await
            }
            ResolutionAction::RollApplyHpDamage(attack) => self.direct_hp_damage(&attack).await,
            ResolutionAction::RollPowerSave(power) => {
                let targets = ctx.require_controlled("Please select a token to roll the save.")?;
                self.roll_power_saves(&power, targets).await
            }
            ResolutionAction::RollPowerDamage(power) => self.roll_power_damage(&power).await,
            ResolutionAction::ApplyPowerDamage { damage, half } => {
                let targets =
                    ctx.require_controlled("Please select token(s) to apply damage to.")?;
                self.apply_power_damage(targets, damage.amount(half)).await
            }
        }
    }

    async fn roll_damage(&self, attack: &AttackCard) -> Result<Resolution> {
        let target = self.collaborators.host.actor(attack.target).await?;
        let roll = self
            .collaborators
            .dice
            .evaluate(&attack.damage_formula, &target.roll_data())
            .await?;
        let card = DamageCard::from_total(roll.total);
        self.collaborators
            .sink
            .announce(Announcement::new(
                &target.name,
                format!(
                    "Damage: {}. Roll: {roll}. Full: {}, half: {}.",
                    attack.weapon_name, card.total, card.half
                ),
            ))
            .await;
        Ok(Resolution::DamageRolled { roll, card })
    }

    async fn apply_weapon_damage(&self, attack: &AttackCard, damage: i32) -> Result<Resolution> {
        let target = self.collaborators.host.actor(attack.target).await?;
        let report = apply_damage(&target.pools, damage, &attack.outcome())?;
        let applied = self.write_report(target, report).await?;
        Ok(Resolution::Damage(vec![applied]))
    }

    async fn roll_defense(&self, attack: &AttackCard, defense: DefenseKind) -> Result<Resolution> {
        let defender = self.collaborators.host.actor(attack.target).await?;
        let formula = formulas::defense(&defender, defense, &attack.maneuver, &self.rules);
        let roll = self
            .collaborators
            .dice
            .evaluate(&formula, &defender.roll_data())
            .await?;
        let dc = attack.attack_roll_total;
        let check = resolve_defense(roll.total, dc);

        let mut text = format!("{} attempts to {defense}! Target DC: {dc}.", defender.name);
        let penalty = defense_penalty(defense, &attack.maneuver, &self.rules);
        if penalty != 0 {
            text.push_str(&format!(" {penalty} penalty vs. Ranged Attack."));
        }
        text.push_str(&format!(" Roll: {roll}. "));
        text.push_str(if check.success {
            "SUCCESS! The attack is avoided."
        } else {
            "FAILURE!"
        });
        self.collaborators
            .sink
            .announce(Announcement::new(&defender.name, text))
            .await;
        Ok(Resolution::Defense(check))
    }

    async fn direct_hp_damage(&self, attack: &AttackCard) -> Result<Resolution> {
        let target = self.collaborators.host.actor(attack.target).await?;
        let roll = self
            .collaborators
            .dice
            .evaluate(&attack.damage_formula, &target.roll_data())
            .await?;
        let report = apply_direct_hp_damage(&target.pools, roll.total)?;

        if report.damage < 1 {
            for entry in &report.entries {
                self.collaborators
                    .sink
                    .notify(Notice::info(entry.to_string()))
                    .await;
            }
            return Ok(Resolution::Nothing);
        }

        let applied = self.write_report(target, report).await?;
        Ok(Resolution::Damage(vec![applied]))
    }

    async fn roll_power_saves(&self, power: &PowerCard, targets: &[ActorId]) -> Result<Resolution> {
        let Some(save_type) = power.save_type.as_deref() else {
            return Ok(Resolution::Nothing);
        };

        let mut results = Vec::with_capacity(targets.len());
        for &target in targets {
            let defender = self.collaborators.host.actor(target).await?;
            let roll = self
                .collaborators
                .dice
                .evaluate(&formulas::save(&defender, save_type), &defender.roll_data())
                .await?;
            let check = resolve_save(roll.total, power.save_dc);
            self.collaborators
                .sink
                .announce(Announcement::new(
                    &defender.name,
                    format!(
                        "{} saves vs. {}. Target DC: {}. Roll: {roll}. {}",
                        defender.name,
                        power.power_name,
                        power.save_dc,
                        if check.success {
                            "SAVE SUCCESSFUL"
                        } else {
                            "SAVE FAILED"
                        }
                    ),
                ))
                .await;
            results.push((target, check));
        }
        Ok(Resolution::Saves(results))
    }

    async fn roll_power_damage(&self, power: &PowerCard) -> Result<Resolution> {
        let Some(formula) = power.damage_formula.as_deref() else {
            return Ok(Resolution::Nothing);
        };
        let user = self.collaborators.host.actor(power.user).await?;
        let roll = self
            .collaborators
            .dice
            .evaluate(formula, &user.roll_data())
            .await?;
        let card = DamageCard::from_total(roll.total);
        self.collaborators
            .sink
            .announce(Announcement::new(
                &user.name,
                format!(
                    "Damage: {}. Roll: {roll}. Full: {}, half: {}.",
                    power.power_name, card.total, card.half
                ),
            ))
            .await;
        Ok(Resolution::DamageRolled { roll, card })
    }

    async fn apply_power_damage(&self, targets: &[ActorId], damage: i32) -> Result<Resolution> {
        let mut applied = Vec::with_capacity(targets.len());
        for &target in targets {
            let actor = self.collaborators.host.actor(target).await?;
            let report = apply_power_damage(&actor.pools, damage)?;
            applied.push(self.write_report(actor, report).await?);
        }
        Ok(Resolution::Damage(applied))
    }

    /// Posts the log, then writes the report's pools in one update and runs
    /// the defeat check.
    async fn write_report(&self, before: ActorState, report: DamageReport) -> Result<AppliedDamage> {
        let id = before.id;
        self.collaborators
            .sink
            .announce(Announcement::system(
                report.describe(&before.name).join("\n"),
            ))
            .await;

        let defeated = if report.is_noop() {
            false
        } else {
            let mut after = before.clone();
            after.pools = report.after;
            self.defeat.update(&before, after).await?
        };
        info!(actor = %id, absorbed = report.absorbed(), defeated, "damage applied");

        Ok(AppliedDamage {
            actor: id,
            report,
            defeated,
        })
    }
}
