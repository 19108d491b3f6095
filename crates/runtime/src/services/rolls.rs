use palladium_core::{
    ActorId, CheckResult, ItemId, LookupError, Roll, combat::formulas, resolve_save,
    resolve_skill,
};

use crate::api::{Announcement, Collaborators, Result};

/// Sheet rolls that do not feed into combat resolution.
#[derive(Clone)]
pub struct RollService {
    collaborators: Collaborators,
}

impl RollService {
    pub fn new(collaborators: Collaborators) -> Self {
        Self { collaborators }
    }

    /// Percentile roll-under check against the skill's derived total.
    pub async fn skill_roll(&self, actor: ActorId, skill: ItemId) -> Result<CheckResult> {
        let actor = self.collaborators.host.actor(actor).await?;
        let skill = actor.skill(skill).ok_or(LookupError::ItemNotFound {
            actor: actor.id,
            item: skill,
        })?;

        let roll = self
            .collaborators
            .dice
            .evaluate(&formulas::skill(), &actor.roll_data())
            .await?;
        let check = resolve_skill(roll.total, skill.total);
        self.collaborators
            .sink
            .announce(Announcement::new(
                &actor.name,
                format!(
                    "Skill: {}. Target: {}%. Roll: {roll}. {}",
                    skill.name,
                    skill.total,
                    check.label()
                ),
            ))
            .await;
        Ok(check)
    }

    /// Free-form roll from the sheet, checked against `target` when one is given.
    pub async fn generic_roll(
        &self,
        actor: ActorId,
        label: &str,
        formula: &str,
        target: Option<i32>,
    ) -> Result<(Roll, Option<CheckResult>)> {
        let actor = self.collaborators.host.actor(actor).await?;
        let roll = self
            .collaborators
            .dice
            .evaluate(formula, &actor.roll_data())
            .await?;
        let check = target.map(|target| resolve_save(roll.total, target));

        let text = match &check {
            Some(check) => format!("{label}. Roll: {roll}. {}", check.label()),
            None => format!("{label}. Roll: {roll}."),
        };
        self.collaborators
            .sink
            .announce(Announcement::new(&actor.name, text))
            .await;
        Ok((roll, check))
    }

    pub async fn perception_roll(&self, actor: ActorId) -> Result<Roll> {
        let actor = self.collaborators.host.actor(actor).await?;
        let roll = self
            .collaborators
            .dice
            .evaluate(&formulas::perception(&actor), &actor.roll_data())
            .await?;
        self.collaborators
            .sink
            .announce(Announcement::new(
                &actor.name,
                format!("Perception Roll. Roll: {roll}."),
            ))
            .await;
        Ok(roll)
    }
}
