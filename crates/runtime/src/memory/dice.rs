//! [`RollEvaluator`] over the core formula evaluator.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use palladium_core::{DieRoller, Formula, PcgDice, Roll, RollContext, SequenceDice};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::api::{Result, RollEvaluator};

/// Adapts any `rand` generator to [`DieRoller`].
struct RandDice<R>(R);

impl<R: Rng> DieRoller for RandDice<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        self.0.gen_range(1..=sides)
    }
}

/// Parses formulas and rolls them with a shared die source.
pub struct DiceRoller {
    dice: Mutex<Box<dyn DieRoller + Send>>,
}

impl DiceRoller {
    pub fn new(dice: impl DieRoller + Send + 'static) -> Self {
        Self {
            dice: Mutex::new(Box::new(dice)),
        }
    }

    /// Reproducible rolls from a `rand` generator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(RandDice(StdRng::seed_from_u64(seed)))
    }

    pub fn from_entropy() -> Self {
        Self::new(RandDice(StdRng::from_entropy()))
    }

    /// Rolls with the built-in PCG generator.
    pub fn pcg(seed: u64) -> Self {
        Self::new(PcgDice::seeded(seed))
    }

    /// Replays `values` die by die, cycling when they run out.
    pub fn scripted(values: impl Into<Vec<u32>>) -> Self {
        Self::new(SequenceDice::new(values))
    }
}

#[async_trait]
impl RollEvaluator for DiceRoller {
    async fn evaluate(&self, formula: &str, ctx: &RollContext) -> Result<Roll> {
        let formula = Formula::parse(formula)?;
        let roll = {
            let mut dice = self.dice.lock().unwrap_or_else(PoisonError::into_inner);
            formula.evaluate(ctx, &mut *dice)?
        };
        trace!(formula = %roll.formula, total = roll.total, "rolled");
        Ok(roll)
    }
}
