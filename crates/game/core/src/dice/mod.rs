//! Dice formulas and die sources.
//!
//! Rules code never rolls directly: it builds a [`Formula`] and a
//! [`RollContext`] and asks a [`DieRoller`] (or, in the runtime, an async
//! roll evaluator) for the result.
mod formula;
mod rng;

use std::collections::BTreeMap;
use std::fmt;

pub use formula::{Formula, FormulaError, Term, TermKind};
pub use rng::{DieRoller, PcgDice, SequenceDice};

/// Named integer values referenced from formulas as `@path`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollContext {
    values: BTreeMap<String, i32>,
}

impl RollContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, value: i32) {
        self.values.insert(path.to_owned(), value);
    }

    pub fn get(&self, path: &str) -> Option<i32> {
        self.values.get(path).copied()
    }

    pub fn with(mut self, path: &str, value: i32) -> Self {
        self.insert(path, value);
        self
    }
}

/// A single die as it came up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DieResult {
    pub sides: u32,
    pub value: u32,
}

/// Evaluated formula.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roll {
    pub formula: String,
    pub total: i32,
    pub dice: Vec<DieResult>,
}

impl Roll {
    /// Roll with a known total and no dice, for fixed results.
    pub fn fixed(formula: impl Into<String>, total: i32) -> Self {
        Self {
            formula: formula.into(),
            total,
            dice: Vec::new(),
        }
    }

    /// Sum of the dice alone, without modifiers.
    pub fn natural(&self) -> i32 {
        self.dice.iter().map(|die| die.value as i32).sum()
    }
}

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.formula, self.total)
    }
}
