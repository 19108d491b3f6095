//! Die sources for formula evaluation.
//!
//! [`PcgDice`] is the deterministic default: given the same seed it produces
//! the same sequence of rolls, which keeps encounters replayable.

/// Source of individual die results.
pub trait DieRoller {
    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<R: DieRoller + ?Sized> DieRoller for &mut R {
    fn roll_die(&mut self, sides: u32) -> u32 {
        (**self).roll_die(sides)
    }
}

impl<R: DieRoller + ?Sized> DieRoller for Box<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        (**self).roll_die(sides)
    }
}

/// PCG-XSH-RR generator (32-bit output from 64-bit state).
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug)]
pub struct PcgDice {
    state: u64,
}

impl PcgDice {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn seeded(seed: u64) -> Self {
        Self { state: seed }
    }

    /// LCG step: `state' = state × multiplier + increment (mod 2^64)`.
    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = Self::step(self.state);
        Self::output(self.state)
    }
}

impl DieRoller for PcgDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        if sides == 0 {
            return 0;
        }
        (self.next_u32() % sides) + 1
    }
}

/// Replays a fixed list of results, cycling when exhausted.
///
/// Values larger than the die are wrapped into range.
#[derive(Clone, Debug)]
pub struct SequenceDice {
    values: Vec<u32>,
    cursor: usize,
}

impl SequenceDice {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl DieRoller for SequenceDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        if self.values.is_empty() || sides == 0 {
            return 1.min(sides);
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        ((value.max(1) - 1) % sides) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic_and_in_range() {
        let mut a = PcgDice::seeded(42);
        let mut b = PcgDice::seeded(42);
        for _ in 0..200 {
            let roll = a.roll_die(20);
            assert_eq!(roll, b.roll_die(20));
            assert!((1..=20).contains(&roll));
        }
    }

    #[test]
    fn sequence_dice_cycles() {
        let mut dice = SequenceDice::new(vec![3, 17]);
        assert_eq!(dice.roll_die(20), 3);
        assert_eq!(dice.roll_die(20), 17);
        assert_eq!(dice.roll_die(20), 3);
        assert_eq!(dice.roll_die(6), 5);
    }
}
