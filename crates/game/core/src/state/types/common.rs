use std::fmt;

/// Identifier of an actor record (character or NPC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor#{}", self.0)
    }
}

/// Identifier of a combatant within one encounter.
///
/// The same actor may be re-added to an encounter and receive a new id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CombatantId(pub u32);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "combatant#{}", self.0)
    }
}

/// Identifier of an owned item (skill, weapon, power, effect).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Integer pool with a current value and an upper bound.
///
/// Every mutator keeps `value` inside `[0, max]`. Values loaded from the host
/// are not trusted to respect that range, so reads go through [`Pool::available`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pool {
    pub value: i32,
    pub max: i32,
}

impl Pool {
    pub const fn new(value: i32, max: i32) -> Self {
        Self { value, max }
    }

    /// Pool filled to its maximum.
    pub const fn full(max: i32) -> Self {
        Self { value: max, max }
    }

    /// Capacity left to absorb damage, clamped to `[0, max]`.
    pub fn available(&self) -> i32 {
        self.value.clamp(0, self.max.max(0))
    }

    pub fn is_depleted(&self) -> bool {
        self.value <= 0
    }

    /// Absorbs up to `damage` points and returns the amount actually deducted.
    ///
    /// The deducted amount is always `min(available, damage)`, so the pool
    /// never drops below zero.
    pub fn absorb(&mut self, damage: i32) -> i32 {
        let deducted = self.available().min(damage.max(0));
        self.value = self.available() - deducted;
        deducted
    }

    /// Adds `delta` (possibly negative) and clamps to `[0, max]`.
    ///
    /// Returns the new value.
    pub fn adjust(&mut self, delta: i32) -> i32 {
        self.value = self.value.saturating_add(delta).clamp(0, self.max.max(0));
        self.value
    }

    /// Restores the pool to its maximum.
    pub fn restore(&mut self) {
        self.value = self.max;
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_deducts_at_most_the_value() {
        let mut pool = Pool::new(5, 10);
        assert_eq!(pool.absorb(20), 5);
        assert_eq!(pool.value, 0);

        let mut pool = Pool::new(-3, 10);
        assert_eq!(pool.absorb(4), 0);
        assert_eq!(pool.value, 0);
    }

    #[test]
    fn absorb_clamps_values_above_max() {
        let mut pool = Pool::new(50, 20);
        assert_eq!(pool.absorb(5), 5);
        assert_eq!(pool.value, 15);

        let mut pool = Pool::new(50, 20);
        assert_eq!(pool.absorb(30), 20);
        assert_eq!(pool.value, 0);
    }
}
