//! Attack maneuvers and defense kinds.

use std::fmt;

/// Attack maneuver selected on a weapon.
///
/// Known maneuvers pick the minimum-roll floor; any other key is carried as
/// [`Maneuver::Custom`] and treated as melee.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum Maneuver {
    #[default]
    Strike,
    Sniper,
    ProficientRanged,
    ProficientThrown,
    Custom(String),
}

impl Maneuver {
    /// Key used in an actor's maneuver table.
    pub fn as_key(&self) -> &str {
        match self {
            Self::Strike => "strike",
            Self::Sniper => "sniper",
            Self::ProficientRanged => "proficientRanged",
            Self::ProficientThrown => "proficientThrown",
            Self::Custom(key) => key,
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key {
            "strike" => Self::Strike,
            "sniper" => Self::Sniper,
            "proficientRanged" => Self::ProficientRanged,
            "proficientThrown" => Self::ProficientThrown,
            other => Self::Custom(other.to_owned()),
        }
    }

    /// Ranged maneuvers use the higher minimum roll.
    pub fn is_ranged(&self) -> bool {
        matches!(
            self,
            Self::Sniper | Self::ProficientRanged | Self::ProficientThrown
        )
    }

    /// Dodging these maneuvers is penalised.
    pub fn penalises_dodge(&self) -> bool {
        matches!(self, Self::Sniper | Self::ProficientRanged)
    }
}

impl fmt::Display for Maneuver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

impl From<String> for Maneuver {
    fn from(key: String) -> Self {
        Self::from_key(&key)
    }
}

impl From<Maneuver> for String {
    fn from(maneuver: Maneuver) -> Self {
        maneuver.as_key().to_owned()
    }
}

/// Defense a target may roll against an incoming attack.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum DefenseKind {
    Parry,
    Dodge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_and_unknown_keys_are_custom() {
        for maneuver in [
            Maneuver::Strike,
            Maneuver::Sniper,
            Maneuver::ProficientRanged,
            Maneuver::ProficientThrown,
        ] {
            assert_eq!(Maneuver::from_key(maneuver.as_key()), maneuver);
        }
        assert_eq!(
            Maneuver::from_key("disarm"),
            Maneuver::Custom("disarm".into())
        );
    }

    #[test]
    fn thrown_is_ranged_but_does_not_penalise_dodge() {
        assert!(Maneuver::ProficientThrown.is_ranged());
        assert!(!Maneuver::ProficientThrown.penalises_dodge());
        assert!(Maneuver::Sniper.penalises_dodge());
        assert!(!Maneuver::Custom("disarm".into()).is_ranged());
    }

    #[test]
    fn defense_kind_parses_lowercase_keys() {
        assert_eq!("dodge".parse::<DefenseKind>(), Ok(DefenseKind::Dodge));
        assert_eq!(DefenseKind::Parry.to_string(), "parry");
    }
}
