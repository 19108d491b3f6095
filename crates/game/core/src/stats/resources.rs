//! Spendable resources: actions, ISP and Chi.
//!
//! All adjustments clamp to `[0, max]`. Current values are game state and must
//! be written back by the host; maximums come from the sheet.

use crate::config::RulesConfig;
use crate::error::{ErrorSeverity, RulesError};
use crate::state::{ActorState, Pool};

/// Enum representing individual spendable resources.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ResourceKind {
    /// Actions left in the current exchange.
    Actions,
    /// Inner strength points (psionics).
    Isp,
    /// Chi (martial arts powers).
    Chi,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    #[error("not enough actions: have {available}, need {required}")]
    InsufficientActions { available: i32, required: i32 },
}

impl RulesError for ResourceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Warning
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientActions { .. } => "RESOURCE_INSUFFICIENT_ACTIONS",
        }
    }
}

fn pool_mut(actor: &mut ActorState, kind: ResourceKind) -> &mut Pool {
    match kind {
        ResourceKind::Actions => &mut actor.actions,
        ResourceKind::Isp => &mut actor.isp,
        ResourceKind::Chi => &mut actor.chi,
    }
}

/// Adjusts a resource by `amount`, clamped to `[0, max]`, and returns the new value.
///
/// `boosted` (shift-click) multiplies the amount for ISP and Chi only; the
/// action counter always moves one step at a time.
pub fn adjust_resource(
    actor: &mut ActorState,
    kind: ResourceKind,
    amount: i32,
    boosted: bool,
    config: &RulesConfig,
) -> i32 {
    let amount = match kind {
        ResourceKind::Isp | ResourceKind::Chi if boosted => {
            amount * config.resource_shift_multiplier
        }
        _ => amount,
    };
    pool_mut(actor, kind).adjust(amount)
}

/// Restores character SDC and worn armor SDC.
pub fn reset_sdc(actor: &mut ActorState) {
    actor.pools.character_sdc.restore();
    actor.pools.worn_armor_sdc.restore();
}

/// Restores ISP and Chi.
pub fn reset_essentials(actor: &mut ActorState) {
    actor.isp.restore();
    actor.chi.restore();
}

/// Deducts `cost` actions, or fails without touching the pool.
pub fn spend_actions(actor: &mut ActorState, cost: i32) -> Result<i32, ResourceError> {
    let available = actor.actions.value;
    if available < cost {
        return Err(ResourceError::InsufficientActions {
            available,
            required: cost,
        });
    }
    Ok(actor.actions.adjust(-cost.max(0)))
}
