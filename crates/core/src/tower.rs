//! The stability tower: each pull rolls one d6 per standing block and loses
//! every block whose roll lands at or under the current failure threshold.
//! Thresholds rise as stability falls into the danger and critical bands.

use crate::{Event, EventBus, Ledger, RandomSource, Thresholds};
use serde::{Deserialize, Serialize};

pub const DIE_FACES: u8 = 6;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskBand {
    Safe,
    Danger,
    Critical,
}

impl RiskBand {
    pub fn for_stability(stability: u32, thresholds: Thresholds) -> Self {
        if stability <= thresholds.critical {
            RiskBand::Critical
        } else if stability <= thresholds.danger {
            RiskBand::Danger
        } else {
            RiskBand::Safe
        }
    }

    /// Highest d6 face that counts as a lost block.
    pub fn failure_threshold(self) -> u8 {
        match self {
            RiskBand::Safe => 1,
            RiskBand::Danger => 2,
            RiskBand::Critical => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullOutcome {
    pub threshold: u8,
    pub rolls: Vec<u8>,
    pub lost: u32,
}

/// One pull against a tower of `stability` blocks. Does not touch any state.
pub fn pull_block(
    stability: u32,
    thresholds: Thresholds,
    rng: &mut dyn RandomSource,
) -> PullOutcome {
    let threshold = RiskBand::for_stability(stability, thresholds).failure_threshold();
    if stability == 0 {
        return PullOutcome {
            threshold,
            rolls: Vec::new(),
            lost: 0,
        };
    }
    let rolls: Vec<u8> = (0..stability).map(|_| rng.roll_d6()).collect();
    let lost = rolls.iter().filter(|&&face| face <= threshold).count() as u32;
    PullOutcome {
        threshold,
        rolls,
        lost,
    }
}

/// Expected blocks lost by one pull at a given stability and threshold.
pub fn expected_loss(stability: u32, threshold: u8) -> f64 {
    f64::from(stability) * f64::from(threshold.min(DIE_FACES)) / f64::from(DIE_FACES)
}

/// Runs `count` pulls in order against the ledger, re-banding before each
/// one. Stops early once the tower is down.
pub fn pull_blocks(
    ledger: &mut Ledger,
    thresholds: Thresholds,
    count: u32,
    rng: &mut dyn RandomSource,
    events: &mut EventBus,
) -> u32 {
    let mut total = 0;
    for pull in 0..count {
        let before = ledger.stability();
        if before == 0 {
            break;
        }
        let outcome = pull_block(before, thresholds, rng);
        let change = ledger.lose_stability(outcome.lost);
        total += outcome.lost;
        tracing::debug!(
            target: "wretched::tower",
            pull,
            stability = before,
            threshold = outcome.threshold,
            lost = outcome.lost,
            "tower.pull"
        );
        events.push(Event::BlockPulled {
            stability_before: before,
            threshold: outcome.threshold,
            rolls: outcome.rolls,
            lost: outcome.lost,
        });
        if change.changed() {
            events.push(Event::StabilityChanged {
                from: change.from,
                to: change.to,
            });
        }
        if change.to == 0 {
            tracing::info!(target: "wretched::tower", pull, "tower.collapsed");
            break;
        }
    }
    total
}
