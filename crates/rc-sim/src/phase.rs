//! Four-phase cycle driver.
//!
//! The driver owns a monotonically increasing step counter; the active phase
//! is always `step % 4`. A tick shows the state slot of the current phase and
//! then advances, so the flow that follows a displayed state is the one of
//! the next phase.

use rc_core::{ComponentKind, RefrigerantState};
use tracing::{debug, warn};

/// One stage of the repeating animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Phase {
    ExpansionToEvaporator,
    EvaporatorToCompressor,
    CompressorToCondenser,
    CondenserToExpansion,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::ExpansionToEvaporator,
        Phase::EvaporatorToCompressor,
        Phase::CompressorToCondenser,
        Phase::CondenserToExpansion,
    ];

    pub fn from_step(step: u64) -> Phase {
        Phase::ALL[(step % 4) as usize]
    }

    pub fn index(self) -> usize {
        match self {
            Phase::ExpansionToEvaporator => 0,
            Phase::EvaporatorToCompressor => 1,
            Phase::CompressorToCondenser => 2,
            Phase::CondenserToExpansion => 3,
        }
    }

    /// The (source, dest) pair whose pipe carries flow in this phase.
    pub fn active_pair(self) -> (ComponentKind, ComponentKind) {
        use ComponentKind::*;
        match self {
            Phase::ExpansionToEvaporator => (ExpansionValve, Evaporator),
            Phase::EvaporatorToCompressor => (Evaporator, Compressor),
            Phase::CompressorToCondenser => (Compressor, Condenser),
            Phase::CondenserToExpansion => (Condenser, ExpansionValve),
        }
    }

    pub fn refrigerant(self) -> RefrigerantState {
        match self {
            Phase::ExpansionToEvaporator => RefrigerantState::ColdLiquid,
            Phase::EvaporatorToCompressor => RefrigerantState::ColdGas,
            Phase::CompressorToCondenser => RefrigerantState::HotGas,
            Phase::CondenserToExpansion => RefrigerantState::HotLiquid,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Phase::ExpansionToEvaporator => "Valve -> Evaporator (cold liquid)",
            Phase::EvaporatorToCompressor => "Evaporator -> Compressor (cold gas)",
            Phase::CompressorToCondenser => "Compressor -> Condenser (hot gas)",
            Phase::CondenserToExpansion => "Condenser -> Valve (hot liquid)",
        }
    }

    pub fn is_active(self, source: ComponentKind, dest: ComponentKind) -> bool {
        self.active_pair() == (source, dest)
    }

    pub fn next(self) -> Phase {
        Phase::from_step(self.index() as u64 + 1)
    }
}

/// What a driver tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome<R> {
    /// The state for `phase` was available and is returned as `row`.
    Shown {
        phase: Phase,
        row: R,
        /// This tick closed a full revolution.
        revolution_complete: bool,
    },
    /// The state for `phase` was missing; the counter advanced anyway.
    Skipped {
        phase: Phase,
        revolution_complete: bool,
    },
}

impl<R> TickOutcome<R> {
    pub fn phase(&self) -> Phase {
        match self {
            TickOutcome::Shown { phase, .. } | TickOutcome::Skipped { phase, .. } => *phase,
        }
    }

    pub fn revolution_complete(&self) -> bool {
        match self {
            TickOutcome::Shown {
                revolution_complete,
                ..
            }
            | TickOutcome::Skipped {
                revolution_complete,
                ..
            } => *revolution_complete,
        }
    }
}

/// Step and revolution counters.
///
/// Only the table tick mutates the driver; frame ticks read [`Self::current_phase`].
#[derive(Debug, Clone, Default)]
pub struct PhaseDriver {
    step: u64,
    cycles: u64,
}

impl PhaseDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    /// Completed revolutions.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn current_phase(&self) -> Phase {
        Phase::from_step(self.step)
    }

    pub fn reset(&mut self) {
        self.step = 0;
        self.cycles = 0;
    }

    /// Show the current phase's state (if `lookup` yields one) and advance.
    ///
    /// Every fourth tick completes a revolution, shown or skipped.
    pub fn tick<R>(&mut self, lookup: impl FnOnce(Phase) -> Option<R>) -> TickOutcome<R> {
        let phase = self.current_phase();
        let row = lookup(phase);

        self.step += 1;
        let revolution_complete = self.step % 4 == 0;
        if revolution_complete {
            self.cycles += 1;
        }

        let Some(row) = row else {
            warn!(step = self.step, ?phase, "state data missing; skipping tick");
            return TickOutcome::Skipped {
                phase,
                revolution_complete,
            };
        };
        debug!(
            step = self.step,
            ?phase,
            active = self.current_phase().description(),
            "phase tick"
        );
        TickOutcome::Shown {
            phase,
            row,
            revolution_complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComponentKind::*;

    #[test]
    fn active_pairs_cycle_with_step() {
        let expected = [
            (ExpansionValve, Evaporator),
            (Evaporator, Compressor),
            (Compressor, Condenser),
            (Condenser, ExpansionValve),
        ];
        for step in 0..20_u64 {
            assert_eq!(
                Phase::from_step(step).active_pair(),
                expected[(step % 4) as usize]
            );
        }
    }

    #[test]
    fn active_pairs_are_successor_edges() {
        for phase in Phase::ALL {
            let (s, d) = phase.active_pair();
            assert_eq!(s.successor(), d);
        }
    }

    #[test]
    fn refrigerant_tags() {
        assert_eq!(
            Phase::ExpansionToEvaporator.refrigerant(),
            RefrigerantState::ColdLiquid
        );
        assert_eq!(
            Phase::EvaporatorToCompressor.refrigerant(),
            RefrigerantState::ColdGas
        );
        assert_eq!(
            Phase::CompressorToCondenser.refrigerant(),
            RefrigerantState::HotGas
        );
        assert_eq!(
            Phase::CondenserToExpansion.refrigerant(),
            RefrigerantState::HotLiquid
        );
    }

    #[test]
    fn cycle_counter_once_per_four_ticks() {
        let mut driver = PhaseDriver::new();
        for i in 1..=12_u64 {
            let out = driver.tick(|p| Some(p.index()));
            let TickOutcome::Shown {
                revolution_complete,
                ..
            } = out
            else {
                panic!("tick should show a row");
            };
            assert_eq!(revolution_complete, i % 4 == 0);
            assert_eq!(driver.cycles(), i / 4);
        }
    }

    #[test]
    fn tick_shows_current_phase_then_advances() {
        let mut driver = PhaseDriver::new();
        let out = driver.tick(|p| Some(p.index()));
        assert_eq!(
            out,
            TickOutcome::Shown {
                phase: Phase::ExpansionToEvaporator,
                row: 0,
                revolution_complete: false
            }
        );
        assert_eq!(driver.current_phase(), Phase::EvaporatorToCompressor);
    }

    #[test]
    fn skipped_ticks_still_complete_revolutions() {
        let mut driver = PhaseDriver::new();
        for i in 1..=8_u64 {
            let out: TickOutcome<()> = driver.tick(|_| None);
            assert!(matches!(out, TickOutcome::Skipped { .. }));
            assert_eq!(out.revolution_complete(), i % 4 == 0);
        }
        assert_eq!(driver.step(), 8);
        assert_eq!(driver.cycles(), 2);
    }

    #[test]
    fn missing_last_slot_closes_the_revolution() {
        let mut driver = PhaseDriver::new();
        for _ in 0..3 {
            assert!(!driver.tick(|p| Some(p.index())).revolution_complete());
        }
        let out = driver.tick(|p| (p != Phase::CondenserToExpansion).then_some(p.index()));
        assert_eq!(
            out,
            TickOutcome::Skipped {
                phase: Phase::CondenserToExpansion,
                revolution_complete: true
            }
        );
        assert_eq!(driver.cycles(), 1);
    }

    #[test]
    fn next_wraps() {
        assert_eq!(
            Phase::CondenserToExpansion.next(),
            Phase::ExpansionToEvaporator
        );
    }
}
