//! Data-table rows and the fixed state catalog.

use std::fmt;

use rc_core::ComponentKind;
use rc_remote::{MAX_STATES, StatePoint};
use rc_sim::Phase;

/// Static description of one numbered state of the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSlot {
    pub name: &'static str,
    pub phase_label: &'static str,
    /// Component whose outlet this state describes.
    pub component: ComponentKind,
    pub flow: &'static str,
    /// Display colour as a hex string.
    pub color: &'static str,
}

pub const STATE_CATALOG: [StateSlot; MAX_STATES] = [
    StateSlot {
        name: "State 1 - Evaporator outlet",
        phase_label: "Saturated vapor",
        component: ComponentKind::Evaporator,
        flow: "Cold gas",
        color: "#2196F3",
    },
    StateSlot {
        name: "State 2 - Compressor outlet",
        phase_label: "Superheated vapor",
        component: ComponentKind::Compressor,
        flow: "Hot gas",
        color: "#F44336",
    },
    StateSlot {
        name: "State 3 - Condenser outlet",
        phase_label: "Saturated liquid",
        component: ComponentKind::Condenser,
        flow: "Hot liquid",
        color: "#FF9800",
    },
    StateSlot {
        name: "State 4 - Valve outlet",
        phase_label: "Two-phase mixture",
        component: ComponentKind::ExpansionValve,
        flow: "Cold liquid",
        color: "#9C27B0",
    },
];

/// One displayed row of the data table.
#[derive(Debug, Clone, PartialEq)]
pub struct DataRow {
    pub slot: StateSlot,
    pub index: usize,
    pub pressure: f64,
    pub temperature: f64,
    pub enthalpy: f64,
    pub entropy: f64,
    pub specific_volume: Option<f64>,
    /// Phase whose pipe is animated while this row is the newest.
    pub active: Phase,
}

impl DataRow {
    /// Build a row for slot `index`; `None` if the state is incomplete.
    pub fn from_state(index: usize, state: &StatePoint, active: Phase) -> Option<Self> {
        let slot = *STATE_CATALOG.get(index)?;
        if !state.is_complete() {
            return None;
        }
        Some(Self {
            slot,
            index,
            pressure: state.pressure?,
            temperature: state.temperature?,
            enthalpy: state.enthalpy?,
            entropy: state.entropy?,
            specific_volume: state.specific_volume.filter(|v| v.is_finite()),
            active,
        })
    }

    pub fn pressure_text(&self) -> String {
        format!("{:.2}", self.pressure)
    }

    pub fn temperature_text(&self) -> String {
        format!("{:.2}", self.temperature)
    }

    pub fn enthalpy_text(&self) -> String {
        format!("{:.2}", self.enthalpy)
    }

    pub fn entropy_text(&self) -> String {
        format!("{:.4}", self.entropy)
    }

    /// Cells in table order: name, P, T, h, s, phase label, component tag.
    pub fn cells(&self) -> [String; 7] {
        [
            self.slot.name.to_string(),
            self.pressure_text(),
            self.temperature_text(),
            self.enthalpy_text(),
            self.entropy_text(),
            self.slot.phase_label.to_string(),
            self.slot.component.slug().to_string(),
        ]
    }
}

impl fmt::Display for DataRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<28} {:>10} {:>9} {:>9} {:>8}  {:<18} {}",
            self.slot.name,
            self.pressure_text(),
            self.temperature_text(),
            self.enthalpy_text(),
            self.entropy_text(),
            self.slot.phase_label,
            self.slot.component.slug(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_components_follow_phase_sources() {
        // The row for slot p belongs to the component that feeds phase p + 1.
        for (i, slot) in STATE_CATALOG.iter().enumerate() {
            let next = Phase::ALL[i].next();
            assert_eq!(next.active_pair().0, slot.component);
        }
    }

    #[test]
    fn row_formatting() {
        let state = StatePoint::new(200.6, -10.0, 392.3, 1.733);
        let row = DataRow::from_state(0, &state, Phase::EvaporatorToCompressor).unwrap();
        assert_eq!(
            row.cells(),
            [
                "State 1 - Evaporator outlet".to_string(),
                "200.60".to_string(),
                "-10.00".to_string(),
                "392.30".to_string(),
                "1.7330".to_string(),
                "Saturated vapor".to_string(),
                "evaporator".to_string(),
            ]
        );
    }

    #[test]
    fn incomplete_or_out_of_range() {
        let mut state = StatePoint::new(1.0, 2.0, 3.0, 4.0);
        assert!(DataRow::from_state(4, &state, Phase::ExpansionToEvaporator).is_none());
        state.entropy = Some(f64::NAN);
        assert!(DataRow::from_state(0, &state, Phase::ExpansionToEvaporator).is_none());
    }
}
