//! Refrigerant-state tags and the particles that carry them.

use core::fmt;

/// Refrigerant condition flowing through a pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum RefrigerantState {
    ColdLiquid,
    ColdGas,
    HotGas,
    HotLiquid,
}

impl RefrigerantState {
    pub fn is_liquid(self) -> bool {
        matches!(self, RefrigerantState::ColdLiquid | RefrigerantState::HotLiquid)
    }

    /// Stable tag used by renderers for styling.
    pub fn tag(self) -> &'static str {
        match self {
            RefrigerantState::ColdLiquid => "cold-liquid",
            RefrigerantState::ColdGas => "cold-gas",
            RefrigerantState::HotGas => "hot-gas",
            RefrigerantState::HotLiquid => "hot-liquid",
        }
    }

    /// Short caption shown over a pipe.
    pub fn caption(self) -> &'static str {
        match self {
            RefrigerantState::ColdLiquid => "COLD LIQUID",
            RefrigerantState::ColdGas => "COLD GAS",
            RefrigerantState::HotGas => "HOT GAS",
            RefrigerantState::HotLiquid => "HOT LIQUID",
        }
    }
}

impl fmt::Display for RefrigerantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Ephemeral visual token travelling along an active pipe.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Particle {
    /// Curve parameter in [0, 1].
    pub progress: f64,
    pub speed: f64,
    pub size: f64,
    /// Streak length in pixels; long for liquids, short for gas puffs.
    pub length: f64,
    pub state: RefrigerantState,
}

impl Particle {
    pub fn is_finished(&self) -> bool {
        self.progress > 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liquid_flags() {
        assert!(RefrigerantState::ColdLiquid.is_liquid());
        assert!(RefrigerantState::HotLiquid.is_liquid());
        assert!(!RefrigerantState::HotGas.is_liquid());
        assert!(!RefrigerantState::ColdGas.is_liquid());
    }

    #[test]
    fn particle_finishes_past_one() {
        let mut p = Particle {
            progress: 1.0,
            speed: 1.0,
            size: 1.0,
            length: 6.0,
            state: RefrigerantState::ColdGas,
        };
        assert!(!p.is_finished());
        p.progress = 1.0001;
        assert!(p.is_finished());
    }
}
