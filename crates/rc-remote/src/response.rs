//! Simulation result returned by the service.

use rc_core::finite;
use serde::{Deserialize, Serialize};

use crate::error::{RemoteError, RemoteResult};

/// Number of state points in one cycle.
pub const MAX_STATES: usize = 4;

/// One numbered state of the cycle. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatePoint {
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub enthalpy: Option<f64>,
    #[serde(default)]
    pub entropy: Option<f64>,
    #[serde(default)]
    pub specific_volume: Option<f64>,
}

impl StatePoint {
    pub fn new(pressure: f64, temperature: f64, enthalpy: f64, entropy: f64) -> Self {
        Self {
            pressure: Some(pressure),
            temperature: Some(temperature),
            enthalpy: Some(enthalpy),
            entropy: Some(entropy),
            specific_volume: None,
        }
    }

    /// Whether every displayed field is present and finite.
    pub fn is_complete(&self) -> bool {
        [self.pressure, self.temperature, self.enthalpy, self.entropy]
            .into_iter()
            .all(|v| finite(v).is_some())
    }
}

/// Full answer for one operating point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    #[serde(default)]
    pub states: Vec<StatePoint>,
    #[serde(default)]
    pub cop: Option<f64>,
    #[serde(default, alias = "qEvaporador")]
    pub heat_absorbed: Option<f64>,
    #[serde(default, alias = "qCondensador")]
    pub heat_rejected: Option<f64>,
    #[serde(default, alias = "trabajoCompresor")]
    pub compressor_work: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl SimulationResult {
    /// Parse a response body; a document without states is rejected.
    pub fn from_json(body: &str) -> RemoteResult<Self> {
        let result: SimulationResult = serde_json::from_str(body)?;
        result.normalized()
    }

    /// Keep at most [`MAX_STATES`] states and require at least one.
    pub fn normalized(mut self) -> RemoteResult<Self> {
        if self.states.is_empty() {
            return Err(RemoteError::Malformed {
                message: "response contains no states".to_string(),
            });
        }
        self.states.truncate(MAX_STATES);
        Ok(self)
    }

    pub fn state(&self, index: usize) -> Option<&StatePoint> {
        self.states.get(index)
    }

    /// The state at `index`, only if it can be displayed.
    pub fn complete_state(&self, index: usize) -> Option<&StatePoint> {
        self.state(index).filter(|s| s.is_complete())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_camel_case() {
        let body = r#"{
            "states": [
                {"pressure": 200.6, "temperature": -10.0, "enthalpy": 392.3, "entropy": 1.7330, "specificVolume": 0.0993}
            ],
            "cop": 3.84,
            "heatAbsorbed": 5.1,
            "heatRejected": 6.4,
            "compressorWork": 1.3,
            "message": "ok"
        }"#;
        let result = SimulationResult::from_json(body).unwrap();
        assert_eq!(result.states.len(), 1);
        assert_eq!(result.states[0].specific_volume, Some(0.0993));
        assert_eq!(result.cop, Some(3.84));
        assert_eq!(result.heat_absorbed, Some(5.1));
        assert_eq!(result.message.as_deref(), Some("ok"));
    }

    #[test]
    fn parse_legacy_aggregate_names() {
        let body = r#"{"states":[{"pressure":1}],"qEvaporador":2.0,"qCondensador":3.0,"trabajoCompresor":1.0}"#;
        let result = SimulationResult::from_json(body).unwrap();
        assert_eq!(result.heat_absorbed, Some(2.0));
        assert_eq!(result.heat_rejected, Some(3.0));
        assert_eq!(result.compressor_work, Some(1.0));
        assert_eq!(result.cop, None);
    }

    #[test]
    fn extra_states_truncated() {
        let one = r#"{"pressure":1,"temperature":2,"enthalpy":3,"entropy":4}"#;
        let body = format!(r#"{{"states":[{one},{one},{one},{one},{one},{one}]}}"#);
        let result = SimulationResult::from_json(&body).unwrap();
        assert_eq!(result.states.len(), MAX_STATES);
    }

    #[test]
    fn empty_or_garbage_is_malformed() {
        assert!(matches!(
            SimulationResult::from_json(r#"{"states":[]}"#),
            Err(RemoteError::Malformed { .. })
        ));
        assert!(matches!(
            SimulationResult::from_json("<html>"),
            Err(RemoteError::Malformed { .. })
        ));
    }

    #[test]
    fn incomplete_states_are_not_displayable() {
        let body = r#"{"states":[{"pressure":1,"temperature":2,"enthalpy":3},{"pressure":null,"temperature":2,"enthalpy":3,"entropy":4}]}"#;
        let result = SimulationResult::from_json(body).unwrap();
        assert!(result.state(0).is_some());
        assert!(result.complete_state(0).is_none());
        assert!(result.complete_state(1).is_none());
        assert!(result.complete_state(7).is_none());

        let mut nan = StatePoint::new(1.0, 2.0, 3.0, 4.0);
        assert!(nan.is_complete());
        nan.enthalpy = Some(f64::NAN);
        assert!(!nan.is_complete());
    }
}
