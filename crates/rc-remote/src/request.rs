//! Configuration request sent to the simulation service.

use rc_core::require_finite;
use serde::{Deserialize, Serialize};

use crate::error::{RemoteError, RemoteResult};

/// Operating point the service should evaluate.
///
/// Temperatures are in °C, as typed by the learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigureRequest {
    pub refrigerant: String,
    #[serde(alias = "TEvap")]
    pub evaporation_temp: f64,
    #[serde(alias = "TCond")]
    pub condensation_temp: f64,
}

impl ConfigureRequest {
    pub fn new(refrigerant: impl Into<String>, evaporation_temp: f64, condensation_temp: f64) -> Self {
        Self {
            refrigerant: refrigerant.into(),
            evaporation_temp,
            condensation_temp,
        }
    }

    /// Check the request before anything is sent.
    pub fn validate(&self) -> RemoteResult<()> {
        if self.refrigerant.trim().is_empty() {
            return Err(RemoteError::InvalidRequest {
                what: "refrigerant must be named",
            });
        }
        let invalid_number = |_| RemoteError::InvalidRequest {
            what: "temperatures must be valid numbers",
        };
        require_finite(self.evaporation_temp, "evaporation temperature").map_err(invalid_number)?;
        require_finite(self.condensation_temp, "condensation temperature").map_err(invalid_number)?;
        if self.evaporation_temp >= self.condensation_temp {
            return Err(RemoteError::InvalidRequest {
                what: "evaporation temperature must be below condensation temperature",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_request() {
        assert!(ConfigureRequest::new("R134a", -10.0, 40.0).validate().is_ok());
    }

    #[test]
    fn rejects_nan_and_infinite() {
        let err = ConfigureRequest::new("R134a", f64::NAN, 40.0)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            RemoteError::InvalidRequest {
                what: "temperatures must be valid numbers"
            }
        );
        assert!(
            ConfigureRequest::new("R134a", -10.0, f64::INFINITY)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn evaporation_must_be_strictly_lower() {
        assert!(ConfigureRequest::new("R134a", 40.0, 40.0).validate().is_err());
        assert!(ConfigureRequest::new("R134a", 45.0, 40.0).validate().is_err());
    }

    #[test]
    fn refrigerant_required() {
        assert!(ConfigureRequest::new("  ", -10.0, 40.0).validate().is_err());
    }

    #[test]
    fn wire_names() {
        let json = serde_json::to_value(ConfigureRequest::new("R410A", -5.0, 35.0)).unwrap();
        assert_eq!(json["refrigerant"], "R410A");
        assert_eq!(json["evaporationTemp"], -5.0);
        assert_eq!(json["condensationTemp"], 35.0);

        let legacy: ConfigureRequest =
            serde_json::from_str(r#"{"refrigerant":"R22","TEvap":-15,"TCond":30}"#).unwrap();
        assert_eq!(legacy, ConfigureRequest::new("R22", -15.0, 30.0));
    }
}
