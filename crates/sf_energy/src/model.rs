use serde::Serialize;

use crate::OracleError;

/// Temperature of the default model, in Celsius.
pub const DEFAULT_TEMPERATURE: f64 = 37.0;

/// Zero Celsius in Kelvin.
pub const K0: f64 = 273.15;

/// Highest accepted temperature in Celsius. The entropic penalties are
/// extrapolated linearly from 37 C and stay well inside `i32` below it.
pub const MAX_TEMPERATURE: f64 = 1000.0;

/// Settings shared by every fold of one composition, so that component
/// and complex energies stay comparable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModelDetails {
    /// Temperature in Celsius.
    pub temperature: f64,
}

impl ModelDetails {
    pub fn with_temperature(temperature: f64) -> Self {
        ModelDetails { temperature }
    }

    pub fn kelvin(&self) -> f64 {
        self.temperature + K0
    }

    /// Finite, above absolute zero and at most `MAX_TEMPERATURE`.
    pub fn check(&self) -> Result<(), OracleError> {
        let t = self.temperature;
        if !t.is_finite() || t <= -K0 || t > MAX_TEMPERATURE {
            return Err(OracleError::InvalidTemperature(t));
        }
        Ok(())
    }
}

impl Default for ModelDetails {
    fn default() -> Self {
        ModelDetails { temperature: DEFAULT_TEMPERATURE }
    }
}
