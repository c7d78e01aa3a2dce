//! Patient reading data structures

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Canonical column names, matching the names the scaler and classifier were
/// fitted on.
pub mod columns {
    pub const LDH: &str = "LDH";
    pub const IL6: &str = "IL6";
    pub const NEUTROPHIL_PCT: &str = "Neutrophil %";
    pub const LCR: &str = "LCR";
    /// Categorical severity indicator. Passes through the pipeline unscaled.
    pub const SEVERE: &str = "severe_1";
}

/// The five values collected from the input form: four laboratory readings
/// plus a binary severity flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientReadings {
    /// Lactate dehydrogenase level
    #[serde(alias = "LDH")]
    pub ldh: f64,

    /// Interleukin-6 level
    #[serde(alias = "IL6")]
    pub il6: f64,

    /// Neutrophil percentage
    #[serde(alias = "Neutrophil %", alias = "neutrophil_percentage")]
    pub neutrophil_pct: f64,

    /// Lymphocyte-to-CRP ratio
    #[serde(alias = "LCR")]
    pub lcr: f64,

    /// Severity flag (1 = severe, 0 = not severe)
    #[serde(alias = "severe_1")]
    pub severe: u8,
}

impl PatientReadings {
    pub fn new(ldh: f64, il6: f64, neutrophil_pct: f64, lcr: f64, severe: u8) -> Self {
        Self {
            ldh,
            il6,
            neutrophil_pct,
            lcr,
            severe,
        }
    }

    /// Validate the form constraints: readings must be finite and
    /// non-negative, severity must be 0 or 1.
    ///
    /// This runs at the input layer; the scorer trusts readings that passed.
    pub fn validate(&self) -> Result<(), ScoringError> {
        for (name, value) in [
            (columns::LDH, self.ldh),
            (columns::IL6, self.il6),
            (columns::NEUTROPHIL_PCT, self.neutrophil_pct),
            (columns::LCR, self.lcr),
        ] {
            if !value.is_finite() {
                return Err(ScoringError::InvalidInput(format!(
                    "reading `{name}` is not a finite number"
                )));
            }
            if value < 0.0 {
                return Err(ScoringError::InvalidInput(format!(
                    "reading `{name}` must be non-negative, got {value}"
                )));
            }
        }

        if self.severe > 1 {
            return Err(ScoringError::InvalidInput(format!(
                "severity flag must be 0 or 1, got {}",
                self.severe
            )));
        }

        Ok(())
    }
}
