use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// The compound set is closed: adding a compound means extending this enum and
// the table below, not inserting runtime state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compound {
    Soft,
    Medium,
    Hard,
}

impl Compound {
    pub const ALL: [Compound; 3] = [Compound::Soft, Compound::Medium, Compound::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Compound::Soft => "Soft",
            Compound::Medium => "Medium",
            Compound::Hard => "Hard",
        }
    }

    // Stable small-integer encoding used as a regression feature. Assigned
    // once per compound and never reused within a run.
    pub fn code(self) -> u8 {
        match self {
            Compound::Soft => 0,
            Compound::Medium => 1,
            Compound::Hard => 2,
        }
    }
}

impl FromStr for Compound {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, SimError> {
        match s.to_uppercase().as_str() {
            "SOFT" => Ok(Compound::Soft),
            "MEDIUM" => Ok(Compound::Medium),
            "HARD" => Ok(Compound::Hard),
            _ => Err(SimError::UnknownCompound(s.to_string())),
        }
    }
}

// Pace parameters for one compound: base lap time on a fresh set, and how
// much slower every lap of wear makes the car.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CompoundPars {
    pub base_lap: f64,
    pub deg_per_lap: f64,
}

// Process-wide compound table. Built once from configuration and read-only
// afterwards; every simulation shares it by reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompoundTable {
    pub soft: CompoundPars,
    pub medium: CompoundPars,
    pub hard: CompoundPars,
}

impl Default for CompoundTable {
    fn default() -> Self {
        CompoundTable {
            soft: CompoundPars { base_lap: 90.0, deg_per_lap: 0.18 },
            medium: CompoundPars { base_lap: 91.0, deg_per_lap: 0.12 },
            hard: CompoundPars { base_lap: 92.0, deg_per_lap: 0.08 },
        }
    }
}

impl CompoundTable {
    pub fn pars(&self, compound: Compound) -> CompoundPars {
        match compound {
            Compound::Soft => self.soft,
            Compound::Medium => self.medium,
            Compound::Hard => self.hard,
        }
    }

    // String-boundary lookup. An unknown name is a hard error, never a silent
    // fallback: a substituted compound would corrupt every downstream number
    // without anyone noticing.
    pub fn lookup(&self, name: &str) -> Result<(Compound, CompoundPars), SimError> {
        let compound = name.parse::<Compound>()?;
        Ok((compound, self.pars(compound)))
    }

    pub fn validate(&self) -> Result<(), SimError> {
        for compound in Compound::ALL {
            let pars = self.pars(compound);
            if !pars.base_lap.is_finite() || pars.base_lap <= 0.0 {
                return Err(SimError::InvalidConfiguration(format!(
                    "{} base lap time must be positive, got {}",
                    compound.name(),
                    pars.base_lap
                )));
            }
            if !pars.deg_per_lap.is_finite() || pars.deg_per_lap < 0.0 {
                return Err(SimError::InvalidConfiguration(format!(
                    "{} degradation rate must be non-negative, got {}",
                    compound.name(),
                    pars.deg_per_lap
                )));
            }
        }
        Ok(())
    }
}
