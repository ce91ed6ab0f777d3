use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::compound::CompoundTable;
use crate::error::SimError;

// Run configuration. The defaults reproduce the built-in demo scenario; a
// JSON file given on the command line may override any subset of the fields.
// Everything is checked up front so a bad run fails before any simulation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub compounds: CompoundTable,
    pub pit_loss: f64,
    pub seed: u64,
    pub sweep: SweepConfig,
    pub comparison: ComparisonConfig,
    pub pace: PaceConfig,
}

impl Default for RaceConfig {
    fn default() -> Self {
        RaceConfig {
            compounds: CompoundTable::default(),
            pit_loss: 22.0,
            seed: 42,
            sweep: SweepConfig::default(),
            comparison: ComparisonConfig::default(),
            pace: PaceConfig::default(),
        }
    }
}

// Per-compound degradation sweep: one clean stint per compound.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub laps: u32,
    pub noise_amplitude: f64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            laps: 20,
            noise_amplitude: 0.08,
        }
    }
}

// Undercut comparison. Car A is the later stop (overcut), car B the earlier
// stop (undercut); both open on the same compound and switch to the same one.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub total_laps: u32,
    pub start_compound: String,
    pub switch_compound: String,
    pub pit_lap_a: u32,
    pub pit_lap_b: u32,
    pub fuel_effect_per_lap: f64,
    pub noise_amplitude: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        ComparisonConfig {
            total_laps: 25,
            start_compound: "Soft".to_string(),
            switch_compound: "Medium".to_string(),
            pit_lap_a: 13,
            pit_lap_b: 10,
            fuel_effect_per_lap: 0.0,
            noise_amplitude: 0.0,
        }
    }
}

// Synthetic grid for the pace model. Fuel effect and noise here are
// independent of the comparison settings above.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PaceConfig {
    pub laps_per_stint: u32,
    pub pit_lap: u32,
    pub fuel_effect_per_lap: f64,
    pub noise_amplitude: f64,
    pub train_ratio: f32,
}

impl Default for PaceConfig {
    fn default() -> Self {
        PaceConfig {
            laps_per_stint: 20,
            pit_lap: 10,
            fuel_effect_per_lap: 0.03,
            noise_amplitude: 0.08,
            train_ratio: 0.75,
        }
    }
}

impl RaceConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let raw = fs::read_to_string(path)?;
        let config: RaceConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        self.compounds.validate()?;

        if !self.pit_loss.is_finite() || self.pit_loss < 0.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "pit loss must be non-negative, got {}",
                self.pit_loss
            )));
        }

        if self.sweep.laps == 0 {
            return Err(SimError::InvalidConfiguration(
                "sweep length must be at least one lap".to_string(),
            ));
        }
        if self.comparison.total_laps == 0 {
            return Err(SimError::InvalidConfiguration(
                "comparison race must be at least one lap".to_string(),
            ));
        }
        if self.pace.laps_per_stint == 0 {
            return Err(SimError::InvalidConfiguration(
                "pace stints must be at least one lap".to_string(),
            ));
        }

        for amplitude in [
            self.sweep.noise_amplitude,
            self.comparison.noise_amplitude,
            self.pace.noise_amplitude,
        ] {
            if !amplitude.is_finite() || amplitude < 0.0 {
                return Err(SimError::InvalidConfiguration(format!(
                    "noise amplitude must be non-negative, got {}",
                    amplitude
                )));
            }
        }
        for fuel in [
            self.comparison.fuel_effect_per_lap,
            self.pace.fuel_effect_per_lap,
        ] {
            if !fuel.is_finite() {
                return Err(SimError::InvalidConfiguration(format!(
                    "fuel effect per lap must be finite, got {}",
                    fuel
                )));
            }
        }

        // Resolve compound names now so a typo fails before any simulation.
        self.compounds.lookup(&self.comparison.start_compound)?;
        self.compounds.lookup(&self.comparison.switch_compound)?;

        for (car, pit_lap) in [("A", self.comparison.pit_lap_a), ("B", self.comparison.pit_lap_b)] {
            if pit_lap == 0 || pit_lap > self.comparison.total_laps {
                return Err(SimError::InvalidConfiguration(format!(
                    "car {} pit lap {} is outside the {}-lap race",
                    car, pit_lap, self.comparison.total_laps
                )));
            }
        }
        if self.pace.pit_lap == 0 || self.pace.pit_lap > self.pace.laps_per_stint {
            return Err(SimError::InvalidConfiguration(format!(
                "pace pit lap {} is outside the {}-lap race",
                self.pace.pit_lap, self.pace.laps_per_stint
            )));
        }

        if self.pace.train_ratio <= 0.0 || self.pace.train_ratio >= 1.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "train ratio must be strictly between 0 and 1, got {}",
                self.pace.train_ratio
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(RaceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: RaceConfig =
            serde_json::from_str(r#"{"pit_loss": 21.0, "comparison": {"pit_lap_b": 8}}"#).unwrap();
        assert_eq!(config.pit_loss, 21.0);
        assert_eq!(config.comparison.pit_lap_b, 8);
        assert_eq!(config.comparison.pit_lap_a, 13);
        assert_eq!(config.sweep.laps, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_compound_name_fails_validation() {
        let mut config = RaceConfig::default();
        config.comparison.start_compound = "Ultra".to_string();
        assert!(matches!(
            config.validate(),
            Err(SimError::UnknownCompound(name)) if name == "Ultra"
        ));
    }

    #[test]
    fn test_out_of_range_pit_lap_fails_validation() {
        let mut config = RaceConfig::default();
        config.comparison.pit_lap_a = 30;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_zero_length_race_fails_validation() {
        let mut config = RaceConfig::default();
        config.comparison.total_laps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_train_ratio_fails_validation() {
        let mut config = RaceConfig::default();
        config.pace.train_ratio = 1.5;
        assert!(config.validate().is_err());
    }
}
