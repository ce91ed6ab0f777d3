use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::compound::{Compound, CompoundTable};
use crate::error::SimError;

// Noise is injected through this trait so that runs are reproducible under a
// fixed seed and two simulations never interfere through a shared global
// generator.
pub trait NoiseSource {
    // Next value drawn uniformly from [lo, hi].
    fn next_uniform(&mut self, lo: f64, hi: f64) -> f64;
}

pub struct SeededNoise {
    rng: SmallRng,
}

impl SeededNoise {
    pub fn from_seed(seed: u64) -> Self {
        SeededNoise {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl NoiseSource for SeededNoise {
    fn next_uniform(&mut self, lo: f64, hi: f64) -> f64 {
        self.rng.gen_range(lo..=hi)
    }
}

// One planned stop: the car drives `lap` on the worn set, pays the pit loss,
// and leaves the lap on `compound`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitStop {
    pub lap: u32,
    pub compound: Compound,
}

// Ordered pit plan, validated at construction so the per-lap loop carries no
// validation branching. Laps are 1-based and strictly increasing; the upper
// range check against the race length happens in `simulate`, which knows it.
#[derive(Debug, Clone, Default)]
pub struct PitPlan {
    stops: Vec<PitStop>,
}

impl PitPlan {
    pub fn none() -> Self {
        PitPlan { stops: Vec::new() }
    }

    pub fn new(stops: Vec<PitStop>) -> Result<Self, SimError> {
        let mut prev = 0u32;
        for stop in &stops {
            if stop.lap == 0 {
                return Err(SimError::InvalidConfiguration(
                    "pit stop laps are 1-based, lap 0 is not a lap".to_string(),
                ));
            }
            if stop.lap <= prev {
                return Err(SimError::InvalidConfiguration(format!(
                    "pit stop laps must be strictly increasing, lap {} comes after lap {}",
                    stop.lap, prev
                )));
            }
            prev = stop.lap;
        }
        Ok(PitPlan { stops })
    }

    pub fn single(lap: u32, compound: Compound) -> Result<Self, SimError> {
        PitPlan::new(vec![PitStop { lap, compound }])
    }

    pub fn stops(&self) -> &[PitStop] {
        &self.stops
    }

    fn last_stop_lap(&self) -> Option<u32> {
        self.stops.last().map(|stop| stop.lap)
    }
}

// One simulated lap. `tyre_age` is the age the pace was computed with, i.e.
// laps already completed on the fitted set when this lap started.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LapRecord {
    pub lap: u32,
    pub compound: Compound,
    pub tyre_age: u32,
    pub lap_time: f64,
    pub pit_stop: bool,
}

// Per-lap time model: base pace plus wear, minus the fuel-burn gain towards
// the end of the race, plus uniform noise, plus the pit-lane penalty on stop
// laps. Owns no state between calls; each `simulate` runs on its own.
pub struct StintSimulator<'a> {
    table: &'a CompoundTable,
    pit_loss: f64,
    fuel_effect_per_lap: f64,
    noise_amplitude: f64,
}

impl<'a> StintSimulator<'a> {
    pub fn new(
        table: &'a CompoundTable,
        pit_loss: f64,
        fuel_effect_per_lap: f64,
        noise_amplitude: f64,
    ) -> Result<Self, SimError> {
        if !pit_loss.is_finite() || pit_loss < 0.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "pit loss must be non-negative, got {}",
                pit_loss
            )));
        }
        if !fuel_effect_per_lap.is_finite() {
            return Err(SimError::InvalidConfiguration(format!(
                "fuel effect per lap must be finite, got {}",
                fuel_effect_per_lap
            )));
        }
        if !noise_amplitude.is_finite() || noise_amplitude < 0.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "noise amplitude must be non-negative, got {}",
                noise_amplitude
            )));
        }
        Ok(StintSimulator {
            table,
            pit_loss,
            fuel_effect_per_lap,
            noise_amplitude,
        })
    }

    pub fn simulate(
        &self,
        start_compound: Compound,
        total_laps: u32,
        plan: &PitPlan,
        noise: &mut dyn NoiseSource,
    ) -> Result<Vec<LapRecord>, SimError> {
        if total_laps == 0 {
            return Err(SimError::InvalidConfiguration(
                "race length must be at least one lap".to_string(),
            ));
        }
        if let Some(last) = plan.last_stop_lap() {
            if last > total_laps {
                return Err(SimError::InvalidConfiguration(format!(
                    "pit stop on lap {} is outside the {}-lap race",
                    last, total_laps
                )));
            }
        }

        let mut records = Vec::with_capacity(total_laps as usize);
        let mut compound = start_compound;
        let mut pars = self.table.pars(compound);
        let mut tyre_age: u32 = 0;
        let stops = plan.stops();
        let mut next_stop = 0;

        for lap in 1..=total_laps {
            let fuel_gain = self.fuel_effect_per_lap * (total_laps - lap) as f64;
            let noise_term = noise.next_uniform(-self.noise_amplitude, self.noise_amplitude);
            let pace = pars.base_lap + pars.deg_per_lap * tyre_age as f64 - fuel_gain + noise_term;

            if stops.get(next_stop).map_or(false, |stop| stop.lap == lap) {
                // The stop lap is driven on the worn set and charged the pit
                // loss; the fresh compound only counts from the next lap.
                records.push(LapRecord {
                    lap,
                    compound,
                    tyre_age,
                    lap_time: pace + self.pit_loss,
                    pit_stop: true,
                });
                compound = stops[next_stop].compound;
                pars = self.table.pars(compound);
                tyre_age = 0;
                next_stop += 1;
            } else {
                records.push(LapRecord {
                    lap,
                    compound,
                    tyre_age,
                    lap_time: pace,
                    pit_stop: false,
                });
                tyre_age += 1;
            }
        }

        Ok(records)
    }
}
