use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::compound::Compound;
use crate::stint::LapRecord;

pub type FittedLinearRegression = linfa_linear::FittedLinearRegression<f64>;

// Feature/label pair for the pace model: where in the race the lap happened,
// how worn the tyre was, which compound, and the time it produced.
#[derive(Debug, Clone, Copy)]
pub struct PaceSample {
    pub lap: u32,
    pub tyre_age: u32,
    pub compound: Compound,
    pub lap_time: f64,
}

// Flatten simulated laps into training samples. Pit laps are dropped: the
// pit-lane penalty is not pace and would skew the fit.
pub fn collect_samples(records: &[LapRecord]) -> Vec<PaceSample> {
    records
        .iter()
        .filter(|record| !record.pit_stop)
        .map(|record| PaceSample {
            lap: record.lap,
            tyre_age: record.tyre_age,
            compound: record.compound,
            lap_time: record.lap_time,
        })
        .collect()
}

// Linear lap-time predictor over [lap number, tyre age, compound code],
// fitted on a single shuffled train/test split.
pub struct PaceModel {
    fitted: FittedLinearRegression,
    pub r2: f64,
}

impl PaceModel {
    // None when there is too little data to split or the fit fails.
    pub fn fit(samples: &[PaceSample], train_ratio: f32, rng: &mut impl Rng) -> Option<PaceModel> {
        if samples.len() < 8 {
            return None;
        }
        let mut shuffled = samples.to_vec();
        shuffled.shuffle(rng);

        let feats: Vec<f64> = shuffled
            .iter()
            .flat_map(|s| [s.lap as f64, s.tyre_age as f64, s.compound.code() as f64])
            .collect();
        let targets: Vec<f64> = shuffled.iter().map(|s| s.lap_time).collect();

        let x = Array2::from_shape_vec((shuffled.len(), 3), feats).ok()?;
        let y = Array1::from_vec(targets);
        let (train, test) = Dataset::new(x, y).split_with_ratio(train_ratio);

        let fitted = LinearRegression::new().fit(&train).ok()?;
        let predicted = fitted.predict(&test);
        let r2 = predicted.r2(&test).ok()?;

        Some(PaceModel { fitted, r2 })
    }

    pub fn predict(&self, lap: u32, tyre_age: u32, compound: Compound) -> f64 {
        let feats = Array1::from_vec(vec![lap as f64, tyre_age as f64, compound.code() as f64]);
        self.fitted
            .predict(&feats.into_shape((1, 3)).expect("Shape error"))[0]
    }

    pub fn coefficients(&self) -> &Array1<f64> {
        self.fitted.params()
    }

    pub fn intercept(&self) -> f64 {
        self.fitted.intercept()
    }
}
