use crate::error::SimError;
use crate::stint::LapRecord;

// Cumulative elapsed race time after each lap. Strictly increasing as long
// as every lap time is positive.
pub fn race_trace(records: &[LapRecord]) -> Vec<f64> {
    let mut total = 0.0;
    records
        .iter()
        .map(|record| {
            total += record.lap_time;
            total
        })
        .collect()
}

// Signed gap (strategy B minus strategy A) per lap, over the overlapping lap
// range of the two traces. Negative means B is ahead on track.
pub fn gap_series(trace_a: &[f64], trace_b: &[f64]) -> Result<Vec<f64>, SimError> {
    let overlap = trace_a.len().min(trace_b.len());
    if overlap == 0 {
        return Err(SimError::InvalidConfiguration(
            "the two strategies share no laps to compare".to_string(),
        ));
    }
    Ok((0..overlap).map(|i| trace_b[i] - trace_a[i]).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leader {
    StrategyA,
    StrategyB,
}

// First lap (1-based) where the gap sign contradicts the initial leader. A
// tie is not a crossover; the lead has to actually change hands.
pub fn find_crossover_lap(gaps: &[f64], initial_leader: Leader) -> Option<u32> {
    gaps.iter()
        .position(|&gap| match initial_leader {
            Leader::StrategyA => gap < 0.0,
            Leader::StrategyB => gap > 0.0,
        })
        .map(|i| i as u32 + 1)
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub gaps: Vec<f64>,
    pub crossover_lap: Option<u32>,
    // Elapsed times at the end of the overlapping range.
    pub total_a: f64,
    pub total_b: f64,
}

pub fn compare(
    records_a: &[LapRecord],
    records_b: &[LapRecord],
    initial_leader: Leader,
) -> Result<Comparison, SimError> {
    let trace_a = race_trace(records_a);
    let trace_b = race_trace(records_b);
    let gaps = gap_series(&trace_a, &trace_b)?;
    let crossover_lap = find_crossover_lap(&gaps, initial_leader);
    let last = gaps.len() - 1;
    Ok(Comparison {
        crossover_lap,
        total_a: trace_a[last],
        total_b: trace_b[last],
        gaps,
    })
}

#[cfg(test)]
mod comparator_tests {
    use super::*;
    use crate::compound::{Compound, CompoundTable};
    use crate::stint::{PitPlan, SeededNoise, StintSimulator};

    const EPS: f64 = 1e-9;

    fn lap(lap: u32, lap_time: f64) -> LapRecord {
        LapRecord {
            lap,
            compound: Compound::Soft,
            tyre_age: lap - 1,
            lap_time,
            pit_stop: false,
        }
    }

    #[test]
    fn test_trace_is_strictly_increasing() {
        let records = vec![lap(1, 90.0), lap(2, 90.2), lap(3, 112.4), lap(4, 91.0)];
        let trace = race_trace(&records);
        assert_eq!(trace.len(), 4);
        for pair in trace.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert!((trace[3] - 383.6).abs() < EPS);
    }

    #[test]
    fn test_gap_is_b_minus_a_over_the_overlap() {
        let trace_a = vec![90.0, 180.0, 270.0];
        let trace_b = vec![91.0, 181.5];
        let gaps = gap_series(&trace_a, &trace_b).unwrap();
        assert_eq!(gaps.len(), 2);
        assert!((gaps[0] - 1.0).abs() < EPS);
        assert!((gaps[1] - 1.5).abs() < EPS);
    }

    #[test]
    fn test_empty_overlap_is_rejected() {
        let err = gap_series(&[], &[90.0]).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_tie_is_not_a_crossover() {
        let gaps = vec![0.0, 0.0, 0.0];
        assert_eq!(find_crossover_lap(&gaps, Leader::StrategyA), None);
        assert_eq!(find_crossover_lap(&gaps, Leader::StrategyB), None);
    }

    #[test]
    fn test_crossover_is_the_first_sign_flip() {
        let gaps = vec![2.0, 0.5, -0.1, -1.0, 0.3];
        assert_eq!(find_crossover_lap(&gaps, Leader::StrategyA), Some(3));
        assert_eq!(find_crossover_lap(&gaps, Leader::StrategyB), Some(1));
    }

    #[test]
    fn test_crossover_detection_is_idempotent() {
        let gaps = vec![1.0, 0.2, -0.4, -0.8];
        let first = find_crossover_lap(&gaps, Leader::StrategyA);
        let second = find_crossover_lap(&gaps, Leader::StrategyA);
        assert_eq!(first, second);
        assert_eq!(first, Some(3));
    }

    // The hand-checkable scenario: Soft 90.0/0.18, Medium 91.0/0.12, 25 laps,
    // pit loss 22.0, no fuel effect, no noise. Car A pits on lap 13, car B on
    // lap 10. Expected gap series computed lap by lap from the same formula.
    #[test]
    fn test_undercut_scenario_matches_hand_computed_sums() {
        let table = CompoundTable::default();
        let simulator = StintSimulator::new(&table, 22.0, 0.0, 0.0).unwrap();

        let records_a = simulator
            .simulate(
                Compound::Soft,
                25,
                &PitPlan::single(13, Compound::Medium).unwrap(),
                &mut SeededNoise::from_seed(0),
            )
            .unwrap();
        let records_b = simulator
            .simulate(
                Compound::Soft,
                25,
                &PitPlan::single(10, Compound::Medium).unwrap(),
                &mut SeededNoise::from_seed(0),
            )
            .unwrap();

        let expected_times = |pit_lap: u32| -> Vec<f64> {
            let mut times = Vec::new();
            let (mut base, mut deg) = (90.0, 0.18);
            let mut age = 0u32;
            for lap in 1..=25u32 {
                let time = base + deg * age as f64;
                if lap == pit_lap {
                    times.push(time + 22.0);
                    base = 91.0;
                    deg = 0.12;
                    age = 0;
                } else {
                    times.push(time);
                    age += 1;
                }
            }
            times
        };

        let cumulative = |times: &[f64]| -> Vec<f64> {
            let mut total = 0.0;
            times.iter().map(|t| {
                total += t;
                total
            }).collect()
        };

        let expected_a = cumulative(&expected_times(13));
        let expected_b = cumulative(&expected_times(10));

        let result = compare(&records_a, &records_b, Leader::StrategyA).unwrap();
        assert_eq!(result.gaps.len(), 25);
        for i in 0..25 {
            assert!((result.gaps[i] - (expected_b[i] - expected_a[i])).abs() < EPS);
        }

        // Identical cars through lap 9, B pays the pit loss on lap 10, then
        // claws it back on fresher tyres and is ahead when A stops on lap 13.
        for i in 0..9 {
            assert_eq!(result.gaps[i], 0.0);
        }
        assert!((result.gaps[9] - 22.0).abs() < EPS);
        assert_eq!(result.crossover_lap, Some(13));
        assert!((result.gaps[12] - (-2.58)).abs() < EPS);

        assert!((result.total_a - expected_a[24]).abs() < EPS);
        assert!((result.total_b - expected_b[24]).abs() < EPS);
        // The undercut gets ahead but the older mediums give the lead back:
        // car A wins this one overall.
        assert!(result.total_a < result.total_b);
    }
}
