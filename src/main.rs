mod compound;
mod config;
mod error;
mod export;
mod model;
mod race;
mod stint;

use std::env;
use std::error::Error;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use compound::Compound;
use config::RaceConfig;
use model::{collect_samples, PaceModel};
use race::{compare, Leader};
use stint::{PitPlan, SeededNoise, StintSimulator};

fn main() -> Result<(), Box<dyn Error>> {
    println!("Starting simulation...");

    // Built-in demo scenario unless a JSON config path is given.
    let config = match env::args().nth(1) {
        Some(path) => RaceConfig::load(path)?,
        None => {
            let config = RaceConfig::default();
            config.validate()?;
            config
        }
    };

    run_degradation_sweep(&config)?;
    run_undercut_comparison(&config)?;
    run_pace_model(&config)?;

    Ok(())
}

// One clean stint per compound, exported side by side for spreadsheet work.
fn run_degradation_sweep(config: &RaceConfig) -> Result<(), Box<dyn Error>> {
    println!("\n--- Tyre degradation sweep ({} laps) ---", config.sweep.laps);

    let simulator = StintSimulator::new(
        &config.compounds,
        config.pit_loss,
        0.0,
        config.sweep.noise_amplitude,
    )?;
    let mut noise = SeededNoise::from_seed(config.seed);

    let mut stints = Vec::new();
    for compound in Compound::ALL {
        let records = simulator.simulate(compound, config.sweep.laps, &PitPlan::none(), &mut noise)?;
        stints.push((compound, records));
    }

    println!("Sample lap times (first 5 laps):");
    for (compound, records) in &stints {
        let sample: Vec<String> = records
            .iter()
            .take(5)
            .map(|record| format!("{:.3}", record.lap_time))
            .collect();
        println!("{:>6}: [{}]", compound.name(), sample.join(", "));
    }

    export::write_compound_sweep("tyre_degradation_results.csv", &stints)?;
    println!("Saved results to tyre_degradation_results.csv");
    Ok(())
}

// Two cars on the same opening compound and the same target compound; only
// the stop lap differs. Positive gap = car A ahead, negative = car B ahead.
fn run_undercut_comparison(config: &RaceConfig) -> Result<(), Box<dyn Error>> {
    let cmp = &config.comparison;
    println!(
        "\n--- Undercut vs overcut ({} laps, pit loss {:.1}s) ---",
        cmp.total_laps, config.pit_loss
    );

    let (start, _) = config.compounds.lookup(&cmp.start_compound)?;
    let (switch_to, _) = config.compounds.lookup(&cmp.switch_compound)?;
    let simulator = StintSimulator::new(
        &config.compounds,
        config.pit_loss,
        cmp.fuel_effect_per_lap,
        cmp.noise_amplitude,
    )?;

    let mut noise_a = SeededNoise::from_seed(config.seed);
    let mut noise_b = SeededNoise::from_seed(config.seed.wrapping_add(1));
    let records_a = simulator.simulate(
        start,
        cmp.total_laps,
        &PitPlan::single(cmp.pit_lap_a, switch_to)?,
        &mut noise_a,
    )?;
    let records_b = simulator.simulate(
        start,
        cmp.total_laps,
        &PitPlan::single(cmp.pit_lap_b, switch_to)?,
        &mut noise_b,
    )?;

    // Whichever car stops first falls behind by the pit loss, so the other
    // car is the initial leader.
    let initial_leader = if cmp.pit_lap_a > cmp.pit_lap_b {
        Leader::StrategyA
    } else {
        Leader::StrategyB
    };
    let result = compare(&records_a, &records_b, initial_leader)?;

    println!("Car B (undercut) pits on lap {}", cmp.pit_lap_b);
    println!("Car A (overcut) pits on lap {}", cmp.pit_lap_a);
    match result.crossover_lap {
        Some(lap) => {
            println!("Undercut works: the earlier stop takes the lead on lap {}", lap);
            println!(
                "Gap on that lap: {:.3}s (negative = car B ahead)",
                result.gaps[lap as usize - 1]
            );
        }
        None => println!("Undercut did not work: the earlier stop never takes the lead."),
    }
    println!(
        "Final race time: A {:.3}s, B {:.3}s",
        result.total_a, result.total_b
    );

    export::write_gap_series("undercut_gap_series.csv", &result.gaps)?;
    export::write_lap_records("car_a_laps.csv", &records_a)?;
    export::write_lap_records("car_b_laps.csv", &records_b)?;
    println!("Saved undercut_gap_series.csv, car_a_laps.csv, car_b_laps.csv");
    Ok(())
}

// Fit the lap-time model on a synthetic three-car grid. Each car opens on a
// different compound and switches mid-race, so lap number and tyre age are
// not tied to each other in the training data.
fn run_pace_model(config: &RaceConfig) -> Result<(), Box<dyn Error>> {
    let pace = &config.pace;
    println!("\n--- Race pace model ---");

    let simulator = StintSimulator::new(
        &config.compounds,
        config.pit_loss,
        pace.fuel_effect_per_lap,
        pace.noise_amplitude,
    )?;
    let mut noise = SeededNoise::from_seed(config.seed.wrapping_add(2));

    let mut samples = Vec::new();
    for (i, start) in Compound::ALL.into_iter().enumerate() {
        let switch_to = Compound::ALL[(i + 1) % Compound::ALL.len()];
        let records = simulator.simulate(
            start,
            pace.laps_per_stint,
            &PitPlan::single(pace.pit_lap, switch_to)?,
            &mut noise,
        )?;
        samples.extend(collect_samples(&records));
    }

    let mut rng = SmallRng::seed_from_u64(config.seed.wrapping_add(3));
    let model = match PaceModel::fit(&samples, pace.train_ratio, &mut rng) {
        Some(model) => model,
        None => return Err("Failed to fit the pace model.".into()),
    };

    println!("Model R^2 score on test set: {:.4}", model.r2);
    println!(
        "Coefficients (lap, tyre_age, compound_code): {}",
        model.coefficients()
    );
    println!("Intercept: {:.4}", model.intercept());

    println!("\nSample predictions (first 5 of {} samples):", samples.len());
    for sample in samples.iter().take(5) {
        let predicted = model.predict(sample.lap, sample.tyre_age, sample.compound);
        println!(
            "lap {:2}, age {:2}, {:<6} -> actual {:.3}s, predicted {:.3}s",
            sample.lap,
            sample.tyre_age,
            sample.compound.name(),
            sample.lap_time,
            predicted
        );
    }
    Ok(())
}
