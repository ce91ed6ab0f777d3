use csv::Writer;
use std::error::Error;
use std::path::Path;

use crate::compound::Compound;
use crate::stint::LapRecord;

// Flat tabular outputs for further analysis (Excel / Power BI). Plotting and
// any richer reporting belong to downstream consumers of these files.

// One row per lap: lap, compound, tyre_age, lap_time, pit_stop.
pub fn write_lap_records<P: AsRef<Path>>(
    path: P,
    records: &[LapRecord],
) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

// Wide table comparing compounds lap by lap: a Lap column plus one lap-time
// column per compound, rounded to milliseconds.
pub fn write_compound_sweep<P: AsRef<Path>>(
    path: P,
    stints: &[(Compound, Vec<LapRecord>)],
) -> Result<(), Box<dyn Error>> {
    let laps = stints
        .iter()
        .map(|(_, records)| records.len())
        .min()
        .unwrap_or(0);
    let mut writer = Writer::from_path(path)?;

    let mut header = vec!["Lap".to_string()];
    header.extend(stints.iter().map(|(compound, _)| compound.name().to_string()));
    writer.write_record(&header)?;

    for i in 0..laps {
        let mut row = vec![(i + 1).to_string()];
        for (_, records) in stints {
            row.push(format!("{:.3}", records[i].lap_time));
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

// Lap, Gap rows for the undercut analysis; negative gap = strategy B ahead.
pub fn write_gap_series<P: AsRef<Path>>(path: P, gaps: &[f64]) -> Result<(), Box<dyn Error>> {
    let mut writer = Writer::from_path(path)?;
    writer.write_record(["Lap", "Gap"])?;
    for (i, gap) in gaps.iter().enumerate() {
        writer.write_record(&[(i + 1).to_string(), format!("{:.3}", gap)])?;
    }
    writer.flush()?;
    Ok(())
}
