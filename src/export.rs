//! Tabular and structured output for a finished comparison.

use std::{
    fmt::Write as _,
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use log::info;
use serde::Serialize;

use crate::{
    error::Result,
    sim::{AlgorithmResult, Comparison},
};

pub const CSV_FILE: &str = "results_summary.csv";
pub const JSON_FILE: &str = "simulation_results.json";

#[derive(Debug, Serialize)]
struct SummaryRow {
    algorithm: String,
    total_energy_kwh: f64,
    total_co2_kg: f64,
    total_cost: f64,
    avg_wait: f64,
    avg_turnaround: f64,
    tasks_executed: usize,
}

impl From<&AlgorithmResult> for SummaryRow {
    fn from(result: &AlgorithmResult) -> Self {
        Self {
            algorithm: result.algorithm.to_string(),
            total_energy_kwh: result.total_energy_kwh,
            total_co2_kg: result.total_co2_kg,
            total_cost: result.total_cost,
            avg_wait: result.avg_wait,
            avg_turnaround: result.avg_turnaround,
            tasks_executed: result.tasks_executed,
        }
    }
}

/// One row per algorithm, with a header.
pub fn write_csv<W: Write>(results: &[AlgorithmResult], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for result in results {
        csv.serialize(SummaryRow::from(result))?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(comparison: &Comparison, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, comparison)?;
    Ok(())
}

/// Write both the CSV summary and the full JSON record into `dir`.
pub fn save_results<P: AsRef<Path>>(comparison: &Comparison, dir: P) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let csv_path = dir.join(CSV_FILE);
    write_csv(comparison.results(), BufWriter::new(File::create(&csv_path)?))?;
    info!("Saved {}", csv_path.display());

    let json_path = dir.join(JSON_FILE);
    let mut json = BufWriter::new(File::create(&json_path)?);
    write_json(comparison, &mut json)?;
    json.flush()?;
    info!("Saved {}", json_path.display());

    Ok(())
}

/// Fixed-width table of every result followed by the energy and CO₂ rankings.
pub fn summary_table(comparison: &Comparison) -> String {
    let mut out = String::new();
    let rule = "=".repeat(92);

    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "{:<16} {:>14} {:>12} {:>12} {:>14} {:>16}",
        "Algorithm", "Energy (kWh)", "CO2 (kg)", "Cost", "Avg wait", "Avg turnaround"
    );
    let _ = writeln!(out, "{rule}");
    for r in comparison.results() {
        let _ = writeln!(
            out,
            "{:<16} {:>14.6} {:>12.6} {:>12.6} {:>14.2} {:>16.2}",
            r.algorithm.to_string(),
            r.total_energy_kwh,
            r.total_co2_kg,
            r.total_cost,
            r.avg_wait,
            r.avg_turnaround
        );
    }
    let _ = writeln!(out, "{rule}");

    let _ = writeln!(out, "\nEnergy consumption ranking:");
    for (i, r) in comparison.ranked_by_energy().iter().enumerate() {
        let _ = writeln!(out, "  {}. {}: {:.6} kWh", i + 1, r.algorithm, r.total_energy_kwh);
    }
    let _ = writeln!(out, "\nCO2 emissions ranking:");
    for (i, r) in comparison.ranked_by_co2().iter().enumerate() {
        let _ = writeln!(out, "  {}. {}: {:.6} kg", i + 1, r.algorithm, r.total_co2_kg);
    }

    if let (Some(energy), Some(co2)) = (comparison.best_energy(), comparison.best_co2()) {
        let _ = writeln!(out, "\nBest energy algorithm: {}", energy.algorithm);
        let _ = writeln!(out, "Best CO2 reduction:    {}", co2.algorithm);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{ArrivalModel, Config},
        sim::Simulator,
    };

    fn comparison() -> Comparison {
        let config = Config::builder()
            .tasks(6)
            .arrival(ArrivalModel::AllAtZero)
            .build()
            .unwrap();
        Simulator::new(config).unwrap().run_all()
    }

    #[test]
    fn csv_has_header_and_row_per_algorithm() {
        let comparison = comparison();
        let mut buf = Vec::new();
        write_csv(comparison.results(), &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(
            lines[0],
            "algorithm,total_energy_kwh,total_co2_kg,total_cost,avg_wait,avg_turnaround,tasks_executed"
        );
        assert!(lines[1].starts_with("FCFS,"));
        assert!(lines[5].starts_with("EnergyOptimized,"));
    }

    #[test]
    fn json_nests_per_task_records() {
        let comparison = comparison();
        let mut buf = Vec::new();
        write_json(&comparison, &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let results = value["results"].as_array().unwrap();
        assert_eq!(results.len(), 5);
        assert_eq!(results[1]["algorithm"], "SJF");
        assert_eq!(results[1]["tasks"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn save_results_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results");
        save_results(&comparison(), &out).unwrap();
        assert!(out.join(CSV_FILE).is_file());
        assert!(out.join(JSON_FILE).is_file());
    }

    #[test]
    fn summary_names_the_winners() {
        let comparison = comparison();
        let table = summary_table(&comparison);
        let best = comparison.best_energy().unwrap().algorithm.to_string();
        assert!(table.contains(&format!("Best energy algorithm: {best}")));
        assert!(table.contains("RoundRobin"));
    }
}
