//! Result files written by the CLI

use std::fs;
use std::io;
use std::path::Path;

use trinity_core::analysis::ResultTable;
use trinity_core::model::Trajectory;

pub const SWEEP_CSV: &str = "sensitivity_results.csv";
pub const SWEEP_JSON: &str = "sensitivity_results.json";
pub const BASELINE_WITH_CSV: &str = "baseline_with.csv";
pub const BASELINE_WITHOUT_CSV: &str = "baseline_without.csv";
pub const REPORT_MD: &str = "report.md";

/// Write bytes to a file atomically using write-then-rename pattern.
///
/// The content goes to `<path>.tmp` first and is renamed over the target, so
/// an interrupted run never leaves a truncated result file behind.
pub fn atomic_write_bytes(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    fs::write(temp_path, content)?;
    fs::rename(temp_path, path)?;
    Ok(())
}

/// Write a trajectory as CSV (`t, agent_1, ...`)
pub fn write_trajectory_csv(path: &Path, traj: &Trajectory, dt: f64) -> color_eyre::Result<()> {
    let mut buf = Vec::new();
    traj.write_csv(&mut buf, dt)?;
    atomic_write_bytes(path, &buf)?;
    tracing::debug!("wrote {} trajectory rows to {}", traj.len(), path.display());
    Ok(())
}

/// Write the sweep table as CSV
pub fn write_table_csv(path: &Path, table: &ResultTable) -> color_eyre::Result<()> {
    let mut buf = Vec::new();
    table.write_csv(&mut buf)?;
    atomic_write_bytes(path, &buf)?;
    tracing::debug!("wrote {} sweep rows to {}", table.len(), path.display());
    Ok(())
}

/// Write the sweep table as a JSON array of rows
pub fn write_table_json(path: &Path, table: &ResultTable) -> color_eyre::Result<()> {
    let json = table.to_json()?;
    atomic_write_bytes(path, json.as_bytes())?;
    Ok(())
}
