//! Subcommand implementations shared by the binary and its tests

use std::fs;
use std::io::{IsTerminal, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use color_eyre::eyre::WrapErr;
use trinity_core::analysis::{
    BaselineComparison, ResultTable, SweepProgress, compare_baseline, run_sweep_with_progress,
};
use trinity_core::config::{DT_BASE, SimulationConfig, SweepConfig};

use crate::output::{
    BASELINE_WITH_CSV, BASELINE_WITHOUT_CSV, REPORT_MD, SWEEP_CSV, SWEEP_JSON, atomic_write_bytes,
    write_table_csv, write_table_json, write_trajectory_csv,
};
use crate::report;

const PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

/// Load a sweep configuration file, or the built-in defaults when `path` is `None`
pub fn load_sweep_config(path: Option<&Path>) -> color_eyre::Result<SweepConfig> {
    let Some(path) = path else {
        return Ok(SweepConfig::default());
    };
    let yaml = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    let config = SweepConfig::from_yaml(&yaml)
        .wrap_err_with(|| format!("invalid config {}", path.display()))?;
    tracing::info!("loaded sweep config from {}", path.display());
    Ok(config)
}

/// Run the κ/π baseline comparison and write both trajectories
pub fn baseline(out_dir: &Path, config: &SimulationConfig) -> color_eyre::Result<BaselineComparison> {
    fs::create_dir_all(out_dir)?;
    let cmp = compare_baseline(config)?;

    for (name, run) in [
        (BASELINE_WITHOUT_CSV, &cmp.without),
        (BASELINE_WITH_CSV, &cmp.with),
    ] {
        match run.outcome.trajectory() {
            Some(traj) => write_trajectory_csv(&out_dir.join(name), traj, DT_BASE)?,
            None => tracing::warn!("baseline s={} produced no trajectory; {name} not written", run.s),
        }
    }

    for line in report::baseline_summary(&cmp) {
        println!("{line}");
    }
    if !cmp.is_complete() {
        println!("Baseline run failed; check {}", crate::logging::LOG_FILE);
    }
    Ok(cmp)
}

/// Run the sensitivity sweep and write the result table
pub fn sweep(out_dir: &Path, config: &SweepConfig, json: bool) -> color_eyre::Result<ResultTable> {
    fs::create_dir_all(out_dir)?;
    let grid = config.grid()?;
    println!("Running sensitivity sweep over {} points...", grid.len());

    let progress = SweepProgress::new(grid.len());
    let done = AtomicBool::new(false);
    let show_progress = std::io::stderr().is_terminal();

    let table = std::thread::scope(|scope| {
        if show_progress {
            scope.spawn(|| {
                while !done.load(Ordering::Relaxed) {
                    eprint!("\r  {:>5.1}%", progress.fraction() * 100.0);
                    let _ = std::io::stderr().flush();
                    std::thread::sleep(PROGRESS_INTERVAL);
                }
                eprintln!("\r  100.0%");
            });
        }
        let result = run_sweep_with_progress(&grid, &config.simulation, Some(&progress));
        done.store(true, Ordering::Relaxed);
        result
    })?;

    let csv_path = out_dir.join(SWEEP_CSV);
    write_table_csv(&csv_path, &table)?;
    println!("Sensitivity CSV saved: {}", csv_path.display());

    if json {
        let json_path = out_dir.join(SWEEP_JSON);
        write_table_json(&json_path, &table)?;
        println!("Sensitivity JSON saved: {}", json_path.display());
    }

    for line in report::sweep_summary(&table) {
        println!("{line}");
    }
    Ok(table)
}

/// Baseline, then sweep, then the Markdown report
pub fn run(out_dir: &Path, config: &SweepConfig, json: bool) -> color_eyre::Result<()> {
    let cmp = baseline(out_dir, &config.simulation)?;
    let table = sweep(out_dir, config, json)?;

    let report_path = out_dir.join(REPORT_MD);
    let markdown = report::render_markdown(Some(&cmp), Some(&table));
    atomic_write_bytes(&report_path, markdown.as_bytes())?;
    println!("Report saved: {}", report_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SMALL_SWEEP: &str = r#"
simulation:
  steps: 120
initial_states:
  - [0.33, 0.33, 0.34]
dts: [0.01, 0.02]
scaling_factors: [1.0, 1.01]
seeds: [1, 2]
"#;

    #[test]
    fn test_load_default_and_file_config() {
        assert_eq!(load_sweep_config(None).unwrap(), SweepConfig::default());

        let dir = tempdir().unwrap();
        let path = dir.path().join("sweep.yaml");
        fs::write(&path, SMALL_SWEEP).unwrap();
        let config = load_sweep_config(Some(&path)).unwrap();
        assert_eq!(config.simulation.steps, 120);
        assert_eq!(config.seeds, Some(vec![1, 2]));
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let dir = tempdir().unwrap();
        assert!(load_sweep_config(Some(&dir.path().join("nope.yaml"))).is_err());
    }

    #[test]
    fn test_baseline_writes_both_trajectories() {
        let dir = tempdir().unwrap();
        let cmp = baseline(dir.path(), &SimulationConfig::default().with_steps(50)).unwrap();
        assert!(cmp.is_complete());

        for name in [BASELINE_WITH_CSV, BASELINE_WITHOUT_CSV] {
            let text = fs::read_to_string(dir.path().join(name)).unwrap();
            assert_eq!(text.lines().count(), 51);
        }
    }

    #[test]
    fn test_sweep_writes_csv_and_json() {
        let dir = tempdir().unwrap();
        let config = SweepConfig::from_yaml(SMALL_SWEEP).unwrap();
        let table = sweep(dir.path(), &config, true).unwrap();

        // 4 default matrices x 2 dts x 2 s x 2 seeds
        assert_eq!(table.evaluated(), 32);
        assert_eq!(table.failed(), 0);
        assert_eq!(table.len(), 32);

        let csv = fs::read_to_string(dir.path().join(SWEEP_CSV)).unwrap();
        assert_eq!(csv.lines().count(), 33);
        assert!(dir.path().join(SWEEP_JSON).exists());
    }

    #[test]
    fn test_sweep_with_invalid_dt_writes_nothing() {
        let dir = tempdir().unwrap();
        let mut config = SweepConfig::from_yaml(SMALL_SWEEP).unwrap();
        config.dts = Some(vec![0.01, 3.0]);

        let err = sweep(dir.path(), &config, true).unwrap_err();
        assert!(err.to_string().contains("time step must be in (0, 1], got 3"));
        assert!(!dir.path().join(SWEEP_CSV).exists());
        assert!(!dir.path().join(SWEEP_JSON).exists());
    }

    #[test]
    fn test_run_writes_report() {
        let dir = tempdir().unwrap();
        let mut config = SweepConfig::from_yaml(SMALL_SWEEP).unwrap();
        config.dts = Some(vec![0.01]);
        run(dir.path(), &config, false).unwrap();

        for name in [BASELINE_WITH_CSV, BASELINE_WITHOUT_CSV, SWEEP_CSV, REPORT_MD] {
            assert!(dir.path().join(name).exists(), "{name} missing");
        }
        assert!(!dir.path().join(SWEEP_JSON).exists());
    }
}
