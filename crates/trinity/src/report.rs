//! Plain-text summaries of a run: console lines and a Markdown report

use std::fmt::{self, Write as _};

use trinity_core::analysis::{BaselineComparison, BaselineRun, ResultTable};
use trinity_core::config::S_FACTOR;
use trinity_core::metrics::{Metric, MetricsRecord};

/// Rows shown in the report's sweep preview
pub const PREVIEW_ROWS: usize = 10;

fn fmt_metric(v: f64) -> String {
    if v.is_finite() {
        format!("{v:.6}")
    } else {
        v.to_string()
    }
}

/// `conv_time=…, entropy=…, energy=…`
#[must_use]
pub fn headline(metrics: &MetricsRecord) -> String {
    [Metric::ConvTime, Metric::Entropy, Metric::Energy]
        .iter()
        .map(|m| format!("{}={}", m.key(), fmt_metric(metrics.get(*m))))
        .collect::<Vec<_>>()
        .join(", ")
}

fn baseline_line(label: &str, run: &BaselineRun) -> String {
    match run.outcome.failure() {
        None => format!("Baseline ({label}, s={:.6}): {}", run.s, headline(&run.metrics)),
        Some(reason) => format!("Baseline ({label}, s={:.6}) failed: {reason}", run.s),
    }
}

/// Console lines for a baseline comparison
#[must_use]
pub fn baseline_summary(cmp: &BaselineComparison) -> Vec<String> {
    let mut lines = vec![
        baseline_line("no κ/π", &cmp.without),
        baseline_line("with κ/π", &cmp.with),
    ];
    if cmp.is_complete() {
        let d = cmp.deltas();
        lines.push(format!(
            "Delta (with - without): conv_time={}, entropy={}, energy={}",
            fmt_metric(d.conv_time),
            fmt_metric(d.entropy),
            fmt_metric(d.energy)
        ));
    }
    lines
}

/// Console lines for a finished sweep
#[must_use]
pub fn sweep_summary(table: &ResultTable) -> Vec<String> {
    let mut lines = vec![format!(
        "Sweep: {} points evaluated, {} rows, {} failed",
        table.evaluated(),
        table.len(),
        table.failed()
    )];
    for (s, energy) in table.mean_by_scaling(Metric::Energy) {
        let marker = if s == S_FACTOR { " (κ/π)" } else { "" };
        lines.push(format!("  s={s:.6}{marker}: mean energy {}", fmt_metric(energy)));
    }
    lines
}

/// Markdown report with the baseline metrics and a sweep overview
#[must_use]
pub fn render_markdown(baseline: Option<&BaselineComparison>, table: Option<&ResultTable>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_markdown(&mut out, baseline, table);
    out
}

fn write_markdown(
    out: &mut String,
    baseline: Option<&BaselineComparison>,
    table: Option<&ResultTable>,
) -> fmt::Result {
    writeln!(out, "# Trinity Dynamics Report\n")?;
    writeln!(out, "κ/π = {S_FACTOR:.7}\n")?;
    if let Some(cmp) = baseline {
        write_baseline_section(out, cmp)?;
    }
    if let Some(table) = table {
        write_sweep_section(out, table)?;
    }
    Ok(())
}

fn write_baseline_section(out: &mut String, cmp: &BaselineComparison) -> fmt::Result {
    writeln!(out, "## Baseline Metrics\n")?;
    writeln!(out, "| Metric | s = 1 | s = κ/π |")?;
    writeln!(out, "|---|---|---|")?;
    for metric in Metric::ALL {
        writeln!(
            out,
            "| {} | {} | {} |",
            metric.label(),
            fmt_metric(cmp.without.metrics.get(metric)),
            fmt_metric(cmp.with.metrics.get(metric))
        )?;
    }
    writeln!(out)
}

fn write_sweep_section(out: &mut String, table: &ResultTable) -> fmt::Result {
    writeln!(out, "## Sensitivity Sweep\n")?;
    writeln!(
        out,
        "{} rows from {} points ({} failed).\n",
        table.len(),
        table.evaluated(),
        table.failed()
    )?;

    writeln!(out, "| s | Mean Energy | Mean Entropy |")?;
    writeln!(out, "|---|---|---|")?;
    let entropy = table.mean_by_scaling(Metric::Entropy);
    for ((s, energy), (_, h)) in table.mean_by_scaling(Metric::Energy).iter().zip(&entropy) {
        writeln!(out, "| {s:.6} | {} | {} |", fmt_metric(*energy), fmt_metric(*h))?;
    }
    writeln!(out)?;

    writeln!(out, "### First {PREVIEW_ROWS} Rows\n")?;
    writeln!(out, "| dt | s | seed | {} |", metric_header())?;
    writeln!(out, "|---|---|---|{}", "---|".repeat(Metric::ALL.len()))?;
    for row in table.head(PREVIEW_ROWS) {
        let cells: Vec<String> = Metric::ALL
            .iter()
            .map(|m| fmt_metric(row.metric(*m)))
            .collect();
        writeln!(
            out,
            "| {} | {:.6} | {} | {} |",
            row.dt,
            row.s,
            row.seed,
            cells.join(" | ")
        )?;
    }
    Ok(())
}

fn metric_header() -> String {
    Metric::ALL
        .iter()
        .map(|m| m.key())
        .collect::<Vec<_>>()
        .join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use trinity_core::analysis::{GridBuilder, compare_baseline, run_sweep};
    use trinity_core::config::SimulationConfig;

    #[test]
    fn test_headline_formats_infinity() {
        let line = headline(&MetricsRecord::sentinel());
        assert_eq!(line, "conv_time=inf, entropy=0.000000, energy=inf");
    }

    #[test]
    fn test_baseline_summary_has_delta_line() {
        let cmp = compare_baseline(&SimulationConfig::default().with_steps(200)).unwrap();
        let lines = baseline_summary(&cmp);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Baseline (no κ/π, s=1.000000): conv_time="));
        assert!(lines[2].starts_with("Delta (with - without)"));
    }

    #[test]
    fn test_markdown_report_sections() {
        let config = SimulationConfig::default().with_steps(150);
        let cmp = compare_baseline(&config).unwrap();
        let grid = GridBuilder::new()
            .initial_states(vec![vec![0.3, 0.3, 0.4]])
            .dts(vec![0.01])
            .scaling_factors(vec![1.0, S_FACTOR])
            .seeds(vec![1, 2])
            .build()
            .unwrap();
        let table = run_sweep(&grid, &config).unwrap();

        let sweep = sweep_summary(&table);
        assert_eq!(sweep.len(), 3);
        assert!(sweep[2].contains("(κ/π)"));

        let md = render_markdown(Some(&cmp), Some(&table));
        assert!(md.starts_with("# Trinity Dynamics Report"));
        assert!(md.contains("## Baseline Metrics"));
        assert!(md.contains("## Sensitivity Sweep"));
        assert!(md.contains("### First 10 Rows"));
        // 4 matrices x 2 scaling factors x 2 seeds = 16 rows, preview shows 10
        let preview = md.split("### First 10 Rows").nth(1).unwrap();
        assert_eq!(preview.lines().filter(|l| l.starts_with("| 0.01 |")).count(), 10);
    }

    #[test]
    fn test_markdown_sweep_counts_line() {
        let grid = GridBuilder::new()
            .initial_states(vec![vec![0.3, 0.3, 0.4]])
            .dts(vec![0.01])
            .scaling_factors(vec![1.0, 1e300])
            .seeds(vec![1])
            .build()
            .unwrap();
        let table = run_sweep(&grid, &SimulationConfig::default().with_steps(50)).unwrap();

        let md = render_markdown(None, Some(&table));
        assert!(md.contains("4 rows from 8 points (4 failed).\n"));
        assert_eq!(sweep_summary(&table)[0], "Sweep: 8 points evaluated, 4 rows, 4 failed");
    }

    #[test]
    fn test_markdown_without_sections() {
        let md = render_markdown(None, None);
        assert!(!md.contains("## Baseline Metrics"));
        assert!(!md.contains("## Sensitivity Sweep"));
    }
}
