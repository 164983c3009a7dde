//! Tabular sweep results and their CSV/JSON export.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;
use crate::metrics::{Metric, MetricsRecord};
use crate::model::rounded_state;

use super::ParameterPoint;

/// Decimal places kept for `x0` and `A_tag` keys
pub const KEY_DECIMALS: i32 = 3;

/// Column names in export order
pub const COLUMNS: [&str; 10] = [
    "dt",
    "s",
    "seed",
    "x0",
    "A_tag",
    "conv_time",
    "entropy",
    "osc_freq",
    "stability",
    "energy",
];

/// One completed grid point: its scalar parameters joined with its metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub dt: f64,
    pub s: f64,
    pub seed: u64,
    /// Initial state rounded to three decimals
    pub x0: Vec<f64>,
    /// Interaction matrix rounded to three decimals, flattened row by row
    #[serde(rename = "A_tag")]
    pub a_tag: Vec<f64>,
    pub conv_time: f64,
    pub entropy: f64,
    pub osc_freq: f64,
    pub stability: f64,
    pub energy: f64,
}

impl ResultRow {
    /// Join a point with its metrics; the final state is dropped
    #[must_use]
    pub fn new(point: &ParameterPoint, metrics: &MetricsRecord) -> Self {
        Self {
            dt: point.dt,
            s: point.s,
            seed: point.seed,
            x0: rounded_state(&point.x0, KEY_DECIMALS),
            a_tag: point.matrix.rounded_flat(KEY_DECIMALS),
            conv_time: metrics.conv_time,
            entropy: metrics.entropy,
            osc_freq: metrics.osc_freq,
            stability: metrics.stability,
            energy: metrics.energy,
        }
    }

    #[must_use]
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::ConvTime => self.conv_time,
            Metric::Entropy => self.entropy,
            Metric::OscFreq => self.osc_freq,
            Metric::Stability => self.stability,
            Metric::Energy => self.energy,
        }
    }

    /// String cells in [`COLUMNS`] order
    fn record(&self) -> Vec<String> {
        vec![
            fmt_float(self.dt),
            fmt_float(self.s),
            self.seed.to_string(),
            fmt_tuple(&self.x0),
            fmt_tuple(&self.a_tag),
            fmt_float(self.conv_time),
            fmt_float(self.entropy),
            fmt_float(self.osc_freq),
            fmt_float(self.stability),
            fmt_float(self.energy),
        ]
    }
}

fn fmt_float(v: f64) -> String {
    format!("{v:?}")
}

fn fmt_tuple(values: &[f64]) -> String {
    let inner: Vec<String> = values.iter().map(|v| fmt_float(*v)).collect();
    format!("({})", inner.join(", "))
}

/// Rows of a sweep in grid order, minus points whose integration failed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
    /// Grid points visited
    evaluated: usize,
    /// Points dropped after a numerical failure
    failed: usize,
}

impl ResultTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_row(&mut self, row: ResultRow) {
        self.evaluated += 1;
        self.rows.push(row);
    }

    pub(crate) fn record_failure(&mut self) {
        self.evaluated += 1;
        self.failed += 1;
    }

    #[must_use]
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed
    }

    #[must_use]
    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    /// First `n` rows
    #[must_use]
    pub fn head(&self, n: usize) -> &[ResultRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// All values of one metric in row order
    #[must_use]
    pub fn column(&self, metric: Metric) -> Vec<f64> {
        self.rows.iter().map(|r| r.metric(metric)).collect()
    }

    /// Mean of `metric` grouped by the key `key` extracts, sorted by key.
    ///
    /// Infinite values are left out of the mean; a group with no finite value
    /// yields `+inf`.
    pub fn mean_by<F>(&self, key: F, metric: Metric) -> Vec<(f64, f64)>
    where
        F: Fn(&ResultRow) -> f64,
    {
        let mut keys: Vec<f64> = self.rows.iter().map(&key).collect();
        keys.sort_by(f64::total_cmp);
        keys.dedup();

        keys.into_iter()
            .map(|k| {
                let finite: Vec<f64> = self
                    .rows
                    .iter()
                    .filter(|r| key(r) == k)
                    .map(|r| r.metric(metric))
                    .filter(|v| v.is_finite())
                    .collect();
                let mean = if finite.is_empty() {
                    f64::INFINITY
                } else {
                    finite.iter().sum::<f64>() / finite.len() as f64
                };
                (k, mean)
            })
            .collect()
    }

    /// Mean of `metric` for each scaling factor
    #[must_use]
    pub fn mean_by_scaling(&self, metric: Metric) -> Vec<(f64, f64)> {
        self.mean_by(|r| r.s, metric)
    }

    /// Mean of `metric` for each time step
    #[must_use]
    pub fn mean_by_dt(&self, metric: Metric) -> Vec<(f64, f64)> {
        self.mean_by(|r| r.dt, metric)
    }

    /// Write the table as CSV: a header line then one line per row
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(COLUMNS)?;
        for row in &self.rows {
            wtr.write_record(row.record())?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Rows as a pretty-printed JSON array
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(&self.rows)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InteractionMatrix;

    fn row(s: f64, energy: f64) -> ResultRow {
        let point = ParameterPoint {
            x0: vec![0.33333, 0.33333, 0.33334],
            matrix: InteractionMatrix::from_array([
                [1.0, 0.5004, 0.3],
                [0.5004, 1.0, 0.4],
                [0.3, 0.4, 1.0],
            ]),
            dt: 0.01,
            s,
            seed: 42,
        };
        let metrics = MetricsRecord {
            conv_time: f64::INFINITY,
            entropy: 1.5,
            osc_freq: 2.0,
            stability: 0.25,
            energy,
            final_state: Some(vec![0.3, 0.3, 0.4]),
        };
        ResultRow::new(&point, &metrics)
    }

    #[test]
    fn test_row_rounds_keys() {
        let r = row(1.0, 0.5);
        assert_eq!(r.x0, vec![0.333, 0.333, 0.333]);
        assert_eq!(r.a_tag[1], 0.5);
        assert_eq!(r.a_tag.len(), 9);
    }

    #[test]
    fn test_write_csv() {
        let mut table = ResultTable::new();
        table.push_row(row(1.0, 0.5));

        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("dt,s,seed,x0,A_tag,conv_time,entropy,osc_freq,stability,energy")
        );
        assert_eq!(
            lines.next(),
            Some(
                "0.01,1.0,42,\"(0.333, 0.333, 0.333)\",\"(1.0, 0.5, 0.3, 0.5, 1.0, 0.4, 0.3, 0.4, 1.0)\",inf,1.5,2.0,0.25,0.5"
            )
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_mean_by_scaling() {
        let mut table = ResultTable::new();
        table.push_row(row(1.01, 1.0));
        table.push_row(row(1.0, 2.0));
        table.push_row(row(1.01, 3.0));
        table.push_row(row(1.0, f64::INFINITY));
        table.push_row(row(1.02, f64::INFINITY));

        let means = table.mean_by_scaling(Metric::Energy);
        assert_eq!(means, vec![(1.0, 2.0), (1.01, 2.0), (1.02, f64::INFINITY)]);
        assert_eq!(table.mean_by_dt(Metric::Entropy), vec![(0.01, 1.5)]);
    }

    #[test]
    fn test_counters_and_head() {
        let mut table = ResultTable::new();
        table.push_row(row(1.0, 1.0));
        table.record_failure();
        table.push_row(row(1.0, 2.0));

        assert_eq!(table.len(), 2);
        assert_eq!(table.evaluated(), 3);
        assert_eq!(table.failed(), 1);
        assert_eq!(table.head(1).len(), 1);
        assert_eq!(table.head(10).len(), 2);
        assert_eq!(table.column(Metric::Energy), vec![1.0, 2.0]);
    }

    #[test]
    fn test_to_json_uses_a_tag_key() {
        let mut table = ResultTable::new();
        table.push_row(row(1.0, 1.0));
        let json = table.to_json().unwrap();
        assert!(json.contains("\"A_tag\""));
        assert!(json.contains("\"seed\": 42"));
    }
}
