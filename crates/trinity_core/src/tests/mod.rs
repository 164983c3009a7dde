//! Integration tests for the trinity simulation engine
//!
//! Tests are organized by topic:
//! - `integration` - Euler stepping, normalization, reproducibility
//! - `metrics` - Metrics computed from real integrator output
//! - `sweep` - Grid construction order and sensitivity sweeps end to end
