mod matrix;
mod trajectory;

pub use matrix::InteractionMatrix;
pub use trajectory::Trajectory;

/// Round to `decimals` places, ties to even
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Round every entry of a state vector, as stored in result table keys
#[must_use]
pub fn rounded_state(x: &[f64], decimals: i32) -> Vec<f64> {
    x.iter().map(|v| round_to(*v, decimals)).collect()
}
