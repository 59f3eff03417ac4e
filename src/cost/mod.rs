pub mod attribution;
pub mod budget;
pub mod kpi;
pub mod models;
pub mod summary;
pub mod trends;

/// Round a USD amount to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
