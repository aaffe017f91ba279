//! Completeness score
//!
//! Required fields share 60 points and recommended fields share 40, so a
//! product with every required field and nothing else scores 60.

use crate::product_schema::{RECOMMENDED_FIELDS, REQUIRED_FIELDS};

/// Total weight of the required fields
pub const REQUIRED_BUDGET: f64 = 60.0;

/// Total weight of the recommended fields
pub const RECOMMENDED_BUDGET: f64 = 40.0;

/// Weight of one present required field
#[must_use]
pub fn required_weight() -> f64 {
    REQUIRED_BUDGET / REQUIRED_FIELDS.len() as f64
}

/// Weight of one present recommended field
#[must_use]
pub fn recommended_weight() -> f64 {
    RECOMMENDED_BUDGET / RECOMMENDED_FIELDS.len() as f64
}

#[must_use]
pub fn max_possible() -> f64 {
    required_weight() * REQUIRED_FIELDS.len() as f64
        + recommended_weight() * RECOMMENDED_FIELDS.len() as f64
}

/// Normalize a raw tally to `[0, 100]`, rounded to one decimal
#[must_use]
pub fn normalize(raw: f64) -> f64 {
    let max = max_possible();
    if max <= 0.0 || raw <= 0.0 {
        return 0.0;
    }
    let scaled = (100.0 * raw / max * 10.0).round() / 10.0;
    scaled.min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_match_budgets() {
        assert_eq!(required_weight(), 20.0);
        assert!((recommended_weight() - 40.0 / 6.0).abs() < 1e-12);
        assert!((max_possible() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn normalization_rounds_and_caps() {
        assert_eq!(normalize(0.0), 0.0);
        assert_eq!(normalize(60.0), 60.0);
        assert_eq!(normalize(60.0 + recommended_weight()), 66.7);
        assert_eq!(normalize(max_possible()), 100.0);
        assert_eq!(normalize(250.0), 100.0);
    }
}
