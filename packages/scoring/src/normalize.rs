//! Max-based normalization of derived scores.
//!
//! Every column is divided by its maximum over the current result set. A
//! zero maximum is replaced by a divisor of `1.0` so an all-zero column
//! stays all-zero instead of turning into `NaN`.

use adequacy_map_province_models::{DerivedFeatures, NormMax, NormalizedFeatures};

/// A normalized column and the divisor used to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedColumn {
    /// Normalized values, in input order.
    pub values: Vec<f64>,
    /// Divisor actually applied: the column maximum, or `1.0` when the
    /// maximum is zero or the column is empty.
    pub max: f64,
}

/// Divides every value by the column maximum, guarding against zero.
///
/// Values land in `[0, 1]` for non-negative input. Negative input is out of
/// contract.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn safe_norm(column: &[f64]) -> NormalizedColumn {
    let max = column.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let divisor = if column.is_empty() || max == 0.0 {
        1.0
    } else {
        max
    };

    NormalizedColumn {
        values: column.iter().map(|v| v / divisor).collect(),
        max: divisor,
    }
}

/// Output of [`normalize_features`].
#[derive(Debug, Clone, PartialEq)]
pub struct Normalization {
    /// Normalized features, one per province in input order.
    pub features: Vec<NormalizedFeatures>,
    /// Divisors of the four indexed scores.
    pub norm_max: NormMax,
    /// Divisor of the elderly population column.
    pub elderly_max: f64,
}

/// Normalizes each derived score column and the elderly population column
/// independently, then applies the inverse transform to service load and
/// elderly population (lower burden means higher adequacy).
///
/// `elderly_population` must be aligned row-for-row with `derived`.
#[must_use]
pub fn normalize_features(
    derived: &[DerivedFeatures],
    elderly_population: &[f64],
) -> Normalization {
    debug_assert_eq!(derived.len(), elderly_population.len());

    let staff = safe_norm(&column(derived, |d| d.staff_score));
    let equipment = safe_norm(&column(derived, |d| d.equipment_score));
    let insurance = safe_norm(&column(derived, |d| d.insurance_score));
    let service_load = safe_norm(&column(derived, |d| d.service_load));
    let elderly = safe_norm(elderly_population);

    let features = (0..derived.len())
        .map(|i| NormalizedFeatures {
            staff: staff.values[i],
            equipment: equipment.values[i],
            insurance: insurance.values[i],
            service_load_inv: 1.0 - service_load.values[i],
            elderly_inv: 1.0 - elderly.values[i],
        })
        .collect();

    log::debug!(
        "Normalization maxima: staff={} equip={} ins={} svc={} elderly={}",
        staff.max,
        equipment.max,
        insurance.max,
        service_load.max,
        elderly.max
    );

    Normalization {
        features,
        norm_max: NormMax {
            staff_max: staff.max,
            equip_max: equipment.max,
            ins_max: insurance.max,
            svc_max: service_load.max,
        },
        elderly_max: elderly.max,
    }
}

fn column(derived: &[DerivedFeatures], score: impl Fn(&DerivedFeatures) -> f64) -> Vec<f64> {
    derived.iter().map(score).collect()
}
