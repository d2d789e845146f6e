//! Weighted composition of normalized features into the adequacy index.

use adequacy_map_province_models::{NormalizedFeatures, Weights};

/// Computes `A_i = w1*X1 + w2*X2 + w3*X3 + w4*X4`.
///
/// The inverse elderly feature is carried on [`NormalizedFeatures`] for
/// display but does not contribute to the index.
#[must_use]
pub fn adequacy_index(features: &NormalizedFeatures, weights: Weights) -> f64 {
    weights.staff * features.staff
        + weights.equipment * features.equipment
        + weights.insurance * features.insurance
        + weights.service_load * features.service_load_inv
}

/// Computes the adequacy index of every province with [`Weights::ADEQUACY`].
#[must_use]
pub fn compose_index(features: &[NormalizedFeatures]) -> Vec<f64> {
    features
        .iter()
        .map(|f| adequacy_index(f, Weights::ADEQUACY))
        .collect()
}
