//! Granted-feature bits carried in the license payload.

use serde::{Deserialize, Serialize};

/// Features a license can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GatedFeature {
    /// Cost, pagination and depth enforcement on GraphQL operations.
    GraphqlProtections,
}

impl GatedFeature {
    pub fn bit(&self) -> u64 {
        match self {
            Self::GraphqlProtections => 1 << 1,
        }
    }
}

/// Raw granted-feature bitset. Unknown bits are preserved and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(pub u64);

impl FeatureSet {
    pub fn from_features(features: &[GatedFeature]) -> Self {
        Self(features.iter().fold(0, |acc, f| acc | f.bit()))
    }

    pub fn contains(&self, feature: GatedFeature) -> bool {
        self.0 & feature.bit() == feature.bit()
    }
}
