//! Deduplicated, multi-arch package representation.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Evr;

/// One (epoch, version, release, architecture) combination of a package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    pub evr: Evr,
    pub arch: String,
    /// Build timestamp in seconds since the epoch; zero when unknown.
    pub buildtime: u64,
}

impl Variant {
    pub fn new(evr: Evr, arch: &str, buildtime: u64) -> Self {
        Variant {
            evr,
            arch: arch.to_string(),
            buildtime,
        }
    }

    /// Rank the architecture for representative selection: `noarch` wins,
    /// everything else falls back to lexical name order.
    fn arch_rank(&self) -> (u8, &str) {
        if self.arch == "noarch" {
            (0, self.arch.as_str())
        } else {
            (1, self.arch.as_str())
        }
    }

    /// Newest-first ordering: highest EVR, then preferred architecture.
    pub fn cmp_newest_first(&self, other: &Self) -> Ordering {
        other
            .evr
            .cmp(&self.evr)
            .then_with(|| self.arch_rank().cmp(&other.arch_rank()))
    }
}

/// The deduplicated representation of one package name within a repository.
///
/// Variants are sorted newest-first and never empty; summary and description
/// come from the newest variant. Group membership is filled in when group
/// metadata is resolved against the package set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPackage {
    pub name: String,
    pub variants: Vec<Variant>,
    pub summary: String,
    pub description: String,
    pub groups: BTreeSet<String>,
}

impl CanonicalPackage {
    /// The newest variant, used as the representative for display data.
    pub fn newest(&self) -> &Variant {
        // normalize() guarantees at least one variant
        &self.variants[0]
    }
}
