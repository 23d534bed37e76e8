//! Navigation indices: alphabetical letter buckets and resolved groups.
//!
//! Everything here is built from ordered containers so that identical raw
//! input always yields byte-identical bucket and membership ordering.

use std::collections::BTreeMap;

use log::{debug, info};

use crate::package::CanonicalPackage;
use crate::query::RawGroup;
use crate::report::Warning;

/// The normalized leading character of a package name.
///
/// Ordering is the display convention: the digit bucket first, then `A`-`Z`,
/// then everything else (symbols, non-ASCII) in a single trailing bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LetterBucket {
    Digit,
    Letter(char),
    Other,
}

impl LetterBucket {
    /// Bucket for a package name, from its first byte.
    pub fn for_name(name: &str) -> Self {
        match name.as_bytes().first() {
            Some(b) if b.is_ascii_alphabetic() => {
                LetterBucket::Letter(b.to_ascii_uppercase() as char)
            }
            Some(b) if b.is_ascii_digit() => LetterBucket::Digit,
            _ => LetterBucket::Other,
        }
    }

    /// Human-readable bucket label, also used in page file names.
    pub fn label(&self) -> String {
        match self {
            LetterBucket::Digit => "0-9".to_string(),
            LetterBucket::Letter(c) => c.to_string(),
            LetterBucket::Other => "other".to_string(),
        }
    }
}

/// Packages bucketed by normalized leading character.
///
/// Every normalized package lands in exactly one bucket; within a bucket the
/// global case-insensitive name order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LetterIndex {
    buckets: BTreeMap<LetterBucket, Vec<String>>,
}

impl LetterIndex {
    /// Number of non-empty buckets.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Buckets in display order with their member package names.
    pub fn buckets(&self) -> impl Iterator<Item = (&LetterBucket, &[String])> {
        self.buckets.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

/// Bucket packages by normalized leading character.
///
/// `packages` must already carry the normalizer's name ordering; buckets
/// simply inherit it.
pub fn build_letter_index(packages: &[CanonicalPackage]) -> LetterIndex {
    let mut buckets: BTreeMap<LetterBucket, Vec<String>> = BTreeMap::new();
    for package in packages {
        buckets
            .entry(LetterBucket::for_name(&package.name))
            .or_default()
            .push(package.name.clone());
    }
    debug!("built {} letter buckets", buckets.len());
    LetterIndex { buckets }
}

/// A package-manager-defined collection of packages, resolved against the
/// current repository snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Member names, each guaranteed present in the normalized package set.
    pub members: Vec<String>,
}

/// Resolve declared group memberships against the normalized package set.
///
/// Members the snapshot does not contain are omitted with an informational
/// warning — comps metadata routinely references packages from optional
/// subrepositories. Groups left with no members are dropped, and each
/// surviving package learns which groups it belongs to.
pub fn build_group_index(
    raw_groups: Vec<RawGroup>,
    packages: &mut [CanonicalPackage],
    warnings: &mut Vec<Warning>,
) -> Vec<Group> {
    let by_name: BTreeMap<String, usize> = packages
        .iter()
        .enumerate()
        .map(|(i, p)| (p.name.clone(), i))
        .collect();

    let mut sorted = raw_groups;
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    sorted.dedup_by(|a, b| a.id == b.id);

    let mut groups = Vec::new();
    for raw in sorted {
        let mut members = Vec::new();
        let mut declared = raw.members;
        declared.sort();
        declared.dedup();

        for member in declared {
            match by_name.get(&member) {
                Some(&idx) => {
                    packages[idx].groups.insert(raw.id.clone());
                    members.push(member);
                }
                None => warnings.push(Warning::UnresolvedGroupMember {
                    group: raw.id.clone(),
                    member,
                }),
            }
        }

        if members.is_empty() {
            info!("group '{}' is empty, skipping", raw.id);
            warnings.push(Warning::EmptyGroup {
                group: raw.id.clone(),
            });
            continue;
        }

        groups.push(Group {
            id: raw.id,
            name: raw.name,
            description: raw.description,
            members,
        });
    }

    groups
}
