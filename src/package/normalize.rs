//! Raw record normalization: merge multi-arch duplicates into canonical
//! packages and pick a deterministic representative for display data.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::debug;

use crate::query::RawPackage;
use crate::report::Warning;

use super::{CanonicalPackage, Evr, Variant};

/// Merge raw records by package name into [`CanonicalPackage`]s.
///
/// Variants are deduplicated by the full (epoch, version, release, arch)
/// tuple and sorted newest-first; summary and description come from the
/// newest variant (highest EVR, then `noarch` before native arches, then
/// lexical arch name). Output is ordered case-insensitively by name.
///
/// Records missing a name or version are dropped with a warning rather than
/// failing the run.
pub fn normalize(raw: Vec<RawPackage>, warnings: &mut Vec<Warning>) -> Vec<CanonicalPackage> {
    let mut by_name: BTreeMap<String, Vec<RawPackage>> = BTreeMap::new();

    for record in raw {
        if record.name.is_empty() {
            warnings.push(Warning::MalformedPackage {
                context: format!("version={} arch={}", record.version, record.arch),
                missing: "name",
            });
            continue;
        }
        if record.version.is_empty() {
            warnings.push(Warning::MalformedPackage {
                context: format!("name={} arch={}", record.name, record.arch),
                missing: "version",
            });
            continue;
        }
        by_name.entry(record.name.clone()).or_default().push(record);
    }

    let mut packages: Vec<CanonicalPackage> = by_name
        .into_iter()
        .map(|(name, records)| merge(name, records))
        .collect();

    // BTreeMap already gave byte order; display order is case-insensitive.
    packages.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });

    debug!("normalized into {} canonical packages", packages.len());
    packages
}

fn merge(name: String, records: Vec<RawPackage>) -> CanonicalPackage {
    // dedup by the full EVRA tuple, not by buildtime
    let mut seen: HashSet<(Evr, String)> = HashSet::new();
    let mut entries: Vec<(Variant, String, String)> = Vec::new();

    for record in records {
        let evr = Evr::new(
            Evr::parse_epoch(&record.epoch),
            &record.version,
            &record.release,
        );
        let buildtime = record.buildtime.trim().parse().unwrap_or(0);
        if seen.insert((evr.clone(), record.arch.clone())) {
            entries.push((
                Variant::new(evr, &record.arch, buildtime),
                record.summary,
                record.description,
            ));
        }
    }

    entries.sort_by(|a, b| a.0.cmp_newest_first(&b.0));

    // entries is non-empty: merge() is only called with at least one record
    let summary = entries[0].1.clone();
    let description = entries[0].2.clone();
    let variants = entries.into_iter().map(|(v, _, _)| v).collect();

    CanonicalPackage {
        name,
        variants,
        summary,
        description,
        groups: BTreeSet::new(),
    }
}
