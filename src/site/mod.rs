//! The render-ready site model.
//!
//! [`assemble`] composes normalized packages, the letter index, and the
//! resolved groups into one immutable description of every page the renderer
//! will produce. Each descriptor carries everything its template needs, so
//! rendering never has to look anything up. No I/O happens here.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::index::{Group, LetterIndex};
use crate::package::{CanonicalPackage, Variant};

pub const INDEX_FILE: &str = "index.html";

/// Make a web friendly file name out of whatever text is thrown here.
pub fn page_name(text: &str) -> String {
    text.replace('/', ".").replace(' ', "_")
}

fn package_file(name: &str) -> String {
    page_name(&format!("{name}.html"))
}

fn group_file(id: &str) -> String {
    page_name(&format!("{id}.group.html"))
}

fn letter_file(label: &str) -> String {
    page_name(&format!("{label}.letter.html"))
}

/// Link to a package page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageLink {
    pub name: String,
    pub href: String,
    pub summary: String,
}

/// Link to a letter page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterLink {
    pub label: String,
    pub href: String,
}

/// Link to a group page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupLink {
    pub id: String,
    pub name: String,
    pub href: String,
}

/// Entry in the index page's most-recently-built list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentLink {
    pub name: String,
    pub href: String,
    pub version: String,
    pub release: String,
    pub buildtime: u64,
}

/// One package-detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagePage {
    pub name: String,
    pub filename: String,
    pub summary: String,
    pub description: String,
    /// Newest first.
    pub variants: Vec<Variant>,
    /// Back-link to the letter bucket this package lives in.
    pub letter: LetterLink,
    /// Back-links to every group the package belongs to.
    pub groups: Vec<GroupLink>,
}

/// One alphabetical navigation page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterPage {
    pub label: String,
    pub filename: String,
    pub packages: Vec<PackageLink>,
    pub prev: Option<LetterLink>,
    pub next: Option<LetterLink>,
}

/// One group page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupPage {
    pub id: String,
    pub name: String,
    pub description: String,
    pub filename: String,
    pub members: Vec<PackageLink>,
}

/// The single top-level entry page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexPage {
    pub repo_id: String,
    pub title: String,
    pub package_count: usize,
    pub group_count: usize,
    pub letters: Vec<LetterLink>,
    pub groups: Vec<GroupLink>,
    /// Most recently built packages, newest first.
    pub recent: Vec<RecentLink>,
}

/// The complete, immutable description of one repository's site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteModel {
    pub repo_id: String,
    pub title: String,
    pub package_count: usize,
    pub group_count: usize,
    pub index: IndexPage,
    pub letters: Vec<LetterPage>,
    pub packages: Vec<PackagePage>,
    pub groups: Vec<GroupPage>,
}

/// Compose the final site model.
///
/// Purely a transformation: an empty package set still yields a valid model
/// with a single index page stating zero packages. `recents` caps the index
/// page's most-recently-built list.
pub fn assemble(
    repo_id: &str,
    title: &str,
    packages: &[CanonicalPackage],
    letter_index: &LetterIndex,
    groups: &[Group],
    recents: usize,
) -> SiteModel {
    let by_name: BTreeMap<&str, &CanonicalPackage> =
        packages.iter().map(|p| (p.name.as_str(), p)).collect();
    let group_by_id: BTreeMap<&str, &Group> = groups.iter().map(|g| (g.id.as_str(), g)).collect();

    let letter_links: Vec<LetterLink> = letter_index
        .buckets()
        .map(|(bucket, _)| {
            let label = bucket.label();
            LetterLink {
                href: letter_file(&label),
                label,
            }
        })
        .collect();

    let group_links: Vec<GroupLink> = groups
        .iter()
        .map(|g| GroupLink {
            id: g.id.clone(),
            name: g.name.clone(),
            href: group_file(&g.id),
        })
        .collect();

    let package_link = |name: &str| PackageLink {
        name: name.to_string(),
        href: package_file(name),
        summary: by_name
            .get(name)
            .map(|p| p.summary.clone())
            .unwrap_or_default(),
    };

    let letter_pages: Vec<LetterPage> = letter_index
        .buckets()
        .enumerate()
        .map(|(i, (bucket, names))| LetterPage {
            label: bucket.label(),
            filename: letter_file(&bucket.label()),
            packages: names.iter().map(|n| package_link(n)).collect(),
            prev: i.checked_sub(1).map(|p| letter_links[p].clone()),
            next: letter_links.get(i + 1).cloned(),
        })
        .collect();

    let letter_link_of = |name: &str| {
        let label = crate::index::LetterBucket::for_name(name).label();
        LetterLink {
            href: letter_file(&label),
            label,
        }
    };

    let package_pages: Vec<PackagePage> = packages
        .iter()
        .map(|p| PackagePage {
            name: p.name.clone(),
            filename: package_file(&p.name),
            summary: p.summary.clone(),
            description: p.description.clone(),
            variants: p.variants.clone(),
            letter: letter_link_of(&p.name),
            groups: p
                .groups
                .iter()
                .map(|id| GroupLink {
                    id: id.clone(),
                    name: group_by_id
                        .get(id.as_str())
                        .map(|g| g.name.clone())
                        .unwrap_or_else(|| id.clone()),
                    href: group_file(id),
                })
                .collect(),
        })
        .collect();

    let group_pages: Vec<GroupPage> = groups
        .iter()
        .map(|g| GroupPage {
            id: g.id.clone(),
            name: g.name.clone(),
            description: g.description.clone(),
            filename: group_file(&g.id),
            members: g.members.iter().map(|m| package_link(m)).collect(),
        })
        .collect();

    let mut by_buildtime: Vec<&CanonicalPackage> = packages.iter().collect();
    by_buildtime.sort_by(|a, b| {
        b.newest()
            .buildtime
            .cmp(&a.newest().buildtime)
            .then_with(|| a.name.cmp(&b.name))
    });
    let recent: Vec<RecentLink> = by_buildtime
        .into_iter()
        .take(recents)
        .map(|p| {
            let newest = p.newest();
            RecentLink {
                name: p.name.clone(),
                href: package_file(&p.name),
                version: newest.evr.version.clone(),
                release: newest.evr.release.clone(),
                buildtime: newest.buildtime,
            }
        })
        .collect();

    let index = IndexPage {
        repo_id: repo_id.to_string(),
        title: title.to_string(),
        package_count: packages.len(),
        group_count: groups.len(),
        letters: letter_links,
        groups: group_links,
        recent,
    };

    SiteModel {
        repo_id: repo_id.to_string(),
        title: title.to_string(),
        package_count: packages.len(),
        group_count: groups.len(),
        index,
        letters: letter_pages,
        packages: package_pages,
        groups: group_pages,
    }
}
