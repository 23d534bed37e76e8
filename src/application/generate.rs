//! Generate action - runs the full aggregation pipeline for one repository.

use log::{debug, info};

use crate::index::{build_group_index, build_letter_index};
use crate::package::normalize;
use crate::query::{QueryError, RawGroup, RawPackage, RepoQuery};
use crate::report::Warning;
use crate::site::{SiteModel, assemble};

/// Default cap for the index page's most-recently-built list.
pub const DEFAULT_RECENTS: usize = 30;

/// Configuration for one pipeline run, passed in explicitly so the core
/// never reads ambient state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository identifier as the package manager knows it.
    pub repo_id: String,
    /// Display title, used verbatim on the index page.
    pub title: String,
    /// Filters applied to raw records before normalization.
    pub filters: Filters,
    /// How many packages the index page lists as recently built.
    pub recents: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            repo_id: String::new(),
            title: String::new(),
            filters: Filters::default(),
            recents: DEFAULT_RECENTS,
        }
    }
}

/// Optional include/exclude filters for architectures and groups.
///
/// Include lists win over exclude lists when both are given for the same
/// axis; an empty include list means "everything".
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub arches: Vec<String>,
    pub exclude_arches: Vec<String>,
    pub groups: Vec<String>,
    pub exclude_groups: Vec<String>,
}

impl Filters {
    fn keep_arch(&self, arch: &str) -> bool {
        if !self.arches.is_empty() {
            return self.arches.iter().any(|a| a == arch);
        }
        !self.exclude_arches.iter().any(|a| a == arch)
    }

    fn keep_group(&self, id: &str) -> bool {
        if !self.groups.is_empty() {
            return self.groups.iter().any(|g| g == id);
        }
        !self.exclude_groups.iter().any(|g| g == id)
    }

    fn apply(
        &self,
        packages: Vec<RawPackage>,
        groups: Vec<RawGroup>,
    ) -> (Vec<RawPackage>, Vec<RawGroup>) {
        let packages = packages
            .into_iter()
            .filter(|p| self.keep_arch(&p.arch))
            .collect();
        let groups = groups
            .into_iter()
            .filter(|g| self.keep_group(&g.id))
            .collect();
        (packages, groups)
    }
}

/// Generate action - builds the site model for one repository.
pub struct GenerateAction<'a, Q: RepoQuery> {
    query: &'a Q,
}

impl<'a, Q: RepoQuery> GenerateAction<'a, Q> {
    pub fn new(query: &'a Q) -> Self {
        Self { query }
    }

    /// Run the pipeline: fetch, filter, normalize, index, assemble.
    ///
    /// Warnings are returned with the model; the caller decides how to
    /// report them. An empty repository is a valid result, not an error.
    #[tracing::instrument(skip(self, config), fields(repo_id = %config.repo_id))]
    pub fn run(&self, config: &Config) -> Result<(SiteModel, Vec<Warning>), QueryError> {
        let snapshot = self.query.fetch(&config.repo_id)?;
        debug!(
            "fetched {} raw package records and {} groups",
            snapshot.packages.len(),
            snapshot.groups.len()
        );

        let (raw_packages, raw_groups) = config.filters.apply(snapshot.packages, snapshot.groups);

        let mut warnings = Vec::new();
        let mut packages = normalize(raw_packages, &mut warnings);
        if packages.is_empty() {
            info!("repository '{}' contains no packages", config.repo_id);
            warnings.push(Warning::EmptyRepository {
                repo_id: config.repo_id.clone(),
            });
        }

        let groups = build_group_index(raw_groups, &mut packages, &mut warnings);
        let letters = build_letter_index(&packages);
        let site = assemble(
            &config.repo_id,
            &config.title,
            &packages,
            &letters,
            &groups,
            config.recents,
        );

        Ok((site, warnings))
    }
}
