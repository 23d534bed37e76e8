//! dnf-backed query implementation.
//!
//! Shells out to `dnf repoquery` and `dnf group ...` and parses their
//! output. Raw repodata files are never read here; dnf is the only source
//! of truth.

use std::process::{Command, Output};

use log::debug;

use super::{QueryError, RawGroup, RawPackage, RepoQuery, RepoSnapshot};

/// Field separator embedded in the repoquery format string. Control
/// characters cannot appear in rpm metadata, so splitting on them is safe
/// even for multi-line descriptions.
const FIELD_SEP: char = '\u{1f}';
/// Record terminator for the same reason.
const RECORD_SEP: char = '\u{1e}';

const QUERY_FORMAT: &str = "%{name}\u{1f}%{epoch}\u{1f}%{version}\u{1f}%{release}\u{1f}%{arch}\u{1f}%{buildtime}\u{1f}%{summary}\u{1f}%{description}\u{1e}";

/// Query adapter that drives the system `dnf`.
pub struct DnfQuery {
    binary: String,
    config: Option<String>,
}

impl DnfQuery {
    pub fn new() -> Self {
        Self::with_binary("dnf")
    }

    /// Use a specific dnf executable. Tests point this at a stub.
    pub fn with_binary(binary: &str) -> Self {
        DnfQuery {
            binary: binary.to_string(),
            config: None,
        }
    }

    /// Use an alternate dnf configuration file (`dnf --config`).
    pub fn config(mut self, path: Option<String>) -> Self {
        self.config = path;
        self
    }

    fn run(&self, repo_id: &str, args: &[&str]) -> Result<Output, QueryError> {
        let mut command = Command::new(&self.binary);
        command.arg("--quiet");
        if let Some(config) = &self.config {
            command.arg("--config").arg(config);
        }
        command
            .arg("--disablerepo=*")
            .arg(format!("--enablerepo={repo_id}"))
            .args(args);

        debug!("running {} {:?}", self.binary, args);
        let output = command.output().map_err(|e| {
            QueryError::backend_with_source(repo_id, format!("failed to run {}", self.binary), e)
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("Unknown repo") || stderr.contains("No matching repositories") {
                return Err(QueryError::RepositoryNotFound {
                    repo_id: repo_id.to_string(),
                });
            }
            return Err(QueryError::backend(
                repo_id,
                format!(
                    "{} exited with {}: {}",
                    self.binary,
                    output.status,
                    stderr.trim()
                ),
            ));
        }

        Ok(output)
    }

    fn fetch_packages(&self, repo_id: &str) -> Result<Vec<RawPackage>, QueryError> {
        let output = self.run(
            repo_id,
            &["repoquery", "--available", "--queryformat", QUERY_FORMAT],
        )?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_repoquery_output(&stdout))
    }

    fn fetch_groups(&self, repo_id: &str) -> Result<Vec<RawGroup>, QueryError> {
        let output = self.run(repo_id, &["group", "list", "--hidden", "-v"])?;
        let listed = parse_group_list(&String::from_utf8_lossy(&output.stdout));

        let mut groups = Vec::new();
        for (name, id) in listed {
            let output = self.run(repo_id, &["group", "info", &id])?;
            let (description, members) = parse_group_info(&String::from_utf8_lossy(&output.stdout));
            groups.push(RawGroup {
                id,
                name,
                description,
                members,
            });
        }
        Ok(groups)
    }
}

impl Default for DnfQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl RepoQuery for DnfQuery {
    #[tracing::instrument(skip(self))]
    fn fetch(&self, repo_id: &str) -> Result<RepoSnapshot, QueryError> {
        let packages = self.fetch_packages(repo_id)?;
        let groups = self.fetch_groups(repo_id)?;
        debug!(
            "fetched {} package records and {} groups from '{repo_id}'",
            packages.len(),
            groups.len()
        );
        Ok(RepoSnapshot { packages, groups })
    }
}

/// Parse separator-delimited repoquery output into raw records.
///
/// Records with a wrong field count still yield a record with the missing
/// fields empty; the normalizer decides whether that makes them unusable.
fn parse_repoquery_output(stdout: &str) -> Vec<RawPackage> {
    let mut packages = Vec::new();
    for record in stdout.split(RECORD_SEP) {
        let record = record.trim_start_matches(['\n', '\r']);
        if record.is_empty() {
            continue;
        }
        let mut fields = record.split(FIELD_SEP);
        let mut next = || fields.next().unwrap_or("").to_string();
        packages.push(RawPackage {
            name: next(),
            epoch: next(),
            version: next(),
            release: next(),
            arch: next(),
            buildtime: next(),
            summary: next(),
            description: next(),
        });
    }
    packages
}

/// Parse `dnf group list --hidden -v` output into (name, id) pairs.
///
/// Environment groups get their own sections and are not package groups, so
/// only the plain group sections are read.
fn parse_group_list(stdout: &str) -> Vec<(String, String)> {
    let mut groups = Vec::new();
    let mut in_group_section = false;

    for line in stdout.lines() {
        if line.ends_with(':') {
            let header = line.trim_end_matches(':');
            in_group_section =
                header.ends_with("Groups") && !header.contains("Environment");
            continue;
        }
        if !in_group_section {
            continue;
        }
        // "   Development Tools (development)"
        let line = line.trim();
        if let Some(open) = line.rfind('(') {
            if let Some(close) = line.rfind(')') {
                if open < close {
                    let name = line[..open].trim().to_string();
                    let id = line[open + 1..close].to_string();
                    if !id.is_empty() {
                        groups.push((name, id));
                    }
                }
            }
        }
    }
    groups
}

/// Parse `dnf group info <id>` output into a description and the union of
/// all member sections (mandatory, default, optional, conditional).
fn parse_group_info(stdout: &str) -> (String, Vec<String>) {
    let mut description = String::new();
    let mut members = Vec::new();
    let mut in_package_section = false;

    for line in stdout.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("Description:") {
            description = rest.trim().to_string();
            in_package_section = false;
            continue;
        }
        if trimmed.ends_with("Packages:") {
            in_package_section = true;
            continue;
        }
        if trimmed.ends_with(':') {
            in_package_section = false;
            continue;
        }
        if in_package_section && !trimmed.is_empty() {
            members.push(trimmed.to_string());
        }
    }
    (description, members)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repoquery_output() {
        let stdout = format!(
            "bash{s}0{s}5.2.26{s}1.el9{s}x86_64{s}1700000000{s}The GNU Bourne Again shell{s}Bash is a shell.\nSecond line.{r}\nzsh{s}{s}5.8{s}9.el9{s}x86_64{s}{s}Z shell{s}Desc{r}\n",
            s = FIELD_SEP,
            r = RECORD_SEP
        );
        let packages = parse_repoquery_output(&stdout);
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].name, "bash");
        assert_eq!(packages[0].version, "5.2.26");
        assert_eq!(packages[0].buildtime, "1700000000");
        assert!(packages[0].description.contains("Second line."));
        assert_eq!(packages[1].name, "zsh");
        assert_eq!(packages[1].epoch, "");
        assert_eq!(packages[1].buildtime, "");
    }

    #[test]
    fn test_parse_repoquery_short_record_pads_empty() {
        let stdout = format!("lonely{r}", r = RECORD_SEP);
        let packages = parse_repoquery_output(&stdout);
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].name, "lonely");
        assert_eq!(packages[0].version, "");
    }

    #[test]
    fn test_parse_repoquery_empty_output() {
        assert!(parse_repoquery_output("").is_empty());
        assert!(parse_repoquery_output("\n").is_empty());
    }

    #[test]
    fn test_parse_group_list() {
        let stdout = "\
Available Environment Groups:
   Minimal Install (minimal-environment)
Available Groups:
   Development Tools (development)
   Smart Card Support (smart-card)
Installed Groups:
   Core (core)
";
        let groups = parse_group_list(stdout);
        assert_eq!(
            groups,
            vec![
                ("Development Tools".to_string(), "development".to_string()),
                ("Smart Card Support".to_string(), "smart-card".to_string()),
                ("Core".to_string(), "core".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_group_list_ignores_garbage() {
        assert!(parse_group_list("no groups here\n").is_empty());
        assert!(parse_group_list("Available Groups:\n   broken line\n").is_empty());
    }

    #[test]
    fn test_parse_group_info() {
        let stdout = "\
Group: Development Tools
 Description: A basic development environment.
 Mandatory Packages:
   autoconf
   automake
 Default Packages:
   gcc
 Optional Packages:
   clang
 Conditional Packages:
";
        let (description, members) = parse_group_info(stdout);
        assert_eq!(description, "A basic development environment.");
        assert_eq!(members, vec!["autoconf", "automake", "gcc", "clang"]);
    }

    #[test]
    fn test_parse_group_info_without_description() {
        let (description, members) = parse_group_info("Group: X\n Mandatory Packages:\n   a\n");
        assert_eq!(description, "");
        assert_eq!(members, vec!["a"]);
    }
}
