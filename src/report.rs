//! Structured warnings collected while building a site model.
//!
//! The pipeline never aborts on malformed metadata; it drops the offending
//! record and records what happened here. The caller decides how to report
//! them — the core makes no logging or exit-code decisions.

use std::fmt;

/// A recoverable problem encountered during aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A raw package record was missing a required field and was dropped.
    MalformedPackage {
        /// Whatever identity the record still had, for operator diagnosis.
        context: String,
        missing: &'static str,
    },
    /// A group declared a member that is not in the current package set.
    UnresolvedGroupMember { group: String, member: String },
    /// A group had no resolvable members left and was dropped.
    EmptyGroup { group: String },
    /// The repository contained no packages at all.
    EmptyRepository { repo_id: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MalformedPackage { context, missing } => {
                write!(f, "dropped package record with no {missing} ({context})")
            }
            Warning::UnresolvedGroupMember { group, member } => {
                write!(
                    f,
                    "group '{group}' references '{member}' which is not in this repository"
                )
            }
            Warning::EmptyGroup { group } => {
                write!(f, "group '{group}' has no members in this repository")
            }
            Warning::EmptyRepository { repo_id } => {
                write!(f, "repository '{repo_id}' contains no packages")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let w = Warning::MalformedPackage {
            context: "arch=x86_64 version=1.0".into(),
            missing: "name",
        };
        assert_eq!(
            w.to_string(),
            "dropped package record with no name (arch=x86_64 version=1.0)"
        );

        let w = Warning::UnresolvedGroupMember {
            group: "development".into(),
            member: "gcc-offload".into(),
        };
        assert!(w.to_string().contains("development"));
        assert!(w.to_string().contains("gcc-offload"));
    }
}
