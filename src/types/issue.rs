use std::env;

use crate::error::{BountyError, Result};

/// The closed issue under verification, built fresh per run from the
/// environment the CI pipeline provides.
#[derive(Debug, Clone)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    /// `owner/repo` slug.
    pub repo: String,
}

impl Issue {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build an issue from any variable source. Labels and assignees are
    /// comma-separated; an absent or empty assignee list is valid input
    /// (the cardinality check reports it, not the loader).
    pub fn from_lookup(lookup: impl Fn(&'static str) -> Option<String>) -> Result<Self> {
        let number = required(&lookup, "ISSUE_NUMBER")?;
        let number = number.parse().map_err(|_| BountyError::InvalidEnv {
            name: "ISSUE_NUMBER",
            value: number,
        })?;

        Ok(Self {
            number,
            title: required(&lookup, "ISSUE_TITLE")?,
            body: required(&lookup, "ISSUE_BODY")?,
            labels: split_csv(lookup("ISSUE_LABELS").as_deref()),
            assignees: split_csv(lookup("ISSUE_ASSIGNEES").as_deref()),
            repo: required(&lookup, "REPOSITORY")?,
        })
    }

    /// Labels carrying the `charge-to-` prefix, identifying which budget
    /// the issue bills to.
    pub fn charge_labels(&self) -> Vec<&str> {
        self.labels
            .iter()
            .map(String::as_str)
            .filter(|label| label.starts_with("charge-to-"))
            .collect()
    }
}

fn required(
    lookup: &impl Fn(&'static str) -> Option<String>,
    name: &'static str,
) -> Result<String> {
    lookup(name).ok_or(BountyError::MissingEnv(name))
}

fn split_csv(value: Option<&str>) -> Vec<String> {
    match value {
        None | Some("") => Vec::new(),
        Some(csv) => csv.split(',').map(|s| s.trim().to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &'static str) -> Option<String> {
        match name {
            "ISSUE_NUMBER" => Some("17".into()),
            "ISSUE_TITLE" => Some("[Bug][$100] Fix thing".into()),
            "ISSUE_BODY" => Some("body".into()),
            "ISSUE_LABELS" => Some("bug, charge-to-acme".into()),
            "ISSUE_ASSIGNEES" => Some("alice".into()),
            "REPOSITORY" => Some("acme/widgets".into()),
            _ => None,
        }
    }

    #[test]
    fn test_from_lookup() {
        let issue = Issue::from_lookup(lookup).unwrap();
        assert_eq!(issue.number, 17);
        assert_eq!(issue.labels, vec!["bug", "charge-to-acme"]);
        assert_eq!(issue.assignees, vec!["alice"]);
        assert_eq!(issue.repo, "acme/widgets");
    }

    #[test]
    fn test_missing_title_is_an_error() {
        let result = Issue::from_lookup(|name| {
            if name == "ISSUE_TITLE" {
                None
            } else {
                lookup(name)
            }
        });
        assert!(matches!(result, Err(BountyError::MissingEnv("ISSUE_TITLE"))));
    }

    #[test]
    fn test_empty_assignees_is_valid() {
        let issue = Issue::from_lookup(|name| {
            if name == "ISSUE_ASSIGNEES" {
                Some(String::new())
            } else {
                lookup(name)
            }
        })
        .unwrap();
        assert!(issue.assignees.is_empty());
    }

    #[test]
    fn test_bad_issue_number() {
        let result = Issue::from_lookup(|name| {
            if name == "ISSUE_NUMBER" {
                Some("seventeen".into())
            } else {
                lookup(name)
            }
        });
        assert!(matches!(result, Err(BountyError::InvalidEnv { .. })));
    }

    #[test]
    fn test_charge_labels() {
        let issue = Issue::from_lookup(lookup).unwrap();
        assert_eq!(issue.charge_labels(), vec!["charge-to-acme"]);
    }
}
