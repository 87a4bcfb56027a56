//! Query-string filters for listing issues
//!
//! Each filter pair is compared against the issue field of the same wire name:
//!
//! - text fields (`_id`, `issue_title`, `issue_text`, `created_by`,
//!   `assigned_to`, `status_text`): exact string equality
//! - `open`: only `"true"` means true, any other value means false
//! - `created_on` / `updated_on`: parsed as RFC 3339 and compared as instants;
//!   a value that does not parse matches nothing
//! - unknown names match nothing
//!
//! `project` is never taken from the filters, only from the path.

use crate::issue::{parse_flag, Issue, IssueField};
use chrono::{DateTime, Utc};

/// A single constraint on one field
#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Text(IssueField, String),
    Open(bool),
    Timestamp(IssueField, Option<DateTime<Utc>>),
    /// Names a field issues do not have
    Unknown,
}

impl Condition {
    fn parse(name: &str, value: &str) -> Option<Self> {
        let Ok(field) = name.parse::<IssueField>() else {
            return Some(Condition::Unknown);
        };
        let condition = match field {
            IssueField::Project => return None,
            IssueField::Open => Condition::Open(parse_flag(value)),
            IssueField::CreatedOn | IssueField::UpdatedOn => Condition::Timestamp(
                field,
                DateTime::parse_from_rfc3339(value)
                    .ok()
                    .map(|t| t.with_timezone(&Utc)),
            ),
            _ => Condition::Text(field, value.to_string()),
        };
        Some(condition)
    }

    fn matches(&self, issue: &Issue) -> bool {
        match self {
            Condition::Text(field, expected) => issue.text_field(*field) == Some(expected.as_str()),
            Condition::Open(expected) => issue.open == *expected,
            Condition::Timestamp(field, expected) => match expected {
                Some(at) => issue.timestamp_field(*field) == Some(*at),
                None => false,
            },
            Condition::Unknown => false,
        }
    }
}

/// Filter for one project's issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFilter {
    project: String,
    conditions: Vec<Condition>,
}

impl IssueFilter {
    /// All issues of a project, unfiltered
    pub fn project(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            conditions: Vec::new(),
        }
    }

    /// Build from raw query pairs; every pair must match
    ///
    /// A repeated key yields one condition per occurrence, so
    /// `?open=true&open=false` matches nothing rather than collapsing both
    /// values into a single coerced flag.
    pub fn from_pairs<I, K, V>(project: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let conditions = pairs
            .into_iter()
            .filter_map(|(k, v)| Condition::parse(k.as_ref(), v.as_ref()))
            .collect();
        Self {
            project: project.into(),
            conditions,
        }
    }

    /// Add one constraint
    pub fn with(mut self, name: &str, value: &str) -> Self {
        if let Some(condition) = Condition::parse(name, value) {
            self.conditions.push(condition);
        }
        self
    }

    pub fn project_name(&self) -> &str {
        &self.project
    }

    /// Number of constraints besides the project
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        issue.project == self.project && self.conditions.iter().all(|c| c.matches(issue))
    }
}
