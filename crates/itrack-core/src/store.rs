//! In-memory issue store
//!
//! One insertion-ordered collection for every project. Lookups are linear
//! scans; order is what list output reflects.

use crate::{generate_id, Error, Issue, IssueFilter, IssueUpdate, NewIssue, Result};
use chrono::Utc;

/// In-memory issue store
#[derive(Debug, Default)]
pub struct IssueStore {
    issues: Vec<Issue>,
}

/// Present and non-empty
fn required(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Present and non-empty id, or `MissingId`
fn require_id(id: Option<&str>) -> Result<&str> {
    id.filter(|id| !id.is_empty()).ok_or(Error::MissingId)
}

impl IssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored issues across all projects
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Get an issue by ID
    pub fn get(&self, id: &str) -> Option<&Issue> {
        self.issues.iter().find(|i| i.id == id)
    }

    /// All issues in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter()
    }

    /// Create a new issue in `project`
    ///
    /// Title, text and creator must be present and non-empty.
    pub fn create(&mut self, project: &str, fields: NewIssue) -> Result<Issue> {
        let (Some(title), Some(text), Some(created_by)) = (
            required(fields.title),
            required(fields.text),
            required(fields.created_by),
        ) else {
            return Err(Error::RequiredFieldsMissing);
        };
        if project.is_empty() {
            return Err(Error::RequiredFieldsMissing);
        }

        let mut id = generate_id();
        while self.get(&id).is_some() {
            id = generate_id();
        }

        let mut issue = Issue::new(
            id,
            project.to_string(),
            title,
            text,
            created_by,
            Utc::now(),
        );
        issue.assigned_to = fields.assigned_to.unwrap_or_default();
        issue.status_text = fields.status_text.unwrap_or_default();

        self.issues.push(issue.clone());
        Ok(issue)
    }

    /// Issues matching `filter`, in creation order
    pub fn query(&self, filter: &IssueFilter) -> Vec<&Issue> {
        self.issues.iter().filter(|i| filter.matches(i)).collect()
    }

    /// Apply a partial update, returning the updated ID
    pub fn update(&mut self, id: Option<&str>, update: IssueUpdate) -> Result<String> {
        let id = require_id(id)?;
        if update.is_empty() {
            return Err(Error::NoUpdateFields { id: id.to_string() });
        }

        let issue = self
            .issues
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| Error::CouldNotUpdate { id: id.to_string() })?;
        update.apply(issue, Utc::now());
        Ok(id.to_string())
    }

    /// Remove an issue for good, returning the deleted ID
    pub fn delete(&mut self, id: Option<&str>) -> Result<String> {
        let id = require_id(id)?;
        let index = self
            .issues
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| Error::CouldNotDelete { id: id.to_string() })?;
        self.issues.remove(index);
        Ok(id.to_string())
    }
}
