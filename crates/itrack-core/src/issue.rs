//! Issue data model for itrack
//!
//! Field names on the wire follow the classic issue-tracker API
//! (`_id`, `issue_title`, `created_on`, ...).

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

/// Core issue structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique opaque identifier, never changes
    #[serde(rename = "_id")]
    pub id: String,

    /// Issue title
    #[serde(rename = "issue_title")]
    pub title: String,

    /// Issue body text
    #[serde(rename = "issue_text")]
    pub text: String,

    /// When the issue was created
    pub created_on: DateTime<Utc>,

    /// When the issue was last updated
    pub updated_on: DateTime<Utc>,

    /// Who created the issue
    pub created_by: String,

    /// Assignee, empty when unassigned
    pub assigned_to: String,

    /// Whether the issue is still open
    pub open: bool,

    /// Free-form status line, empty by default
    pub status_text: String,

    /// Project the issue belongs to, never changes
    pub project: String,
}

impl Issue {
    /// Build a fresh open issue; `created_on` and `updated_on` share `now`
    pub fn new(
        id: String,
        project: String,
        title: String,
        text: String,
        created_by: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            text,
            created_on: now,
            updated_on: now,
            created_by,
            assigned_to: String::new(),
            open: true,
            status_text: String::new(),
            project,
        }
    }

    /// String value of a text field, `None` for `open` and the timestamps
    pub fn text_field(&self, field: IssueField) -> Option<&str> {
        match field {
            IssueField::Id => Some(&self.id),
            IssueField::Title => Some(&self.title),
            IssueField::Text => Some(&self.text),
            IssueField::CreatedBy => Some(&self.created_by),
            IssueField::AssignedTo => Some(&self.assigned_to),
            IssueField::StatusText => Some(&self.status_text),
            IssueField::Project => Some(&self.project),
            IssueField::Open | IssueField::CreatedOn | IssueField::UpdatedOn => None,
        }
    }

    /// Timestamp value of `created_on` / `updated_on`
    pub fn timestamp_field(&self, field: IssueField) -> Option<DateTime<Utc>> {
        match field {
            IssueField::CreatedOn => Some(self.created_on),
            IssueField::UpdatedOn => Some(self.updated_on),
            _ => None,
        }
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = if self.open { "open" } else { "closed" };
        write!(f, "{} [{}] [{}] {}", self.id, self.project, state, self.title)
    }
}

/// A stored field, addressed by its wire name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueField {
    Id,
    Title,
    Text,
    CreatedBy,
    AssignedTo,
    StatusText,
    Open,
    CreatedOn,
    UpdatedOn,
    Project,
}

impl IssueField {
    pub fn wire_name(&self) -> &'static str {
        match self {
            IssueField::Id => "_id",
            IssueField::Title => "issue_title",
            IssueField::Text => "issue_text",
            IssueField::CreatedBy => "created_by",
            IssueField::AssignedTo => "assigned_to",
            IssueField::StatusText => "status_text",
            IssueField::Open => "open",
            IssueField::CreatedOn => "created_on",
            IssueField::UpdatedOn => "updated_on",
            IssueField::Project => "project",
        }
    }
}

impl std::str::FromStr for IssueField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "_id" => Ok(IssueField::Id),
            "issue_title" => Ok(IssueField::Title),
            "issue_text" => Ok(IssueField::Text),
            "created_by" => Ok(IssueField::CreatedBy),
            "assigned_to" => Ok(IssueField::AssignedTo),
            "status_text" => Ok(IssueField::StatusText),
            "open" => Ok(IssueField::Open),
            "created_on" => Ok(IssueField::CreatedOn),
            "updated_on" => Ok(IssueField::UpdatedOn),
            "project" => Ok(IssueField::Project),
            _ => Err(()),
        }
    }
}

/// Coerce a textual flag: only the literal `"true"` is true
pub fn parse_flag(value: &str) -> bool {
    value == "true"
}

/// Fields submitted when creating an issue
///
/// Everything is optional here; the store decides what is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewIssue {
    #[serde(default, rename = "issue_title", deserialize_with = "deserialize_text")]
    pub title: Option<String>,
    #[serde(default, rename = "issue_text", deserialize_with = "deserialize_text")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub assigned_to: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub status_text: Option<String>,
}

/// Partial update of an issue
///
/// `Some("")` and `Some(false)` are real updates; only `None` means absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IssueUpdate {
    #[serde(default, rename = "issue_title", deserialize_with = "deserialize_text")]
    pub title: Option<String>,
    #[serde(default, rename = "issue_text", deserialize_with = "deserialize_text")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub assigned_to: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    pub status_text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub open: Option<bool>,
}

impl IssueUpdate {
    /// True when no updatable field was sent
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.text.is_none()
            && self.created_by.is_none()
            && self.assigned_to.is_none()
            && self.status_text.is_none()
            && self.open.is_none()
    }

    /// Overwrite the present fields and refresh `updated_on`
    pub fn apply(self, issue: &mut Issue, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            issue.title = title;
        }
        if let Some(text) = self.text {
            issue.text = text;
        }
        if let Some(created_by) = self.created_by {
            issue.created_by = created_by;
        }
        if let Some(assigned_to) = self.assigned_to {
            issue.assigned_to = assigned_to;
        }
        if let Some(status_text) = self.status_text {
            issue.status_text = status_text;
        }
        if let Some(open) = self.open {
            issue.open = open;
        }
        issue.updated_on = now.max(issue.created_on);
    }
}

/// Whatever a client sent for one field
///
/// Decoding never fails on a wrongly typed value, so one bad field cannot
/// discard the rest of the body.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Other(IgnoredAny),
}

/// Decode a text field; scalars become their string form, arrays and
/// objects count as absent
pub fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Loose::Text(s) => Some(s),
        Loose::Bool(b) => Some(b.to_string()),
        Loose::Int(n) => Some(n.to_string()),
        Loose::Float(n) => Some(n.to_string()),
        Loose::Other(_) => None,
    }))
}

/// Decode `open`: a bool, a form string (see [`parse_flag`]) or a number
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Loose::Text(s) => Some(parse_flag(&s)),
        Loose::Bool(b) => Some(b),
        Loose::Int(n) => Some(n != 0),
        Loose::Float(n) => Some(n != 0.0),
        Loose::Other(_) => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> Issue {
        Issue::new(
            "abc123".into(),
            "apitest".into(),
            "Title".into(),
            "text".into(),
            "alice".into(),
            Utc::now(),
        )
    }

    #[test]
    fn test_new_issue_defaults() {
        let issue = sample();
        assert!(issue.open);
        assert_eq!(issue.assigned_to, "");
        assert_eq!(issue.status_text, "");
        assert_eq!(issue.created_on, issue.updated_on);
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        let obj = value.as_object().unwrap();
        for key in [
            "_id",
            "issue_title",
            "issue_text",
            "created_on",
            "updated_on",
            "created_by",
            "assigned_to",
            "open",
            "status_text",
            "project",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj.len(), 10);
        assert!(obj["created_on"].is_string());
        assert_eq!(obj["open"], serde_json::json!(true));
    }

    #[test]
    fn test_field_names_parse_back() {
        for field in [
            IssueField::Id,
            IssueField::Title,
            IssueField::Open,
            IssueField::UpdatedOn,
            IssueField::Project,
        ] {
            assert_eq!(field.wire_name().parse::<IssueField>(), Ok(field));
        }
        assert!("title".parse::<IssueField>().is_err());
    }

    #[test]
    fn test_update_distinguishes_absent_from_falsy() {
        let update: IssueUpdate = serde_json::from_str(r#"{"open": false}"#).unwrap();
        assert!(!update.is_empty());
        assert_eq!(update.open, Some(false));

        let update: IssueUpdate = serde_json::from_str(r#"{"assigned_to": ""}"#).unwrap();
        assert_eq!(update.assigned_to, Some(String::new()));

        let update: IssueUpdate = serde_json::from_str(r#"{"issue_title": null}"#).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn test_update_open_from_string() {
        let update: IssueUpdate = serde_json::from_str(r#"{"open": "true"}"#).unwrap();
        assert_eq!(update.open, Some(true));
        let update: IssueUpdate = serde_json::from_str(r#"{"open": "closed"}"#).unwrap();
        assert_eq!(update.open, Some(false));
    }

    #[test]
    fn test_wrongly_typed_values_stay_local() {
        let update: IssueUpdate =
            serde_json::from_str(r#"{"issue_title": 5, "open": 0, "assigned_to": "bob"}"#)
                .unwrap();
        assert_eq!(update.title.as_deref(), Some("5"));
        assert_eq!(update.open, Some(false));
        assert_eq!(update.assigned_to.as_deref(), Some("bob"));

        let update: IssueUpdate =
            serde_json::from_str(r#"{"issue_text": ["a"], "status_text": {"x": 1}}"#).unwrap();
        assert!(update.is_empty());

        let fields: NewIssue =
            serde_json::from_str(r#"{"issue_title": true, "created_by": 1.5}"#).unwrap();
        assert_eq!(fields.title.as_deref(), Some("true"));
        assert_eq!(fields.created_by.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "abc123 [apitest] [open] Title");
    }

    #[test]
    fn test_apply_only_touches_present_fields() {
        let mut issue = sample();
        let before = issue.clone();
        let later = issue.created_on + Duration::seconds(5);

        IssueUpdate {
            created_by: Some("bob".into()),
            ..Default::default()
        }
        .apply(&mut issue, later);

        assert_eq!(issue.created_by, "bob");
        assert_eq!(issue.title, before.title);
        assert_eq!(issue.text, before.text);
        assert_eq!(issue.open, before.open);
        assert_eq!(issue.created_on, before.created_on);
        assert_eq!(issue.updated_on, later);
    }

    #[test]
    fn test_apply_never_moves_updated_before_created() {
        let mut issue = sample();
        let earlier = issue.created_on - Duration::seconds(5);
        IssueUpdate {
            open: Some(false),
            ..Default::default()
        }
        .apply(&mut issue, earlier);
        assert!(issue.updated_on >= issue.created_on);
        assert!(!issue.open);
    }
}
