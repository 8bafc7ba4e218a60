//! The project-data recording flow: fetch the closed issue's project
//! custom fields, flatten them into a task record, and submit it to the
//! external tracking table.
//!
//! Gate sequence: fetch -> status gate -> completeness gate -> submit.
//! A status mismatch skips submission and exits cleanly; missing data
//! or a failed call aborts the run with the reason in the error file.

use serde::Deserialize;
use serde_json::json;

use crate::airtable::AirtableClient;
use crate::cli::RecordArgs;
use crate::client::GithubClient;
use crate::config::Config;
use crate::error::{BountyError, Result};
use crate::extract;
use crate::report::CheckReport;
use crate::types::{FieldValue, ProjectFields};

const ISSUE_PROJECT_QUERY: &str = r#"
query IssueProjectFields($owner: String!, $repo: String!, $number: Int!) {
    repository(owner: $owner, name: $repo) {
        issue(number: $number) {
            title
            url
            assignees(first: 10) {
                nodes {
                    login
                }
            }
            projectItems(first: 1) {
                nodes {
                    project {
                        title
                    }
                    fieldValues(first: 10) {
                        nodes {
                            __typename
                            ... on ProjectV2ItemFieldSingleSelectValue {
                                name
                                field { ... on ProjectV2FieldCommon { name } }
                            }
                            ... on ProjectV2ItemFieldTextValue {
                                text
                                field { ... on ProjectV2FieldCommon { name } }
                            }
                            ... on ProjectV2ItemFieldNumberValue {
                                number
                                field { ... on ProjectV2FieldCommon { name } }
                            }
                            ... on ProjectV2ItemFieldDateValue {
                                date
                                field { ... on ProjectV2FieldCommon { name } }
                            }
                            ... on ProjectV2ItemFieldIterationValue {
                                title
                                field { ... on ProjectV2FieldCommon { name } }
                            }
                            ... on ProjectV2ItemFieldMilestoneValue {
                                milestone { title }
                                field { ... on ProjectV2FieldCommon { name } }
                            }
                            ... on ProjectV2ItemFieldRepositoryValue {
                                repository { nameWithOwner }
                                field { ... on ProjectV2FieldCommon { name } }
                            }
                            ... on ProjectV2ItemFieldUserValue {
                                users(first: 10) { nodes { login } }
                                field { ... on ProjectV2FieldCommon { name } }
                            }
                            ... on ProjectV2ItemFieldLabelValue {
                                labels(first: 10) { nodes { name } }
                                field { ... on ProjectV2FieldCommon { name } }
                            }
                        }
                    }
                }
            }
        }
    }
}
"#;

#[derive(Deserialize)]
struct RepositoryResponse {
    repository: Option<RepositoryNode>,
}

#[derive(Deserialize)]
struct RepositoryNode {
    issue: Option<IssueNode>,
}

#[derive(Deserialize)]
struct IssueNode {
    title: String,
    url: String,
    assignees: Connection<AssigneeNode>,
    #[serde(rename = "projectItems")]
    project_items: Connection<ProjectItemNode>,
}

#[derive(Deserialize)]
struct Connection<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
struct AssigneeNode {
    login: String,
}

#[derive(Deserialize)]
struct ProjectItemNode {
    project: ProjectNode,
    #[serde(rename = "fieldValues")]
    field_values: Connection<FieldValue>,
}

#[derive(Deserialize)]
struct ProjectNode {
    title: String,
}

/// The flat record submitted to the tracking table, one per issue.
#[derive(Debug, PartialEq)]
pub struct TaskRecord {
    pub title: String,
    pub assignee: String,
    pub hours: f64,
    pub bonus: f64,
    pub project: String,
    pub client: String,
    pub status: String,
    pub url: String,
}

impl TaskRecord {
    /// Reshape the fetched issue into the flat record. Every missing
    /// piece is collected so one run names all of them.
    fn build(issue: &IssueNode, item: &ProjectItemNode) -> Result<Self> {
        let fields = ProjectFields::flatten(&item.field_values.nodes);
        let mut missing = Vec::new();

        let assignee = match issue.assignees.nodes.first() {
            Some(a) => a.login.clone(),
            None => {
                missing.push("assignee".to_string());
                String::new()
            }
        };

        // Hours Taken may be recorded as H:MM or as a bare number
        let hours = match fields.get("Hours Taken").and_then(extract::parse_hours) {
            Some(h) => h,
            None => {
                missing.push("hours".to_string());
                0.0
            }
        };

        let bonus = match fields.get("Bonus").and_then(extract::parse_hours) {
            Some(b) => b,
            None => {
                missing.push("bonus".to_string());
                0.0
            }
        };

        let client = required_field(&fields, "Client", "client", &mut missing);
        let status = required_field(&fields, "Status", "status", &mut missing);

        if !missing.is_empty() {
            return Err(BountyError::MissingFields { names: missing });
        }

        Ok(Self {
            title: issue.title.clone(),
            assignee,
            hours,
            bonus,
            project: item.project.title.clone(),
            client,
            status,
            url: issue.url.clone(),
        })
    }

    /// Fixed field-name mapping for the tracking table.
    fn to_airtable_fields(&self) -> serde_json::Value {
        json!({
            "Task": self.title,
            "Assignee": self.assignee,
            "Hours": self.hours,
            "Bonus": self.bonus,
            "Project": self.project,
            "Client": self.client,
            "Status": self.status,
            "Issue URL": self.url,
            "Date Completed": chrono::Utc::now().format("%Y-%m-%d").to_string(),
        })
    }
}

fn required_field(
    fields: &ProjectFields,
    field_name: &str,
    record_name: &str,
    missing: &mut Vec<String>,
) -> String {
    match fields.get(field_name) {
        Some(value) => value.to_string(),
        None => {
            missing.push(record_name.to_string());
            String::new()
        }
    }
}

/// When the item's status doesn't match the expected one, returns the
/// skip message to report; `None` means the gate passed and submission
/// proceeds. An absent Status field compares as empty and never matches.
fn status_gate(fields: &ProjectFields, expected: &str) -> Option<String> {
    let status = fields.get("Status").unwrap_or_default();

    if status.eq_ignore_ascii_case(expected) {
        None
    } else {
        Some(format!(
            "Status is '{status}', expected '{expected}'; skipping submission."
        ))
    }
}

pub async fn run(args: &RecordArgs) -> Result<()> {
    let mut report = CheckReport::new();

    // Everything, config loading included, runs inside the wrapper so
    // any failure lands in the error file before the non-zero exit.
    let outcome = execute(args, &mut report).await;
    finalize(outcome, report, &args.success_file, &args.error_file)
}

/// Convert any error from the flow into a failure-file entry, flush the
/// report, and pass the outcome through for the exit code.
fn finalize(
    outcome: Result<()>,
    mut report: CheckReport,
    success_file: &std::path::Path,
    error_file: &std::path::Path,
) -> Result<()> {
    if let Err(e) = &outcome {
        report.fail(e.to_string());
    }

    report.print();
    report.write_files(success_file, error_file)?;

    outcome
}

async fn execute(args: &RecordArgs, report: &mut CheckReport) -> Result<()> {
    let config = Config::load()?;
    let client = GithubClient::new(config.api_token()?);

    let repo = require_env("REPOSITORY")?;
    let number: u64 = {
        let raw = require_env("ISSUE_NUMBER")?;
        raw.parse().map_err(|_| BountyError::InvalidEnv {
            name: "ISSUE_NUMBER",
            value: raw,
        })?
    };
    let expected_status = match &args.expected_status {
        Some(s) => s.clone(),
        None => require_env("EXPECTED_STATUS")?,
    };

    let (owner, name) = repo
        .split_once('/')
        .ok_or(BountyError::InvalidEnv {
            name: "REPOSITORY",
            value: repo.clone(),
        })?;

    let variables = json!({ "owner": owner, "repo": name, "number": number });
    let response: RepositoryResponse = client
        .graphql(ISSUE_PROJECT_QUERY, Some(variables))
        .await?;

    let issue = response
        .repository
        .and_then(|r| r.issue)
        .ok_or_else(|| BountyError::IssueNotFound(format!("{repo}#{number}")))?;

    let item = issue
        .project_items
        .nodes
        .first()
        .ok_or(BountyError::NoProjectItem)?;

    // A status mismatch is not a failure, the issue just isn't ready
    // for the table yet.
    let fields = ProjectFields::flatten(&item.field_values.nodes);
    if let Some(skip_message) = status_gate(&fields, &expected_status) {
        report.pass(skip_message);
        return Ok(());
    }

    let record = TaskRecord::build(&issue, item)?;

    let airtable = AirtableClient::new(
        config.airtable_key()?,
        config.airtable_base()?,
        config.airtable_table()?,
    );
    airtable.create_record(record.to_airtable_fields()).await?;

    report.pass(format!(
        "Recorded '{}' ({:.2} hours, {}) for {}",
        record.title, record.hours, record.status, record.assignee
    ));
    Ok(())
}

fn require_env(name: &'static str) -> Result<String> {
    std::env::var(name).map_err(|_| BountyError::MissingEnv(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue_json(field_values: serde_json::Value) -> serde_json::Value {
        json!({
            "title": "[Bug][$100] Fix thing",
            "url": "https://github.com/acme/widgets/issues/17",
            "assignees": { "nodes": [{ "login": "alice" }] },
            "projectItems": {
                "nodes": [{
                    "project": { "title": "Q3 Bounties" },
                    "fieldValues": { "nodes": field_values }
                }]
            }
        })
    }

    fn full_field_values() -> serde_json::Value {
        json!([
            {
                "__typename": "ProjectV2ItemFieldSingleSelectValue",
                "name": "Done",
                "field": { "name": "Status" }
            },
            {
                "__typename": "ProjectV2ItemFieldTextValue",
                "text": "2:30",
                "field": { "name": "Hours Taken" }
            },
            {
                "__typename": "ProjectV2ItemFieldNumberValue",
                "number": 150.0,
                "field": { "name": "Bonus" }
            },
            {
                "__typename": "ProjectV2ItemFieldSingleSelectValue",
                "name": "Acme Corp",
                "field": { "name": "Client" }
            }
        ])
    }

    #[test]
    fn test_build_record_from_full_response() {
        let issue: IssueNode = serde_json::from_value(issue_json(full_field_values())).unwrap();
        let item = issue.project_items.nodes.first().unwrap();

        let record = TaskRecord::build(&issue, item).unwrap();
        assert_eq!(record.title, "[Bug][$100] Fix thing");
        assert_eq!(record.assignee, "alice");
        assert_eq!(record.hours, 2.5);
        assert_eq!(record.bonus, 150.0);
        assert_eq!(record.project, "Q3 Bounties");
        assert_eq!(record.client, "Acme Corp");
        assert_eq!(record.status, "Done");
    }

    #[test]
    fn test_build_record_bare_number_hours() {
        let mut values = full_field_values();
        values[1] = json!({
            "__typename": "ProjectV2ItemFieldNumberValue",
            "number": 3.25,
            "field": { "name": "Hours Taken" }
        });
        let issue: IssueNode = serde_json::from_value(issue_json(values)).unwrap();
        let item = issue.project_items.nodes.first().unwrap();

        let record = TaskRecord::build(&issue, item).unwrap();
        assert_eq!(record.hours, 3.25);
    }

    #[test]
    fn test_build_record_names_all_missing_fields() {
        let issue: IssueNode = serde_json::from_value(issue_json(json!([]))).unwrap();
        let mut issue = issue;
        issue.assignees.nodes.clear();
        let item = issue.project_items.nodes.first().unwrap();

        match TaskRecord::build(&issue, item) {
            Err(BountyError::MissingFields { names }) => {
                assert_eq!(names, vec!["assignee", "hours", "bonus", "client", "status"]);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn test_build_record_unparseable_hours_is_missing() {
        let mut values = full_field_values();
        values[1] = json!({
            "__typename": "ProjectV2ItemFieldTextValue",
            "text": "a while",
            "field": { "name": "Hours Taken" }
        });
        let issue: IssueNode = serde_json::from_value(issue_json(values)).unwrap();
        let item = issue.project_items.nodes.first().unwrap();

        match TaskRecord::build(&issue, item) {
            Err(BountyError::MissingFields { names }) => {
                assert_eq!(names, vec!["hours"]);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    fn fields_with_status(status: &str) -> ProjectFields {
        let value: FieldValue = serde_json::from_value(json!({
            "__typename": "ProjectV2ItemFieldSingleSelectValue",
            "name": status,
            "field": { "name": "Status" }
        }))
        .unwrap();
        ProjectFields::flatten(&[value])
    }

    #[test]
    fn test_status_gate_match_proceeds() {
        assert_eq!(status_gate(&fields_with_status("Done"), "Done"), None);
        // Comparison ignores case
        assert_eq!(status_gate(&fields_with_status("done"), "Done"), None);
    }

    #[test]
    fn test_status_gate_mismatch_skips() {
        let message = status_gate(&fields_with_status("In Progress"), "Done").unwrap();
        assert_eq!(
            message,
            "Status is 'In Progress', expected 'Done'; skipping submission."
        );
    }

    #[test]
    fn test_status_gate_missing_status_never_matches() {
        let message = status_gate(&ProjectFields::default(), "Done").unwrap();
        assert_eq!(message, "Status is '', expected 'Done'; skipping submission.");
    }

    #[test]
    fn test_finalize_writes_failures_to_error_file() {
        // Errors raised before the fetch (missing token, bad config)
        // must still reach the pipeline's error file
        let dir = tempfile::tempdir().unwrap();
        let success = dir.path().join("success_messages.txt");
        let error = dir.path().join("error_messages.txt");

        let outcome = finalize(
            Err(BountyError::MissingToken),
            CheckReport::new(),
            &success,
            &error,
        );

        assert!(outcome.is_err());
        let contents = std::fs::read_to_string(&error).unwrap();
        assert!(contents.starts_with("Reopening issue due to failed verification:"));
        assert!(contents.contains("No API token found."));
    }

    #[test]
    fn test_finalize_passes_success_through() {
        let dir = tempfile::tempdir().unwrap();
        let success = dir.path().join("success_messages.txt");
        let error = dir.path().join("error_messages.txt");

        let mut report = CheckReport::new();
        report.pass("Recorded 'Fix thing' (2.50 hours, Done) for alice");
        let outcome = finalize(Ok(()), report, &success, &error);

        assert!(outcome.is_ok());
        assert!(!error.exists());
        assert!(std::fs::read_to_string(&success)
            .unwrap()
            .contains("Recorded 'Fix thing'"));
    }

    #[test]
    fn test_airtable_field_mapping() {
        let record = TaskRecord {
            title: "Fix thing".into(),
            assignee: "alice".into(),
            hours: 2.5,
            bonus: 150.0,
            project: "Q3 Bounties".into(),
            client: "Acme Corp".into(),
            status: "Done".into(),
            url: "https://example.com/17".into(),
        };

        let fields = record.to_airtable_fields();
        assert_eq!(fields["Task"], "Fix thing");
        assert_eq!(fields["Hours"], 2.5);
        assert_eq!(fields["Issue URL"], "https://example.com/17");
        assert!(fields["Date Completed"].is_string());
    }
}
