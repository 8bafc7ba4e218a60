//! Decoding for the tagged union of project custom-field values returned
//! by the GraphQL API. Each value shape carries its own payload; all of
//! them flatten to a field-name -> string pair.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct FieldCommon {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct NamedNode {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TitledNode {
    pub title: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RepositoryNode {
    #[serde(rename = "nameWithOwner")]
    pub name_with_owner: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserNode {
    pub login: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
}

/// One project custom-field value, discriminated by GraphQL typename.
/// Shapes this crate doesn't recognize deserialize as `Other` and are
/// skipped during flattening.
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "__typename")]
pub enum FieldValue {
    #[serde(rename = "ProjectV2ItemFieldSingleSelectValue")]
    SingleSelect {
        name: Option<String>,
        field: FieldCommon,
    },
    #[serde(rename = "ProjectV2ItemFieldTextValue")]
    Text {
        text: Option<String>,
        field: FieldCommon,
    },
    #[serde(rename = "ProjectV2ItemFieldNumberValue")]
    Number {
        number: Option<f64>,
        field: FieldCommon,
    },
    #[serde(rename = "ProjectV2ItemFieldDateValue")]
    Date {
        date: Option<String>,
        field: FieldCommon,
    },
    #[serde(rename = "ProjectV2ItemFieldIterationValue")]
    Iteration { title: String, field: FieldCommon },
    #[serde(rename = "ProjectV2ItemFieldMilestoneValue")]
    Milestone {
        milestone: Option<TitledNode>,
        field: FieldCommon,
    },
    #[serde(rename = "ProjectV2ItemFieldRepositoryValue")]
    Repository {
        repository: Option<RepositoryNode>,
        field: FieldCommon,
    },
    #[serde(rename = "ProjectV2ItemFieldUserValue")]
    User {
        users: Nodes<UserNode>,
        field: FieldCommon,
    },
    #[serde(rename = "ProjectV2ItemFieldLabelValue")]
    Label {
        labels: Nodes<NamedNode>,
        field: FieldCommon,
    },
    #[serde(other)]
    Other,
}

impl FieldValue {
    /// Flatten one value into its field name and a string rendering, or
    /// `None` when the shape is unrecognized or carries no value.
    pub fn decode(&self) -> Option<(String, String)> {
        match self {
            FieldValue::SingleSelect { name, field } => {
                name.clone().map(|v| (field.name.clone(), v))
            }
            FieldValue::Text { text, field } => text.clone().map(|v| (field.name.clone(), v)),
            FieldValue::Number { number, field } => {
                number.map(|v| (field.name.clone(), format_number(v)))
            }
            FieldValue::Date { date, field } => date.clone().map(|v| (field.name.clone(), v)),
            FieldValue::Iteration { title, field } => {
                Some((field.name.clone(), title.clone()))
            }
            FieldValue::Milestone { milestone, field } => milestone
                .as_ref()
                .map(|m| (field.name.clone(), m.title.clone())),
            FieldValue::Repository { repository, field } => repository
                .as_ref()
                .map(|r| (field.name.clone(), r.name_with_owner.clone())),
            FieldValue::User { users, field } => {
                let logins: Vec<&str> =
                    users.nodes.iter().map(|u| u.login.as_str()).collect();
                if logins.is_empty() {
                    None
                } else {
                    Some((field.name.clone(), logins.join(", ")))
                }
            }
            FieldValue::Label { labels, field } => {
                let names: Vec<&str> =
                    labels.nodes.iter().map(|l| l.name.as_str()).collect();
                if names.is_empty() {
                    None
                } else {
                    Some((field.name.clone(), names.join(", ")))
                }
            }
            FieldValue::Other => None,
        }
    }
}

/// Flat field-name -> value view over a project item's field values.
#[derive(Debug, Default)]
pub struct ProjectFields(HashMap<String, String>);

impl ProjectFields {
    pub fn flatten(values: &[FieldValue]) -> Self {
        Self(values.iter().filter_map(FieldValue::decode).collect())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
