use serde::{Deserialize, Serialize};

/// A storybook or educational book in the library. `grade` and `subject`
/// are free text as typed by teachers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub page_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFilterQuery {
    pub grade: Option<String>,
    pub subject: Option<String>,
    pub q: Option<String>,
}
