//! Frontend Models
//!
//! Data structures matching backend entities.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::api::ResourceKind;

/// Contract for rows rendered by the admin tables
pub trait Resource: DeserializeOwned + Serialize + Clone + PartialEq + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn id(&self) -> i64;

    /// Current value of the status column, for resources that have one
    fn status(&self) -> Option<bool> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "courseID")]
    pub course_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Resource for Course {
    const KIND: ResourceKind = ResourceKind::Course;
    fn id(&self) -> i64 {
        self.course_id
    }
    fn status(&self) -> Option<bool> {
        Some(self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(rename = "lessonID")]
    pub lesson_id: i64,
    #[serde(rename = "courseID")]
    pub course_id: i64,
    pub title: String,
    /// Markdown body
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub position: i32,
}

impl Resource for Lesson {
    const KIND: ResourceKind = ResourceKind::Lesson;
    fn id(&self) -> i64 {
        self.lesson_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(rename = "problemID")]
    pub problem_id: i64,
    pub problem_name: String,
    #[serde(default)]
    pub problem_code: Option<String>,
    /// Markdown statement (may embed `$…$` math)
    #[serde(default)]
    pub problem_content: Option<String>,
    #[serde(default)]
    pub time_limit: Option<f64>,
    #[serde(default)]
    pub memory_limit: Option<i64>,
    #[serde(default)]
    pub status: bool,
}

impl Resource for Problem {
    const KIND: ResourceKind = ResourceKind::Problem;
    fn id(&self) -> i64 {
        self.problem_id
    }
    fn status(&self) -> Option<bool> {
        Some(self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(rename = "testCaseID")]
    pub test_case_id: i64,
    #[serde(rename = "problemID")]
    pub problem_id: i64,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub sample_test: bool,
}

impl Resource for TestCase {
    const KIND: ResourceKind = ResourceKind::TestCase;
    fn id(&self) -> i64 {
        self.test_case_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coder {
    #[serde(rename = "coderID")]
    pub coder_id: i64,
    pub coder_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

impl Resource for Coder {
    const KIND: ResourceKind = ResourceKind::Coder;
    fn id(&self) -> i64 {
        self.coder_id
    }
    fn status(&self) -> Option<bool> {
        Some(self.is_active)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "categoryID")]
    pub category_id: i64,
    pub cat_name: String,
    #[serde(default)]
    pub cat_order: i32,
}

impl Resource for Category {
    const KIND: ResourceKind = ResourceKind::Category;
    fn id(&self) -> i64 {
        self.category_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    #[serde(rename = "badgeID")]
    pub badge_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub status: bool,
}

impl Resource for Badge {
    const KIND: ResourceKind = ResourceKind::Badge;
    fn id(&self) -> i64 {
        self.badge_id
    }
    fn status(&self) -> Option<bool> {
        Some(self.status)
    }
}

/// Signed-in user as returned by the current-user endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoderProfile {
    #[serde(rename = "coderID")]
    pub coder_id: i64,
    pub coder_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl CoderProfile {
    pub fn is_admin(&self) -> bool {
        self.role
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("admin"))
    }
}

/// Token returned by the login endpoints
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub coder: Option<CoderProfile>,
}
