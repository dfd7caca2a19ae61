//! Backend Resources
//!
//! Each admin-managed entity maps to a backend controller. Identifier field
//! names are not uniform across controllers, so they are listed here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    Course,
    Lesson,
    Problem,
    TestCase,
    Coder,
    Category,
    Badge,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Course,
        ResourceKind::Lesson,
        ResourceKind::Problem,
        ResourceKind::TestCase,
        ResourceKind::Coder,
        ResourceKind::Category,
        ResourceKind::Badge,
    ];

    /// Backend controller name
    pub fn controller(self) -> &'static str {
        match self {
            ResourceKind::Course => "Course",
            ResourceKind::Lesson => "Lesson",
            ResourceKind::Problem => "Problem",
            ResourceKind::TestCase => "TestCase",
            ResourceKind::Coder => "Coder",
            ResourceKind::Category => "Category",
            ResourceKind::Badge => "Badge",
        }
    }

    /// JSON field holding the row identifier
    pub fn id_field(self) -> &'static str {
        match self {
            ResourceKind::Course => "courseID",
            ResourceKind::Lesson => "lessonID",
            ResourceKind::Problem => "problemID",
            ResourceKind::TestCase => "testCaseID",
            ResourceKind::Coder => "coderID",
            ResourceKind::Category => "categoryID",
            ResourceKind::Badge => "badgeID",
        }
    }

    /// JSON field toggled by the status column, if the resource has one
    pub fn status_field(self) -> Option<&'static str> {
        match self {
            ResourceKind::Course | ResourceKind::Problem | ResourceKind::Badge => Some("status"),
            ResourceKind::Coder => Some("isActive"),
            _ => None,
        }
    }

    pub fn default_sort(self) -> &'static str {
        self.id_field()
    }

    /// URL segment used by admin routes (`/admin/courses`)
    pub fn slug(self) -> &'static str {
        match self {
            ResourceKind::Course => "courses",
            ResourceKind::Lesson => "lessons",
            ResourceKind::Problem => "problems",
            ResourceKind::TestCase => "testcases",
            ResourceKind::Coder => "coders",
            ResourceKind::Category => "categories",
            ResourceKind::Badge => "badges",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    pub fn label(self) -> &'static str {
        match self {
            ResourceKind::Course => "Courses",
            ResourceKind::Lesson => "Lessons",
            ResourceKind::Problem => "Problems",
            ResourceKind::TestCase => "Test cases",
            ResourceKind::Coder => "Coders",
            ResourceKind::Category => "Categories",
            ResourceKind::Badge => "Badges",
        }
    }

    // ========================
    // Endpoints
    // ========================

    pub fn list_path(self) -> String {
        format!("/api/{}", self.controller())
    }

    pub fn item_path(self, id: i64) -> String {
        format!("/api/{}/{}", self.controller(), id)
    }

    pub fn delete_path(self, id: i64) -> String {
        self.item_path(id)
    }

    pub fn status_path(self, id: i64) -> Option<String> {
        self.status_field()
            .map(|_| format!("/api/{}/{}/status", self.controller(), id))
    }

    /// Read a row's identifier from its JSON form
    pub fn row_id(self, row: &serde_json::Value) -> Option<i64> {
        row.get(self.id_field()).and_then(|v| v.as_i64())
    }
}
