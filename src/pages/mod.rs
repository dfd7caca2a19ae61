//! Pages
//!
//! Route-level components. Layout chrome lives in `app.rs`.

mod admin;
mod auth;
mod courses;
mod home;
mod problems;

use leptos::prelude::*;

pub use admin::{AdminDashboard, AdminDetailPage, AdminEditPage, AdminLayout, AdminResourcePage};
pub use auth::{LoginPage, RegisterPage};
pub use courses::{CourseCatalog, CourseDetail, LessonView};
pub use home::Home;
pub use problems::{ProblemDetail, ProblemList};

#[component]
pub fn NotFound() -> impl IntoView {
    view! {
        <div class="not-found">
            <h2>"Page not found"</h2>
            <a href="/">"Back to home"</a>
        </div>
    }
}
