//! Column sets for the admin tables

use leptos::prelude::*;

use crate::components::Column;
use crate::markdown::render_markdown_inline;
use crate::models::{Badge, Category, Coder, Course, Lesson, Problem, TestCase};

const EMPTY: &str = "—";

fn or_dash(value: &Option<String>) -> String {
    value.as_deref().filter(|s| !s.trim().is_empty()).unwrap_or(EMPTY).to_string()
}

/// First `max` characters, with an ellipsis when cut
pub fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}

/// Hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`) or a bare colour keyword
pub fn safe_css_color(value: &str) -> Option<&str> {
    let value = value.trim();
    let valid = match value.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => (1..=32).contains(&value.len()) && value.chars().all(|c| c.is_ascii_alphabetic()),
    };
    valid.then_some(value)
}

pub fn course_columns() -> Vec<Column<Course>> {
    vec![
        Column::text("ID", |c: &Course| c.course_id.to_string()).sortable("courseID"),
        Column::text("Title", |c: &Course| c.title.clone()).sortable("title"),
        Column::text("Category", |c: &Course| or_dash(&c.category_name)),
        Column::custom("Description", |c: &Course| {
            let html = render_markdown_inline(&truncate(c.description.as_deref().unwrap_or(""), 80));
            view! { <span class="cell-markdown" inner_html=html></span> }.into_any()
        }),
        Column::status("Published"),
    ]
}

pub fn lesson_columns() -> Vec<Column<Lesson>> {
    vec![
        Column::text("ID", |l: &Lesson| l.lesson_id.to_string()).sortable("lessonID"),
        Column::text("Course", |l: &Lesson| l.course_id.to_string()).sortable("courseID"),
        Column::text("Title", |l: &Lesson| l.title.clone()).sortable("title"),
        Column::text("Order", |l: &Lesson| l.position.to_string()).sortable("position"),
    ]
}

pub fn problem_columns() -> Vec<Column<Problem>> {
    vec![
        Column::text("ID", |p: &Problem| p.problem_id.to_string()).sortable("problemID"),
        Column::text("Code", |p: &Problem| or_dash(&p.problem_code)).sortable("problemCode"),
        Column::text("Name", |p: &Problem| p.problem_name.clone()).sortable("problemName"),
        Column::text("Time limit", |p: &Problem| {
            p.time_limit.map(|t| format!("{} s", t)).unwrap_or_else(|| EMPTY.to_string())
        }),
        Column::text("Memory", |p: &Problem| {
            p.memory_limit.map(|m| format!("{} MB", m)).unwrap_or_else(|| EMPTY.to_string())
        }),
        Column::status("Published"),
    ]
}

pub fn test_case_columns() -> Vec<Column<TestCase>> {
    vec![
        Column::text("ID", |t: &TestCase| t.test_case_id.to_string()).sortable("testCaseID"),
        Column::text("Problem", |t: &TestCase| t.problem_id.to_string()).sortable("problemID"),
        Column::custom("Input", |t: &TestCase| view! { <code>{truncate(&t.input, 40)}</code> }.into_any()),
        Column::custom("Output", |t: &TestCase| view! { <code>{truncate(&t.output, 40)}</code> }.into_any()),
        Column::text("Sample", |t: &TestCase| (if t.sample_test { "Yes" } else { "No" }).to_string()),
    ]
}

pub fn coder_columns() -> Vec<Column<Coder>> {
    vec![
        Column::text("ID", |c: &Coder| c.coder_id.to_string()).sortable("coderID"),
        Column::text("Name", |c: &Coder| c.coder_name.clone()).sortable("coderName"),
        Column::text("Email", |c: &Coder| c.email.clone()).sortable("email"),
        Column::text("Role", |c: &Coder| or_dash(&c.role)),
        Column::status("Active"),
    ]
}

pub fn category_columns() -> Vec<Column<Category>> {
    vec![
        Column::text("ID", |c: &Category| c.category_id.to_string()).sortable("categoryID"),
        Column::text("Name", |c: &Category| c.cat_name.clone()).sortable("catName"),
        Column::text("Order", |c: &Category| c.cat_order.to_string()).sortable("catOrder"),
    ]
}

pub fn badge_columns() -> Vec<Column<Badge>> {
    vec![
        Column::text("ID", |b: &Badge| b.badge_id.to_string()).sortable("badgeID"),
        Column::custom("Name", |b: &Badge| {
            let style = b
                .color
                .as_deref()
                .and_then(safe_css_color)
                .map(|c| format!("background: {}", c))
                .unwrap_or_default();
            view! { <span class="badge-chip" style=style>{b.name.clone()}</span> }.into_any()
        }),
        Column::text("Description", |b: &Badge| truncate(b.description.as_deref().unwrap_or(""), 60)),
        Column::status("Active"),
    ]
}
