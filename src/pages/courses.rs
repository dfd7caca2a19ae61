//! Course Catalog Pages
//!
//! Public list of published courses, a course's lesson outline and the
//! lesson reader. Course URLs carry a readable slug ending in the id:
//! `/courses/intro-to-python-12`.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use super::NotFound;
use crate::api::ResourceKind;
use crate::components::{MarkdownView, Pagination};
use crate::context::use_app_context;
use crate::markdown::render_markdown_inline;
use crate::models::{Course, Lesson};
use crate::query::{use_item_query, use_list_query, ListQuery};

/// Lowercase ASCII words joined by dashes
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

pub fn course_slug(course: &Course) -> String {
    match slugify(&course.title) {
        s if s.is_empty() => format!("course-{}", course.course_id),
        s => format!("{}-{}", s, course.course_id),
    }
}

/// Id at the end of a course slug
pub fn id_from_slug(slug: &str) -> Option<i64> {
    slug.rsplit('-').next()?.parse().ok()
}

#[component]
pub fn CourseCatalog() -> impl IntoView {
    let ctx = use_app_context();
    let page_size = ctx.page_size();
    let (page, set_page) = signal(1u32);

    let query = Memo::new(move |_| {
        ListQuery::new(ResourceKind::Course)
            .page(page.get())
            .page_size(page_size)
            .filter("status", "true")
    });
    let list = use_list_query::<Course>(query.into(), Signal::stored(0));

    view! {
        <section class="catalog">
            <h1>"Courses"</h1>
            <div class="course-grid">
                <For
                    each=move || list.data.with(|d| d.data.clone())
                    key=|course: &Course| course.course_id
                    children=|course: Course| view! { <CourseCard course=course /> }
                />
            </div>
            <Show when=move || !list.is_loading.get() && list.data.with(|d| d.data.is_empty())>
                <p class="empty-state">"No courses published yet."</p>
            </Show>
            <Pagination
                page=page
                total_pages=Signal::derive(move || list.data.with(|d| d.total_pages))
                total_count=Signal::derive(move || list.data.with(|d| d.total_count))
                on_change=Callback::new(move |target: u32| set_page.set(target))
            />
        </section>
    }
}

#[component]
fn CourseCard(course: Course) -> impl IntoView {
    let href = format!("/courses/{}", course_slug(&course));
    let summary = course.description.as_deref().map(render_markdown_inline).unwrap_or_default();

    view! {
        <a class="course-card" href=href>
            <h3>{course.title.clone()}</h3>
            {course.category_name.clone().map(|c| view! { <span class="course-category">{c}</span> })}
            <p class="course-summary" inner_html=summary></p>
        </a>
    }
}

/// `/courses/:slug`
#[component]
pub fn CourseDetail() -> impl IntoView {
    let params = use_params_map();
    let slug = Memo::new(move |_| params.with(|p| p.get("slug")).unwrap_or_default());
    let id = Memo::new(move |_| id_from_slug(&slug.get()));
    let course = use_item_query::<Course>(ResourceKind::Course, id.into());

    view! {
        <section class="course-detail">
            {move || match course.data.get() {
                Some(course) => {
                    view! {
                        <h1>{course.title.clone()}</h1>
                        <MarkdownView
                            id="course-description"
                            content=Signal::stored(course.description.clone().unwrap_or_default())
                        />
                    }
                        .into_any()
                }
                None if course.is_loading.get() => view! { <p class="page-loading">"Loading…"</p> }.into_any(),
                None => view! { <NotFound /> }.into_any(),
            }}
            {move || id.get().map(|id| view! { <LessonOutline course_id=id slug=slug.get() /> })}
        </section>
    }
}

#[component]
fn LessonOutline(course_id: i64, slug: String) -> impl IntoView {
    let query = ListQuery::new(ResourceKind::Lesson)
        .page_size(100)
        .sort_by("position", true)
        .filter("courseID", course_id.to_string());
    let list = use_list_query::<Lesson>(Signal::stored(query), Signal::stored(0));

    view! {
        <nav class="lesson-outline">
            <h2>"Lessons"</h2>
            <ol>
                <For
                    each=move || list.data.with(|d| d.data.clone())
                    key=|lesson: &Lesson| lesson.lesson_id
                    children=move |lesson: Lesson| {
                        view! {
                            <li>
                                <a href=format!("/courses/{}/lessons/{}", slug, lesson.lesson_id)>{lesson.title}</a>
                            </li>
                        }
                    }
                />
            </ol>
        </nav>
    }
}

/// `/courses/:slug/lessons/:id`
#[component]
pub fn LessonView() -> impl IntoView {
    let params = use_params_map();
    let slug = Memo::new(move |_| params.with(|p| p.get("slug")).unwrap_or_default());
    let id = Memo::new(move |_| params.with(|p| p.get("id")).and_then(|id| id.parse::<i64>().ok()));
    let lesson = use_item_query::<Lesson>(ResourceKind::Lesson, id.into());
    let content = Signal::derive(move || {
        lesson.data.with(|l| l.as_ref().and_then(|l| l.content.clone()).unwrap_or_default())
    });

    view! {
        <article class="lesson">
            <a class="back-link" href=move || format!("/courses/{}", slug.get())>"← Course"</a>
            {move || match lesson.data.with(|l| l.as_ref().map(|l| l.title.clone())) {
                Some(title) => view! { <h1>{title}</h1> }.into_any(),
                None if lesson.is_loading.get() => view! { <p class="page-loading">"Loading…"</p> }.into_any(),
                None => view! { <NotFound /> }.into_any(),
            }}
            <MarkdownView id="lesson-content" content=content />
        </article>
    }
}
