//! Route Table
//!
//! Static description of every page: drives the navigation menus and the
//! document title.

pub const SITE_NAME: &str = "NTU-CODER";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Public,
    Auth,
    Admin,
}

/// Page nested under a route; `:id` matches a numeric segment, `:slug` any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubRoute {
    pub path: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: &'static str,
    pub layout: Layout,
    pub name: &'static str,
    pub items: &'static [SubRoute],
}

const fn sub(path: &'static str, name: &'static str) -> SubRoute {
    SubRoute { path, name }
}

const fn route(path: &'static str, layout: Layout, name: &'static str, items: &'static [SubRoute]) -> RouteEntry {
    RouteEntry { path, layout, name, items }
}

pub static ROUTES: &[RouteEntry] = &[
    route("/", Layout::Public, "Home", &[]),
    route(
        "/courses",
        Layout::Public,
        "Courses",
        &[
            sub("/courses/:slug", "Course"),
            sub("/courses/:slug/lessons/:id", "Lesson"),
        ],
    ),
    route("/problems", Layout::Public, "Problems", &[sub("/problems/:id", "Problem")]),
    route("/login", Layout::Auth, "Sign in", &[]),
    route("/register", Layout::Auth, "Sign up", &[]),
    route("/admin", Layout::Admin, "Dashboard", &[]),
    route(
        "/admin/courses",
        Layout::Admin,
        "Courses",
        &[sub("/admin/courses/:id", "Course details"), sub("/admin/courses/:id/edit", "Edit course")],
    ),
    route(
        "/admin/lessons",
        Layout::Admin,
        "Lessons",
        &[sub("/admin/lessons/:id", "Lesson details"), sub("/admin/lessons/:id/edit", "Edit lesson")],
    ),
    route(
        "/admin/problems",
        Layout::Admin,
        "Problems",
        &[sub("/admin/problems/:id", "Problem details"), sub("/admin/problems/:id/edit", "Edit problem")],
    ),
    route(
        "/admin/testcases",
        Layout::Admin,
        "Test cases",
        &[sub("/admin/testcases/:id", "Test case details"), sub("/admin/testcases/:id/edit", "Edit test case")],
    ),
    route(
        "/admin/coders",
        Layout::Admin,
        "Coders",
        &[sub("/admin/coders/:id", "Coder details"), sub("/admin/coders/:id/edit", "Edit coder")],
    ),
    route(
        "/admin/categories",
        Layout::Admin,
        "Categories",
        &[sub("/admin/categories/:id", "Category details"), sub("/admin/categories/:id/edit", "Edit category")],
    ),
    route(
        "/admin/badges",
        Layout::Admin,
        "Badges",
        &[sub("/admin/badges/:id", "Badge details"), sub("/admin/badges/:id/edit", "Edit badge")],
    ),
];

/// Entries shown in the menu of `layout`
pub fn menu(routes: &'static [RouteEntry], layout: Layout) -> impl Iterator<Item = &'static RouteEntry> {
    routes.iter().filter(move |r| r.layout == layout)
}

/// Drop query, fragment and trailing slash
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// `intro-to-python-12` -> `Intro To Python`
pub fn humanize_slug(slug: &str) -> String {
    let base = match slug.rsplit_once('-') {
        Some((head, tail)) if is_numeric(tail) && !head.is_empty() => head,
        _ => slug,
    };
    base.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title of the page `template` describes, if `path` matches it
fn match_template(template: &str, name: &str, path: &[&str]) -> Option<String> {
    let pattern = segments(template);
    if pattern.len() != path.len() {
        return None;
    }
    for (expected, actual) in pattern.iter().zip(path) {
        match *expected {
            ":id" if !is_numeric(actual) => return None,
            ":id" | ":slug" => {}
            literal if literal != *actual => return None,
            _ => {}
        }
    }
    match pattern.last() {
        Some(&":slug") => path.last().map(|slug| humanize_slug(slug)),
        _ => Some(name.to_string()),
    }
}

/// Title for `path`: exact route name, then sub-route templates, then a
/// `/<base>/<slug>-<number>` detail page under any route.
pub fn derive_title(routes: &[RouteEntry], path: &str) -> Option<String> {
    let path = normalize(path);
    if let Some(entry) = routes.iter().find(|r| r.path == path) {
        return Some(entry.name.to_string());
    }

    let parts = segments(path);
    let from_template = routes
        .iter()
        .flat_map(|r| r.items.iter())
        .find_map(|item| match_template(item.path, item.name, &parts));
    if from_template.is_some() {
        return from_template;
    }

    let (base, last) = path.rsplit_once('/')?;
    let base = if base.is_empty() { "/" } else { base };
    let has_number_suffix = last.rsplit_once('-').is_some_and(|(head, tail)| !head.is_empty() && is_numeric(tail));
    if has_number_suffix && routes.iter().any(|r| r.path == base) {
        return Some(humanize_slug(last));
    }
    None
}

/// `document.title` for a page
pub fn document_title(title: Option<&str>) -> String {
    match title {
        Some(t) if !t.is_empty() => format!("{} | {}", t, SITE_NAME),
        _ => SITE_NAME.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_route_names() {
        assert_eq!(derive_title(ROUTES, "/").as_deref(), Some("Home"));
        assert_eq!(derive_title(ROUTES, "/admin/badges/").as_deref(), Some("Badges"));
        assert_eq!(derive_title(ROUTES, "/courses?page=2").as_deref(), Some("Courses"));
    }

    #[test]
    fn test_numeric_sub_routes() {
        assert_eq!(derive_title(ROUTES, "/admin/courses/12").as_deref(), Some("Course details"));
        assert_eq!(derive_title(ROUTES, "/admin/coders/3/edit").as_deref(), Some("Edit coder"));
        assert_eq!(derive_title(ROUTES, "/admin/courses/abc"), None);
    }

    #[test]
    fn test_slug_detail_route_is_humanized() {
        assert_eq!(
            derive_title(ROUTES, "/courses/intro-to-python-12").as_deref(),
            Some("Intro To Python")
        );
        assert_eq!(
            derive_title(ROUTES, "/courses/intro-to-python-12/lessons/4").as_deref(),
            Some("Lesson")
        );
    }

    #[test]
    fn test_slug_number_fallback_under_any_route() {
        let routes = [route("/blog", Layout::Public, "Blog", &[])];
        assert_eq!(
            derive_title(&routes, "/blog/dynamic-programming-basics-7").as_deref(),
            Some("Dynamic Programming Basics")
        );
        assert_eq!(derive_title(&routes, "/blog/no-number"), None);
    }

    #[test]
    fn test_humanize_slug() {
        assert_eq!(humanize_slug("intro-to-python-12"), "Intro To Python");
        assert_eq!(humanize_slug("graphs"), "Graphs");
        assert_eq!(humanize_slug("c_plus_plus-3"), "C Plus Plus");
        assert_eq!(humanize_slug("2024"), "2024");
    }

    #[test]
    fn test_document_title() {
        assert_eq!(document_title(Some("Courses")), "Courses | NTU-CODER");
        assert_eq!(document_title(None), "NTU-CODER");
    }

    #[test]
    fn test_admin_menu_lists_every_resource() {
        let admin: Vec<_> = menu(ROUTES, Layout::Admin).map(|r| r.path).collect();
        for kind in crate::api::ResourceKind::ALL {
            assert!(admin.contains(&format!("/admin/{}", kind.slug()).as_str()));
        }
    }
}
