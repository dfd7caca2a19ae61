//! Lesson & Problem Markdown
//!
//! pulldown-cmark with:
//! - Syntax highlighting for fenced code (syntect)
//! - Math passthrough: `$x$` and `$$x$$` left for KaTeX
//! - Raw HTML run through the allow-list sanitizer
//! - Link and image URLs restricted to safe schemes

use pulldown_cmark::{html::push_html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::sanitize::{escape_text, is_safe_url, sanitize_html};

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

const THEME: &str = "InspiredGitHub";

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> Option<&'static Theme> {
    THEME_SET.get_or_init(ThemeSet::load_defaults).themes.get(THEME)
}

/// Render a lesson body or problem statement to HTML
pub fn render_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, options());
    let events = transform_events(parser);
    let mut html = String::new();
    push_html(&mut html, events.into_iter());
    html
}

/// Single-line variant without the outer `<p>`
pub fn render_markdown_inline(text: &str) -> String {
    let html = render_markdown(text);
    html.trim()
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .map(str::to_string)
        .unwrap_or(html)
}

fn options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS
}

enum State {
    Normal,
    InCodeBlock { lang: Option<String>, content: String },
    InImage { src: String, title: String, alt: String, depth: usize },
}

fn transform_events<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut state = State::Normal;

    for event in parser {
        match state {
            State::Normal => match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(l) if !l.is_empty() => Some(l.to_string()),
                        _ => None,
                    };
                    state = State::InCodeBlock { lang, content: String::new() };
                }
                Event::Start(Tag::Image { dest_url, title, .. }) => {
                    state = State::InImage {
                        src: dest_url.to_string(),
                        title: title.to_string(),
                        alt: String::new(),
                        depth: 0,
                    };
                }
                Event::Start(Tag::Link { link_type, dest_url, title, id }) => {
                    let dest_url = if is_safe_url(&dest_url) { dest_url } else { CowStr::from("#") };
                    events.push(Event::Start(Tag::Link { link_type, dest_url, title, id }));
                }
                Event::Html(raw) => events.push(Event::Html(CowStr::from(sanitize_html(&raw)))),
                Event::InlineHtml(raw) => events.push(Event::InlineHtml(CowStr::from(sanitize_html(&raw)))),
                Event::Text(text) if text.contains('$') => events.extend(math_events(&text)),
                other => events.push(other),
            },

            State::InCodeBlock { ref lang, ref mut content } => match event {
                Event::Text(t) => content.push_str(&t),
                Event::End(TagEnd::CodeBlock) => {
                    events.push(Event::Html(CowStr::from(highlight_code(content, lang.as_deref()))));
                    state = State::Normal;
                }
                _ => {}
            },

            // alt text arrives as nested events; flatten it
            State::InImage { ref src, ref title, ref mut alt, ref mut depth } => match event {
                Event::Text(t) | Event::Code(t) => alt.push_str(&t),
                Event::Start(_) => *depth += 1,
                Event::End(TagEnd::Image) if *depth == 0 => {
                    events.push(Event::Html(CowStr::from(image_html(src, alt, title))));
                    state = State::Normal;
                }
                Event::End(_) => *depth = depth.saturating_sub(1),
                _ => {}
            },
        }
    }
    events
}

fn image_html(src: &str, alt: &str, title: &str) -> String {
    if !is_safe_url(src) {
        return escape_text(alt);
    }
    let mut html = format!(r#"<img class="md-image" src="{}" alt="{}""#, escape_text(src), escape_text(alt));
    if !title.is_empty() {
        html.push_str(&format!(r#" title="{}""#, escape_text(title)));
    }
    html.push_str(" />");
    html
}

fn highlight_code(code: &str, lang: Option<&str>) -> String {
    let ss = syntax_set();
    let syntax = lang
        .and_then(|l| ss.find_syntax_by_token(l))
        .unwrap_or_else(|| ss.find_syntax_plain_text());

    theme()
        .and_then(|theme| highlighted_html_for_string(code, ss, syntax, theme).ok())
        .unwrap_or_else(|| format!("<pre><code>{}</code></pre>", escape_text(code)))
}

/// Split text on `$`/`$$` delimiters; math bodies are escaped but keep
/// their delimiters for KaTeX
fn math_events(text: &str) -> Vec<Event<'static>> {
    let mut events = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find('$') {
        let delimiter = if rest[pos..].starts_with("$$") { "$$" } else { "$" };
        let body_start = pos + delimiter.len();
        let Some(len) = rest[body_start..].find(delimiter) else {
            break;
        };
        if pos > 0 {
            events.push(Event::Text(CowStr::from(rest[..pos].to_string())));
        }
        let body = &rest[body_start..body_start + len];
        events.push(Event::Html(CowStr::from(format!(
            "{d}{}{d}",
            escape_text(body),
            d = delimiter
        ))));
        rest = &rest[body_start + len + delimiter.len()..];
    }
    if !rest.is_empty() {
        events.push(Event::Text(CowStr::from(rest.to_string())));
    }
    events
}

/// Run KaTeX auto-render over the element matching `selector`, retrying
/// until the script has loaded
pub fn trigger_math_render(selector: &str) {
    let js_code = format!(
        r#"
        (function() {{
            var attempts = 0;
            function tryRender() {{
                var el = document.querySelector('{selector}');
                if (!el) return;
                if (window.renderMathInElement) {{
                    try {{
                        window.renderMathInElement(el, {{
                            delimiters: [
                                {{left: '$$', right: '$$', display: true}},
                                {{left: '$', right: '$', display: false}}
                            ],
                            throwOnError: false
                        }});
                    }} catch (e) {{
                        console.error('KaTeX render error:', e);
                    }}
                }} else if (++attempts < 50) {{
                    setTimeout(tryRender, 200);
                }}
            }}
            tryRender();
        }})();
        "#
    );
    if let Err(e) = js_sys::eval(&js_code) {
        log::warn!("[MARKDOWN] math render failed: {:?}", e);
    }
}
