//! HTML Sanitizer
//!
//! Allow-list filter for raw HTML embedded in lesson and problem markdown.
//! Allowed tags keep only their allowed attributes; everything else is
//! escaped so it shows up as text. URLs must be relative or use an allowed
//! scheme.

const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "del", "details", "div", "em", "h1", "h2", "h3", "h4", "h5", "h6",
    "hr", "i", "img", "kbd", "li", "ol", "p", "pre", "s", "span", "strong", "sub", "summary", "sup", "table",
    "tbody", "td", "th", "thead", "tr", "u", "ul",
];

const VOID_TAGS: &[&str] = &["br", "hr", "img"];

const URL_SCHEMES: &[&str] = &["http", "https", "mailto"];

fn allowed_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href", "title", "target", "rel"],
        "img" => &["src", "alt", "title", "width", "height"],
        "td" | "th" => &["colspan", "rowspan", "align"],
        "code" | "pre" | "span" | "div" => &["class"],
        "ol" => &["start"],
        _ => &[],
    }
}

fn is_url_attribute(name: &str) -> bool {
    matches!(name, "href" | "src")
}

pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Named references that can spell out a URL scheme or its separators.
///
/// Unknown names are left as literal text; output re-escapes `&`, so the
/// browser never decodes them either.
fn named_reference(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "colon" => ':',
        "sol" => '/',
        "bsol" => '\\',
        "period" => '.',
        "quest" => '?',
        "num" => '#',
        "equals" => '=',
        "percnt" => '%',
        "lpar" => '(',
        "rpar" => ')',
        "Tab" => '\t',
        "NewLine" => '\n',
        "nbsp" => '\u{a0}',
        _ => return None,
    };
    Some(c)
}

/// Character for the reference at the start of `s` (just after `&`) and the
/// number of bytes it spans
fn decode_reference(s: &str) -> Option<(char, usize)> {
    if let Some(numeric) = s.strip_prefix('#') {
        let (digits, radix, prefix) = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 2),
            None => (numeric, 10, 1),
        };
        let len = digits.find(|c: char| !c.is_digit(radix)).unwrap_or(digits.len());
        if len == 0 {
            return None;
        }
        let code = u32::from_str_radix(&digits[..len], radix).ok()?;
        let c = char::from_u32(code).unwrap_or('\u{fffd}');
        let semicolon = usize::from(digits[len..].starts_with(';'));
        return Some((c, prefix + len + semicolon));
    }
    let len = s.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(s.len());
    if !s[len..].starts_with(';') {
        return None;
    }
    named_reference(&s[..len]).map(|c| (c, len + 1))
}

/// Resolve character references in an attribute value
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match decode_reference(after) {
            Some((c, used)) => {
                out.push(c);
                rest = &after[used..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Relative URL, or one of the allowed schemes.
///
/// Expects a decoded URL; anything still looking like a reference is refused.
pub fn is_safe_url(url: &str) -> bool {
    let cleaned: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect();
    if cleaned.contains("&#") {
        return false;
    }
    let end = cleaned.find(['/', '?', '#']).unwrap_or(cleaned.len());
    match cleaned[..end].split_once(':') {
        None => true,
        Some((scheme, _)) => URL_SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme)),
    }
}
/// Index of the `>` closing a tag that starts at `start`, skipping quoted values
fn tag_end(html: &str, start: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in html[start..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(start + i),
            _ => {}
        }
    }
    None
}

/// Parse `name="value" flag other='x'` into pairs, lowercasing names
fn parse_attributes(source: &str) -> Vec<(String, Option<String>)> {
    let mut attrs = Vec::new();
    let mut rest = source.trim_start();
    while !rest.is_empty() {
        let name_len = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '/')
            .unwrap_or(rest.len());
        if name_len == 0 {
            rest = rest[1..].trim_start();
            continue;
        }
        let name = rest[..name_len].to_ascii_lowercase();
        rest = rest[name_len..].trim_start();

        let mut value = None;
        if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            let (v, remaining) = match after_eq.chars().next() {
                Some(q @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    match body.find(q) {
                        Some(close) => (&body[..close], &body[close + 1..]),
                        None => (body, ""),
                    }
                }
                _ => {
                    let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
                    (&after_eq[..end], &after_eq[end..])
                }
            };
            value = Some(v.to_string());
            rest = remaining.trim_start();
        }
        attrs.push((name, value));
    }
    attrs
}

fn render_open_tag(name: &str, attr_source: &str, self_closing: bool) -> String {
    let allowed = allowed_attributes(name);
    let mut out = format!("<{}", name);
    for (attr, value) in parse_attributes(attr_source) {
        if attr.starts_with("on") || !allowed.contains(&attr.as_str()) {
            continue;
        }
        match value.map(|v| decode_entities(&v)) {
            Some(v) if is_url_attribute(&attr) && !is_safe_url(&v) => continue,
            Some(v) => out.push_str(&format!(" {}=\"{}\"", attr, escape_text(&v))),
            None => out.push_str(&format!(" {}", attr)),
        }
    }
    if name == "a" && out.contains(" target=") && !out.contains(" rel=") {
        out.push_str(" rel=\"noopener noreferrer\"");
    }
    if self_closing && VOID_TAGS.contains(&name) {
        out.push_str(" /");
    }
    out.push('>');
    out
}

/// Rewrite one `<...>` tag (without the brackets)
fn sanitize_tag(inner: &str) -> Option<String> {
    let (closing, body) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let name_len = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    if name_len == 0 {
        return None;
    }
    let name = body[..name_len].to_ascii_lowercase();
    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return None;
    }
    if closing {
        return (!VOID_TAGS.contains(&name.as_str())).then(|| format!("</{}>", name));
    }
    let attrs = body[name_len..].trim_end();
    let (attrs, self_closing) = match attrs.strip_suffix('/') {
        Some(a) => (a, true),
        None => (attrs, false),
    };
    Some(render_open_tag(&name, attrs, self_closing))
}

/// Filter a fragment of untrusted HTML
pub fn sanitize_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut pos = 0;
    while let Some(offset) = html[pos..].find('<') {
        let start = pos + offset;
        out.push_str(&html[pos..start].replace('>', "&gt;"));

        if html[start..].starts_with("<!--") {
            pos = match html[start + 4..].find("-->") {
                Some(end) => start + 4 + end + 3,
                None => html.len(),
            };
            continue;
        }

        match tag_end(html, start + 1) {
            Some(end) => {
                let inner = &html[start + 1..end];
                match sanitize_tag(inner) {
                    Some(tag) => out.push_str(&tag),
                    None => out.push_str(&escape_text(&html[start..=end])),
                }
                pos = end + 1;
            }
            None => {
                out.push_str(&escape_text(&html[start..]));
                pos = html.len();
            }
        }
    }
    out.push_str(&html[pos..].replace('>', "&gt;"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_markup_survives() {
        let html = r#"<p>Use <code class="lang">O(n)</code> <strong>here</strong></p>"#;
        assert_eq!(sanitize_html(html), html);
    }

    #[test]
    fn test_script_is_escaped() {
        assert_eq!(
            sanitize_html("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_event_handlers_and_unknown_attributes_dropped() {
        assert_eq!(
            sanitize_html(r#"<img src="a.png" onerror="alert(1)" style="x" alt='graph'>"#),
            r#"<img src="a.png" alt="graph">"#
        );
    }

    #[test]
    fn test_javascript_urls_rejected() {
        assert_eq!(sanitize_html(r#"<a href="javascript:alert(1)">x</a>"#), "<a>x</a>");
        assert_eq!(sanitize_html(r#"<a href=" JaVaScRiPt:alert(1)">x</a>"#), "<a>x</a>");
        assert_eq!(sanitize_html(r#"<a href="jav&#x61;script:1">x</a>"#), "<a>x</a>");
        assert_eq!(
            sanitize_html(r#"<a href="https://ntu.edu.vn/a?b=c:d">x</a>"#),
            r#"<a href="https://ntu.edu.vn/a?b=c:d">x</a>"#
        );
        assert!(is_safe_url("/courses/1"));
        assert!(!is_safe_url("data:text/html,hi"));
    }

    #[test]
    fn test_entity_encoded_schemes_rejected() {
        assert_eq!(sanitize_html(r#"<a href="javascript&colon;alert(document.cookie)">x</a>"#), "<a>x</a>");
        assert_eq!(sanitize_html(r#"<a href="javascript&#58;alert(1)">x</a>"#), "<a>x</a>");
        assert_eq!(sanitize_html(r#"<a href="java&Tab;script:alert(1)">x</a>"#), "<a>x</a>");
        assert_eq!(sanitize_html(r#"<img src="data&colon;text/html,hi" alt="x">"#), r#"<img alt="x">"#);
    }

    #[test]
    fn test_attribute_values_are_reescaped() {
        assert_eq!(
            sanitize_html(r#"<a href="/search?q=a&amp;page=2">x</a>"#),
            r#"<a href="/search?q=a&amp;page=2">x</a>"#
        );
        // unknown references reach the browser as literal text
        assert_eq!(
            sanitize_html(r#"<a href="/x?a=1&unknownname;">x</a>"#),
            r#"<a href="/x?a=1&amp;unknownname;">x</a>"#
        );
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a&colon;b&#58;c&#x3A;d&#X3a"), "a:b:c:d:");
        assert_eq!(decode_entities("tab&Tab;nl&NewLine;"), "tab\tnl\n");
        assert_eq!(decode_entities("&bogus; & &#;"), "&bogus; & &#;");
    }

    #[test]
    fn test_target_blank_gets_rel() {
        assert_eq!(
            sanitize_html(r#"<a href="/x" target="_blank">x</a>"#),
            r#"<a href="/x" target="_blank" rel="noopener noreferrer">x</a>"#
        );
    }

    #[test]
    fn test_comments_dropped_and_stray_brackets_escaped() {
        assert_eq!(sanitize_html("a<!-- hidden -->b"), "ab");
        assert_eq!(sanitize_html("1 < 2 > 0"), "1 &lt; 2 &gt; 0");
        assert_eq!(sanitize_html("<br/>"), "<br />");
    }

    #[test]
    fn test_quoted_gt_does_not_end_tag() {
        assert_eq!(
            sanitize_html(r#"<span class="a>b">t</span>"#),
            r#"<span class="a&gt;b">t</span>"#
        );
    }
}
