//! License banner rendering.
use chrono::Datelike as _;

use super::package::PackageMeta;

/// Interpolate `{name}`, `{title}`, `{version}`, `{author}`, `{license}`,
/// `{homepage}` and `{year}` in `template`.
///
/// Unknown placeholders are left untouched.
#[must_use]
pub fn render(template: &str, meta: &PackageMeta, year: i32) -> String {
    let year = year.to_string();
    let values: [(&str, &str); 7] = [
        ("{name}", meta.name.as_str()),
        ("{title}", meta.title()),
        ("{version}", meta.version.as_str()),
        ("{author}", meta.author_name()),
        ("{license}", meta.license.as_str()),
        ("{homepage}", meta.homepage.as_str()),
        ("{year}", year.as_str()),
    ];

    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let (before, tail) = rest.split_at(start);
        out.push_str(before);
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = tail.get(key.len()..).unwrap_or_default();
            }
            None => {
                out.push('{');
                rest = tail.get(1..).unwrap_or_default();
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render `template` for the current UTC year.
#[must_use]
pub fn render_now(template: &str, meta: &PackageMeta) -> String {
    render(template, meta, chrono::Utc::now().year())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::package::Author;
    use crate::config::settings::DEFAULT_BANNER_TEMPLATE;

    fn agency() -> PackageMeta {
        PackageMeta {
            name: "startbootstrap-agency".to_string(),
            title: Some("Agency".to_string()),
            version: "5.0.6".to_string(),
            author: Some(Author::Name("Start Bootstrap".to_string())),
            license: "MIT".to_string(),
            homepage: "https://startbootstrap.com/template-overviews/agency".to_string(),
        }
    }

    #[test]
    fn renders_default_template() {
        let banner = render(DEFAULT_BANNER_TEMPLATE, &agency(), 2026);
        insta::assert_snapshot!(banner.trim_end(), @r"
        /*!
         * Start Bootstrap - Agency v5.0.6 (https://startbootstrap.com/template-overviews/agency)
         * Copyright 2013-2026 Start Bootstrap
         * Licensed under MIT (https://github.com/BlackrockDigital/startbootstrap-agency/blob/master/LICENSE)
         */
        ");
    }

    #[test]
    fn default_template_ends_with_blank_line() {
        let banner = render(DEFAULT_BANNER_TEMPLATE, &agency(), 2026);
        assert!(banner.starts_with("/*!\n"));
        assert!(banner.ends_with(" */\n\n"));
    }

    #[test]
    fn unknown_placeholders_are_kept() {
        let out = render("{name} {unknown} {", &agency(), 2026);
        assert_eq!(out, "startbootstrap-agency {unknown} {");
    }

    #[test]
    fn repeated_placeholders_all_replaced() {
        let out = render("{version}/{version}", &agency(), 2026);
        assert_eq!(out, "5.0.6/5.0.6");
    }

    #[test]
    fn missing_fields_render_empty() {
        let out = render("[{author}][{homepage}]", &PackageMeta::default(), 2026);
        assert_eq!(out, "[][]");
    }

    #[test]
    fn render_now_uses_current_year() {
        let year = chrono::Utc::now().year().to_string();
        assert_eq!(render_now("{year}", &agency()), year);
    }
}
