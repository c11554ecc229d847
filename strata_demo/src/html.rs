// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single-page HTML report embedding the rendered SVGs.

use std::fmt::Write as _;

#[derive(Debug)]
pub(crate) struct HtmlSection {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) svg: String,
}

pub(crate) fn render_report(title: &str, sections: &[HtmlSection]) -> String {
    let mut out = String::new();
    out.push_str("<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_html(title));
    out.push_str(
        "<style>\n\
         body { font-family: sans-serif; margin: 2em; color: #333; }\n\
         nav a { margin-right: 1em; }\n\
         section { margin: 2em 0; }\n\
         </style>\n</head>\n<body>\n",
    );
    let _ = writeln!(out, "<h1>{}</h1>", escape_html(title));
    out.push_str("<nav>");
    for s in sections {
        let _ = write!(
            out,
            "<a href=\"#{}\">{}</a>",
            escape_html(&s.id),
            escape_html(&s.title)
        );
    }
    out.push_str("</nav>\n");
    for s in sections {
        let _ = writeln!(
            out,
            "<section id=\"{}\">\n<h2>{}</h2>\n{}</section>",
            escape_html(&s.id),
            escape_html(&s.title),
            s.svg
        );
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_are_linked_from_the_nav() {
        let html = render_report(
            "Crises & conflict",
            &[HtmlSection {
                id: "bar".into(),
                title: "Share".into(),
                svg: "<svg></svg>\n".into(),
            }],
        );
        assert!(html.contains("<title>Crises &amp; conflict</title>"));
        assert!(html.contains("<a href=\"#bar\">Share</a>"));
        assert!(html.contains("<section id=\"bar\">\n<h2>Share</h2>\n<svg></svg>\n</section>"));
    }

    #[test]
    fn section_ids_are_escaped() {
        let html = render_report(
            "Page",
            &[HtmlSection {
                id: "a\"><script>".into(),
                title: "T".into(),
                svg: String::new(),
            }],
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("<a href=\"#a&quot;&gt;&lt;script&gt;\">T</a>"));
        assert!(html.contains("<section id=\"a&quot;&gt;&lt;script&gt;\">"));
    }
}
