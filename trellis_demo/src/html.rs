// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt::Write as _;

/// One titled block of the report.
#[derive(Debug)]
pub(crate) struct Section {
    pub(crate) title: String,
    pub(crate) notes: Vec<String>,
    pub(crate) svgs: Vec<String>,
}

impl Section {
    pub(crate) fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            notes: Vec::new(),
            svgs: Vec::new(),
        }
    }

    pub(crate) fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub(crate) fn svg(&mut self, svg: String) {
        self.svgs.push(svg);
    }
}

pub(crate) fn render_report(title: &str, sections: &[Section]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<!doctype html>");
    let _ = writeln!(out, "<html><head><meta charset=\"utf-8\"><title>{title}</title>");
    out.push_str(
        "<style>body{font-family:sans-serif;margin:24px;background:#fafafa}\
         section{margin-bottom:32px}svg{background:#fff;border:1px solid #ddd;margin:4px}\
         li{font-family:monospace;font-size:12px}</style>\n",
    );
    let _ = writeln!(out, "</head><body><h1>{title}</h1>");
    for section in sections {
        let _ = writeln!(out, "<section><h2>{}</h2>", section.title);
        if !section.notes.is_empty() {
            out.push_str("<ul>\n");
            for note in &section.notes {
                let _ = writeln!(out, "<li>{}</li>", escape(note));
            }
            out.push_str("</ul>\n");
        }
        for svg in &section.svgs {
            out.push_str(svg);
            out.push('\n');
        }
        out.push_str("</section>\n");
    }
    out.push_str("</body></html>\n");
    out
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
