//! HTML roadmap page.
//!
//! Produces a self-contained HTML file for a recommendation, with all CSS
//! inlined. The backend's PDF export stays the canonical printable form; this
//! page works offline from data the client already holds.

use anyhow::Result;
use std::path::Path;

use careerpath_core::model::{Recommendation, User};

use crate::views::{format_date, roadmap_entries};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate the roadmap page for a recommendation.
pub fn generate_html(recommendation: &Recommendation, student: Option<&User>) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Career recommendation: {}</title>\n",
        html_escape(&recommendation.career_name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<p class=\"brand\">CAREERPATH</p>\n");
    html.push_str("<h1>Career Recommendation Report</h1>\n");
    let mut meta = Vec::new();
    if let Some(student) = student {
        meta.push(format!("Prepared for <strong>{}</strong>", html_escape(&student.display_name())));
    }
    if let Some(created) = &recommendation.created_at {
        meta.push(format!("Published {}", format_date(created)));
    }
    if !meta.is_empty() {
        html.push_str(&format!("<p class=\"meta\">{}</p>\n", meta.join(" | ")));
    }
    html.push_str("</header>\n");

    // Career
    html.push_str("<section class=\"career\">\n");
    html.push_str(&format!(
        "<h2 class=\"career-name\">{}</h2>\n",
        html_escape(&recommendation.career_name)
    ));
    for paragraph in recommendation
        .summary
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
    {
        html.push_str(&format!("<p>{}</p>\n", html_escape(paragraph)));
    }
    html.push_str("</section>\n");

    // Roadmap
    html.push_str("<section class=\"roadmap\">\n");
    html.push_str("<h2>Your roadmap</h2>\n");
    html.push_str("<ol>\n");
    for (number, title, description) in roadmap_entries(recommendation) {
        html.push_str("<li>");
        html.push_str(&format!("<span class=\"step\">{number}</span>"));
        html.push_str(&format!("<div><h3>{}</h3>", html_escape(title)));
        if !description.trim().is_empty() {
            html.push_str(&format!("<p>{}</p>", html_escape(description.trim())));
        }
        html.push_str("</div></li>\n");
    }
    html.push_str("</ol>\n");
    html.push_str("</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write the roadmap page to a file.
pub fn write_html_report(
    recommendation: &Recommendation,
    student: Option<&User>,
    path: &Path,
) -> Result<()> {
    let html = generate_html(recommendation, student);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #0f172a; --muted: #64748b; --brand: #4f46e5; --border: #e2e8f0; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #0f172a; --fg: #f8fafc; --muted: #94a3b8; --border: #334155; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 52rem; padding: 2rem; background: var(--bg); color: var(--fg); }
header { border-top: 0.5rem solid var(--brand); padding-top: 1.5rem; text-align: center; }
.brand { letter-spacing: 0.3em; color: var(--muted); font-size: 0.85rem; }
.meta { color: var(--muted); }
.career-name { color: var(--brand); font-size: 2.25rem; text-align: center; }
.roadmap ol { list-style: none; padding: 0; }
.roadmap li { display: flex; gap: 1rem; border: 1px solid var(--border); border-radius: 1rem; padding: 1rem; margin: 0.75rem 0; }
.step { flex: none; width: 2.5rem; height: 2.5rem; border-radius: 0.75rem; background: var(--brand); color: #fff; display: flex; align-items: center; justify-content: center; font-weight: bold; }
h3 { margin: 0 0 0.25rem 0; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use careerpath_core::model::{Role, RoadmapStep};

    fn make_recommendation() -> Recommendation {
        Recommendation {
            id: Some(4),
            career_name: "Data <Scientist>".into(),
            summary: "Curious about patterns.\n\nLoves statistics & code.".into(),
            created_at: Some("2025-11-20T08:00:00Z".parse().unwrap()),
            steps: vec![
                RoadmapStep { id: None, order: 2, title: "Build a portfolio".into(), description: String::new() },
                RoadmapStep { id: None, order: 1, title: "Learn Python".into(), description: "Start with pandas".into() },
            ],
        }
    }

    #[test]
    fn html_contains_escaped_content_in_step_order() {
        let student = User {
            id: Some(1),
            email: "diya@example.com".into(),
            first_name: "Diya".into(),
            last_name: "Iyer".into(),
            role: Role::Student,
            qualification: String::new(),
            interests: String::new(),
        };
        let html = generate_html(&make_recommendation(), Some(&student));

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Data &lt;Scientist&gt;"));
        assert!(html.contains("statistics &amp; code"));
        assert!(html.contains("Prepared for <strong>Diya Iyer</strong>"));
        assert!(html.contains("Published Nov 20, 2025"));
        let first = html.find("<span class=\"step\">01</span><div><h3>Learn Python").unwrap();
        let second = html.find("<span class=\"step\">02</span><div><h3>Build a portfolio").unwrap();
        assert!(first < second);
    }

    #[test]
    fn html_report_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("roadmap.html");

        write_html_report(&make_recommendation(), None, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Your roadmap"));
        assert!(!content.contains("Prepared for"));
    }
}
