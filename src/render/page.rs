//! Full-page layout: form, settings panel, and submission results.

use super::card::ResultCard;
use super::{attr, text};
use crate::config::SettingsStatus;
use crate::pipeline::{Report, Resolution, NOTHING_TO_SEARCH, NO_MATCHES_HINT};
use std::fmt::Write;

const PAGE_TITLE: &str = "PlumbID – Parts Identification (Advanced)";
const INTRO: &str =
    "Type a few words and/or upload a photo. We’ll OCR any labels and combine it with your query.";
const QUERY_PLACEHOLDER: &str = "e.g., Vaillant diverter valve 178978 ecoTEC 835";

const STYLE: &str = r#"
body{font-family:system-ui,sans-serif;margin:0;display:flex;gap:2rem}
aside{background:#f3f4f6;padding:1.5rem;min-width:14rem}
main{max-width:46rem;padding:1.5rem;flex:1}
form{display:flex;flex-direction:column;gap:.75rem;margin-bottom:1.5rem}
.notice{padding:.75rem 1rem;border-radius:.4rem;margin:.5rem 0}
.success{background:#dcfce7}.info{background:#dbeafe}.warning{background:#fef9c3}.error{background:#fee2e2}
.card{display:grid;grid-template-columns:1fr 2fr;gap:1rem}
.media img{width:100%}
.caption{color:#6b7280;font-size:.85rem}
.button{display:block;text-align:center;padding:.5rem;border:1px solid #9ca3af;border-radius:.4rem}
"#;

/// Status block shown above the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    fn to_html(&self) -> String {
        let (class, message) = match self {
            Self::Success(m) => ("success", m),
            Self::Info(m) => ("info", m),
            Self::Warning(m) => ("warning", m),
            Self::Error(m) => ("error", m),
        };
        format!("<div class=\"notice {}\">{}</div>\n", class, text(message))
    }
}

fn tick(set: bool) -> &'static str {
    if set {
        "✅"
    } else {
        "❌"
    }
}

fn settings_panel(status: SettingsStatus) -> String {
    format!(
        "<aside>\n<h2>Settings</h2>\n\
         <p>These come from the secrets file or environment.</p>\n\
         <p>API set: {}</p>\n\
         <p>OCR key set: {}</p>\n\
         <p class=\"caption\">Tip: Even without OCR, text search works. \
         Add an OCR key later for better matches.</p>\n</aside>\n",
        tick(status.api_set),
        if status.ocr_key_set { "✅" } else { "❌ (optional)" },
    )
}

fn query_form(typed: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/search\" enctype=\"multipart/form-data\">\n\
         <label>Describe the part / symptoms / model\n\
         <input type=\"text\" name=\"q\" value=\"{}\" placeholder=\"{}\"></label>\n\
         <label>Optional photo (jpg/png)\n\
         <input type=\"file\" name=\"photo\" accept=\".jpg,.jpeg,.png\"></label>\n\
         <button type=\"submit\">Search</button>\n</form>\n",
        attr(typed),
        attr(QUERY_PLACEHOLDER)
    )
}

fn layout(status: SettingsStatus, typed: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n\
         <main>\n<h1>{title}</h1>\n<p>{intro}</p>\n{form}{body}</main>\n{panel}</body>\n</html>\n",
        title = text(PAGE_TITLE),
        style = STYLE,
        intro = text(INTRO),
        form = query_form(typed),
        body = body,
        panel = settings_panel(status),
    )
}

/// The empty form.
pub fn form_page(status: SettingsStatus) -> String {
    layout(status, "", "")
}

/// Result section for one submission, in display order.
pub fn report_body(report: &Report) -> String {
    let mut html = String::new();

    if let Some(preview) = &report.preview {
        let _ = writeln!(
            html,
            "<figure><img src=\"{}\" alt=\"Uploaded photo\" style=\"max-width:100%\">\
             <figcaption>Uploaded</figcaption></figure>",
            attr(&preview.data_url)
        );
    }

    if !report.ocr_text.is_empty() {
        let _ = writeln!(
            html,
            "<details><summary>OCR text found</summary><pre><code>{}</code></pre></details>",
            text(&report.ocr_text)
        );
    }

    for warning in &report.warnings {
        html.push_str(&Notice::Warning(warning.clone()).to_html());
    }

    match &report.resolution {
        Resolution::NothingToSearch => {
            html.push_str(&Notice::Warning(NOTHING_TO_SEARCH.to_string()).to_html());
        }
        Resolution::Found { query, count, items } => {
            let _ = writeln!(html, "<p>Searching for: <strong>{}</strong></p>", text(query));
            html.push_str(&Notice::Success(format!("Found {} result(s).", count)).to_html());
            for item in items {
                html.push_str(&ResultCard::from(item).to_html());
                html.push_str("<hr>\n");
            }
            if *count == 0 {
                html.push_str(&Notice::Info(NO_MATCHES_HINT.to_string()).to_html());
            }
        }
        Resolution::Failed { query, message } => {
            let _ = writeln!(html, "<p>Searching for: <strong>{}</strong></p>", text(query));
            html.push_str(&Notice::Error(format!("Search failed: {}", message)).to_html());
        }
    }

    html
}

/// The form, pre-filled with the typed text, followed by the results.
pub fn report_page(status: SettingsStatus, typed: &str, report: &Report) -> String {
    layout(status, typed, &report_body(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Preview;
    use crate::schema::SearchResultItem;
    use uuid::Uuid;

    fn report(resolution: Resolution) -> Report {
        Report {
            submission_id: Uuid::new_v4(),
            preview: None,
            ocr_text: String::new(),
            ocr_failed: false,
            warnings: Vec::new(),
            resolution,
        }
    }

    fn item(part_name: &str, mpn: &str, alt_mpn: Option<&str>) -> SearchResultItem {
        SearchResultItem {
            part_name: Some(part_name.to_string()),
            brand: Some("Vaillant".to_string()),
            mpn: Some(mpn.to_string()),
            alt_mpn: alt_mpn.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_form_page_shows_settings_flags_only() {
        let html = form_page(SettingsStatus { api_set: true, ocr_key_set: false });
        assert!(html.contains("API set: ✅"));
        assert!(html.contains("OCR key set: ❌ (optional)"));
        assert!(html.contains("name=\"q\""));
        assert!(html.contains("name=\"photo\""));
        assert!(html.contains("accept=\".jpg,.jpeg,.png\""));
        assert!(html.contains("PlumbID"));
    }

    #[test]
    fn test_found_two_results() {
        let html = report_body(&report(Resolution::Found {
            query: "Vaillant diverter valve 178978".into(),
            count: 2,
            items: vec![
                item("Diverter Valve", "178978", None),
                item("Gasket Kit", "178979", Some("N/A")),
            ],
        }));
        assert!(html.contains("Found 2 result(s)."));
        assert_eq!(html.matches("<article class=\"card\">").count(), 2);
        assert!(!html.contains("Alt MPN"));
        assert!(!html.contains(NO_MATCHES_HINT));
        let first = html.find("Diverter Valve").unwrap();
        let second = html.find("Gasket Kit").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_zero_results_hint() {
        let html = report_body(&report(Resolution::Found {
            query: "xyz".into(),
            count: 0,
            items: Vec::new(),
        }));
        assert!(html.contains("Found 0 result(s)."));
        assert!(html.contains(NO_MATCHES_HINT));
    }

    #[test]
    fn test_nothing_to_search() {
        let html = report_body(&report(Resolution::NothingToSearch));
        assert!(html.contains("Please type something or upload a photo."));
        assert!(!html.contains("Searching for"));
    }

    #[test]
    fn test_failure_renders_no_cards() {
        let html = report_body(&report(Resolution::Failed {
            query: "pcb".into(),
            message: "500 Internal Server Error from search API: boom".into(),
        }));
        assert!(html.contains("Search failed: 500 Internal Server Error from search API: boom"));
        assert!(!html.contains("<article"));
    }

    #[test]
    fn test_preview_ocr_text_and_warnings() {
        let mut r = report(Resolution::NothingToSearch);
        r.preview = Some(Preview {
            data_url: "data:image/png;base64,AAAA".into(),
            format: "image/png",
            width: 1,
            height: 1,
        });
        r.ocr_text = "VAILLANT <178978>".into();
        r.warnings.push("Could not process image: bad".into());

        let html = report_body(&r);
        assert!(html.contains("<figcaption>Uploaded</figcaption>"));
        assert!(html.contains("OCR text found"));
        assert!(html.contains("VAILLANT &lt;178978&gt;"));
        assert!(html.contains("class=\"notice warning\">Could not process image: bad"));
    }

    #[test]
    fn test_typed_text_is_escaped_into_form() {
        let html = report_page(
            SettingsStatus { api_set: false, ocr_key_set: false },
            "\"><script>",
            &report(Resolution::NothingToSearch),
        );
        assert!(!html.contains("\"><script>"));
        assert!(html.contains("API set: ❌"));
    }
}
