//! Result cards.

use super::{attr, text};
use crate::schema::SearchResultItem;
use std::fmt::Write;

const UNKNOWN_TITLE: &str = "(unknown)";

/// Display model for one search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub title: String,
    pub brand: String,
    pub mpn: String,
    pub alt_mpn: Option<String>,
    pub category: String,
    pub description: Option<String>,
    pub compatible_models: Option<String>,
    pub datasheet_url: Option<String>,
    pub image_url: Option<String>,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Only http(s) targets are rendered as links or images.
fn web_url(value: &Option<String>) -> Option<String> {
    present(value).filter(|u| {
        let lower = u.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    })
}

impl From<&SearchResultItem> for ResultCard {
    fn from(item: &SearchResultItem) -> Self {
        Self {
            title: present(&item.part_name).unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            brand: item.brand.clone().unwrap_or_default(),
            mpn: item.mpn.clone().unwrap_or_default(),
            alt_mpn: item.alt_mpn_display().map(str::to_string),
            category: item.category.clone().unwrap_or_default(),
            description: present(&item.description),
            compatible_models: present(&item.compatible_models),
            datasheet_url: web_url(&item.datasheet_url),
            image_url: web_url(&item.image_url),
        }
    }
}

impl ResultCard {
    /// Two-region card: media on the left, details on the right.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<article class=\"card\">\n<div class=\"media\">");

        // A broken image hides itself and reveals the placeholder.
        match &self.image_url {
            Some(url) => {
                let _ = write!(
                    html,
                    "<img src=\"{}\" alt=\"{}\" loading=\"lazy\" \
                     onerror=\"this.hidden=true;this.nextElementSibling.hidden=false\">\
                     <p class=\"no-image\" hidden>No image</p>",
                    attr(url),
                    attr(&self.title)
                );
            }
            None => html.push_str("<p class=\"no-image\">No image</p>"),
        }

        html.push_str("</div>\n<div class=\"details\">\n");
        let _ = writeln!(html, "<h3>{}</h3>", text(&self.title));
        let _ = writeln!(html, "<p><strong>Brand:</strong> {}</p>", text(&self.brand));
        let _ = writeln!(html, "<p><strong>MPN:</strong> {}</p>", text(&self.mpn));
        if let Some(alt) = &self.alt_mpn {
            let _ = writeln!(html, "<p><strong>Alt MPN:</strong> {}</p>", text(alt));
        }
        let _ = writeln!(html, "<p><strong>Category:</strong> {}</p>", text(&self.category));
        if let Some(desc) = &self.description {
            let _ = writeln!(html, "<p>{}</p>", text(desc));
        }
        if let Some(comp) = &self.compatible_models {
            let _ = writeln!(html, "<p class=\"caption\">Compatible: {}</p>", text(comp));
        }
        if let Some(ds) = &self.datasheet_url {
            let _ = writeln!(
                html,
                "<a class=\"button\" href=\"{}\" target=\"_blank\" rel=\"noopener\">Open datasheet</a>",
                attr(ds)
            );
        }
        html.push_str("</div>\n</article>\n");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(part_name: &str, brand: &str, mpn: &str) -> SearchResultItem {
        SearchResultItem {
            part_name: Some(part_name.to_string()),
            brand: Some(brand.to_string()),
            mpn: Some(mpn.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_card() {
        let mut it = item("Diverter Valve", "Vaillant", "178978");
        it.alt_mpn = Some("0020025297".into());
        it.category = Some("Valves".into());
        it.description = Some("Replacement diverter <valve>".into());
        it.compatible_models = Some("ecoTEC plus 831, 835".into());
        it.datasheet_url = Some("https://example.com/ds.pdf?a=1&b=2".into());
        it.image_url = Some("https://example.com/valve.jpg".into());

        let html = ResultCard::from(&it).to_html();
        assert!(html.contains("<h3>Diverter Valve</h3>"));
        assert!(html.contains("<strong>Brand:</strong> Vaillant"));
        assert!(html.contains("<strong>MPN:</strong> 178978"));
        assert!(html.contains("<strong>Alt MPN:</strong> 0020025297"));
        assert!(html.contains("<strong>Category:</strong> Valves"));
        assert!(html.contains("Replacement diverter &lt;valve&gt;"));
        assert!(html.contains("Compatible: ecoTEC plus 831, 835"));
        assert!(html.contains("href=\"https://example.com/ds.pdf?a=1&amp;b=2\""));
        assert!(html.contains("Open datasheet"));
        assert!(html.contains("<img src=\"https://example.com/valve.jpg\""));
        assert!(html.contains("onerror="));
    }

    #[test]
    fn test_minimal_card() {
        let card = ResultCard::from(&SearchResultItem::default());
        assert_eq!(card.title, "(unknown)");

        let html = card.to_html();
        assert!(html.contains("<h3>(unknown)</h3>"));
        assert!(html.contains("<p class=\"no-image\">No image</p>"));
        assert!(html.contains("<strong>Brand:</strong> "));
        assert!(html.contains("<strong>MPN:</strong> "));
        assert!(html.contains("<strong>Category:</strong> "));
        assert!(!html.contains("Alt MPN"));
        assert!(!html.contains("Compatible:"));
        assert!(!html.contains("Open datasheet"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_alt_mpn_sentinel_hidden() {
        for alt in ["N/A", "n/a", ""] {
            let mut it = item("Gasket Kit", "Vaillant", "178979");
            it.alt_mpn = Some(alt.to_string());
            assert!(!ResultCard::from(&it).to_html().contains("Alt MPN"));
        }
    }

    #[test]
    fn test_blank_title_falls_back() {
        let card = ResultCard::from(&item("   ", "Worcester", "87161"));
        assert_eq!(card.title, "(unknown)");
    }

    #[test]
    fn test_non_web_urls_are_dropped() {
        let mut it = item("PCB", "Ideal", "174486");
        it.datasheet_url = Some("javascript:alert(1)".into());
        it.image_url = Some("file:///etc/passwd".into());
        let card = ResultCard::from(&it);
        assert_eq!(card.datasheet_url, None);
        assert_eq!(card.image_url, None);
    }
}
