use chrono::{DateTime, Local};

/// One labeled block of scanner output, kept as the raw bytes the scanner
/// wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection {
    pub label: String,
    pub content: Vec<u8>,
}

/// The consolidated report: one section per phase whose artifact exists, in
/// the aggregator's fixed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
    pub generated_at: DateTime<Local>,
    pub sections: Vec<ReportSection>,
}

impl ReportDocument {
    pub fn new(generated_at: DateTime<Local>) -> Self {
        Self {
            generated_at,
            sections: Vec::new(),
        }
    }

    pub fn push_section(&mut self, label: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.sections.push(ReportSection {
            label: label.into(),
            content: content.into(),
        });
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.label.as_str())
    }

    /// Render as a self-contained HTML page. Section content is copied
    /// byte for byte into `<pre>` blocks, whatever its encoding.
    pub fn render_html(&self) -> Vec<u8> {
        let mut html = Vec::new();
        html.extend_from_slice(b"<html><head><title>Nuclei Report</title></head><body>");
        html.extend_from_slice(
            format!(
                "<h1>Nuclei Scan Report - {}</h1>",
                self.generated_at.format("%Y-%m-%d %H:%M:%S")
            )
            .as_bytes(),
        );
        for section in &self.sections {
            html.extend_from_slice(
                format!("<h2>{} Results</h2><pre>", section.label.to_uppercase()).as_bytes(),
            );
            html.extend_from_slice(&section.content);
            html.extend_from_slice(b"</pre>");
        }
        html.extend_from_slice(b"</body></html>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn generated_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_render_empty_document() {
        let doc = ReportDocument::new(generated_at());
        assert_eq!(
            doc.render_html(),
            b"<html><head><title>Nuclei Report</title></head><body>\
              <h1>Nuclei Scan Report - 2025-01-02 03:04:05</h1></body></html>"
        );
    }

    #[test]
    fn test_render_sections_in_order() {
        let mut doc = ReportDocument::new(generated_at());
        doc.push_section("info", "[tech-detect] http://example.test\n");
        doc.push_section("medium_high_critical", "");

        let html = String::from_utf8(doc.render_html()).unwrap();
        let info = html.find("<h2>INFO Results</h2><pre>[tech-detect] http://example.test\n</pre>");
        let mhc = html.find("<h2>MEDIUM_HIGH_CRITICAL Results</h2><pre></pre>");
        assert!(info.is_some());
        assert!(mhc.is_some());
        assert!(info < mhc);
        assert_eq!(doc.labels().collect::<Vec<_>>(), vec!["info", "medium_high_critical"]);
    }

    #[test]
    fn test_render_keeps_non_utf8_bytes() {
        let raw = b"finding \xff\xfe latin1 \xe9\n".to_vec();
        let mut doc = ReportDocument::new(generated_at());
        doc.push_section("info", raw.clone());

        let html = doc.render_html();
        let mut expected = b"<h2>INFO Results</h2><pre>".to_vec();
        expected.extend_from_slice(&raw);
        expected.extend_from_slice(b"</pre>");
        assert!(html.windows(expected.len()).any(|w| w == expected.as_slice()));
    }
}
