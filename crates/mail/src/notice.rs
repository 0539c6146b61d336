//! Delay-notice email rendering.

use chrono::NaiveDate;

/// Everything the delay-notice email shows.
#[derive(Debug, Clone)]
pub struct DelayNoticeEmail<'a> {
    pub project_number: Option<&'a str>,
    pub project_name: Option<&'a str>,
    pub title: &'a str,
    pub description: &'a str,
    pub incident_date: NaiveDate,
    pub reported_date: Option<NaiveDate>,
    pub company_name: &'a str,
}

impl DelayNoticeEmail<'_> {
    /// `Delay Notice - {project_number} - {title}`.
    pub fn subject(&self) -> String {
        format!(
            "Delay Notice - {} - {}",
            self.project_number.unwrap_or_default(),
            self.title
        )
        .trim()
        .to_string()
    }

    pub fn html(&self) -> String {
        let project = match (self.project_number, self.project_name) {
            (Some(number), Some(name)) => format!("{} \u{2014} {}", escape(number), escape(name)),
            (Some(number), None) => escape(number),
            (None, Some(name)) => escape(name),
            (None, None) => String::new(),
        };
        let reported = self
            .reported_date
            .map(|d| d.to_string())
            .unwrap_or_default();

        format!(
            "<div style=\"font-family: system-ui, -apple-system, Segoe UI, Roboto, Helvetica, Arial;\">\n\
             <h2>Delay Notice</h2>\n\
             <p><strong>Project:</strong> {project}</p>\n\
             <p><strong>Incident Date:</strong> {incident}</p>\n\
             <p><strong>Reported Date:</strong> {reported}</p>\n\
             <hr />\n\
             <p>{description}</p>\n\
             <hr />\n\
             <p>Sent by {company}.</p>\n\
             </div>\n",
            incident = self.incident_date,
            description = escape(self.description).replace("\r\n", "\n").replace('\n', "<br/>"),
            company = escape(self.company_name),
        )
    }
}

/// Escape text for inclusion in HTML element content.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email<'a>(description: &'a str) -> DelayNoticeEmail<'a> {
        DelayNoticeEmail {
            project_number: Some("24-118"),
            project_name: Some("Tower A"),
            title: "Glass on backorder",
            description,
            incident_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            reported_date: None,
            company_name: "ARC Glazing",
        }
    }

    #[test]
    fn subject_names_project_and_title() {
        assert_eq!(
            email("").subject(),
            "Delay Notice - 24-118 - Glass on backorder"
        );
    }

    #[test]
    fn body_escapes_and_breaks_lines() {
        let html = email("Line one\n<script>x</script> & more").html();
        assert!(html.contains("Line one<br/>&lt;script&gt;x&lt;/script&gt; &amp; more"));
        assert!(html.contains("24-118 \u{2014} Tower A"));
        assert!(html.contains("<strong>Incident Date:</strong> 2024-03-05"));
        assert!(html.contains("<strong>Reported Date:</strong> </p>"));
        assert!(html.contains("Sent by ARC Glazing."));
    }
}
