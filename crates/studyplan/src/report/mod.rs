//! Offline HTML report of the session state.

mod html;

pub use html::render;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

const MONTHS_TR: [&str; 12] = [
    "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos", "Eylül", "Ekim",
    "Kasım", "Aralık",
];

/// `calisma-raporu-YYYY-MM-DD.html`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("calisma-raporu-{}.html", date.format("%Y-%m-%d"))
}

/// Long Turkish date with time, e.g. `19 Ekim 2026 14:30`.
pub fn format_report_date(at: NaiveDateTime) -> String {
    format!(
        "{} {} {} {:02}:{:02}",
        at.day(),
        MONTHS_TR[at.month0() as usize],
        at.year(),
        at.hour(),
        at.minute()
    )
}

/// Escapes text for HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(report_file_name(date), "calisma-raporu-2026-03-07.html");
    }

    #[test]
    fn test_format_report_date() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(14, 30, 5)
            .unwrap();
        assert_eq!(format_report_date(at), "19 Ekim 2026 14:30");

        let at = NaiveDate::from_ymd_opt(2027, 2, 1)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        assert_eq!(format_report_date(at), "1 Şubat 2027 09:05");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x" & 'y')</script>"#),
            "&lt;script&gt;alert(&quot;x&quot; &amp; &#39;y&#39;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("Türev & İntegral"), "Türev &amp; İntegral");
        assert_eq!(escape_html("düz metin"), "düz metin");
    }
}
