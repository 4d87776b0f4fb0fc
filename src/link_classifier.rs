//! Deciding which hrefs on the schedule page point at schedule documents.
//!
//! Documents are published as `<day> <month>.pdf`, e.g. `5 сентября.pdf`.
//! The filename without its extension is the date token that keys every
//! later stage.

use std::fmt;

/// Extension a schedule document must carry (case-sensitive).
pub const SCHEDULE_EXTENSION: &str = "pdf";

/// Genitive month names as they appear in published filenames.
pub const MONTHS: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// `"<day> <month>"` taken from a schedule document filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateToken(String);

impl DateToken {
    /// Validates a filename stem as a date token.
    pub fn parse(filename: &str) -> Option<Self> {
        let mut words = filename.split_whitespace();
        let (Some(day), Some(month), None) = (words.next(), words.next(), words.next()) else {
            return None;
        };
        if day.is_empty() || !day.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if !MONTHS.contains(&month) {
            return None;
        }
        Some(Self(filename.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Splits the last path segment of `href` into `(stem, extension)`.
///
/// Anything other than exactly one `.` in the segment is rejected, so
/// `a.b.pdf` is not a schedule link.
fn split_filename(href: &str) -> Option<(&str, &str)> {
    let segment = href.rsplit('/').next()?;
    let mut parts = segment.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(stem), Some(extension), None) => Some((stem, extension)),
        _ => None,
    }
}

/// Date token of a schedule link, or `None` if `href` is not one.
pub fn extract_date_token(href: &str) -> Option<DateToken> {
    let (stem, extension) = split_filename(href)?;
    if extension != SCHEDULE_EXTENSION {
        return None;
    }
    DateToken::parse(stem)
}

pub fn is_schedule_link(href: &str) -> bool {
    extract_date_token(href).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://school.kco27.ru/wp-content/uploads/2023/09/";

    #[test]
    fn accepts_day_and_month_pdf() {
        let href = format!("{BASE}5 сентября.pdf");
        assert!(is_schedule_link(&href));
        let token = extract_date_token(&href).unwrap();
        assert_eq!(token.as_str(), "5 сентября");
    }

    #[test]
    fn accepts_every_month() {
        for month in MONTHS {
            assert!(is_schedule_link(&format!("{BASE}12 {month}.pdf")), "{month}");
        }
    }

    #[test]
    fn rejects_unknown_month() {
        assert!(!is_schedule_link(&format!("{BASE}5sep.pdf")));
        assert!(!is_schedule_link(&format!("{BASE}5 september.pdf")));
        assert!(!is_schedule_link(&format!("{BASE}5 Сентября.pdf")));
    }

    #[test]
    fn rejects_other_extensions() {
        assert!(!is_schedule_link(&format!("{BASE}5 сентября.PDF")));
        assert!(!is_schedule_link(&format!("{BASE}5 сентября.docx")));
        assert!(!is_schedule_link(&format!("{BASE}5 сентября")));
    }

    #[test]
    fn rejects_dotted_filenames() {
        assert!(!is_schedule_link("https://example.com/a.b.pdf"));
        assert!(!is_schedule_link(&format!("{BASE}5. сентября.pdf")));
        assert!(!is_schedule_link(&format!("{BASE}5 сентября.pdf.pdf")));
    }

    #[test]
    fn rejects_wrong_word_count() {
        assert!(!is_schedule_link(&format!("{BASE}сентября.pdf")));
        assert!(!is_schedule_link(&format!("{BASE}5 сентября 2023.pdf")));
        assert!(!is_schedule_link(&format!("{BASE}.pdf")));
    }

    #[test]
    fn rejects_non_digit_day() {
        assert!(!is_schedule_link(&format!("{BASE}пятое сентября.pdf")));
        assert!(!is_schedule_link(&format!("{BASE}5a сентября.pdf")));
        assert!(!is_schedule_link(&format!("{BASE}-5 сентября.pdf")));
    }

    #[test]
    fn relative_hrefs_classify_on_last_segment() {
        assert_eq!(
            extract_date_token("/uploads/14 октября.pdf").map(|t| t.to_string()),
            Some("14 октября".to_string())
        );
        assert!(is_schedule_link("1 марта.pdf"));
    }
}
