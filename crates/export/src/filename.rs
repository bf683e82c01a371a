//! Download filename derivation

use cv_model::DownloadLayout;
use regex_lite::Regex;
use std::sync::OnceLock;

fn disallowed_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]").expect("valid filename pattern"))
}

/// Whitespace runs become `_`, then anything outside `[A-Za-z0-9_-]` is dropped
pub fn sanitize_name_part(part: &str) -> String {
    let joined = part.split_whitespace().collect::<Vec<_>>().join("_");
    disallowed_chars().replace_all(&joined, "").into_owned()
}

/// `{first}_{last}_{layout}_cv.pdf`, omitting empty name parts
pub fn export_filename(first_name: &str, last_name: &str, layout: DownloadLayout) -> String {
    let parts: Vec<String> = [first_name, last_name]
        .iter()
        .map(|part| sanitize_name_part(part))
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        format!("{}_cv.pdf", layout)
    } else {
        format!("{}_{}_cv.pdf", parts.join("_"), layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diacritics_are_stripped() {
        assert_eq!(
            export_filename("Ana María", "Ruíz-López", DownloadLayout::Classic),
            "Ana_Mara_Ruz-Lpez_classic_cv.pdf"
        );
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(sanitize_name_part("  Mary \t Ann  "), "Mary_Ann");
    }

    #[test]
    fn test_layout_only_fallback() {
        assert_eq!(export_filename("", "  ", DownloadLayout::Compact), "compact_cv.pdf");
        // Parts that sanitize to nothing are omitted as well
        assert_eq!(export_filename("李", "", DownloadLayout::Classic), "classic_cv.pdf");
    }

    #[test]
    fn test_single_part() {
        assert_eq!(
            export_filename("", "O'Neil", DownloadLayout::Compact),
            "ONeil_compact_cv.pdf"
        );
    }
}
