//! Catalog language detection.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use super::document::TsDocument;

/// Locale codes Qt ships translations for, plus their bare languages.
static LANGUAGE_CODES: LazyLock<HashSet<String>> = LazyLock::new(|| {
    [
        "ar", "ar_SA", "bg", "bg_BG", "ca", "ca_ES", "cs", "cs_CZ", "da", "da_DK", "de", "de_AT",
        "de_CH", "de_DE", "el", "el_GR", "en", "en_GB", "en_US", "es", "es_ES", "es_MX", "et",
        "et_EE", "fa", "fa_IR", "fi", "fi_FI", "fr", "fr_CA", "fr_FR", "gl", "gl_ES", "he",
        "he_IL", "hr", "hr_HR", "hu", "hu_HU", "id", "id_ID", "it", "it_IT", "ja", "ja_JP", "ko",
        "ko_KR", "lt", "lt_LT", "lv", "lv_LV", "nb", "nb_NO", "nl", "nl_NL", "nn", "nn_NO", "pl",
        "pl_PL", "pt", "pt_BR", "pt_PT", "ro", "ro_RO", "ru", "ru_RU", "sk", "sk_SK", "sl",
        "sl_SI", "sr", "sr_RS", "sv", "sv_SE", "th", "th_TH", "tr", "tr_TR", "uk", "uk_UA", "vi",
        "vi_VN", "zh", "zh_CN", "zh_TW",
    ]
    .iter()
    .map(|code| normalize_language_code(code))
    .collect()
});

/// Normalize language code (lowercase and replace - with _)
#[must_use]
pub fn normalize_language_code(code: &str) -> String {
    code.to_lowercase().replace('-', "_")
}

fn is_language_code(candidate: &str) -> bool {
    !candidate.is_empty() && LANGUAGE_CODES.contains(&normalize_language_code(candidate))
}

/// Detect language from file path heuristically
///
/// Splits the path by '/' and '.', then searches backwards for a part that
/// ends with a known language code. Prefixes separated by '-' or '_' are
/// skipped, so plugin catalogs like `notesplugin-cs_cz.ts` and Qt's usual
/// `app_cs_CZ.ts` naming are recognized.
///
/// # Examples
/// - `translations/cs_cz.ts` → `cs_cz`
/// - `plugins/Notes/translations/notesplugin-cs_cz.ts` → `cs_cz`
/// - `translations/3DimViewer_cs_CZ.ts` → `cs_cz`
/// - `i18n/de/app.ts` → `de`
///
/// # Returns
/// Normalized language code or "unknown"
#[must_use]
pub fn detect_language_from_path(file_path: &Path) -> String {
    let path_str = file_path.to_string_lossy();
    let parts: Vec<&str> = path_str.split(['/', '\\', '.']).collect();

    for part in parts.iter().rev() {
        let mut candidate = *part;
        loop {
            if is_language_code(candidate) {
                return normalize_language_code(candidate);
            }
            match candidate.split_once(['-', '_']) {
                Some((_, rest)) => candidate = rest,
                None => break,
            }
        }
    }

    "unknown".to_string()
}

/// Language of a loaded catalog: the `language` attribute, else the path.
#[must_use]
pub fn document_language(document: &TsDocument, file_path: &Path) -> String {
    document
        .language
        .as_deref()
        .filter(|language| !language.is_empty())
        .map_or_else(|| detect_language_from_path(file_path), ToString::to_string)
}
