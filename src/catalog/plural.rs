//! Numerus (plural form) selection.

use crate::input::language::normalize_language_code;

/// Plural rule of a target language.
///
/// The rule decides how many `<numerusform>` entries a translation carries and
/// which of them a count selects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NumerusRule {
    /// No plural distinction (Japanese, Chinese, Korean, ...).
    Single,
    /// `n == 1` singular, everything else plural (English, German, ...).
    #[default]
    OneOther,
    /// `n <= 1` singular (French, Brazilian Portuguese).
    ZeroOneOther,
    /// `1`, `2..=4`, other (Czech, Slovak).
    Czech,
    /// `1`, `x2..=x4` except teens, other.
    Polish,
    /// `x1` except 11, `x2..=x4` except teens, other (Russian, Ukrainian, ...).
    EastSlavic,
    /// `x1` except 11, `x2..=x9` except teens, other.
    Lithuanian,
    /// `x1` except 11, nonzero, zero.
    Latvian,
    /// `1`, `0` or `x01..=x19`, other.
    Romanian,
    /// `x01`, `x02`, `x03..=x04`, other.
    Slovenian,
}

impl NumerusRule {
    /// Rule for a language code such as `cs_CZ`, `pt-BR` or `de`.
    ///
    /// Unknown languages get the English rule.
    #[must_use]
    pub fn for_language(code: &str) -> Self {
        let normalized = normalize_language_code(code);
        if normalized == "pt_br" {
            return Self::ZeroOneOther;
        }
        let language = normalized.split('_').next().unwrap_or_default();
        match language {
            "ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" | "tr" | "fa" => Self::Single,
            "fr" => Self::ZeroOneOther,
            "cs" | "sk" => Self::Czech,
            "pl" => Self::Polish,
            "ru" | "uk" | "be" | "sr" | "hr" | "bs" => Self::EastSlavic,
            "lt" => Self::Lithuanian,
            "lv" => Self::Latvian,
            "ro" => Self::Romanian,
            "sl" => Self::Slovenian,
            _ => Self::OneOther,
        }
    }

    /// Number of forms a complete translation carries.
    #[must_use]
    pub const fn form_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::OneOther | Self::ZeroOneOther => 2,
            Self::Czech
            | Self::Polish
            | Self::EastSlavic
            | Self::Lithuanian
            | Self::Latvian
            | Self::Romanian => 3,
            Self::Slovenian => 4,
        }
    }

    /// Index of the form used for count `n`.
    #[must_use]
    pub const fn form_index(self, n: i64) -> usize {
        let n = n.unsigned_abs();
        let (n10, n100) = (n % 10, n % 100);
        let teen = n100 >= 12 && n100 <= 14;
        match self {
            Self::Single => 0,
            Self::OneOther => {
                if n == 1 { 0 } else { 1 }
            }
            Self::ZeroOneOther => {
                if n <= 1 { 0 } else { 1 }
            }
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
            Self::Polish => {
                if n == 1 {
                    0
                } else if n10 >= 2 && n10 <= 4 && !teen {
                    1
                } else {
                    2
                }
            }
            Self::EastSlavic => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n10 >= 2 && n10 <= 4 && !teen {
                    1
                } else {
                    2
                }
            }
            Self::Lithuanian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n10 >= 2 && (n100 < 10 || n100 >= 20) {
                    1
                } else {
                    2
                }
            }
            Self::Latvian => {
                if n10 == 1 && n100 != 11 {
                    0
                } else if n != 0 {
                    1
                } else {
                    2
                }
            }
            Self::Romanian => {
                if n == 1 {
                    0
                } else if n == 0 || (n100 >= 1 && n100 <= 19) {
                    1
                } else {
                    2
                }
            }
            Self::Slovenian => match n100 {
                1 => 0,
                2 => 1,
                3 | 4 => 2,
                _ => 3,
            },
        }
    }
}
