//! Catalog validation and translation statistics.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::ops::AddAssign;

use crate::catalog::{
    NumerusRule,
    placeholders,
};
use crate::config::{
    DiagnosticsConfig,
    Severity,
};
use crate::input::{
    Message,
    TranslationBody,
    TranslationKind,
    TsDocument,
};
use crate::types::Location;

/// Message counts of a document, by translation state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub finished: usize,
    /// Unfinished messages that already carry text.
    pub unfinished: usize,
    pub vanished: usize,
    pub obsolete: usize,
    /// Active messages without any text.
    pub untranslated: usize,
}

impl CatalogStats {
    #[must_use]
    pub fn from_document(document: &TsDocument) -> Self {
        let mut stats = Self::default();
        for (_, message) in document.messages() {
            let translation = &message.translation;
            match translation.kind {
                TranslationKind::Vanished => stats.vanished += 1,
                TranslationKind::Obsolete => stats.obsolete += 1,
                _ if translation.is_empty() => stats.untranslated += 1,
                TranslationKind::Unfinished => stats.unfinished += 1,
                TranslationKind::Finished => stats.finished += 1,
            }
        }
        stats
    }

    /// Messages still referenced by the code.
    #[must_use]
    pub const fn active(&self) -> usize {
        self.finished + self.unfinished + self.untranslated
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.active() + self.vanished + self.obsolete
    }

    /// Finished share of the active messages, in tenths of a percent.
    #[must_use]
    pub const fn completion_permille(&self) -> usize {
        let active = self.active();
        if active == 0 {
            return 1000;
        }
        self.finished * 1000 / active
    }
}

impl AddAssign for CatalogStats {
    fn add_assign(&mut self, other: Self) {
        self.finished += other.finished;
        self.unfinished += other.unfinished;
        self.vanished += other.vanished;
        self.obsolete += other.obsolete;
        self.untranslated += other.untranslated;
    }
}

impl fmt::Display for CatalogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} finished, {} unfinished, {} untranslated, {} vanished, {} obsolete ({}.{}% done)",
            self.finished,
            self.unfinished,
            self.untranslated,
            self.vanished,
            self.obsolete,
            self.completion_permille() / 10,
            self.completion_permille() % 10
        )
    }
}

/// Kind of problem a [`Diagnostic`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    Placeholders,
    Accelerators,
    Punctuation,
    Numerus,
    Duplicates,
}

impl DiagnosticCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Placeholders => "placeholder-mismatch",
            Self::Accelerators => "accelerator-mismatch",
            Self::Punctuation => "punctuation-mismatch",
            Self::Numerus => "numerus-form-count",
            Self::Duplicates => "conflicting-duplicate",
        }
    }

    const fn severity(self, config: &DiagnosticsConfig) -> Severity {
        match self {
            Self::Placeholders => config.placeholders,
            Self::Accelerators => config.accelerators,
            Self::Punctuation => config.punctuation,
            Self::Numerus => config.numerus,
            Self::Duplicates => config.duplicates,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One finding about a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub context: String,
    pub source: String,
    /// First `<location>` of the message, if any.
    pub location: Option<Location>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.severity)?;
        if let Some(location) = &self.location {
            write!(f, "{location}: ")?;
        }
        write!(f, "[{}] {:?}: {} ({})", self.context, self.source, self.message, self.code)
    }
}

/// Checks the active translations of `document`.
///
/// `language` selects the plural rule. Checks configured as
/// [`Severity::Off`] are skipped.
#[must_use]
pub fn validate_document(
    document: &TsDocument,
    language: &str,
    config: &DiagnosticsConfig,
) -> Vec<Diagnostic> {
    let rule = NumerusRule::for_language(language);
    let mut diagnostics = Vec::new();

    for context in &document.contexts {
        let mut seen: HashMap<(&str, &str), &TranslationBody> = HashMap::new();

        for message in &context.messages {
            let translation = &message.translation;
            if !translation.kind.is_active() || translation.is_empty() {
                continue;
            }

            let mut report = |code: DiagnosticCode, text: String| {
                let severity = code.severity(config);
                if severity != Severity::Off {
                    diagnostics.push(Diagnostic {
                        severity,
                        code,
                        context: context.name.clone(),
                        source: message.source.clone(),
                        location: message.locations.first().cloned(),
                        message: text,
                    });
                }
            };

            for form in translated_forms(message) {
                check_form(&message.source, form, &mut report);
            }

            if let TranslationBody::Numerus(forms) = &translation.body
                && forms.len() != rule.form_count()
            {
                report(
                    DiagnosticCode::Numerus,
                    format!(
                        "Translation has {} plural forms, '{language}' uses {}",
                        forms.len(),
                        rule.form_count()
                    ),
                );
            }

            let key = (message.source.as_str(), message.disambiguation());
            match seen.entry(key) {
                Entry::Occupied(first) if **first.get() != translation.body => {
                    report(
                        DiagnosticCode::Duplicates,
                        "Translated differently by an earlier message".to_string(),
                    );
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert(&translation.body);
                }
            }
        }
    }

    tracing::debug!(diagnostics = diagnostics.len(), "Validated document");
    diagnostics
}

/// Whether any diagnostic is an error.
#[must_use]
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|diagnostic| diagnostic.severity == Severity::Error)
}

fn translated_forms(message: &Message) -> Vec<&str> {
    match &message.translation.body {
        TranslationBody::Text(text) => vec![text.as_str()],
        TranslationBody::Numerus(forms) => {
            forms.iter().map(String::as_str).filter(|form| !form.is_empty()).collect()
        }
    }
}

fn check_form(source: &str, translation: &str, report: &mut impl FnMut(DiagnosticCode, String)) {
    let expected = placeholders(source);
    let found = placeholders(translation);
    if expected != found {
        report(
            DiagnosticCode::Placeholders,
            format!("Placeholders differ: source uses {expected:?}, translation uses {found:?}"),
        );
    }

    let source_accelerator = has_accelerator(source);
    if source_accelerator != has_accelerator(translation) {
        let side = if source_accelerator { "translation" } else { "source" };
        report(DiagnosticCode::Accelerators, format!("Keyboard accelerator missing in {side}"));
    }

    let source_end = ending_punctuation(source);
    let translation_end = ending_punctuation(translation);
    if source_end != translation_end {
        report(
            DiagnosticCode::Punctuation,
            format!(
                "Ending punctuation differs: {} vs {}",
                describe_ending(source_end),
                describe_ending(translation_end)
            ),
        );
    }
}

/// `&` followed by a character other than `&` or whitespace. `&&` is a literal ampersand.
fn has_accelerator(text: &str) -> bool {
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '&' {
            continue;
        }
        match chars.next() {
            Some('&') | None => {}
            Some(next) if !next.is_whitespace() => return true,
            Some(_) => {}
        }
    }
    false
}

/// Final sentence punctuation, full-width forms folded to ASCII and `…` to `.`.
fn ending_punctuation(text: &str) -> Option<char> {
    match text.trim_end().chars().next_back()? {
        '.' | '…' | '。' => Some('.'),
        ':' | '：' => Some(':'),
        '?' | '？' => Some('?'),
        '!' | '！' => Some('!'),
        _ => None,
    }
}

fn describe_ending(ending: Option<char>) -> String {
    ending.map_or_else(|| "none".to_string(), |c| format!("'{c}'"))
}
