//! In-memory model of a Qt Linguist `.ts` catalog.

use std::fmt;
use std::str::FromStr;

use crate::types::Location;

/// Format version written when a document is created from scratch.
pub const DEFAULT_TS_VERSION: &str = "2.1";

/// A whole `.ts` document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TsDocument {
    pub version: Option<String>,
    /// Target language, e.g. `cs_CZ`.
    pub language: Option<String>,
    pub source_language: Option<String>,
    /// Contexts in file order.
    pub contexts: Vec<Context>,
}

impl TsDocument {
    #[must_use]
    pub fn new(language: Option<String>, source_language: Option<String>) -> Self {
        Self {
            version: Some(DEFAULT_TS_VERSION.to_string()),
            language,
            source_language,
            contexts: Vec::new(),
        }
    }

    /// Returns the context with the given name, if present.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|context| context.name == name)
    }

    /// Appends a message, creating the context on first use.
    ///
    /// Messages are never merged: the same source may occur several times.
    pub fn push_message(&mut self, context: &str, message: Message) {
        if let Some(existing) = self.contexts.iter_mut().find(|c| c.name == context) {
            existing.messages.push(message);
        } else {
            let mut created = Context::new(context);
            created.messages.push(message);
            self.contexts.push(created);
        }
    }

    /// Iterates over every message together with its context name.
    pub fn messages(&self) -> impl Iterator<Item = (&str, &Message)> {
        self.contexts
            .iter()
            .flat_map(|context| context.messages.iter().map(|m| (context.name.as_str(), m)))
    }

    #[must_use]
    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|context| context.messages.len()).sum()
    }

    /// Drops vanished and obsolete messages, then contexts left empty.
    ///
    /// Returns the number of messages removed.
    pub fn purge_inactive(&mut self) -> usize {
        let before = self.message_count();
        for context in &mut self.contexts {
            context.messages.retain(|message| message.translation.kind.is_active());
        }
        self.contexts.retain(|context| !context.messages.is_empty());
        before - self.message_count()
    }
}

/// Messages of one UI class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub name: String,
    pub comment: Option<String>,
    pub messages: Vec<Message>,
}

impl Context {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), comment: None, messages: Vec::new() }
    }
}

/// A single translatable string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub id: Option<String>,
    /// `numerus="yes"`: the translation holds plural forms.
    pub numerus: bool,
    pub locations: Vec<Location>,
    pub source: String,
    pub old_source: Option<String>,
    /// Disambiguation text, `<comment>` in the file.
    pub comment: Option<String>,
    pub old_comment: Option<String>,
    /// Developer note for translators.
    pub extra_comment: Option<String>,
    pub translator_comment: Option<String>,
    pub translation: Translation,
}

impl Message {
    /// Creates an untranslated message, as an extraction tool would.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            translation: Translation {
                kind: TranslationKind::Unfinished,
                body: TranslationBody::default(),
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_translation(mut self, kind: TranslationKind, text: impl Into<String>) -> Self {
        self.translation = Translation { kind, body: TranslationBody::Text(text.into()) };
        self
    }

    #[must_use]
    pub fn with_numerus_forms(mut self, kind: TranslationKind, forms: Vec<String>) -> Self {
        self.numerus = true;
        self.translation = Translation { kind, body: TranslationBody::Numerus(forms) };
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub fn with_location(mut self, filename: impl Into<String>, line: u32) -> Self {
        self.locations.push(Location::new(filename, line));
        self
    }

    /// Disambiguation, with `None` and `""` treated alike.
    #[must_use]
    pub fn disambiguation(&self) -> &str {
        self.comment.as_deref().unwrap_or_default()
    }
}

/// `<translation>` element: state plus text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translation {
    pub kind: TranslationKind,
    pub body: TranslationBody,
}

impl Translation {
    /// True when no text has been entered (all plural forms empty as well).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match &self.body {
            TranslationBody::Text(text) => text.is_empty(),
            TranslationBody::Numerus(forms) => forms.iter().all(String::is_empty),
        }
    }

    /// Single-form text. For plural messages this is the first form.
    #[must_use]
    pub fn text(&self) -> &str {
        match &self.body {
            TranslationBody::Text(text) => text,
            TranslationBody::Numerus(forms) => forms.first().map_or("", String::as_str),
        }
    }
}

/// Value of the `type` attribute on `<translation>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TranslationKind {
    /// No `type` attribute.
    #[default]
    Finished,
    Unfinished,
    /// Source string no longer referenced by the code.
    Vanished,
    Obsolete,
}

impl TranslationKind {
    /// Vanished and obsolete entries are history only and never used at runtime.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Finished | Self::Unfinished)
    }

    /// Attribute value, `None` for finished translations.
    #[must_use]
    pub const fn as_attribute(self) -> Option<&'static str> {
        match self {
            Self::Finished => None,
            Self::Unfinished => Some("unfinished"),
            Self::Vanished => Some("vanished"),
            Self::Obsolete => Some("obsolete"),
        }
    }
}

impl fmt::Display for TranslationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_attribute().unwrap_or("finished"))
    }
}

impl FromStr for TranslationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unfinished" => Ok(Self::Unfinished),
            "vanished" => Ok(Self::Vanished),
            "obsolete" => Ok(Self::Obsolete),
            other => Err(other.to_string()),
        }
    }
}

/// Translation text: one string, or one string per plural form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationBody {
    Text(String),
    Numerus(Vec<String>),
}

impl Default for TranslationBody {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::finished(TranslationKind::Finished, true)]
    #[case::unfinished(TranslationKind::Unfinished, true)]
    #[case::vanished(TranslationKind::Vanished, false)]
    #[case::obsolete(TranslationKind::Obsolete, false)]
    fn test_kind_is_active(#[case] kind: TranslationKind, #[case] expected: bool) {
        assert_that!(kind.is_active(), eq(expected));
    }

    #[rstest]
    #[case("unfinished", TranslationKind::Unfinished)]
    #[case("vanished", TranslationKind::Vanished)]
    #[case("obsolete", TranslationKind::Obsolete)]
    fn test_kind_from_attribute(#[case] value: &str, #[case] expected: TranslationKind) {
        assert_eq!(value.parse::<TranslationKind>(), Ok(expected));
    }

    #[googletest::test]
    fn test_kind_rejects_unknown_attribute() {
        expect_that!("finished".parse::<TranslationKind>(), err(eq("finished")));
    }

    #[googletest::test]
    fn test_push_message_keeps_duplicates() {
        let mut document = TsDocument::new(Some("cs_CZ".to_string()), Some("en".to_string()));
        document.push_message("MainWindow", Message::new("Exit"));
        document.push_message("MainWindow", Message::new("Exit"));
        document.push_message("CDataInfoDialog", Message::new("Patient Name"));

        expect_that!(document.contexts, len(eq(2)));
        expect_that!(document.context("MainWindow").unwrap().messages, len(eq(2)));
        expect_that!(document.message_count(), eq(3));
    }

    #[googletest::test]
    fn test_purge_inactive_drops_history_and_empty_contexts() {
        let mut document = TsDocument::default();
        document.push_message(
            "CCustomDockWidgetTitle",
            Message::new("Save slice").with_translation(TranslationKind::Vanished, "Uložit řez"),
        );
        document.push_message(
            "MainWindow",
            Message::new("Exit").with_translation(TranslationKind::Finished, "Ukončit program"),
        );
        document.push_message(
            "MainWindow",
            Message::new("Close").with_translation(TranslationKind::Obsolete, "Zavřít"),
        );

        let removed = document.purge_inactive();

        expect_that!(removed, eq(2));
        expect_that!(document.contexts, len(eq(1)));
        expect_that!(document.contexts[0].name, eq("MainWindow"));
    }

    #[googletest::test]
    fn test_translation_is_empty_for_numerus() {
        let message = Message::new("%n file(s)")
            .with_numerus_forms(TranslationKind::Unfinished, vec![String::new(), String::new()]);
        expect_that!(message.translation.is_empty(), eq(true));

        let message = Message::new("%n file(s)").with_numerus_forms(
            TranslationKind::Finished,
            vec!["%n soubor".to_string(), "%n soubory".to_string()],
        );
        expect_that!(message.translation.is_empty(), eq(false));
        expect_that!(message.translation.text(), eq("%n soubor"));
    }
}
