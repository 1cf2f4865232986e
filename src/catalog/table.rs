//! Read-only lookup table built from one catalog.

use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};

use super::args::substitute_count;
use super::plural::NumerusRule;
use crate::input::{
    TranslationBody,
    TranslationKind,
    TsDocument,
};

/// Which catalog entries become lookup entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LookupOptions {
    /// Use translations still marked `unfinished` (lrelease does by default).
    pub include_unfinished: bool,
    /// Skip translations identical to their source text.
    pub remove_identical: bool,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self { include_unfinished: true, remove_identical: false }
    }
}

/// One translated text for a `(source, disambiguation)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    disambiguation: String,
    body: TranslationBody,
}

/// Lookup table keyed on `(context, source, disambiguation)`.
///
/// Only active, non-empty translations are stored, so a miss always means
/// "fall back to the source text".
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    name: String,
    language: String,
    rule: NumerusRule,
    /// context → source → entries (one per disambiguation)
    entries: HashMap<String, HashMap<String, Vec<Entry>>>,
    len: usize,
}

impl Catalog {
    /// Builds the table from a parsed document.
    ///
    /// `name` identifies the catalog inside a [`super::TranslatorStack`].
    #[must_use]
    pub fn from_document(
        name: impl Into<String>,
        language: impl Into<String>,
        document: &TsDocument,
        options: LookupOptions,
    ) -> Self {
        let language = language.into();
        let mut catalog = Self {
            name: name.into(),
            rule: NumerusRule::for_language(&language),
            language,
            entries: HashMap::new(),
            len: 0,
        };

        let mut skipped = 0_usize;
        for (context, message) in document.messages() {
            let translation = &message.translation;
            let usable = translation.kind.is_active()
                && (options.include_unfinished || translation.kind != TranslationKind::Unfinished)
                && !translation.is_empty()
                && !(options.remove_identical
                    && matches!(&translation.body, TranslationBody::Text(text) if *text == message.source));
            if !usable {
                skipped += 1;
                continue;
            }

            let sources = catalog.entries.entry(context.to_string()).or_default();
            let entries = sources.entry(message.source.clone()).or_default();
            // Duplicate keys: the first usable message wins.
            if entries.iter().any(|entry| entry.disambiguation == message.disambiguation()) {
                tracing::trace!(context, source = %message.source, "Ignoring duplicate message");
                continue;
            }
            entries.push(Entry {
                disambiguation: message.disambiguation().to_string(),
                body: translation.body.clone(),
            });
            catalog.len += 1;
        }

        tracing::debug!(
            name = %catalog.name,
            language = %catalog.language,
            entries = catalog.len,
            skipped,
            "Built lookup table"
        );
        catalog
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub const fn numerus_rule(&self) -> NumerusRule {
        self.rule
    }

    /// Number of usable entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Finds the entry, retrying without disambiguation when it has none.
    fn entry(&self, context: &str, source: &str, disambiguation: Option<&str>) -> Option<&Entry> {
        let entries = self.entries.get(context)?.get(source)?;
        let disambiguation = disambiguation.unwrap_or_default();
        entries
            .iter()
            .find(|entry| entry.disambiguation == disambiguation)
            .or_else(|| {
                if disambiguation.is_empty() {
                    None
                } else {
                    entries.iter().find(|entry| entry.disambiguation.is_empty())
                }
            })
    }

    /// Active translation of a message, if there is one.
    ///
    /// For plural messages this is the first form. An empty first form counts
    /// as missing.
    #[must_use]
    pub fn find(&self, context: &str, source: &str, disambiguation: Option<&str>) -> Option<&str> {
        self.entry(context, source, disambiguation)
            .map(|entry| match &entry.body {
                TranslationBody::Text(text) => text.as_str(),
                TranslationBody::Numerus(forms) => forms.first().map_or("", String::as_str),
            })
            .filter(|text| !text.is_empty())
    }

    /// Translation of a plural message for count `n`, before `%n` substitution.
    ///
    /// The form index is clamped to the forms present. An empty selected form
    /// counts as missing.
    #[must_use]
    pub fn find_plural(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        n: i64,
    ) -> Option<&str> {
        let entry = self.entry(context, source, disambiguation)?;
        let text = match &entry.body {
            TranslationBody::Text(text) => text.as_str(),
            TranslationBody::Numerus(forms) => {
                let index = self.rule.form_index(n).min(forms.len().saturating_sub(1));
                forms.get(index).map(String::as_str)?
            }
        };
        (!text.is_empty()).then_some(text)
    }

    /// Translation of a message, or `source` itself when none is active.
    #[must_use]
    pub fn translate<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        disambiguation: Option<&str>,
    ) -> &'a str {
        self.find(context, source, disambiguation).unwrap_or(source)
    }

    /// Plural translation with `%n` replaced by the count.
    ///
    /// Falls back to the source text, also with `%n` replaced.
    #[must_use]
    pub fn translate_plural(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        n: i64,
    ) -> String {
        let text = self.find_plural(context, source, disambiguation, n).unwrap_or(source);
        substitute_count(text, n)
    }

    /// Context names with at least one usable entry.
    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
