//! Several installed catalogs queried as one.

use super::args::substitute_count;
use super::table::Catalog;

/// Installed catalogs, queried most recently installed first.
///
/// An application typically installs its own catalog and then one per
/// plugin; the first catalog with an entry answers.
#[derive(Debug, Clone, Default)]
pub struct TranslatorStack {
    catalogs: Vec<Catalog>,
}

impl TranslatorStack {
    #[must_use]
    pub fn new() -> Self {
        Self { catalogs: Vec::new() }
    }

    /// Installs a catalog on top of the stack.
    pub fn install(&mut self, catalog: Catalog) {
        tracing::debug!(name = catalog.name(), entries = catalog.len(), "Installing catalog");
        self.catalogs.push(catalog);
    }

    /// Removes the most recently installed catalog with this name.
    pub fn remove(&mut self, name: &str) -> Option<Catalog> {
        let index = self.catalogs.iter().rposition(|catalog| catalog.name() == name)?;
        tracing::debug!(name, "Removing catalog");
        Some(self.catalogs.remove(index))
    }

    /// Installed catalogs, top of the stack first.
    pub fn catalogs(&self) -> impl Iterator<Item = &Catalog> {
        self.catalogs.iter().rev()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.catalogs.is_empty()
    }

    /// First active translation among the installed catalogs.
    #[must_use]
    pub fn find(&self, context: &str, source: &str, disambiguation: Option<&str>) -> Option<&str> {
        self.catalogs().find_map(|catalog| catalog.find(context, source, disambiguation))
    }

    /// Translation of a message, or `source` itself when no catalog has one.
    #[must_use]
    pub fn translate<'a>(
        &'a self,
        context: &str,
        source: &'a str,
        disambiguation: Option<&str>,
    ) -> &'a str {
        self.find(context, source, disambiguation).unwrap_or(source)
    }

    /// Plural translation for count `n`, each catalog applying its own rule.
    #[must_use]
    pub fn translate_plural(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        n: i64,
    ) -> String {
        let text = self
            .catalogs()
            .find_map(|catalog| catalog.find_plural(context, source, disambiguation, n))
            .unwrap_or(source);
        substitute_count(text, n)
    }
}
