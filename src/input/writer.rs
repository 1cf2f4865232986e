//! [`TsDocument`] → `.ts` XML.

use std::path::Path;

use xmltree::{
    Element,
    EmitterConfig,
    XMLNode,
};

use super::document::{
    Context,
    Message,
    Translation,
    TranslationBody,
    TsDocument,
};
use super::error::TsError;
use crate::types::Location;

const HEADER: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n";

/// Serializes a catalog in the layout Qt's tools write.
pub fn write_document(document: &TsDocument) -> Result<String, TsError> {
    let root = document_element(document);

    let mut buffer = HEADER.as_bytes().to_vec();
    let config = EmitterConfig::new()
        .perform_indent(true)
        .indent_string("    ")
        .write_document_declaration(false);
    root.write_with_config(&mut buffer, config).map_err(|e| TsError::Write(e.to_string()))?;
    buffer.push(b'\n');

    String::from_utf8(buffer).map_err(|e| TsError::Write(e.to_string()))
}

/// Serializes a catalog and writes it to `path`.
pub fn save_document(path: &Path, document: &TsDocument) -> Result<(), TsError> {
    let xml = write_document(document)?;
    std::fs::write(path, xml)?;
    tracing::debug!(path = %path.display(), messages = document.message_count(), "Catalog saved");
    Ok(())
}

#[derive(Debug)]
struct ElementBuilder(Element);

impl ElementBuilder {
    fn new(tag: &str) -> Self {
        Self(Element::new(tag))
    }

    fn build(self) -> Element {
        self.0
    }

    fn attr_opt(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.0.attributes.insert(key.to_string(), value.to_string());
        }
        self
    }

    fn text(mut self, text: &str) -> Self {
        self.0.children.extend(text_nodes(text));
        self
    }

    fn child(mut self, child: Element) -> Self {
        self.0.children.push(XMLNode::Element(child));
        self
    }

    fn child_opt(self, tag: &str, text: Option<&str>) -> Self {
        match text {
            Some(text) => self.child(ElementBuilder::new(tag).text(text).build()),
            None => self,
        }
    }

    fn children<I: IntoIterator<Item = Element>>(mut self, children: I) -> Self {
        self.0.children.extend(children.into_iter().map(XMLNode::Element));
        self
    }
}

fn document_element(document: &TsDocument) -> Element {
    ElementBuilder::new("TS")
        .attr_opt("version", document.version.as_deref())
        .attr_opt("language", document.language.as_deref())
        .attr_opt("sourcelanguage", document.source_language.as_deref())
        .children(document.contexts.iter().map(context_element))
        .build()
}

fn context_element(context: &Context) -> Element {
    ElementBuilder::new("context")
        .child_opt("name", Some(context.name.as_str()))
        .child_opt("comment", context.comment.as_deref())
        .children(context.messages.iter().map(message_element))
        .build()
}

fn message_element(message: &Message) -> Element {
    ElementBuilder::new("message")
        .attr_opt("id", message.id.as_deref())
        .attr_opt("numerus", message.numerus.then_some("yes"))
        .children(message.locations.iter().map(location_element))
        .child_opt("source", Some(message.source.as_str()))
        .child_opt("oldsource", message.old_source.as_deref())
        .child_opt("comment", message.comment.as_deref())
        .child_opt("oldcomment", message.old_comment.as_deref())
        .child_opt("extracomment", message.extra_comment.as_deref())
        .child_opt("translatorcomment", message.translator_comment.as_deref())
        .child(translation_element(&message.translation))
        .build()
}

fn location_element(location: &Location) -> Element {
    let line = location.line.map(|line| line.to_string());
    ElementBuilder::new("location")
        .attr_opt("filename", location.filename.as_deref())
        .attr_opt("line", line.as_deref())
        .build()
}

fn translation_element(translation: &Translation) -> Element {
    let builder = ElementBuilder::new("translation").attr_opt("type", translation.kind.as_attribute());
    match &translation.body {
        TranslationBody::Text(text) => builder.text(text),
        TranslationBody::Numerus(forms) => builder.children(
            forms.iter().map(|form| ElementBuilder::new("numerusform").text(form).build()),
        ),
    }
    .build()
}

/// Splits text into XML-safe nodes.
///
/// Control characters other than tab, newline and carriage return are not
/// allowed in XML 1.0 and become `<byte value="xN"/>` elements.
fn text_nodes(text: &str) -> Vec<XMLNode> {
    let mut nodes = Vec::new();
    let mut pending = String::new();
    for ch in text.chars() {
        if ch < '\u{20}' && !matches!(ch, '\t' | '\n' | '\r') {
            if !pending.is_empty() {
                nodes.push(XMLNode::Text(std::mem::take(&mut pending)));
            }
            let value = format!("x{:x}", u32::from(ch));
            let byte = ElementBuilder::new("byte").attr_opt("value", Some(value.as_str())).build();
            nodes.push(XMLNode::Element(byte));
        } else {
            pending.push(ch);
        }
    }
    if !pending.is_empty() {
        nodes.push(XMLNode::Text(pending));
    }
    nodes
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::input::document::TranslationKind;
    use crate::input::reader::parse_document;

    fn sample_document() -> TsDocument {
        let mut document = TsDocument::new(Some("cs_CZ".to_string()), Some("en".to_string()));
        document.push_message(
            "CDataInfoDialog",
            Message::new("Patient Name")
                .with_location("../src/CDataInfoDialog.cpp", 80)
                .with_translation(TranslationKind::Finished, "Jméno pacienta"),
        );
        document.push_message(
            "CCustomDockWidgetTitle",
            Message::new("Save slice")
                .with_translation(TranslationKind::Vanished, "Uložit řez"),
        );
        document.push_message(
            "MainWindow",
            Message::new("%n file(s) loaded").with_comment("status bar").with_numerus_forms(
                TranslationKind::Unfinished,
                vec!["Načten %n soubor".to_string(), String::new(), String::new()],
            ),
        );
        document.push_message(
            "MainWindow",
            Message::new("Bell\u{7}<&>").with_translation(TranslationKind::Finished, "Zvonek\u{7}<&>"),
        );
        document
    }

    #[googletest::test]
    fn test_write_document_header() {
        let xml = write_document(&sample_document()).unwrap();

        expect_that!(xml, starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS"));
        expect_that!(xml, contains_substring(r#"<TS version="2.1" language="cs_CZ" sourcelanguage="en">"#));
        expect_that!(xml, contains_substring(r#"<translation type="vanished">Uložit řez</translation>"#));
        expect_that!(xml, contains_substring(r#"<byte value="x7"#));
    }

    #[test]
    fn test_round_trip_preserves_document() {
        let document = sample_document();

        let xml = write_document(&document).unwrap();
        let reparsed = parse_document(&xml).unwrap();

        assert_eq!(reparsed, document);
    }

    #[googletest::test]
    fn test_round_trip_keeps_whitespace_only_text() {
        let mut document = TsDocument::new(Some("cs_CZ".to_string()), None);
        document.push_message(
            "CNotesPluginPanel",
            Message::new(" ").with_translation(TranslationKind::Finished, " "),
        );
        document.push_message(
            "CNotesPluginPanel",
            Message::new("%n space(s)").with_numerus_forms(
                TranslationKind::Finished,
                vec![" ".to_string(), "  ".to_string(), "   ".to_string()],
            ),
        );

        let xml = write_document(&document).unwrap();
        let reparsed = parse_document(&xml).unwrap();

        expect_that!(xml, contains_substring("<translation> </translation>"));
        assert_eq!(reparsed, document);
    }

    #[googletest::test]
    fn test_text_nodes_escapes_control_characters() {
        let nodes = text_nodes("a\u{1}b\tc");

        expect_that!(nodes, len(eq(3)));
        assert_eq!(nodes[0], XMLNode::Text("a".to_string()));
        assert_eq!(nodes[2], XMLNode::Text("b\tc".to_string()));
    }

    #[googletest::test]
    fn test_save_document_writes_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("cs_cz.ts");

        save_document(&path, &sample_document()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        expect_that!(content, contains_substring("<name>CDataInfoDialog</name>"));
    }
}
