//! `.ts` XML → [`TsDocument`].

use std::path::Path;

use xml::reader::{
    EventReader,
    ParserConfig,
    XmlEvent,
};
use xmltree::{
    Element,
    ParseError,
    XMLNode,
};

use super::document::{
    Context,
    Message,
    Translation,
    TranslationBody,
    TranslationKind,
    TsDocument,
};
use super::error::TsError;
use crate::types::Location;

/// Parses a catalog from its XML text.
pub fn parse_document(xml: &str) -> Result<TsDocument, TsError> {
    if !xml.trim_start_matches('\u{feff}').trim_start().starts_with('<') {
        return Err(TsError::NotXml);
    }
    let root = parse_tree(xml)?;
    if root.name != "TS" {
        return Err(TsError::UnexpectedRoot(root.name));
    }

    let mut document = TsDocument {
        version: root.attributes.get("version").cloned(),
        language: root.attributes.get("language").cloned(),
        source_language: root.attributes.get("sourcelanguage").cloned(),
        contexts: Vec::new(),
    };

    for child in child_elements(&root) {
        match child.name.as_str() {
            "context" => document.contexts.push(parse_context(child)?),
            // Qt 4 leftovers and tool-specific data
            "defaultcodec" | "dependencies" => {}
            name if is_extra(name) => {}
            name => {
                return Err(TsError::UnexpectedElement { parent: "TS", element: name.to_string() });
            }
        }
    }

    Ok(document)
}

/// Reads and parses a catalog file.
pub fn load_document(path: &Path) -> Result<TsDocument, TsError> {
    tracing::debug!(path = %path.display(), "Loading catalog");
    let content = std::fs::read_to_string(path)?;
    let document = parse_document(&content)?;
    tracing::debug!(
        path = %path.display(),
        contexts = document.contexts.len(),
        messages = document.message_count(),
        "Catalog loaded"
    );
    Ok(document)
}

/// Builds the element tree, keeping whitespace-only character data.
///
/// `Element::parse` discards whitespace events, which would turn
/// `<translation> </translation>` into an empty translation.
fn parse_tree(xml: &str) -> Result<Element, ParseError> {
    let config = ParserConfig::new()
        .whitespace_to_characters(true)
        .cdata_to_characters(true)
        .ignore_comments(true);
    let mut open: Vec<Element> = Vec::new();

    for event in EventReader::new_with_config(xml.as_bytes(), config) {
        match event.map_err(ParseError::MalformedXml)? {
            XmlEvent::StartElement { name, attributes, .. } => {
                let mut element = Element::new(&name.local_name);
                for attribute in attributes {
                    element.attributes.insert(attribute.name.local_name, attribute.value);
                }
                open.push(element);
            }
            XmlEvent::EndElement { .. } => {
                let element = open.pop().ok_or(ParseError::CannotParse)?;
                match open.last_mut() {
                    Some(parent) => parent.children.push(XMLNode::Element(element)),
                    None => return Ok(element),
                }
            }
            XmlEvent::Characters(text) => {
                // Text outside the root element is whitespace between prolog items.
                if let Some(parent) = open.last_mut() {
                    parent.children.push(XMLNode::Text(text));
                }
            }
            _ => {}
        }
    }

    Err(ParseError::CannotParse)
}

fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(child) => Some(child),
        _ => None,
    })
}

fn is_extra(name: &str) -> bool {
    name.starts_with("extra-") || name == "userdata"
}

fn parse_context(element: &Element) -> Result<Context, TsError> {
    let mut name = None;
    let mut context = Context::default();

    for child in child_elements(element) {
        match child.name.as_str() {
            "name" => name = Some(element_text(child, "name")?),
            "comment" => context.comment = Some(element_text(child, "comment")?),
            "message" => context.messages.push(parse_message(child)?),
            other if is_extra(other) => {}
            other => {
                return Err(TsError::UnexpectedElement {
                    parent: "context",
                    element: other.to_string(),
                });
            }
        }
    }

    context.name = name.ok_or(TsError::MissingElement { parent: "context", element: "name" })?;
    Ok(context)
}

fn parse_message(element: &Element) -> Result<Message, TsError> {
    let numerus = match element.attributes.get("numerus").map(String::as_str) {
        None | Some("no" | "false") => false,
        Some("yes" | "true") => true,
        Some(value) => {
            return Err(TsError::InvalidAttribute {
                element: "message",
                attribute: "numerus",
                value: value.to_string(),
            });
        }
    };

    let mut message =
        Message { id: element.attributes.get("id").cloned(), numerus, ..Message::default() };
    let mut source = None;
    let mut translation = None;

    for child in child_elements(element) {
        match child.name.as_str() {
            "location" => message.locations.push(parse_location(child)?),
            "source" => source = Some(element_text(child, "source")?),
            "oldsource" => message.old_source = Some(element_text(child, "oldsource")?),
            "comment" => message.comment = Some(element_text(child, "comment")?),
            "oldcomment" => message.old_comment = Some(element_text(child, "oldcomment")?),
            "extracomment" => message.extra_comment = Some(element_text(child, "extracomment")?),
            "translatorcomment" => {
                message.translator_comment = Some(element_text(child, "translatorcomment")?);
            }
            "translation" => translation = Some(parse_translation(child, numerus)?),
            other if is_extra(other) => {}
            other => {
                return Err(TsError::UnexpectedElement {
                    parent: "message",
                    element: other.to_string(),
                });
            }
        }
    }

    message.source = source.ok_or(TsError::MissingElement { parent: "message", element: "source" })?;
    // A message without <translation> behaves like an empty unfinished one.
    message.translation = translation.unwrap_or(Translation {
        kind: TranslationKind::Unfinished,
        body: if numerus { TranslationBody::Numerus(Vec::new()) } else { TranslationBody::default() },
    });
    Ok(message)
}

fn parse_location(element: &Element) -> Result<Location, TsError> {
    let line = match element.attributes.get("line") {
        None => None,
        Some(value) => Some(value.parse::<u32>().map_err(|_| TsError::InvalidAttribute {
            element: "location",
            attribute: "line",
            value: value.clone(),
        })?),
    };
    Ok(Location { filename: element.attributes.get("filename").cloned(), line })
}

fn parse_translation(element: &Element, numerus: bool) -> Result<Translation, TsError> {
    let kind = match element.attributes.get("type") {
        None => TranslationKind::Finished,
        Some(value) => value.parse().map_err(|value| TsError::InvalidAttribute {
            element: "translation",
            attribute: "type",
            value,
        })?,
    };

    let body = if numerus {
        let forms = child_elements(element)
            .filter(|child| child.name == "numerusform")
            .map(|form| variant_text(form, "numerusform"))
            .collect::<Result<Vec<_>, _>>()?;
        TranslationBody::Numerus(forms)
    } else {
        TranslationBody::Text(variant_text(element, "translation")?)
    };

    Ok(Translation { kind, body })
}

/// Text of an element that may hold `<lengthvariant>` children instead of text.
///
/// Variants are ordered by falling display length; the first one is kept.
fn variant_text(element: &Element, name: &'static str) -> Result<String, TsError> {
    match child_elements(element).find(|child| child.name == "lengthvariant") {
        Some(variant) => element_text(variant, "lengthvariant"),
        None => element_text(element, name),
    }
}

/// Concatenated character data of an element, with `<byte>` escapes decoded.
fn element_text(element: &Element, name: &'static str) -> Result<String, TsError> {
    let mut text = String::new();
    for node in &element.children {
        match node {
            XMLNode::Text(chunk) | XMLNode::CData(chunk) => text.push_str(chunk),
            XMLNode::Element(child) if child.name == "byte" => {
                if let Some(ch) = decode_byte(child)? {
                    text.push(ch);
                }
            }
            XMLNode::Element(child) => {
                return Err(TsError::UnexpectedElement { parent: name, element: child.name.clone() });
            }
            _ => {}
        }
    }
    Ok(text)
}

/// Decodes `<byte value="x9"/>` (hex) or `<byte value="13"/>` (decimal).
///
/// Value zero stands for nothing.
fn decode_byte(element: &Element) -> Result<Option<char>, TsError> {
    let invalid = |value: &str| TsError::InvalidAttribute {
        element: "byte",
        attribute: "value",
        value: value.to_string(),
    };
    let value = element.attributes.get("value").ok_or_else(|| invalid(""))?;
    let (digits, radix) = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix('x'))
        .map_or((value.as_str(), 10), |hex| (hex, 16));
    let code = u32::from_str_radix(digits, radix).map_err(|_| invalid(value))?;
    if code == 0 {
        return Ok(None);
    }
    char::from_u32(code).map(Some).ok_or_else(|| invalid(value))
}
