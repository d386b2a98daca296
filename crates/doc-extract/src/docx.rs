//! DOCX paragraph extraction from `word/document.xml`

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use shared_types::Paragraph;
use zip::ZipArchive;

use crate::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

/// Encrypted Office files are OLE compound documents, not zip archives
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Style id to display name, e.g. `Kop1` -> `heading 1`
pub type StyleNames = HashMap<String, String>;

/// Paragraphs of the main document part, in body order
///
/// Every `w:p` element yields one paragraph, including empty ones. A
/// paragraph nested in a text box is emitted before the paragraph that
/// anchors it.
pub fn extract_paragraphs(bytes: &[u8]) -> Result<Vec<Paragraph>, ExtractError> {
    if bytes.starts_with(&OLE_MAGIC) {
        return Err(ExtractError::PasswordProtected);
    }

    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractError::InvalidDocx(format!("not a zip archive: {}", e)))?;

    let xml = read_part(&mut archive, DOCUMENT_PART)?
        .ok_or_else(|| ExtractError::InvalidDocx(format!("missing {}", DOCUMENT_PART)))?;
    let styles = match read_part(&mut archive, STYLES_PART)? {
        Some(styles_xml) => parse_styles_xml(&styles_xml)?,
        None => StyleNames::new(),
    };

    parse_document_xml(&xml, &styles)
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<Option<String>, ExtractError> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(ExtractError::InvalidDocx(format!("unreadable {}: {}", name, e))),
    };
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| ExtractError::InvalidDocx(format!("unreadable {}: {}", name, e)))?;
    Ok(Some(xml))
}

/// Collect `w:styleId` -> `w:name` pairs from `word/styles.xml`
pub fn parse_styles_xml(xml: &str) -> Result<StyleNames, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut styles = StyleNames::new();
    let mut current_id: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"style" => {
                current_id = get_attribute(e, b"styleId");
            }
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"name" => {
                if let (Some(id), Some(name)) = (current_id.as_ref(), get_attribute(e, b"val")) {
                    styles.insert(id.clone(), name);
                }
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"style" => current_id = None,
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::InvalidDocx(format!(
                    "{} XML error at position {}: {}",
                    STYLES_PART,
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(styles)
}

/// Walk `w:p` / `w:t` events, flagging heading-styled paragraphs
///
/// Open paragraphs form a stack so text boxes inside a paragraph do not cut
/// it short. `mc:Fallback` content duplicates its `mc:Choice` and is skipped.
pub fn parse_document_xml(xml: &str, styles: &StyleNames) -> Result<Vec<Paragraph>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut paragraphs = Vec::new();
    let mut open: Vec<Paragraph> = Vec::new();
    let mut in_text = false;
    let mut fallback_depth = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractError::InvalidDocx(format!(
                    "XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            Ok(Event::Start(_)) if fallback_depth > 0 => fallback_depth += 1,
            Ok(Event::End(_)) if fallback_depth > 0 => fallback_depth -= 1,
            _ if fallback_depth > 0 => {}
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"p" => open.push(Paragraph::body(String::new())),
                b"t" => in_text = true,
                b"pStyle" => mark_heading(e, open.last_mut(), styles),
                b"Fallback" => fallback_depth = 1,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match (e.local_name().as_ref(), open.last_mut()) {
                (b"p", _) => paragraphs.push(Paragraph::body(String::new())),
                (b"pStyle", paragraph) => mark_heading(e, paragraph, styles),
                (b"tab", Some(paragraph)) => paragraph.text.push('\t'),
                (b"br" | b"cr", Some(paragraph)) => paragraph.text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    if let Some(paragraph) = open.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| ExtractError::InvalidDocx(format!("bad text: {}", e)))?;
                        paragraph.text.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if let Some(paragraph) = open.pop() {
                        paragraphs.push(paragraph);
                    }
                }
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs)
}

fn mark_heading(e: &BytesStart, paragraph: Option<&mut Paragraph>, styles: &StyleNames) {
    let Some(paragraph) = paragraph else {
        return;
    };
    if let Some(style_id) = get_attribute(e, b"val") {
        let name = styles.get(&style_id).map_or(style_id.as_str(), String::as_str);
        paragraph.is_heading = is_heading_style(name);
    }
}

/// `heading 1`..`heading 9` and `Title`, by style name or built-in id
fn is_heading_style(style: &str) -> bool {
    let lower = style.to_lowercase();
    lower.starts_with("heading") || lower == "title"
}

fn get_attribute(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}
