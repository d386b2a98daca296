//! Minimal document builders for tests

use std::io::{Cursor, Write};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use shared_types::Paragraph;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A PDF with one page per entry; `\n` starts a new text line
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for text in pages {
        let mut operations = Vec::new();
        if !text.is_empty() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12i64.into()]));
            for (i, line) in text.lines().enumerate() {
                let offset: (i64, i64) = if i == 0 { (72, 720) } else { (0, -14) };
                operations.push(Operation::new("Td", vec![offset.0.into(), offset.1.into()]));
                operations.push(Operation::new("Tj", vec![Object::string_literal(line)]));
            }
            operations.push(Operation::new("ET", vec![]));
        }

        let content = Content { operations }
            .encode()
            .expect("content stream encodes");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("writing to a Vec succeeds");
    buffer
}

/// A one-page PDF showing `text` through a Type0 / Identity-H font
///
/// Each distinct character gets its own two-byte glyph id, and only the
/// ToUnicode CMap maps the ids back to text.
pub fn pdf_with_identity_font(text: &str) -> Vec<u8> {
    let mut glyphs: Vec<char> = Vec::new();
    for c in text.chars() {
        if !glyphs.contains(&c) {
            glyphs.push(c);
        }
    }
    let glyph_id = |c: char| glyphs.iter().position(|&g| g == c).map_or(0, |i| i as u16 + 1);

    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n/CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );
    cmap.push_str(&format!("{} beginbfchar\n", glyphs.len()));
    for &c in &glyphs {
        cmap.push_str(&format!("<{:04X}> <{:04X}>\n", glyph_id(c), c as u32));
    }
    cmap.push_str(
        "endbfchar\nendcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n",
    );

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let to_unicode_id = doc.add_object(Stream::new(dictionary! {}, cmap.into_bytes()));
    let descriptor_id = doc.add_object(dictionary! {
        "Type" => "FontDescriptor",
        "FontName" => "ReportSans",
        "Flags" => 32i64,
        "FontBBox" => vec![
            Object::Integer(0),
            Object::Integer(-200),
            Object::Integer(1000),
            Object::Integer(900),
        ],
        "ItalicAngle" => 0i64,
        "Ascent" => 900i64,
        "Descent" => -200i64,
        "CapHeight" => 700i64,
        "StemV" => 80i64,
    });
    let cid_font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "CIDFontType2",
        "BaseFont" => "ReportSans",
        "CIDSystemInfo" => dictionary! {
            "Registry" => Object::string_literal("Adobe"),
            "Ordering" => Object::string_literal("Identity"),
            "Supplement" => 0i64,
        },
        "FontDescriptor" => descriptor_id,
        "DW" => 600i64,
    });
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type0",
        "BaseFont" => "ReportSans",
        "Encoding" => "Identity-H",
        "DescendantFonts" => vec![Object::Reference(cid_font_id)],
        "ToUnicode" => to_unicode_id,
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let shown: Vec<u8> = text
        .chars()
        .flat_map(|c| glyph_id(c).to_be_bytes())
        .collect();
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12i64.into()]),
            Operation::new("Td", vec![72i64.into(), 720i64.into()]),
            Operation::new("Tj", vec![Object::String(shown, StringFormat::Hexadecimal)]),
            Operation::new("ET", vec![]),
        ],
    }
    .encode()
    .expect("content stream encodes");
    let content_id = doc.add_object(Stream::new(dictionary! {}, content));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(612),
            Object::Integer(792),
        ],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("writing to a Vec succeeds");
    buffer
}

/// A DOCX whose body holds the given paragraphs; headings use `Heading1`
pub fn docx_with_paragraphs(paragraphs: &[Paragraph]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| {
            let style = if p.is_heading {
                r#"<w:pPr><w:pStyle w:val="Heading1"/></w:pPr>"#
            } else {
                ""
            };
            format!(
                r#"<w:p>{}<w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                style,
                escape_xml(&p.text)
            )
        })
        .collect();

    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    zip_with_entries(&[
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#,
        ),
        ("word/document.xml", document.as_str()),
    ])
}

/// A zip archive with the given `(name, contents)` entries
pub fn zip_with_entries(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    for (name, contents) in entries {
        writer.start_file(*name, options).expect("zip entry starts");
        writer
            .write_all(contents.as_bytes())
            .expect("zip entry writes");
    }

    writer.finish().expect("zip archive finishes").into_inner()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
