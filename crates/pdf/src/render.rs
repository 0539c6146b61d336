//! Serialize laid-out pages into a PDF document with `lopdf`.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use crate::encoding::win_ansi;
use crate::layout::{Font, Mark, Page, Tone, PAGE_HEIGHT, PAGE_WIDTH};
use crate::PdfError;

/// Muted text gray, as RGB fractions.
const MUTED_RGB: [f32; 3] = [0.29, 0.33, 0.39];
/// Rule and table border gray.
const RULE_GRAY: f32 = 0.82;

fn font_resource(font: Font) -> &'static [u8] {
    match font {
        Font::Regular => b"F1",
        Font::Bold => b"F2",
    }
}

fn font_dictionary(base_font: &str) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(base_font.as_bytes().to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ])
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

fn operations(page: &Page) -> Vec<Operation> {
    let mut ops = Vec::new();
    for mark in &page.marks {
        match mark {
            Mark::Text {
                x,
                y,
                text,
                font,
                size,
                tone,
            } => {
                let [r, g, b] = match tone {
                    Tone::Normal => [0.0, 0.0, 0.0],
                    Tone::Muted => MUTED_RGB,
                };
                ops.push(Operation::new("rg", vec![real(r), real(g), real(b)]));
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![Object::Name(font_resource(*font).to_vec()), real(*size)],
                ));
                ops.push(Operation::new("Td", vec![real(*x), real(*y)]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(win_ansi(text), StringFormat::Literal)],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            Mark::Line { from, to } => {
                ops.push(Operation::new("G", vec![real(RULE_GRAY)]));
                ops.push(Operation::new("w", vec![real(0.75)]));
                ops.push(Operation::new("m", vec![real(from.0), real(from.1)]));
                ops.push(Operation::new("l", vec![real(to.0), real(to.1)]));
                ops.push(Operation::new("S", vec![]));
            }
        }
    }
    ops
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page: &Page,
) -> Result<ObjectId, PdfError> {
    let content = Content {
        operations: operations(page),
    };
    let encoded = content
        .encode()
        .map_err(|e| PdfError::Encode(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

    Ok(doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![real(0.0), real(0.0), real(PAGE_WIDTH), real(PAGE_HEIGHT)]),
        ),
        ("Resources", Object::Reference(resources_id)),
        ("Contents", Object::Reference(content_id)),
    ])))
}

/// Build the PDF bytes for `pages`.
pub fn render(pages: &[Page]) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary("Helvetica"));
    let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
    let resources_id = doc.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![
            ("F1", Object::Reference(regular_id)),
            ("F2", Object::Reference(bold_id)),
        ])),
    )]));

    let mut kids = Vec::with_capacity(pages.len());
    for page in pages {
        kids.push(Object::Reference(add_page(
            &mut doc,
            pages_id,
            resources_id,
            page,
        )?));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(kids.len() as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| PdfError::Save(e.to_string()))?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{paginate, Block, TextStyle};

    #[test]
    fn renders_loadable_document() {
        let pages = paginate(&[Block::text("Hello \u{2014} world", TextStyle::BODY)]);
        let bytes = render(&pages).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn page_count_matches_layout() {
        let blocks: Vec<Block> = (0..150)
            .map(|i| Block::text(format!("Row {i}"), TextStyle::BODY))
            .collect();
        let pages = paginate(&blocks);
        let doc = Document::load_mem(&render(&pages).unwrap()).unwrap();
        assert_eq!(doc.get_pages().len(), pages.len());
    }

    #[test]
    fn text_is_win_ansi_encoded() {
        let pages = paginate(&[Block::text("\u{2022} A \u{2014} B", TextStyle::BODY)]);
        let doc = Document::load_mem(&render(&pages).unwrap()).unwrap();
        let page_id = *doc.get_pages().get(&1).unwrap();
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

        let shown: Vec<&[u8]> = content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(bytes.as_slice()),
                _ => None,
            })
            .collect();
        assert_eq!(shown, vec![&[0x95, b' ', b'A', b' ', 0x97, b' ', b'B'][..]]);
    }
}
