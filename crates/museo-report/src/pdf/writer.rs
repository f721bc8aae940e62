use super::layout::image_name;
use super::text::Font;
use super::{ImageBlock, PageGeometry};
use crate::Result;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

/// Serialize decorated pages and their images into a PDF document
pub(crate) fn write_document(
    geometry: &PageGeometry,
    pages: Vec<Vec<Operation>>,
    images: &[ImageBlock],
) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for font in [Font::Regular, Font::Bold] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }

    let mut xobjects = Dictionary::new();
    for (idx, image) in images.iter().enumerate() {
        let image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width as i64,
            "Height" => image.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        };
        // Pixel data is flate-compressed; page content streams stay plain
        let mut stream = Stream::new(image_dict, image.rgb.clone());
        stream.compress()?;
        let image_id = doc.add_object(stream);
        xobjects.set(image_name(idx), image_id);
    }

    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
        "XObject" => xobjects,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        0.into(),
        0.into(),
        geometry.width.into(),
        geometry.height.into(),
    ];
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => media_box,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::text::text_ops;

    #[test]
    fn test_written_document_parses() {
        let pages = vec![
            text_ops("First page", Font::Regular, 12.0, 72.0, 700.0),
            text_ops("Second page", Font::Bold, 12.0, 72.0, 700.0),
        ];
        let images = vec![ImageBlock {
            width: 2,
            height: 2,
            rgb: vec![255; 12],
            display_width: 100.0,
        }];

        let bytes = write_document(&PageGeometry::a4(), pages, &images).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }

    #[test]
    fn test_image_streams_are_compressed() {
        let images = vec![ImageBlock {
            width: 64,
            height: 64,
            rgb: vec![255; 64 * 64 * 3],
            display_width: 100.0,
        }];
        let pages = vec![text_ops("Plain text", Font::Regular, 12.0, 72.0, 700.0)];

        let bytes = write_document(&PageGeometry::a4(), pages, &images).unwrap();
        assert!(bytes.len() < 64 * 64 * 3 / 2);

        let doc = Document::load_mem(&bytes).unwrap();
        let image = doc
            .objects
            .values()
            .filter_map(|object| object.as_stream().ok())
            .find(|stream| {
                stream.dict.get(b"Subtype").and_then(Object::as_name).ok() == Some(&b"Image"[..])
            })
            .unwrap();
        assert_eq!(
            image.dict.get(b"Filter").and_then(Object::as_name).unwrap(),
            b"FlateDecode"
        );
        assert_eq!(image.decompressed_content().unwrap().len(), 64 * 64 * 3);

        // Page text is still readable in the raw bytes
        assert!(bytes.windows(10).any(|w| w == b"Plain text"));
    }
}
