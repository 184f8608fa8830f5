use std::path::Path;

use anyhow::{Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info, warn};

use crate::error::PdfError;
use crate::pdf::PdfDocument;

const MAX_PARENT_DEPTH: usize = 32;

/// `<stem>_page_<page>_img_<index>.<ext>`, page and index 1-based.
pub fn image_file_name(stem: &str, page: u32, index: usize, ext: &str) -> String {
    format!("{}_page_{}_img_{}.{}", stem, page, index, ext)
}

/// Inverse of [`image_file_name`] for a known stem: `(page, index, ext)`.
pub fn parse_image_file_name<'a>(stem: &str, file_name: &'a str) -> Option<(u32, usize, &'a str)> {
    let rest = file_name.strip_prefix(stem)?.strip_prefix("_page_")?;
    let (page, rest) = rest.split_once("_img_")?;
    let (index, ext) = rest.split_once('.')?;
    if page.is_empty() || !page.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) || ext.is_empty() {
        return None;
    }
    Some((page.parse().ok()?, index.parse().ok()?, ext))
}

enum Encoded {
    Raw { bytes: Vec<u8>, ext: &'static str },
    Pixels { bytes: Vec<u8>, width: u32, height: u32, color: image::ColorType },
}

/// Write every embedded image of the document into `image_dir`.
pub fn extract_images(pdf: &PdfDocument, stem: &str, image_dir: &Path) -> Result<usize> {
    info!("Extracting images from: {}", stem);
    let doc = pdf.inner();
    let mut count = 0;

    for (&page, &page_id) in pdf.pages() {
        let streams = match page_image_streams(doc, page_id) {
            Ok(s) => s,
            Err(source) => {
                warn!("{}", PdfError::Image { page, source });
                continue;
            }
        };

        for (i, stream) in streams.into_iter().enumerate() {
            let index = i + 1;
            let Some(encoded) = encode(stream) else {
                debug!(page, index, "skipping unsupported image encoding");
                continue;
            };
            match encoded {
                Encoded::Raw { bytes, ext } => {
                    let path = image_dir.join(image_file_name(stem, page, index, ext));
                    std::fs::write(&path, bytes)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                }
                Encoded::Pixels { bytes, width, height, color } => {
                    let path = image_dir.join(image_file_name(stem, page, index, "png"));
                    image::save_buffer(&path, &bytes, width, height, color)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                }
            }
            count += 1;
        }
    }

    info!("Total images extracted: {}", count);
    Ok(count)
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> lopdf::Result<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id),
        other => Ok(other),
    }
}

/// Resources of the page, walking up `/Parent` for inherited ones.
fn page_resources(doc: &Document, page_id: ObjectId) -> lopdf::Result<Option<&Dictionary>> {
    let mut node = doc.get_dictionary(page_id)?;
    for _ in 0..MAX_PARENT_DEPTH {
        if let Ok(res) = node.get(b"Resources") {
            return resolve(doc, res)?.as_dict().map(Some);
        }
        match node.get(b"Parent").and_then(Object::as_reference) {
            Ok(parent) => node = doc.get_dictionary(parent)?,
            Err(_) => return Ok(None),
        }
    }
    Ok(None)
}

fn page_image_streams(doc: &Document, page_id: ObjectId) -> lopdf::Result<Vec<&Stream>> {
    let Some(resources) = page_resources(doc, page_id)? else {
        return Ok(Vec::new());
    };
    let Ok(xobjects) = resources.get(b"XObject") else {
        return Ok(Vec::new());
    };
    let xobjects = resolve(doc, xobjects)?.as_dict()?;

    let mut streams = Vec::new();
    for (_, obj) in xobjects.iter() {
        let Ok(stream) = resolve(doc, obj).and_then(Object::as_stream) else {
            continue;
        };
        let is_image = stream
            .dict
            .get(b"Subtype")
            .and_then(Object::as_name)
            .is_ok_and(|n| n == b"Image");
        if is_image {
            streams.push(stream);
        }
    }
    Ok(streams)
}

/// Filter names in application order; empty when the stream is unfiltered.
fn filters(dict: &Dictionary) -> Vec<&[u8]> {
    match dict.get(b"Filter") {
        Ok(Object::Name(n)) => vec![n.as_slice()],
        Ok(Object::Array(arr)) => arr.iter().filter_map(|o| o.as_name().ok()).collect(),
        _ => Vec::new(),
    }
}

fn encode(stream: &Stream) -> Option<Encoded> {
    let dict = &stream.dict;
    let filters = filters(dict);
    match filters.as_slice() {
        [b"DCTDecode"] => return Some(Encoded::Raw { bytes: stream.content.clone(), ext: "jpeg" }),
        [b"JPXDecode"] => return Some(Encoded::Raw { bytes: stream.content.clone(), ext: "jp2" }),
        // an image codec behind another filter is not decoded here
        [.., b"DCTDecode" | b"JPXDecode"] => return None,
        _ => {}
    }

    let width = u32::try_from(dict.get(b"Width").and_then(Object::as_i64).ok()?).ok()?;
    let height = u32::try_from(dict.get(b"Height").and_then(Object::as_i64).ok()?).ok()?;
    let bpc = dict.get(b"BitsPerComponent").and_then(Object::as_i64).unwrap_or(8);
    if bpc != 8 {
        return None;
    }
    let (color, channels) = match dict.get(b"ColorSpace").and_then(Object::as_name).ok()? {
        b"DeviceRGB" => (image::ColorType::Rgb8, 3usize),
        b"DeviceGray" => (image::ColorType::L8, 1usize),
        _ => return None,
    };

    let needed = (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(channels)?;
    let mut bytes = if !filters.is_empty() {
        stream.decompressed_content().ok()?
    } else {
        stream.content.clone()
    };
    if bytes.len() < needed {
        return None;
    }
    bytes.truncate(needed);
    Some(Encoded::Pixels { bytes, width, height, color })
}
