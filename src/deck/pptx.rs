//! Serializer: slides + canvas → PPTX (Office Open XML PresentationML) bytes.
//!
//! XML parts are deflated; page images are already PNG-compressed, so they
//! are stored as-is rather than paying for a second compression pass.

use crate::deck::builder::{DeckProperties, Slide};
use crate::deck::template;
use crate::error::Pdf2PptxError;
use crate::pipeline::geometry::{SlideCanvasSize, EMU_PER_INCH};
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// In-memory ZIP container for one package.
struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl PackageWriter {
    fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    fn add_xml(&mut self, path: &str, xml: &str) -> Result<(), Pdf2PptxError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.add(path, xml.as_bytes(), options)
    }

    fn add_media(&mut self, path: &str, data: &[u8]) -> Result<(), Pdf2PptxError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        self.add(path, data, options)
    }

    fn add(
        &mut self,
        path: &str,
        data: &[u8],
        options: SimpleFileOptions,
    ) -> Result<(), Pdf2PptxError> {
        self.zip
            .start_file(path, options)
            .map_err(|e| Pdf2PptxError::Internal(format!("zip entry '{path}': {e}")))?;
        self.zip
            .write_all(data)
            .map_err(|e| Pdf2PptxError::Internal(format!("zip write '{path}': {e}")))
    }

    fn finish(self) -> Result<Vec<u8>, Pdf2PptxError> {
        self.zip
            .finish()
            .map(Cursor::into_inner)
            .map_err(|e| Pdf2PptxError::Internal(format!("zip finish: {e}")))
    }
}

/// Write the complete package for `slides` on a `canvas`-sized deck.
pub fn write_package(
    canvas: &SlideCanvasSize,
    slides: &[Slide],
    properties: &DeckProperties,
) -> Result<Vec<u8>, Pdf2PptxError> {
    let width_emu = canvas.width_emu();
    let height_emu = canvas.height_emu();
    let mut pkg = PackageWriter::new();

    pkg.add_xml("[Content_Types].xml", &template::content_types_xml(slides.len()))?;
    pkg.add_xml("_rels/.rels", &template::root_rels_xml())?;
    pkg.add_xml("docProps/core.xml", &template::core_props_xml(properties))?;
    pkg.add_xml("docProps/app.xml", &template::app_props_xml(slides.len()))?;

    pkg.add_xml(
        "ppt/presentation.xml",
        &template::presentation_xml(slides.len(), width_emu, height_emu),
    )?;
    pkg.add_xml(
        "ppt/_rels/presentation.xml.rels",
        &template::presentation_rels_xml(slides.len()),
    )?;
    pkg.add_xml("ppt/presProps.xml", template::PRES_PROPS_XML)?;
    pkg.add_xml("ppt/viewProps.xml", template::VIEW_PROPS_XML)?;
    pkg.add_xml("ppt/tableStyles.xml", template::TABLE_STYLES_XML)?;
    pkg.add_xml("ppt/theme/theme1.xml", template::THEME_XML)?;
    pkg.add_xml("ppt/slideMasters/slideMaster1.xml", template::SLIDE_MASTER_XML)?;
    pkg.add_xml(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        &template::slide_master_rels_xml(),
    )?;
    pkg.add_xml("ppt/slideLayouts/slideLayout1.xml", template::SLIDE_LAYOUT_XML)?;
    pkg.add_xml(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        &template::slide_layout_rels_xml(),
    )?;

    for (i, slide) in slides.iter().enumerate() {
        let n = i + 1;
        let size = slide.size();
        let (x, y) = slide.position();
        pkg.add_xml(
            &format!("ppt/slides/slide{n}.xml"),
            &template::slide_xml(
                n,
                (x * EMU_PER_INCH).round() as i64,
                (y * EMU_PER_INCH).round() as i64,
                size.width_emu(),
                size.height_emu(),
            ),
        )?;
        pkg.add_xml(
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            &template::slide_rels_xml(n),
        )?;
        pkg.add_media(&format!("ppt/media/image{n}.png"), &slide.image().png)?;
    }

    let bytes = pkg.finish()?;
    debug!(
        "Serialized deck: {} slides, {}x{} EMU, {} bytes",
        slides.len(),
        width_emu,
        height_emu,
        bytes.len()
    );
    Ok(bytes)
}
