//! Pipeline integration tests against an in-memory document backend.
//!
//! No pdfium needed: `FakeLoader` decodes anything starting with `%PDF` into
//! a document whose pages are solid colours keyed by page index, so slide
//! order can be checked by decoding the embedded images.

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use pdf2pptx::pipeline::loader::{DocumentLoader, PageSize, SourceDocument};
use pdf2pptx::pipeline::raster::Viewport;
use pdf2pptx::{
    convert_with_loader, DocumentMetadata, CancelHandle, ConversionConfig, ConversionProgressCallback, ErrorKind,
    Pdf2PptxError, Pipeline, PipelineState,
};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use zip::ZipArchive;

// ── Fake backend ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct Tracker {
    rendered: Arc<Mutex<Vec<usize>>>,
    dropped: Arc<AtomicBool>,
}

struct FakeDocument {
    pages: Vec<PageSize>,
    fail_at: Option<usize>,
    title: Option<String>,
    tracker: Tracker,
}

impl Drop for FakeDocument {
    fn drop(&mut self) {
        self.tracker.dropped.store(true, Ordering::SeqCst);
    }
}

impl SourceDocument for FakeDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, index: usize) -> Result<PageSize, Pdf2PptxError> {
        Ok(self.pages[index])
    }

    fn rasterize(&self, index: usize, vp: &Viewport) -> Result<DynamicImage, Pdf2PptxError> {
        if self.fail_at == Some(index) {
            return Err(Pdf2PptxError::RenderFailed {
                page: index + 1,
                detail: "unsupported shading".into(),
            });
        }
        self.tracker.rendered.lock().unwrap().push(index);
        Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            vp.pixel_width,
            vp.pixel_height,
            Rgb([page_tag(index), 0, 0]),
        )))
    }

    fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            title: self.title.clone(),
            page_count: self.pages.len(),
            ..DocumentMetadata::default()
        }
    }
}

fn page_tag(index: usize) -> u8 {
    (index as u8).wrapping_mul(20).wrapping_add(10)
}

struct FakeLoader {
    pages: Vec<PageSize>,
    fail_at: Option<usize>,
    title: Option<String>,
    tracker: Tracker,
}

impl FakeLoader {
    fn new(pages: Vec<PageSize>) -> Self {
        Self {
            pages,
            fail_at: None,
            title: None,
            tracker: Tracker::default(),
        }
    }
}

impl DocumentLoader for FakeLoader {
    fn load<'a>(
        &'a self,
        bytes: &'a [u8],
        _password: Option<&str>,
    ) -> Result<Box<dyn SourceDocument + 'a>, Pdf2PptxError> {
        if !bytes.starts_with(b"%PDF") {
            return Err(Pdf2PptxError::CorruptDocument {
                detail: "no %PDF header".into(),
            });
        }
        Ok(Box::new(FakeDocument {
            pages: self.pages.clone(),
            fail_at: self.fail_at,
            title: self.title.clone(),
            tracker: self.tracker.clone(),
        }))
    }
}

const PDF: &[u8] = b"%PDF-1.7\n";

/// Small pages keep PNG encoding fast where geometry is not under test.
fn small_pages(n: usize) -> Vec<PageSize> {
    vec![PageSize::new(30.0, 40.0); n]
}

// ── Recording observer ───────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder {
    percents: Mutex<Vec<u8>>,
    completed: Mutex<Vec<usize>>,
    failures: Mutex<Vec<ErrorKind>>,
    finished: Mutex<Option<usize>>,
    cancel_after: Option<(usize, CancelHandle)>,
}

impl ConversionProgressCallback for Recorder {
    fn on_progress(&self, percent: u8) {
        self.percents.lock().unwrap().push(percent);
    }

    fn on_page_complete(&self, page_num: usize, _total_pages: usize) {
        self.completed.lock().unwrap().push(page_num);
        if let Some((after, handle)) = &self.cancel_after {
            if *after == page_num {
                handle.cancel();
            }
        }
    }

    fn on_conversion_complete(&self, total_slides: usize, _deck_bytes: usize) {
        *self.finished.lock().unwrap() = Some(total_slides);
    }

    fn on_conversion_failed(&self, error: &Pdf2PptxError) {
        self.failures.lock().unwrap().push(error.kind());
    }
}

fn config_with(recorder: &Arc<Recorder>) -> ConversionConfig {
    ConversionConfig::builder()
        .progress_callback(recorder.clone())
        .build()
        .unwrap()
}

// ── Package readers ──────────────────────────────────────────────────────────

fn archive(pptx: &[u8]) -> ZipArchive<Cursor<Vec<u8>>> {
    ZipArchive::new(Cursor::new(pptx.to_vec())).expect("deck is a zip archive")
}

fn entry_bytes(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("missing part {name}"))
        .read_to_end(&mut buf)
        .unwrap();
    buf
}

/// Every `(cx, cy)` pair on elements named `tag`, in document order.
fn extents(xml: &str, tag: &[u8]) -> Vec<(i64, i64)> {
    let mut reader = Reader::from_str(xml);
    let mut found = Vec::new();
    loop {
        match reader.read_event().expect("well-formed xml") {
            Event::Empty(e) | Event::Start(e) if e.name().as_ref() == tag => {
                let mut cx = None;
                let mut cy = None;
                for attr in e.attributes() {
                    let attr = attr.unwrap();
                    let value: i64 = std::str::from_utf8(&attr.value).unwrap().parse().unwrap();
                    match attr.key.as_ref() {
                        b"cx" => cx = Some(value),
                        b"cy" => cy = Some(value),
                        _ => {}
                    }
                }
                found.push((cx.unwrap(), cy.unwrap()));
            }
            Event::Eof => return found,
            _ => {}
        }
    }
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn letter_document_becomes_letter_deck() {
    let loader = FakeLoader::new(vec![PageSize::LETTER; 3]);
    let recorder = Arc::new(Recorder::default());
    let config = config_with(&recorder);

    let output = convert_with_loader(&loader, PDF, &config).unwrap();

    assert_eq!(output.slide_count, 3);
    assert_eq!((output.canvas.width, output.canvas.height), (8.5, 11.0));
    assert_eq!(*recorder.percents.lock().unwrap(), vec![33, 67, 100]);
    assert_eq!(*recorder.finished.lock().unwrap(), Some(3));
    assert!(recorder.failures.lock().unwrap().is_empty());

    let mut zip = archive(&output.pptx);
    let presentation = String::from_utf8(entry_bytes(&mut zip, "ppt/presentation.xml")).unwrap();
    assert_eq!(extents(&presentation, b"p:sldSz"), vec![(7_772_400, 10_058_400)]);

    for n in 1..=3 {
        let png = entry_bytes(&mut zip, &format!("ppt/media/image{n}.png"));
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!(img.dimensions(), (1224, 1584));
    }
}

#[test]
fn slides_follow_page_order() {
    let loader = FakeLoader::new(small_pages(4));
    let output = convert_with_loader(&loader, PDF, &ConversionConfig::default()).unwrap();

    assert_eq!(*loader.tracker.rendered.lock().unwrap(), vec![0, 1, 2, 3]);

    let mut zip = archive(&output.pptx);
    for n in 1..=4usize {
        let png = entry_bytes(&mut zip, &format!("ppt/media/image{n}.png"));
        let img = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(img.get_pixel(0, 0)[0], page_tag(n - 1), "slide {n}");
    }
    assert!(zip.by_name("ppt/slides/slide5.xml").is_err());
}

#[test]
fn every_slide_fills_the_page_one_canvas() {
    let mut pages = small_pages(1);
    pages.push(PageSize::new(80.0, 20.0));
    let loader = FakeLoader::new(pages);
    let output = convert_with_loader(&loader, PDF, &ConversionConfig::default()).unwrap();

    let expected = (output.canvas.width_emu(), output.canvas.height_emu());
    let mut zip = archive(&output.pptx);
    for n in 1..=2 {
        let slide = String::from_utf8(entry_bytes(&mut zip, &format!("ppt/slides/slide{n}.xml")))
            .unwrap();
        // The group shape's zero extent comes first; the picture's is last.
        assert_eq!(extents(&slide, b"a:ext").last(), Some(&expected), "slide {n}");
        assert!(slide.contains(r#"<a:off x="0" y="0"/>"#));
    }
}

#[test]
fn undecodable_buffer_fails_before_any_progress() {
    let loader = FakeLoader::new(small_pages(3));
    let recorder = Arc::new(Recorder::default());
    let config = config_with(&recorder);
    let mut pipeline = Pipeline::new(&loader, &config);

    let err = pipeline.run(b"garbage").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert_eq!(
        pipeline.history(),
        &[
            PipelineState::Idle,
            PipelineState::Loading,
            PipelineState::Failed(ErrorKind::Decode)
        ]
    );
    assert!(recorder.percents.lock().unwrap().is_empty());
    assert_eq!(*recorder.failures.lock().unwrap(), vec![ErrorKind::Decode]);
}

#[test]
fn zero_page_document_is_empty_deck() {
    let loader = FakeLoader::new(Vec::new());
    let recorder = Arc::new(Recorder::default());
    let config = config_with(&recorder);
    let mut pipeline = Pipeline::new(&loader, &config);

    let err = pipeline.run(PDF).unwrap_err();

    assert!(matches!(err, Pdf2PptxError::EmptyDeck));
    assert_eq!(
        pipeline.history(),
        &[
            PipelineState::Idle,
            PipelineState::Loading,
            PipelineState::Finalizing,
            PipelineState::Failed(ErrorKind::EmptyDeck)
        ]
    );
    assert!(recorder.percents.lock().unwrap().is_empty());
}

#[test]
fn render_failure_aborts_the_whole_deck() {
    let mut loader = FakeLoader::new(small_pages(3));
    loader.fail_at = Some(1);
    let recorder = Arc::new(Recorder::default());
    let config = config_with(&recorder);
    let mut pipeline = Pipeline::new(&loader, &config);

    let err = pipeline.run(PDF).unwrap_err();

    assert!(matches!(err, Pdf2PptxError::RenderFailed { page: 2, .. }));
    assert_eq!(pipeline.state(), PipelineState::Failed(ErrorKind::Render));
    assert_eq!(*recorder.percents.lock().unwrap(), vec![33]);
    assert_eq!(*loader.tracker.rendered.lock().unwrap(), vec![0]);
    assert!(recorder.finished.lock().unwrap().is_none());
    assert!(loader.tracker.dropped.load(Ordering::SeqCst));
}

#[test]
fn cancel_after_second_page_releases_document() {
    let loader = FakeLoader::new(small_pages(5));
    let cancel = CancelHandle::new();
    let recorder = Arc::new(Recorder {
        cancel_after: Some((2, cancel.clone())),
        ..Recorder::default()
    });
    let config = ConversionConfig::builder()
        .progress_callback(recorder.clone())
        .cancel_handle(cancel)
        .build()
        .unwrap();
    let mut pipeline = Pipeline::new(&loader, &config);

    let err = pipeline.run(PDF).unwrap_err();

    assert!(matches!(err, Pdf2PptxError::Cancelled { completed_pages: 2 }));
    assert_eq!(pipeline.state(), PipelineState::Failed(ErrorKind::Cancelled));
    assert_eq!(*recorder.completed.lock().unwrap(), vec![1, 2]);
    assert_eq!(*loader.tracker.rendered.lock().unwrap(), vec![0, 1]);
    assert!(loader.tracker.dropped.load(Ordering::SeqCst));
    assert!(!pipeline.history().contains(&PipelineState::Finalizing));
}

#[test]
fn cancel_before_start_renders_nothing() {
    let loader = FakeLoader::new(small_pages(2));
    let cancel = CancelHandle::new();
    cancel.cancel();
    let config = ConversionConfig::builder()
        .cancel_handle(cancel)
        .build()
        .unwrap();

    let err = convert_with_loader(&loader, PDF, &config).unwrap_err();

    assert!(matches!(err, Pdf2PptxError::Cancelled { completed_pages: 0 }));
    assert!(loader.tracker.rendered.lock().unwrap().is_empty());
}

#[test]
fn history_walks_every_state_in_order() {
    let loader = FakeLoader::new(small_pages(2));
    let config = ConversionConfig::default();
    let mut pipeline = Pipeline::new(&loader, &config);
    pipeline.run(PDF).unwrap();

    use PipelineState::*;
    assert_eq!(
        pipeline.history(),
        &[
            Idle,
            Loading,
            Rasterizing { page: 1 },
            Resolving,
            Appending { page: 1 },
            Reporting { page: 1 },
            Rasterizing { page: 2 },
            Appending { page: 2 },
            Reporting { page: 2 },
            Finalizing,
            Completed,
        ]
    );
}

#[test]
fn pipeline_refuses_a_second_run() {
    let loader = FakeLoader::new(small_pages(1));
    let config = ConversionConfig::default();
    let mut pipeline = Pipeline::new(&loader, &config);
    pipeline.run(PDF).unwrap();

    let err = pipeline.run(PDF).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::State);
    assert_eq!(pipeline.state(), PipelineState::Completed);
}

#[test]
fn panicking_observer_does_not_abort() {
    struct Explodes;
    impl ConversionProgressCallback for Explodes {
        fn on_progress(&self, _percent: u8) {
            panic!("observer bug");
        }
    }

    let loader = FakeLoader::new(small_pages(2));
    let config = ConversionConfig::builder()
        .progress_callback(Arc::new(Explodes))
        .build()
        .unwrap();

    let output = convert_with_loader(&loader, PDF, &config).unwrap();
    assert_eq!(output.slide_count, 2);
}

#[test]
fn title_and_author_land_in_core_properties() {
    let loader = FakeLoader::new(small_pages(1));
    let config = ConversionConfig::builder()
        .title("Q3 <review>")
        .author("Ops & Finance")
        .build()
        .unwrap();

    let output = convert_with_loader(&loader, PDF, &config).unwrap();
    let mut zip = archive(&output.pptx);
    let core = String::from_utf8(entry_bytes(&mut zip, "docProps/core.xml")).unwrap();
    assert!(core.contains("Q3 &lt;review&gt;"));
    assert!(core.contains("Ops &amp; Finance"));
}

#[test]
fn control_characters_in_pdf_title_are_dropped_from_core_properties() {
    let mut loader = FakeLoader::new(small_pages(1));
    loader.title = Some("Deck\u{1}\u{0}".into());

    let output = convert_with_loader(&loader, PDF, &ConversionConfig::default()).unwrap();
    let mut zip = archive(&output.pptx);
    let core = entry_bytes(&mut zip, "docProps/core.xml");

    let illegal: Vec<u8> = core
        .iter()
        .copied()
        .filter(|b| *b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r'))
        .collect();
    assert!(illegal.is_empty(), "control bytes in core.xml: {illegal:?}");

    let core = String::from_utf8(core).unwrap();
    assert!(core.contains("<dc:title>Deck</dc:title>"));

    let mut reader = Reader::from_str(&core);
    while !matches!(reader.read_event().expect("core.xml parses"), Event::Eof) {}
}
