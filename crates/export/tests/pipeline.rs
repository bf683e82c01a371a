use async_trait::async_trait;
use cv_model::{AppState, DownloadLayout, PersonalData};
use export::{
    DirectorySink, ExportError, Exporter, MemorySink, Notice, RasterOptions, Rasterizer,
    RecordingNotifier, Result, STAGING_ID_PREFIX,
};
use image::{Rgba, RgbaImage};
use render_model::{PreviewDocument, PreviewTheme};
use std::sync::Mutex;
use store::ExportSettings;
use tempfile::TempDir;

/// What a rasterizer saw while the staging container was mounted
#[derive(Debug, Default, Clone)]
struct Observation {
    container_id: String,
    mounted: bool,
    background: Option<String>,
    width: Option<String>,
}

fn observe(document: &PreviewDocument, container_id: &str) -> Observation {
    let container = document.element_by_id(container_id);
    Observation {
        container_id: container_id.to_string(),
        mounted: container.is_some(),
        background: document
            .resolve_variable(container_id, "--cv-bg")
            .map(str::to_string),
        width: container
            .and_then(|node| node.style_value("width"))
            .map(str::to_string),
    }
}

struct FixedRasterizer {
    width: u32,
    height: u32,
    seen: Mutex<Vec<Observation>>,
}

impl FixedRasterizer {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn seen(&self) -> Vec<Observation> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Rasterizer for FixedRasterizer {
    async fn rasterize(
        &self,
        document: &PreviewDocument,
        container_id: &str,
        _options: &RasterOptions,
    ) -> Result<RgbaImage> {
        self.seen.lock().unwrap().push(observe(document, container_id));
        Ok(RgbaImage::from_pixel(
            self.width,
            self.height,
            Rgba([30, 30, 30, 255]),
        ))
    }
}

struct FailingRasterizer {
    seen: Mutex<Vec<Observation>>,
}

#[async_trait]
impl Rasterizer for FailingRasterizer {
    async fn rasterize(
        &self,
        document: &PreviewDocument,
        container_id: &str,
        _options: &RasterOptions,
    ) -> Result<RgbaImage> {
        self.seen.lock().unwrap().push(observe(document, container_id));
        Err(ExportError::Rasterize("canvas unavailable".to_string()))
    }
}

fn personal(first: &str, last: &str) -> PersonalData {
    PersonalData {
        first_name: first.to_string(),
        last_name: last.to_string(),
        ..Default::default()
    }
}

fn count(haystack: &[u8], needle: &str) -> usize {
    String::from_utf8_lossy(haystack).matches(needle).count()
}

#[tokio::test]
async fn missing_preview_gives_notice_and_no_file() {
    let temp = TempDir::new().unwrap();
    let sink = DirectorySink::new(temp.path().join("out"));
    let notifier = RecordingNotifier::new();
    let rasterizer = FixedRasterizer::new(220, 100);
    let exporter = Exporter::new(rasterizer, ExportSettings::default());

    let mut document = PreviewDocument::new();
    let outcome = exporter
        .download(&mut document, &personal("Ana", "Ruiz"), DownloadLayout::Classic, &sink, &notifier)
        .await;

    assert!(outcome.is_none());
    assert_eq!(notifier.notices(), vec![Notice::MissingPreview]);
    assert!(!temp.path().join("out").exists());
}

#[tokio::test]
async fn tall_preview_spans_four_pages_with_one_image() {
    let state = AppState::default();
    let mut document = PreviewDocument::from_state(&state, PreviewTheme::Light);
    let settings = ExportSettings {
        compress: false,
        ..Default::default()
    };
    // Same aspect as 2200 x 11340: scales to just under 1000 mm
    let exporter = Exporter::new(FixedRasterizer::new(220, 1134), settings);

    let pdf = exporter
        .export(&mut document, &personal("Ana", "Ruiz"), DownloadLayout::Classic)
        .await
        .unwrap();

    assert_eq!(pdf.page_count, 4);
    assert_eq!(pdf.filename, "Ana_Ruiz_classic_cv.pdf");
    assert_eq!(count(&pdf.bytes, "/Type /Page "), 4);
    assert_eq!(count(&pdf.bytes, "/Subtype /Image"), 1);
    assert_eq!(count(&pdf.bytes, "/Im1 Do"), 4);
    assert!(pdf.bytes.starts_with(b"%PDF-1.4"));
}

#[tokio::test]
async fn staging_is_mounted_during_rasterize_and_removed_after() {
    let mut document = PreviewDocument::from_state(&AppState::default(), PreviewTheme::Dark);
    let before = document.clone();
    let exporter = Exporter::new(FixedRasterizer::new(220, 100), ExportSettings::default());

    exporter
        .export(&mut document, &PersonalData::default(), DownloadLayout::Compact)
        .await
        .unwrap();

    let seen = exporter.rasterizer().seen();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].mounted);
    assert!(seen[0].container_id.starts_with(STAGING_ID_PREFIX));
    assert_eq!(seen[0].background.as_deref(), Some("#ffffff"));
    assert_eq!(seen[0].width.as_deref(), Some("1100px"));

    assert!(!document.contains(&seen[0].container_id));
    assert_eq!(document, before);
}

#[tokio::test]
async fn failed_rasterize_still_removes_staging() {
    let mut document = PreviewDocument::from_state(&AppState::default(), PreviewTheme::Light);
    let before = document.clone();
    let exporter = Exporter::new(
        FailingRasterizer {
            seen: Mutex::new(Vec::new()),
        },
        ExportSettings::default(),
    );
    let sink = MemorySink::new();
    let notifier = RecordingNotifier::new();

    let outcome = exporter
        .download(&mut document, &personal("Ana", ""), DownloadLayout::Classic, &sink, &notifier)
        .await;

    assert!(outcome.is_none());
    assert_eq!(notifier.notices(), vec![Notice::ExportFailed]);
    assert!(sink.files().is_empty());

    let seen = exporter.rasterizer().seen.lock().unwrap().clone();
    assert!(seen[0].mounted);
    assert!(!document.contains(&seen[0].container_id));
    assert_eq!(document, before);
}

#[tokio::test]
async fn download_saves_under_derived_name() {
    let temp = TempDir::new().unwrap();
    let sink = DirectorySink::new(temp.path());
    let notifier = RecordingNotifier::new();
    let mut document = PreviewDocument::from_state(&AppState::default(), PreviewTheme::Light);
    let exporter = Exporter::new(FixedRasterizer::new(220, 100), ExportSettings::default());

    let outcome = exporter
        .download(
            &mut document,
            &personal("Ana María", "Ruíz-López"),
            DownloadLayout::Compact,
            &sink,
            &notifier,
        )
        .await
        .unwrap();

    assert_eq!(outcome.filename, "Ana_Mara_Ruz-Lpez_compact_cv.pdf");
    assert_eq!(outcome.page_count, 1);
    assert!(notifier.notices().is_empty());
    let bytes = std::fs::read(&outcome.path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    // Non-ASCII title goes out as UTF-16 hex
    assert!(String::from_utf8_lossy(&bytes).contains("/Title <FEFF"));
}

#[tokio::test]
async fn concurrent_documents_use_distinct_containers() {
    let exporter = Exporter::new(FixedRasterizer::new(220, 100), ExportSettings::default());
    let mut first = PreviewDocument::from_state(&AppState::default(), PreviewTheme::Light);
    let mut second = first.clone();
    let owner = PersonalData::default();

    let (a, b) = tokio::join!(
        exporter.export(&mut first, &owner, DownloadLayout::Classic),
        exporter.export(&mut second, &owner, DownloadLayout::Classic),
    );
    assert!(a.is_ok() && b.is_ok());

    let seen = exporter.rasterizer().seen();
    assert_eq!(seen.len(), 2);
    assert_ne!(seen[0].container_id, seen[1].container_id);
}
