//! Built-in raster backend for PNG and PDF exports.
//!
//! # Responsibility
//! - Rasterize a captured SVG document with resvg at the requested scale.
//! - Encode the pixmap as PNG, or embed it as a single-page PDF image.
//!
//! # Invariants
//! - The capture's own background rect is kept; PDF pages are flattened
//!   onto white because PDF images carry no alpha here.
//! - A PDF page measures the capture at 96 dpi, whatever the scale.

use crate::export::{ExportFormat, RasterBackend, RasterRequest};
use printpdf::image_crate::{DynamicImage, RgbImage};
use printpdf::{Image, ImageTransform, Mm, PdfDocument};
use resvg::tiny_skia::{Color, Pixmap, Transform};
use resvg::usvg::{Options, Tree};

const CSS_DPI: f64 = 96.0;
const MM_PER_INCH: f64 = 25.4;
/// Largest pixmap edge accepted after scaling.
const MAX_EDGE_PX: f64 = 16_384.0;

/// resvg-based backend; system fonts are loaded once on construction.
pub struct ResvgBackend {
    options: Options<'static>,
}

impl Default for ResvgBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ResvgBackend {
    pub fn new() -> Self {
        let mut options = Options::default();
        options.fontdb_mut().load_system_fonts();
        Self { options }
    }

    fn render(&self, request: &RasterRequest<'_>) -> Result<Pixmap, String> {
        let scale = request.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(format!("invalid export scale {scale}"));
        }
        let width = (f64::from(request.document.width) * scale).ceil();
        let height = (f64::from(request.document.height) * scale).ceil();
        if width > MAX_EDGE_PX || height > MAX_EDGE_PX {
            return Err(format!("capture {width}x{height} exceeds {MAX_EDGE_PX} px"));
        }

        let tree = Tree::from_str(&request.document.markup, &self.options)
            .map_err(|err| format!("svg parse failed: {err}"))?;
        let mut pixmap = Pixmap::new(width as u32, height as u32)
            .ok_or_else(|| format!("cannot allocate {width}x{height} pixmap"))?;
        if request.format == ExportFormat::Pdf {
            pixmap.fill(Color::WHITE);
        }
        let transform = Transform::from_scale(scale as f32, scale as f32);
        resvg::render(&tree, transform, &mut pixmap.as_mut());
        Ok(pixmap)
    }
}

impl RasterBackend for ResvgBackend {
    fn rasterize(&self, request: &RasterRequest<'_>) -> Result<Vec<u8>, String> {
        let pixmap = self.render(request)?;
        match request.format {
            ExportFormat::Png => pixmap
                .encode_png()
                .map_err(|err| format!("png encode failed: {err}")),
            ExportFormat::Pdf => encode_pdf(&pixmap, request),
            ExportFormat::Svg => Err("svg is not a raster format".to_string()),
        }
    }
}

fn encode_pdf(pixmap: &Pixmap, request: &RasterRequest<'_>) -> Result<Vec<u8>, String> {
    // Opaque after the white fill, so dropping alpha loses nothing.
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    let image = RgbImage::from_raw(pixmap.width(), pixmap.height(), rgb)
        .ok_or_else(|| "pixmap buffer has the wrong size".to_string())?;

    let page_w = Mm((f64::from(request.document.width) * MM_PER_INCH / CSS_DPI) as f32);
    let page_h = Mm((f64::from(request.document.height) * MM_PER_INCH / CSS_DPI) as f32);
    let (doc, page, layer) = PdfDocument::new("Routine", page_w, page_h, "capture");
    let layer = doc.get_page(page).get_layer(layer);

    Image::from_dynamic_image(&DynamicImage::ImageRgb8(image)).add_to_layer(
        layer,
        ImageTransform {
            dpi: Some((CSS_DPI * request.scale) as f32),
            ..ImageTransform::default()
        },
    );
    doc.save_to_bytes()
        .map_err(|err| format!("pdf encode failed: {err}"))
}
