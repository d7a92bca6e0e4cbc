//! Diagram export as SVG markup or a rasterized PNG.

use std::fmt::Write;

use htmlize::{escape_attribute, escape_text};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement, HtmlImageElement};

use crate::layout::routing::point_along;

use super::render;
use super::state::DiagramState;

/// Download name of the SVG export.
pub const SVG_FILE_NAME: &str = "er-diagram.svg";
/// Download name of the PNG export.
pub const PNG_FILE_NAME: &str = "er-diagram.png";
/// Alert shown when PNG export fails.
pub const PNG_FAILURE_MESSAGE: &str = "Failed to download as PNG. Try using SVG instead.";

/// Export failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExportError {
	/// Writing or downloading the SVG failed.
	#[error("SVG export failed: {0}")]
	Svg(String),
	/// Rasterizing or downloading the PNG failed.
	#[error("PNG conversion failed: {0}")]
	PngConversion(String),
}

/// Output format of an export.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
	/// Vector markup.
	Svg,
	/// Raster image.
	Png,
}

impl ImageFormat {
	/// Download file name.
	pub fn file_name(self) -> &'static str {
		match self {
			ImageFormat::Svg => SVG_FILE_NAME,
			ImageFormat::Png => PNG_FILE_NAME,
		}
	}
}

fn js_message(err: wasm_bindgen::JsValue) -> String {
	err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// Serializes the diagram as it is currently shown.
pub fn to_svg(state: &DiagramState) -> String {
	let (w, h) = (state.canvas.width, state.canvas.height);
	let t = state.transform;
	let mut out = String::new();
	let _ = writeln!(
		&mut out,
		r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
	);
	out.push_str(
		r#"<defs><marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="10" markerHeight="10" markerUnits="userSpaceOnUse" orient="auto"><path d="M 0 0 L 10 5 L 0 10 z" fill="context-stroke"/></marker></defs>"#,
	);
	let _ = write!(
		&mut out,
		r#"<rect width="100%" height="100%" fill="{}"/>"#,
		render::BACKGROUND
	);
	let _ = write!(
		&mut out,
		r#"<g transform="translate({} {}) scale({})">"#,
		t.x, t.y, t.k
	);

	for guide in &state.guides {
		let _ = write!(
			&mut out,
			r#"<circle cx="{}" cy="{}" r="{}" fill="none" stroke="{}" stroke-dasharray="{},{}"/>"#,
			guide.center.x,
			guide.center.y,
			guide.radius,
			escape_attribute(guide.stroke.as_str()),
			guide.dash.0,
			guide.dash.1
		);
	}

	for edge in &state.edges {
		let Some(first) = edge.route.first() else {
			continue;
		};
		let _ = write!(&mut out, r#"<path d="M {} {}"#, first.x, first.y);
		for p in &edge.route[1..] {
			let _ = write!(&mut out, " L {} {}", p.x, p.y);
		}
		let _ = write!(
			&mut out,
			r#"" fill="none" stroke="{}" stroke-width="{}""#,
			escape_attribute(edge.style.stroke.as_str()),
			edge.style.stroke_width
		);
		if edge.style.dashed {
			out.push_str(r#" stroke-dasharray="5,5""#);
		}
		out.push_str(r#" marker-end="url(#arrow)"/>"#);

		for (label, at) in [(&edge.source_label, 0.3), (&edge.target_label, 0.7)] {
			let Some(p) = point_along(&edge.route, at).filter(|_| !label.is_empty()) else {
				continue;
			};
			let _ = write!(
				&mut out,
				r#"<text x="{}" y="{}" font-family="sans-serif" font-size="12" fill="{}" text-anchor="middle">{}</text>"#,
				p.x,
				p.y - 8.0,
				render::FIELD_LABEL_COLOR,
				escape_text(label.as_str())
			);
		}
	}

	for node in &state.nodes {
		let c = node.center();
		let _ = write!(
			&mut out,
			r#"<g class="entity" data-id="{}"><rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
			escape_attribute(node.id.as_str()),
			node.x,
			node.y,
			node.width,
			node.height,
			render::ENTITY_RADIUS,
			render::ENTITY_FILL,
			escape_attribute(node.style.stroke.as_str()),
			node.style.stroke_width
		);
		let _ = write!(
			&mut out,
			r#"<text x="{}" y="{}" font-family="sans-serif" font-size="14" font-weight="bold" fill="{}" text-anchor="middle" dominant-baseline="middle">{}</text></g>"#,
			c.x,
			c.y,
			render::LABEL_COLOR,
			escape_text(node.label.as_str())
		);
	}

	out.push_str("</g></svg>\n");
	out
}

/// `data:` URL of SVG markup.
pub fn svg_data_url(svg: &str) -> String {
	let encoded: String = js_sys::encode_uri_component(svg).into();
	format!("data:image/svg+xml;charset=utf-8,{encoded}")
}

/// What an export needs from the diagram, captured so no borrow of the
/// live state is held while the browser decodes the image.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
	/// Output of [`to_svg`].
	pub svg: String,
	/// Raster width, at least one pixel.
	pub width: u32,
	/// Raster height, at least one pixel.
	pub height: u32,
}

impl Snapshot {
	/// Captures the current view.
	pub fn of(state: &DiagramState) -> Self {
		Self {
			svg: to_svg(state),
			width: state.canvas.width.max(1.0).round() as u32,
			height: state.canvas.height.max(1.0).round() as u32,
		}
	}
}

fn png_error(err: wasm_bindgen::JsValue) -> ExportError {
	ExportError::PngConversion(js_message(err))
}

async fn load_image(src: &str) -> Result<HtmlImageElement, ExportError> {
	let image = HtmlImageElement::new().map_err(png_error)?;
	let loaded = js_sys::Promise::new(&mut |resolve, reject| {
		image.set_onload(Some(&resolve));
		image.set_onerror(Some(&reject));
	});
	image.set_src(src);
	let result = JsFuture::from(loaded).await;
	image.set_onload(None);
	image.set_onerror(None);
	result
		.map(|_| image)
		.map_err(|_| ExportError::PngConversion("SVG image failed to load".into()))
}

/// Rasterizes the SVG markup through an offscreen canvas.
pub async fn png_data_url(snapshot: &Snapshot) -> Result<String, ExportError> {
	let image = load_image(&svg_data_url(&snapshot.svg)).await?;
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or_else(|| ExportError::PngConversion("no document".into()))?;
	let canvas: HtmlCanvasElement = document
		.create_element("canvas")
		.map_err(png_error)?
		.dyn_into()
		.map_err(|_| ExportError::PngConversion("not a canvas element".into()))?;
	canvas.set_width(snapshot.width);
	canvas.set_height(snapshot.height);
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.map_err(png_error)?
		.ok_or_else(|| ExportError::PngConversion("2d context unavailable".into()))?
		.dyn_into()
		.map_err(|_| ExportError::PngConversion("unexpected context type".into()))?;
	ctx.set_fill_style_str(render::BACKGROUND);
	ctx.fill_rect(0.0, 0.0, snapshot.width as f64, snapshot.height as f64);
	ctx.draw_image_with_html_image_element(&image, 0.0, 0.0)
		.map_err(png_error)?;
	canvas.to_data_url_with_type("image/png").map_err(png_error)
}

/// Returns the snapshot as a data URL in `format`.
pub async fn export_as_image(snapshot: &Snapshot, format: ImageFormat) -> Result<String, ExportError> {
	match format {
		ImageFormat::Svg => Ok(svg_data_url(&snapshot.svg)),
		ImageFormat::Png => png_data_url(snapshot).await,
	}
}

fn download_file(url: &str, file_name: &str) -> Result<(), String> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or("no document")?;
	let anchor: HtmlAnchorElement = document
		.create_element("a")
		.map_err(js_message)?
		.dyn_into()
		.map_err(|_| "not an anchor element")?;
	anchor.set_href(url);
	anchor.set_download(file_name);
	anchor.click();
	Ok(())
}

/// Exports and downloads the snapshot as `er-diagram.<ext>`.
pub async fn download(snapshot: Snapshot, format: ImageFormat) -> Result<(), ExportError> {
	let url = export_as_image(&snapshot, format).await?;
	download_file(&url, format.file_name()).map_err(|msg| match format {
		ImageFormat::Svg => ExportError::Svg(msg),
		ImageFormat::Png => ExportError::PngConversion(msg),
	})?;
	log::info!("downloaded {}", format.file_name());
	Ok(())
}
