//! SVG-to-PNG rasterization via `usvg`/`resvg`/`tiny-skia`.

use super::ChartError;

/// Converts an SVG document to PNG bytes at the given supersampling
/// scale.
///
/// Returns the encoded bytes together with the raster dimensions in
/// pixels.
pub fn svg_to_png(svg: &str, scale: f32) -> Result<(Vec<u8>, u32, u32), ChartError> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| ChartError::Svg(e.to_string()))?;

    let size = tree.size();
    let w = ((size.width() * scale).round() as u32).max(1);
    let h = ((size.height() * scale).round() as u32).max(1);

    let mut pixmap = tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| ChartError::Png("failed to allocate pixmap".into()))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    let bytes = pixmap
        .encode_png()
        .map_err(|e| ChartError::Png(e.to_string()))?;
    Ok((bytes, w, h))
}
