//! PNG export of the optical depth table.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use skyshell_scatter::OpticalDepthTable;
use tracing::info;

use crate::error::ViewerError;

/// Write `table` as an RGBA8 PNG, one pixel per cell.
///
/// Columns are altitude (surface on the left), rows are view angle (straight
/// down at the top). Each channel is normalized by its maximum: R and B hold
/// Rayleigh and Mie density, G and A hold Rayleigh and Mie optical depth.
pub fn write_table_png(table: &OpticalDepthTable, path: &Path) -> Result<(), ViewerError> {
    let resolution = table.resolution();
    let width = resolution.altitude as u32;
    let height = resolution.angle as u32;
    let pixels = table.to_rgba8();

    let file = File::create(path).map_err(|source| ViewerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let image_error = |source| ViewerError::Image {
        path: path.to_path_buf(),
        source,
    };

    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().map_err(image_error)?;
    writer.write_image_data(&pixels).map_err(image_error)?;
    writer.finish().map_err(image_error)?;

    info!(path = %path.display(), width, height, "wrote optical depth table image");
    Ok(())
}
