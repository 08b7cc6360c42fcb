//! Single-band float GeoTIFF output.

use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::{DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;
use tracing::debug;

use super::{GeoReference, RasterWriter};
use crate::accumulator::TileRaster;
use crate::error::{RasterError, Result};

// GeoTIFF tag IDs (not in the tiff crate)
const GEOTIFF_MODELPIXELSCALE: u16 = 33550;
const GEOTIFF_MODELTIEPOINT: u16 = 33922;
const GEOTIFF_GEOKEYDIRECTORY: u16 = 34735;
const GDAL_NODATA: u16 = 42113;

// GeoKey IDs
const GT_MODEL_TYPE_GEO_KEY: u16 = 1024;
const GT_RASTER_TYPE_GEO_KEY: u16 = 1025;
const PROJECTED_CS_TYPE_GEO_KEY: u16 = 3072;

// GeoKey values
const MODEL_TYPE_PROJECTED: u16 = 1;
const RASTER_PIXEL_IS_AREA: u16 = 1;

/// Writes tiles as uncompressed `f32` GeoTIFFs with NaN no-data.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoTiffWriter;

impl GeoTiffWriter {
    pub fn new() -> Self {
        Self
    }

    /// Encode a raster into any seekable sink.
    pub fn write_to<W: Write + Seek>(
        &self,
        writer: W,
        raster: &TileRaster,
        georef: &GeoReference,
    ) -> Result<()> {
        if raster.width == 0 || raster.height == 0 {
            return Err(RasterError::invalid_raster("raster has zero dimensions"));
        }
        if raster.data.len() != raster.width * raster.height {
            return Err(RasterError::invalid_raster(format!(
                "raster holds {} values, expected {}x{}",
                raster.data.len(),
                raster.width,
                raster.height
            )));
        }

        let mut encoder = TiffEncoder::new(writer)?;
        let mut image =
            encoder.new_image::<Gray32Float>(raster.width as u32, raster.height as u32)?;
        write_geotiff_tags(image.encoder(), georef)?;
        image.write_data(&raster.data)?;
        Ok(())
    }

    /// Encode a raster in memory.
    pub fn to_geotiff_bytes(&self, raster: &TileRaster, georef: &GeoReference) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.write_to(&mut buffer, raster, georef)?;
        Ok(buffer.into_inner())
    }
}

impl RasterWriter for GeoTiffWriter {
    fn write(&self, path: &Path, raster: &TileRaster, georef: &GeoReference) -> Result<()> {
        let file = File::create(path).map_err(|e| RasterError::write(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer, raster, georef)
            .map_err(|e| e.at_path(path))?;
        writer.flush().map_err(|e| RasterError::write(path, e))?;

        debug!(
            path = %path.display(),
            width = raster.width,
            height = raster.height,
            origin_x = georef.origin_x,
            origin_y = georef.origin_y,
            "Wrote GeoTIFF"
        );
        Ok(())
    }
}

fn write_geotiff_tags<W: Write + Seek, K: TiffKind>(
    dir: &mut DirectoryEncoder<W, K>,
    georef: &GeoReference,
) -> tiff::TiffResult<()> {
    // ModelPixelScale: [ScaleX, ScaleY, ScaleZ]
    let pixel_scale = [georef.pixel_scale, georef.pixel_scale, 0.0];
    dir.write_tag(Tag::Unknown(GEOTIFF_MODELPIXELSCALE), pixel_scale.as_slice())?;

    // ModelTiepoint: pixel (0, 0) sits at the tile origin
    let tiepoint = [0.0, 0.0, 0.0, georef.origin_x, georef.origin_y, 0.0];
    dir.write_tag(Tag::Unknown(GEOTIFF_MODELTIEPOINT), tiepoint.as_slice())?;

    let geokeys = geokey_directory(georef);
    dir.write_tag(Tag::Unknown(GEOTIFF_GEOKEYDIRECTORY), geokeys.as_slice())?;

    dir.write_tag(Tag::Unknown(GDAL_NODATA), "nan")?;
    Ok(())
}

/// `[version, revision, minor, count, (key, location, count, value)...]`
fn geokey_directory(georef: &GeoReference) -> Vec<u16> {
    let mut entries = vec![
        [GT_MODEL_TYPE_GEO_KEY, 0, 1, MODEL_TYPE_PROJECTED],
        [GT_RASTER_TYPE_GEO_KEY, 0, 1, RASTER_PIXEL_IS_AREA],
    ];
    if let Some(code) = georef.zone {
        entries.push([PROJECTED_CS_TYPE_GEO_KEY, 0, 1, code.value()]);
    }

    let mut keys = vec![1, 1, 0, entries.len() as u16];
    keys.extend(entries.iter().flatten());
    keys
}
