//! Binary container for a computed dot-plot grid.
//!
//! Layout, all integers and floats big-endian:
//!
//! ```text
//! u8            format version (currently 1)
//! f64           zoom factor actually used
//! u32           grid width
//! u32           grid height
//! f64           pixel scale
//! u32           sliding window size
//! u16 + bytes   matrix name length, then the UTF-8 name
//! u16           matrix dimension N
//! i32 * N * N   matrix scores, row-major
//! u8 * W * H    grid bytes, row-major
//! ```
//!
//! A reader gets back everything needed to redraw or rescale the grid
//! without the original sequences. Truncated or oversized input is an
//! error, never a partial grid.

use std::io::{Read, Write};

use anyhow::{bail, Context, Result};

use crate::core::engine::Dotplot;
use crate::core::matrix::SubstitutionMatrix;
use crate::core::pixelmap::PixelMap;

pub const FORMAT_VERSION: u8 = 1;

/// Dimension sanity bounds for readers; no writer produces more.
const MAX_SNAPSHOT_DIM: u32 = 1_000_000;
const MAX_SNAPSHOT_CELLS: usize = 1 << 31;

#[derive(Debug)]
pub struct Snapshot {
    pub zoom: f64,
    pub window: usize,
    pub pixel_scale: f64,
    pub matrix: SubstitutionMatrix,
    pub grid: PixelMap,
}

pub fn write<W: Write>(out: &mut W, plot: &Dotplot, matrix: &SubstitutionMatrix) -> Result<()> {
    let name = matrix.name().as_bytes();
    if name.len() > u16::MAX as usize {
        bail!("matrix name of {} bytes does not fit the header", name.len());
    }
    if matrix.size() > u16::MAX as usize {
        bail!("matrix dimension {} does not fit the header", matrix.size());
    }
    out.write_all(&[FORMAT_VERSION])?;
    out.write_all(&plot.zoom.to_be_bytes())?;
    out.write_all(&(plot.grid.width() as u32).to_be_bytes())?;
    out.write_all(&(plot.grid.height() as u32).to_be_bytes())?;
    out.write_all(&plot.pixel_scale.to_be_bytes())?;
    out.write_all(&(plot.window as u32).to_be_bytes())?;
    out.write_all(&(name.len() as u16).to_be_bytes())?;
    out.write_all(name)?;
    out.write_all(&(matrix.size() as u16).to_be_bytes())?;
    for &score in matrix.scores() {
        out.write_all(&score.to_be_bytes())?;
    }
    out.write_all(plot.grid.data())?;
    Ok(())
}

fn read_u8<R: Read>(input: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    input.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u16<R: Read>(input: &mut R) -> Result<u16> {
    let mut buf = [0u8; 2];
    input.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

fn read_u32<R: Read>(input: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

fn read_i32<R: Read>(input: &mut R) -> Result<i32> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

fn read_f64<R: Read>(input: &mut R) -> Result<f64> {
    let mut buf = [0u8; 8];
    input.read_exact(&mut buf)?;
    Ok(f64::from_be_bytes(buf))
}

pub fn read<R: Read>(input: &mut R) -> Result<Snapshot> {
    let version = read_u8(input).context("reading snapshot version")?;
    if version != FORMAT_VERSION {
        bail!("unsupported snapshot version {version}");
    }
    let zoom = read_f64(input).context("reading zoom factor")?;
    if !zoom.is_finite() || zoom <= 0.0 {
        bail!("snapshot zoom factor {zoom} is not positive");
    }
    let width = read_u32(input).context("reading grid width")?;
    let height = read_u32(input).context("reading grid height")?;
    if width == 0 || height == 0 || width > MAX_SNAPSHOT_DIM || height > MAX_SNAPSHOT_DIM {
        bail!("snapshot grid dimensions {width}x{height} are out of range");
    }
    let pixel_scale = read_f64(input).context("reading pixel scale")?;
    let window = read_u32(input).context("reading window size")?;
    if window == 0 {
        bail!("snapshot window size must be at least 1");
    }

    let name_len = read_u16(input)? as usize;
    let mut name = vec![0u8; name_len];
    input.read_exact(&mut name).context("reading matrix name")?;
    let name = String::from_utf8(name).context("matrix name is not UTF-8")?;

    let dim = read_u16(input)? as usize;
    let mut scores = Vec::with_capacity(dim * dim);
    for _ in 0..dim * dim {
        scores.push(read_i32(input).context("reading matrix scores")?);
    }
    let matrix = SubstitutionMatrix::new(name, dim, scores)?;

    let cells = (width as usize)
        .checked_mul(height as usize)
        .context("grid size overflows")?;
    if cells > MAX_SNAPSHOT_CELLS {
        bail!("snapshot grid of {cells} cells exceeds the reader limit");
    }
    let mut data = vec![0u8; cells];
    input.read_exact(&mut data).context("reading grid bytes")?;
    let mut trailing = [0u8; 1];
    if input.read(&mut trailing)? != 0 {
        bail!("trailing bytes after the grid");
    }
    let grid = PixelMap::from_raw(width as usize, height as usize, data)?;

    Ok(Snapshot {
        zoom,
        window: window as usize,
        pixel_scale,
        matrix,
        grid,
    })
}
