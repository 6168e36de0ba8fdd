//! Pre-flight grid sizing.
//!
//! Before the grid is allocated the requested zoom is checked against the
//! host limit on buffer dimensions. When a dimension would exceed the
//! limit the zoom is raised to the smallest whole number of source
//! positions per cell that fits, and both dimensions are recomputed. The
//! full coordinate range stays representable; only the resolution drops.

use anyhow::{bail, Result};

/// Default cap on either grid dimension.
pub const DEFAULT_MAX_GRID_DIM: usize = 32_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub width: usize,
    pub height: usize,
    /// Source positions per cell actually used; never below the request.
    pub zoom: f64,
}

fn cells(len: usize, scale: f64) -> usize {
    (len as f64 / scale).ceil() as usize
}

/// Size the grid for the given sequence lengths. `frames` scales the query
/// axis of a translated comparison, whose raw length is in nucleotides but
/// whose grid coordinates are in amino acids; it is 1 otherwise. The
/// subject axis is always in the coordinates the scanner emits.
pub fn plan(
    query_len: usize,
    subject_len: usize,
    zoom: f64,
    frames: usize,
    max_dim: usize,
) -> Result<GridGeometry> {
    if query_len == 0 || subject_len == 0 {
        bail!("cannot size a grid for an empty sequence");
    }
    if max_dim == 0 {
        bail!("maximum grid dimension must be at least 1");
    }
    let frame_scale = frames.max(1) as f64;
    let mut used = zoom;
    if cells(query_len, used * frame_scale) > max_dim || cells(subject_len, used) > max_dim {
        let need_q = (query_len as f64 / (max_dim as f64 * frame_scale)).ceil();
        let need_s = (subject_len as f64 / max_dim as f64).ceil();
        used = need_q.max(need_s);
        eprintln!(
            "seqdot: grid exceeds the {} cell limit, reducing resolution (zoom {} -> {})",
            max_dim, zoom, used
        );
    }
    Ok(GridGeometry {
        width: cells(query_len, used * frame_scale),
        height: cells(subject_len, used),
        zoom: used,
    })
}
