//! Run configuration for a dot-plot computation.
//!
//! A `DotplotConfig` collects every input that influences the output grid.
//! Changing any field invalidates a previously computed grid; there is no
//! incremental update path, the caller recomputes from scratch.

use anyhow::{bail, Result};

use crate::core::geometry::DEFAULT_MAX_GRID_DIM;

/// Which kinds of sequences are being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonMode {
    /// Peptide query against peptide subject.
    ProteinProtein,
    /// Nucleotide query against nucleotide subject, both strands by default.
    NucleotideNucleotide,
    /// Nucleotide query translated in reading frames against a peptide subject.
    TranslatedVsProtein,
}

impl ComparisonMode {
    pub fn is_translated(self) -> bool {
        matches!(self, ComparisonMode::TranslatedVsProtein)
    }
}

#[derive(Debug, Clone)]
pub struct DotplotConfig {
    pub mode: ComparisonMode,
    /// Sliding window length in residue pairs.
    pub window: usize,
    /// Source positions represented by one grid cell along each axis. The
    /// engine may raise this to keep the grid under `max_grid_dim`.
    pub zoom: f64,
    /// Score-to-intensity scale. Zero selects the matrix default, which
    /// maps a perfect window to 255.
    pub pixel_scale: f64,
    /// Mirror a self-comparison across the main diagonal.
    pub mirror: bool,
    /// Scan the forward query strand (nucleotide mode only).
    pub forward_strand: bool,
    /// Scan the reverse-complement query strand (nucleotide mode only).
    pub reverse_strand: bool,
    /// Reading frames of a translated query.
    pub frames: usize,
    /// Hard cap on either grid dimension.
    pub max_grid_dim: usize,
    /// NCBI genetic code id used to translate the query.
    pub genetic_code: u8,
    /// Optional half-open byte range restricting the query.
    pub query_range: Option<(usize, usize)>,
    /// Optional half-open byte range restricting the subject.
    pub subject_range: Option<(usize, usize)>,
}

impl DotplotConfig {
    pub fn new(mode: ComparisonMode, window: usize) -> Self {
        Self {
            mode,
            window,
            zoom: 1.0,
            pixel_scale: 0.0,
            mirror: false,
            forward_strand: true,
            reverse_strand: true,
            frames: 3,
            max_grid_dim: DEFAULT_MAX_GRID_DIM,
            genetic_code: 1,
            query_range: None,
            subject_range: None,
        }
    }

    /// Field-level checks that need no sequence or matrix context.
    /// Cross checks (matrix size, range bounds, mirror preconditions) live
    /// in the session constructor; both run before any allocation.
    pub fn validate(&self) -> Result<()> {
        if self.window == 0 {
            bail!("sliding window size must be at least 1");
        }
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            bail!("zoom factor must be positive, got {}", self.zoom);
        }
        if !self.pixel_scale.is_finite() || self.pixel_scale < 0.0 {
            bail!("pixel scale must be non-negative, got {}", self.pixel_scale);
        }
        if self.max_grid_dim == 0 {
            bail!("maximum grid dimension must be at least 1");
        }
        if self.mode.is_translated() && !(1..=3).contains(&self.frames) {
            bail!("reading frame count must be 1..=3, got {}", self.frames);
        }
        for (name, range) in [("query", self.query_range), ("subject", self.subject_range)] {
            if let Some((start, end)) = range {
                if start >= end {
                    bail!("{name} range {start}..{end} is empty");
                }
            }
        }
        Ok(())
    }
}
