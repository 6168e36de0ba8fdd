//! Pass orchestration and the computation session.
//!
//! A `DotplotSession` owns everything one computation needs: the validated
//! configuration, the sequences under comparison, the matrix and the sized
//! grid geometry. It is created by a validating constructor and consumed
//! by `run`, which executes every pass the comparison mode calls for and
//! hands back the finished grid. No state outlives the run.

use anyhow::{bail, Result};

use crate::config::{ComparisonMode, DotplotConfig};
use crate::core::alphabet::Alphabet;
use crate::core::diagnostics::{diagnostics_enabled, ScanDiagnostics};
use crate::core::gencode::GeneticCode;
use crate::core::geometry::{self, GridGeometry};
use crate::core::matrix::SubstitutionMatrix;
use crate::core::mirror::mirror_grid;
use crate::core::pixelmap::PixelMap;
use crate::core::scanner::{scan_pass, ScanDirection, ScanParams};
use crate::core::score_vector::ScoreVector;
use crate::core::translation::translate_frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

/// One scanner invocation: which strand/frame of the query feeds the
/// score vector and which way the subject axis is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSpec {
    pub strand: Strand,
    pub frame: usize,
    pub direction: ScanDirection,
}

/// The single mode-to-passes mapping. An empty list is valid: the grid
/// then stays at its initial zero state.
pub fn passes_for(mode: ComparisonMode, forward: bool, reverse: bool, frames: usize) -> Vec<PassSpec> {
    match mode {
        ComparisonMode::ProteinProtein => vec![PassSpec {
            strand: Strand::Forward,
            frame: 0,
            direction: ScanDirection::Ascending,
        }],
        ComparisonMode::NucleotideNucleotide => {
            let mut passes = Vec::with_capacity(2);
            if forward {
                passes.push(PassSpec {
                    strand: Strand::Forward,
                    frame: 0,
                    direction: ScanDirection::Ascending,
                });
            }
            if reverse {
                passes.push(PassSpec {
                    strand: Strand::Reverse,
                    frame: 0,
                    direction: ScanDirection::Descending,
                });
            }
            passes
        }
        ComparisonMode::TranslatedVsProtein => (0..frames)
            .map(|frame| PassSpec {
                strand: Strand::Forward,
                frame,
                direction: ScanDirection::Ascending,
            })
            .collect(),
    }
}

/// The finished computation: the grid plus the geometry actually used,
/// which may differ from the request after resolution capping.
#[derive(Debug, Clone)]
pub struct Dotplot {
    pub grid: PixelMap,
    pub zoom: f64,
    pub window: usize,
    pub pixel_scale: f64,
}

pub struct DotplotSession<'a> {
    config: DotplotConfig,
    query: &'a [u8],
    subject: &'a [u8],
    matrix: &'a SubstitutionMatrix,
    geometry: GridGeometry,
    pixel_scale: f64,
    diagnostics: ScanDiagnostics,
}

fn slice_range<'s>(seq: &'s [u8], range: Option<(usize, usize)>, name: &str) -> Result<&'s [u8]> {
    match range {
        None => Ok(seq),
        Some((start, end)) => {
            if end > seq.len() {
                bail!(
                    "{name} range {start}..{end} exceeds the sequence length {}",
                    seq.len()
                );
            }
            Ok(&seq[start..end])
        }
    }
}

impl<'a> DotplotSession<'a> {
    /// Validate the whole configuration against the sequences and the
    /// matrix, and size the grid. Nothing is allocated and no scan work
    /// happens until `run`; every configuration error surfaces here.
    pub fn new(
        config: DotplotConfig,
        query: &'a [u8],
        subject: &'a [u8],
        matrix: &'a SubstitutionMatrix,
    ) -> Result<Self> {
        config.validate()?;
        let query = slice_range(query, config.query_range, "query")?;
        let subject = slice_range(subject, config.subject_range, "subject")?;
        if query.is_empty() {
            bail!("query sequence is empty");
        }
        if subject.is_empty() {
            bail!("subject sequence is empty");
        }

        let expected = query_alphabet(config.mode, Strand::Forward).size();
        if matrix.size() != expected {
            bail!(
                "substitution matrix {} is {2}x{2} but this comparison needs {1}x{1}",
                matrix.name(),
                expected,
                matrix.size()
            );
        }

        if config.mirror {
            if config.mode.is_translated() {
                bail!("mirroring is not defined for frame-shifted comparisons");
            }
            if !matrix.is_symmetric() {
                bail!("mirroring requires a symmetric substitution matrix");
            }
            if query != subject {
                bail!("mirroring requires comparing a sequence against itself");
            }
        }

        let frames = if config.mode.is_translated() {
            config.frames
        } else {
            1
        };
        let geometry = geometry::plan(
            query.len(),
            subject.len(),
            config.zoom,
            frames,
            config.max_grid_dim,
        )?;
        let pixel_scale = if config.pixel_scale > 0.0 {
            config.pixel_scale
        } else {
            matrix.default_pixel_scale()
        };

        Ok(Self {
            config,
            query,
            subject,
            matrix,
            geometry,
            pixel_scale,
            diagnostics: ScanDiagnostics::default(),
        })
    }

    /// Grid geometry that `run` will use.
    pub fn geometry(&self) -> GridGeometry {
        self.geometry
    }

    pub fn diagnostics(&self) -> &ScanDiagnostics {
        &self.diagnostics
    }

    pub fn passes(&self) -> Vec<PassSpec> {
        passes_for(
            self.config.mode,
            self.config.forward_strand,
            self.config.reverse_strand,
            self.config.frames,
        )
    }

    /// Execute every pass, mirror if requested, and hand the grid over.
    pub fn run(self) -> Result<Dotplot> {
        let mut grid = PixelMap::new(self.geometry.width, self.geometry.height);
        let subject_ids = self.subject_alphabet().encode(self.subject);

        for pass in self.passes() {
            let query_ids = self.query_ids(&pass);
            let scores = ScoreVector::build(
                &query_ids,
                self.matrix,
                query_alphabet(self.config.mode, pass.strand).non_residue(),
            );
            scan_pass(
                &ScanParams {
                    scores: &scores,
                    subject: &subject_ids,
                    window: self.config.window,
                    direction: pass.direction,
                    zoom: self.geometry.zoom,
                    pixel_scale: self.pixel_scale,
                    lower_triangle: self.config.mirror,
                },
                &mut grid,
                &self.diagnostics,
            );
            self.diagnostics.record_pass();
        }

        if self.config.mirror {
            mirror_grid(&mut grid, &self.diagnostics);
        }
        if diagnostics_enabled() {
            self.diagnostics.print_summary();
        }

        Ok(Dotplot {
            grid,
            zoom: self.geometry.zoom,
            window: self.config.window,
            pixel_scale: self.pixel_scale,
        })
    }

    fn subject_alphabet(&self) -> Alphabet {
        match self.config.mode {
            ComparisonMode::NucleotideNucleotide => Alphabet::NucleotideForward,
            _ => Alphabet::Peptide,
        }
    }

    /// Residue ids the score vector of this pass is built from.
    fn query_ids(&self, pass: &PassSpec) -> Vec<u8> {
        match self.config.mode {
            ComparisonMode::ProteinProtein => Alphabet::Peptide.encode(self.query),
            ComparisonMode::NucleotideNucleotide => {
                query_alphabet(self.config.mode, pass.strand).encode(self.query)
            }
            ComparisonMode::TranslatedVsProtein => {
                let code = GeneticCode::from_id(self.config.genetic_code);
                translate_frame(self.query, pass.frame, &code)
            }
        }
    }
}

fn query_alphabet(mode: ComparisonMode, strand: Strand) -> Alphabet {
    match mode {
        ComparisonMode::NucleotideNucleotide => match strand {
            Strand::Forward => Alphabet::NucleotideForward,
            Strand::Reverse => Alphabet::NucleotideReverse,
        },
        _ => Alphabet::Peptide,
    }
}
