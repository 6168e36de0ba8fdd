//! Reading-frame translation for translated-query comparisons.
//!
//! A translated pass compares one forward reading frame of a nucleotide
//! query against a peptide subject, so only forward frames exist here.

use crate::core::alphabet::Alphabet;
use crate::core::gencode::GeneticCode;

/// Translate one forward reading frame into peptide residue ids.
/// The result has `(seq.len() - frame) / 3` residues; a trailing partial
/// codon is dropped.
pub fn translate_frame(seq: &[u8], frame: usize, code: &GeneticCode) -> Vec<u8> {
    let start = frame.min(seq.len());
    let mut out = Vec::with_capacity((seq.len() - start) / 3);
    for codon in seq[start..].chunks_exact(3) {
        out.push(Alphabet::Peptide.translate(code.get(codon)));
    }
    out
}
