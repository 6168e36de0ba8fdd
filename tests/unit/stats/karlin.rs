//! Window-size estimation from sequence composition.

use seqdot::core::alphabet::Alphabet;
use seqdot::core::matrix::SubstitutionMatrix;
use seqdot::stats::{
    karlin_params, residue_frequencies, standard_protein_frequencies, suggested_window,
    ScoreProfile,
};

#[test]
fn test_window_estimate_from_real_sequences() {
    let query = Alphabet::NucleotideForward.encode(b"ACGTTGCATCAGGCCATAGGACGTTGCA");
    let subject = Alphabet::NucleotideForward.encode(b"TTGCATCAGGCCATAGGACG");
    let matrix = SubstitutionMatrix::nucleotide(1, -2);
    let q = residue_frequencies(&query, matrix.size());
    let s = residue_frequencies(&subject, matrix.size());
    let profile = ScoreProfile::new(&matrix, &q, &s).unwrap();
    let params = karlin_params(&profile).unwrap();
    let window = suggested_window(&params, query.len(), subject.len());
    assert!((3..200).contains(&window), "window {window}");
}

#[test]
fn test_protein_background_close_to_published_blosum62() {
    let matrix = SubstitutionMatrix::blosum62();
    let freqs = standard_protein_frequencies();
    let profile = ScoreProfile::new(&matrix, &freqs, &freqs).unwrap();
    let params = karlin_params(&profile).unwrap();
    assert!((params.lambda - 0.3176).abs() < 0.02, "lambda {}", params.lambda);
    assert!((params.h - 0.40).abs() < 0.05, "h {}", params.h);
}

#[test]
fn test_estimation_fails_on_positive_drift() {
    // A reward-heavy system has positive expected score and no maximal
    // segment statistics; callers fall back to a fixed window.
    let matrix = SubstitutionMatrix::nucleotide(3, -1);
    let f = residue_frequencies(&Alphabet::NucleotideForward.encode(b"ACGTACGT"), 5);
    let profile = ScoreProfile::new(&matrix, &f, &f).unwrap();
    assert!(karlin_params(&profile).is_err());
}

#[test]
fn test_single_residue_composition_fails_cleanly() {
    // Only matches ever occur, the expected score is positive.
    let matrix = SubstitutionMatrix::nucleotide(1, -1);
    let f = residue_frequencies(&Alphabet::NucleotideForward.encode(b"AAAAAAAA"), 5);
    let profile = ScoreProfile::new(&matrix, &f, &f).unwrap();
    assert!(karlin_params(&profile).is_err());
}
