//! End-to-end scenarios for the dot-plot engine.

use bio::alphabets::dna;

use seqdot::config::{ComparisonMode, DotplotConfig};
use seqdot::core::engine::{Dotplot, DotplotSession};
use seqdot::core::matrix::SubstitutionMatrix;

fn run_nuc(config: DotplotConfig, query: &[u8], subject: &[u8]) -> Dotplot {
    let matrix = SubstitutionMatrix::nucleotide(1, -1);
    let session = DotplotSession::new(config, query, subject, &matrix).unwrap();
    session.run().unwrap()
}

#[test]
fn test_identical_sequences_saturate_the_diagonal() {
    // Match +1, mismatch -1, window 5, zoom 1 and a scale that maps the
    // best possible window score to 255.
    let seq = b"ACGTTGCATCAGGCCATAGG";
    let mut config = DotplotConfig::new(ComparisonMode::NucleotideNucleotide, 5);
    config.pixel_scale = 255.0;
    config.reverse_strand = false;
    let plot = run_nuc(config, seq, seq);

    assert_eq!(plot.grid.width(), 20);
    assert_eq!(plot.grid.height(), 20);
    for i in 4..20 {
        assert_eq!(plot.grid.get(i, i), Some(255), "cell ({i}, {i})");
    }
    assert_eq!(plot.grid.max_value(), 255);
}

#[test]
fn test_incomplete_windows_stay_unassigned() {
    let seq = b"ACGTTGCATCAGGCCATAGG";
    let mut config = DotplotConfig::new(ComparisonMode::NucleotideNucleotide, 5);
    config.pixel_scale = 255.0;
    config.reverse_strand = false;
    let plot = run_nuc(config, seq, seq);
    for i in 0..4 {
        assert_eq!(plot.grid.get(i, i), Some(0), "cell ({i}, {i})");
    }
}

#[test]
fn test_zero_window_is_a_configuration_error() {
    let matrix = SubstitutionMatrix::nucleotide(1, -1);
    let config = DotplotConfig::new(ComparisonMode::NucleotideNucleotide, 0);
    let err = DotplotSession::new(config, b"ACGT", b"ACGT", &matrix);
    assert!(err.is_err());
}

#[test]
fn test_deterministic_output() {
    let query = b"ACGTTGCATCAGGCCATAGGACGT";
    let subject = b"TGCATCAGGACGTTGCATCA";
    let config = DotplotConfig::new(ComparisonMode::NucleotideNucleotide, 4);
    let first = run_nuc(config.clone(), query, subject);
    let second = run_nuc(config, query, subject);
    assert_eq!(first.grid, second.grid);
    assert_eq!(first.zoom, second.zoom);
}

#[test]
fn test_passes_merge_monotonically() {
    let query = b"AAACCCGGGTTTACGTACGT";
    let subject = dna::revcomp(query.as_slice());

    let base = DotplotConfig::new(ComparisonMode::NucleotideNucleotide, 4);
    let mut forward_only = base.clone();
    forward_only.reverse_strand = false;
    let mut reverse_only = base.clone();
    reverse_only.forward_strand = false;

    let both = run_nuc(base, query, &subject);
    let fwd = run_nuc(forward_only, query, &subject);
    let rev = run_nuc(reverse_only, query, &subject);

    for (i, &merged) in both.grid.data().iter().enumerate() {
        assert!(merged >= fwd.grid.data()[i], "cell {i} lost forward signal");
        assert!(merged >= rev.grid.data()[i], "cell {i} lost reverse signal");
    }
}

#[test]
fn test_reverse_only_restriction_runs_one_pass() {
    let query = b"AAACCCGGGTTTACGTACGT";
    let subject = dna::revcomp(query.as_slice());
    let matrix = SubstitutionMatrix::nucleotide(1, -1);

    let mut config = DotplotConfig::new(ComparisonMode::NucleotideNucleotide, 4);
    config.forward_strand = false;
    let session = DotplotSession::new(config.clone(), query, &subject, &matrix).unwrap();
    assert_eq!(session.passes().len(), 1);

    let rev = session.run().unwrap();
    // The subject is the query's reverse complement, so the reverse pass
    // must find signal.
    assert!(rev.grid.count_nonzero() > 0);

    // Lifting the restriction yields a superset of non-zero cells.
    let both = run_nuc(
        DotplotConfig::new(ComparisonMode::NucleotideNucleotide, 4),
        query,
        &subject,
    );
    assert!(both.grid.count_nonzero() > rev.grid.count_nonzero());
    for (i, &v) in rev.grid.data().iter().enumerate() {
        if v > 0 {
            assert!(both.grid.data()[i] > 0, "cell {i} vanished without restriction");
        }
    }
}

#[test]
fn test_mirrored_self_comparison_is_symmetric() {
    let seq = b"ACGTTGCATCAGGCCATAGGACGTACGT";
    let mut config = DotplotConfig::new(ComparisonMode::NucleotideNucleotide, 4);
    config.mirror = true;
    let plot = run_nuc(config, seq, seq);
    let n = plot.grid.width();
    for y in 0..n {
        for x in 0..n {
            assert_eq!(
                plot.grid.get(x, y),
                plot.grid.get(y, x),
                "cells ({x}, {y}) and ({y}, {x}) differ"
            );
        }
    }
}

#[test]
fn test_mirrored_half_scan_equals_full_forward_scan() {
    let seq = b"ACGTTGCATCAGGCCATAGG";
    let mut halved = DotplotConfig::new(ComparisonMode::NucleotideNucleotide, 3);
    halved.mirror = true;
    halved.reverse_strand = false;
    let mut full = DotplotConfig::new(ComparisonMode::NucleotideNucleotide, 3);
    full.reverse_strand = false;

    let mirrored = run_nuc(halved, seq, seq);
    let scanned = run_nuc(full, seq, seq);
    assert_eq!(mirrored.grid, scanned.grid);
}

#[test]
fn test_translated_query_against_its_protein() {
    // ATG GCT repeated translates to MAMAMA... in frame 0.
    let query: Vec<u8> = b"ATGGCT".repeat(5);
    let subject = b"MAMAMAMAMA";
    let matrix = SubstitutionMatrix::blosum62();
    let config = DotplotConfig::new(ComparisonMode::TranslatedVsProtein, 3);
    let session = DotplotSession::new(config, &query, subject, &matrix).unwrap();
    let geometry = session.geometry();
    assert_eq!((geometry.width, geometry.height), (10, 10));

    let plot = session.run().unwrap();
    for i in 2..10 {
        let cell = plot.grid.get(i, i).unwrap();
        assert!(cell > 0, "diagonal cell ({i}, {i}) is empty");
    }
}

#[test]
fn test_disabling_both_strands_yields_a_valid_empty_grid() {
    let mut config = DotplotConfig::new(ComparisonMode::NucleotideNucleotide, 4);
    config.forward_strand = false;
    config.reverse_strand = false;
    let plot = run_nuc(config, b"ACGTACGTAC", b"ACGTACGTAC");
    assert_eq!(plot.grid.count_nonzero(), 0);
    assert_eq!(plot.grid.width(), 10);
}
