//! Snapshot container round-trips through an engine-produced grid.

use seqdot::config::{ComparisonMode, DotplotConfig};
use seqdot::core::engine::DotplotSession;
use seqdot::core::matrix::SubstitutionMatrix;
use seqdot::format::snapshot;

#[test]
fn test_computed_grid_round_trips() {
    let seq = b"ACGTTGCATCAGGCCATAGGACGT";
    let matrix = SubstitutionMatrix::nucleotide(1, -2);
    let mut config = DotplotConfig::new(ComparisonMode::NucleotideNucleotide, 4);
    config.zoom = 2.0;
    let session = DotplotSession::new(config, seq, seq, &matrix).unwrap();
    let plot = session.run().unwrap();

    let mut buf = Vec::new();
    snapshot::write(&mut buf, &plot, &matrix).unwrap();
    let snap = snapshot::read(&mut buf.as_slice()).unwrap();

    assert_eq!(snap.grid, plot.grid);
    assert_eq!(snap.zoom, plot.zoom);
    assert_eq!(snap.window, plot.window);
    assert_eq!(snap.pixel_scale, plot.pixel_scale);
    assert_eq!(snap.matrix, matrix);
}

#[test]
fn test_snapshot_preserves_corrected_geometry() {
    let query = vec![b'C'; 100_000];
    let matrix = SubstitutionMatrix::nucleotide(1, -1);
    let mut config = DotplotConfig::new(ComparisonMode::NucleotideNucleotide, 10);
    config.max_grid_dim = 5_000;
    let session = DotplotSession::new(config, &query, b"ACGTACGTACGT", &matrix).unwrap();
    let expected = session.geometry();
    let plot = session.run().unwrap();

    let mut buf = Vec::new();
    snapshot::write(&mut buf, &plot, &matrix).unwrap();
    let snap = snapshot::read(&mut buf.as_slice()).unwrap();
    assert_eq!(snap.grid.width(), expected.width);
    assert_eq!(snap.zoom, expected.zoom);
}
