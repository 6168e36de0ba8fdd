//! Grid sizing, including the resolution cap.

use seqdot::config::{ComparisonMode, DotplotConfig};
use seqdot::core::engine::DotplotSession;
use seqdot::core::geometry;
use seqdot::core::matrix::SubstitutionMatrix;

#[test]
fn test_requested_zoom_kept_when_grid_fits() {
    let g = geometry::plan(5_000, 5_000, 2.0, 1, 16_000).unwrap();
    assert_eq!(g.zoom, 2.0);
    assert_eq!((g.width, g.height), (2_500, 2_500));
}

#[test]
fn test_megabase_query_is_capped() {
    // 1 Mb at zoom 1 against a 16,000 cell cap corrects the zoom to 63.
    let g = geometry::plan(1_000_000, 1_000, 1.0, 1, 16_000).unwrap();
    assert_eq!(g.zoom, 63.0);
    assert_eq!(g.width, 15_874);
    assert!(g.width <= 16_000 && g.height <= 16_000);
}

#[test]
fn test_session_reports_corrected_zoom_before_running() {
    let query = vec![b'A'; 1_000_000];
    let matrix = SubstitutionMatrix::nucleotide(1, -1);
    let mut config = DotplotConfig::new(ComparisonMode::NucleotideNucleotide, 10);
    config.max_grid_dim = 16_000;
    let session = DotplotSession::new(config, &query, b"ACGTACGTAC", &matrix).unwrap();
    let g = session.geometry();
    assert_eq!(g.zoom, 63.0);
    assert_eq!(g.width, 15_874);
}

#[test]
fn test_full_range_stays_representable() {
    // The last residue must land inside the capped grid.
    let g = geometry::plan(999_983, 999_983, 1.0, 1, 16_000).unwrap();
    let last_cell = (999_982f64 / g.zoom) as usize;
    assert!(last_cell < g.width);
}
