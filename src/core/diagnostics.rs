//! Diagnostic counters for a dot-plot computation.
//!
//! Enabled via the `SEQDOT_DIAGNOSTICS` environment variable; a summary is
//! printed to stderr after the run. Dropped writes are counted here in
//! addition to the per-event stderr diagnostic, so a run that clipped
//! anything is visible even when the individual lines scrolled away.

use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

/// Check if diagnostics are enabled via environment variable.
pub fn diagnostics_enabled() -> bool {
    std::env::var("SEQDOT_DIAGNOSTICS")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false)
}

#[derive(Default)]
pub struct ScanDiagnostics {
    /// Scanner passes executed.
    pub passes_run: AtomicUsize,
    /// Grid cells raised by the scanner.
    pub cells_emitted: AtomicUsize,
    /// Cells copied across the diagonal by the mirror step.
    pub cells_mirrored: AtomicUsize,
    /// Writes rejected by the grid bounds check.
    pub writes_dropped: AtomicUsize,
}

impl ScanDiagnostics {
    pub fn record_pass(&self) {
        self.passes_run.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn record_emit(&self) {
        self.cells_emitted.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn record_mirror(&self) {
        self.cells_mirrored.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn record_dropped_write(&self) {
        self.writes_dropped.fetch_add(1, AtomicOrdering::Relaxed);
    }

    pub fn dropped_writes(&self) -> usize {
        self.writes_dropped.load(AtomicOrdering::Relaxed)
    }

    pub fn print_summary(&self) {
        eprintln!("=== Dot-plot scan diagnostics ===");
        eprintln!(
            "  Passes run:       {}",
            self.passes_run.load(AtomicOrdering::Relaxed)
        );
        eprintln!(
            "  Cells emitted:    {}",
            self.cells_emitted.load(AtomicOrdering::Relaxed)
        );
        eprintln!(
            "  Cells mirrored:   {}",
            self.cells_mirrored.load(AtomicOrdering::Relaxed)
        );
        eprintln!("  Writes dropped:   {}", self.dropped_writes());
    }
}
