//! Statistical helpers for picking scan parameters.

pub mod karlin;

pub use karlin::{
    karlin_params, residue_frequencies, standard_protein_frequencies, suggested_window,
    KarlinParams, ScoreProfile,
};
