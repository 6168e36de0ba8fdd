pub mod karlin;
