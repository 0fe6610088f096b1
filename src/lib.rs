// Public API - trace loop, probing and lookup seams, error taxonomy
pub mod error;
pub mod lookup;
pub mod probe;
pub mod resolve;
pub mod trace;

// CLI surface shared with the binary
pub mod cli;
pub mod config;
