//! # UFA Ledger Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Criterion benchmarks
//! └── src/integration/  # End-to-end scenarios through the dispatcher
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p ufa-tests
//! cargo test -p ufa-tests integration::
//! cargo bench -p ufa-tests
//! ```

pub mod integration;
