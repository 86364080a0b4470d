//! # Voxel Engine Application Entry Point
//!
//! Calls into the library's `run()` function to initialize and start the engine.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    voxel_engine::run();
}
