//! # Voxel World Entry Point
//!
//! Runs the headless world demo: streams terrain around an observer walking
//! across the world and reports what a renderer would receive.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

fn main() {
    if let Err(err) = voxel_world::run() {
        eprintln!("voxel-world: {err}");
        std::process::exit(1);
    }
}
