//! colormerge-test - Regression test framework for colormerge
//!
//! Supports three modes, selected with the `REGTEST_MODE` environment
//! variable:
//!
//! - **Generate**: Create golden files for comparison
//! - **Compare**: Compare results with golden files (default)
//! - **Display**: Run tests without comparison (visual inspection)
//!
//! # Usage
//!
//! ```ignore
//! use colormerge_test::RegParams;
//!
//! let mut rp = RegParams::new("segment");
//! rp.compare_values(8.0, regions as f64, 0.0);
//! assert!(rp.cleanup());
//! ```

mod error;
mod params;

use rand::prelude::*;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Load a test image from the test data directory
///
/// # Arguments
///
/// * `name` - Image filename (e.g., "mandrill.png")
pub fn load_test_image(name: &str) -> TestResult<colormerge_core::Pix> {
    let path = test_data_path(name);
    colormerge_io::read_image(&path).map_err(|e| TestError::ImageLoad {
        path: path.clone(),
        message: e.to_string(),
    })
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // colormerge-test is at crates/colormerge-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to a test data file
pub fn test_data_path(name: &str) -> String {
    format!("{}/tests/data/images/{}", workspace_root(), name)
}

/// Get the path to the golden files directory
pub fn golden_dir() -> String {
    format!("{}/tests/golden", workspace_root())
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

/// Build a `width x height` RGB image whose pixels are drawn from `palette`
/// by a seeded generator.
///
/// # Arguments
///
/// * `width`, `height` - Image dimensions
/// * `palette` - Colors to draw from; must not be empty
/// * `seed` - Same seed, same image
///
/// # Returns
///
/// An opaque RGB image, or the core error for invalid dimensions.
pub fn random_palette_image(
    width: u32,
    height: u32,
    palette: &[(u8, u8, u8)],
    seed: u64,
) -> colormerge_core::Result<colormerge_core::Pix> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pix_mut = colormerge_core::PixMut::new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            let (r, g, b) = palette[rng.random_range(0..palette.len())];
            pix_mut.set_pixel_unchecked(x, y, colormerge_core::color::compose_rgb(r, g, b));
        }
    }
    Ok(pix_mut.into())
}
