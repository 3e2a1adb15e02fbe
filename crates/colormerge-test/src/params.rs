//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::{golden_dir, regout_dir};
use colormerge_core::{ImageFormat, Pix};
use std::fs;
use std::path::Path;

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Generate golden files
    Generate,
    /// Compare with golden files (default)
    #[default]
    Compare,
    /// Display mode - run without comparison
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "generate" => Self::Generate,
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, a running check index, the mode and every
/// failure recorded so far. Each `compare_*` / `write_*` call advances
/// the index, so golden file names stay stable as long as the order of
/// checks does.
pub struct RegParams {
    /// Name of the test (e.g., "segment")
    pub test_name: String,
    index: usize,
    /// Test mode (generate, compare, or display)
    pub mode: RegTestMode,
    success: bool,
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters, configured from
    /// `REGTEST_MODE`.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        let _ = fs::create_dir_all(golden_dir());
        let _ = fs::create_dir_all(regout_dir());

        eprintln!();
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two numeric values, allowing a difference up to `delta`.
    ///
    /// # Arguments
    ///
    /// * `expected` - Reference value
    /// * `actual` - Computed value
    /// * `delta` - Largest accepted absolute difference
    ///
    /// # Returns
    ///
    /// `true` if the values agree; a failure is recorded otherwise.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();
        if diff > delta {
            self.fail(format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            ));
            return false;
        }
        true
    }

    /// Compare two images for exact equality of size, samples per pixel
    /// and every pixel word.
    ///
    /// # Returns
    ///
    /// `true` if the images match; the first differing pixel is reported
    /// otherwise.
    pub fn compare_pix(&mut self, pix1: &Pix, pix2: &Pix) -> bool {
        self.index += 1;
        match first_difference(pix1, pix2) {
            None => true,
            Some(what) => {
                self.fail(format!(
                    "Failure in {}_reg: pix comparison for index {} - {}",
                    self.test_name, self.index, what
                ));
                false
            }
        }
    }

    /// Compare two byte strings for equality.
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;
        if data1 != data2 {
            self.fail(format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 sizes: {} vs {}",
                self.test_name,
                self.index,
                data1.len(),
                data2.len()
            ));
            return false;
        }
        true
    }

    /// Write an image under `tests/regout` and check it against its
    /// golden counterpart.
    ///
    /// # Arguments
    ///
    /// * `pix` - Image to write
    /// * `format` - Encoding, which also picks the file extension
    ///
    /// # Returns
    ///
    /// An error only if writing fails; a mismatch is recorded as a failure.
    pub fn write_pix_and_check(&mut self, pix: &Pix, format: ImageFormat) -> TestResult<()> {
        self.index += 1;
        let local_path = self.local_path(format.extension());

        colormerge_io::write_image(pix, &local_path, format).map_err(|e| {
            TestError::ImageWrite {
                path: local_path.clone(),
                message: e.to_string(),
            }
        })?;

        self.check_file(&local_path)
    }

    /// Write raw data (e.g. a region report) and check it against its
    /// golden counterpart.
    pub fn write_data_and_check(&mut self, data: &[u8], ext: &str) -> TestResult<()> {
        self.index += 1;
        let local_path = self.local_path(ext);
        fs::write(&local_path, data)?;
        self.check_file(&local_path)
    }

    fn local_path(&self, ext: &str) -> String {
        format!(
            "{}/{}.{:02}.{}",
            regout_dir(),
            self.test_name,
            self.index,
            ext
        )
    }

    /// Generate mode copies the file to the golden directory; compare
    /// mode checks it against the golden copy. A golden file that has not
    /// been generated yet is reported and skipped.
    fn check_file(&mut self, local_path: &str) -> TestResult<()> {
        let ext = Path::new(local_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        let golden_path = format!(
            "{}/{}_golden.{:02}.{}",
            golden_dir(),
            self.test_name,
            self.index,
            ext
        );

        match self.mode {
            RegTestMode::Generate => {
                fs::copy(local_path, &golden_path)?;
                eprintln!("Generated: {}", golden_path);
            }
            RegTestMode::Compare => {
                if !Path::new(&golden_path).exists() {
                    eprintln!(
                        "Note in {}_reg, index {}: no golden file {}; run with REGTEST_MODE=generate",
                        self.test_name, self.index, golden_path
                    );
                    return Ok(());
                }

                let local_data = fs::read(local_path)?;
                let golden_data = fs::read(&golden_path)?;
                if local_data != golden_data && !same_image_files(local_path, &golden_path) {
                    self.fail(format!(
                        "Failure in {}_reg, index {}: comparing {} with {}",
                        self.test_name, self.index, local_path, golden_path
                    ));
                }
            }
            RegTestMode::Display => {}
        }

        Ok(())
    }

    /// Report results, returning `true` if every check passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();
        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

/// Describe the first difference between two images, if any.
fn first_difference(pix1: &Pix, pix2: &Pix) -> Option<String> {
    if !pix1.sizes_equal(pix2) {
        return Some(format!(
            "dimension mismatch {}x{} vs {}x{}",
            pix1.width(),
            pix1.height(),
            pix2.width(),
            pix2.height()
        ));
    }
    if pix1.spp() != pix2.spp() {
        return Some(format!("spp mismatch {} vs {}", pix1.spp(), pix2.spp()));
    }
    let width = pix1.width() as usize;
    pix1.data()
        .iter()
        .zip(pix2.data())
        .position(|(a, b)| a != b)
        .map(|i| format!("pixel mismatch at ({}, {})", i % width, i / width))
}

/// Byte-different files may still decode to the same pixels.
fn same_image_files(path1: &str, path2: &str) -> bool {
    match (
        colormerge_io::read_image(path1),
        colormerge_io::read_image(path2),
    ) {
        (Ok(pix1), Ok(pix2)) => first_difference(&pix1, &pix2).is_none(),
        _ => false,
    }
}
