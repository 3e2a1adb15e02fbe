//! Progress reporting for long merge loops
//!
//! Purely observational: observers never influence the merge order.

use std::io::{self, Write};

/// Width of the rendered bar in characters.
const BAR_WIDTH: usize = 100;

/// Snapshot of the merge loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Region count the loop stops at
    pub target: usize,
    /// Regions still live
    pub remaining: usize,
}

impl Progress {
    /// `100 * target / remaining`, reaching 100 when the loop is done.
    pub fn percent(&self) -> f64 {
        if self.remaining == 0 {
            return 100.0;
        }
        100.0 * self.target as f64 / self.remaining as f64
    }
}

/// Receives periodic [`Progress`] reports from the segmentation loop.
pub trait ProgressObserver {
    fn report(&mut self, progress: Progress);

    /// Called once when the loop ends.
    fn finish(&mut self) {}
}

/// Discards all reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn report(&mut self, _progress: Progress) {}
}

/// Renders `Progress: 12.34% [****------...]` and returns the carriage so
/// the next report overwrites the line.
#[derive(Debug)]
pub struct ProgressBar<W: Write> {
    writer: W,
    drawn: bool,
}

impl ProgressBar<io::Stderr> {
    /// A bar drawn on standard error.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> ProgressBar<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            drawn: false,
        }
    }

    /// Consume the bar and return its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// One status line, without the trailing carriage return.
pub fn render(progress: Progress) -> String {
    let percent = progress.percent();
    let filled = (percent.floor() as usize).min(BAR_WIDTH);
    format!(
        "Progress: {:.2}% [{}{}]",
        percent,
        "*".repeat(filled),
        "-".repeat(BAR_WIDTH - filled)
    )
}

impl<W: Write> ProgressObserver for ProgressBar<W> {
    fn report(&mut self, progress: Progress) {
        // a broken diagnostic stream must not abort segmentation
        let _ = write!(self.writer, "{}\r", render(progress));
        let _ = self.writer.flush();
        self.drawn = true;
    }

    fn finish(&mut self) {
        if self.drawn {
            let _ = writeln!(self.writer);
            let _ = self.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        let p = Progress {
            target: 2,
            remaining: 8,
        };
        assert_eq!(p.percent(), 25.0);
        let done = Progress {
            target: 2,
            remaining: 2,
        };
        assert_eq!(done.percent(), 100.0);
    }

    #[test]
    fn test_render() {
        let line = render(Progress {
            target: 1,
            remaining: 3,
        });
        let expected = format!("Progress: 33.33% [{}{}]", "*".repeat(33), "-".repeat(67));
        assert_eq!(line, expected);
    }

    #[test]
    fn test_bar_writes_and_finishes() {
        let mut bar = ProgressBar::new(Vec::new());
        bar.finish();
        assert!(bar.writer.is_empty());

        bar.report(Progress {
            target: 10,
            remaining: 10,
        });
        bar.finish();
        let out = String::from_utf8(bar.into_inner()).unwrap();
        assert!(out.starts_with("Progress: 100.00% ["));
        assert!(out.ends_with("]\r\n"));
        assert_eq!(out.matches('*').count(), 100);
    }
}
