use std::path::Path;
use std::time::Duration;

use indicatif::{HumanCount, ProgressBar, ProgressStyle};

/// Progress reporting for a scan.
///
/// Unless quiet, every directory entered is printed on its own line to
/// standard output while a spinner on stderr keeps a running count of hashed
/// files. In quiet mode the spinner is hidden and nothing is printed.
#[derive(Debug)]
pub struct ScanProgress {
    bar: ProgressBar,
    quiet: bool,
}

impl ScanProgress {
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "]));
            }
            pb.set_message("Scanning files...");
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        };
        Self { bar, quiet }
    }

    /// A progress reporter that never prints anything.
    pub fn hidden() -> Self {
        Self::new(true)
    }

    pub fn enter_directory(&self, dir: &Path) {
        if !self.quiet {
            self.bar.suspend(|| println!("{}", dir.display()));
        }
    }

    pub fn file_hashed(&self, hashed: u64) {
        self.bar.set_message(format!("Scanning files... {} hashed", HumanCount(hashed)));
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
