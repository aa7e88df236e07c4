//! Common utilities and helpers

pub mod logging;

use std::time::Duration;

/// Formatting helpers for command output
pub struct Utils;

impl Utils {
    /// Elapsed time and picture rate, e.g. `2.500s (48.0 pictures/s)`
    pub fn format_throughput(pictures: usize, elapsed: Duration) -> String {
        let seconds = elapsed.as_secs_f64();
        if seconds > 0.0 {
            format!("{:.3}s ({:.1} pictures/s)", seconds, pictures as f64 / seconds)
        } else {
            format!("{:.3}s", seconds)
        }
    }

    /// Format file size for display
    pub fn format_file_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_throughput() {
        assert_eq!(
            Utils::format_throughput(120, Duration::from_millis(2500)),
            "2.500s (48.0 pictures/s)"
        );
        assert_eq!(Utils::format_throughput(3, Duration::ZERO), "0.000s");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(Utils::format_file_size(512), "512 B");
        assert_eq!(Utils::format_file_size(1536), "1.50 KB");
        assert_eq!(Utils::format_file_size(3 * 1024 * 1024), "3.00 MB");
    }
}
