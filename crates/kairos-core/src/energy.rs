//! Daily energy curve used to score task/slot alignment.
//!
//! The curve maps each hour of the day to a normalized energy level
//! (0.0-1.0). It is read-only during an optimization run; each optimizer
//! session owns its own copy.

use serde::{Deserialize, Serialize};

/// Energy level assumed for hours with no mapped value.
const COLD_START_FALLBACK: f64 = 0.5;

/// Normalized energy level per hour of day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyCurve {
    /// Energy level (0.0-1.0) indexed by hour (0-23)
    hourly: [f64; 24],
}

impl Default for EnergyCurve {
    fn default() -> Self {
        // Typical single-peak daily pattern: morning ramp, post-lunch dip,
        // afternoon recovery, evening decline. Night hours fall back to 0.5.
        let mut hourly = [COLD_START_FALLBACK; 24];
        let mapped = [
            (6, 0.3),
            (7, 0.5),
            (8, 0.7),
            (9, 0.9),
            (10, 0.95),
            (11, 0.9),
            (12, 0.7),
            (13, 0.6),
            (14, 0.8),
            (15, 0.85),
            (16, 0.8),
            (17, 0.7),
            (18, 0.6),
            (19, 0.5),
            (20, 0.4),
            (21, 0.3),
            (22, 0.2),
            (23, 0.1),
        ];
        for (hour, level) in mapped {
            hourly[hour as usize] = level;
        }
        Self { hourly }
    }
}

impl EnergyCurve {
    /// Create a curve from explicit hourly levels.
    pub fn from_hourly(hourly: [f64; 24]) -> Self {
        Self { hourly }
    }

    /// Get the energy level for an hour of day.
    ///
    /// Out-of-range hours return the cold-start fallback rather than panic.
    pub fn energy_at(&self, hour: u8) -> f64 {
        self.hourly
            .get(hour as usize)
            .copied()
            .unwrap_or(COLD_START_FALLBACK)
    }

    /// Hours whose energy level is at or above the given threshold.
    pub fn peak_hours(&self, min_energy: f64) -> Vec<u8> {
        (0..24u8)
            .filter(|h| self.energy_at(*h) >= min_energy)
            .collect()
    }

    /// Render the curve as an ASCII chart.
    pub fn render_ascii_chart(&self) -> String {
        let mut output = String::from("\nDaily Energy Curve:\n");
        output.push_str(&"─".repeat(40));
        output.push('\n');

        for hour in 0..24u8 {
            let energy = self.energy_at(hour);
            let bar_length = (energy * 30.0) as usize;
            let bar = "█".repeat(bar_length);
            let empty = " ".repeat(30 - bar_length);
            output.push_str(&format!(
                "{:02}:00 {}{} {:.0}%\n",
                hour,
                bar,
                empty,
                energy * 100.0
            ));
        }

        output.push_str(&"─".repeat(40));
        output.push('\n');
        output
    }
}
