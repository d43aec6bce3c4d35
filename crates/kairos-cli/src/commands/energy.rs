use clap::Subcommand;
use kairos_core::EnergyCurve;

#[derive(Subcommand)]
pub enum EnergyAction {
    /// Render the default energy curve as an ASCII chart
    Show,
    /// List hours at or above an energy threshold
    Peaks {
        /// Minimum energy level (0.0-1.0)
        #[arg(long, default_value_t = 0.8)]
        threshold: f64,
    },
}

pub fn run(action: EnergyAction) -> Result<(), Box<dyn std::error::Error>> {
    let curve = EnergyCurve::default();
    match action {
        EnergyAction::Show => {
            println!("{}", curve.render_ascii_chart());
        }
        EnergyAction::Peaks { threshold } => {
            let peaks = curve.peak_hours(threshold);
            if peaks.is_empty() {
                println!("no hours at or above {threshold:.2}");
            } else {
                for hour in peaks {
                    println!("{hour:02}:00  {:.0}%", curve.energy_at(hour) * 100.0);
                }
            }
        }
    }
    Ok(())
}
