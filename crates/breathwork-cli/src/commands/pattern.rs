use breathwork_core::timer::{builtin_patterns, find_pattern, NamedPattern, PhaseSequence};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum PatternAction {
    /// List built-in patterns
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one pattern and its phase sequence
    Show {
        /// Pattern id (e.g. "box", "4-7-8")
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: PatternAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PatternAction::List { json } => {
            let patterns = builtin_patterns();
            if json {
                println!("{}", serde_json::to_string_pretty(patterns)?);
            } else {
                for p in patterns {
                    println!(
                        "{:<12} {:<10} {:<16} {}",
                        p.id,
                        p.pattern.to_string(),
                        p.label,
                        p.tag
                    );
                }
            }
        }
        PatternAction::Show { id, json } => {
            let preset = find_pattern(&id).ok_or_else(|| format!("unknown pattern: {id}"))?;
            let sequence = PhaseSequence::from_pattern(&preset.pattern)?;
            if json {
                let value = serde_json::json!({
                    "pattern": preset,
                    "sequence": sequence.steps(),
                    "cycle_secs": sequence.cycle_secs(),
                    "breaths_per_minute": preset.pattern.breaths_per_minute(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                print_details(preset, &sequence);
            }
        }
    }
    Ok(())
}

fn print_details(preset: &NamedPattern, sequence: &PhaseSequence) {
    println!("{} ({})", preset.label, preset.id);
    println!("{}", preset.description);
    println!();
    for step in sequence.steps() {
        println!("  {:<8} {}s", step.kind, step.duration);
    }
    println!();
    println!(
        "cycle: {}s, {:.2} breaths/min",
        sequence.cycle_secs(),
        preset.pattern.breaths_per_minute()
    );
}
