//! # beamcheck CLI
//!
//! Command-line front end for the EC2 beam checks.
//!
//! ```text
//! beamcheck [INPUT.json ...] [--settings SETTINGS.json]
//! ```
//!
//! With no input file the CLI prompts for a few values, falling back to the
//! defaults of `BeamInput`. Several input files are evaluated in parallel.
//! Set `RUST_LOG=debug` to trace every stage of the evaluation.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::debug;

use beamcheck_core::loads::DistributedLoads;
use beamcheck_core::{calculate_batch, BarLayer, BeamInput, BeamVerdict, CalcError, CalcResult, CodeSettings, Reinforcement};

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    print!("{}", prompt);
    if io::stdout().flush().is_err() {
        return default;
    }

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input).is_err() {
        return default;
    }

    input.trim().parse().unwrap_or(default)
}

fn read_file(path: &Path) -> CalcResult<String> {
    fs::read_to_string(path).map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Beam input files (JSON); prompts interactively when none are given
    inputs: Vec<PathBuf>,

    /// Code settings file (JSON) overriding the default partial factors
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

fn load_settings(path: Option<&Path>) -> CalcResult<CodeSettings> {
    match path {
        Some(path) => CodeSettings::from_json(&read_file(path)?),
        None => Ok(CodeSettings::default()),
    }
}

fn prompt_input() -> BeamInput {
    let defaults = BeamInput::default();
    let loads = defaults.loads;

    println!("Press Enter to accept a default.");
    println!();
    let span_m = prompt_f64(&format!("Span (m) [{}]: ", defaults.span_m), defaults.span_m);
    let width_mm = prompt_f64(&format!("Width (mm) [{}]: ", defaults.width_mm), defaults.width_mm);
    let height_mm = prompt_f64(&format!("Height (mm) [{}]: ", defaults.height_mm), defaults.height_mm);
    let self_load = prompt_f64(
        &format!("Self-load (kN/m) [{}]: ", loads.self_load_kn_per_m),
        loads.self_load_kn_per_m,
    );
    let live_load = prompt_f64(
        &format!("Live-load (kN/m) [{}]: ", loads.live_load_kn_per_m),
        loads.live_load_kn_per_m,
    );
    let count = prompt_f64("Number of bottom bars [4]: ", 4.0);
    let diameter_mm = prompt_f64("Bar diameter (mm) [20]: ", 20.0);

    BeamInput {
        label: "CLI".to_string(),
        span_m,
        width_mm,
        height_mm,
        reinforcement: Reinforcement::Ordinary {
            bars: BarLayer {
                count: count.max(0.0).round() as u32,
                diameter_mm,
            },
        },
        loads: DistributedLoads {
            self_load_kn_per_m: self_load,
            live_load_kn_per_m: live_load,
            ..loads
        },
        ..defaults
    }
}

fn load_inputs(paths: &[PathBuf]) -> CalcResult<Vec<BeamInput>> {
    paths
        .iter()
        .map(|path| {
            let input = BeamInput::from_json(&read_file(path)?)?;
            debug!("loaded '{}' from {}", input.label, path.display());
            Ok(input)
        })
        .collect()
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

fn print_summary(verdict: &BeamVerdict) {
    let loads = &verdict.loads;
    let capacity = &verdict.capacity;

    println!("═══════════════════════════════════════");
    println!("  {} ({})", verdict.label, verdict.configuration);
    println!("═══════════════════════════════════════");
    println!();
    println!("Section:");
    println!("  b × h = {:.0} × {:.0} mm, L = {:.2} m", verdict.section.width_mm, verdict.section.height_mm, loads.span.value());
    println!("  c_nom = {:.0} mm, h0 = {:.0} mm", verdict.section.nominal_cover_mm, verdict.section.notional_size_mm);
    println!();
    println!("Demand:");
    println!("  M_Ed = {:.1} kNm", loads.moment_ed.value());
    println!("  V_Ed = {:.1} kN", loads.shear_ed.value());
    println!("  M_qp = {:.1} kNm", loads.moment_qp.value());
    if let Some(losses) = &verdict.losses {
        println!("  P0 = {:.1} kN, losses = {:.1} %", loads.prestress_force.value(), losses.loss_percent);
    }
    println!();
    println!("Checks:");
    println!(
        "  Moment:        {:>6.1} % ({:.1}/{:.1} kNm) {}",
        capacity.moment_utilization,
        loads.moment_ed.value(),
        capacity.flexure.moment_capacity.value(),
        status_icon(capacity.moment_ok)
    );
    println!(
        "  Shear:         {:>6.1} % ({:.1}/{:.1} kN) {}",
        capacity.shear_utilization,
        loads.shear_ed.value(),
        capacity.shear.v_rd.value(),
        status_icon(capacity.shear_ok)
    );
    println!(
        "  Reinforcement: {:>6.1} % ({:.0}/{:.0} mm²) {}",
        verdict.reinforcement.utilization,
        verdict.reinforcement.required_area_mm2,
        verdict.reinforcement.provided_area_mm2,
        status_icon(verdict.reinforcement.passes())
    );
    if let Some(crack) = &verdict.crack {
        println!(
            "  Crack:         {:>6.1} % (Ø{:.1} vs Ø{}, σ = {:.0} N/mm²) {}",
            crack.utilization,
            crack.bar_diameter_mm,
            crack.max_diameter_mm.map_or("-".to_string(), |d| format!("{d:.1}")),
            crack.steel_stress,
            status_icon(crack.passes)
        );
    }
    if let Some(deflection) = &verdict.deflection {
        println!(
            "  Deflection:    {:>6.1} % ({:.1}/{:.1} mm) {}",
            deflection.utilization,
            deflection.deflection_mm,
            deflection.limit_mm,
            status_icon(deflection.passes)
        );
    }
    if let Some(stress) = &verdict.stress {
        println!(
            "  Stress:        σp = {:.0} N/mm² ({}, M_k = {:.1} kNm), σc,qp = {:.1} N/mm² {}",
            stress.tendon_stress(),
            if stress.cracked { "cracked" } else { "uncracked" },
            stress.moment.value(),
            stress.sigma_c_qp,
            status_icon(stress.passes())
        );
    }
    println!();
    println!("═══════════════════════════════════════");
    println!(
        "  RESULT: {} (governs: {})",
        if verdict.passes() { "PASS" } else { "FAIL" },
        verdict.governing_check()
    );
    println!("═══════════════════════════════════════");
}

fn print_error(e: &CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn run(args: Args) -> CalcResult<bool> {
    let settings = load_settings(args.settings.as_deref())?;
    let inputs = if args.inputs.is_empty() {
        println!("beamcheck - EC2 Beam Checker");
        println!("============================");
        println!();
        vec![prompt_input()]
    } else {
        load_inputs(&args.inputs)?
    };

    let mut all_ok = true;
    for result in calculate_batch(&inputs, &settings) {
        match result {
            Ok(verdict) => {
                println!();
                print_summary(&verdict);
                println!();
                println!("JSON Output:");
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            }
            Err(e) => {
                print_error(&e);
                all_ok = false;
            }
        }
    }
    Ok(all_ok)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            print_error(&e);
            ExitCode::FAILURE
        }
    }
}
