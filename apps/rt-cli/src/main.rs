use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rt_core::units::{amps, hertz, kilovolts, s, volts};
use rt_curves::{CurveFamily, CurveSpec, filter_curve_catalog};
use rt_elements::{
    IecOvercurrent, ProtectionElement, SweepDefinition, SweepResult, SweepSpacing,
    UndervoltageElement, VoltageRestrainedOvercurrent, VoltsPerHertzElement, run_sweep,
};
use rt_eval::{
    ElementInput, ElementInputBuilder, InputDefaults, Measured, Outcome, Status,
    refer_current_to_secondary, refer_voltage_to_secondary,
};
use serde::Serialize;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rt-cli")]
#[command(about = "Relay trip-time calculator for protection grading", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Voltage-restrained IDMT overcurrent (51V, BE3/IEEE curves A-1 to A-17)
    Idmt {
        /// Injected current (A)
        #[arg(short = 'i', long)]
        current: f64,
        #[command(flatten)]
        settings: IdmtSettings,
    },
    /// IEC inverse-time overcurrent (51)
    Iec {
        /// Injected current (A)
        #[arg(short = 'i', long)]
        current: f64,
        #[command(flatten)]
        settings: IecSettings,
    },
    /// Inverse-time undervoltage (27)
    Underv {
        /// Delay setting (s)
        #[arg(short, long)]
        delay: f64,
        /// Test voltage, phase-to-phase (kV)
        #[arg(short, long)]
        voltage: f64,
        /// Pickup voltage, phase-to-phase primary (kV)
        #[arg(short, long)]
        pickup: f64,
    },
    /// Volts-per-hertz overfluxing (24)
    Vphz {
        /// Time multiplier setting
        #[arg(long)]
        time_multiplier: f64,
        /// Test voltage (kV)
        #[arg(short, long)]
        voltage: f64,
        /// Test frequency (Hz)
        #[arg(short, long)]
        frequency: f64,
        /// Pickup in per-unit of nominal V/Hz (e.g. 1.1)
        #[arg(short, long)]
        pickup: f64,
        /// Nominal voltage (kV) [default: 11]
        #[arg(long)]
        vnom: Option<f64>,
        /// Nominal frequency (Hz) [default: 50]
        #[arg(long)]
        fnom: Option<f64>,
        /// Curve A, B or C
        #[arg(short, long)]
        curve: Option<String>,
        /// Also report per-unit V/Hz
        #[arg(long)]
        per_unit: bool,
    },
    /// List catalog curves, optionally filtered
    Curves {
        /// Substring of id, name or alias
        query: Option<String>,
    },
    /// Tabulate trip time against current
    #[command(subcommand)]
    Sweep(SweepCommands),
}

#[derive(Subcommand)]
enum SweepCommands {
    /// Sweep the 51V element
    Idmt {
        #[command(flatten)]
        settings: IdmtSettings,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Sweep the IEC element
    Iec {
        #[command(flatten)]
        settings: IecSettings,
        #[command(flatten)]
        range: RangeArgs,
    },
}

#[derive(Args)]
struct IdmtSettings {
    /// Time dial
    #[arg(short, long)]
    dial: f64,
    /// Pickup current setting (A)
    #[arg(short, long)]
    pickup: f64,
    /// Restraint voltage (kV)
    #[arg(short, long)]
    voltage: f64,
    /// Nominal voltage (kV) [default: 11]
    #[arg(long)]
    vnom: Option<f64>,
    /// CT secondary rating (A) [default: 1]
    #[arg(long)]
    ctsec: Option<f64>,
    /// Restraint threshold, percent of nominal [default: 20]
    #[arg(long)]
    lowlim: Option<f64>,
    /// CT primary rating (A), used with --primary [default: 1]
    #[arg(long)]
    ctprim: Option<f64>,
    /// VT secondary rating (V), used with --primary [default: 110]
    #[arg(long)]
    vsec: Option<f64>,
    /// Current and voltage are primary values; refer them to the relay secondary
    #[arg(long)]
    primary: bool,
    /// Curve id or alias (e.g. A-14, 14, "very inverse")
    #[arg(short, long)]
    curve: String,
}

#[derive(Args)]
struct IecSettings {
    /// Time multiplier setting
    #[arg(short, long)]
    multiplier: f64,
    /// Pickup current setting (A)
    #[arg(short, long)]
    pickup: f64,
    /// Fixed time added to the curve (s) [default: 0]
    #[arg(long)]
    time_adder: Option<f64>,
    /// Curve id or alias (IEC-A, A, B, C, short)
    #[arg(short, long)]
    curve: String,
}

#[derive(Args)]
struct RangeArgs {
    /// First current (A)
    #[arg(long)]
    from: f64,
    /// Last current (A)
    #[arg(long)]
    to: f64,
    #[arg(long, default_value_t = 20)]
    points: usize,
    /// Logarithmic spacing
    #[arg(long)]
    log: bool,
}

impl IdmtSettings {
    /// Secondary-side settings plus the factor that refers a primary current.
    fn builder(&self, defaults: &InputDefaults) -> Result<(ElementInputBuilder, f64)> {
        let vnom_v = self.vnom.map_or(defaults.nominal_voltage, |kv| kv * 1_000.0);
        let ctsec = self.ctsec.unwrap_or(defaults.ct_secondary);
        let mut builder = ElementInput::builder_with(*defaults)
            .multiplier(self.dial)
            .pickup_current(amps(self.pickup))
            .ct_secondary(ctsec);
        if let Some(lowlim) = self.lowlim {
            builder = builder.low_voltage_limit_percent(lowlim);
        }

        if !self.primary {
            let builder = builder
                .measured_voltage(kilovolts(self.voltage))
                .nominal_voltage(volts(vnom_v));
            return Ok((builder, 1.0));
        }

        let ctprim = self.ctprim.unwrap_or(defaults.ct_primary);
        let vsec = self.vsec.unwrap_or(defaults.vt_secondary);
        if ctprim <= 0.0 {
            bail!("--ctprim must be positive, got {ctprim}");
        }
        let voltage = refer_voltage_to_secondary(self.voltage * 1_000.0, vnom_v, vsec);
        info!(voltage_v = voltage, ct_ratio = ctprim / ctsec, "referred to secondary");
        let builder = builder
            .measured_voltage(volts(voltage))
            .nominal_voltage(volts(vsec));
        Ok((builder, refer_current_to_secondary(1.0, ctprim, ctsec)))
    }
}

impl IecSettings {
    fn builder(&self, defaults: &InputDefaults) -> ElementInputBuilder {
        ElementInput::builder_with(*defaults)
            .multiplier(self.multiplier)
            .pickup_current(amps(self.pickup))
            .time_adder(s(self.time_adder.unwrap_or(defaults.time_adder)))
    }
}

impl RangeArgs {
    fn definition(&self, scale: f64) -> Result<SweepDefinition> {
        let spacing = if self.log {
            SweepSpacing::Logarithmic
        } else {
            SweepSpacing::Linear
        };
        SweepDefinition::new(self.from * scale, self.to * scale, self.points, spacing)
            .context("invalid sweep range")
    }
}

/// One evaluation as printed by the CLI.
#[derive(Serialize)]
struct Report<'a> {
    element: &'a str,
    curve: Option<&'static str>,
    outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    per_unit: Option<f64>,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Usage errors exit 1; clap's own code 2 is reserved for Invalid outcomes.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(status) => exit_code(status),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn exit_code(status: Option<Status>) -> ExitCode {
    match status {
        Some(Status::Invalid) => ExitCode::from(2),
        _ => ExitCode::SUCCESS,
    }
}

fn run(cli: Cli) -> Result<Option<Status>> {
    let defaults = InputDefaults::default();
    let json = cli.json;

    match cli.command {
        Commands::Idmt { current, settings } => {
            let (builder, scale) = settings.builder(&defaults)?;
            let input = builder
                .measured_current(amps(current * scale))
                .build()
                .context("invalid 51V settings")?;
            cmd_evaluate(&VoltageRestrainedOvercurrent::default(), &settings.curve, &input, json)
        }
        Commands::Iec { current, settings } => {
            let input = settings
                .builder(&defaults)
                .measured_current(amps(current))
                .build()
                .context("invalid IEC settings")?;
            cmd_evaluate(&IecOvercurrent::default(), &settings.curve, &input, json)
        }
        Commands::Underv {
            delay,
            voltage,
            pickup,
        } => {
            let input = ElementInput::builder_with(defaults)
                .delay_setting(s(delay))
                .measured_voltage(kilovolts(voltage))
                .pickup_voltage(kilovolts(pickup))
                .build()
                .context("invalid undervoltage settings")?;
            cmd_evaluate(&UndervoltageElement::default(), "UV", &input, json)
        }
        Commands::Vphz {
            time_multiplier,
            voltage,
            frequency,
            pickup,
            vnom,
            fnom,
            curve,
            per_unit,
        } => {
            let input = ElementInput::builder_with(defaults)
                .multiplier(time_multiplier)
                .measured_voltage(kilovolts(voltage))
                .measured_frequency(hertz(frequency))
                .pickup_per_unit(pickup)
                .nominal_voltage(vnom.map_or(volts(defaults.nominal_voltage), kilovolts))
                .nominal_frequency(hertz(fnom.unwrap_or(defaults.nominal_frequency)))
                .build()
                .context("invalid volts-per-hertz settings")?;
            cmd_volts_per_hertz(curve.as_deref(), per_unit, &input, json)
        }
        Commands::Curves { query } => {
            cmd_curves(query.as_deref().unwrap_or(""), json)?;
            Ok(None)
        }
        Commands::Sweep(SweepCommands::Idmt { settings, range }) => {
            let (builder, scale) = settings.builder(&defaults)?;
            let base = builder.build().context("invalid 51V settings")?;
            let result = run_sweep(
                &VoltageRestrainedOvercurrent::default(),
                &settings.curve,
                &base,
                Measured::Current,
                &range.definition(scale)?,
            )?;
            print_sweep(&result, scale, json)?;
            Ok(None)
        }
        Commands::Sweep(SweepCommands::Iec { settings, range }) => {
            let base = settings
                .builder(&defaults)
                .build()
                .context("invalid IEC settings")?;
            let result = run_sweep(
                &IecOvercurrent::default(),
                &settings.curve,
                &base,
                Measured::Current,
                &range.definition(1.0)?,
            )?;
            print_sweep(&result, 1.0, json)?;
            Ok(None)
        }
    }
}

fn cmd_evaluate(
    element: &dyn ProtectionElement,
    curve_id: &str,
    input: &ElementInput,
    json: bool,
) -> Result<Option<Status>> {
    let curve = element.resolve(curve_id)?;
    let outcome = element.evaluate(curve.id, input)?;
    print_report(
        &Report {
            element: element.name(),
            curve: Some(curve.id),
            outcome: Some(outcome),
            per_unit: None,
        },
        json,
    )?;
    Ok(Some(outcome.status()))
}

fn cmd_volts_per_hertz(
    curve_id: Option<&str>,
    per_unit: bool,
    input: &ElementInput,
    json: bool,
) -> Result<Option<Status>> {
    let element = VoltsPerHertzElement::default();
    let per_unit = if per_unit {
        Some(element.per_unit(input)?)
    } else {
        None
    };

    let (curve, outcome) = match curve_id {
        Some(id) => {
            let curve = element.resolve(id)?;
            (Some(curve.id), Some(element.evaluate(curve.id, input)?))
        }
        None if per_unit.is_some() => (None, None),
        None => bail!("give --curve, --per-unit, or both"),
    };

    print_report(
        &Report {
            element: element.name(),
            curve,
            outcome,
            per_unit,
        },
        json,
    )?;
    Ok(outcome.map(|o| o.status()))
}

fn print_report(report: &Report<'_>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if let (Some(curve), Some(outcome)) = (report.curve, &report.outcome) {
        println!("{} {}: {}", report.element, curve, outcome);
    }
    if let Some(pu) = report.per_unit {
        println!("Volts/Hertz: {pu:.4} pu");
    }
    Ok(())
}

fn cmd_curves(query: &str, json: bool) -> Result<()> {
    let curves = filter_curve_catalog(query);

    if json {
        println!("{}", serde_json::to_string_pretty(&curves)?);
        return Ok(());
    }

    if curves.is_empty() {
        println!("No curves match '{query}'");
        return Ok(());
    }

    for family in [
        CurveFamily::Idmt,
        CurveFamily::Iec,
        CurveFamily::VoltsPerHertz,
        CurveFamily::Undervoltage,
    ] {
        let members: Vec<&CurveSpec> = curves.iter().filter(|c| c.family() == family).collect();
        if members.is_empty() {
            continue;
        }
        println!("{family}:");
        for curve in members {
            println!(
                "  {:<8} {:<36} [{}]",
                curve.id,
                curve.display_name,
                curve.aliases.join(", ")
            );
        }
    }
    Ok(())
}

fn print_sweep(result: &SweepResult, scale: f64, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("{} against {}", result.curve_id, result.quantity);
    for point in &result.points {
        println!("  {:>12.4}  {}", point.x / scale, point.outcome);
    }
    println!(
        "{} tripped, {} not operated, {} invalid",
        result.num_tripped, result.num_not_operated, result.num_invalid
    );
    Ok(())
}
