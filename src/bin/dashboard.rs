//! Text dashboard over the scoring service: list and inspect sampled
//! clients, request decisions, compare a client against the population, and
//! rescore hand-edited profiles.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scorecard_sdk::config;
use scorecard_sdk::models::client::ClientRecord;
use scorecard_sdk::render::Tone;
use scorecard_sdk::{
    CompareField, DecisionView, Result, ScorecardSdk, SimulationInput,
};

#[derive(Debug, Parser)]
#[command(
    name = "scorecard",
    version,
    about = "Dashboard for the credit scoring service"
)]
struct Cli {
    /// Sampled client table to load
    #[arg(long, global = true, value_name = "FILE", default_value = config::DEFAULT_CLIENTS_FILE)]
    clients: PathBuf,

    /// Scoring endpoint URL
    #[arg(long, global = true, value_name = "URL", default_value = config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// HTTP timeout for scoring calls, in seconds
    #[arg(long, global = true, default_value_t = config::DEFAULT_HTTP_TIMEOUT.as_secs())]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List sampled client ids
    List {
        /// Print at most this many ids (0 prints all)
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Show one client's stored features
    Show { id: i64 },
    /// Score a client and print the decision
    Predict { id: i64 },
    /// Compare a client against the sampled population on one field
    Compare {
        id: i64,
        /// Field to compare: income, credit, annuity, or family (upstream
        /// column names work too)
        field: CompareField,
        #[arg(long, default_value_t = 30)]
        bins: usize,
    },
    /// Rescore a profile seeded from a client, with fields overridden
    Simulate {
        id: i64,
        #[arg(long)]
        income: Option<f64>,
        #[arg(long)]
        credit: Option<f64>,
        #[arg(long)]
        annuity: Option<f64>,
        #[arg(long)]
        family: Option<f64>,
        /// Age in days (non-negative)
        #[arg(long)]
        age_days: Option<f64>,
        /// Days since employment started (non-negative)
        #[arg(long)]
        employed_days: Option<f64>,
        /// Days since registration (non-negative)
        #[arg(long)]
        registration_days: Option<f64>,
        /// Days since the identity document was published (non-negative)
        #[arg(long)]
        id_publish_days: Option<f64>,
    },
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let sdk = ScorecardSdk::builder()
        .clients_path(&cli.clients)
        .endpoint(cli.endpoint)
        .timeout(Duration::from_secs(cli.timeout_secs))
        .build()?;

    match cli.command {
        Command::List { limit } => {
            let ids = sdk.table().ids();
            println!("{} sampled clients", ids.len());
            let shown = if limit == 0 { ids.len() } else { limit.min(ids.len()) };
            for id in &ids[..shown] {
                println!("{id}");
            }
            if shown < ids.len() {
                eprintln!("({} more; rerun with --limit 0 to list all)", ids.len() - shown);
            }
        }
        Command::Show { id } => {
            let record = lookup(&sdk, id)?;
            // Printed under the wire keys so the output matches the table on
            // disk and the scoring payload.
            let json = serde_json::to_string_pretty(record)
                .map_err(|e| scorecard_sdk::ScorecardError::Data(e.to_string()))?;
            println!("{json}");
        }
        Command::Predict { id } => {
            eprintln!("requesting score (a cold service can take a few seconds)...");
            let view = sdk.predict_client(id)?;
            print_decision(&view);
        }
        Command::Compare { id, field, bins } => {
            let hist = sdk.compare(id, field, bins)?;
            println!(
                "{} across {} sampled clients (client {} marked)",
                field.label(),
                sdk.table().len(),
                id
            );
            for line in hist.to_text(40) {
                println!("{line}");
            }
        }
        Command::Simulate {
            id,
            income,
            credit,
            annuity,
            family,
            age_days,
            employed_days,
            registration_days,
            id_publish_days,
        } => {
            let record = lookup(&sdk, id)?;
            let mut input = SimulationInput::from_record(record);
            if let Some(v) = income {
                input.income_total = v;
            }
            if let Some(v) = credit {
                input.credit_amount = v;
            }
            if let Some(v) = annuity {
                input.annuity_amount = v;
            }
            if let Some(v) = family {
                input.family_members = v;
            }
            if let Some(v) = age_days {
                input.age_days = v;
            }
            if let Some(v) = employed_days {
                input.employed_days = v;
            }
            if let Some(v) = registration_days {
                input.registration_days = v;
            }
            if let Some(v) = id_publish_days {
                input.id_publish_days = v;
            }
            print_profile(&input);
            eprintln!("requesting score (a cold service can take a few seconds)...");
            let view = sdk.predict_profile(&input)?;
            print_decision(&view);
        }
    }
    Ok(())
}

fn lookup(sdk: &ScorecardSdk, id: i64) -> Result<&ClientRecord> {
    sdk.table().get(id).ok_or_else(|| {
        scorecard_sdk::ScorecardError::NotFound(format!("no client with id {id}"))
    })
}

fn print_profile(input: &SimulationInput) {
    println!("profile to score:");
    println!("  {:<20} {}", "income", input.income_total);
    println!("  {:<20} {}", "credit", input.credit_amount);
    println!("  {:<20} {}", "annuity", input.annuity_amount);
    println!("  {:<20} {}", "family members", input.family_members);
    println!("  {:<20} {}", "age (days)", input.age_days);
    println!("  {:<20} {}", "employed (days)", input.employed_days);
    println!("  {:<20} {}", "registered (days)", input.registration_days);
    println!("  {:<20} {}", "id published (days)", input.id_publish_days);
}

fn print_decision(view: &DecisionView) {
    let mark = match view.verdict.tone {
        Tone::Positive => "+",
        Tone::Negative => "-",
    };
    println!("[{}] {}", mark, view.verdict.label);
    if view.verdict.unexpected {
        println!("    (label is not one of the known outcomes; shown as a refusal)");
    }
    println!("default probability: {}", view.probability_pct);
    println!("{}", view.sensitivity.message());

    if let Some(bars) = &view.attribution {
        let max_abs = bars.iter().map(|b| b.value.abs()).fold(0.0_f64, f64::max);
        println!();
        println!("feature contributions (strongest against first):");
        for bar in bars {
            let len = if max_abs > 0.0 {
                ((bar.value.abs() / max_abs) * 30.0).round() as usize
            } else {
                0
            };
            println!("  {:<20} {:>+9.4} {}", bar.feature, bar.value, "#".repeat(len));
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
