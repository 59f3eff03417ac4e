use std::path::PathBuf;

/// Reset SIGPIPE to default behavior so piping (e.g. `govplane plan -e prod | head`)
/// exits cleanly instead of panicking on broken pipe.
#[cfg(unix)]
fn reset_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use govplane::config::loader::{self, DataLayout};
use govplane::config::parser::{load_config, DEFAULT_CONFIG_FILE};
use govplane::config::types::GovConfig;
use govplane::config::validator;
use govplane::cost::attribution::{active_cost_model, attribute_costs};
use govplane::cost::budget::budget_alerts;
use govplane::cost::kpi::compute_kpis;
use govplane::cost::models::{CostRecord, CostTables};
use govplane::cost::summary;
use govplane::cost::trends::cost_trends;
use govplane::executor::audit::AuditRow;
use govplane::executor::simulator::simulate;
use govplane::output::table::OutputFormat;
use govplane::output::{formatter, report, table, writer};
use govplane::planner::plan::ExecutionPlan;
use govplane::registry::reader::{parse_date, read_table, GovernanceRegistry};
use govplane::state::observed::ObservedState;

/// govplane - governance control plane for analytics resources
#[derive(Parser)]
#[command(name = "govplane", version, about, long_about = None)]
struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// Directory holding the registry CSV files (overrides the config).
    /// Relative output_dir and state_file settings resolve under it
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Output format for tables: table, json, csv
    #[arg(short, long, default_value = "table")]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the environments a plan can target
    Environments,

    /// Show a registry table or the observed-state snapshot
    Show {
        #[command(subcommand)]
        command: ShowCommands,
    },

    /// Show the reconciliation plan for an environment
    Plan {
        /// Target environment (from environment_config.csv)
        #[arg(short, long)]
        environment: String,
    },

    /// Plan, then simulate execution and print the audit
    Simulate {
        /// Target environment (from environment_config.csv)
        #[arg(short, long)]
        environment: String,
    },

    /// Query cost attribution and budget tracking
    Costs {
        #[command(subcommand)]
        command: CostCommands,
    },

    /// Load every governance table and check referential integrity
    Validate,
}

#[derive(Subcommand)]
enum ShowCommands {
    /// Declared resources
    Resources,
    /// Declared relationships
    Relationships,
    /// Environments and their execution modes
    Environments,
    /// The observed-state snapshot
    State,
    /// The execution audit table on disk
    Audit,
}

#[derive(Subcommand)]
enum CostCommands {
    /// Price every query and write cost_attribution.csv
    Attribute,

    /// Write team/user/dataset/daily/driver summaries, budget alerts and trends
    Summarize,

    /// Show headline cost figures
    Kpis {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<String>,
    },
}

fn main() -> Result<()> {
    #[cfg(unix)]
    reset_sigpipe();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Environments => cmd_environments(&cli),
        Commands::Show { ref command } => cmd_show(&cli, command),
        Commands::Plan { ref environment } => cmd_plan(&cli, environment),
        Commands::Simulate { ref environment } => cmd_simulate(&cli, environment),
        Commands::Costs { ref command } => cmd_costs(&cli, command),
        Commands::Validate => cmd_validate(&cli),
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn load_settings(cli: &Cli) -> Result<(GovConfig, DataLayout)> {
    let config = load_config(&cli.config)?;
    validator::validate(&config)?;
    let layout = DataLayout::resolve(&config.project.settings, cli.data_dir.as_deref());
    Ok((config, layout))
}

fn output_format(cli: &Cli) -> OutputFormat {
    OutputFormat::parse(&cli.format)
}

/// Print rows in the selected format, or a notice when there are none.
fn print_rows<T: Serialize>(
    cli: &Cli,
    title: &str,
    rows: &[T],
    empty_notice: &str,
) -> Result<()> {
    let format = output_format(cli);
    match table::render(rows, format)? {
        Some(out) => {
            if format == OutputFormat::Table {
                formatter::print_heading(title);
            }
            println!("{}", out);
        }
        None => formatter::print_no_data(empty_notice),
    }
    Ok(())
}

fn build_plan(layout: &DataLayout, environment: &str) -> Result<ExecutionPlan> {
    let registry = GovernanceRegistry::load(layout)?;
    let observed = ObservedState::load(&layout.state_file)?;
    let plan = ExecutionPlan::build(&registry, environment, &observed)?;
    Ok(plan)
}

fn attribute(tables: &CostTables) -> Result<Vec<CostRecord>> {
    let model = active_cost_model(&tables.cost_models)?;
    let records = attribute_costs(&tables.usage, &tables.datasets, &tables.users, model)?;
    Ok(records)
}

fn write_derived<T: Serialize + DeserializeOwned>(
    layout: &DataLayout,
    file_name: &str,
    rows: &[T],
) -> Result<()> {
    let path = layout.output(file_name);
    writer::write_table(&path, rows)?;
    println!(
        "  {} {} {}",
        "+".green(),
        file_name.bold(),
        format!("({} rows)", rows.len()).dimmed()
    );
    Ok(())
}

// ─── Commands ────────────────────────────────────────────────────────────────

fn cmd_environments(cli: &Cli) -> Result<()> {
    let (_, layout) = load_settings(cli)?;
    let registry = GovernanceRegistry::load(&layout)?;

    if output_format(cli) != OutputFormat::Table {
        return print_rows(
            cli,
            "Environments",
            &registry.environments,
            "no environments configured",
        );
    }

    if registry.environments.is_empty() {
        formatter::print_no_data("no environments configured");
        return Ok(());
    }

    formatter::print_heading("Environments");
    for env in &registry.environments {
        let mode = env.execution_mode.to_string();
        println!("  {} {:<20} {}", "→".blue(), env.environment.bold(), mode.dimmed());
    }
    println!();
    Ok(())
}

fn cmd_show(cli: &Cli, command: &ShowCommands) -> Result<()> {
    let (_, layout) = load_settings(cli)?;

    match command {
        ShowCommands::Resources => {
            let rows: Vec<govplane::registry::models::Resource> =
                read_table(&layout.input(loader::RESOURCE_REGISTRY))?;
            print_rows(cli, "Resources", &rows, "no resources declared")
        }
        ShowCommands::Relationships => {
            let rows: Vec<govplane::registry::models::Relationship> =
                read_table(&layout.input(loader::RELATIONSHIP_REGISTRY))?;
            print_rows(cli, "Relationships", &rows, "no relationships declared")
        }
        ShowCommands::Environments => {
            let rows: Vec<govplane::registry::models::EnvironmentConfig> =
                read_table(&layout.input(loader::ENVIRONMENT_CONFIG))?;
            print_rows(cli, "Environments", &rows, "no environments configured")
        }
        ShowCommands::State => {
            let observed = ObservedState::load(&layout.state_file)?;
            print_rows(
                cli,
                "Observed State",
                &observed.entries(),
                "no resources or relationships currently exist",
            )
        }
        ShowCommands::Audit => {
            let rows: Vec<AuditRow> = read_table(&layout.input(loader::EXECUTION_AUDIT))?;
            print_rows(cli, "Execution Audit", &rows, "no executions recorded")
        }
    }
}

fn cmd_plan(cli: &Cli, environment: &str) -> Result<()> {
    let (_, layout) = load_settings(cli)?;
    let plan = build_plan(&layout, environment)?;

    match output_format(cli) {
        OutputFormat::Table => formatter::print_plan(&plan),
        _ => print_rows(cli, "Plan", &plan.flat_rows(), "empty plan")?,
    }
    Ok(())
}

fn cmd_simulate(cli: &Cli, environment: &str) -> Result<()> {
    let (_, layout) = load_settings(cli)?;
    let plan = build_plan(&layout, environment)?;
    let audit = simulate(&plan);

    match output_format(cli) {
        OutputFormat::Table => {
            formatter::print_plan(&plan);
            formatter::print_audit(&audit);
            formatter::print_report(&report::generate_report(&audit, plan.execution_mode));
        }
        _ => print_rows(cli, "Execution Audit", &audit, "the plan produced no audit rows")?,
    }
    Ok(())
}

fn cmd_costs(cli: &Cli, command: &CostCommands) -> Result<()> {
    let (config, layout) = load_settings(cli)?;
    let tables = CostTables::load(&layout)?;
    let records = attribute(&tables)?;

    match command {
        CostCommands::Attribute => {
            println!();
            write_derived(&layout, loader::COST_ATTRIBUTION, &records)?;
            println!();
            formatter::print_success(&format!(
                "Attributed {} queries into {}.",
                records.len(),
                layout.output_dir.display()
            ));
        }

        CostCommands::Summarize => {
            let teams = summary::team_cost_summary(&records, &tables.teams, &config.budget);
            let alerts = budget_alerts(&teams, &config.budget, chrono::Utc::now());

            println!();
            write_derived(&layout, loader::COST_ATTRIBUTION, &records)?;
            write_derived(&layout, loader::TEAM_COST_SUMMARY, &teams)?;
            write_derived(
                &layout,
                loader::USER_COST_SUMMARY,
                &summary::user_cost_summary(&records, &tables.users),
            )?;
            write_derived(
                &layout,
                loader::DATASET_COST_SUMMARY,
                &summary::dataset_cost_summary(&records, &tables.datasets),
            )?;
            write_derived(
                &layout,
                loader::DAILY_COST_SUMMARY,
                &summary::daily_cost_summary(&records),
            )?;
            write_derived(
                &layout,
                loader::DRIVER_COST_SUMMARY,
                &summary::driver_cost_summary(&records),
            )?;
            write_derived(&layout, loader::BUDGET_ALERTS, &alerts)?;
            write_derived(
                &layout,
                loader::COST_TRENDS,
                &cost_trends(&records, &tables.teams),
            )?;
            println!();

            if !alerts.is_empty() {
                println!(
                    "{} {} team(s) at or over a budget threshold.",
                    "⚠".yellow().bold(),
                    alerts.len().to_string().yellow().bold()
                );
            }
            formatter::print_success(&format!(
                "Summaries written to {}.",
                layout.output_dir.display()
            ));
        }

        CostCommands::Kpis { today } => {
            let today = match today {
                Some(raw) => parse_date(raw).with_context(|| format!("Invalid date '{}'", raw))?,
                None => chrono::Local::now().date_naive(),
            };
            let kpis = compute_kpis(&tables, &records, today);
            match output_format(cli) {
                OutputFormat::Table => formatter::print_kpis(&kpis),
                _ => print_rows(cli, "KPIs", &kpis, "no KPIs")?,
            }
        }
    }

    Ok(())
}

fn cmd_validate(cli: &Cli) -> Result<()> {
    let (config, layout) = load_settings(cli)?;
    println!(
        "  {} Project: {}",
        "→".blue(),
        config.project.name.bold()
    );

    let registry = GovernanceRegistry::load(&layout)?;
    let observed = ObservedState::load(&layout.state_file)?;

    println!(
        "  {} {} resource(s), {} relationship(s), {} environment(s)",
        "→".blue(),
        registry.resources.len(),
        registry.relationships.len(),
        registry.environments.len(),
    );
    println!(
        "  {} Observed: {} resource(s), {} relationship(s)",
        "→".blue(),
        observed.resource_count(),
        observed.relationship_count(),
    );

    if registry.environments.is_empty() {
        bail!("No environments configured in {}.", loader::ENVIRONMENT_CONFIG);
    }

    // Building a plan per environment exercises every referential check.
    for name in registry.environment_names() {
        ExecutionPlan::build(&registry, name, &observed)
            .with_context(|| format!("Plan for environment '{}' is invalid", name))?;
    }

    if has_cost_tables(&layout) {
        let tables = CostTables::load(&layout)?;
        let records = attribute(&tables)?;
        println!(
            "  {} {} query event(s) priced",
            "→".blue(),
            records.len()
        );
    }

    formatter::print_success("Configuration is valid.");
    Ok(())
}

fn has_cost_tables(layout: &DataLayout) -> bool {
    layout.input(loader::TEAM_REGISTRY).is_file()
}
