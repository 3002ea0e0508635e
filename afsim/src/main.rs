mod cli;
mod render;

use std::{env, process};

use aggregations::{AggregateReport, AggregationError, OrderReport, PrecomputedSchedule};
use cli::{CliError, Command, Invocation};
use config::ConfigError;
use core_types::config::AppConfig;
use ledger::{
    JsonStateStore, LedgerConfig, LedgerError, MemoryStateStore, SimulationController, StateStore,
};
use log::info;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    if let Err(err) = run() {
        eprintln!("afsim failed: {err}");
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<(), AppError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Invocation { ephemeral, command } = cli::parse(&args)?;
    let config = AppConfig::load()?;

    let store: Box<dyn StateStore> = if ephemeral {
        info!("ephemeral run; state will not be persisted");
        Box::new(MemoryStateStore::new())
    } else {
        let ledger = LedgerConfig::new(config.state_dir.clone());
        ledger.ensure_dirs()?;
        info!("simulation state at {:?}", ledger.snapshot_path());
        Box::new(JsonStateStore::new(ledger.snapshot_path()))
    };
    let controller = SimulationController::bootstrap(config.simulation_defaults(), store);
    execute(&controller, &config, command)
}

fn execute(
    controller: &SimulationController,
    config: &AppConfig,
    command: Command,
) -> Result<(), AppError> {
    match command {
        Command::Show => render::state(&controller.snapshot()),
        Command::Deposit(request) => {
            let receipt = controller.insert_order(request)?;
            render::receipt(&receipt);
            controller.read(|state| render::pool(&state.pool, &state.config));
        }
        Command::Remove(id) => {
            if controller.remove_order(&id) {
                println!("Order {id} removed; pool left as is");
            } else {
                println!("No order {id}");
            }
        }
        Command::Clear => {
            controller.clear_orders();
            println!("Orders cleared; pool left as is");
        }
        Command::Reset => {
            controller.reset();
            println!("Orders cleared and pool reset");
            controller.read(|state| render::pool(&state.pool, &state.config));
        }
        Command::Defaults => {
            controller.restore_defaults();
            println!("Default parameters restored");
            render::config(&controller.config());
        }
        Command::Set { field, value } => {
            let change = controller.update_config(&field.patch(value))?;
            if change.pool_reset {
                println!("Starting reserves changed; orders cleared and pool reset");
            }
            render::config(&controller.config());
        }
        Command::SetPackage { tier, patch } => {
            controller.update_package(tier, &patch)?;
            render::config(&controller.config());
        }
        Command::Report {
            details,
            page,
            order_id,
        } => {
            let schedule = PrecomputedSchedule::from_path(&details)?;
            let orders = controller.orders();
            let total_days = config.report.total_days;
            let page_size = config.report.page_size;
            match order_id {
                Some(id) => {
                    let order = orders
                        .iter()
                        .find(|order| order.id == id)
                        .ok_or(AppError::UnknownOrder(id))?;
                    let report =
                        OrderReport::build(&schedule, order, total_days, page_size, page)?;
                    render::order_report(&report);
                }
                None => {
                    let report =
                        AggregateReport::build(&schedule, &orders, total_days, page_size, page)?;
                    render::aggregate_report(&report);
                }
            }
        }
    }
    Ok(())
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Cli(#[from] CliError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Aggregation(#[from] AggregationError),
    #[error("no order with id `{0}`")]
    UnknownOrder(String),
}
