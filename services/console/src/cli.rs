use std::io;

use clap::{Args, Parser, Subcommand};
use rentease::config::{AppConfig, StoreBackend};
use rentease::error::AppError;
use rentease::telemetry;
use tracing::info;

use crate::console::Console;
use crate::infra;

#[derive(Parser, Debug)]
#[command(
    name = "RentEase",
    about = "Rent, list and moderate properties from the terminal",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive marketplace (default command)
    Run(RunArgs),
    /// Create the administrator account, or promote an existing one
    CreateAdmin(CreateAdminArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct RunArgs {
    /// Override the configured store backend (`mongodb` or `memory`)
    #[arg(long, value_parser = parse_backend)]
    pub(crate) store: Option<StoreBackend>,
    /// Skip the pincode lookup and always type addresses by hand
    #[arg(long)]
    pub(crate) no_pincode_lookup: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CreateAdminArgs {
    #[arg(long)]
    pub(crate) username: String,
    #[arg(long)]
    pub(crate) password: String,
}

fn parse_backend(value: &str) -> Result<StoreBackend, String> {
    StoreBackend::parse(value).map_err(|err| err.to_string())
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Run(RunArgs::default()));

    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match command {
        Command::Run(args) => {
            if let Some(backend) = args.store {
                config.store.backend = backend;
            }
            if args.no_pincode_lookup {
                config.geocoding.enabled = false;
            }
            let app = infra::build_app(&config)?;
            info!(environment = ?config.environment, "starting console session");

            let stdin = io::stdin();
            let stdout = io::stdout();
            Console::new(&app, stdin.lock(), stdout.lock()).run()?;
            Ok(())
        }
        Command::CreateAdmin(args) => {
            let app = infra::build_app(&config)?;
            let admin = app
                .marketplace
                .users()
                .ensure_admin(args.username.trim(), &args.password)?;
            println!("Administrator '{}' is ready.", admin.username);
            Ok(())
        }
    }
}
