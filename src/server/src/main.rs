use clap::{crate_version, Arg, ArgMatches, Command};
use env_logger::Env;

use libvantage::config::ServerConfig;
use libvantage::constants::{DEFAULT_IP, DEFAULT_PORT};
use libvantage::error::VantageError;
use libvantage::repositories;
use libvantage::storage::AccountStore;

pub mod app_data;
pub mod auth;
pub mod controllers;
pub mod helpers;
pub mod params;
pub mod routes;
pub mod server;


const VERSION: &str = crate_version!();

const START: &str = "start";
const ADD_USER: &str = "add-user";

const ABOUT: &str = "Vantage synchronization server for network measurement clients.

Set VANTAGE_HOME to choose the directory holding accounts, experiments, results and logs (defaults to ./data).";

fn cli() -> Command {
    Command::new("vantage-server")
        .version(VERSION)
        .about(ABOUT)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(START)
                .about("Starts the server on the given host and port")
                .arg(
                    Arg::new("ip")
                        .long("ip")
                        .short('i')
                        .default_value(DEFAULT_IP)
                        .help("What host to bind the server to")
                        .action(clap::ArgAction::Set),
                )
                .arg(
                    Arg::new("port")
                        .long("port")
                        .short('p')
                        .help(format!("What port to bind the server to [default: {DEFAULT_PORT}]"))
                        .value_parser(clap::value_parser!(u16))
                        .action(clap::ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new(ADD_USER)
                .about("Registers a client account without going through the API. Safe to run while the server is up")
                .arg(
                    Arg::new("name")
                        .long("name")
                        .short('n')
                        .help("Username of the client")
                        .required(true)
                        .action(clap::ArgAction::Set),
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("Password of the client")
                        .required(true)
                        .action(clap::ArgAction::Set),
                ),
        )
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let matches = cli().get_matches();
    let result = match matches.subcommand() {
        Some((START, sub_matches)) => start(sub_matches).await,
        Some((ADD_USER, sub_matches)) => add_user(sub_matches),
        _ => Err(VantageError::basic_str("unknown subcommand")),
    };

    result.map_err(|err| {
        log::error!("{}", err);
        std::io::Error::other(err.to_string())
    })
}

async fn start(args: &ArgMatches) -> Result<(), VantageError> {
    let config = ServerConfig::from_env()?;
    let ip = args
        .get_one::<String>("ip")
        .map(String::as_str)
        .unwrap_or(DEFAULT_IP);
    let port = port_arg(args);

    log::info!(
        "vantage-server v{} starting, home {:?}, recommended client version {}",
        VERSION,
        config.home_dir,
        config.recommended_version
    );

    let bound = server::bind(&config, ip, port)?;
    bound.server.await?;
    log::info!("vantage-server stopped");
    Ok(())
}

fn port_arg(args: &ArgMatches) -> u16 {
    args.get_one::<u16>("port").copied().unwrap_or(DEFAULT_PORT)
}

fn add_user(args: &ArgMatches) -> Result<(), VantageError> {
    let (Some(name), Some(password)) = (
        args.get_one::<String>("name"),
        args.get_one::<String>("password"),
    ) else {
        return Err(VantageError::basic_str(
            "Usage: vantage-server add-user --name <NAME> --password <PASSWORD>",
        ));
    };

    let config = ServerConfig::from_env()?;
    let layout = config.layout();
    layout.init()?;
    let accounts = AccountStore::open(layout.accounts_path())?;
    let account = repositories::accounts::register(&accounts, &layout, name, password)?;

    log::info!(
        "added user {} to {:?}",
        account.username,
        layout.accounts_path()
    );
    Ok(())
}
