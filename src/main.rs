//! `mc-rcon`: log in to a server's remote console and run commands
//! interactively.

use clap::Parser;
use mc_rcon::{
    driver::{self, CommandSource, Termination, ThreadSource},
    format::ConsoleSink,
    rcon::DEFAULT_PORT,
    ClientConfig, RconClient,
};
use std::{
    io::{self as stdio, Write},
    process,
    time::Duration,
};
use tracing_subscriber::{fmt, EnvFilter};

/// Remote console client
#[derive(Parser, Debug)]
#[command(name = "mc-rcon")]
#[command(about = "Interactive RCON client for minecraft servers")]
#[command(version)]
struct Args {
    /// Server hostname or address
    host: String,

    /// Port number
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Disable color output
    #[arg(long)]
    no_color: bool,

    /// Seconds to wait for connecting and for each read and write
    #[arg(long, default_value = "5")]
    timeout: u64,
}

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("{err}");
    process::exit(1);
}

#[tokio::main]
async fn main() {
    // logs go to stderr so they never mix with command output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(stdio::stderr)
        .init();

    let args = Args::parse();

    let config = ClientConfig::builder()
        .host(&args.host)
        .port(args.port)
        .timeout(Duration::from_secs(args.timeout))
        .colored(!args.no_color)
        .build();

    // one id for the whole session
    let request_id = rand::random::<i32>() & i32::MAX;

    let mut client = match RconClient::connect(&config, request_id).await {
        Ok(client) => client,
        Err(err) => fail(err),
    };

    // stdin is read on its own thread so an interrupt never waits for Enter
    let mut source = match ThreadSource::spawn(stdio::BufReader::new(stdio::stdin())) {
        Ok(source) => source,
        Err(err) => fail(err),
    };

    let password = match read_password(&mut source).await {
        Ok(password) => password,
        Err(err) => fail(err),
    };

    if let Err(err) = client.authenticate(&password).await {
        fail(err);
    }
    println!("Successfully logged in");

    let mut sink = ConsoleSink::new(stdio::stdout(), config.colored);
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "cannot listen for interrupts");
            std::future::pending::<()>().await;
        }
    };

    match driver::run(&mut client, &mut source, &mut sink, interrupt).await {
        Ok(outcome) => {
            if outcome == Termination::EndOfInput {
                print!("^D");
            }
            println!("\nShutting down...");
        }
        Err(err) => eprintln!("{err}"),
    }

    if let Err(err) = client.close().await {
        eprintln!("{err}");
    }
}

async fn read_password(source: &mut ThreadSource) -> stdio::Result<String> {
    print!("Password: ");
    stdio::stdout().flush()?;

    Ok(source.next_line().await?.unwrap_or_default())
}
