use apod::config::ClientConfig;
use apod::lookup::{LookupError, LookupFlow};
use apod::models::today;
use apod::view::ViewState;
use clap::Parser;
use log::debug;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "apod", version, about = "Look up NASA's Astronomy Picture of the Day")]
struct Cli {
    /// Date to look up as YYYY-MM-DD, defaults to today
    date: Option<String>,

    /// Read one date per line from stdin, every line is a new lookup
    #[arg(short, long)]
    interactive: bool,

    /// Base url of the key relay, overrides RELAY_URL
    #[arg(long)]
    relay_url: Option<String>,
}

fn print_settled(result: Result<ViewState, LookupError>) {
    match result {
        Ok(state) => println!("{}", state),
        Err(err) => eprintln!("{}", err),
    }
}

async fn interactive(flow: &LookupFlow) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        debug!("Submitting {:?}", line);
        flow.spawn(line, print_settled);
    }
    flow.settle().await;
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(relay_url) = &cli.relay_url {
        config = config.with_relay_url(relay_url)?;
    }
    let flow = LookupFlow::from_config(&config)?;
    if cli.interactive {
        return interactive(&flow).await;
    }
    let date = cli
        .date
        .unwrap_or_else(|| today().format("%Y-%m-%d").to_string());
    match flow.submit(&date).await {
        Ok(Some(state)) => print_settled(Ok(state)),
        Ok(None) => {}
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    better_panic::install();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run().await {
        Ok(_) => {}
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };
}
