use apod::config::ServerConfig;
use apod::server::run_server;

async fn run() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    run_server(config).await
}

#[tokio::main]
async fn main() {
    better_panic::install();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(_) => {}
        Err(err) => {
            eprintln!("{:?}", err);
            std::process::exit(1);
        }
    };
}
