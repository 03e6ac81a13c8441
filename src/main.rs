use places::config::Config;
use places::engine::Engine;
use places::server::serve;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(?err, "invalid configuration");
            std::process::exit(1);
        }
    };

    if config.passcode.is_none() {
        tracing::warn!("PLACES_PASSCODE is not set, places cannot be unlocked");
    }

    let engine = Engine::from_config(&config);

    if let Err(err) = serve(engine, config.bind_addr).await {
        tracing::error!(?err, "server stopped");
        std::process::exit(1);
    }
}
