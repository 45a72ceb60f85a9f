use nanobanana_backend_rs::app::App;
use tracing_subscriber::prelude::*;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    init_tracing();

    let app = App::new().await;

    if let Err(err) = app.serve().await {
        tracing::error!("Server stopped: {:?}", err);
        std::process::exit(1);
    }
}
