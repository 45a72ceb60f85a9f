use clap::Parser;
use nanobanana_backend_rs::client::{Error, ImageSelection, Session};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

/// Send a photo and a prompt to a Nano Banana server and save the result.
#[derive(Parser)]
#[command(name = "nanobanana", version)]
struct Args {
    /// Photo to transform (JPG, PNG or WEBP)
    #[arg(short, long)]
    image: PathBuf,

    /// What the generated image should look like
    #[arg(short, long)]
    prompt: String,

    #[arg(short, long, default_value = "http://localhost:3000")]
    server: String,

    /// Directory the generated image is written to
    #[arg(short, long, default_value = ".")]
    out: PathBuf,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

async fn run(args: Args) -> Result<PathBuf, Error> {
    let mut session = Session::new(args.server);

    match session.check_health().await {
        Ok(true) => {}
        Ok(false) => tracing::warn!("The server has no GOOGLE_API_KEY configured"),
        Err(err) => tracing::warn!("Health check failed: {}", err),
    }

    session.select_image(ImageSelection::from_path(&args.image).await?);
    session.set_prompt(args.prompt);
    session.submit_generation().await?;

    session.download(&args.out).await
}

#[tokio::main]
async fn main() {
    init_tracing();

    match run(Args::parse()).await {
        Ok(path) => println!("{}", path.display()),
        Err(err) => {
            eprintln!("error: {}", err);
            std::process::exit(1);
        }
    }
}
