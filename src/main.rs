use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};

use calorie_counter::render::{render_json, render_text};
use calorie_counter::{analyze, load_config, FileUpload, GoogleProvider, ImageUpload};

/// Estimate the calories and nutrients of a meal from a photo
#[derive(Parser, Debug)]
#[command(name = "calorie-counter", version, about)]
struct Args {
    /// Description of what you want to know, e.g. "Tell me the calories in this salad"
    #[arg(default_value = "")]
    description: String,

    /// PNG or JPEG photo of the meal
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Gemini model to use (overrides configuration)
    #[arg(short, long)]
    model: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    debug!("{:?}", args);

    let mut config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(model) = args.model {
        config.model = model;
    }

    let provider = match GoogleProvider::new(&config) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let upload = match args.image.map(FileUpload::new).transpose() {
        Ok(upload) => upload,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Using model {}", config.model);
    eprintln!("Scanning the meal...");
    let result = analyze(
        &provider,
        upload.as_ref().map(|u| u as &dyn ImageUpload),
        &args.description,
    )
    .await;

    match result {
        Ok(extraction) if args.json => match render_json(&extraction) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        Ok(extraction) => println!("{}", render_text(&extraction)),
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    }

    ExitCode::SUCCESS
}
