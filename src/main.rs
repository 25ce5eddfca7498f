use clap::{Args, Parser, Subcommand};
use neural_pricer::config::AppConfig;
use neural_pricer::{FeatureCodec, ModelRegistry, OptionParameters, OptionType, PricingEngine, PricingError, PricingResult};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "neural_pricer")]
#[command(version, about = "Deep learning European option pricer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand)]
enum Mode {
    /// Price one option with the trained call/put networks
    Predict(PredictArgs),
    /// Train the networks (offline workflow)
    Train,
    /// Evaluate the networks (offline workflow)
    Evaluate,
}

#[derive(Args)]
struct PredictArgs {
    /// Call model artifact (JSON); falls back to CALL_MODEL_PATH
    #[arg(long)]
    call_model: Option<PathBuf>,

    /// Put model artifact (JSON); falls back to PUT_MODEL_PATH
    #[arg(long)]
    put_model: Option<PathBuf>,

    /// Call scaler artifact (JSON); falls back to CALL_SCALER_PATH
    #[arg(long)]
    call_scaler: Option<PathBuf>,

    /// Put scaler artifact (JSON); falls back to PUT_SCALER_PATH
    #[arg(long)]
    put_scaler: Option<PathBuf>,

    /// Time to expiration in years
    #[arg(long)]
    time_to_expiry: Option<f64>,

    /// Strike price of the option
    #[arg(long)]
    strike_price: Option<f64>,

    /// Current underlying asset price
    #[arg(long)]
    underlying_price: Option<f64>,

    /// Annualized volatility (0.0 to 1.0)
    #[arg(long)]
    volatility: Option<f64>,

    /// Risk-free interest rate (0.0 to 1.0)
    #[arg(long)]
    risk_free_rate: Option<f64>,

    /// Type of option to price: call or put
    #[arg(long)]
    option_type: Option<OptionType>,
}

fn main() {
    let cli = Cli::parse();
    let cfg = AppConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.mode {
        Mode::Predict(args) => predict_mode(&cfg, args),
        Mode::Train => {
            println!("Training mode not implemented in this version.");
            println!("Please use the Jupyter notebook for model training.");
        }
        Mode::Evaluate => {
            println!("Evaluation mode not implemented in this version.");
            println!("Please use the Jupyter notebook for model evaluation.");
        }
    }
}

/// Errors are reported, never turned into a non-zero exit.
fn predict_mode(cfg: &AppConfig, args: PredictArgs) {
    match run_predict(cfg, args) {
        Ok((option_type, price)) => println!("Predicted {option_type} option price: ${price:.2}"),
        Err(PricingError::Config(msg)) => {
            tracing::error!("{msg}");
            println!("Error: {msg}");
        }
        Err(e) => {
            tracing::error!(error = %e, "prediction failed");
            println!("Error during prediction: {e}");
        }
    }
}

fn run_predict(cfg: &AppConfig, args: PredictArgs) -> PricingResult<(OptionType, f64)> {
    let paths = cfg.artifacts(args.call_model, args.put_model, args.call_scaler, args.put_scaler)?;

    let (Some(t), Some(k), Some(s), Some(sigma), Some(r), Some(option_type)) = (
        args.time_to_expiry,
        args.strike_price,
        args.underlying_price,
        args.volatility,
        args.risk_free_rate,
        args.option_type,
    ) else {
        return Err(PricingError::Config(
            "All option parameters are required for prediction.".into(),
        ));
    };

    let mut registry = ModelRegistry::new();
    registry.load(&paths.call_model, &paths.put_model, &paths.call_scaler, &paths.put_scaler)?;

    let params = OptionParameters::new(t, k, s, sigma, r)?;
    let engine = PricingEngine::new(&registry, FeatureCodec::new());
    let price = engine.price(option_type, &params)?;

    Ok((option_type, price))
}
