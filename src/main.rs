use bodyfit_rust::config::Configuration;
use bodyfit_rust::error::{AppError, ConfigurationError};
use bodyfit_rust::pipeline::{AnalysisResult, BodyAnalyzer, Recommendation, RecommendationCatalog};
use bodyfit_rust::ImageRef;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{Level, info, warn};

#[derive(Serialize)]
struct Report {
    result: AnalysisResult,
    recommendations: Vec<Recommendation>,
}

fn init_logging() {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_logging();

    let mut args = std::env::args().skip(1);
    let image: ImageRef = match args.next() {
        Some(arg) => arg.parse().unwrap_or_else(|never| match never {}),
        None => {
            return Err(AppError::Usage(
                "bodyfit-rust <image-path-or-url> [config-file]".to_string(),
            ));
        }
    };
    let config_path = args.next().map(PathBuf::from);

    let configuration = Configuration::load(config_path.as_deref())?;
    configuration
        .validate()
        .map_err(ConfigurationError::Invalid)?;
    if !configuration.vision.has_credential() {
        warn!("Vision API key is not configured; set BODYFIT_VISION__API_KEY or GOOGLE_CLOUD_API_KEY");
    }

    let analyzer = BodyAnalyzer::builder(configuration).build()?;
    let result = analyzer.analyze(&image).await?;
    info!(
        "Body type {} ({}), confidence {}",
        result.category(),
        result.category().label(),
        result.confidence()
    );

    let recommendations =
        RecommendationCatalog::default().recommend(result.category(), &mut rand::rng());
    let report = Report {
        result,
        recommendations,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
