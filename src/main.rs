use careslot_api::config::ApiConfig;
use color_eyre::eyre::Result;
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;
    careslot_api::init_tracing(&config)?;

    // Load the provider catalog and open the booking store
    let state = careslot_api::build_state(&config).await?;

    // Start API server
    careslot_api::start_server(config, state).await?;

    Ok(())
}
