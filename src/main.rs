use subscribers_api::configuration::get_configuration;
use subscribers_api::startup::Application;
use subscribers_api::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = get_subscriber("subscribers_api".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration.");
    let application = Application::build(configuration).await?;

    tracing::info!("Listening on port {}", application.port());
    application.run_until_stopped().await?;

    Ok(())
}
