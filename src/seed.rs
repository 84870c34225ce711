use anyhow::{Context, Result};
use fake::Fake;
use fake::faker::boolean::en::Boolean;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use subscribers_api::configuration::get_configuration;
use subscribers_api::domain::SubscriberFields;
use subscribers_api::models::SubscriberGateway;
use subscribers_api::startup::get_connection_pool;
use subscribers_api::telemetry::{get_subscriber, init_subscriber};

const DEFAULT_COUNT: usize = 10;

/// Replace every stored subscriber with freshly generated ones.
///
/// Usage: `seed [count]`
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = get_subscriber("seed".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let count = match std::env::args().nth(1) {
        Some(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("{} is not a valid subscriber count.", raw))?,
        None => DEFAULT_COUNT,
    };

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let connection_pool = get_connection_pool(&configuration.database);
    let gateway = SubscriberGateway::new(&connection_pool);

    let removed = gateway
        .delete_all()
        .await
        .context("Failed to clear subscribers.")?;
    tracing::info!(removed, "Cleared existing subscribers.");

    for _ in 0..count {
        let fields = SubscriberFields {
            email_address: Some(SafeEmail().fake()),
            first_name: Some(FirstName().fake()),
            last_name: Some(LastName().fake()),
            activation_flag: Some(Boolean(50).fake()),
        };
        let stored = gateway
            .insert(fields)
            .await
            .context("Failed to store subscriber.")?;
        tracing::info!(subscriber_id = stored.id, "Seeded subscriber.");
    }

    Ok(())
}
