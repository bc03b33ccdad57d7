use std::net::TcpListener;
use std::sync::Arc;

use person_api::configuration::get_configuration;
use person_api::identity::PgIdentityStore;
use person_api::person::PgPersonStore;
use person_api::startup::run;
use person_api::telemetry::init_telemetry;
use sqlx::postgres::PgPoolOptions;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    // The signing settings are immutable for the process lifetime;
    // reject unusable ones before serving any traffic.
    if let Err(e) = configuration.jwt.validate() {
        tracing::error!("Invalid JWT configuration: {}", e);
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Configuration error",
        ));
    }

    let connection_string = configuration.database.connection_string();
    tracing::info!("Attempting to connect to database");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&connection_string)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create connection pool: {}", e);
            std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Database connection error",
            )
        })?;

    tracing::info!("Database connection pool created successfully");

    let identities = Arc::new(PgIdentityStore::new(pool.clone()));
    let persons = Arc::new(PgPersonStore::new(pool));

    let address = format!("127.0.0.1:{}", configuration.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(listener, identities, persons, configuration.jwt.clone())?;

    server.await
}
