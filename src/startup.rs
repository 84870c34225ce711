use crate::configuration::{DatabaseSettings, Settings};
use crate::routes::{fallback, subscribers};
use crate::utils::error_envelope;
use actix_web::dev::Server;
use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, web};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        let listener = TcpListener::bind(configuration.application.address())?;
        let port = listener.local_addr()?.port();
        let server = run(listener, connection_pool)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(std::time::Duration::from_secs(2))
        .connect_lazy_with(configuration.connect_options())
}

fn run(listener: TcpListener, db_pool: PgPool) -> Result<Server, anyhow::Error> {
    let db_pool = Data::new(db_pool);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(error_envelope())
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(api_routes)
            .default_service(web::to(fallback::not_found))
            .app_data(db_pool.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

/// `/api` routes. Unknown paths inside the prefix get a 400, unsupported
/// methods on a subscriber path a 405.
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(web::resource("/subscribers").to(subscribers::collection))
            .service(web::resource("/subscribers/{subscriber_id}").to(subscribers::item))
            .default_service(web::to(fallback::invalid_url)),
    );
}
