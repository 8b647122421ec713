use error_stack::ResultExt;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use driver::database::{InMemoryDatabase, PostgresDatabase};
use kernel::interface::query::DependOnBookQuery;
use kernel::interface::update::DependOnBookModifier;
use kernel::KernelError;

use crate::config::{AppConfig, StoreKind};
use crate::error::StackTrace;
use crate::handler::{AppModule, Handler};
use crate::route::BookRouter;

mod config;
mod controller;
mod error;
mod handler;
mod request;
mod response;
mod route;
mod validation;

#[tokio::main]
async fn main() -> Result<(), StackTrace> {
    let appender = tracing_appender::rolling::daily(std::path::Path::new("./logs/"), "debug.log");
    let (non_blocking_appender, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_filter(tracing_subscriber::EnvFilter::new(
                    std::env::var("RUST_LOG").unwrap_or_else(|_| {
                        "driver=debug,application=debug,server=debug,tower_http=debug,sqlx=info"
                            .into()
                    }),
                ))
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .with(
            tracing_subscriber::fmt::Layer::default()
                .with_writer(non_blocking_appender)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(store = ?config.store(), "Starting bookshelf");

    match config.store() {
        StoreKind::Postgres => {
            let database = PostgresDatabase::new().await?;
            database.migrate().await?;
            serve(&config, database).await?;
        }
        StoreKind::Memory => serve(&config, InMemoryDatabase::default()).await?,
    }

    Ok(())
}

async fn serve<D>(config: &AppConfig, database: D) -> error_stack::Result<(), KernelError>
where
    D: DependOnBookQuery + DependOnBookModifier,
{
    let app = AppModule::new(Handler::new(database));

    let router = axum::Router::<AppModule<D>>::new()
        .route_book()
        .layer(TraceLayer::new_for_http())
        // TODO: restrict allowed origins once the frontend host is known
        .layer(CorsLayer::new())
        .with_state(app);

    let tcp = TcpListener::bind(*config.bind_addr())
        .await
        .change_context_lazy(|| KernelError::Internal)
        .attach_printable_lazy(|| format!("Failed to listen on {}", config.bind_addr()))?;
    tracing::info!("Listening on {}", config.bind_addr());

    axum::serve(tcp, router.into_make_service())
        .await
        .change_context_lazy(|| KernelError::Internal)?;

    Ok(())
}
