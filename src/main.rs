use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use collection_tracking::api;
use collection_tracking::config::{DatabaseConfig, EnvironmentConfig, StoreBackend};
use collection_tracking::middleware::cors_layer_for;
use collection_tracking::repositories::{
    IdentityStore, InMemoryIdentityStore, InMemoryRouteStore, RouteRepository, RouteStore,
    SeedData, UserRepository,
};
use collection_tracking::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚛 Collection Tracking - tiempo real");
    info!("====================================");

    let config = EnvironmentConfig::from_env()?;
    info!("⚙️ Entorno: {}", config.environment);
    let (routes, identities) = build_stores(&config).await?;

    let app_state = AppState::new(config.clone(), routes, identities);

    let app = api::create_api_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer_for(&config.cors_origins)),
        )
        .with_state(app_state);

    let addr: SocketAddr = config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /ws     - WebSocket de tracking (Bearer o ?token=)");
    info!("   GET  /health - Estado del servicio");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

async fn build_stores(
    config: &EnvironmentConfig,
) -> Result<(Arc<dyn RouteStore>, Arc<dyn IdentityStore>)> {
    match &config.store {
        StoreBackend::Postgres => {
            let database = DatabaseConfig::from_env()?;
            info!("🗄️ Conectando a PostgreSQL: {}", database.masked_url());
            let pool = match database.create_pool().await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(anyhow::anyhow!("Error de base de datos: {}", e));
                }
            };
            Ok((
                Arc::new(RouteRepository::new(pool.clone())),
                Arc::new(UserRepository::new(pool)),
            ))
        }
        StoreBackend::Memory { seed_path } => {
            warn!("🧪 Usando stores en memoria, los cambios no se persisten");
            let (routes, identities) = match seed_path {
                Some(path) => {
                    let seed = SeedData::load(path).await?;
                    info!(
                        "🌱 Seed cargado: {} usuarios, {} rutas",
                        seed.users.len(),
                        seed.routes.len()
                    );
                    seed.into_stores().await
                }
                None => (InMemoryRouteStore::new(), InMemoryIdentityStore::new()),
            };
            Ok((Arc::new(routes), Arc::new(identities)))
        }
    }
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
