#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use confab_server::api::{MgmtState, ServiceContainer};
use confab_server::config::Config;
use confab_server::services::access::AccessGate;
use confab_server::services::conversation_service::ConversationService;
use confab_server::services::directory_service::DirectoryService;
use confab_server::services::health_service::HealthService;
use confab_server::services::membership_service::MembershipService;
use confab_server::services::message_service::MessageService;
use confab_server::storage::conversation_repo::ConversationRepository;
use confab_server::storage::message_repo::MessageRepository;
use confab_server::storage::user_repo::UserRepository;
use confab_server::{storage, telemetry};
use std::net::SocketAddr;
use tokio::sync::watch;
use tracing::Instrument;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    telemetry::init_telemetry(&config.telemetry);

    let boot_span = tracing::info_span!("boot_server");
    let (api_listener, mgmt_listener, app_router, mgmt_app, shutdown_rx) = async {
        // Phase 1: infrastructure
        let pool = storage::init_pool(&config.database_url).await?;
        storage::run_migrations(&pool).await?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        confab_server::spawn_signal_handler(shutdown_tx);

        // Phase 2: component wiring
        let conversation_repo = ConversationRepository::new(pool.clone());
        let message_repo = MessageRepository::new(pool.clone());
        let user_repo = UserRepository::new(pool.clone());
        let gate = AccessGate::new(conversation_repo.clone());

        let services = ServiceContainer {
            conversation_service: ConversationService::new(
                config.conversations.clone(),
                conversation_repo.clone(),
                user_repo.clone(),
            ),
            message_service: MessageService::new(
                config.conversations.clone(),
                gate.clone(),
                message_repo,
            ),
            membership_service: MembershipService::new(gate, conversation_repo, user_repo.clone()),
            directory_service: DirectoryService::new(config.conversations.clone(), user_repo),
        };

        // Phase 3: listeners and routers
        let app_router = confab_server::api::app_router(config.clone(), services);
        let mgmt_app =
            confab_server::api::mgmt_router(MgmtState { health_service: HealthService::new(pool) });

        let api_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
        let mgmt_addr: SocketAddr =
            format!("{}:{}", config.server.host, config.server.mgmt_port).parse()?;

        tracing::info!(address = %api_addr, "listening");
        tracing::info!(address = %mgmt_addr, "management server listening");

        let api_listener = tokio::net::TcpListener::bind(api_addr).await?;
        let mgmt_listener = tokio::net::TcpListener::bind(mgmt_addr).await?;

        Ok::<_, anyhow::Error>((api_listener, mgmt_listener, app_router, mgmt_app, shutdown_rx))
    }
    .instrument(boot_span)
    .await?;

    // Phase 4: serve until shutdown
    let mut api_rx = shutdown_rx.clone();
    let api_server = axum::serve(api_listener, app_router.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = api_rx.wait_for(|&s| s).await;
        });

    let mut mgmt_rx = shutdown_rx;
    let mgmt_server = axum::serve(mgmt_listener, mgmt_app.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = mgmt_rx.wait_for(|&s| s).await;
        });

    if let Err(e) = tokio::try_join!(api_server, mgmt_server) {
        tracing::error!(error = %e, "Server error");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
