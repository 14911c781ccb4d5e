use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use kubedash_console::actions::Dispatcher;
use kubedash_console::clients::BackendClient;
use kubedash_console::notify::Notifier;
use kubedash_console::poller::{start_dashboard_session, start_health_session};
use kubedash_console::slots::SlotManager;
use kubedash_console::{AppState, config, routes};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kubedash_console=info".parse().unwrap()),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| {
            std::env::args().skip(1).zip(std::env::args().skip(2)).find_map(|(k, v)| {
                if k == "-config" || k == "--config" {
                    Some(v)
                } else {
                    None
                }
            })
        })
        .unwrap_or_else(|| "/etc/kubedash-console/config.yaml".to_string());

    let cfg = config::Config::load(&PathBuf::from(&config_path)).unwrap_or_else(|e| {
        eprintln!("error loading config: {}", e);
        std::process::exit(1);
    });

    let client = Arc::new(BackendClient::new(cfg.backend_url.clone()));

    let health = Arc::new(start_health_session(
        client.clone(),
        Duration::from_secs(cfg.poll.pod_health_interval_secs),
    ));
    let dashboard = Arc::new(start_dashboard_session(
        client.clone(),
        Duration::from_secs(cfg.poll.dashboard_interval_secs),
    ));

    let notifier = Notifier::new(cfg.notifications.dismiss_after_ms);
    let dispatcher = Arc::new(Dispatcher::new(
        client.clone(),
        health.trigger(),
        notifier.clone(),
        Duration::from_millis(cfg.actions.repoll_delay_ms),
    ));

    let state = AppState {
        client,
        health: health.clone(),
        dashboard: dashboard.clone(),
        dispatcher,
        slots: Arc::new(SlotManager::new()),
        notifier,
    };

    let router = routes::build_router(state);

    let listen_addr = cfg.listen_addr();
    let listener = TcpListener::bind(&listen_addr).await.unwrap_or_else(|e| {
        eprintln!("failed to bind {}: {}", listen_addr, e);
        std::process::exit(1);
    });

    info!("kubedash-console listening on {}", listen_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap_or_else(|e| {
            eprintln!("server error: {}", e);
            std::process::exit(1);
        });

    health.stop();
    dashboard.stop();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
