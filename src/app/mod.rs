use std::{net::SocketAddr, sync::Arc, time::Duration};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::AppConfig,
    database::DbManager,
    dispatch::{self, Notifier},
    registry::{PgRegistry, Registry},
    subscription::SubscriptionService,
    templ_manager::TemplateManager,
    Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
    pub request_timeout: Duration,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener, request_timeout: Duration) -> Self {
        App {
            app_state,
            listener,
            request_timeout,
        }
    }

    /// Wires up every collaborator from the configuration.
    /// The database is connected before the listener gets bound, so an unreachable
    /// database stops the startup.
    pub async fn build_from_config(config: &AppConfig) -> Result<Self> {
        let email_config = &config.email_config;
        let admin_addr = email_config.valid_admin()?;
        let dispatcher = dispatch::from_config(email_config)?;

        let dm = DbManager::init(&config.db_config).await?;
        let registry: Arc<dyn Registry> = Arc::new(PgRegistry::new(&dm));
        let tm = TemplateManager::init();

        let notifier = Notifier::new(dispatcher, tm, &email_config.newsletter_name, admin_addr);
        let app_state = AppState::new(SubscriptionService::new(registry, notifier));

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let request_timeout = Duration::from_secs(config.net_config.request_timeout_secs);
        Ok(App::new(app_state, listener, request_timeout))
    }
}

pub struct InternalState {
    pub subscription_svc: SubscriptionService,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(subscription_svc: SubscriptionService) -> Self {
        AppState(Arc::new(InternalState { subscription_svc }))
    }
}
