use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::services::events::SessionEvents;
use crate::services::notifier::{EmailChannel, NotificationChannel, Notifier, WhatsAppChannel};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
    pub events: SessionEvents,
    pub notifier: Arc<Notifier>,
    pub mailer: EmailChannel,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> anyhow::Result<Self> {
        let mailer = EmailChannel::from_env()?;
        let whatsapp = WhatsAppChannel::from_env();
        if whatsapp.is_none() {
            tracing::info!("whatsapp credentials missing, channel disabled");
        }
        let notifier = Arc::new(Notifier::new(
            Arc::new(mailer.clone()),
            whatsapp.map(|c| Arc::new(c) as Arc<dyn NotificationChannel>),
        ));

        Ok(Self {
            pool,
            config,
            events: SessionEvents::new(),
            notifier,
            mailer,
        })
    }
}
