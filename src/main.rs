use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use appointment_notifier::{
    api::run_api_server,
    clients::{
        appwrite::AppwriteClient,
        mailer::{DispatchTransport, NoopTransport, SmtpTransport},
    },
    config::{Config, DispatchBackend},
    pipeline::IntakePipeline,
    resolver::{CollectionSettings, RecordResolver},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install TLS crypto provider"))?;

    let config = Config::load()?;

    info!(
        appwrite_endpoint = %config.appwrite_endpoint,
        project_id = %config.appwrite_project,
        database_id = %config.db_id,
        appointment_collection = config.appointment_col.as_deref().unwrap_or("-"),
        patient_collection = %config.patient_col,
        doctor_collection = %config.doctor_col,
        dispatch_backend = ?config.dispatch_backend,
        recipient_count = config.notification_recipients.len(),
        app_env = %config.app_env,
        "Configuration loaded"
    );

    let store = Arc::new(AppwriteClient::new(&config)?);

    let transport: Arc<dyn DispatchTransport> = match config.dispatch_backend {
        DispatchBackend::Smtp => Arc::new(SmtpTransport::new(&config)?),
        DispatchBackend::Noop => Arc::new(NoopTransport),
    };

    let resolver = RecordResolver::new(store, CollectionSettings::from_config(&config));
    let pipeline = IntakePipeline::new(
        resolver,
        transport,
        config.notification_recipients.clone(),
    );

    run_api_server(&config, pipeline).await
}
