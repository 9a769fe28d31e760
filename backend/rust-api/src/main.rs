use std::sync::Arc;

use anyhow::Context;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use storybook_api::{
    config::{Config, LogFormat},
    create_router,
    services::AppState,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    let provider = init_telemetry(&config)?;
    init_tracing(&config, provider.as_ref());

    tracing::info!(
        "Starting storybook-api (env: {})",
        std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string())
    );
    tracing::info!(
        "Quiz sessions split after {}s of inactivity",
        config.session_gap_seconds
    );

    let bind_addr = config.bind_addr.clone();
    let app_state = Arc::new(AppState::connect(config).await?);
    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    if let Some(provider) = provider {
        tracing::info!("Flushing OpenTelemetry spans");
        if let Err(e) = provider.shutdown() {
            eprintln!("OpenTelemetry shutdown failed: {:?}", e);
        }
    }

    Ok(())
}

fn init_tracing(config: &Config, provider: Option<&SdkTracerProvider>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storybook_api=debug,tower_http=debug".into());

    let otel_layer =
        provider.map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer("storybook-api")));

    let (json_layer, plain_layer) = match config.log_format {
        LogFormat::Json => (Some(fmt::layer().json()), None),
        LogFormat::Plain => (None, Some(fmt::layer())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .with(json_layer)
        .with(plain_layer)
        .init();
}

/// OTLP export is only switched on when an endpoint is configured.
fn init_telemetry(config: &Config) -> anyhow::Result<Option<SdkTracerProvider>> {
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::Resource;

    let Some(endpoint) = config.otlp_endpoint.as_deref() else {
        return Ok(None);
    };

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(endpoint)
        .build()
        .context("Failed to create OTLP exporter")?;

    let resource = Resource::builder_empty()
        .with_service_name("storybook-api")
        .with_attributes(vec![KeyValue::new(
            "service.version",
            env!("CARGO_PKG_VERSION"),
        )])
        .build();

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build();

    opentelemetry::global::set_tracer_provider(provider.clone());

    Ok(Some(provider))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
