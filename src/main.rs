use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};

use weather_line_bot::assistant::Assistant;
use weather_line_bot::bot::EventRouter;
use weather_line_bot::config::BotConfig;
use weather_line_bot::line::LineClient;
use weather_line_bot::line::rich_menu::RichMenuProvisioner;
use weather_line_bot::sources::Sources;
use weather_line_bot::webhook::webhook_routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = BotConfig::from_env().context("failed to load configuration")?;
    let http = config.http_client()?;
    let access_token = || SecretString::from(config.access_token.expose_secret().to_owned());

    if std::env::args().nth(1).as_deref() == Some("setup-rich-menu") {
        let provisioner = RichMenuProvisioner::new(
            http,
            &config.endpoints.line_api_base,
            &config.endpoints.line_data_base,
            access_token(),
        );
        let menu_id = provisioner
            .provision(Path::new(&config.rich_menu_image))
            .await
            .context("rich menu provisioning failed")?;
        tracing::info!(menu_id = %menu_id, "Rich menu ready");
        return Ok(());
    }

    let messenger = Arc::new(LineClient::new(
        http.clone(),
        &config.endpoints.line_api_base,
        access_token(),
    ));
    let sources = Sources::from_config(&config, http.clone());
    let mut router = EventRouter::new(messenger, sources, &config.endpoints.radar_image_url);

    match (&config.gemini_api_key, config.assistant_followup) {
        (Some(key), true) => {
            let assistant = Assistant::new(
                http.clone(),
                &config.endpoints.gemini_base,
                SecretString::from(key.expose_secret().to_owned()),
            );
            router = router.with_assistant_followup(assistant);
            tracing::info!("Assistant follow-up enabled");
        }
        (Some(_), false) => tracing::info!("Gemini key present; assistant follow-up disabled"),
        (None, true) => tracing::warn!("ASSISTANT_FOLLOWUP set but GEMINI_API_KEY missing"),
        (None, false) => tracing::warn!("GEMINI_API_KEY not set; assistant unavailable"),
    }

    let channel_secret = SecretString::from(config.channel_secret.expose_secret().to_owned());
    let app = webhook_routes(Arc::new(router), channel_secret);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "Webhook server started");
    axum::serve(listener, app).await?;

    Ok(())
}
