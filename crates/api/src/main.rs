use anyhow::Context;

use cin_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cin_observability::init();

    let config = ApiConfig::from_env().context("invalid configuration")?;
    let app = cin_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        session_cookie = %config.session_cookie,
        sign_in = %config.gate.sign_in_path,
        "listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;
    Ok(())
}
