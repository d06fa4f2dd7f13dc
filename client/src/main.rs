//! `portal-dashboard`: restores or establishes a session and logs the
//! dashboard the signed-in user would see.

use std::env;

use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use zeroize::Zeroizing;

use portal_client::config::PortalSettings;
use portal_client::domain::DASHBOARD_PATH;
use portal_client::inbound::routing::GuardState;
use portal_client::Portal;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        PortalSettings::load().map_err(|err| eyre!("failed to load portal settings: {err}"))?;
    let portal = Portal::from_settings(&settings).wrap_err("failed to build portal client")?;

    let session = portal.sessions().initialize().await;
    info!(phase = ?session.phase(), "session initialized");
    if !session.is_authenticated() {
        sign_in_from_env(&portal).await;
    }

    let navigator = portal.navigator(DASHBOARD_PATH);
    if navigator.path() != DASHBOARD_PATH || navigator.state() != GuardState::Rendering {
        info!(path = navigator.path(), state = ?navigator.state(), "dashboard not available");
        return Ok(());
    }

    match portal.dashboard().load().await {
        Ok(view) => {
            let snapshot =
                serde_json::to_string(&view).wrap_err("failed to serialize dashboard")?;
            info!(
                partial_failure = view.partial_failure(),
                snapshot = %snapshot,
                "dashboard loaded"
            );
        }
        Err(error) => warn!(code = ?error.code(), error = %error, "dashboard refused"),
    }

    let badge = portal.dashboard().unread_count().await;
    info!(unread = badge.count.0, stale = badge.stale, "notification badge");
    Ok(())
}

async fn sign_in_from_env(portal: &Portal) {
    let (Ok(email), Ok(password)) = (env::var("PORTAL_EMAIL"), env::var("PORTAL_PASSWORD")) else {
        info!("no stored session and no PORTAL_EMAIL/PORTAL_PASSWORD; staying signed out");
        return;
    };
    let password = Zeroizing::new(password);
    match portal.sessions().login(&email, &password).await {
        Ok(user) => info!(user_id = %user.id(), role = ?user.role(), "signed in from environment"),
        Err(error) => warn!(code = ?error.code(), error = %error, "sign-in failed"),
    }
}
