//! Authenticate against the configured menu backend, load the menu once and
//! print how many entities it holds.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use color_eyre::eyre::{Context, Result};
use menu_admin::ClientSettings;
use menu_admin::domain::{MenuAdmin, MenuSummary};
use menu_admin::outbound::http::HttpMenuStore;
use menu_admin::telemetry::init_tracing;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;

fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = ClientSettings::load_from_iter(env::args_os())
        .wrap_err("failed to load menu-sync settings")?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build menu-sync runtime")?;
    let summary = runtime.block_on(sync_once(&settings))?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", summary_line(summary)).wrap_err("failed to write summary")?;
    Ok(())
}

async fn sync_once(settings: &ClientSettings) -> Result<MenuSummary> {
    let endpoint = settings
        .endpoint()
        .wrap_err("configured endpoint is not a valid URL")?;
    let store = HttpMenuStore::with_timeout(endpoint.clone(), settings.request_timeout())
        .wrap_err("failed to build HTTP client")?;
    let admin = MenuAdmin::new(Arc::new(store), settings.policy());

    admin
        .authenticate()
        .await
        .with_context(|| format!("initial menu load from {endpoint} failed"))?;
    Ok(admin.snapshot().summary())
}

fn summary_line(summary: MenuSummary) -> String {
    format!(
        "ingredients={} categories={} dishes={}",
        summary.ingredients, summary.categories, summary.dishes
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_line_lists_every_collection() {
        let summary = MenuSummary {
            ingredients: 3,
            categories: 2,
            dishes: 0,
        };
        assert_eq!(
            summary_line(summary),
            "ingredients=3 categories=2 dishes=0"
        );
    }
}
