//! CLI Command Handlers
//!
//! Each handler takes CLI args and Output, returns ExitCode.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::{ShowFetcher, TmdbClient};
use crate::app::{dispatch, App};
use crate::cli::{ExitCode, InfoCmd, Output};
use crate::config::Config;
use crate::models::SimilarTitle;
use crate::title::DocumentTitle;
use crate::ui::detail::{derive_fetch_key, similar_label, DetailPage, DetailRender};

/// Build the TMDB client from config
pub fn tmdb_client(config: &Config) -> anyhow::Result<TmdbClient> {
    let client = TmdbClient::new(config.api_key()?);
    Ok(match &config.language {
        Some(language) => client.with_language(language.clone()),
        None => client,
    })
}

/// Drive `app` until every request it issued has finished. A fetch task that
/// panics leaves its query in flight instead of blocking the caller.
pub async fn settle_page(fetcher: Arc<dyn ShowFetcher>, mut app: App) -> App {
    let (tx, mut rx) = mpsc::unbounded_channel();

    loop {
        let tasks: Vec<_> = app
            .take_requests()
            .into_iter()
            .map(|request| dispatch(fetcher.clone(), request, tx.clone()))
            .collect();
        if tasks.is_empty() {
            break;
        }

        for task in tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "fetch task failed");
            }
        }
        while let Ok(outcome) = rx.try_recv() {
            app.handle_outcome(outcome);
        }
    }

    app.sync_effects();
    app
}

/// What `info` prints
#[derive(Debug, Serialize)]
pub struct InfoReport<'a> {
    pub route: String,
    pub document_title: String,
    #[serde(flatten)]
    pub render: DetailRender<'a>,
    pub similar: SimilarReport<'a>,
}

#[derive(Debug, Serialize)]
pub struct SimilarReport<'a> {
    pub label: &'static str,
    pub titles: &'a [SimilarTitle],
}

// =============================================================================
// Info Command
// =============================================================================

pub async fn info_cmd(cmd: InfoCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match tmdb_client(config) {
        Ok(client) => client,
        Err(e) => return output.error(e.to_string(), ExitCode::Error),
    };

    let route = derive_fetch_key(&cmd.route.category, &cmd.route.id);
    output.info(format!("Fetching {}", route));

    let app = App::with_ttl(route, DocumentTitle::new(), config.cache_ttl());
    let app = settle_page(Arc::new(client), app).await;
    run_info(app, cmd.full_overview, output)
}

/// Print the settled page held by `app`
pub fn run_info(mut app: App, full_overview: bool, output: &Output) -> ExitCode {
    if full_overview {
        app.toggle_overview();
    }

    let status = app.fetch_status();
    let render = app.detail().on_status_change(&status);

    if render == DetailRender::Loader {
        debug!(route = %app.route(), "info finished with the record still loading");
        return output.error("Fetch did not complete", ExitCode::NetworkError);
    }

    if let DetailRender::Error(message) = &render {
        let cause = app.fetch_error().unwrap_or("unknown error");
        debug!(route = %app.route(), cause, "info failed");
        let code = if app.route().id.as_u64().is_none() {
            ExitCode::InvalidArgs
        } else {
            ExitCode::NetworkError
        };
        return output.error(format!("{} ({})", message, cause), code);
    }

    let report = InfoReport {
        route: app.route().to_string(),
        document_title: app.document_title(),
        render,
        similar: SimilarReport {
            label: similar_label(&app.route().category),
            titles: app.similar_titles(),
        },
    };

    if output.json {
        if let Err(e) = output.print(&report) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else if let DetailRender::Page(page) = &report.render {
        println!("{}", format_page(page, &report.similar));
    }
    ExitCode::Success
}

/// Plain-text rendering of a page for terminals
pub fn format_page(page: &DetailPage<'_>, similar: &SimilarReport<'_>) -> String {
    let mut out = String::new();
    out.push_str(page.title);
    out.push('\n');

    if !page.genres.is_empty() {
        let genres: Vec<&str> = page.genres.iter().map(|g| g.name.as_str()).collect();
        out.push_str(&genres.join(" · "));
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&page.overview);
    if let Some(toggle) = page.overview_toggle {
        out.push_str(&format!(" [{}]", toggle));
    }
    out.push_str("\n\n");

    if !page.cast.is_empty() {
        let cast: Vec<String> = page.cast.iter().map(|c| c.to_string()).collect();
        out.push_str(&format!("Cast: {}\n", cast.join(", ")));
    }

    out.push_str(&format!("Trailer: {}\n", page.trailer_url));
    out.push_str(&format!("Episodes: {}\n", page.episodes.join(", ")));
    for video in page.videos {
        let url = video.url().unwrap_or_else(|| video.key.clone());
        out.push_str(&format!("Video: {} [{}] {}\n", video.name, video.kind, url));
    }

    if !similar.titles.is_empty() {
        out.push_str(&format!("\n{}:\n", similar.label));
        for title in similar.titles {
            out.push_str(&format!("  {}\n", title));
        }
    }

    out.trim_end().to_string()
}
