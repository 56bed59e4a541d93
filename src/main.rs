use anyhow::{anyhow, Context, Result};
use cinelist_lib::modules::catalog::{RequestCategory, RequestParams};
use cinelist_lib::modules::title_cache::{InitializeAction, LoadType, MediatorResult};
use cinelist_lib::shared::utils::logger::init_logger;
use cinelist_lib::shared::AppConfig;
use cinelist_lib::AppServices;
use futures::TryStreamExt;

/// Usage: cinelist [category] [query]
#[tokio::main]
async fn main() -> Result<()> {
    init_logger();

    let mut args = std::env::args().skip(1);
    let category: RequestCategory = match args.next() {
        Some(raw) => raw.parse().map_err(|e: String| anyhow!(e))?,
        None => RequestCategory::Trending,
    };
    let params = match args.next() {
        Some(query) if category.is_search() => RequestParams::search(query),
        _ => RequestParams::None,
    };

    let config = AppConfig::from_env().context("loading configuration")?;
    let services = AppServices::build(&config).context("opening database")?;

    let outcome = services.genre_sync.sync(false).await?;
    log::info!("Genres: {:?}", outcome);

    let coordinator = services.title_cache.coordinator(category, params).await?;

    if coordinator.initialize().await == InitializeAction::LaunchInitialRefresh {
        let state = services.title_cache.snapshot(category, None).await?;
        report(coordinator.load(LoadType::Refresh, &state).await, LoadType::Refresh)?;
    }

    let state = services.title_cache.snapshot(category, None).await?;
    report(coordinator.load(LoadType::Append, &state).await, LoadType::Append)?;

    let pages: Vec<_> = services
        .title_cache
        .page_stream(category, 20)?
        .try_collect()
        .await?;

    for row in pages.into_iter().flatten() {
        let title = &row.title;
        let genres: Vec<&str> = title.genres.iter().map(|g| g.name.as_str()).collect();
        println!(
            "p{:<3} {:>5} {:<5} {:<40} {:>4.1} {}{}",
            row.page,
            row.id,
            title.media_type.as_str(),
            title.name,
            title.vote_average,
            genres.join(", "),
            if title.is_watchlisted { " *" } else { "" }
        );
    }

    Ok(())
}

fn report(result: MediatorResult, load_type: LoadType) -> Result<()> {
    match result {
        MediatorResult::Success {
            end_of_pagination_reached,
        } => {
            log::info!(
                "{} finished (end of pagination: {})",
                load_type,
                end_of_pagination_reached
            );
            Ok(())
        }
        MediatorResult::Error(e) if e.is_retryable() => {
            log::warn!("{} failed, try again later: {}", load_type, e);
            Ok(())
        }
        MediatorResult::Error(e) => Err(anyhow!("{} failed: {}", load_type, e)),
    }
}
