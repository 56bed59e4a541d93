use crate::modules::title_cache::domain::{CachedTitle, LoadedPage, PagingState, TitleCacheRepository};
use crate::shared::application::PaginationParams;
use crate::shared::errors::AppResult;
use futures::stream::{self, Stream, TryStreamExt};
use std::sync::Arc;

/// Ordered pages of a category's cache, read lazily.
///
/// Ends after the last page or the first error.
pub fn page_stream(
    store: Arc<dyn TitleCacheRepository>,
    page_size: u32,
) -> impl Stream<Item = AppResult<Vec<CachedTitle>>> {
    stream::unfold(
        Some(PaginationParams::new(1, page_size)),
        move |params| {
            let store = Arc::clone(&store);
            async move {
                let params = params?;
                match store.paged_read(params).await {
                    Ok(result) if result.items.is_empty() => None,
                    Ok(result) => {
                        let next = result.has_next_page().then(|| params.next());
                        Some((Ok(result.items), next))
                    }
                    Err(e) => Some((Err(e), None)),
                }
            }
        },
    )
}

/// Whole cache grouped into one loaded page per remote page
pub async fn snapshot(
    store: Arc<dyn TitleCacheRepository>,
    anchor_position: Option<usize>,
) -> AppResult<PagingState> {
    let rows: Vec<Vec<CachedTitle>> = page_stream(store, 100).try_collect().await?;

    let mut pages: Vec<LoadedPage> = Vec::new();
    let mut current: Option<u32> = None;
    for row in rows.into_iter().flatten() {
        match pages.last_mut() {
            Some(page) if current == Some(row.page) => page.items.push(row),
            _ => {
                current = Some(row.page);
                pages.push(LoadedPage::new(vec![row]));
            }
        }
    }

    Ok(PagingState::new(pages, anchor_position))
}
