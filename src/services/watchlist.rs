use uuid::Uuid;

use crate::{
    db::{TitleRepository, WatchlistRepository},
    error::{AppError, AppResult},
    models::{EntryFilter, NewTitle, Rating, Transition, WatchlistEntry, WatchlistItem},
};

/// Adds a title to the user's watchlist, caching the title on first reference.
///
/// A second add of the same title by the same user fails with `Conflict`; the
/// existing entry is left untouched.
pub async fn add_title<T, W>(
    titles: &T,
    entries: &W,
    user_id: Uuid,
    input: &NewTitle,
) -> AppResult<WatchlistItem>
where
    T: TitleRepository + ?Sized,
    W: WatchlistRepository + ?Sized,
{
    let title = titles.upsert_title(input).await?;
    let entry = entries.insert_entry(user_id, title.id).await?;

    tracing::info!(
        user_id = %user_id,
        title_id = %title.id,
        external_id = title.external_id,
        "Title added to watchlist"
    );

    Ok(WatchlistItem { entry, title })
}

/// Loads the user's entry for a title, applies the transition and writes it
/// back with a version check.
pub async fn apply_transition<W>(
    entries: &W,
    user_id: Uuid,
    title_id: Uuid,
    transition: Transition,
) -> AppResult<WatchlistEntry>
where
    W: WatchlistRepository + ?Sized,
{
    let mut entry = entries
        .find_entry(user_id, title_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Title {} is not in your lists", title_id)))?;

    let action = transition.name();
    let previous = entry.status;
    entry.apply(transition)?;

    let updated = entries.update_entry(&entry).await?.ok_or_else(|| {
        tracing::warn!(user_id = %user_id, title_id = %title_id, action, "Lost update race");
        AppError::Conflict("Entry was changed by another request, please retry".to_string())
    })?;

    tracing::info!(
        user_id = %user_id,
        title_id = %title_id,
        action,
        from = %previous,
        to = %updated.status,
        is_favorite = updated.is_favorite,
        "Watchlist entry updated"
    );

    Ok(updated)
}

/// Rates a seen title. The value is range-checked before the entry is touched.
pub async fn rate<W>(
    entries: &W,
    user_id: Uuid,
    title_id: Uuid,
    value: i32,
) -> AppResult<WatchlistEntry>
where
    W: WatchlistRepository + ?Sized,
{
    let rating = Rating::try_from(value)?;
    apply_transition(entries, user_id, title_id, Transition::Rate(rating)).await
}

pub async fn list<W>(
    entries: &W,
    user_id: Uuid,
    filter: EntryFilter,
) -> AppResult<Vec<WatchlistItem>>
where
    W: WatchlistRepository + ?Sized,
{
    let items = entries.list_entries(user_id, filter).await?;
    tracing::debug!(user_id = %user_id, filter = ?filter, count = items.len(), "Listed entries");
    Ok(items)
}
