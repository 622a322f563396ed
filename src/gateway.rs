// src/gateway.rs

use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use futures_util::future::join_all;
use serde_json::json;

use crate::api::appwrite::AppwriteError;
use crate::api::queries;
use crate::error::AppError;
use crate::models::{
    LibraryEntry, Movie, Purchase, PurchaseTarget, SearchMetric, TrendingMovie,
};
use crate::AppState;

const TRENDING_LIMIT: usize = 5;
const TRENDING_SCAN_LIMIT: u64 = 25;

/// Rewraps a backend failure for the caller, logging everything except the
/// expected not-found outcome.
fn surface(op: &str, err: AppwriteError) -> AppError {
    let err = AppError::from(err);
    if !err.is_not_found() {
        log::error!("{op} error: {err}");
    }
    err
}

pub async fn movie_by_id(state: &AppState, movie_id: &str) -> Result<Option<Movie>, AppError> {
    match state
        .appwrite
        .get_document::<Movie>(&state.database_id, &state.movies_collection_id, movie_id)
        .await
    {
        Ok(movie) => Ok(Some(movie)),
        Err(AppwriteError::NotFound { .. }) => Ok(None),
        Err(e) => Err(surface("movie_by_id", e)),
    }
}

pub async fn search_movies(state: &AppState, term: &str) -> Result<Vec<Movie>, AppError> {
    let queries = [queries::search("title", term)];
    let list = state
        .appwrite
        .list_documents::<Movie>(&state.database_id, &state.movies_collection_id, &queries)
        .await
        .map_err(|e| surface("search_movies", e))?;
    Ok(list.documents)
}

pub async fn movies_by_category(
    state: &AppState,
    category: &str,
) -> Result<Vec<Movie>, AppError> {
    let queries = [queries::equal("category", category)];
    let list = state
        .appwrite
        .list_documents::<Movie>(&state.database_id, &state.movies_collection_id, &queries)
        .await
        .map_err(|e| surface("movies_by_category", e))?;
    Ok(list.documents)
}

/// Whole catalog, newest first.
pub async fn latest_movies(state: &AppState) -> Result<Vec<Movie>, AppError> {
    let queries = [queries::order_desc("$createdAt")];
    let list = state
        .appwrite
        .list_documents::<Movie>(&state.database_id, &state.movies_collection_id, &queries)
        .await
        .map_err(|e| surface("latest_movies", e))?;
    Ok(list.documents)
}

/// Upserts the metric row for a search term: bump the counter if the exact
/// term was seen before, otherwise create it with a snapshot of the top
/// match. The snapshot is not refreshed if the movie changes later.
pub async fn record_search_hit(
    state: &AppState,
    term: &str,
    movie: &Movie,
) -> Result<(), AppError> {
    let lookup = [queries::equal("searchTerm", term), queries::limit(1)];
    let existing = state
        .appwrite
        .list_documents::<SearchMetric>(
            &state.database_id,
            &state.metrics_collection_id,
            &lookup,
        )
        .await
        .map_err(|e| surface("record_search_hit", e))?;

    if let Some(row) = existing.documents.first() {
        state
            .appwrite
            .update_document::<SearchMetric>(
                &state.database_id,
                &state.metrics_collection_id,
                &row.id,
                json!({ "count": row.count + 1 }),
            )
            .await
            .map_err(|e| surface("record_search_hit", e))?;
    } else {
        state
            .appwrite
            .create_document::<SearchMetric>(
                &state.database_id,
                &state.metrics_collection_id,
                "unique()",
                json!({
                    "searchTerm": term,
                    "movie_id": movie.id,
                    "title": movie.title,
                    "poster_url": movie.poster_url,
                    "count": 1,
                }),
            )
            .await
            .map_err(|e| surface("record_search_hit", e))?;
    }

    Ok(())
}

/// Top titles by search traffic. Differently worded terms resolving to the
/// same movie are merged client-side before ranking.
pub async fn trending_movies(state: &AppState) -> Result<Vec<TrendingMovie>, AppError> {
    let queries = [
        queries::order_desc("count"),
        queries::limit(TRENDING_SCAN_LIMIT),
    ];
    let rows = state
        .appwrite
        .list_documents::<SearchMetric>(
            &state.database_id,
            &state.metrics_collection_id,
            &queries,
        )
        .await
        .map_err(|e| surface("trending_movies", e))?;

    let mut grouped: HashMap<String, TrendingMovie> = HashMap::new();
    for row in rows.documents {
        grouped
            .entry(row.movie_id.clone())
            .and_modify(|entry| entry.total_count += row.count)
            .or_insert(TrendingMovie {
                movie_id: row.movie_id,
                title: row.title,
                poster_url: row.poster_url,
                total_count: row.count,
            });
    }

    let mut trending: Vec<TrendingMovie> = grouped.into_values().collect();
    trending.sort_by(|a, b| b.total_count.cmp(&a.total_count));
    trending.truncate(TRENDING_LIMIT);
    Ok(trending)
}

/// Grants currently in force for a user. The PAID and unexpired conditions
/// are part of the query, so rows already expired at call time never reach
/// the client.
pub async fn user_purchases(
    state: &AppState,
    user_id: &str,
) -> Result<Vec<Purchase>, AppError> {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let queries = [
        queries::equal("userId", user_id),
        queries::equal("status", "PAID"),
        queries::greater_than("expiresAt", now),
    ];
    let list = state
        .appwrite
        .list_documents::<Purchase>(
            &state.database_id,
            &state.purchases_collection_id,
            &queries,
        )
        .await
        .map_err(|e| surface("user_purchases", e))?;
    Ok(list.documents)
}

/// Individually purchased titles with their access windows. Bundle grants are
/// not title-bound and are skipped; so is any purchase whose movie has since
/// been removed from the catalog.
pub async fn user_library(
    state: &AppState,
    user_id: &str,
) -> Result<Vec<LibraryEntry>, AppError> {
    let purchases = user_purchases(state, user_id).await?;

    let singles: Vec<(String, chrono::DateTime<Utc>)> = purchases
        .into_iter()
        .filter_map(|p| match p.target {
            PurchaseTarget::Content(id) => Some((id, p.expires_at)),
            PurchaseTarget::Bundle(_) => None,
        })
        .collect();

    let fetches = singles.iter().map(|(id, _)| movie_by_id(state, id));
    let fetched = join_all(fetches).await;

    let mut entries = Vec::new();
    for ((_, expires_at), result) in singles.iter().zip(fetched) {
        match result {
            Ok(Some(movie)) => entries.push(LibraryEntry {
                movie,
                expires_at: *expires_at,
            }),
            Ok(None) => {} // purchased title no longer in the catalog
            Err(e) => return Err(e),
        }
    }
    Ok(entries)
}
