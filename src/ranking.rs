use tracing::debug;

use crate::{
    models::Movie,
    store::{MovieStore, StoreError, StoreResult},
};

/// Numbers a rating-ascending slice from `len` down to 1, so the best-rated entry
/// ends up ranked 1. Returns the `(id, ranking)` pairs that changed.
pub fn assign_rankings(movies: &mut [Movie]) -> Vec<(i32, i32)> {
    let total = movies.len() as i32;
    let mut changed = Vec::new();

    for (pos, movie) in movies.iter_mut().enumerate() {
        let ranking = total - pos as i32;
        if movie.ranking != Some(ranking) {
            movie.ranking = Some(ranking);
            changed.push((movie.id, ranking));
        }
    }

    changed
}

/// Recomputes and persists rankings, returning the list in rating-ascending order.
pub async fn refresh(store: &MovieStore) -> StoreResult<Vec<Movie>> {
    let mut movies = store.list_all().await?;
    let changed = assign_rankings(&mut movies);

    for &(id, ranking) in &changed {
        match store.set_ranking(id, ranking).await {
            Ok(()) => {},
            // Deleted by a concurrent request since the read.
            Err(StoreError::NotFound(_)) => debug!(id = id, "skipping ranking of deleted movie"),
            Err(err) => return Err(err),
        }
    }

    debug!(total = movies.len(), changed = changed.len(), "rankings refreshed");
    Ok(movies)
}
