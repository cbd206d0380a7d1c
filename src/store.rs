use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr, sea_query::Expr,
};
use tracing::debug;

use crate::{
    entities::movie,
    models::{Movie, NewMovie},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("movie {0} is not in your list")]
    NotFound(i32),

    #[error("{}", .field.message(.title))]
    Duplicate { title: String, field: UniqueField },

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// The unique column an insert collided on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UniqueField {
    Title,
    Description,
    PosterUrl,
    Unknown,
}

impl UniqueField {
    /// SQLite reports the clash as `UNIQUE constraint failed: movies.<column>`.
    fn from_constraint_message(msg: &str) -> Self {
        if msg.contains("movies.title") {
            Self::Title
        } else if msg.contains("movies.description") {
            Self::Description
        } else if msg.contains("movies.poster_url") {
            Self::PosterUrl
        } else {
            Self::Unknown
        }
    }

    fn message(&self, title: &str) -> String {
        match self {
            Self::Title => format!("{title} is already in your list"),
            Self::Description => {
                format!("{title} has the same description as a movie already in your list")
            },
            Self::PosterUrl => {
                format!("{title} has the same poster as a movie already in your list")
            },
            Self::Unknown => format!("{title} clashes with a movie already in your list"),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Every entry ordered by ascending rating. Unrated entries sort first; ties
    /// fall back to insertion order.
    pub async fn list_all(&self) -> StoreResult<Vec<Movie>> {
        let movies = movie::Entity::find()
            .order_by_asc(movie::Column::Rating)
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?;
        Ok(movies)
    }

    pub async fn get(&self, id: i32) -> StoreResult<Movie> {
        movie::Entity::find_by_id(id).one(&self.db).await?.ok_or(StoreError::NotFound(id))
    }

    pub async fn insert(&self, new: NewMovie) -> StoreResult<Movie> {
        let title = new.title.clone();
        let model = movie::ActiveModel {
            id: Default::default(),
            title: Set(new.title),
            year: Set(new.year),
            description: Set(new.description),
            rating: Set(None),
            ranking: Set(None),
            review: Set(None),
            poster_url: Set(new.poster_url),
        };

        let movie = model.insert(&self.db).await.map_err(|err| match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                StoreError::Duplicate { title, field: UniqueField::from_constraint_message(&msg) }
            },
            _ => StoreError::Database(err),
        })?;
        debug!(id = movie.id, title = %movie.title, "inserted movie");
        Ok(movie)
    }

    pub async fn update_review(&self, id: i32, rating: f64, review: &str) -> StoreResult<()> {
        let res = movie::Entity::update_many()
            .col_expr(movie::Column::Rating, Expr::value(rating))
            .col_expr(movie::Column::Review, Expr::value(review.to_string()))
            .filter(movie::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if res.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(id = id, rating = rating, "updated review");
        Ok(())
    }

    pub async fn set_ranking(&self, id: i32, ranking: i32) -> StoreResult<()> {
        let res = movie::Entity::update_many()
            .col_expr(movie::Column::Ranking, Expr::value(ranking))
            .filter(movie::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if res.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    /// Removes the entry and hands back what was stored.
    pub async fn delete(&self, id: i32) -> StoreResult<Movie> {
        let movie = self.get(id).await?;
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(id = id, title = %movie.title, "deleted movie");
        Ok(movie)
    }
}
