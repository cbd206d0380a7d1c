use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use serde::Deserialize;
use tracing::info;

use crate::{
    AppState,
    error::AppResult,
    flash,
    forms::{AddForm, EditForm, FieldErrors},
    ranking, templates,
};

pub async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<(SignedCookieJar, Html<String>)> {
    let movies = ranking::refresh(&state.store).await?;
    let (jar, message) = flash::take(jar);
    Ok((jar, Html(templates::index_page(&movies, message.as_deref()))))
}

pub async fn add_form() -> Html<String> {
    Html(templates::add_page(&AddForm::default(), &FieldErrors::default()))
}

pub async fn add_search(
    State(state): State<AppState>,
    Form(form): Form<AddForm>,
) -> AppResult<Response> {
    let query = match form.validate() {
        Ok(query) => query,
        Err(errors) => {
            let page = templates::add_page(&form, &errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
        },
    };

    let candidates = state.tmdb.search_movies(&query).await?;
    Ok(Html(templates::select_page(&query, &candidates)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct GetInfoQuery {
    id: i64,
}

pub async fn get_info(
    State(state): State<AppState>,
    Query(q): Query<GetInfoQuery>,
) -> AppResult<Redirect> {
    let new_movie = state.tmdb.movie_details(q.id).await?;
    let movie = state.store.insert(new_movie).await?;
    info!(id = movie.id, catalog_id = q.id, title = %movie.title, "added movie");
    Ok(Redirect::to(&templates::edit_url(movie.id, &movie.title)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuery {
    id: i32,
    title: Option<String>,
}

impl UpdateQuery {
    fn display_title(&self) -> Option<&str> {
        self.title.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

pub async fn edit_form(
    State(state): State<AppState>,
    Query(q): Query<UpdateQuery>,
) -> AppResult<Html<String>> {
    let movie = state.store.get(q.id).await?;
    let title = q.display_title().unwrap_or(&movie.title);
    let form = EditForm {
        rating: movie.rating.map(|r| r.to_string()).unwrap_or_default(),
        review: movie.review.clone().unwrap_or_default(),
    };
    Ok(Html(templates::edit_page(movie.id, title, &form, &FieldErrors::default())))
}

pub async fn edit_submit(
    State(state): State<AppState>,
    Query(q): Query<UpdateQuery>,
    jar: SignedCookieJar,
    Form(form): Form<EditForm>,
) -> AppResult<Response> {
    let movie = state.store.get(q.id).await?;
    let title = q.display_title().unwrap_or(&movie.title);

    let edit = match form.validate() {
        Ok(edit) => edit,
        Err(errors) => {
            let page = templates::edit_page(movie.id, title, &form, &errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
        },
    };

    state.store.update_review(movie.id, edit.rating, &edit.review).await?;
    info!(id = movie.id, rating = edit.rating, "rated movie");

    let jar = flash::set(jar, &format!("Saved your review of {title}."));
    Ok((jar, Redirect::to("/")).into_response())
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    card_id: i32,
}

pub async fn delete(
    State(state): State<AppState>,
    Query(q): Query<DeleteQuery>,
    jar: SignedCookieJar,
) -> AppResult<(SignedCookieJar, Redirect)> {
    let movie = state.store.delete(q.card_id).await?;
    info!(id = movie.id, title = %movie.title, "deleted movie");
    let jar = flash::set(jar, &format!("Removed {} from your list.", movie.title));
    Ok((jar, Redirect::to("/")))
}
