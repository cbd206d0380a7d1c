use axum::http::StatusCode;
use maud::{DOCTYPE, Markup, html};

use crate::{
    forms::{AddForm, EditForm, FieldErrors, FieldRule},
    models::{Movie, SearchCandidate},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn index_page(movies: &[Movie], flash: Option<&str>) -> String {
    page(
        "My Top Movies",
        html! {
            div class="max-w-5xl mx-auto px-6 py-12" {
                div class="flex items-end justify-between gap-6" {
                    div {
                        h1 class="text-3xl font-bold text-gray-900" { "My Top Movies" }
                        p class="mt-2 text-gray-600" { "These are my all-time favourite movies." }
                    }
                    a class="rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" href="/add" { "Add Movie" }
                }

                @if let Some(message) = flash {
                    div class="mt-6 rounded-md bg-green-50 border border-green-200 px-4 py-3 text-green-800" { (message) }
                }

                @if movies.is_empty() {
                    div class="mt-10 bg-white shadow rounded-lg p-8" {
                        p class="text-gray-600" { "Nothing here yet. Add a movie to start your list." }
                    }
                } @else {
                    div class="mt-10 grid gap-6 md:grid-cols-2" {
                        @for movie in movies {
                            (movie_card(movie))
                        }
                    }
                }
            }
        },
    )
}

pub fn add_page(form: &AddForm, errors: &FieldErrors) -> String {
    form_page(
        "Add a Movie",
        None,
        "/add",
        AddForm::FIELDS.iter().map(|rule| (rule, form.new_movie.as_str())),
        errors,
        AddForm::SUBMIT,
    )
}

pub fn edit_page(id: i32, title: &str, form: &EditForm, errors: &FieldErrors) -> String {
    form_page(
        "Edit Movie Rating",
        Some(title),
        &edit_url(id, title),
        EditForm::FIELDS.iter().map(|rule| (rule, form.value(rule.name))),
        errors,
        EditForm::SUBMIT,
    )
}

pub fn select_page(query: &str, candidates: &[SearchCandidate]) -> String {
    page(
        "Select Movie",
        html! {
            div class="max-w-2xl mx-auto px-6 py-12" {
                div class="bg-white shadow rounded-lg p-8" {
                    h1 class="text-2xl font-bold text-gray-900" { "Select Movie" }
                    p class="mt-2 text-gray-600" { "Results for \u{201c}" (query) "\u{201d}" }

                    @if candidates.is_empty() {
                        p class="mt-6 text-gray-600" { "No movies matched that title." }
                    } @else {
                        ul class="mt-6 divide-y divide-gray-200" {
                            @for candidate in candidates {
                                li class="py-3" {
                                    a class="text-blue-600 hover:text-blue-800" href=(format!("/get_info?id={}", candidate.id)) {
                                        (candidate.title)
                                        @if let Some(year) = candidate.release_year() {
                                            span class="ml-2 text-gray-500" { "(" (year) ")" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    a class="mt-6 inline-block text-sm text-blue-600 hover:text-blue-800" href="/add" { "Search again" }
                }
            }
        },
    )
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error " (status.as_u16()) }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back to the list" }
                    }
                }
            }
        },
    )
}

pub fn edit_url(id: i32, title: &str) -> String {
    format!("/update?id={}&title={}", id, urlencoding::encode(title))
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body class="bg-gray-50" { (body) }
        }
    }
    .into_string()
}

fn form_page<'a>(
    heading: &str,
    subject: Option<&str>,
    action: &str,
    fields: impl Iterator<Item = (&'a FieldRule, &'a str)>,
    errors: &FieldErrors,
    submit: &str,
) -> String {
    page(
        heading,
        html! {
            div class="max-w-xl mx-auto px-6 py-12" {
                div class="bg-white shadow rounded-lg p-8" {
                    h1 class="text-2xl font-bold text-gray-900" { (heading) }
                    @if let Some(subject) = subject {
                        p class="mt-2 text-gray-600" { (subject) }
                    }
                    form class="mt-8 space-y-6" method="post" action=(action) novalidate {
                        @for (rule, value) in fields {
                            (form_field(rule, value, errors.get(rule.name)))
                        }
                        button class="w-full rounded-md bg-blue-600 px-4 py-2 font-semibold text-white hover:bg-blue-700" type="submit" { (submit) }
                    }
                }
            }
        },
    )
}

fn form_field(rule: &FieldRule, value: &str, error: Option<&str>) -> Markup {
    let border = if error.is_some() { "border-red-500" } else { "border-gray-300" };
    html! {
        div {
            label class="block text-sm font-medium text-gray-700" for=(rule.name) { (rule.label) }
            input class=(format!("mt-2 w-full rounded-md border {border} px-3 py-2 focus:border-blue-500 focus:outline-none"))
                name=(rule.name) id=(rule.name) value=(value) required[rule.required]
                maxlength=[rule.max_len];
            @if let Some(error) = error {
                p class="mt-2 text-sm text-red-600" { (error) }
            }
        }
    }
}

fn movie_card(movie: &Movie) -> Markup {
    html! {
        div class="bg-white shadow rounded-lg overflow-hidden flex" {
            img class="w-32 object-cover" src=(movie.poster_url) alt=(format!("{} poster", movie.title));
            div class="p-6 flex-1" {
                div class="flex items-start justify-between gap-4" {
                    h2 class="text-xl font-semibold text-gray-900" {
                        (movie.title)
                        span class="ml-2 font-normal text-gray-500" { "(" (movie.year) ")" }
                    }
                    @if let Some(ranking) = movie.ranking {
                        span class="text-3xl font-bold text-gray-300" { "#" (ranking) }
                    }
                }
                p class="mt-2 text-sm text-gray-700" {
                    @match movie.rating {
                        Some(rating) => { "Rating: " (rating) "/10" },
                        None => { "Not rated yet" },
                    }
                }
                @if let Some(review) = &movie.review {
                    p class="mt-1 text-sm italic text-gray-600" { "\u{201c}" (review) "\u{201d}" }
                }
                p class="mt-3 text-sm text-gray-500" { (movie.description) }
                div class="mt-4 flex gap-4 text-sm" {
                    a class="text-blue-600 hover:text-blue-800" href=(edit_url(movie.id, &movie.title)) { "Update" }
                    a class="text-red-600 hover:text-red-800" href=(format!("/delete?card_id={}", movie.id)) { "Delete" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_url_escapes_title() {
        assert_eq!(edit_url(4, "Amélie & Co"), "/update?id=4&title=Am%C3%A9lie%20%26%20Co");
    }

    #[test]
    fn form_errors_render_next_to_fields() {
        let mut errors = FieldErrors::default();
        errors.insert("review", "This field is required.");
        let form = EditForm { rating: "8".to_string(), review: String::new() };

        let html = edit_page(3, "Heat", &form, &errors);
        assert!(html.contains("This field is required."));
        assert!(html.contains(r#"value="8""#));
        assert!(html.contains("Your Rating Out of 10 e.g. 7.5"));
    }

    #[test]
    fn markup_is_escaped() {
        let html = error_page(StatusCode::NOT_FOUND, "<script>alert(1)</script>");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
