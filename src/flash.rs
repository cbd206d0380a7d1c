use axum_extra::extract::cookie::SignedCookieJar;
use cookie::{Cookie, SameSite};

const FLASH_COOKIE: &str = "flash";

/// Queues a one-shot message for the next page that calls [`take`].
pub fn set(jar: SignedCookieJar, message: &str) -> SignedCookieJar {
    let cookie = Cookie::build((FLASH_COOKIE, urlencoding::encode(message).into_owned()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::minutes(5));
    jar.add(cookie)
}

pub fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<String>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };
    let message = urlencoding::decode(cookie.value()).map(|m| m.into_owned()).ok();
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), message)
}
