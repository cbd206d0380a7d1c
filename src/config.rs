use std::net::SocketAddr;

use anyhow::{Context, bail};

/// `cookie::Key::derive_from` needs at least this much master key material.
const MIN_SECRET_KEY_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub secret_key: String,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub tmdb_image_base_url: String,
    pub database_url: String,
    pub tmdb_rps: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 =
            lookup("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let secret_key = lookup("SECRET_KEY").context("SECRET_KEY must be set")?;
        if secret_key.len() < MIN_SECRET_KEY_LEN {
            bail!("SECRET_KEY must be at least {MIN_SECRET_KEY_LEN} bytes");
        }

        let tmdb_api_key = lookup("TMDB_API_KEY").context("TMDB_API_KEY must be set")?;
        if tmdb_api_key.trim().is_empty() {
            bail!("TMDB_API_KEY must not be blank");
        }

        let tmdb_base_url =
            lookup("TMDB_BASE_URL").unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());
        let tmdb_image_base_url = lookup("TMDB_IMAGE_BASE_URL")
            .unwrap_or_else(|| "https://image.tmdb.org/t/p/w500".to_string());

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://top_movies.db?mode=rwc".to_string());

        let tmdb_rps: u32 = lookup("TMDB_RPS").and_then(|s| s.parse().ok()).unwrap_or(4);

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            secret_key,
            tmdb_api_key,
            tmdb_base_url,
            tmdb_image_base_url,
            database_url,
            tmdb_rps,
        })
    }
}
