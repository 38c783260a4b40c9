//! HTTP implementation of the provider boundary.

use super::{Category, DataProvider};
use crate::cli::types::{GameId, Season};
use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use reqwest::Client;
use serde_json::Value;
use tokio::task::JoinSet;

/// Fetches category payloads from the provider over HTTP.
///
/// Every request is bounded by the configured timeout; the two per-game
/// categories fan out one request per known game with bounded concurrency
/// and merge the pages into a single array in game order.
pub struct HttpProvider {
    client: Client,
    base_url: String,
    fetch_concurrency: usize,
}

impl HttpProvider {
    pub fn new(config: &IngestConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("wnba-ingest/", env!("CARGO_PKG_VERSION")))
            .timeout(config.fetch_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            fetch_concurrency: config.fetch_concurrency.max(1),
        })
    }

    async fn fetch_per_game(
        &self,
        category: Category,
        endpoint: &'static str,
        game_ids: &[GameId],
    ) -> Result<Value> {
        let mut pages = Vec::with_capacity(game_ids.len());

        // Chunked fan-out keeps at most `fetch_concurrency` requests in
        // flight; each chunk merges before the next starts.
        for chunk in game_ids.chunks(self.fetch_concurrency) {
            let mut tasks = JoinSet::new();
            for (offset, game_id) in chunk.iter().enumerate() {
                let client = self.client.clone();
                let url = format!("{}/games/{}/{}", self.base_url, game_id, endpoint);
                tasks.spawn(async move { (offset, get_json(&client, category, &url).await) });
            }

            let mut chunk_pages: Vec<Option<Value>> = vec![None; chunk.len()];
            while let Some(joined) = tasks.join_next().await {
                let (offset, page) = joined.map_err(|e| IngestError::Fetch {
                    category,
                    message: format!("fetch task failed: {e}"),
                })?;
                chunk_pages[offset] = Some(page?);
            }
            for page in chunk_pages {
                pages.push(page.ok_or_else(|| IngestError::Fetch {
                    category,
                    message: "fan-out merge is missing a page".to_string(),
                })?);
            }
        }

        Ok(Value::Array(pages))
    }
}

impl DataProvider for HttpProvider {
    async fn fetch(
        &self,
        category: Category,
        season: Season,
        game_ids: &[GameId],
    ) -> Result<Value> {
        match category {
            Category::Teams => {
                let url = format!("{}/teams?season={}", self.base_url, season);
                get_json(&self.client, category, &url).await
            }
            Category::Schedule => {
                let url = format!("{}/schedule?season={}", self.base_url, season);
                get_json(&self.client, category, &url).await
            }
            Category::PlayByPlay => self.fetch_per_game(category, "playbyplay", game_ids).await,
            Category::BoxScore => self.fetch_per_game(category, "boxscore", game_ids).await,
        }
    }
}

async fn get_json(client: &Client, category: Category, url: &str) -> Result<Value> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| IngestError::Fetch {
            category,
            message: e.to_string(),
        })?;

    response.json::<Value>().await.map_err(|e| IngestError::Fetch {
        category,
        message: format!("malformed response body: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::types::Season;
    use std::path::PathBuf;

    fn test_config() -> IngestConfig {
        IngestConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            season: Season::default(),
            db_path: PathBuf::from("/tmp/league.db"),
            fetch_timeout: std::time::Duration::from_millis(250),
            fetch_concurrency: 4,
        }
    }

    #[test]
    fn test_provider_construction() {
        let provider = HttpProvider::new(&test_config()).unwrap();
        assert_eq!(provider.base_url, "http://127.0.0.1:9");
        assert_eq!(provider.fetch_concurrency, 4);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let mut config = test_config();
        config.fetch_concurrency = 0;
        let provider = HttpProvider::new(&config).unwrap();
        assert_eq!(provider.fetch_concurrency, 1);
    }

    #[tokio::test]
    async fn test_unreachable_host_surfaces_fetch_error() {
        // Port 9 (discard) refuses connections; the fetch must fail with the
        // category attached rather than hang.
        let provider = HttpProvider::new(&test_config()).unwrap();
        let err = provider
            .fetch(Category::Teams, Season::default(), &[])
            .await
            .unwrap_err();

        match err {
            IngestError::Fetch { category, .. } => assert_eq!(category, Category::Teams),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_per_game_fan_out_fails_fast_on_unreachable_host() {
        let provider = HttpProvider::new(&test_config()).unwrap();
        let game_ids: Vec<GameId> = (1..=10).map(GameId::new).collect();
        let err = provider
            .fetch(Category::PlayByPlay, Season::default(), &game_ids)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            IngestError::Fetch {
                category: Category::PlayByPlay,
                ..
            }
        ));
    }
}
