use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::dto::{ActionRequest, CreateGameRequest, ErrorBody, JoinGameRequest, JoinedTable};
use super::error::EngineError;
use crate::table::GameState;

const LOG_TARGET: &str = "client::api";

/// Seam to the rules-engine service. Trait-shaped so the dispatcher can be
/// exercised against a mock in tests.
#[async_trait]
pub trait EngineApi: Send + Sync {
    async fn create_game(&self, request: &CreateGameRequest) -> Result<JoinedTable, EngineError>;

    /// Lookup by id; also the spectator bootstrap.
    async fn fetch_game(&self, game_id: &str) -> Result<GameState, EngineError>;

    async fn join_game(
        &self,
        game_id: &str,
        request: &JoinGameRequest,
    ) -> Result<JoinedTable, EngineError>;

    /// Submit a betting action. The returned snapshot is informational for
    /// the requester only; visible state advances via the push channel.
    async fn submit_action(
        &self,
        game_id: &str,
        request: &ActionRequest,
    ) -> Result<GameState, EngineError>;

    /// Ready signal; the engine accepts it only at showdown.
    async fn deal_next_hand(&self, game_id: &str) -> Result<GameState, EngineError>;

    /// Liveness of the auxiliary automated-opponent subsystem. Probe
    /// failures read as offline, never as an error.
    async fn opponent_service_online(&self) -> bool;
}

#[derive(Clone, Debug)]
pub struct EngineClientConfig {
    pub base_url: Url,
    pub request_timeout: Duration,
    pub probe_timeout: Duration,
}

impl EngineClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            request_timeout: Duration::from_secs(10),
            probe_timeout: Duration::from_secs(2),
        }
    }
}

pub struct HttpEngineClient {
    http: reqwest::Client,
    cfg: EngineClientConfig,
}

impl HttpEngineClient {
    pub fn new(cfg: EngineClientConfig) -> Result<Self, EngineError> {
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .build()?;
        Ok(Self { http, cfg })
    }

    fn endpoint(&self, path: &str) -> Result<Url, EngineError> {
        Ok(self.cfg.base_url.join(path)?)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, EngineError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("engine returned status {status}"),
        };
        Err(EngineError::Rejected(message))
    }
}

#[async_trait]
impl EngineApi for HttpEngineClient {
    async fn create_game(&self, request: &CreateGameRequest) -> Result<JoinedTable, EngineError> {
        let url = self.endpoint("game/new")?;
        debug!(target = LOG_TARGET, %url, players = request.num_players, "creating table");
        let response = self.http.post(url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn fetch_game(&self, game_id: &str) -> Result<GameState, EngineError> {
        let url = self.endpoint(&format!("game/{game_id}"))?;
        let response = self.http.get(url).send().await?;
        Self::decode(response).await
    }

    async fn join_game(
        &self,
        game_id: &str,
        request: &JoinGameRequest,
    ) -> Result<JoinedTable, EngineError> {
        let url = self.endpoint(&format!("game/{game_id}/join"))?;
        debug!(target = LOG_TARGET, %url, "joining table");
        let response = self.http.post(url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn submit_action(
        &self,
        game_id: &str,
        request: &ActionRequest,
    ) -> Result<GameState, EngineError> {
        let url = self.endpoint(&format!("game/{game_id}/action"))?;
        debug!(
            target = LOG_TARGET,
            %url,
            seat = request.player_id,
            action = ?request.action,
            "submitting action"
        );
        let response = self.http.post(url).json(request).send().await?;
        Self::decode(response).await
    }

    async fn deal_next_hand(&self, game_id: &str) -> Result<GameState, EngineError> {
        let url = self.endpoint(&format!("game/{game_id}/deal"))?;
        let response = self.http.post(url).send().await?;
        Self::decode(response).await
    }

    async fn opponent_service_online(&self) -> bool {
        let Ok(url) = self.endpoint("llm/health") else {
            return false;
        };
        match self
            .http
            .get(url)
            .timeout(self.cfg.probe_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!(target = LOG_TARGET, error = %err, "opponent service probe failed");
                false
            }
        }
    }
}
