use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error};
use phl_api::store::{CommitError, LeagueStore, Mutation};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Runs requests one at a time, so two writes never overlap.
pub struct NetworkWorker {
    store: LeagueStore,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        store: LeagueStore,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            store,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let response = match request {
                NetworkRequest::LoadLeague => self.handle_load().await,
                NetworkRequest::Commit(mutation) => self.handle_commit(mutation).await,
            };

            debug!("network request complete");
            self.stop_loading_animation(is_success(&response)).await;

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load(&self) -> NetworkResponse {
        debug!("loading teams and matches");
        match self.store.load().await {
            Ok(league) => {
                debug!("loaded {} teams, {} matches", league.teams.len(), league.matches.len());
                NetworkResponse::LeagueLoaded { league }
            }
            Err(e) => {
                error!("league load failed: {e}");
                NetworkResponse::LoadFailed { message: e.to_string() }
            }
        }
    }

    async fn handle_commit(&self, mutation: Mutation) -> NetworkResponse {
        debug!("committing {mutation:?}");
        match self.store.commit(&mutation).await {
            Ok(league) => NetworkResponse::MutationCommitted { mutation, league },
            Err(CommitError::Mutation(e)) => {
                error!("{} failed: {e}", mutation.describe());
                NetworkResponse::MutationFailed { mutation, message: e.to_string() }
            }
            Err(e @ CommitError::Reload(_)) => {
                error!("reload after write failed: {e}");
                NetworkResponse::ReloadFailed { mutation, message: e.to_string() }
            }
        }
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

fn is_success(response: &NetworkResponse) -> bool {
    matches!(
        response,
        NetworkResponse::LeagueLoaded { .. } | NetworkResponse::MutationCommitted { .. }
    )
}
