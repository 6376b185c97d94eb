use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use phl_api::League;
use phl_api::store::Mutation;

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRequest {
    LoadLeague,
    /// Write, then reload the whole league once.
    Commit(Mutation),
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    LeagueLoaded { league: League },
    LoadFailed { message: String },
    MutationCommitted { mutation: Mutation, league: League },
    MutationFailed { mutation: Mutation, message: String },
    /// The write landed but the follow-up load did not.
    ReloadFailed { mutation: Mutation, message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    Tick,
}
