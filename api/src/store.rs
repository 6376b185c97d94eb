//! Load/write orchestration over a data source.
//!
//! Every successful write is followed by exactly one full reload. Nothing is
//! patched locally, so the caller never holds a state older than the last
//! confirmed write.

use crate::client::{ApiError, ApiResult, LeagueApi};
use crate::{League, MatchFields, MatchStatus, seed};
use std::fmt;

#[derive(Debug, Clone)]
pub enum DataSource {
    /// Static snapshot; rejects writes.
    Seed,
    Remote(LeagueApi),
}

/// A single admin write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreateTeam { name: String },
    UpdateTeam { id: u64, name: String },
    DeleteTeam { id: u64 },
    CreateMatch { fields: MatchFields },
    UpdateMatch { id: u64, fields: MatchFields },
    DeleteMatch { id: u64 },
    ChangeStatus { id: u64, status: MatchStatus },
    /// `None` scores are fields that did not parse as integers.
    RecordScore { id: u64, home: Option<i64>, away: Option<i64> },
}

impl Mutation {
    /// Short past-tense summary for the status line.
    pub fn describe(&self) -> String {
        match self {
            Mutation::CreateTeam { name } => format!("Team \"{name}\" created"),
            Mutation::UpdateTeam { name, .. } => format!("Team \"{name}\" saved"),
            Mutation::DeleteTeam { id } => format!("Team #{id} deleted"),
            Mutation::CreateMatch { fields } => {
                format!("Match {} vs {} created", fields.home_team, fields.away_team)
            }
            Mutation::UpdateMatch { id, .. } => format!("Match #{id} saved"),
            Mutation::DeleteMatch { id } => format!("Match #{id} deleted"),
            Mutation::ChangeStatus { id, status } => {
                format!("Match #{id} set to {}", status.as_str())
            }
            Mutation::RecordScore { id, .. } => format!("Score recorded for match #{id}"),
        }
    }
}

#[derive(Debug)]
pub enum CommitError {
    /// The write itself failed; nothing changed.
    Mutation(ApiError),
    /// The write went through but the follow-up load did not.
    Reload(ApiError),
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitError::Mutation(e) => write!(f, "{e}"),
            CommitError::Reload(e) => write!(f, "saved, but reload failed: {e}"),
        }
    }
}

impl std::error::Error for CommitError {}

#[derive(Debug, Clone)]
pub struct LeagueStore {
    source: DataSource,
}

impl LeagueStore {
    pub fn new(source: DataSource) -> Self {
        Self { source }
    }

    pub async fn load(&self) -> ApiResult<League> {
        match &self.source {
            DataSource::Seed => Ok(seed::seed_league()),
            DataSource::Remote(api) => api.fetch_league().await,
        }
    }

    pub async fn create(&self, mutation: &Mutation) -> ApiResult<()> {
        let api = self.writable()?;
        match mutation {
            Mutation::CreateTeam { name } => api.create_team(name).await,
            Mutation::CreateMatch { fields } => api.create_match(fields).await,
            other => Err(ApiError::Other(format!("not a create: {other:?}"))),
        }
    }

    pub async fn update(&self, mutation: &Mutation) -> ApiResult<()> {
        let api = self.writable()?;
        match mutation {
            Mutation::UpdateTeam { id, name } => api.update_team(*id, name).await,
            Mutation::UpdateMatch { id, fields } => api.update_match(*id, fields).await,
            Mutation::ChangeStatus { id, status } => api.change_match_status(*id, *status).await,
            Mutation::RecordScore { id, home, away } => api.record_score(*id, *home, *away).await,
            other => Err(ApiError::Other(format!("not an update: {other:?}"))),
        }
    }

    pub async fn remove(&self, mutation: &Mutation) -> ApiResult<()> {
        let api = self.writable()?;
        match mutation {
            Mutation::DeleteTeam { id } => api.delete_team(*id).await,
            Mutation::DeleteMatch { id } => api.delete_match(*id).await,
            other => Err(ApiError::Other(format!("not a delete: {other:?}"))),
        }
    }

    /// Apply one write, then reload everything once.
    pub async fn commit(&self, mutation: &Mutation) -> Result<League, CommitError> {
        let written = match mutation {
            Mutation::CreateTeam { .. } | Mutation::CreateMatch { .. } => self.create(mutation).await,
            Mutation::DeleteTeam { .. } | Mutation::DeleteMatch { .. } => self.remove(mutation).await,
            _ => self.update(mutation).await,
        };
        written.map_err(CommitError::Mutation)?;
        self.load().await.map_err(CommitError::Reload)
    }

    fn writable(&self) -> ApiResult<&LeagueApi> {
        match &self.source {
            DataSource::Remote(api) => Ok(api),
            DataSource::Seed => Err(ApiError::ReadOnly("built-in league data cannot be edited".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Endpoints;
    use mockito::{Matcher, Mock, Server};
    use serde_json::json;

    fn remote(server: &Server) -> LeagueStore {
        LeagueStore::new(DataSource::Remote(LeagueApi::new(Endpoints::new(&server.url())).unwrap()))
    }

    async fn expect_reload(server: &mut Server, teams: &str, matches: &str) -> (Mock, Mock) {
        let t = server
            .mock("GET", "/teams")
            .with_header("content-type", "application/json")
            .with_body(teams)
            .expect(1)
            .create_async()
            .await;
        let m = server
            .mock("GET", "/matches")
            .with_header("content-type", "application/json")
            .with_body(matches)
            .expect(1)
            .create_async()
            .await;
        (t, m)
    }

    #[tokio::test]
    async fn seed_source_loads_and_rejects_writes() {
        let store = LeagueStore::new(DataSource::Seed);
        assert_eq!(store.load().await.unwrap().teams.len(), 8);

        let err = store
            .commit(&Mutation::CreateTeam { name: "Meteors II".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, CommitError::Mutation(ApiError::ReadOnly(_))));
    }

    #[tokio::test]
    async fn commit_reloads_exactly_once() {
        let mut server = Server::new_async().await;
        let create = server
            .mock("POST", "/teams")
            .match_body(Matcher::Json(json!({"name": "Ice Bears"})))
            .with_status(201)
            .create_async()
            .await;
        let (teams, matches) =
            expect_reload(&mut server, r#"[{"id":1,"name":"Ice Bears"}]"#, "[]").await;

        let league = remote(&server)
            .commit(&Mutation::CreateTeam { name: "Ice Bears".into() })
            .await
            .unwrap();

        assert_eq!(league.teams[0].name, "Ice Bears");
        create.assert_async().await;
        teams.assert_async().await;
        matches.assert_async().await;
    }

    #[tokio::test]
    async fn failed_write_skips_reload() {
        let mut server = Server::new_async().await;
        let _update = server.mock("PUT", "/teams/2").with_status(500).create_async().await;
        let teams = server.mock("GET", "/teams").expect(0).create_async().await;

        let err = remote(&server)
            .commit(&Mutation::UpdateTeam { id: 2, name: "x".into() })
            .await
            .unwrap_err();

        assert!(matches!(err, CommitError::Mutation(_)));
        teams.assert_async().await;
    }

    #[tokio::test]
    async fn reload_failure_after_write_is_reported_separately() {
        let mut server = Server::new_async().await;
        let _delete = server.mock("DELETE", "/teams/2").create_async().await;
        let _teams = server.mock("GET", "/teams").with_status(502).create_async().await;
        let _matches = server.mock("GET", "/matches").with_body("[]").create_async().await;

        let err = remote(&server).commit(&Mutation::DeleteTeam { id: 2 }).await.unwrap_err();
        assert!(matches!(err, CommitError::Reload(_)));
        assert!(err.to_string().starts_with("saved, but reload failed"));
    }

    #[tokio::test]
    async fn deleting_absent_team_reloads_without_it() {
        let mut server = Server::new_async().await;
        let _delete = server.mock("DELETE", "/teams/99").with_status(404).create_async().await;
        let _reload = expect_reload(&mut server, r#"[{"id":1,"name":"Meteors"}]"#, "[]").await;

        let league = remote(&server).commit(&Mutation::DeleteTeam { id: 99 }).await.unwrap();
        assert!(!league.teams.iter().any(|t| t.id == 99));
        assert_eq!(league.teams.len(), 1);
    }

    #[tokio::test]
    async fn score_entry_finishes_match_after_reload() {
        let mut server = Server::new_async().await;
        let score = server
            .mock("PUT", "/matches")
            .match_body(Matcher::Json(json!({
                "matchId": 5,
                "homeScore": 3,
                "awayScore": 1,
                "status": "finished"
            })))
            .create_async()
            .await;
        let _reload = expect_reload(
            &mut server,
            "[]",
            r#"[{"id":5,"homeTeam":"A","awayTeam":"B","date":"2025-10-28","time":"19:00","status":"finished","score":"3:1"}]"#,
        )
        .await;

        let league = remote(&server)
            .commit(&Mutation::RecordScore { id: 5, home: Some(3), away: Some(1) })
            .await
            .unwrap();

        let m = league.matches.iter().find(|m| m.id == 5).unwrap();
        assert_eq!(m.status, MatchStatus::Finished);
        assert_eq!(m.score.as_deref(), Some("3:1"));
        score.assert_async().await;
    }

    #[tokio::test]
    async fn status_change_is_sent_unconditionally() {
        let mut server = Server::new_async().await;
        let status = server
            .mock("PUT", "/admin/matches/3/status")
            .match_body(Matcher::Json(json!({"status": "live"})))
            .create_async()
            .await;
        let _reload = expect_reload(
            &mut server,
            "[]",
            r#"[{"id":3,"homeTeam":"A","awayTeam":"B","date":"d","time":"t","status":"live"}]"#,
        )
        .await;

        let league = remote(&server)
            .commit(&Mutation::ChangeStatus { id: 3, status: MatchStatus::Live })
            .await
            .unwrap();
        assert!(league.matches.iter().find(|m| m.id == 3).unwrap().is_live());
        status.assert_async().await;
    }

    #[tokio::test]
    async fn create_rejects_non_create_mutations() {
        let server = Server::new_async().await;
        let err = remote(&server).create(&Mutation::DeleteMatch { id: 1 }).await.unwrap_err();
        assert!(matches!(err, ApiError::Other(_)));
    }

    #[test]
    fn describe_names_the_target() {
        let m = Mutation::ChangeStatus { id: 4, status: MatchStatus::Finished };
        assert_eq!(m.describe(), "Match #4 set to finished");
    }
}
