use crate::wire::{self, ScoreBody, StatusBody, TeamBody};
use crate::{League, Match, MatchFields, MatchStatus, Team};
use futures_util::future::try_join;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const USER_AGENT: &str = concat!("phltui/", env!("CARGO_PKG_VERSION"));

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    Decode(serde_json::Error, String),
    Setup(reqwest::Error),
    ReadOnly(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Decode(e, url) => write!(f, "Unexpected data from {url}: {e}"),
            ApiError::Setup(e) => write!(f, "Could not build HTTP client: {e}"),
            ApiError::ReadOnly(msg) => write!(f, "Read-only data source: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// How admin URLs are spelled. The deployed admin function routes on a
/// `path` query parameter; the documented contract uses path segments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminRouting {
    #[default]
    PathSegments,
    QueryParam,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub read_base: String,
    pub admin_base: String,
    pub scores_url: String,
    pub routing: AdminRouting,
}

#[derive(Debug, Clone, Copy)]
enum AdminPath {
    Teams,
    Team(u64),
    Matches,
    Match(u64),
    MatchStatus(u64),
}

impl Endpoints {
    /// Everything served from one base: admin shares it, scores go to `/matches`.
    pub fn new(read_base: &str) -> Self {
        let read_base = read_base.trim_end_matches('/').to_string();
        Self {
            admin_base: read_base.clone(),
            scores_url: format!("{read_base}/matches"),
            read_base,
            routing: AdminRouting::default(),
        }
    }

    pub fn teams_url(&self) -> String {
        format!("{}/teams", self.read_base)
    }

    pub fn matches_url(&self) -> String {
        format!("{}/matches", self.read_base)
    }

    fn admin_url(&self, path: AdminPath) -> String {
        let base = self.admin_base.trim_end_matches('/');
        match self.routing {
            AdminRouting::PathSegments => match path {
                AdminPath::Teams => format!("{base}/teams"),
                AdminPath::Team(id) => format!("{base}/teams/{id}"),
                AdminPath::Matches => format!("{base}/admin/matches"),
                AdminPath::Match(id) => format!("{base}/admin/matches/{id}"),
                AdminPath::MatchStatus(id) => format!("{base}/admin/matches/{id}/status"),
            },
            AdminRouting::QueryParam => match path {
                AdminPath::Teams => format!("{base}?path=teams"),
                AdminPath::Team(id) => format!("{base}?path=teams/{id}"),
                AdminPath::Matches => format!("{base}?path=matches"),
                AdminPath::Match(id) => format!("{base}?path=matches/{id}"),
                AdminPath::MatchStatus(id) => format!("{base}?path=matches/{id}/status"),
            },
        }
    }
}

/// League API client. Reads come from `read_base`, writes from `admin_base`,
/// final scores from `scores_url`.
#[derive(Debug, Clone)]
pub struct LeagueApi {
    client: Client,
    timeout: Duration,
    endpoints: Endpoints,
}

impl LeagueApi {
    pub fn new(endpoints: Endpoints) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApiError::Setup)?;
        Ok(Self {
            client,
            timeout: Duration::from_secs(10),
            endpoints,
        })
    }

    /// Fetch teams and matches concurrently. Either one failing fails the
    /// whole load; there is no partial result.
    pub async fn fetch_league(&self) -> ApiResult<League> {
        let (teams, matches) = try_join(self.fetch_teams(), self.fetch_matches()).await?;
        Ok(League { teams, matches })
    }

    pub async fn fetch_teams(&self) -> ApiResult<Vec<Team>> {
        self.get_listing(&self.endpoints.teams_url()).await
    }

    pub async fn fetch_matches(&self) -> ApiResult<Vec<Match>> {
        self.get_listing(&self.endpoints.matches_url()).await
    }

    pub async fn create_team(&self, name: &str) -> ApiResult<()> {
        let url = self.endpoints.admin_url(AdminPath::Teams);
        self.send(Method::POST, &url, &TeamBody { name }).await
    }

    pub async fn update_team(&self, id: u64, name: &str) -> ApiResult<()> {
        let url = self.endpoints.admin_url(AdminPath::Team(id));
        self.send(Method::PUT, &url, &TeamBody { name }).await
    }

    pub async fn delete_team(&self, id: u64) -> ApiResult<()> {
        self.delete(&self.endpoints.admin_url(AdminPath::Team(id))).await
    }

    pub async fn create_match(&self, fields: &MatchFields) -> ApiResult<()> {
        let url = self.endpoints.admin_url(AdminPath::Matches);
        self.send(Method::POST, &url, fields).await
    }

    pub async fn update_match(&self, id: u64, fields: &MatchFields) -> ApiResult<()> {
        let url = self.endpoints.admin_url(AdminPath::Match(id));
        self.send(Method::PUT, &url, fields).await
    }

    pub async fn delete_match(&self, id: u64) -> ApiResult<()> {
        self.delete(&self.endpoints.admin_url(AdminPath::Match(id))).await
    }

    /// No transition check on this side; the status selector accepts anything.
    pub async fn change_match_status(&self, id: u64, status: MatchStatus) -> ApiResult<()> {
        let url = self.endpoints.admin_url(AdminPath::MatchStatus(id));
        self.send(Method::PUT, &url, &StatusBody { status }).await
    }

    /// Record a final score. The server flips the match to finished.
    pub async fn record_score(
        &self,
        id: u64,
        home: Option<i64>,
        away: Option<i64>,
    ) -> ApiResult<()> {
        let body = ScoreBody {
            match_id: id,
            home_score: home,
            away_score: away,
            status: MatchStatus::Finished,
        };
        let url = self.endpoints.scores_url.clone();
        self.send(Method::PUT, &url, &body).await
    }

    async fn get_listing<T: DeserializeOwned>(&self, url: &str) -> ApiResult<Vec<T>> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        let value = response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))?;

        wire::listing(value).map_err(|e| ApiError::Decode(e, url.to_owned()))
    }

    async fn send<B: Serialize + ?Sized>(&self, method: Method, url: &str, body: &B) -> ApiResult<()> {
        let response = self
            .client
            .request(method, url)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        response
            .error_for_status()
            .map(|_| ())
            .map_err(|e| ApiError::Api(e, url.to_owned()))
    }

    async fn delete(&self, url: &str) -> ApiResult<()> {
        let response = self
            .client
            .delete(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        // Already gone is as good as deleted.
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        response
            .error_for_status()
            .map(|_| ())
            .map_err(|e| ApiError::Api(e, url.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn api_for(server: &Server) -> LeagueApi {
        LeagueApi::new(Endpoints::new(&server.url())).unwrap()
    }

    #[test]
    fn path_segment_routing() {
        let endpoints = Endpoints::new("https://league.test/api/");
        assert_eq!(endpoints.teams_url(), "https://league.test/api/teams");
        assert_eq!(endpoints.scores_url, "https://league.test/api/matches");
        assert_eq!(endpoints.admin_url(AdminPath::Team(5)), "https://league.test/api/teams/5");
        assert_eq!(
            endpoints.admin_url(AdminPath::MatchStatus(9)),
            "https://league.test/api/admin/matches/9/status"
        );
    }

    #[test]
    fn query_param_routing() {
        let mut endpoints = Endpoints::new("https://fn.test/admin");
        endpoints.routing = AdminRouting::QueryParam;
        assert_eq!(endpoints.admin_url(AdminPath::Teams), "https://fn.test/admin?path=teams");
        assert_eq!(endpoints.admin_url(AdminPath::Match(3)), "https://fn.test/admin?path=matches/3");
        assert_eq!(
            endpoints.admin_url(AdminPath::MatchStatus(3)),
            "https://fn.test/admin?path=matches/3/status"
        );
    }

    #[tokio::test]
    async fn fetch_league_keeps_server_order() {
        let mut server = Server::new_async().await;
        let teams = server
            .mock("GET", "/teams")
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":2,"name":"Steel Sharks","points":9},{"id":1,"name":"Meteors","points":30}]"#)
            .create_async()
            .await;
        let matches = server
            .mock("GET", "/matches")
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"id":1,"homeTeam":"Meteors","awayTeam":"Steel Sharks","date":"2025-10-28","time":"19:00","status":"live","score":"2:1"}]"#,
            )
            .create_async()
            .await;

        let league = api_for(&server).fetch_league().await.unwrap();
        let names: Vec<&str> = league.teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Steel Sharks", "Meteors"]);
        assert_eq!(league.matches[0].status, MatchStatus::Live);
        teams.assert_async().await;
        matches.assert_async().await;
    }

    #[tokio::test]
    async fn requests_identify_the_client() {
        let mut server = Server::new_async().await;
        let teams = server
            .mock("GET", "/teams")
            .match_header("user-agent", Matcher::Regex("^phltui/".into()))
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let listed = api_for(&server).fetch_teams().await.unwrap();
        assert!(listed.is_empty());
        teams.assert_async().await;
    }

    #[tokio::test]
    async fn fetch_league_fails_when_either_request_fails() {
        let mut server = Server::new_async().await;
        let _teams = server
            .mock("GET", "/teams")
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        let _matches = server.mock("GET", "/matches").with_status(500).create_async().await;

        let err = api_for(&server).fetch_league().await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)));
    }

    #[tokio::test]
    async fn error_object_listing_reads_as_empty() {
        let mut server = Server::new_async().await;
        let _teams = server
            .mock("GET", "/teams")
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"Not found"}"#)
            .create_async()
            .await;

        let teams = api_for(&server).fetch_teams().await.unwrap();
        assert!(teams.is_empty());
    }

    #[tokio::test]
    async fn invalid_json_is_a_parse_error() {
        let mut server = Server::new_async().await;
        let _matches = server.mock("GET", "/matches").with_body("<html>").create_async().await;

        let err = api_for(&server).fetch_matches().await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(_, _)));
    }

    #[tokio::test]
    async fn create_team_posts_name() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/teams")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"name": "Ice Bears"})))
            .with_status(201)
            .with_body(r#"{"id":9,"name":"Ice Bears"}"#)
            .create_async()
            .await;

        api_for(&server).create_team("Ice Bears").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejected_update_is_an_api_error() {
        let mut server = Server::new_async().await;
        let _update = server
            .mock("PUT", "/teams/3")
            .with_status(400)
            .with_body(r#"{"error":"Name is required"}"#)
            .create_async()
            .await;

        let err = api_for(&server).update_team(3, "x").await.unwrap_err();
        assert!(matches!(err, ApiError::Api(_, _)));
    }

    #[tokio::test]
    async fn delete_of_missing_entity_succeeds() {
        let mut server = Server::new_async().await;
        let mock = server.mock("DELETE", "/admin/matches/42").with_status(404).create_async().await;

        api_for(&server).delete_match(42).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn match_update_sends_all_fields() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/admin/matches/4")
            .match_body(Matcher::Json(json!({
                "homeTeam": "Meteors",
                "awayTeam": "Northern Lights",
                "date": "2025-10-26",
                "time": "19:00",
                "twitchChannel": ""
            })))
            .with_body(r#"{"id":4}"#)
            .create_async()
            .await;

        let fields = MatchFields {
            home_team: "Meteors".into(),
            away_team: "Northern Lights".into(),
            date: "2025-10-26".into(),
            time: "19:00".into(),
            twitch_channel: String::new(),
        };
        api_for(&server).update_match(4, &fields).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn status_change_uses_query_routing_when_configured() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/")
            .match_query(Matcher::UrlEncoded("path".into(), "matches/7/status".into()))
            .match_body(Matcher::Json(json!({"status": "live"})))
            .with_body(r#"{"id":7,"status":"live"}"#)
            .create_async()
            .await;

        let mut endpoints = Endpoints::new(&server.url());
        endpoints.routing = AdminRouting::QueryParam;
        LeagueApi::new(endpoints)
            .unwrap()
            .change_match_status(7, MatchStatus::Live)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn record_score_marks_finished() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/matches")
            .match_body(Matcher::Json(json!({
                "matchId": 1,
                "homeScore": 3,
                "awayScore": null,
                "status": "finished"
            })))
            .with_body(r#"{"success":true,"matchId":1}"#)
            .create_async()
            .await;

        api_for(&server).record_score(1, Some(3), None).await.unwrap();
        mock.assert_async().await;
    }
}
