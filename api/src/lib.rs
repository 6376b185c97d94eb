pub mod client;
pub mod seed;
pub mod store;
mod wire;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types, shared by the read and admin endpoints
// ---------------------------------------------------------------------------

/// One load cycle's worth of league data, in server order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct League {
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
}

impl League {
    pub fn is_empty(&self) -> bool {
        self.teams.is_empty() && self.matches.is_empty()
    }

    /// Names offered by the home/away pickers, in standings order.
    pub fn team_names(&self) -> Vec<String> {
        self.teams.iter().map(|t| t.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: u64,
    pub name: String,
    // The admin `/teams` listing only carries id + name.
    #[serde(default)]
    pub games: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub goals_for: u32,
    #[serde(default)]
    pub goals_against: u32,
    #[serde(default)]
    pub points: u32,
}

impl Team {
    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Finished,
}

impl MatchStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "Upcoming",
            MatchStatus::Live => "LIVE",
            MatchStatus::Finished => "Final",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "upcoming",
            MatchStatus::Live => "live",
            MatchStatus::Finished => "finished",
        }
    }

    /// Selector order. Wraps around; legality of the move is the server's call.
    pub fn cycle(self) -> Self {
        match self {
            MatchStatus::Upcoming => MatchStatus::Live,
            MatchStatus::Live => MatchStatus::Finished,
            MatchStatus::Finished => MatchStatus::Upcoming,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: u64,
    pub home_team: String,
    pub away_team: String,
    pub date: String,
    pub time: String,
    pub status: MatchStatus,
    /// Free text, "H:A" when the server filled it in.
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub twitch_channel: Option<String>,
}

impl Match {
    pub fn is_live(&self) -> bool {
        self.status == MatchStatus::Live
    }

    pub fn score_pair(&self) -> Option<(u32, u32)> {
        let (home, away) = self.score.as_deref()?.split_once(':')?;
        Some((home.trim().parse().ok()?, away.trim().parse().ok()?))
    }

    pub fn stream_url(&self) -> Option<String> {
        self.twitch_channel
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(|c| format!("https://twitch.tv/{c}"))
    }
}

/// Body of a match create/update. An empty channel means "no stream".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFields {
    pub home_team: String,
    pub away_team: String,
    pub date: String,
    pub time: String,
    pub twitch_channel: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_decodes_with_only_id_and_name() {
        let team: Team = serde_json::from_str(r#"{"id":4,"name":"Meteors"}"#).unwrap();
        assert_eq!(team.id, 4);
        assert_eq!(team.points, 0);
        assert_eq!(team.goals_for, 0);
    }

    #[test]
    fn match_decodes_camel_case_and_null_score() {
        let raw = r#"{"id":7,"homeTeam":"Meteors","awayTeam":"Lightning","date":"2025-10-28",
            "time":"19:00","status":"upcoming","score":null,"twitchChannel":null}"#;
        let m: Match = serde_json::from_str(raw).unwrap();
        assert_eq!(m.home_team, "Meteors");
        assert_eq!(m.status, MatchStatus::Upcoming);
        assert!(m.score.is_none());
        assert!(m.stream_url().is_none());
    }

    #[test]
    fn score_pair_parses_well_formed_scores_only() {
        let mut m = Match { score: Some("3:1".into()), ..Default::default() };
        assert_eq!(m.score_pair(), Some((3, 1)));
        m.score = Some("3-1".into());
        assert_eq!(m.score_pair(), None);
        m.score = None;
        assert_eq!(m.score_pair(), None);
    }

    #[test]
    fn status_cycle_wraps() {
        assert_eq!(MatchStatus::Upcoming.cycle(), MatchStatus::Live);
        assert_eq!(MatchStatus::Live.cycle(), MatchStatus::Finished);
        assert_eq!(MatchStatus::Finished.cycle(), MatchStatus::Upcoming);
    }

    #[test]
    fn match_fields_serialize_camel_case() {
        let fields = MatchFields {
            home_team: "A".into(),
            away_team: "B".into(),
            date: "2025-10-28".into(),
            time: "19:00".into(),
            twitch_channel: String::new(),
        };
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["homeTeam"], "A");
        assert_eq!(json["twitchChannel"], "");
    }

    #[test]
    fn stream_url_ignores_blank_channel() {
        let mut m = Match { twitch_channel: Some("  ".into()), ..Default::default() };
        assert!(m.stream_url().is_none());
        m.twitch_channel = Some("phl_official".into());
        assert_eq!(m.stream_url().as_deref(), Some("https://twitch.tv/phl_official"));
    }
}
