//! Built-in league snapshot for running without a backend.

use crate::{League, Match, MatchStatus, Team};

const STREAM_CHANNEL: &str = "phl_official";

pub fn seed_league() -> League {
    League { teams: seed_teams(), matches: seed_matches() }
}

fn team(id: u64, name: &str, wins: u32, losses: u32, goals_for: u32, goals_against: u32) -> Team {
    Team {
        id,
        name: name.to_string(),
        games: wins + losses,
        wins,
        losses,
        goals_for,
        goals_against,
        points: wins * 3,
    }
}

fn seed_teams() -> Vec<Team> {
    vec![
        team(1, "Northern Wolves", 10, 2, 45, 18),
        team(2, "Steel Sharks", 9, 3, 42, 22),
        team(3, "Fire Dragons", 8, 4, 38, 25),
        team(4, "Ice Bears", 7, 5, 35, 28),
        team(5, "Thunder Bulls", 6, 6, 32, 32),
        team(6, "Lightning", 5, 7, 28, 35),
        team(7, "Northern Lights", 3, 9, 22, 40),
        team(8, "Meteors", 2, 10, 18, 45),
    ]
}

fn seed_matches() -> Vec<Match> {
    let fixture = |id: u64, date: &str, time: &str, home: &str, away: &str, status, score: Option<&str>, stream: bool| Match {
        id,
        home_team: home.to_string(),
        away_team: away.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        status,
        score: score.map(str::to_string),
        twitch_channel: stream.then(|| STREAM_CHANNEL.to_string()),
    };

    vec![
        fixture(1, "2025-10-28", "19:00", "Northern Wolves", "Fire Dragons", MatchStatus::Upcoming, None, true),
        fixture(2, "2025-10-28", "21:00", "Steel Sharks", "Ice Bears", MatchStatus::Upcoming, None, true),
        fixture(3, "2025-10-27", "19:00", "Thunder Bulls", "Lightning", MatchStatus::Live, Some("2:1"), true),
        fixture(4, "2025-10-26", "19:00", "Meteors", "Northern Lights", MatchStatus::Finished, Some("3:4"), false),
        fixture(5, "2025-10-26", "21:00", "Northern Wolves", "Steel Sharks", MatchStatus::Finished, Some("4:2"), false),
    ]
}
