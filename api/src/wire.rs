/// Wire types for the league API request bodies and list responses.
use crate::MatchStatus;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// List endpoints answer with an error object instead of an array when
/// something goes wrong server-side. Anything that is not an array reads as
/// an empty collection; a malformed array is still a decode error.
pub fn listing<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, serde_json::Error> {
    match value {
        Value::Array(_) => serde_json::from_value(value),
        _ => Ok(Vec::new()),
    }
}

#[derive(Serialize, Debug)]
pub struct TeamBody<'a> {
    pub name: &'a str,
}

#[derive(Serialize, Debug)]
pub struct StatusBody {
    pub status: MatchStatus,
}

/// Final score submission. `None` goes out as `null`, which is what a
/// non-numeric score field turns into.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBody {
    pub match_id: u64,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub status: MatchStatus,
}
