use phl_api::{Match, MatchFields, Team};

// ---------------------------------------------------------------------------
// Dialog state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DialogState<D> {
    #[default]
    Closed,
    Creating { draft: D },
    Editing { id: u64, draft: D },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent<D> {
    OpenCreate,
    OpenEdit { id: u64, draft: D },
    Submit,
    Succeeded,
    Failed,
    Cancel,
}

/// An editing popup: which record (if any) it targets, the draft being typed,
/// and whether a submission is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dialog<D> {
    pub state: DialogState<D>,
    pub submitting: bool,
}

impl<D: FormDraft> Dialog<D> {
    /// Pure transition. Closing always clears the in-flight flag.
    pub fn transition(self, event: DialogEvent<D>) -> Self {
        match (self.state, event) {
            (_, DialogEvent::OpenCreate) => Self {
                state: DialogState::Creating { draft: D::default() },
                submitting: false,
            },
            (_, DialogEvent::OpenEdit { id, draft }) => Self {
                state: DialogState::Editing { id, draft },
                submitting: false,
            },
            (_, DialogEvent::Succeeded | DialogEvent::Cancel) => Self::default(),
            (DialogState::Closed, _) => Self::default(),
            (state, DialogEvent::Submit) => Self { state, submitting: true },
            (state, DialogEvent::Failed) => Self { state, submitting: false },
        }
    }

    /// In-place convenience over `transition`.
    pub fn apply(&mut self, event: DialogEvent<D>) {
        *self = std::mem::take(self).transition(event);
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, DialogState::Closed)
    }

    pub fn editing_id(&self) -> Option<u64> {
        match self.state {
            DialogState::Editing { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&D> {
        match &self.state {
            DialogState::Closed => None,
            DialogState::Creating { draft } | DialogState::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match &mut self.state {
            DialogState::Closed => None,
            DialogState::Creating { draft } | DialogState::Editing { draft, .. } => Some(draft),
        }
    }

    /// Submit is enabled only for a complete draft with nothing in flight.
    pub fn can_submit(&self) -> bool {
        !self.submitting && self.draft().is_some_and(|d| d.is_complete())
    }
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Value must come from the loaded team names.
    TeamPicker,
}

pub trait FormDraft: Default {
    const LABELS: &'static [&'static str];

    fn is_complete(&self) -> bool;
    fn field(&self, index: usize) -> &str;
    fn field_mut(&mut self, index: usize) -> Option<&mut String>;

    fn kind(&self, _index: usize) -> FieldKind {
        FieldKind::Text
    }
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamDraft {
    pub name: String,
}

impl From<&Team> for TeamDraft {
    fn from(team: &Team) -> Self {
        Self { name: team.name.clone() }
    }
}

impl FormDraft for TeamDraft {
    const LABELS: &'static [&'static str] = &["Name"];

    fn is_complete(&self) -> bool {
        filled(&self.name)
    }

    fn field(&self, _index: usize) -> &str {
        &self.name
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        (index == 0).then_some(&mut self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchDraft {
    pub home_team: String,
    pub away_team: String,
    pub date: String,
    pub time: String,
    pub twitch_channel: String,
}

impl From<&Match> for MatchDraft {
    fn from(m: &Match) -> Self {
        Self {
            home_team: m.home_team.clone(),
            away_team: m.away_team.clone(),
            date: m.date.clone(),
            time: m.time.clone(),
            twitch_channel: m.twitch_channel.clone().unwrap_or_default(),
        }
    }
}

impl MatchDraft {
    pub fn to_fields(&self) -> MatchFields {
        MatchFields {
            home_team: self.home_team.clone(),
            away_team: self.away_team.clone(),
            date: self.date.trim().to_string(),
            time: self.time.trim().to_string(),
            twitch_channel: self.twitch_channel.trim().to_string(),
        }
    }
}

impl FormDraft for MatchDraft {
    const LABELS: &'static [&'static str] = &["Home", "Away", "Date", "Time", "Twitch channel"];

    fn is_complete(&self) -> bool {
        [&self.home_team, &self.away_team, &self.date, &self.time]
            .into_iter()
            .all(|v| filled(v))
    }

    fn field(&self, index: usize) -> &str {
        match index {
            0 => &self.home_team,
            1 => &self.away_team,
            2 => &self.date,
            3 => &self.time,
            _ => &self.twitch_channel,
        }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.home_team),
            1 => Some(&mut self.away_team),
            2 => Some(&mut self.date),
            3 => Some(&mut self.time),
            4 => Some(&mut self.twitch_channel),
            _ => None,
        }
    }

    fn kind(&self, index: usize) -> FieldKind {
        if index < 2 { FieldKind::TeamPicker } else { FieldKind::Text }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreDraft {
    pub home: String,
    pub away: String,
}

impl ScoreDraft {
    /// Integer parse with no bounds. Anything else is "not a number".
    pub fn parsed(&self) -> (Option<i64>, Option<i64>) {
        (parse_score(&self.home), parse_score(&self.away))
    }
}

fn parse_score(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

impl FormDraft for ScoreDraft {
    const LABELS: &'static [&'static str] = &["Home score", "Away score"];

    fn is_complete(&self) -> bool {
        filled(&self.home) && filled(&self.away)
    }

    fn field(&self, index: usize) -> &str {
        if index == 0 { &self.home } else { &self.away }
    }

    fn field_mut(&mut self, index: usize) -> Option<&mut String> {
        match index {
            0 => Some(&mut self.home),
            1 => Some(&mut self.away),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Field focus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormCursor {
    pub field: usize,
}

impl FormCursor {
    pub fn next<D: FormDraft>(&mut self) {
        self.field = (self.field + 1) % D::LABELS.len();
    }

    pub fn prev<D: FormDraft>(&mut self) {
        let len = D::LABELS.len();
        self.field = (self.field + len - 1) % len;
    }

    pub fn reset(&mut self) {
        self.field = 0;
    }
}

/// Step a team picker through `names`, starting from the current value.
pub fn cycle_choice(current: &str, names: &[String], forward: bool) -> Option<String> {
    if names.is_empty() {
        return None;
    }
    let next = match names.iter().position(|n| n == current) {
        Some(idx) if forward => (idx + 1) % names.len(),
        Some(idx) => (idx + names.len() - 1) % names.len(),
        None if forward => 0,
        None => names.len() - 1,
    };
    Some(names[next].clone())
}
