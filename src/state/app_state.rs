use crate::app::MenuItem;
use crate::state::dialog::{Dialog, FormCursor, MatchDraft, ScoreDraft, TeamDraft};
use chrono::Local;
use phl_api::League;
use std::time::{Duration, Instant};

pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

// ---------------------------------------------------------------------------
// League data
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct LeagueState {
    pub league: League,
    /// True once any load cycle has finished, successful or not.
    pub loaded: bool,
    /// Local "HH:MM" of the last successful load.
    pub updated_at: Option<String>,
}

impl LeagueState {
    pub fn replace(&mut self, league: League) {
        self.league = league;
        self.loaded = true;
        self.updated_at = Some(Local::now().format("%H:%M").to_string());
    }

    /// Failed load: show nothing rather than a stale snapshot.
    pub fn clear(&mut self) {
        self.league = League::default();
        self.loaded = true;
    }
}

// ---------------------------------------------------------------------------
// List selection
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ListCursor {
    pub selected: usize,
}

impl ListCursor {
    pub fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection inside a list that may have shrunk after a reload.
    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Admin panel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminSection {
    #[default]
    Teams,
    Matches,
}

impl AdminSection {
    pub fn toggle(self) -> Self {
        match self {
            AdminSection::Teams => AdminSection::Matches,
            AdminSection::Matches => AdminSection::Teams,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    Team(u64),
    Match(u64),
}

/// A delete waiting for y/n.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub target: DeleteTarget,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveDialog {
    Team,
    Match,
    Score,
}

#[derive(Debug, Default)]
pub struct AdminState {
    pub section: AdminSection,
    pub teams: ListCursor,
    pub matches: ListCursor,
    pub team_dialog: Dialog<TeamDraft>,
    pub match_dialog: Dialog<MatchDraft>,
    pub score_dialog: Dialog<ScoreDraft>,
    /// Focused field of whichever dialog is open.
    pub cursor: FormCursor,
    pub pending_delete: Option<PendingDelete>,
}

impl AdminState {
    /// At most one dialog is open at a time.
    pub fn active_dialog(&self) -> Option<ActiveDialog> {
        if self.team_dialog.is_open() {
            Some(ActiveDialog::Team)
        } else if self.match_dialog.is_open() {
            Some(ActiveDialog::Match)
        } else if self.score_dialog.is_open() {
            Some(ActiveDialog::Score)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NoticeLevel,
    pub expires_at: Instant,
}

impl Notification {
    pub fn new(level: NoticeLevel, message: impl Into<String>, now: Instant) -> Self {
        Self { message: message.into(), level, expires_at: now + NOTIFICATION_TTL }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

// ---------------------------------------------------------------------------
// Top-level state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub league: LeagueState,
    pub standings: ListCursor,
    pub schedule: ListCursor,
    pub directory: ListCursor,
    pub admin: AdminState,
    pub notification: Option<Notification>,
    pub last_error: Option<String>,
    pub show_logs: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clamp_selections(&mut self) {
        let teams = self.league.league.teams.len();
        let matches = self.league.league.matches.len();
        self.standings.clamp(teams);
        self.directory.clamp(teams);
        self.admin.teams.clamp(teams);
        self.schedule.clamp(matches);
        self.admin.matches.clamp(matches);
    }
}
