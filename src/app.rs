use crate::state::app_settings::AppSettings;
use crate::state::app_state::{
    ActiveDialog, AdminSection, AppState, DeleteTarget, NoticeLevel, Notification, PendingDelete,
};
use crate::state::dialog::{
    Dialog, DialogEvent, FieldKind, FormCursor, FormDraft, MatchDraft, ScoreDraft, TeamDraft,
    cycle_choice,
};
use phl_api::store::Mutation;
use phl_api::{League, Match, MatchStatus, Team};
use std::time::Instant;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Standings,
    Schedule,
    Teams,
    Info,
    Admin,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let app = Self { state: AppState::new(), settings };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_league_loaded(&mut self, league: League) {
        self.state.last_error = None;
        self.state.league.replace(league);
        self.state.clamp_selections();
    }

    pub fn on_load_failed(&mut self, message: String) {
        self.state.league.clear();
        self.state.clamp_selections();
        self.notify(NoticeLevel::Error, format!("Could not load league data: {message}"));
        self.state.last_error = Some(message);
    }

    pub fn on_mutation_committed(&mut self, mutation: Mutation, league: League) {
        self.finish_submission(&mutation, true);
        self.on_league_loaded(league);
        self.notify(NoticeLevel::Info, mutation.describe());
    }

    pub fn on_mutation_failed(&mut self, mutation: Mutation, message: String) {
        self.finish_submission(&mutation, false);
        self.notify(NoticeLevel::Error, message.clone());
        self.state.last_error = Some(message);
    }

    /// The write landed, so the dialog closes; the view follows the load
    /// failure policy.
    pub fn on_reload_failed(&mut self, mutation: Mutation, message: String) {
        self.finish_submission(&mutation, true);
        log::info!("{} before reload failed", mutation.describe());
        self.on_load_failed(message);
    }

    /// Only the dialog that produced `mutation` is settled. Deletes and
    /// status changes have no dialog, so a form submitted meanwhile stays
    /// in flight.
    fn finish_submission(&mut self, mutation: &Mutation, closing: bool) {
        let admin = &mut self.state.admin;
        match mutation {
            Mutation::CreateTeam { .. } | Mutation::UpdateTeam { .. } => {
                resolve(&mut admin.team_dialog, closing)
            }
            Mutation::CreateMatch { .. } | Mutation::UpdateMatch { .. } => {
                resolve(&mut admin.match_dialog, closing)
            }
            Mutation::RecordScore { .. } => resolve(&mut admin.score_dialog, closing),
            Mutation::DeleteTeam { .. }
            | Mutation::DeleteMatch { .. }
            | Mutation::ChangeStatus { .. } => return,
        }
        if admin.active_dialog().is_none() {
            admin.cursor.reset();
        }
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    pub fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.state.notification = Some(Notification::new(level, message, Instant::now()));
    }

    pub fn on_tick(&mut self, now: Instant) -> bool {
        match &self.state.notification {
            Some(note) if note.is_expired(now) => {
                self.state.notification = None;
                true
            }
            _ => false,
        }
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // List navigation
    // -----------------------------------------------------------------------

    pub fn select_next(&mut self) {
        let teams = self.state.league.league.teams.len();
        let matches = self.state.league.league.matches.len();
        match self.state.active_tab {
            MenuItem::Standings => self.state.standings.down(teams),
            MenuItem::Schedule => self.state.schedule.down(matches),
            MenuItem::Teams => self.state.directory.down(teams),
            MenuItem::Admin => match self.state.admin.section {
                AdminSection::Teams => self.state.admin.teams.down(teams),
                AdminSection::Matches => self.state.admin.matches.down(matches),
            },
            MenuItem::Info | MenuItem::Help => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.state.active_tab {
            MenuItem::Standings => self.state.standings.up(),
            MenuItem::Schedule => self.state.schedule.up(),
            MenuItem::Teams => self.state.directory.up(),
            MenuItem::Admin => match self.state.admin.section {
                AdminSection::Teams => self.state.admin.teams.up(),
                AdminSection::Matches => self.state.admin.matches.up(),
            },
            MenuItem::Info | MenuItem::Help => {}
        }
    }

    // -----------------------------------------------------------------------
    // Admin: selection and dialogs
    // -----------------------------------------------------------------------

    pub fn admin_toggle_section(&mut self) {
        self.state.admin.section = self.state.admin.section.toggle();
    }

    pub fn admin_selected_team(&self) -> Option<&Team> {
        self.state.league.league.teams.get(self.state.admin.teams.selected)
    }

    pub fn admin_selected_match(&self) -> Option<&Match> {
        self.state.league.league.matches.get(self.state.admin.matches.selected)
    }

    pub fn admin_open_create(&mut self) {
        let admin = &mut self.state.admin;
        match admin.section {
            AdminSection::Teams => admin.team_dialog.apply(DialogEvent::OpenCreate),
            AdminSection::Matches => admin.match_dialog.apply(DialogEvent::OpenCreate),
        }
        admin.cursor.reset();
    }

    /// Edit pre-fills the draft from the selected row; no row, no dialog.
    pub fn admin_open_edit(&mut self) {
        match self.state.admin.section {
            AdminSection::Teams => {
                let Some(team) = self.admin_selected_team() else {
                    return;
                };
                let event = DialogEvent::OpenEdit { id: team.id, draft: TeamDraft::from(team) };
                self.state.admin.team_dialog.apply(event);
            }
            AdminSection::Matches => {
                let Some(m) = self.admin_selected_match() else {
                    return;
                };
                let event = DialogEvent::OpenEdit { id: m.id, draft: MatchDraft::from(m) };
                self.state.admin.match_dialog.apply(event);
            }
        }
        self.state.admin.cursor.reset();
    }

    /// Score entry is only offered for matches that have not started.
    pub fn admin_open_score_entry(&mut self) {
        if self.state.admin.section != AdminSection::Matches {
            return;
        }
        let Some(m) = self.admin_selected_match() else {
            return;
        };
        if m.status != MatchStatus::Upcoming {
            self.notify(NoticeLevel::Error, "Scores can only be entered for upcoming matches");
            return;
        }
        let event = DialogEvent::OpenEdit { id: m.id, draft: ScoreDraft::default() };
        self.state.admin.score_dialog.apply(event);
        self.state.admin.cursor.reset();
    }

    /// `None` cycles to the next status in selector order.
    pub fn admin_change_status(&mut self, status: Option<MatchStatus>) -> Option<Mutation> {
        if self.state.admin.section != AdminSection::Matches {
            return None;
        }
        let m = self.admin_selected_match()?;
        let status = status.unwrap_or_else(|| m.status.cycle());
        Some(Mutation::ChangeStatus { id: m.id, status })
    }

    pub fn admin_request_delete(&mut self) {
        let pending = match self.state.admin.section {
            AdminSection::Teams => self.admin_selected_team().map(|t| PendingDelete {
                target: DeleteTarget::Team(t.id),
                label: format!("team \"{}\"", t.name),
            }),
            AdminSection::Matches => self.admin_selected_match().map(|m| PendingDelete {
                target: DeleteTarget::Match(m.id),
                label: format!("match {} vs {} ({})", m.home_team, m.away_team, m.date),
            }),
        };
        self.state.admin.pending_delete = pending;
    }

    pub fn admin_confirm_delete(&mut self) -> Option<Mutation> {
        let pending = self.state.admin.pending_delete.take()?;
        Some(match pending.target {
            DeleteTarget::Team(id) => Mutation::DeleteTeam { id },
            DeleteTarget::Match(id) => Mutation::DeleteMatch { id },
        })
    }

    pub fn admin_cancel_delete(&mut self) {
        self.state.admin.pending_delete = None;
    }

    // -----------------------------------------------------------------------
    // Admin: dialog input
    // -----------------------------------------------------------------------

    pub fn dialog_input(&mut self, ch: char) {
        let admin = &mut self.state.admin;
        match admin.active_dialog() {
            Some(ActiveDialog::Team) => type_char(&mut admin.team_dialog, admin.cursor, ch),
            Some(ActiveDialog::Match) => type_char(&mut admin.match_dialog, admin.cursor, ch),
            Some(ActiveDialog::Score) => type_char(&mut admin.score_dialog, admin.cursor, ch),
            None => {}
        }
    }

    pub fn dialog_backspace(&mut self) {
        let admin = &mut self.state.admin;
        match admin.active_dialog() {
            Some(ActiveDialog::Team) => backspace(&mut admin.team_dialog, admin.cursor),
            Some(ActiveDialog::Match) => backspace(&mut admin.match_dialog, admin.cursor),
            Some(ActiveDialog::Score) => backspace(&mut admin.score_dialog, admin.cursor),
            None => {}
        }
    }

    pub fn dialog_next_field(&mut self) {
        let admin = &mut self.state.admin;
        match admin.active_dialog() {
            Some(ActiveDialog::Team) => admin.cursor.next::<TeamDraft>(),
            Some(ActiveDialog::Match) => admin.cursor.next::<MatchDraft>(),
            Some(ActiveDialog::Score) => admin.cursor.next::<ScoreDraft>(),
            None => {}
        }
    }

    pub fn dialog_prev_field(&mut self) {
        let admin = &mut self.state.admin;
        match admin.active_dialog() {
            Some(ActiveDialog::Team) => admin.cursor.prev::<TeamDraft>(),
            Some(ActiveDialog::Match) => admin.cursor.prev::<MatchDraft>(),
            Some(ActiveDialog::Score) => admin.cursor.prev::<ScoreDraft>(),
            None => {}
        }
    }

    /// Team pickers only take names from the loaded league.
    pub fn dialog_cycle_choice(&mut self, forward: bool) {
        let names = self.state.league.league.team_names();
        let admin = &mut self.state.admin;
        if admin.active_dialog() != Some(ActiveDialog::Match) {
            return;
        }
        let field = admin.cursor.field;
        let Some(draft) = admin.match_dialog.draft_mut() else {
            return;
        };
        if draft.kind(field) != FieldKind::TeamPicker {
            return;
        }
        if let Some(value) = draft.field_mut(field)
            && let Some(choice) = cycle_choice(value, &names, forward)
        {
            *value = choice;
        }
    }

    pub fn dialog_cancel(&mut self) {
        let admin = &mut self.state.admin;
        admin.team_dialog.apply(DialogEvent::Cancel);
        admin.match_dialog.apply(DialogEvent::Cancel);
        admin.score_dialog.apply(DialogEvent::Cancel);
        admin.cursor.reset();
    }

    /// Build the write for the open dialog and mark it in flight. Returns
    /// `None` while submit is disabled.
    pub fn dialog_submit(&mut self) -> Option<Mutation> {
        let admin = &mut self.state.admin;
        let mutation = match admin.active_dialog()? {
            ActiveDialog::Team => {
                let dialog = &mut admin.team_dialog;
                if !dialog.can_submit() {
                    return None;
                }
                let name = dialog.draft()?.name.trim().to_string();
                let mutation = match dialog.editing_id() {
                    Some(id) => Mutation::UpdateTeam { id, name },
                    None => Mutation::CreateTeam { name },
                };
                dialog.apply(DialogEvent::Submit);
                mutation
            }
            ActiveDialog::Match => {
                let dialog = &mut admin.match_dialog;
                if !dialog.can_submit() {
                    return None;
                }
                let fields = dialog.draft()?.to_fields();
                let mutation = match dialog.editing_id() {
                    Some(id) => Mutation::UpdateMatch { id, fields },
                    None => Mutation::CreateMatch { fields },
                };
                dialog.apply(DialogEvent::Submit);
                mutation
            }
            ActiveDialog::Score => {
                let dialog = &mut admin.score_dialog;
                if !dialog.can_submit() {
                    return None;
                }
                let id = dialog.editing_id()?;
                let (home, away) = dialog.draft()?.parsed();
                dialog.apply(DialogEvent::Submit);
                Mutation::RecordScore { id, home, away }
            }
        };
        Some(mutation)
    }
}

fn resolve<D: FormDraft>(dialog: &mut Dialog<D>, closing: bool) {
    if !dialog.submitting {
        return;
    }
    dialog.apply(if closing { DialogEvent::Succeeded } else { DialogEvent::Failed });
}

fn type_char<D: FormDraft>(dialog: &mut Dialog<D>, cursor: FormCursor, ch: char) {
    if dialog.submitting {
        return;
    }
    let Some(draft) = dialog.draft_mut() else {
        return;
    };
    if draft.kind(cursor.field) != FieldKind::Text {
        return;
    }
    if let Some(value) = draft.field_mut(cursor.field) {
        value.push(ch);
    }
}

fn backspace<D: FormDraft>(dialog: &mut Dialog<D>, cursor: FormCursor) {
    if dialog.submitting {
        return;
    }
    if let Some(value) = dialog.draft_mut().and_then(|d| d.field_mut(cursor.field)) {
        value.pop();
    }
}
