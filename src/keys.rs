use crate::app::{App, MenuItem};
use crate::state::app_state::AdminSection;
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use phl_api::MatchStatus;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// What the main loop has to do after a key press.
#[derive(Debug, PartialEq)]
pub enum KeyOutcome {
    Nothing,
    Quit,
    Send(NetworkRequest),
}

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let outcome = route_key(&mut guard, key_event);
    drop(guard);

    match outcome {
        KeyOutcome::Nothing => {}
        KeyOutcome::Quit => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }
        KeyOutcome::Send(request) => {
            if let Err(e) = network_requests.send(request).await {
                log::error!("network worker is gone: {e}");
            }
        }
    }
}

pub fn route_key(app: &mut App, key_event: KeyEvent) -> KeyOutcome {
    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        return KeyOutcome::Quit;
    }

    // Open popups swallow every key.
    if app.state.admin.pending_delete.is_some() {
        return route_delete_prompt(app, key_event);
    }
    if app.state.admin.active_dialog().is_some() {
        return route_dialog(app, key_event);
    }

    match (app.state.active_tab, key_event.code, key_event.modifiers) {
        (_, Char('q'), _) => return KeyOutcome::Quit,

        (_, Char('1'), _) => app.update_tab(MenuItem::Standings),
        (_, Char('2'), _) => app.update_tab(MenuItem::Schedule),
        (_, Char('3'), _) => app.update_tab(MenuItem::Teams),
        (_, Char('4'), _) => app.update_tab(MenuItem::Info),
        (_, Char('5'), _) => app.update_tab(MenuItem::Admin),
        (_, Char('?'), _) => app.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => app.exit_help(),

        (_, Char('R'), _) => return KeyOutcome::Send(NetworkRequest::LoadLeague),

        // Admin panel
        (MenuItem::Admin, KeyCode::Tab, _) => app.admin_toggle_section(),
        (MenuItem::Admin, Char('n'), _) => app.admin_open_create(),
        (MenuItem::Admin, Char('e') | KeyCode::Enter, _) => app.admin_open_edit(),
        (MenuItem::Admin, Char('d') | KeyCode::Delete, _) => app.admin_request_delete(),
        (MenuItem::Admin, Char('c'), _) => app.admin_open_score_entry(),
        (MenuItem::Admin, Char(ch @ ('s' | 'u' | 'l' | 'f')), _)
            if app.state.admin.section == AdminSection::Matches =>
        {
            let status = match ch {
                'u' => Some(MatchStatus::Upcoming),
                'l' => Some(MatchStatus::Live),
                'f' => Some(MatchStatus::Finished),
                _ => None,
            };
            if let Some(mutation) = app.admin_change_status(status) {
                return KeyOutcome::Send(NetworkRequest::Commit(mutation));
            }
        }

        // Lists
        (_, Char('j') | KeyCode::Down, _) => app.select_next(),
        (_, Char('k') | KeyCode::Up, _) => app.select_prev(),

        // Global
        (_, Char('f'), _) => app.toggle_full_screen(),
        (_, Char('"'), _) => app.toggle_show_logs(),

        _ => {}
    }

    KeyOutcome::Nothing
}

fn route_delete_prompt(app: &mut App, key_event: KeyEvent) -> KeyOutcome {
    match key_event.code {
        Char('y') | Char('Y') => match app.admin_confirm_delete() {
            Some(mutation) => KeyOutcome::Send(NetworkRequest::Commit(mutation)),
            None => KeyOutcome::Nothing,
        },
        Char('n') | Char('N') | KeyCode::Esc => {
            app.admin_cancel_delete();
            KeyOutcome::Nothing
        }
        _ => KeyOutcome::Nothing,
    }
}

fn route_dialog(app: &mut App, key_event: KeyEvent) -> KeyOutcome {
    match key_event.code {
        KeyCode::Esc => app.dialog_cancel(),
        KeyCode::Enter => {
            if let Some(mutation) = app.dialog_submit() {
                return KeyOutcome::Send(NetworkRequest::Commit(mutation));
            }
        }
        KeyCode::Tab | KeyCode::Down => app.dialog_next_field(),
        KeyCode::BackTab | KeyCode::Up => app.dialog_prev_field(),
        KeyCode::Right => app.dialog_cycle_choice(true),
        KeyCode::Left => app.dialog_cycle_choice(false),
        KeyCode::Backspace => app.dialog_backspace(),
        Char(ch) => app.dialog_input(ch),
        _ => {}
    }
    KeyOutcome::Nothing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use phl_api::seed::seed_league;
    use phl_api::store::Mutation;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, keys: &str) -> KeyOutcome {
        let mut last = KeyOutcome::Nothing;
        for ch in keys.chars() {
            last = route_key(app, key(Char(ch)));
        }
        last
    }

    fn loaded_app() -> App {
        let mut app = App::new(AppSettings::default());
        app.on_league_loaded(seed_league());
        app
    }

    #[test]
    fn number_keys_switch_tabs() {
        let mut app = loaded_app();
        press(&mut app, "3");
        assert_eq!(app.state.active_tab, MenuItem::Teams);
        press(&mut app, "?");
        assert_eq!(app.state.active_tab, MenuItem::Help);
        route_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.state.active_tab, MenuItem::Teams);
    }

    #[test]
    fn reload_key_requests_league() {
        let mut app = loaded_app();
        assert_eq!(press(&mut app, "R"), KeyOutcome::Send(NetworkRequest::LoadLeague));
    }

    #[test]
    fn quit_keys() {
        let mut app = loaded_app();
        assert_eq!(press(&mut app, "q"), KeyOutcome::Quit);
        let ctrl_c = KeyEvent::new(Char('c'), KeyModifiers::CONTROL);
        assert_eq!(route_key(&mut app, ctrl_c), KeyOutcome::Quit);
    }

    #[test]
    fn dialog_captures_letters_that_are_otherwise_bindings() {
        let mut app = loaded_app();
        press(&mut app, "5n");
        assert!(app.state.admin.team_dialog.is_open());

        // "q" and "1" type into the name rather than quitting or switching tabs.
        assert_eq!(press(&mut app, "q1"), KeyOutcome::Nothing);
        assert_eq!(app.state.active_tab, MenuItem::Admin);

        let outcome = route_key(&mut app, key(KeyCode::Enter));
        assert_eq!(
            outcome,
            KeyOutcome::Send(NetworkRequest::Commit(Mutation::CreateTeam { name: "q1".into() }))
        );
    }

    #[test]
    fn esc_closes_dialog() {
        let mut app = loaded_app();
        press(&mut app, "5e");
        assert!(app.state.admin.team_dialog.is_open());
        route_key(&mut app, key(KeyCode::Esc));
        assert!(app.state.admin.active_dialog().is_none());
    }

    #[test]
    fn delete_needs_y() {
        let mut app = loaded_app();
        press(&mut app, "5d");
        assert_eq!(press(&mut app, "q"), KeyOutcome::Nothing, "prompt swallows keys");
        assert_eq!(
            press(&mut app, "y"),
            KeyOutcome::Send(NetworkRequest::Commit(Mutation::DeleteTeam { id: 1 }))
        );
    }

    #[test]
    fn status_keys_only_in_matches_section() {
        let mut app = loaded_app();
        press(&mut app, "5");
        assert_eq!(press(&mut app, "l"), KeyOutcome::Nothing);

        route_key(&mut app, key(KeyCode::Tab));
        assert_eq!(
            press(&mut app, "l"),
            KeyOutcome::Send(NetworkRequest::Commit(Mutation::ChangeStatus {
                id: 1,
                status: MatchStatus::Live,
            }))
        );
        assert!(!app.settings.full_screen);
        assert_eq!(
            press(&mut app, "f"),
            KeyOutcome::Send(NetworkRequest::Commit(Mutation::ChangeStatus {
                id: 1,
                status: MatchStatus::Finished,
            }))
        );
        assert!(!app.settings.full_screen, "f sets status in the matches list");
    }
}
