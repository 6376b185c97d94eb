use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{
    Block, BorderType, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table,
    TableState, Tabs, Wrap,
};
use tui::{Frame, Terminal};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::{App, MenuItem};
use crate::components::form::{FORM_WIDTH, FormPopup};
use crate::state::app_settings::SourceKind;
use crate::state::app_state::{AdminSection, NoticeLevel};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::{LayoutAreas, centered};
use phl_api::{Match, MatchStatus, Team};

static TABS: &[&str; 5] = &["Standings", "Schedule", "Teams", "Info", "Admin"];

const HELP_LINES: &[(&str, &str)] = &[
    ("1-5", "switch tab"),
    ("j/k  ↓/↑", "move selection"),
    ("R", "reload league data"),
    ("f", "toggle full screen (outside Admin > Matches)"),
    ("\"", "toggle log pane"),
    ("q  Ctrl-C", "quit"),
    ("", ""),
    ("Admin", ""),
    ("Tab", "switch teams / matches"),
    ("n", "new"),
    ("e  Enter", "edit selected"),
    ("d", "delete selected (y/n)"),
    ("s", "cycle match status"),
    ("u / l / f", "set upcoming / live / finished"),
    ("c", "enter final score (upcoming matches)"),
    ("", ""),
    ("Forms", ""),
    ("Tab  Shift-Tab", "next / previous field"),
    ("←/→", "pick team"),
    ("Enter", "save"),
    ("Esc", "cancel"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Standings => draw_standings(f, layout.main, app),
            MenuItem::Schedule => draw_schedule(f, layout.main, app),
            MenuItem::Teams => draw_team_directory(f, layout.main, app),
            MenuItem::Info => draw_info(f, layout.main),
            MenuItem::Admin => draw_admin(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        draw_status_line(f, layout.status, app);
        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
        draw_loading_spinner(f, &layout, app, loading);
    });

    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Standings => 0,
        MenuItem::Schedule => 1,
        MenuItem::Teams => 2,
        MenuItem::Info => 3,
        MenuItem::Admin => 4,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type)
                .title(" PHL "),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let updated = app
        .state
        .league
        .updated_at
        .as_deref()
        .map(|at| format!(" @ {at}"))
        .unwrap_or_default();
    let status = format!("{}{updated}  Help: ? ", app.settings.source_label());
    let help = Paragraph::new(status)
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

/// Shown instead of a list that has nothing to draw.
fn empty_message(app: &App, what: &str) -> String {
    if !app.state.league.loaded {
        "Loading league data...".to_string()
    } else if let Some(err) = app.state.last_error.as_deref() {
        format!("Could not load {what}:\n{err}\n\nPress R to retry")
    } else {
        format!("No {what} yet")
    }
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: String) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

// ---------------------------------------------------------------------------
// Public tabs
// ---------------------------------------------------------------------------

fn draw_standings(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Standings ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let teams = &app.state.league.league.teams;
    if teams.is_empty() {
        draw_placeholder(f, inner, empty_message(app, "standings"));
        return;
    }

    let table = standings_table(teams);
    let mut state = TableState::default().with_selected(Some(app.state.standings.selected));
    f.render_stateful_widget(table, inner, &mut state);
}

/// Rows stay in the order the server sent them.
fn standings_table(teams: &[Team]) -> Table<'_> {
    let header = Row::new(["#", "Team", "GP", "W", "L", "GF", "GA", "PTS"])
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows = teams.iter().enumerate().map(|(idx, team)| {
        Row::new(vec![
            Cell::from((idx + 1).to_string()),
            Cell::from(team.name.as_str()),
            Cell::from(team.games.to_string()),
            Cell::from(team.wins.to_string()),
            Cell::from(team.losses.to_string()),
            Cell::from(team.goals_for.to_string()),
            Cell::from(team.goals_against.to_string()),
            Cell::from(Span::styled(
                team.points.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ])
    });

    let widths = [
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(5),
    ];

    Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
}

fn status_span(status: MatchStatus) -> Span<'static> {
    let style = match status {
        MatchStatus::Live => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        MatchStatus::Finished => Style::default().fg(Color::Gray),
        MatchStatus::Upcoming => Style::default().fg(Color::Green),
    };
    Span::styled(format!("[{}]", status.label()), style)
}

/// Lines for one schedule entry; the score appears once a match has started.
fn match_card(m: &Match, selected: bool) -> Vec<Line<'_>> {
    let marker = if selected { "> " } else { "  " };
    let mut lines = vec![Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{} {}  ", m.date, m.time), Style::default().fg(Color::Gray)),
        status_span(m.status),
    ])];

    // Well-formed scores are normalised to "H:A"; anything else is shown as sent.
    let score = match (m.status, m.score.as_deref(), m.score_pair()) {
        (MatchStatus::Upcoming, _, _) | (_, None, _) => "vs".to_string(),
        (_, _, Some((home, away))) => format!("{home}:{away}"),
        (_, Some(raw), None) => raw.to_string(),
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(m.home_team.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {score}  ")),
        Span::styled(m.away_team.as_str(), Style::default().add_modifier(Modifier::BOLD)),
    ]));

    if m.is_live()
        && let Some(url) = m.stream_url()
    {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("Watch: {url}"), Style::default().fg(Color::Magenta)),
        ]));
    }
    lines.push(Line::from(""));
    lines
}

fn draw_schedule(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Schedule ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let matches = &app.state.league.league.matches;
    if matches.is_empty() {
        draw_placeholder(f, inner, empty_message(app, "matches"));
        return;
    }

    let selected = app.state.schedule.selected;
    let mut lines = Vec::new();
    let mut selected_span = (0, 0);
    for (idx, m) in matches.iter().enumerate() {
        let card = match_card(m, idx == selected);
        if idx == selected {
            selected_span = (lines.len(), card.len());
        }
        lines.extend(card);
    }

    let (start, len) = selected_span;
    let visible = inner.height as usize;
    let offset = (start + len).saturating_sub(visible);
    f.render_widget(Paragraph::new(lines).scroll((offset as u16, 0)), inner);
}

fn draw_team_directory(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Teams ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let teams = &app.state.league.league.teams;
    if teams.is_empty() {
        draw_placeholder(f, inner, empty_message(app, "teams"));
        return;
    }

    let items: Vec<ListItem> = teams
        .iter()
        .map(|team| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<24}", team.name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!(
                        "{}-{}  {} pts  GD {:+}",
                        team.wins,
                        team.losses,
                        team.points,
                        team.goal_difference()
                    ),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.state.directory.selected));
    f.render_stateful_widget(list, inner, &mut state);
}

fn info_text() -> Vec<Line<'static>> {
    let heading = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
    };
    let tier = |name: &'static str, text: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {name}: "), Style::default().fg(Color::Cyan)),
            Span::raw(text),
        ])
    };

    vec![
        heading("PHL (First Hockey League): the elite of PUCK."),
        Line::from(""),
        heading("How it works"),
        Line::from("The league brings together the best teams competing for the championship."),
        Line::from(""),
        heading("Three tiers"),
        tier("Amateurs", "Open to everyone. Reach the top and move up."),
        tier("Continental", "Tough seasons. The strongest teams advance to the Elite."),
        tier("Elite", "A closed club of the strongest. Regular season and playoffs for the title."),
        Line::from(""),
        heading("Movement"),
        Line::from("Climb by finishing at the top of the rating. The bottom places of the"),
        Line::from("Elite and Continental tiers are relegated."),
        Line::from(""),
        heading("Rewards"),
        Line::from("The higher the tier, the better the rewards: exclusive sticks, stick tape"),
        Line::from("and other prizes that show your status."),
        Line::from(""),
        heading("Community"),
        Line::from("Telegram  Discord  Twitch"),
    ]
}

fn draw_info(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" About the league ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(info_text()).wrap(Wrap { trim: false }), inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help (Esc to close) ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:<16}"), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

fn draw_admin(f: &mut Frame, area: Rect, app: &App) {
    let title = if app.settings.source == SourceKind::Seed {
        " Admin (read-only: built-in data) "
    } else {
        " Admin "
    };
    let block = default_border(Color::Yellow).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [header, key_legend, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)])
            .areas(inner);

    let admin = &app.state.admin;
    let section_span = |label: &'static str, section: AdminSection| {
        if admin.section == section {
            Span::styled(
                format!("[{label}]"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!(" {label} "), Style::default().fg(Color::Gray))
        }
    };
    f.render_widget(
        Paragraph::new(Line::from(vec![
            section_span("Teams", AdminSection::Teams),
            Span::raw(" "),
            section_span("Matches", AdminSection::Matches),
        ])),
        header,
    );

    let legend = match admin.section {
        AdminSection::Teams => "Tab=matches  n=new  e=edit  d=delete",
        AdminSection::Matches => "Tab=teams  n=new  e=edit  d=delete  s/u/l/f=status  c=score",
    };
    f.render_widget(
        Paragraph::new(legend).style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    match admin.section {
        AdminSection::Teams => draw_admin_teams(f, content, app),
        AdminSection::Matches => draw_admin_matches(f, content, app),
    }

    draw_admin_popup(f, area, app);
}

fn draw_admin_teams(f: &mut Frame, area: Rect, app: &App) {
    let teams = &app.state.league.league.teams;
    if teams.is_empty() {
        draw_placeholder(f, area, empty_message(app, "teams"));
        return;
    }

    let items: Vec<ListItem> = teams
        .iter()
        .map(|team| ListItem::new(format!("#{:<4} {}", team.id, team.name)))
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.state.admin.teams.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_admin_matches(f: &mut Frame, area: Rect, app: &App) {
    let matches = &app.state.league.league.matches;
    if matches.is_empty() {
        draw_placeholder(f, area, empty_message(app, "matches"));
        return;
    }

    let items: Vec<ListItem> = matches
        .iter()
        .map(|m| {
            let score = m.score.as_deref().unwrap_or("-");
            ListItem::new(Line::from(vec![
                Span::raw(format!("#{:<4} {} {}  ", m.id, m.date, m.time)),
                Span::raw(format!("{} vs {}  ", m.home_team, m.away_team)),
                status_span(m.status),
                Span::styled(format!("  {score}"), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();
    let list = List::new(items)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.state.admin.matches.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_admin_popup(f: &mut Frame, area: Rect, app: &App) {
    let admin = &app.state.admin;

    if let Some(pending) = admin.pending_delete.as_ref() {
        let text = format!("Delete {}?\n\ny = delete   n = keep", pending.label);
        let width = (text.lines().map(str::len).max().unwrap_or(0) as u16 + 4).max(30);
        let popup_area = centered(area, width, 5);
        f.render_widget(Clear, popup_area);
        f.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(default_border(Color::Red).title(" Confirm ")),
            popup_area,
        );
        return;
    }

    let popup = FormPopup::from_dialog("team", &admin.team_dialog, admin.cursor)
        .or_else(|| FormPopup::from_dialog("match", &admin.match_dialog, admin.cursor))
        .or_else(|| FormPopup::from_dialog("score", &admin.score_dialog, admin.cursor));

    if let Some(popup) = popup {
        let popup_area = centered(area, FORM_WIDTH, popup.height());
        f.render_widget(popup, popup_area);
    }
}

// ---------------------------------------------------------------------------
// Chrome
// ---------------------------------------------------------------------------

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.state.notification.as_ref() {
        Some(note) => {
            let color = match note.level {
                NoticeLevel::Info => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            Line::from(Span::styled(format!(" {}", note.message), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            " 1-5 tabs  j/k move  R reload  ? help  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Gray))
        .output_timestamp(Some("%H:%M:%S".to_string()))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false);
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, layout: &LayoutAreas, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string()).style(style);
    let area = if app.settings.full_screen {
        Rect::new(layout.main.right().saturating_sub(2), layout.main.y, 1, 1)
    } else {
        let status = layout.tab_bar[1];
        Rect::new(status.x + 1, status.y + 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_settings::AppSettings;
    use phl_api::seed::seed_league;
    use tui::backend::TestBackend;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        draw(&mut terminal, app, LoadingState::default());
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn loaded_app() -> App {
        let mut app = App::new(AppSettings::default());
        app.on_league_loaded(seed_league());
        app
    }

    #[test]
    fn standings_keep_server_order() {
        let mut league = seed_league();
        league.teams.reverse();
        let mut app = App::new(AppSettings::default());
        app.on_league_loaded(league);

        let screen = render(&app);
        let meteors = screen.find("Meteors").unwrap();
        let wolves = screen.find("Northern Wolves").unwrap();
        assert!(meteors < wolves);
    }

    #[test]
    fn schedule_shows_live_stream_only() {
        let mut app = loaded_app();
        app.update_tab(MenuItem::Schedule);
        let screen = render(&app);
        assert!(screen.contains("[LIVE]"));
        assert!(screen.contains("2:1"));
        assert_eq!(screen.matches("twitch.tv/phl_official").count(), 1);
    }

    #[test]
    fn failed_load_shows_error() {
        let mut app = App::new(AppSettings::default());
        app.on_load_failed("Network error".into());
        let screen = render(&app);
        assert!(screen.contains("Network error"));
    }

    #[test]
    fn help_notes_where_full_screen_key_is_taken() {
        let mut app = loaded_app();
        app.update_tab(MenuItem::Help);
        let screen = render(&app);
        assert!(screen.contains("toggle full screen (outside Admin > Matches)"));
        assert!(screen.contains("set upcoming / live / finished"));
    }

    #[test]
    fn delete_prompt_is_drawn_over_admin() {
        let mut app = loaded_app();
        app.update_tab(MenuItem::Admin);
        app.admin_request_delete();
        let screen = render(&app);
        assert!(screen.contains("Delete team \"Northern Wolves\"?"));
    }
}
