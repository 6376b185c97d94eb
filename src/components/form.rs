use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget};

use crate::state::dialog::{Dialog, FieldKind, FormCursor, FormDraft};

const LABEL_WIDTH: usize = 16;
pub const FORM_WIDTH: u16 = 56;

/// Popup form over the admin list. Rows are read straight from the draft.
pub struct FormPopup<'a> {
    pub title: String,
    pub rows: Vec<FormRow<'a>>,
    pub focused: usize,
    pub submitting: bool,
    pub can_submit: bool,
}

pub struct FormRow<'a> {
    pub label: &'static str,
    pub value: &'a str,
    pub kind: FieldKind,
}

impl<'a> FormPopup<'a> {
    /// `None` when the dialog is closed.
    pub fn from_dialog<D: FormDraft>(
        title: &str,
        dialog: &'a Dialog<D>,
        cursor: FormCursor,
    ) -> Option<Self> {
        let draft = dialog.draft()?;
        let rows = D::LABELS
            .iter()
            .copied()
            .enumerate()
            .map(|(idx, label)| FormRow { label, value: draft.field(idx), kind: draft.kind(idx) })
            .collect();
        let title = match dialog.editing_id() {
            Some(id) => format!(" Edit {title} #{id} "),
            None => format!(" New {title} "),
        };
        Some(Self {
            title,
            rows,
            focused: cursor.field,
            submitting: dialog.submitting,
            can_submit: dialog.can_submit(),
        })
    }

    /// Borders, one row per field, a spacer and the key hint.
    pub fn height(&self) -> u16 {
        self.rows.len() as u16 + 4
    }

    fn row_line(&self, idx: usize, row: &FormRow<'a>) -> Line<'a> {
        let focused = idx == self.focused;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let value = match (row.kind, focused) {
            (FieldKind::TeamPicker, true) => format!("◀ {} ▶", placeholder(row.value)),
            (FieldKind::TeamPicker, false) => placeholder(row.value).to_string(),
            (FieldKind::Text, true) => format!("{}_", row.value),
            (FieldKind::Text, false) => row.value.to_string(),
        };
        let value_style = if row.value.is_empty() && row.kind == FieldKind::TeamPicker {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };
        Line::from(vec![
            Span::styled(format!("{:<LABEL_WIDTH$}", row.label), label_style),
            Span::styled(value, value_style),
        ])
    }

    fn hint_line(&self) -> Line<'a> {
        if self.submitting {
            return Line::from(Span::styled("Saving...", Style::default().fg(Color::Yellow)));
        }
        let submit_style = if self.can_submit {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        Line::from(vec![
            Span::styled("Enter save", submit_style),
            Span::styled("  Esc cancel  Tab next field", Style::default().fg(Color::DarkGray)),
        ])
    }
}

fn placeholder(value: &str) -> &str {
    if value.is_empty() { "(choose with ←/→)" } else { value }
}

impl<'a> Widget for FormPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(self.title.clone());
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> =
            self.rows.iter().enumerate().map(|(idx, row)| self.row_line(idx, row)).collect();
        lines.push(Line::from(""));
        lines.push(self.hint_line());

        Paragraph::new(lines).render(inner, buf);
    }
}
