use tui::layout::{Constraint, Layout, Rect, Size};

pub const TAB_BAR_HEIGHT: u16 = 3;
pub const STATUS_LINE_HEIGHT: u16 = 1;
pub const LOG_PANE_PERCENT: u16 = 30;

/// Pre-computed layout areas for the main draw loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutAreas {
    /// Tabs on the left, source and spinner on the right.
    pub tab_bar: [Rect; 2],
    pub main: Rect,
    /// Toast line under the main area.
    pub status: Rect,
    pub logs: Option<Rect>,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        let (body, logs) = if show_logs {
            let [body, logs] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Percentage(LOG_PANE_PERCENT),
            ])
            .areas(area);
            (body, Some(logs))
        } else {
            (area, None)
        };

        if full_screen {
            let [main, status] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(STATUS_LINE_HEIGHT)])
                    .areas(body);
            return LayoutAreas {
                tab_bar: [Rect::ZERO, Rect::ZERO],
                main,
                status,
                logs,
            };
        }

        let [tab, main, status] = Layout::vertical([
            Constraint::Length(TAB_BAR_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(STATUS_LINE_HEIGHT),
        ])
        .areas(body);

        LayoutAreas {
            tab_bar: Self::split_tab_bar(tab),
            main,
            status,
            logs,
        }
    }

    fn split_tab_bar(area: Rect) -> [Rect; 2] {
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(area)
    }
}

/// A rect of `width` x `height` centered in `area`, clipped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_bar_and_status_line_take_fixed_rows() {
        let areas = LayoutAreas::from_rect(Rect::new(0, 0, 100, 40), false, false);
        assert_eq!(areas.tab_bar[0].height, TAB_BAR_HEIGHT);
        assert_eq!(areas.status.height, STATUS_LINE_HEIGHT);
        assert_eq!(areas.main.height, 40 - TAB_BAR_HEIGHT - STATUS_LINE_HEIGHT);
        assert!(areas.logs.is_none());
    }

    #[test]
    fn full_screen_drops_tab_bar() {
        let areas = LayoutAreas::from_rect(Rect::new(0, 0, 100, 40), true, false);
        assert_eq!(areas.tab_bar[0], Rect::ZERO);
        assert_eq!(areas.main.y, 0);
    }

    #[test]
    fn log_pane_sits_at_the_bottom() {
        let areas = LayoutAreas::from_rect(Rect::new(0, 0, 100, 40), false, true);
        let logs = areas.logs.unwrap();
        assert_eq!(logs.bottom(), 40);
        assert!(areas.status.bottom() <= logs.y);
    }

    #[test]
    fn centered_popup_clips_to_area() {
        let popup = centered(Rect::new(0, 0, 20, 10), 40, 6);
        assert_eq!(popup, Rect::new(0, 2, 20, 6));
    }
}
