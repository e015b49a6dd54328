//! Application state and event loop

use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::{Datelike, Days, Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
    DefaultTerminal, Frame,
};

use crate::config::Config;
use crate::services::DataLoaderService;
use crate::sources::RecordQuery;
use crate::types::{DailyReport, MonthlyReport, YearlyReport};

use super::theme::Theme;
use super::widgets::{
    help::HelpPopup,
    products::{ProductTable, ProductsView},
    spinner::Spinner,
    tabs::Tab,
    today::TodayView,
    yearly::YearlyView,
};

/// One report fetch, derived from the current tab and its selected period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Today,
    Daily(NaiveDate),
    Monthly { year: i32, month: u32 },
    Yearly(i32),
}

impl Request {
    /// Store query behind this request (`None` for today, resolved at load time)
    fn query(&self) -> Option<RecordQuery> {
        match *self {
            Self::Today => None,
            Self::Daily(date) => Some(RecordQuery::Day(date)),
            Self::Monthly { year, month } => Some(RecordQuery::Month { year, month }),
            Self::Yearly(year) => Some(RecordQuery::Year(year)),
        }
    }

    /// Spinner label
    pub fn label(&self) -> String {
        self.query()
            .map(|query| query.label())
            .unwrap_or_else(|| "today".to_string())
    }

    fn execute(self, loader: &DataLoaderService) -> crate::types::Result<Report> {
        Ok(match self {
            Self::Today => Report::Today(loader.today()?),
            Self::Daily(date) => Report::Daily(loader.daily(date)?),
            Self::Monthly { year, month } => Report::Monthly(loader.monthly(year, month)?),
            Self::Yearly(year) => Report::Yearly(loader.yearly(year)?),
        })
    }
}

/// A loaded report, tagged with the view that shows it
#[derive(Debug)]
pub enum Report {
    Today(DailyReport),
    Daily(DailyReport),
    Monthly(MonthlyReport),
    Yearly(YearlyReport),
}

impl Report {
    fn max_scroll_offset(&self) -> usize {
        match self {
            Self::Today(r) | Self::Daily(r) => ProductTable::max_scroll_offset(r.items.len()),
            Self::Monthly(r) => ProductTable::max_scroll_offset(r.items.len()),
            Self::Yearly(r) => YearlyView::max_scroll_offset(r),
        }
    }
}

/// Application state
pub enum AppState {
    /// Loading data with spinner animation
    Loading { spinner_frame: usize, label: String },
    /// Ready with loaded data
    Ready { report: Box<Report> },
    /// Load failed; `r` retries
    Error { message: String },
}

/// Result sent back from a loader thread, tagged with its request id
type LoadResult = (u64, Result<Report, String>);

/// Main application
pub struct App {
    state: AppState,
    should_quit: bool,
    current_tab: Tab,
    /// Selected day (Daily tab)
    day: NaiveDate,
    /// Selected (year, month) (Monthly tab)
    month: (i32, u32),
    /// Selected year (Yearly tab)
    year: i32,
    scroll: usize,
    show_help: bool,
    theme: Theme,
    /// Id of the latest request; results for older ids are dropped
    request_id: u64,
    /// Load to start on the next loop iteration
    pending_request: Option<Request>,
}

impl App {
    /// Create a new app with periods selected around `today`
    pub fn new(today: NaiveDate, theme: Theme) -> Self {
        Self {
            state: AppState::Loading {
                spinner_frame: 0,
                label: Request::Today.label(),
            },
            should_quit: false,
            current_tab: Tab::default(),
            day: today,
            month: (today.year(), today.month()),
            year: today.year(),
            scroll: 0,
            show_help: false,
            theme,
            request_id: 0,
            pending_request: Some(Request::Today),
        }
    }

    /// Request for the current tab and its selected period
    fn request(&self) -> Request {
        match self.current_tab {
            Tab::Today => Request::Today,
            Tab::Daily => Request::Daily(self.day),
            Tab::Monthly => Request::Monthly {
                year: self.month.0,
                month: self.month.1,
            },
            Tab::Yearly => Request::Yearly(self.year),
        }
    }

    fn reload(&mut self) {
        self.pending_request = Some(self.request());
    }

    /// Start the pending load, if any: bump the request id and show the spinner
    pub fn take_request(&mut self) -> Option<(u64, Request)> {
        let request = self.pending_request.take()?;
        self.request_id += 1;
        self.scroll = 0;
        self.state = AppState::Loading {
            spinner_frame: 0,
            label: request.label(),
        };
        Some((self.request_id, request))
    }

    /// Apply a finished load. Results from superseded requests are ignored.
    pub fn apply_result(&mut self, id: u64, result: Result<Report, String>) {
        if id != self.request_id {
            return;
        }
        self.state = match result {
            Ok(report) => AppState::Ready {
                report: Box::new(report),
            },
            Err(message) => AppState::Error { message },
        };
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => self.set_tab(self.current_tab.next()),
            KeyCode::BackTab => self.set_tab(self.current_tab.prev()),
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(tab) = Tab::from_number(c as u8 - b'0') {
                    self.set_tab(tab);
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.shift_period(-1),
            KeyCode::Right | KeyCode::Char('l') => self.shift_period(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reload(),
            KeyCode::Char('?') => {
                self.show_help = !self.show_help;
            }
            _ => {}
        }
    }

    fn set_tab(&mut self, tab: Tab) {
        if tab != self.current_tab {
            self.current_tab = tab;
            self.reload();
        }
    }

    /// Move the current tab's period by `delta` days / months / years
    fn shift_period(&mut self, delta: i32) {
        match self.current_tab {
            Tab::Today => return,
            Tab::Daily => {
                let days = Days::new(u64::from(delta.unsigned_abs()));
                let shifted = if delta < 0 {
                    self.day.checked_sub_days(days)
                } else {
                    self.day.checked_add_days(days)
                };
                match shifted {
                    Some(day) => self.day = day,
                    None => return,
                }
            }
            Tab::Monthly => self.month = shift_month(self.month, delta),
            Tab::Yearly => self.year += delta,
        }
        self.reload();
    }

    fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    fn scroll_down(&mut self) {
        if let AppState::Ready { report } = &self.state {
            let max = report.max_scroll_offset();
            self.scroll = (self.scroll + 1).min(max);
        }
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if let AppState::Loading { spinner_frame, .. } = &mut self.state {
            *spinner_frame = Spinner::next_frame(*spinner_frame);
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn render_report(&self, report: &Report, area: Rect, buf: &mut Buffer) {
        match report {
            Report::Today(r) => TodayView::new(r, self.theme)
                .with_scroll(self.scroll)
                .render(area, buf),
            Report::Daily(r) => ProductsView::new(
                r.date.format("%Y/%m/%d").to_string(),
                &r.items,
                r.item_count,
                r.total_quantity,
                self.theme,
            )
            .with_tab(Tab::Daily)
            .with_scroll(self.scroll)
            .render(area, buf),
            Report::Monthly(r) => ProductsView::new(
                format!("{}年{}月", r.year, r.month),
                &r.items,
                r.item_count,
                r.total_quantity,
                self.theme,
            )
            .with_tab(Tab::Monthly)
            .with_scroll(self.scroll)
            .render(area, buf),
            Report::Yearly(r) => YearlyView::new(r, self.theme)
                .with_scroll(self.scroll)
                .render(area, buf),
        }
    }
}

/// Add `delta` months to `(year, month)`, carrying into the year
fn shift_month((year, month): (i32, u32), delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            AppState::Loading {
                spinner_frame,
                label,
            } => {
                Spinner::new(*spinner_frame, label, self.theme).render(area, buf);
            }
            AppState::Ready { report } => {
                self.render_report(report, area, buf);

                if self.show_help {
                    let popup_area = HelpPopup::centered_area(area);
                    HelpPopup::new(self.theme).render(popup_area, buf);
                }
            }
            AppState::Error { message } => {
                let y = area.y + area.height / 2;
                let lines = vec![
                    Line::from(Span::styled(
                        format!("Error: {}", message),
                        Style::default().fg(self.theme.error()),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        "r: Retry  q: Quit",
                        Style::default().fg(self.theme.muted()),
                    )),
                ];
                let message_area = Rect {
                    x: area.x,
                    y,
                    width: area.width,
                    height: area.height.saturating_sub(y - area.y),
                };
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .render(message_area, buf);
            }
        }
    }
}

/// Run the TUI application
pub fn run(config: &Config) -> anyhow::Result<()> {
    let loader = Arc::new(DataLoaderService::from_config(config)?);
    // Detect before raw mode
    let theme = Theme::detect();

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, loader, theme);
    ratatui::restore();
    result
}

fn run_app(
    terminal: &mut DefaultTerminal,
    loader: Arc<DataLoaderService>,
    theme: Theme,
) -> anyhow::Result<()> {
    let mut app = App::new(Local::now().date_naive(), theme);
    let (tx, rx) = mpsc::channel::<LoadResult>();

    loop {
        if let Some((id, request)) = app.take_request() {
            let tx = tx.clone();
            let loader = Arc::clone(&loader);
            thread::spawn(move || {
                let result = request.execute(&loader).map_err(|e| e.to_string());
                let _ = tx.send((id, result));
            });
        }

        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        // Non-blocking: stale ids are dropped by apply_result
        while let Ok((id, result)) = rx.try_recv() {
            app.apply_result(id, result);
        }

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProductionSummary, TotalSummary};
    use crossterm::event::KeyEvent;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn make_daily(count: usize) -> DailyReport {
        let items: Vec<ProductionSummary> = (0..count)
            .map(|i| ProductionSummary {
                product_name: format!("商品{}", i),
                product_code: format!("P{:02}", i),
                package_type: "box".to_string(),
                quantity: 10,
                extra: Default::default(),
            })
            .collect();
        let total = TotalSummary {
            item_count: count,
            total_quantity: 10 * count as u64,
        };
        DailyReport::new(today(), items, total)
    }

    /// Helper to create a ready app on the Today tab with `count` rows
    fn make_ready_app(count: usize) -> App {
        let mut app = App::new(today(), Theme::Dark);
        let (id, _) = app.take_request().unwrap();
        app.apply_result(id, Ok(Report::Today(make_daily(count))));
        app
    }

    fn render_text(app: &App) -> String {
        let area = Rect::new(0, 0, 100, 30);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        let content: String = buf.content().iter().map(|c| c.symbol()).collect();
        content.replace(' ', "")
    }

    // ========== loading tests ==========

    #[test]
    fn test_app_initial_state() {
        let app = App::new(today(), Theme::Dark);
        assert!(matches!(
            app.state,
            AppState::Loading {
                spinner_frame: 0,
                ..
            }
        ));
        assert_eq!(app.current_tab, Tab::Today);
        assert_eq!(app.pending_request, Some(Request::Today));
        assert!(!app.should_quit());
    }

    #[test]
    fn test_take_request_bumps_id() {
        let mut app = App::new(today(), Theme::Dark);
        assert_eq!(app.take_request(), Some((1, Request::Today)));
        assert_eq!(app.take_request(), None);

        app.handle_event(key(KeyCode::Char('r')));
        assert_eq!(app.take_request(), Some((2, Request::Today)));
    }

    #[test]
    fn test_apply_result_ready() {
        let app = make_ready_app(2);
        assert!(matches!(app.state, AppState::Ready { .. }));
    }

    #[test]
    fn test_stale_result_is_dropped() {
        let mut app = App::new(today(), Theme::Dark);
        let (old_id, _) = app.take_request().unwrap();

        // Switching tabs supersedes the first load
        app.handle_event(key(KeyCode::Tab));
        let (new_id, request) = app.take_request().unwrap();
        assert_eq!(request, Request::Daily(today()));

        app.apply_result(old_id, Ok(Report::Today(make_daily(1))));
        assert!(matches!(app.state, AppState::Loading { .. }));

        app.apply_result(new_id, Ok(Report::Daily(make_daily(1))));
        assert!(matches!(app.state, AppState::Ready { .. }));
    }

    #[test]
    fn test_apply_result_error() {
        let mut app = App::new(today(), Theme::Dark);
        let (id, _) = app.take_request().unwrap();
        app.apply_result(id, Err("store unreachable".to_string()));

        assert!(matches!(app.state, AppState::Error { .. }));
        assert!(render_text(&app).contains("storeunreachable"));
    }

    #[test]
    fn test_app_tick_updates_spinner() {
        let mut app = App::new(today(), Theme::Dark);
        app.tick();
        assert!(matches!(
            app.state,
            AppState::Loading {
                spinner_frame: 1,
                ..
            }
        ));
    }

    // ========== key handling tests ==========

    #[test]
    fn test_app_quit_keys() {
        for event in [
            key(KeyCode::Char('q')),
            key(KeyCode::Esc),
            Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        ] {
            let mut app = App::new(today(), Theme::Dark);
            app.handle_event(event);
            assert!(app.should_quit());
        }
    }

    #[test]
    fn test_app_tab_navigation() {
        let mut app = make_ready_app(1);

        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.current_tab, Tab::Daily);
        app.handle_event(key(KeyCode::Char('4')));
        assert_eq!(app.current_tab, Tab::Yearly);
        assert_eq!(app.take_request().map(|(_, r)| r), Some(Request::Yearly(2025)));

        app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::BackTab,
            KeyModifiers::SHIFT,
        )));
        assert_eq!(app.current_tab, Tab::Monthly);
        assert_eq!(
            app.take_request().map(|(_, r)| r),
            Some(Request::Monthly {
                year: 2025,
                month: 1
            })
        );
    }

    #[test]
    fn test_same_tab_does_not_reload() {
        let mut app = make_ready_app(1);
        app.handle_event(key(KeyCode::Char('1')));
        assert_eq!(app.pending_request, None);
    }

    #[test]
    fn test_period_keys_ignored_on_today() {
        let mut app = make_ready_app(1);
        app.handle_event(key(KeyCode::Left));
        assert_eq!(app.pending_request, None);
    }

    #[test]
    fn test_daily_period_navigation() {
        let mut app = make_ready_app(1);
        app.handle_event(key(KeyCode::Char('2')));
        app.take_request();

        app.handle_event(key(KeyCode::Left));
        assert_eq!(
            app.take_request().map(|(_, r)| r),
            Some(Request::Daily(NaiveDate::from_ymd_opt(2025, 1, 4).unwrap()))
        );

        app.handle_event(key(KeyCode::Char('l')));
        app.handle_event(key(KeyCode::Char('l')));
        assert_eq!(
            app.take_request().map(|(_, r)| r),
            Some(Request::Daily(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()))
        );
    }

    #[test]
    fn test_monthly_period_wraps_year() {
        let mut app = make_ready_app(1);
        app.handle_event(key(KeyCode::Char('3')));

        app.handle_event(key(KeyCode::Char('h')));
        assert_eq!(
            app.take_request().map(|(_, r)| r),
            Some(Request::Monthly {
                year: 2024,
                month: 12
            })
        );

        app.handle_event(key(KeyCode::Right));
        app.handle_event(key(KeyCode::Right));
        assert_eq!(app.month, (2025, 2));
    }

    #[test]
    fn test_yearly_period_navigation() {
        let mut app = make_ready_app(1);
        app.handle_event(key(KeyCode::Char('4')));
        app.handle_event(key(KeyCode::Left));
        assert_eq!(app.take_request().map(|(_, r)| r), Some(Request::Yearly(2024)));
    }

    #[test]
    fn test_scroll_bounds() {
        let mut app = make_ready_app(20);
        for _ in 0..10 {
            app.handle_event(key(KeyCode::Char('j')));
        }
        // 20 rows, 15 visible
        assert_eq!(app.scroll, 5);

        app.handle_event(key(KeyCode::Up));
        assert_eq!(app.scroll, 4);
    }

    #[test]
    fn test_scroll_resets_on_reload() {
        let mut app = make_ready_app(20);
        app.handle_event(key(KeyCode::Down));
        assert_eq!(app.scroll, 1);

        app.handle_event(key(KeyCode::Char('r')));
        app.take_request();
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_app_help_toggle() {
        let mut app = make_ready_app(1);
        app.handle_event(key(KeyCode::Char('?')));
        assert!(app.show_help);
        assert!(render_text(&app).contains("Toggle"));

        app.handle_event(key(KeyCode::Char('?')));
        assert!(!app.show_help);
    }

    // ========== helpers ==========

    #[test]
    fn test_shift_month() {
        assert_eq!(shift_month((2025, 1), -1), (2024, 12));
        assert_eq!(shift_month((2025, 12), 1), (2026, 1));
        assert_eq!(shift_month((2025, 6), 0), (2025, 6));
        assert_eq!(shift_month((2025, 3), -15), (2023, 12));
    }

    #[test]
    fn test_request_labels() {
        assert_eq!(Request::Today.label(), "today");
        assert_eq!(Request::Daily(today()).label(), "2025/01/05");
        assert_eq!(
            Request::Monthly {
                year: 2025,
                month: 3
            }
            .label(),
            "2025/03"
        );
        assert_eq!(Request::Yearly(2025).label(), "2025");
    }

    #[test]
    fn test_request_query_matches_tab_period() {
        assert_eq!(Request::Today.query(), None);
        assert_eq!(
            Request::Daily(today()).query(),
            Some(RecordQuery::Day(today()))
        );
        assert_eq!(
            Request::Monthly {
                year: 2025,
                month: 3
            }
            .query()
            .map(|q| q.label()),
            Some(RecordQuery::Month {
                year: 2025,
                month: 3
            }
            .label())
        );
    }

    #[test]
    fn test_request_execute_against_fixtures() {
        let loader = DataLoaderService::new(Box::new(crate::sources::JsonFileSource::new(
            std::path::PathBuf::from("tests/fixtures/productions"),
        )));

        match Request::Yearly(2025).execute(&loader).unwrap() {
            Report::Yearly(report) => assert_eq!(report.grand_total, 483),
            other => panic!("unexpected report: {:?}", other),
        }
    }
}
