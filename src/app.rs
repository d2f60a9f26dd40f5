use crate::apod::{ApodView, APOD_UNAVAILABLE};
use crate::dates::{is_valid_date, shift_date, today_local};
use crate::highlights::HighlightItem;
use crate::panel::{LoadOutcome, LoadTicket, NeoPanel, ToggleOutcome};
use crate::prefs::UnitStore;
use crate::types::PanelEvent;
use crate::units::UnitPreference;
use std::time::{Duration, Instant};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode { Normal, DateEdit }

/// What the APOD line shows.
#[derive(Clone, Debug, PartialEq)]
pub enum ApodLine {
    Disabled,
    Loading,
    Ready(ApodView),
    Unavailable,
}

/// Terminal front-end state wrapped around the headless [`NeoPanel`].
///
/// Key handlers return the fetch the caller must start (if any); results
/// come back through [`App::on_event`].
pub struct App {
    quit: bool,
    panel: NeoPanel,
    input_mode: InputMode,
    date_input: String,
    selected_card: usize,

    highlights: Option<Vec<HighlightItem>>,
    apod: ApodLine,

    toast_message: Option<(String, Instant)>,
}

const TOAST_TTL: Duration = Duration::from_secs(3);

impl App {
    pub fn new(store: Box<dyn UnitStore>, initial_date: Option<String>, extras: bool) -> Self {
        Self {
            quit: false,
            panel: NeoPanel::new(store, initial_date),
            input_mode: InputMode::Normal,
            date_input: String::new(),
            selected_card: 0,
            highlights: None,
            apod: if extras { ApodLine::Loading } else { ApodLine::Disabled },
            toast_message: None,
        }
    }

    // ----- getters -----
    pub fn quit_flag(&self) -> bool { self.quit }
    pub fn panel(&self) -> &NeoPanel { &self.panel }
    pub fn input_mode(&self) -> InputMode { self.input_mode }
    pub fn date_input(&self) -> &str { &self.date_input }
    pub fn selected_card(&self) -> usize { self.selected_card }
    pub fn highlights(&self) -> Option<&[HighlightItem]> { self.highlights.as_deref() }
    pub fn apod(&self) -> &ApodLine { &self.apod }
    pub fn unit(&self) -> UnitPreference { self.panel.unit() }

    pub fn toast_message(&self) -> Option<&str> {
        match self.toast_message {
            Some((ref msg, at)) if at.elapsed() < TOAST_TTL => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn show_toast(&mut self, msg: String) {
        self.toast_message = Some((msg, Instant::now()));
    }

    pub fn request_quit(&mut self) { self.quit = true; }

    // ----- events -----
    pub fn on_event(&mut self, ev: PanelEvent) {
        match ev {
            PanelEvent::NeoFeed { ticket, result } => {
                if self.panel.finish_load(&ticket, result) == LoadOutcome::Applied {
                    self.selected_card = 0;
                }
            }
            PanelEvent::Highlights(items) => self.highlights = Some(items),
            PanelEvent::Apod(Ok(view)) => self.apod = ApodLine::Ready(view),
            PanelEvent::Apod(Err(e)) => {
                log::warn!("[app] APOD failed: {e}");
                self.apod = ApodLine::Unavailable;
            }
        }
    }

    // ----- panel actions -----
    pub fn load_initial(&mut self) -> LoadTicket {
        self.panel.refresh()
    }

    pub fn refresh(&mut self) -> LoadTicket {
        self.panel.refresh()
    }

    pub fn shift_day(&mut self, days: i64) -> LoadTicket {
        let date = shift_date(self.panel.selected_date(), days);
        self.panel.begin_load(&date)
    }

    pub fn jump_today(&mut self) -> LoadTicket {
        self.panel.begin_load(&today_local())
    }

    pub fn select_unit(&mut self, unit: UnitPreference) -> Option<LoadTicket> {
        let outcome = self.panel.select_unit(unit);
        self.after_toggle(outcome)
    }

    pub fn toggle_unit(&mut self) -> Option<LoadTicket> {
        let outcome = self.panel.toggle_unit();
        self.after_toggle(outcome)
    }

    fn after_toggle(&mut self, outcome: ToggleOutcome) -> Option<LoadTicket> {
        match outcome {
            ToggleOutcome::Unchanged => None,
            ToggleOutcome::Rerendered => {
                self.show_toast(format!("Units: {}", self.panel.unit()));
                None
            }
            ToggleOutcome::NeedsFetch(ticket) => Some(ticket),
        }
    }

    // ----- card selection -----
    pub fn card_count(&self) -> usize {
        match self.panel.view() {
            crate::panel::PanelView::Cards { cards } => cards.len(),
            _ => 0,
        }
    }

    pub fn up(&mut self) {
        self.selected_card = self.selected_card.saturating_sub(1);
    }

    pub fn down(&mut self) {
        let n = self.card_count();
        if n > 0 {
            self.selected_card = (self.selected_card + 1).min(n - 1);
        }
    }

    // ----- date editing -----
    pub fn start_date_edit(&mut self) {
        self.input_mode = InputMode::DateEdit;
        self.date_input = self.panel.selected_date().to_string();
    }

    pub fn date_add_char(&mut self, c: char) {
        if (c.is_ascii_digit() || c == '-') && self.date_input.len() < 10 {
            self.date_input.push(c);
        }
    }

    pub fn date_backspace(&mut self) {
        self.date_input.pop();
    }

    pub fn cancel_date_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        self.date_input.clear();
    }

    /// Commit the typed date. Empty input means today, like an empty
    /// date field; malformed input is rejected with a toast.
    pub fn apply_date_edit(&mut self) -> Option<LoadTicket> {
        let typed = std::mem::take(&mut self.date_input);
        self.input_mode = InputMode::Normal;
        let typed = typed.trim();
        if !typed.is_empty() && !is_valid_date(typed) {
            self.show_toast(format!("Not a yyyy-mm-dd date: {typed}"));
            return None;
        }
        Some(self.panel.begin_load(typed))
    }

    pub fn apod_caption(&self) -> Option<String> {
        match self.apod {
            ApodLine::Disabled => None,
            ApodLine::Loading => Some("APOD: loading…".to_string()),
            ApodLine::Ready(ref v) => Some(format!("APOD: {} ({})", v.title, v.link)),
            ApodLine::Unavailable => Some(APOD_UNAVAILABLE.to_string()),
        }
    }
}
