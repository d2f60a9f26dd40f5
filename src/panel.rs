//! The NEO panel: fetch lifecycle, render cache and unit toggle.
//!
//! The panel is headless. Front ends call [`NeoPanel::begin_load`], run the
//! fetch themselves, hand the result back through [`NeoPanel::finish_load`]
//! and paint whatever [`NeoPanel::snapshot`] returns.

use serde::Serialize;

use crate::dates::today_local;
use crate::error::NeoError;
use crate::prefs::{load_unit, save_unit, UnitStore};
use crate::selection::{empty_message, select, NeoCard};
use crate::types::NeoFeedResponse;
use crate::units::{UnitPreference, DASH};

/// Placeholder cards shown while a fetch is in flight.
pub const SKELETON_CARDS: usize = 3;

pub const UNAVAILABLE_MESSAGE: &str = "NeoWs is unavailable right now. Please try again later.";

/// Identifies one fetch. Only the most recently issued ticket may repaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadTicket {
    pub id: u64,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Idle,
    Loading { date: String },
    Rendered { date: String },
    Failed { date: String, error: NeoError },
}

/// What the grid container currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelView {
    Idle,
    Skeleton { count: usize },
    Empty { message: String },
    Cards { cards: Vec<NeoCard> },
    Unavailable { message: String },
}

#[derive(Debug, Clone)]
pub struct RenderCache {
    pub date: String,
    pub payload: NeoFeedResponse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer ticket was issued after this one; the result was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Unchanged,
    /// Re-rendered from the cached payload, no network call needed.
    Rerendered,
    /// Nothing cached yet; the caller must run this fetch.
    NeedsFetch(LoadTicket),
}

/// Everything a front end needs to paint the panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSnapshot {
    pub date: String,
    pub unit: UnitPreference,
    pub loading: bool,
    pub count_label: String,
    pub hazard_label: String,
    pub view: PanelView,
}

pub struct NeoPanel {
    unit: UnitPreference,
    store: Box<dyn UnitStore>,
    selected_date: String,
    state: PanelState,
    cache: Option<RenderCache>,
    next_id: u64,
    latest_id: Option<u64>,

    count_label: String,
    hazard_label: String,
    view: PanelView,
}

impl NeoPanel {
    /// Build a panel, reading the unit preference from `store` once.
    /// `initial_date` seeds the date input (today when `None`).
    pub fn new(store: Box<dyn UnitStore>, initial_date: Option<String>) -> Self {
        let unit = load_unit(store.as_ref());
        log::debug!("[panel] starting with units={unit}");
        Self {
            unit,
            store,
            selected_date: initial_date
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(today_local),
            state: PanelState::Idle,
            cache: None,
            next_id: 1,
            latest_id: None,
            count_label: DASH.to_string(),
            hazard_label: DASH.to_string(),
            view: PanelView::Idle,
        }
    }

    // ----- getters -----
    pub fn unit(&self) -> UnitPreference { self.unit }
    pub fn selected_date(&self) -> &str { &self.selected_date }
    pub fn state(&self) -> &PanelState { &self.state }
    pub fn cache(&self) -> Option<&RenderCache> { self.cache.as_ref() }
    pub fn view(&self) -> &PanelView { &self.view }
    pub fn count_label(&self) -> &str { &self.count_label }
    pub fn hazard_label(&self) -> &str { &self.hazard_label }
    pub fn is_loading(&self) -> bool { matches!(self.state, PanelState::Loading { .. }) }

    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            date: self.selected_date.clone(),
            unit: self.unit,
            loading: self.is_loading(),
            count_label: self.count_label.clone(),
            hazard_label: self.hazard_label.clone(),
            view: self.view.clone(),
        }
    }

    // ----- transitions -----

    /// Enter `Loading` for the date typed into the date control.
    /// An empty input means today.
    pub fn begin_load(&mut self, date_input: &str) -> LoadTicket {
        let date = match date_input.trim() {
            "" => today_local(),
            d => d.to_string(),
        };
        let id = self.next_id;
        self.next_id += 1;
        self.latest_id = Some(id);

        log::debug!("[panel] load #{id} for {date}");
        self.selected_date = date.clone();
        self.state = PanelState::Loading { date: date.clone() };
        self.view = PanelView::Skeleton {
            count: SKELETON_CARDS,
        };
        LoadTicket { id, date }
    }

    /// Re-fetch the currently selected date (refresh control).
    pub fn refresh(&mut self) -> LoadTicket {
        let date = self.selected_date.clone();
        self.begin_load(&date)
    }

    /// Apply a finished fetch. Results for superseded tickets are dropped.
    pub fn finish_load(
        &mut self,
        ticket: &LoadTicket,
        result: Result<NeoFeedResponse, NeoError>,
    ) -> LoadOutcome {
        if self.latest_id != Some(ticket.id) {
            log::debug!(
                "[panel] dropping stale load #{} for {} (latest #{:?})",
                ticket.id,
                ticket.date,
                self.latest_id
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(payload) => {
                self.cache = Some(RenderCache {
                    date: ticket.date.clone(),
                    payload,
                });
                self.render_from_cache();
            }
            Err(error) => {
                log::warn!("[panel] NeoWs fetch for {} failed: {error}", ticket.date);
                self.count_label = DASH.to_string();
                self.hazard_label = DASH.to_string();
                self.view = PanelView::Unavailable {
                    message: UNAVAILABLE_MESSAGE.to_string(),
                };
                self.state = PanelState::Failed {
                    date: ticket.date.clone(),
                    error,
                };
            }
        }
        LoadOutcome::Applied
    }

    /// Switch units. Persists the choice and re-renders from cache when
    /// possible; otherwise hands back a fetch for the selected date.
    pub fn select_unit(&mut self, unit: UnitPreference) -> ToggleOutcome {
        if unit == self.unit {
            return ToggleOutcome::Unchanged;
        }
        self.unit = unit;
        save_unit(self.store.as_mut(), unit);
        log::debug!("[panel] units -> {unit}");

        if self.cache.is_some() {
            self.render_from_cache();
            ToggleOutcome::Rerendered
        } else {
            ToggleOutcome::NeedsFetch(self.refresh())
        }
    }

    pub fn toggle_unit(&mut self) -> ToggleOutcome {
        self.select_unit(self.unit.toggled())
    }

    fn render_from_cache(&mut self) {
        let Some(cache) = self.cache.as_ref() else {
            return;
        };
        let selection = select(cache.payload.objects_for(&cache.date), self.unit);
        self.count_label = selection.count_label();
        self.hazard_label = selection.hazard_label();
        self.view = if selection.cards.is_empty() {
            PanelView::Empty {
                message: empty_message(&cache.date),
            }
        } else {
            PanelView::Cards {
                cards: selection.cards,
            }
        };
        self.state = PanelState::Rendered {
            date: cache.date.clone(),
        };
    }
}
