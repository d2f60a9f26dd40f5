#![cfg_attr(target_arch = "wasm32", no_main)]

// DOM front end for neowatch.
//
// Expects the page to provide:
//   #neo-grid, #neo-count, #neo-hazard, #neo-date (input), #neo-refresh,
//   .unit-btn[data-unit="metric"|"imperial"]
// and optionally `#highlights .timeline` and `#apod-container` (with
// `.apod-media`, `#apod-title`, `#apod-link`).
// Pages without the date input or refresh button are left alone.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{window, Document, Element, HtmlElement, HtmlInputElement};

use neowatch::{
    apod,
    config::Config,
    dates::today_local,
    highlights, html, neo_api,
    prefs::UnitStore,
    LoadTicket, NeoPanel, ToggleOutcome, UnitPreference,
};

const HIGHLIGHT_SKELETONS: usize = 4;

/// `localStorage`-backed unit preference.
struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        window()?.local_storage().ok().flatten()
    }
}

impl UnitStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let storage = Self::storage().ok_or_else(|| anyhow::anyhow!("localStorage unavailable"))?;
        storage
            .set_item(key, value)
            .map_err(|e| anyhow::anyhow!("localStorage.setItem failed: {e:?}"))
    }
}

/// Elements the panel writes to.
struct Dom {
    grid: Element,
    count: Option<Element>,
    hazard: Option<Element>,
    date: HtmlInputElement,
    refresh: Element,
    unit_buttons: Vec<HtmlElement>,
}

impl Dom {
    fn resolve(doc: &Document) -> Option<Dom> {
        let date = doc.get_element_by_id("neo-date")?.dyn_into::<HtmlInputElement>().ok()?;
        let refresh = doc.get_element_by_id("neo-refresh")?;
        let grid = doc.get_element_by_id("neo-grid")?;

        let mut unit_buttons = Vec::new();
        if let Ok(list) = doc.query_selector_all(".unit-btn") {
            for i in 0..list.length() {
                if let Some(el) = list.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                    unit_buttons.push(el);
                }
            }
        }

        Some(Dom {
            grid,
            count: doc.get_element_by_id("neo-count"),
            hazard: doc.get_element_by_id("neo-hazard"),
            date,
            refresh,
            unit_buttons,
        })
    }
}

struct Page {
    cfg: Config,
    dom: Dom,
    panel: RefCell<NeoPanel>,
}

impl Page {
    fn paint(&self) {
        let panel = self.panel.borrow();
        self.dom.grid.set_inner_html(&html::neo_grid(panel.view()));
        if let Some(ref el) = self.dom.count {
            el.set_text_content(Some(panel.count_label()));
        }
        if let Some(ref el) = self.dom.hazard {
            el.set_text_content(Some(panel.hazard_label()));
        }
        self.paint_unit_buttons(panel.unit());
    }

    fn paint_unit_buttons(&self, unit: UnitPreference) {
        for btn in &self.dom.unit_buttons {
            let pressed = html::aria_pressed(btn.get_attribute("data-unit").as_deref(), unit);
            let _ = btn.set_attribute("aria-pressed", pressed);
        }
    }
}

fn spawn_fetch(page: Rc<Page>, ticket: LoadTicket) {
    spawn_local(async move {
        let result =
            neo_api::fetch_neo_feed(&page.cfg.neo_feed_url, &page.cfg.nasa_api_key, &ticket.date).await;
        page.panel.borrow_mut().finish_load(&ticket, result);
        page.paint();
    });
}

fn load_from_input(page: &Rc<Page>) {
    let input = page.dom.date.value();
    let ticket = page.panel.borrow_mut().begin_load(&input);
    page.dom.date.set_value(&ticket.date);
    page.paint();
    spawn_fetch(page.clone(), ticket);
}

fn on<F>(target: &web_sys::EventTarget, kind: &str, handler: F)
where
    F: FnMut(web_sys::Event) + 'static,
{
    let cb = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    if let Err(e) = target.add_event_listener_with_callback(kind, cb.as_ref().unchecked_ref()) {
        log::warn!("[dom] addEventListener({kind}) failed: {e:?}");
    }
    cb.forget();
}

fn mount_panel(doc: &Document, cfg: Config) {
    let Some(dom) = Dom::resolve(doc) else {
        log::debug!("[dom] NEO panel markup not found; skipping");
        return;
    };

    let initial = Some(dom.date.value()).filter(|v| !v.is_empty());
    let panel = NeoPanel::new(Box::new(LocalStorageStore), initial);
    let page = Rc::new(Page {
        cfg,
        dom,
        panel: RefCell::new(panel),
    });

    {
        let p = page.clone();
        on(&page.dom.refresh, "click", move |_| load_from_input(&p));
    }
    {
        let p = page.clone();
        on(&page.dom.date, "change", move |_| load_from_input(&p));
    }
    for btn in &page.dom.unit_buttons {
        let p = page.clone();
        let target = btn.clone();
        on(btn, "click", move |_| {
            let Some(unit) = target
                .get_attribute("data-unit")
                .and_then(|u| u.parse::<UnitPreference>().ok())
            else {
                return;
            };
            let outcome = p.panel.borrow_mut().select_unit(unit);
            match outcome {
                ToggleOutcome::Unchanged => {}
                ToggleOutcome::Rerendered => p.paint(),
                ToggleOutcome::NeedsFetch(ticket) => {
                    p.paint();
                    spawn_fetch(p.clone(), ticket);
                }
            }
        });
    }

    page.paint_unit_buttons(page.panel.borrow().unit());
    load_from_input(&page);
}

fn mount_highlights(doc: &Document, cfg: Config) {
    let Ok(Some(timeline)) = doc.query_selector("#highlights .timeline") else {
        return;
    };
    timeline.set_inner_html(&html::timeline_skeleton(HIGHLIGHT_SKELETONS));

    let doc = doc.clone();
    spawn_local(async move {
        let items = highlights::build_highlights(&cfg, &today_local()).await;
        timeline.set_inner_html("");
        for item in &items {
            let Ok(el) = doc.create_element("div") else { continue };
            el.set_class_name("t-item reveal visible");
            let _ = el.set_attribute("data-delay", &item.delay_ms.to_string());
            let _ = el.set_attribute("style", &format!("transition-delay:{}ms", item.delay_ms));
            el.set_inner_html(&html::timeline_item_inner(item));
            if let Err(e) = timeline.append_child(&el) {
                log::warn!("[dom] timeline append failed: {e:?}");
            }
        }
    });
}

fn mount_apod(doc: &Document, cfg: Config) {
    let Some(container) = doc.get_element_by_id("apod-container") else {
        return;
    };
    let media = container.query_selector(".apod-media").ok().flatten();
    let caption = container.query_selector("#apod-title").ok().flatten();
    let link = container.query_selector("#apod-link").ok().flatten();

    spawn_local(async move {
        let result = apod::fetch_apod(&cfg.apod_url, &cfg.nasa_api_key).await;
        let _ = container.class_list().remove_1("loading");
        match result {
            Ok(view) => {
                if let Some(ref media) = media {
                    media.set_inner_html(&html::apod_image(&view));
                }
                if let Some(ref caption) = caption {
                    caption.set_text_content(Some(&view.title));
                }
                if let Some(ref link) = link {
                    let _ = link.set_attribute("href", &view.link);
                }
            }
            Err(e) => {
                log::warn!("[dom] APOD failed: {e}");
                if let Some(ref media) = media {
                    media.set_inner_html("");
                }
                if let Some(ref caption) = caption {
                    caption.set_text_content(Some(apod::APOD_UNAVAILABLE));
                }
                if let Some(ref link) = link {
                    let _ = link.remove_attribute("href");
                }
            }
        }
    });
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    let Some(doc) = window().and_then(|w| w.document()) else {
        log::error!("[dom] no document; nothing to mount");
        return;
    };

    let cfg = Config::web_default();
    mount_panel(&doc, cfg.clone());
    if cfg.highlights {
        mount_highlights(&doc, cfg.clone());
        mount_apod(&doc, cfg);
    }
    log::info!("[dom] neowatch mounted");
}

// Native builds: just provide a stub main so `cargo build --all-features` doesn't explode.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("neowatch-web-dom is only supported on wasm32 (browser) target.");
}
