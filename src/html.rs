//! HTML fragments for the DOM front end.
//!
//! Upstream text is always escaped; class names match the site stylesheet
//! (`neo-card`, `badge`, `t-item`, `reveal`, `skeleton`).

use crate::apod::ApodView;
use crate::highlights::HighlightItem;
use crate::panel::PanelView;
use crate::selection::NeoCard;
use crate::units::UnitPreference;

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Inner HTML of one `article.neo-card`.
pub fn neo_card_inner(card: &NeoCard) -> String {
    let badge = if card.hazardous {
        r#" <span class="badge badge-danger">PHO</span>"#
    } else {
        ""
    };
    let footer = match card.jpl_url {
        Some(ref url) => format!(
            r#"<div class="neo-footer"><a class="card-link" href="{}" target="_blank" rel="noopener">JPL details →</a></div>"#,
            escape(url)
        ),
        None => String::new(),
    };
    format!(
        concat!(
            r#"<h3>{name}{badge}</h3>"#,
            r#"<div class="neo-meta">"#,
            r#"<div><span class="badge">Closest approach:</span> {approach}</div>"#,
            r#"<div><span class="badge">Miss distance:</span> {miss}</div>"#,
            r#"<div><span class="badge">Speed:</span> {speed}</div>"#,
            r#"<div><span class="badge">Est. diameter:</span> {diameter}</div>"#,
            r#"<div><span class="badge">Abs. magnitude (H):</span> {magnitude}</div>"#,
            r#"</div>{footer}"#
        ),
        name = escape(&card.name),
        badge = badge,
        approach = escape(&card.approach),
        miss = escape(&card.miss_distance),
        speed = escape(&card.speed),
        diameter = escape(&card.diameter),
        magnitude = escape(&card.magnitude),
        footer = footer,
    )
}

/// Full inner HTML of the `#neo-grid` container for a panel view.
pub fn neo_grid(view: &PanelView) -> String {
    match view {
        PanelView::Idle => String::new(),
        PanelView::Skeleton { count } => {
            r#"<article class="neo-card skeleton" style="height:120px"></article>"#.repeat(*count)
        }
        PanelView::Empty { message } => {
            format!(r#"<div class="neo-card">{}</div>"#, escape(message))
        }
        PanelView::Unavailable { message } => {
            format!(r#"<article class="neo-card">{}</article>"#, escape(message))
        }
        PanelView::Cards { cards } => cards
            .iter()
            .map(|c| format!(r#"<article class="neo-card reveal visible">{}</article>"#, neo_card_inner(c)))
            .collect(),
    }
}

/// `aria-pressed` value for a `.unit-btn` carrying `data-unit`.
pub fn aria_pressed(data_unit: Option<&str>, active: UnitPreference) -> &'static str {
    if data_unit == Some(active.as_str()) {
        "true"
    } else {
        "false"
    }
}

/// Skeleton rows shown in the timeline while highlights load.
pub fn timeline_skeleton(count: usize) -> String {
    r#"<div class="t-item skeleton" style="height:52px"></div>"#.repeat(count)
}

/// Inner HTML of one `div.t-item`.
pub fn timeline_item_inner(item: &HighlightItem) -> String {
    let link = match item.href {
        Some(ref href) => format!(
            r#" <a href="{}" target="_blank" rel="noopener">→</a>"#,
            escape(href)
        ),
        None => String::new(),
    };
    format!(
        r#"<span class="t-date">{}</span><span class="t-short">{}</span><span class="t-text">{}{}</span>"#,
        escape(&item.date_label),
        escape(item.short_title.as_deref().unwrap_or("")),
        escape(&item.text),
        link
    )
}

/// The APOD `<img>` placed into `.apod-media`.
pub fn apod_image(view: &ApodView) -> String {
    format!(
        r#"<img src="{}" alt="{}" referrerpolicy="no-referrer">"#,
        escape(&view.image_url),
        escape(&view.alt),
    )
}
