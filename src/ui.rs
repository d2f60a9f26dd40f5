use ratatui::{
    Frame,
    layout::{Layout, Direction, Constraint, Rect},
    widgets::{Block, Borders, BorderType, List, ListItem, ListState, Paragraph, Wrap, Clear},
    style::{Color, Style, Modifier},
    text::{Line, Span},
};
use crate::app::{App, InputMode};
use crate::highlights::HighlightItem;
use crate::panel::{PanelSnapshot, PanelView};
use crate::selection::NeoCard;

const ACCENT: Color = Color::Cyan;
const DANGER: Color = Color::LightRed;
const DIM: Color = Color::DarkGray;

// ===============================
// Top-level draw
// ===============================
pub fn draw(f:&mut Frame, app:&App){
    let show_date = app.input_mode() == InputMode::DateEdit;
    let show_apod = app.apod_caption().is_some();

    let mut constraints: Vec<Constraint> = Vec::with_capacity(5);
    constraints.push(Constraint::Length(2));                                // header
    if show_date { constraints.push(Constraint::Length(3)); }               // date input
    constraints.push(Constraint::Min(0));                                   // body
    if show_apod { constraints.push(Constraint::Length(1)); }               // apod caption
    constraints.push(Constraint::Length(1));                                // footer

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut idx = 0usize;
    header(f, chunks[idx], app); idx += 1;
    if show_date {
        date_bar(f, chunks[idx], app); idx += 1;
    }
    body(f, chunks[idx], app); idx += 1;
    if show_apod {
        apod_line(f, chunks[idx], app); idx += 1;
    }
    footer(f, chunks[idx]);

    if app.toast_message().is_some() {
        draw_toast_modal(f, app);
    }
}

// ===============================
// Header / Date input
// ===============================
fn header(f:&mut Frame, area:Rect, app:&App){
    let snap = app.panel().snapshot();
    let unit_span = |label: &'static str, active: bool| {
        if active {
            Span::styled(format!("[{label}]"), Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        } else {
            Span::styled(format!(" {label} "), Style::default().fg(DIM))
        }
    };
    let metric = snap.unit == crate::units::UnitPreference::Metric;

    let line = Line::from(vec![
        Span::styled("Near-Earth Objects ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("· {} · ", snap.date)),
        Span::raw(format!("{} · ", snap.count_label)),
        Span::styled(snap.hazard_label.clone(), Style::default().fg(DANGER)),
        Span::raw("   "),
        unit_span("Metric", metric),
        unit_span("Imperial", !metric),
    ]);
    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::BOTTOM).border_type(BorderType::Plain));
    f.render_widget(paragraph, area);
}

fn date_bar(f:&mut Frame, area:Rect, app:&App){
    let text = app.date_input();
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(ACCENT))
        .block(Block::default()
            .title(" Date (yyyy-mm-dd, empty = today) ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(ACCENT)));
    f.render_widget(paragraph, area);

    if area.width > 2 {
        let x = area.x + 1 + (text.len().min((area.width.saturating_sub(2)) as usize) as u16);
        f.set_cursor_position((x, area.y + 1));
    }
}

// ===============================
// Body
// ===============================
fn body(f:&mut Frame, area:Rect, app:&App){
    const NARROW_THRESHOLD: u16 = 100;

    let Some(items) = app.highlights() else {
        render_neo_pane(f, area, app);
        return;
    };

    if area.width < NARROW_THRESHOLD {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);
        render_neo_pane(f, rows[0], app);
        render_highlights(f, rows[1], items);
    } else {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(3,5), Constraint::Ratio(2,5)])
            .split(area);
        render_neo_pane(f, cols[0], app);
        render_highlights(f, cols[1], items);
    }
}

fn card_lines(card: &NeoCard) -> Vec<Line<'static>> {
    let mut title = vec![Span::styled(card.name.clone(), Style::default().add_modifier(Modifier::BOLD))];
    if card.hazardous {
        title.push(Span::raw(" "));
        title.push(Span::styled("PHO", Style::default().fg(Color::Black).bg(DANGER)));
    }
    vec![
        Line::from(title),
        Line::from(format!("  Closest approach: {}", card.approach)),
        Line::from(format!("  Miss {} · Speed {}", card.miss_distance, card.speed)),
        Line::from(format!("  Est. diameter {} · H {}", card.diameter, card.magnitude)),
    ]
}

fn render_neo_pane(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" NeoWs ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT));

    let (text, style) = match app.panel().view() {
        PanelView::Cards { cards } => {
            let items: Vec<ListItem> = cards.iter().map(|c| ListItem::new(card_lines(c))).collect();
            let mut state = ListState::default();
            state.select(Some(app.selected_card().min(cards.len().saturating_sub(1))));
            let list = List::new(items)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
                .block(block);
            f.render_stateful_widget(list, area, &mut state);
            return;
        }
        PanelView::Idle => (String::new(), Style::default()),
        PanelView::Skeleton { count } => ("░░░░░░░░░░░░░░░░░░░░\n\n".repeat(*count), Style::default().fg(DIM)),
        PanelView::Empty { message } => (message.clone(), Style::default()),
        PanelView::Unavailable { message } => (message.clone(), Style::default().fg(DANGER)),
    };
    f.render_widget(Paragraph::new(text).style(style).wrap(Wrap { trim: false }).block(block), area);
}

fn render_highlights(f: &mut Frame, area: Rect, items: &[HighlightItem]) {
    let list: Vec<ListItem> = items.iter().map(|it| {
        let mut head = vec![Span::styled(it.date_label.clone(), Style::default().fg(ACCENT))];
        if let Some(ref t) = it.short_title {
            head.push(Span::raw("  "));
            head.push(Span::styled(t.clone(), Style::default().add_modifier(Modifier::BOLD)));
        }
        ListItem::new(vec![Line::from(head), Line::from(format!("  {}", it.text))])
    }).collect();

    let widget = List::new(list).block(Block::default()
        .title(" Highlights ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded));
    f.render_widget(widget, area);
}

fn apod_line(f:&mut Frame, area:Rect, app:&App){
    if let Some(caption) = app.apod_caption() {
        f.render_widget(Paragraph::new(caption).style(Style::default().fg(DIM)), area);
    }
}

fn footer(f:&mut Frame, area:Rect){
    let help = "r refresh · [/] day · t today · d date · u units · m metric · i imperial · ↑↓ select · q quit";
    f.render_widget(Paragraph::new(help).style(Style::default().fg(DIM)), area);
}

fn draw_toast_modal(f: &mut Frame, app: &App) {
    let Some(msg) = app.toast_message() else { return };
    let area = f.area();
    let width = (msg.chars().count() as u16 + 4).min(area.width);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height / 2,
        width,
        height: 3.min(area.height),
    };
    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(msg.to_string())
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded)),
        rect,
    );
}

// ===============================
// Plain text (--plain)
// ===============================
pub fn plain_lines(snap: &PanelSnapshot, highlights: Option<&[HighlightItem]>) -> Vec<String> {
    let mut out = vec![
        format!("Near-Earth Objects · {} · units: {}", snap.date, snap.unit),
        format!("{} · {}", snap.count_label, snap.hazard_label),
        String::new(),
    ];
    match snap.view {
        PanelView::Idle => {}
        PanelView::Skeleton { .. } => out.push("Loading…".to_string()),
        PanelView::Empty { ref message } | PanelView::Unavailable { ref message } => {
            out.push(message.clone())
        }
        PanelView::Cards { ref cards } => {
            for card in cards {
                let badge = if card.hazardous { " [PHO]" } else { "" };
                out.push(format!("{}{badge}", card.name));
                out.push(format!("  Closest approach: {}", card.approach));
                out.push(format!("  Miss distance:    {}", card.miss_distance));
                out.push(format!("  Speed:            {}", card.speed));
                out.push(format!("  Est. diameter:    {}", card.diameter));
                out.push(format!("  Abs. magnitude:   {}", card.magnitude));
                if let Some(ref url) = card.jpl_url {
                    out.push(format!("  JPL details:      {url}"));
                }
            }
        }
    }
    if let Some(items) = highlights {
        out.push(String::new());
        out.push("Highlights".to_string());
        for it in items {
            let title = it.short_title.as_deref().map(|t| format!(" [{t}]")).unwrap_or_default();
            out.push(format!("  {}{title}  {}", it.date_label, it.text));
        }
    }
    out
}
