use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::cli::i18n::texts;
use crate::services::{ConnectionStatus, KeySource, ProviderService};

use super::{
    app::{App, Mode, ToastKind},
    data::{ProviderEntry, UiData},
    theme::Theme,
};

struct Regions {
    header: Rect,
    search: Option<Rect>,
    list: Rect,
    detail: Rect,
    footer: Rect,
}

fn show_search_bar(app: &App) -> bool {
    app.searching || !app.list.query().is_empty()
}

fn regions(area: Rect, app: &App) -> Regions {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let (search, body) = if show_search_bar(app) {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(root[1]);
        (Some(split[0]), split[1])
    } else {
        (None, root[1])
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(body);

    Regions {
        header: root[0],
        search,
        list: columns[0],
        detail: columns[1],
        footer: root[2],
    }
}

/// Rows available to list entries for a terminal of `area`.
pub fn list_viewport(area: Rect, app: &App) -> usize {
    regions(area, app).list.height.saturating_sub(2) as usize
}

fn selection_style(theme: &Theme) -> Style {
    if theme.no_color {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
            .fg(Color::Black)
            .bg(theme.primary)
            .add_modifier(Modifier::BOLD)
    }
}

fn chip_style(theme: &Theme) -> Style {
    if theme.no_color {
        Style::default()
    } else {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    }
}

fn pad_to_display_width(label: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(label);
    if w >= width {
        label.to_string()
    } else {
        format!("{label}{}", " ".repeat(width - w))
    }
}

fn truncate_to_display_width(text: &str, width: u16) -> String {
    let width = width as usize;
    if width == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    if width == 1 {
        return "…".to_string();
    }

    let mut out = String::new();
    let mut used = 0usize;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used.saturating_add(w) > width.saturating_sub(1) {
            break;
        }
        out.push(c);
        used = used.saturating_add(w);
    }
    out.push('…');
    out
}

fn key_bar_line(theme: &Theme, items: &[(&str, &str)]) -> Line<'static> {
    if theme.no_color {
        let parts: Vec<String> = items.iter().map(|(k, v)| format!("{k}={v}")).collect();
        return Line::raw(parts.join("  "));
    }

    let base = chip_style(theme);
    let key = base.add_modifier(Modifier::BOLD);
    let mut spans: Vec<Span<'static>> = vec![Span::styled(" ", base)];
    for (idx, (k, v)) in items.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled("  ", base));
        }
        spans.push(Span::styled((*k).to_string(), key));
        spans.push(Span::styled(" ", base));
        spans.push(Span::styled((*v).to_string(), base));
    }
    spans.push(Span::styled(" ", base));
    Line::from(spans)
}

fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);

    Rect {
        x: r.x + r.width.saturating_sub(width) / 2,
        y: r.y + r.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

pub fn render(frame: &mut Frame<'_>, app: &App, data: &UiData) {
    let theme = &app.theme;
    let regions = regions(frame.area(), app);

    render_header(frame, data, regions.header, theme);
    if let Some(area) = regions.search {
        render_search(frame, app, area, theme);
    }
    render_list(frame, app, regions.list, theme);
    render_detail(frame, app.list.selected(), regions.detail, theme);
    render_footer(frame, app, data, regions.footer, theme);

    if let Some(dialog) = &app.dialog {
        let (w, h) = dialog.size();
        let area = centered_rect_fixed(w, h, frame.area());
        dialog.render(frame, area, theme);
    }
}

fn render_header(frame: &mut Frame<'_>, data: &UiData, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(theme.dim));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(32)])
        .split(inner);

    let title = Line::from(vec![
        Span::styled(
            format!(" {}", texts::tui_app_title()),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(theme.dim),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let default_line = match data.default_name() {
        Some(name) => Line::from(vec![
            Span::styled("★ ", Style::default().fg(theme.warn)),
            Span::raw(texts::tui_header_default(name)),
        ]),
        None => Line::styled(texts::tui_header_no_default(), Style::default().fg(theme.dim)),
    };
    frame.render_widget(
        Paragraph::new(default_line).alignment(Alignment::Right),
        chunks[1],
    );
}

fn render_search(frame: &mut Frame<'_>, app: &App, area: Rect, theme: &Theme) {
    let border = if app.mode() == Mode::Searching {
        theme.primary
    } else {
        theme.dim
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", texts::tui_search_title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let query = app.list.query();
    let line = Line::from(vec![
        Span::styled("/ ", Style::default().fg(theme.accent)),
        Span::raw(query.to_string()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);

    if app.mode() == Mode::Searching {
        let x = inner.x + 2 + UnicodeWidthStr::width(query) as u16;
        frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

fn connection_cell(entry: &ProviderEntry, theme: &Theme) -> Span<'static> {
    match entry.status {
        ConnectionStatus::Unknown => Span::raw(""),
        ConnectionStatus::Testing => Span::styled("⟳", Style::default().fg(theme.warn)),
        ConnectionStatus::Ok => Span::styled(
            format!("●{}ms", entry.latency.map(|d| d.as_millis()).unwrap_or(0)),
            Style::default().fg(theme.ok),
        ),
        ConnectionStatus::Error => Span::styled("●", Style::default().fg(theme.err)),
    }
}

fn render_list(frame: &mut Frame<'_>, app: &App, area: Rect, theme: &Theme) {
    let list = &app.list;
    let title = texts::tui_list_title(list.configured_count(), list.items().len());

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(if app.mode() == Mode::Normal {
            theme.primary
        } else {
            theme.dim
        }))
        .title(format!(" {title} "));

    let range = list.visible_range();
    let hint = match (range.start > 0, range.end < list.len()) {
        (true, true) => Some(format!(
            " {}  {} ",
            texts::tui_more_above(),
            texts::tui_more_below()
        )),
        (true, false) => Some(format!(" {} ", texts::tui_more_above())),
        (false, true) => Some(format!(" {} ", texts::tui_more_below())),
        (false, false) => None,
    };
    if let Some(hint) = hint {
        block = block.title_bottom(Line::styled(hint, Style::default().fg(theme.dim)));
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if list.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::styled(
                format!("  {}", texts::tui_no_matches()),
                Style::default().fg(theme.dim),
            )),
            inner,
        );
        return;
    }

    let rows = list.filtered().map(|entry| {
        let configured = if entry.summary.is_configured {
            Span::styled("✓", Style::default().fg(theme.ok))
        } else {
            Span::styled("✗", Style::default().fg(theme.dim))
        };
        let default = if entry.summary.is_default {
            Span::styled("★", Style::default().fg(theme.warn))
        } else {
            Span::raw(" ")
        };
        Row::new(vec![
            Cell::from(entry.name().to_string()),
            Cell::from(entry.display_name().to_string()),
            Cell::from(Line::from(vec![configured, Span::raw(" "), default])),
            Cell::from(Line::from(connection_cell(entry, theme))),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Min(8),
            Constraint::Length(3),
            Constraint::Length(8),
        ],
    )
    .row_highlight_style(selection_style(theme))
    .highlight_symbol("▸ ");

    let mut state = TableState::default()
        .with_offset(list.offset())
        .with_selected(Some(list.cursor()));
    frame.render_stateful_widget(table, inner, &mut state);
}

fn kv_line(theme: &Theme, label: &str, value: Span<'static>) -> Line<'static> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            pad_to_display_width(label, 10),
            Style::default().fg(theme.dim).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        value,
    ])
}

fn status_span(entry: &ProviderEntry, theme: &Theme) -> Span<'static> {
    match entry.status {
        ConnectionStatus::Unknown => {
            Span::styled(texts::tui_status_not_tested(), Style::default().fg(theme.dim))
        }
        ConnectionStatus::Testing => {
            Span::styled(texts::tui_status_testing(), Style::default().fg(theme.warn))
        }
        ConnectionStatus::Ok => Span::styled(
            texts::tui_status_connected(entry.latency.map(|d| d.as_millis()).unwrap_or(0)),
            Style::default().fg(theme.ok),
        ),
        ConnectionStatus::Error => Span::styled(
            texts::tui_status_error(entry.detail.as_deref().unwrap_or("")),
            Style::default().fg(theme.err),
        ),
    }
}

fn render_detail(frame: &mut Frame<'_>, entry: Option<&ProviderEntry>, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(theme.dim))
        .title(format!(" {} ", texts::tui_detail_title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(entry) = entry else {
        frame.render_widget(
            Paragraph::new(Line::styled(
                format!(" {}", texts::tui_no_selection()),
                Style::default().fg(theme.dim),
            )),
            inner,
        );
        return;
    };

    let value_width = inner.width.saturating_sub(12);
    let s = &entry.summary;
    let text = |v: &str| Span::styled(truncate_to_display_width(v, value_width), Style::default().fg(theme.text));

    let kind = match s.category {
        Some(category) => category.as_str().to_string(),
        None => texts::tui_kind_custom().to_string(),
    };
    let key = match s.key_source {
        KeySource::Config => Span::styled(texts::tui_key_from_config(), Style::default().fg(theme.ok)),
        KeySource::Env => Span::styled(
            texts::tui_key_from_env(&ProviderService::env_var_name(&s.name)),
            Style::default().fg(theme.ok),
        ),
        KeySource::Missing => Span::styled(texts::tui_key_missing(), Style::default().fg(theme.err)),
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" {}", s.display_name),
                Style::default()
                    .fg(theme.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                if s.is_default { "  ★" } else { "" },
                Style::default().fg(theme.warn),
            ),
        ]),
        Line::raw(""),
        kv_line(theme, texts::tui_label_name(), text(&s.name)),
        kv_line(theme, texts::tui_label_type(), text(&kind)),
        kv_line(theme, texts::tui_label_model(), text(&s.model)),
        kv_line(theme, texts::tui_label_url(), text(&s.base_url)),
    ];
    if !s.key_url.is_empty() {
        lines.push(kv_line(theme, texts::tui_label_key_url(), text(&s.key_url)));
    }
    lines.push(kv_line(theme, texts::tui_label_api_key(), key));
    lines.push(Line::raw(""));
    lines.push(kv_line(theme, texts::tui_label_status(), status_span(entry, theme)));
    if entry.status == ConnectionStatus::Ok {
        if let Some(hint) = &entry.detail {
            lines.push(Line::styled(format!(" {hint}"), Style::default().fg(theme.warn)));
        }
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_footer(frame: &mut Frame<'_>, app: &App, data: &UiData, area: Rect, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(area);

    let line = if let Some(toast) = &app.toast {
        let color = match toast.kind {
            ToastKind::Info => theme.accent,
            ToastKind::Success => theme.ok,
            ToastKind::Warning => theme.warn,
            ToastKind::Error => theme.err,
        };
        Line::styled(format!(" {}", toast.message), Style::default().fg(color))
    } else {
        match app.mode() {
            Mode::Searching => key_bar_line(
                theme,
                &[
                    ("Enter", texts::tui_key_keep_filter()),
                    ("Esc", texts::tui_key_clear_filter()),
                    ("↑↓", texts::tui_key_move()),
                ],
            ),
            Mode::DialogOpen => Line::raw(""),
            Mode::Normal => {
                let mut line = key_bar_line(
                    theme,
                    &[
                        ("Enter", texts::tui_key_run()),
                        ("e", texts::tui_key_edit()),
                        ("t", texts::tui_key_test()),
                        ("d", texts::tui_key_default()),
                        ("r", texts::tui_key_remove()),
                        ("/", texts::tui_key_search()),
                        ("?", texts::tui_key_help()),
                        ("q", texts::tui_key_quit()),
                    ],
                );
                if data.default_name().is_none() {
                    line.spans.push(Span::styled(
                        format!("  {}", texts::tui_footer_no_default_hint()),
                        Style::default().fg(theme.dim),
                    ));
                }
                line
            }
        }
    };
    frame.render_widget(Paragraph::new(line), chunks[0]);
    frame.render_widget(
        Paragraph::new(Line::raw(theme.icon())).alignment(Alignment::Right),
        chunks[1],
    );
}
