//! TUI rendering: one hub screen, three interchangeable mode panels.
//!
//! ┌──────────────────────────────────────────────┐
//! │  ▒ hollowdeck   mode: state   drift 0.14     │
//! ├─────────────────────┬────────────────────────┤
//! │  Ports              │  state: compacted      │
//! │  ▸ /deck.core   OPEN│  trace: rerouted       │
//! │    /annex   FILTERED│  — no final state —    │
//! │    /agents/executor │  signal: degraded      │
//! │    ...              ├────────────────────────┤
//! │                     │  agent log             │
//! │                     │  signal accepted       │
//! ├─────────────────────┴────────────────────────┤
//! │  1/2/3 mode  j/k move  enter act  v gallery  │
//! └──────────────────────────────────────────────┘

use super::app::App;
use hollowdeck_core::Mode;
use ratatui::{prelude::*, widgets::*};

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(10),   // main
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);
    draw_main(f, rows[1], app);
    draw_keys(f, rows[2], app);

    if app.console_open() {
        draw_console(f, app);
    }
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    let uptime = app.uptime();
    let uptime = hollowdeck_core::format_uptime(uptime);
    let mut spans = vec![
        Span::styled(" ▒ hollowdeck ", Style::default().bold().fg(Color::Cyan)),
        Span::raw("  mode: "),
        Span::styled(app.mode().to_string(), Style::default().bold().fg(Color::Yellow)),
        Span::styled(
            format!("  drift {:.2}  up {uptime} ", app.drift()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(notice) = app.notice() {
        spans.push(Span::styled(
            format!(" {notice} "),
            Style::default().fg(Color::Magenta),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(spans));
    f.render_widget(block, area);
}

fn draw_main(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(area);

    draw_port_list(f, cols[0], app);

    if app.gallery_visible() {
        draw_gallery(f, cols[1], app);
        return;
    }

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(cols[1]);

    match app.mode() {
        Mode::Hub => draw_summary(f, right[0], app),
        Mode::Ports => draw_routing(f, right[0], app),
        Mode::State => draw_log(f, right[0], app),
    }
    draw_feeds(f, right[1], app);
}

fn draw_port_list(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .view()
        .ports
        .iter()
        .enumerate()
        .map(|(i, port)| {
            let pointer = if i == app.cursor() { "▸" } else { " " };
            let status_style = match port.status.as_str() {
                "OPEN" | "ACTIVE" => Style::default().fg(Color::Green),
                "LEAK" | "LOOPING" => Style::default().fg(Color::Red),
                "SILENT" => Style::default().fg(Color::DarkGray),
                _ => Style::default().fg(Color::Yellow),
            };
            let line = Line::from(vec![
                Span::raw(format!("{pointer} ")),
                Span::styled(
                    format!("{:<22}", port.route),
                    if i == app.cursor() {
                        Style::default().bg(Color::DarkGray).fg(Color::White)
                    } else if port.egress {
                        Style::default().fg(Color::Magenta)
                    } else {
                        Style::default().fg(Color::White)
                    },
                ),
                Span::styled(format!(" {:>8}", port.status), status_style),
                Span::styled(
                    format!("  {}", port.policy),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" ports "),
    );
    f.render_widget(list, area);
}

fn draw_summary(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .view()
        .summary
        .iter()
        .map(|s| {
            Line::from(vec![
                Span::styled(format!("{:<18}", s.label), Style::default().fg(Color::DarkGray)),
                Span::raw(s.value.clone()),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" hub summary ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_routing(f: &mut Frame, area: Rect, app: &App) {
    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let routing: Vec<Line> = app
        .view()
        .routing
        .iter()
        .map(|r| {
            Line::from(vec![
                Span::raw(format!("{:<22}", r.route)),
                Span::styled(format!("{:<9}", r.gate), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<9}", r.io), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<9}", r.action), Style::default().fg(Color::Yellow)),
                Span::styled(r.age.clone(), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" routing ");
    f.render_widget(Paragraph::new(routing).block(block), halves[0]);

    let handshakes: Vec<Line> = app
        .view()
        .handshakes
        .iter()
        .map(|h| {
            Line::from(vec![
                Span::raw(format!("{:<28}", h.route)),
                Span::styled(h.age.clone(), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" handshakes ");
    f.render_widget(Paragraph::new(handshakes).block(block), halves[1]);
}

fn draw_log(f: &mut Frame, area: Rect, app: &App) {
    // Tail-follow: keep the newest lines in view.
    let visible = area.height.saturating_sub(2) as usize;
    let log = &app.view().log;
    let skip = log.len().saturating_sub(visible);
    let lines: Vec<Line> = log
        .iter()
        .skip(skip)
        .map(|l| {
            if l.starts_with('—') {
                Line::styled(l.clone(), Style::default().fg(Color::DarkGray).italic())
            } else {
                Line::raw(l.clone())
            }
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" state log ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_feeds(f: &mut Frame, area: Rect, app: &App) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let trace: Vec<Line> = app.trace_lines().map(|l| Line::raw(l.clone())).collect();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" agent log ");
    f.render_widget(Paragraph::new(trace).block(block), cols[0]);

    let mut status: Vec<Line> = app
        .status_metrics()
        .iter()
        .map(|m| Line::styled(*m, Style::default().fg(Color::Gray)))
        .collect();
    for note in app.status_notes() {
        status.push(Line::styled(
            note.clone(),
            Style::default().fg(Color::DarkGray).italic(),
        ));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" state overlay ");
    f.render_widget(Paragraph::new(status).block(block), cols[1]);
}

fn draw_gallery(f: &mut Frame, area: Rect, app: &App) {
    let kinds = app.gallery_kinds();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Ratio(1, kinds.len() as u32);
            kinds.len()
        ])
        .split(area);

    for (i, kind) in kinds.iter().enumerate() {
        let text = app
            .view()
            .frames
            .get(i)
            .and_then(|t| t.as_deref())
            .unwrap_or("");
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {kind} "));
        f.render_widget(
            Paragraph::new(text).block(block).style(Style::default().fg(Color::Green)),
            cols[i],
        );
    }
}

fn draw_keys(f: &mut Frame, area: Rect, app: &App) {
    let keys = if app.console_open() {
        "  type to speak   enter: submit   esc: close".to_string()
    } else {
        format!(
            "  1/2/3: mode   j/k: move   enter: activate   v: gallery   i: console   q: quit   [{}]",
            app.corner_caption()
        )
    };
    f.render_widget(
        Paragraph::new(keys).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn draw_console(f: &mut Frame, app: &App) {
    let area = centered_rect(60, 40, f.area());
    f.render_widget(Clear, area);

    let mut lines = vec![Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::raw(app.console_input().to_string()),
        Span::styled("█", Style::default().fg(Color::Cyan)),
    ])];
    lines.push(Line::raw(""));
    for reply in app.console_replies() {
        lines.push(Line::styled(
            reply.clone(),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(format!(" input — {} ", app.corner_caption()));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Centered popup rect as a percentage of the parent.
fn centered_rect(pct_x: u16, pct_y: u16, parent: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ])
        .split(parent);
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ])
        .split(vert[1]);
    horiz[1]
}
