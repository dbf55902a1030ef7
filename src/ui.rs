use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use fivestar_core::{BulletRegion, ChatRole, SummaryStatus};
use crate::app::{App, InputMode};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let [product_area, side_area] = Layout::horizontal([
        Constraint::Percentage(60),
        Constraint::Percentage(40),
    ])
    .areas(body_area);

    render_product(app, frame, product_area);
    render_side(app, frame, side_area);

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let product = match &app.product_id {
        Some(id) => Span::styled(format!(" {} ", id), Style::default().fg(Color::Yellow)),
        None => Span::styled(" not a product page ", Style::default().fg(Color::DarkGray)),
    };

    let title = Line::from(vec![
        Span::styled(" FiveStar ", Style::default().fg(Color::Cyan).bold()),
        product,
        Span::styled(format!(" {} ", app.backend_url), Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let (mode_text, mode_style) = match app.input_mode {
        InputMode::Normal => (" NORMAL ", Style::default().bg(Color::Blue).fg(Color::White)),
        InputMode::Editing => (" CHAT ", Style::default().bg(Color::Yellow).fg(Color::Black)),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints: Vec<(&str, &str)> = match app.input_mode {
        InputMode::Normal => vec![
            (" j/k ", " scroll "),
            (" J/K ", " scroll chat "),
            (" i ", " chat "),
            (" q ", " quit "),
        ],
        InputMode::Editing => vec![
            (" Enter ", " send "),
            (" Esc ", " done "),
            (" Ctrl-C ", " quit "),
        ],
    };

    let mut spans = vec![Span::styled(mode_text, mode_style), Span::raw(" ")];
    for (key, label) in hints {
        spans.push(Span::styled(key, key_style));
        spans.push(Span::styled(label, label_style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Shown for a region whose request settled with nothing to display
const SETTLED_BLANK: &str = "—";

fn section_heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn dim(text: String) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
    ))
}

/// Title, summary, reviews and pros/cons in one scrollable panel
fn render_product(app: &mut App, frame: &mut Frame, area: Rect) {
    app.product_area = Some(area);

    let [url_area, details_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let url = Paragraph::new(app.popup.url.as_str())
        .block(Block::default().borders(Borders::ALL).title(" URL "))
        .style(Style::default().fg(Color::Blue));
    frame.render_widget(url, url_area);

    let mut lines: Vec<Line> = Vec::new();

    match app.popup.title.as_deref() {
        None => lines.push(dim(app.loading_text())),
        Some("") => lines.push(dim(SETTLED_BLANK.to_string())),
        Some(title) => lines.push(Line::from(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))),
    }
    lines.push(Line::default());

    lines.push(section_heading("Summary"));
    let summary = &app.popup.summary;
    for line in summary.display_lines() {
        lines.push(Line::from(line));
    }
    if summary.status == SummaryStatus::Idle && summary.lines.is_empty() {
        lines.push(dim(app.loading_text()));
    }
    lines.push(Line::default());

    lines.push(section_heading("Reviews"));
    match app.popup.reviews.as_deref() {
        Some(reviews) if !reviews.is_empty() => {
            for line in reviews.lines() {
                lines.push(Line::from(line.to_string()));
            }
        }
        _ if app.popup.reviews_settled => lines.push(dim(SETTLED_BLANK.to_string())),
        _ => lines.push(dim(app.loading_text())),
    }
    lines.push(Line::default());

    push_bullets(&mut lines, &app.popup.pros, Color::Green, app);
    lines.push(Line::default());
    push_bullets(&mut lines, &app.popup.cons, Color::Red, app);

    let details = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" Product "))
        .wrap(Wrap { trim: false })
        .scroll((app.product_scroll, 0));
    frame.render_widget(details, details_area);
}

fn push_bullets(lines: &mut Vec<Line<'static>>, region: &BulletRegion, color: Color, app: &App) {
    match region {
        BulletRegion::Loading => lines.push(dim(app.loading_text())),
        BulletRegion::Items { heading, items } => {
            lines.push(Line::from(Span::styled(
                heading.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            for item in items {
                lines.push(Line::from(vec![
                    Span::styled(" • ", Style::default().fg(color)),
                    Span::raw(item.clone()),
                ]));
            }
        }
        BulletRegion::Message(message) => lines.push(dim(message.clone())),
    }
}

/// Quote, chat history and chat input
fn render_side(app: &mut App, frame: &mut Frame, area: Rect) {
    let [quote_area, chat_area, input_area] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    let quote_text = if app.popup.quote.is_empty() {
        Text::from(dim(app.loading_text()))
    } else {
        Text::from(Span::styled(
            app.popup.quote.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        ))
    };
    let quote = Paragraph::new(quote_text)
        .block(Block::default().borders(Borders::ALL).title(" Quote "))
        .wrap(Wrap { trim: true });
    frame.render_widget(quote, quote_area);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    app.chat_area = Some(chat_area);
    app.chat_height = chat_area.height.saturating_sub(2);
    app.chat_width = chat_area.width.saturating_sub(2);

    let chat_text = if app.chat.history().is_empty() {
        Text::from(Span::styled(
            "Say something...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let mut lines: Vec<Line> = Vec::new();
        for msg in app.chat.history() {
            let (label, color) = match msg.role {
                ChatRole::User => ("You:", Color::Cyan),
                ChatRole::Bot => ("Bot:", Color::Yellow),
            };
            lines.push(Line::from(Span::styled(
                label,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            for line in msg.content.lines() {
                lines.push(Line::from(line.to_string()));
            }
            lines.push(Line::default());
        }
        Text::from(lines)
    };

    let chat = Paragraph::new(chat_text)
        .block(Block::default().borders(Borders::ALL).title(" Chat "))
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    let editing = app.input_mode == InputMode::Editing;
    let input_border = if editing { Color::Yellow } else { Color::DarkGray };
    let input = Paragraph::new(app.chat_input.as_str()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(input_border))
            .title(" Message (Enter to send) "),
    );
    frame.render_widget(input, input_area);

    if editing {
        let cursor_x = input_area
            .x
            .saturating_add(1)
            .saturating_add(cursor_column(&app.chat_input, app.chat_cursor));
        frame.set_cursor_position(Position::new(
            cursor_x.min(input_area.x.saturating_add(input_area.width.saturating_sub(2))),
            input_area.y.saturating_add(1),
        ));
    }
}

/// Display width of the first `cursor` characters of `input`
fn cursor_column(input: &str, cursor: usize) -> u16 {
    let prefix: String = input.chars().take(cursor).collect();
    u16::try_from(Line::from(prefix).width()).unwrap_or(u16::MAX)
}
