// UI rendering for the Projects page
use crate::App;
use folio_core::{theme::Color as ThemeColor, FeedStatus, Palette, RepositoryRecord};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

const SKELETON_CARDS: usize = 4;

pub fn render(frame: &mut Frame, app: &mut App) {
    let palette = app.theme.palette();
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(tui_color(palette.background))),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Cards
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_header(frame, app, &palette, chunks[0]);

    match app.status() {
        FeedStatus::Loading => render_skeleton(frame, &palette, chunks[1]),
        FeedStatus::Failed => render_failure(frame, &palette, chunks[1]),
        FeedStatus::Ready if app.records().is_empty() => render_empty(frame, &palette, chunks[1]),
        FeedStatus::Ready => render_cards(frame, app, &palette, chunks[1]),
    }

    render_status_bar(frame, app, &palette, chunks[2]);
}

fn tui_color(color: ThemeColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn render_header(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled(
                "Projects",
                Style::default()
                    .fg(tui_color(palette.title))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  github.com/{}", app.username()),
                Style::default().fg(tui_color(palette.muted)),
            ),
        ]),
        Line::from(Span::styled(
            "Open-source work and personal projects from GitHub",
            Style::default().fg(tui_color(palette.foreground)),
        )),
    ];

    let header = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(tui_color(palette.border))),
    );
    frame.render_widget(header, area);
}

fn cards_block<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(tui_color(palette.border)))
}

/// Placeholder cards while the feed is loading
fn render_skeleton(frame: &mut Frame, palette: &Palette, area: Rect) {
    let bar = Style::default().fg(tui_color(palette.skeleton));
    let width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = (0..SKELETON_CARDS)
        .map(|_| {
            ListItem::new(vec![
                Line::from(Span::styled("█".repeat(width.min(24)), bar)),
                Line::from(Span::styled("▒".repeat(width.min(48)), bar)),
                Line::from(Span::styled("▒".repeat(width.min(32)), bar)),
                Line::from(""),
            ])
        })
        .collect();

    frame.render_widget(
        List::new(items).block(cards_block(" Projects (Loading...) ", palette)),
        area,
    );
}

fn render_failure(frame: &mut Frame, palette: &Palette, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Could not load repositories",
            Style::default()
                .fg(tui_color(palette.error))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press r to try again",
            Style::default().fg(tui_color(palette.muted)),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(cards_block(" Projects ", palette))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_empty(frame: &mut Frame, palette: &Palette, area: Rect) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "No repositories to show",
            Style::default().fg(tui_color(palette.muted)),
        )),
    ])
    .block(cards_block(" Projects (0) ", palette))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_cards(frame: &mut Frame, app: &mut App, palette: &Palette, area: Rect) {
    let desc_max_length = area.width.saturating_sub(6) as usize;

    let items: Vec<ListItem> = app
        .records()
        .iter()
        .enumerate()
        .map(|(i, record)| card(record, i == app.selected_index, desc_max_length, palette))
        .collect();

    let title = format!(" Projects ({}) ", items.len());
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(tui_color(palette.border_focused))),
        )
        .highlight_style(Style::default().bg(tui_color(palette.selected_bg)));

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn card(
    record: &RepositoryRecord,
    selected: bool,
    desc_max_length: usize,
    palette: &Palette,
) -> ListItem<'static> {
    let name_style = if selected {
        Style::default()
            .fg(tui_color(palette.primary))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(tui_color(palette.foreground))
            .add_modifier(Modifier::BOLD)
    };
    let muted = Style::default().fg(tui_color(palette.muted));

    let line1 = Line::from(vec![
        Span::styled(record.name.clone(), name_style),
        Span::styled("  ↗ ", muted),
        Span::styled(record.url.clone(), muted),
    ]);

    let description = record
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("No description available");
    let line2 = Line::from(Span::styled(
        truncate(description, desc_max_length),
        Style::default().fg(tui_color(palette.foreground)),
    ));

    let mut meta = Vec::new();
    if let Some(language) = &record.language {
        meta.push(Span::styled("● ", Style::default().fg(tui_color(palette.primary))));
        meta.push(Span::styled(language.clone(), muted));
        meta.push(Span::raw("  "));
    }
    if record.stars > 0 {
        meta.push(Span::styled(
            format!("★ {}", format_number(record.stars)),
            Style::default().fg(tui_color(palette.stars)),
        ));
        meta.push(Span::raw("  "));
    }
    if let Some(updated) = record.updated_at {
        meta.push(Span::styled(
            format!("updated {}", updated.format("%Y-%m-%d")),
            muted,
        ));
        meta.push(Span::raw("  "));
    }
    for topic in &record.topics {
        meta.push(Span::styled(format!("#{} ", topic), muted));
    }

    ListItem::new(vec![line1, line2, Line::from(meta), Line::from("")])
}

fn render_status_bar(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let status = if let Some(message) = &app.status_message {
        Span::styled(message.as_str(), Style::default().fg(tui_color(palette.primary)))
    } else {
        Span::styled(
            format!(
                "t: theme ({}) | r: reload | j/k: navigate | o: open | q: back",
                app.theme
            ),
            Style::default().fg(tui_color(palette.muted)),
        )
    };

    frame.render_widget(Paragraph::new(Line::from(status)), area);
}

fn format_number(num: u32) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}k", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{app_with, record, settle, StaticSource};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_loading_shows_skeleton() {
        let mut app = app_with(StaticSource(Some(Vec::new())));
        let text = screen(&mut app);

        assert!(text.contains("Projects (Loading...)"));
        assert!(text.contains("Open-source work and personal projects from GitHub"));
    }

    #[tokio::test]
    async fn test_ready_shows_cards() {
        let mut described = record(3, "folio", 12);
        described.description = Some("Terminal portfolio".to_string());
        described.topics = vec!["tui".to_string()];

        let mut app = app_with(StaticSource(Some(vec![
            record(1, "a", 0),
            record(2, "old-repo", 5),
            described,
        ])));
        app.activate();
        settle(&mut app).await;

        let text = screen(&mut app);
        assert!(text.contains("Projects (2)"));
        assert!(text.contains("No description available"));
        assert!(text.contains("Terminal portfolio"));
        assert!(text.contains("★ 12"));
        assert!(text.contains("#tui"));
        assert!(!text.contains("old-repo"));
    }

    #[tokio::test]
    async fn test_zero_stars_are_hidden() {
        let mut app = app_with(StaticSource(Some(vec![record(1, "quiet", 0)])));
        app.activate();
        settle(&mut app).await;

        assert!(!screen(&mut app).contains('★'));
    }

    #[tokio::test]
    async fn test_failed_shows_notice() {
        let mut app = app_with(StaticSource(None));
        app.activate();
        settle(&mut app).await;

        let text = screen(&mut app);
        assert!(text.contains("Could not load repositories"));
    }

    #[tokio::test]
    async fn test_empty_feed() {
        let mut app = app_with(StaticSource(Some(vec![record(1, "old-repo", 1)])));
        app.activate();
        settle(&mut app).await;

        assert!(screen(&mut app).contains("No repositories to show"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer description", 10), "a much ...");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_500), "1.5k");
        assert_eq!(format_number(2_000_000), "2.0M");
    }
}
