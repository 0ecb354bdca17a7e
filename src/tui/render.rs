use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::models::MessageRole;
use crate::tui::app::ChatApp;

/// Slash commands offered in the hint box
const SLASH_COMMANDS: [(&str, &str); 4] = [
    ("/help", "Show available commands"),
    ("/schema", "Toggle the schema sidebar"),
    ("/clear", "Clear the transcript"),
    ("/quit", "Quit the application"),
];

/// Render the main UI
pub fn render_ui(frame: &mut Frame, app: &ChatApp) {
    // Create main layout; the input area grows while command hints show
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints(
            [
                Constraint::Length(3),                 // Header
                Constraint::Min(10),                   // Main content
                Constraint::Length(input_height(app)), // Input
                Constraint::Length(1),                 // Status bar
            ]
            .as_ref(),
        )
        .split(frame.area());

    // Render header
    render_header(frame, chunks[0], app);

    // Split main content area
    let content_chunks = if app.show_schema {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
            .split(chunks[1])
    } else {
        std::rc::Rc::new([Rect::default(), chunks[1]])
    };

    // Render schema sidebar if visible
    if app.show_schema {
        render_schema(frame, content_chunks[0], app);
    }

    // Render transcript area
    render_transcript(frame, content_chunks[1], app);

    // Render input area
    render_input(frame, chunks[2], app);

    // Render status bar
    render_status_bar(frame, chunks[3], app);
}

/// Height of the input region, including the hint box when it shows
fn input_height(app: &ChatApp) -> u16 {
    if app.input.starts_with('/') {
        let hints = filtered_commands(&app.input).len() as u16;
        3 + (hints + 3).min(9)
    } else {
        3
    }
}

/// Commands matching what the user typed so far
fn filtered_commands(input: &str) -> Vec<(&'static str, &'static str)> {
    let typed = input.trim_start_matches('/').to_lowercase();
    SLASH_COMMANDS
        .iter()
        .filter(|(cmd, _)| cmd.trim_start_matches('/').starts_with(&typed))
        .copied()
        .collect()
}

/// Render the header
fn render_header(frame: &mut Frame, area: Rect, app: &ChatApp) {
    let header_text = vec![Line::from(vec![
        Span::styled(
            "TableTalk",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | Backend: "),
        Span::styled(&app.backend_name, Style::default().fg(Color::Green)),
        Span::raw(" | "),
        Span::styled(&app.dataset_path, Style::default().fg(Color::Gray)),
    ])];

    let header = Paragraph::new(header_text)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(header, area);
}

/// Render the sidebar with the column descriptions
fn render_schema(frame: &mut Frame, area: Rect, app: &ChatApp) {
    let mut items = Vec::new();

    items.push(ListItem::new(Line::from(Span::styled(
        format!("{} described fields", app.descriptions.len()),
        Style::default().fg(Color::Gray),
    ))));
    items.push(ListItem::new(""));

    for (name, description) in app.descriptions.iter() {
        items.push(ListItem::new(Line::from(vec![
            Span::styled(name.to_string(), Style::default().fg(Color::Yellow)),
            Span::raw(": "),
            Span::raw(description.to_string()),
        ])));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Schema ")
                .borders(Borders::RIGHT)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(list, area);
}

/// Render the transcript area
fn render_transcript(frame: &mut Frame, area: Rect, app: &ChatApp) {
    let mut lines = Vec::new();

    for msg in &app.entries {
        // Add role indicator
        let (tag, color) = match msg.role {
            MessageRole::User => ("You", Color::Blue),
            MessageRole::Assistant => ("TableTalk", Color::Green),
            MessageRole::System => ("System", Color::Yellow),
        };

        lines.push(Line::from(Span::styled(
            format!("[{}] ", tag),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));

        // Add message content (split by lines)
        for line in msg.content.lines() {
            lines.push(Line::from(line.to_string()));
        }

        lines.push(Line::from("")); // Empty line between entries
    }

    // Typing indicator while a turn is in flight
    if app.is_thinking {
        lines.push(Line::from(vec![
            Span::styled(
                "[TableTalk] ",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "▋",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
        ]));
    }

    // scroll_offset counts lines up from the bottom; clamp it to the top
    let viewport = area.height.saturating_sub(2);
    let max_scroll = (lines.len() as u16).saturating_sub(viewport);
    let from_bottom = app.scroll_offset.min(max_scroll);
    let offset = max_scroll - from_bottom;

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Chat ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));

    frame.render_widget(paragraph, area);
}

/// Render the input area
fn render_input(frame: &mut Frame, area: Rect, app: &ChatApp) {
    // Check if we should show command hints
    let showing_command_hints = app.input.starts_with('/');

    let input_area = if showing_command_hints {
        let filtered = filtered_commands(&app.input);
        let hints_height = (filtered.len() as u16 + 3).min(9);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(hints_height), Constraint::Min(3)])
            .split(area);

        // Render command hints in the hints area
        let mut hint_lines = vec![Line::from(Span::styled(
            " Available Commands:",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))];

        for (cmd, desc) in filtered.iter() {
            hint_lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<12}", cmd),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(*desc, Style::default().fg(Color::Gray)),
            ]));
        }

        let hints_block = Paragraph::new(hint_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Commands (Enter to execute) "),
        );

        frame.render_widget(hints_block, chunks[0]);
        chunks[1]
    } else {
        area
    };

    // Render the input box
    let title = if app.is_thinking {
        " Waiting for the answer... "
    } else if showing_command_hints {
        " Enter Command "
    } else {
        " Question (Enter to send • /help for commands) "
    };
    let border_color = if app.is_thinking {
        Color::Yellow
    } else if showing_command_hints {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let input = Paragraph::new(app.input.clone())
        .style(Style::default().fg(Color::White))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(title),
        );

    frame.render_widget(input, input_area);

    // Position cursor at the end of the input text
    let cursor_x = input_area.x + 1 + app.input.len() as u16;
    let cursor_y = input_area.y + 1;
    let cursor_x = cursor_x.min(input_area.x + input_area.width.saturating_sub(2));
    frame.set_cursor_position((cursor_x, cursor_y));
}

/// Render the status bar
///
/// Failed turns land here and nowhere else: the message shows in red
/// until the next status change.
fn render_status_bar(frame: &mut Frame, area: Rect, app: &ChatApp) {
    let status_style = if app.status.is_error {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let spans = vec![
        Span::styled(
            " CHAT ",
            Style::default()
                .bg(Color::Green)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(
            format!(" {} ", app.backend_name),
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(app.status.text.clone(), status_style),
        Span::raw(" | "),
        Span::styled("Tab: schema", Style::default().fg(Color::DarkGray)),
        Span::raw(" | "),
        Span::styled("Ctrl+C: quit", Style::default().fg(Color::DarkGray)),
    ];

    let status_line = Line::from(spans);

    // Use Block to ensure the entire area is cleared before rendering
    let status_bar = Paragraph::new(vec![status_line])
        .style(Style::default().bg(Color::Black))
        .block(Block::default());

    frame.render_widget(status_bar, area);
}
