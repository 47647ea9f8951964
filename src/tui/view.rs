use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use super::{
    editor::{EditorField, EditorState},
    input::InputState,
    state::{Focus, TuiState},
    viewer::{MemoViewer, OpenViewer},
};
use crate::{
    domain::memo::Category,
    format::{format_display_time, format_memo_line},
};

pub(crate) fn draw_tui(frame: &mut Frame<'_>, state: &TuiState) {
    let layout = split_layout(
        frame.area(),
        matches!(state.focus, Focus::Editor),
        state.is_search_visible(),
    );

    draw_list(frame, state, layout.list_area);
    if let Some(editor_area) = layout.editor_area {
        draw_editor(frame, &state.editor, editor_area);
    }
    if let Some(search_area) = layout.search_area {
        draw_search(frame, state, search_area);
    }
    draw_status(frame, state, layout.status_area);
    draw_viewer(frame, &state.viewer);
}

/// Where the viewer overlay sits; everything else is backdrop.
pub(crate) fn popup_area(area: Rect) -> Rect {
    let [column] = Layout::horizontal([Constraint::Percentage(80)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Percentage(90)])
        .flex(Flex::Center)
        .areas(column);
    popup
}

fn draw_list(frame: &mut Frame<'_>, state: &TuiState, area: Rect) {
    let row_width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = state
        .memos
        .iter()
        .map(|memo| {
            let category = Category::display_for(&memo.category);
            let display_time = format_display_time(&memo.created_at);
            let line = format_memo_line(&display_time, category.label(), &memo.title, row_width);
            ListItem::new(line)
        })
        .collect();
    let list_widget = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(list_title(state))
                .border_style(focus_style(state.focus, Focus::List)),
        )
        .highlight_symbol("")
        .highlight_style(focus_style(state.focus, Focus::List).add_modifier(Modifier::REVERSED))
        .style(Style::default());
    let mut list_state = ListState::default();
    list_state.select(state.list_index);
    frame.render_stateful_widget(list_widget, area, &mut list_state);
}

fn draw_editor(frame: &mut Frame<'_>, editor: &EditorState, area: Rect) {
    let [title_area, category_area, tags_area, content_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(3),
    ])
    .areas(area);

    let heading = match (editor.editing(), editor.status.as_deref()) {
        (_, Some(status)) => format!("Title - {}", status),
        (Some(_), None) => "Title (editing, Ctrl+S save, Tab next field, Esc cancel)".to_string(),
        (None, None) => "Title (new memo, Ctrl+S save, Tab next field, Esc cancel)".to_string(),
    };
    draw_input(frame, editor, &editor.title, EditorField::Title, heading, title_area);

    let picker_style = if editor.field == EditorField::Category {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let picker = Line::from(vec![
        Span::styled(" Category  < ", picker_style),
        Span::styled(
            format!(" {} ", editor.category.label()),
            badge_style(editor.category),
        ),
        Span::styled(" >", picker_style),
    ]);
    frame.render_widget(Paragraph::new(picker), category_area);

    draw_input(
        frame,
        editor,
        &editor.tags,
        EditorField::Tags,
        "Tags (comma separated)".to_string(),
        tags_area,
    );
    draw_input(
        frame,
        editor,
        &editor.content,
        EditorField::Content,
        "Content (markdown)".to_string(),
        content_area,
    );
}

fn draw_input(
    frame: &mut Frame<'_>,
    editor: &EditorState,
    input: &InputState,
    field: EditorField,
    title: String,
    area: Rect,
) {
    let active = editor.field == field;
    let border_style = if active {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    let lines: Vec<Line> = input
        .lines
        .iter()
        .map(|line| Line::from(line.as_str()))
        .collect();
    let widget = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(widget, area);
    if active {
        frame.set_cursor_position(input.cursor_position(area));
    }
}

fn draw_search(frame: &mut Frame<'_>, state: &TuiState, area: Rect) {
    let search_style = focus_style(state.focus, Focus::Search);
    let query = match (&state.focus, &state.active_query) {
        (Focus::Search, _) | (_, None) => state.search.query.as_str(),
        (_, Some(active)) => active.as_str(),
    };
    let search_widget = Paragraph::new(Line::from(format!("/{}", query)))
        .style(search_style)
        .wrap(Wrap { trim: false });
    frame.render_widget(search_widget, area);
    if matches!(state.focus, Focus::Search) {
        frame.set_cursor_position(state.search.cursor_position_inline(area));
    }
}

fn draw_status(frame: &mut Frame<'_>, state: &TuiState, area: Rect) {
    let line = match state.status.as_deref() {
        Some(status) => Line::styled(status.to_string(), Style::default().fg(Color::Yellow)),
        None => Line::styled(
            "n new  Enter open  e edit  / search  c category  r reload  q quit",
            Style::default().add_modifier(Modifier::DIM),
        ),
    };
    frame.render_widget(Paragraph::new(line), area);
}

pub(crate) fn draw_viewer(frame: &mut Frame<'_>, viewer: &MemoViewer) {
    let Some(view) = viewer.view() else {
        return;
    };
    let area = popup_area(frame.area());
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" Memo ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let tags_height = if view.detail.tags.is_empty() { 0 } else { 2 };
    let [header_area, body_area, tags_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(tags_height),
        Constraint::Length(1),
    ])
    .areas(inner);

    frame.render_widget(Paragraph::new(header_lines(view)), header_area);

    let body = match &view.preview {
        Some(lines) => Text::from(lines.clone()),
        None => Text::from(view.memo.content.as_str()),
    };
    frame.render_widget(
        Paragraph::new(body)
            .wrap(Wrap { trim: false })
            .scroll((view.scroll, 0)),
        body_area,
    );

    if tags_height > 0 {
        let mut spans = Vec::with_capacity(view.detail.tags.len() * 2);
        for tag in &view.detail.tags {
            spans.push(Span::styled(
                format!(" {} ", tag),
                Style::default().bg(Color::DarkGray).fg(Color::White),
            ));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(
            Paragraph::new(vec![Line::from(""), Line::from(spans)]).wrap(Wrap { trim: false }),
            tags_area,
        );
    }

    frame.render_widget(Paragraph::new(footer_line(view)), footer_area);
}

fn header_lines(view: &OpenViewer) -> Vec<Line<'static>> {
    let detail = &view.detail;
    let mut meta = vec![Span::styled(
        format!(" {} ", detail.category.label()),
        badge_style(detail.category),
    )];
    for stamp in detail.timestamps() {
        meta.push(Span::raw("  "));
        meta.push(Span::styled(stamp, Style::default().fg(Color::Gray)));
    }
    vec![
        Line::styled(
            detail.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::from(meta),
        Line::from(""),
    ]
}

fn footer_line(view: &OpenViewer) -> Line<'static> {
    if view.confirming_delete {
        return Line::styled(
            "Delete this memo? y / n",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        );
    }
    if let Some(notice) = &view.notice {
        return Line::styled(notice.clone(), Style::default().fg(Color::Yellow));
    }
    Line::styled(
        "e edit  d delete  j/k scroll  Esc close",
        Style::default().add_modifier(Modifier::DIM),
    )
}

fn badge_style(category: Category) -> Style {
    let color = match category {
        Category::Personal => Color::Blue,
        Category::Work => Color::Green,
        Category::Study => Color::Magenta,
        Category::Idea => Color::Yellow,
        Category::Other => Color::Gray,
    };
    Style::default().bg(color).fg(Color::Black)
}

fn list_title(state: &TuiState) -> String {
    let scope = match &state.active_query {
        Some(query) => format!("search \"{}\"", query),
        None => state.category_filter.as_str().to_string(),
    };
    if matches!(state.focus, Focus::List) {
        format!("Memos [{}] [active] ({})", scope, state.memos.len())
    } else {
        format!("Memos [{}] ({})", scope, state.memos.len())
    }
}

fn focus_style(current: Focus, target: Focus) -> Style {
    if current == target {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

struct LayoutAreas {
    list_area: Rect,
    editor_area: Option<Rect>,
    search_area: Option<Rect>,
    status_area: Rect,
}

fn split_layout(area: Rect, show_editor: bool, show_search: bool) -> LayoutAreas {
    let [main_area, search_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(u16::from(show_search)),
            Constraint::Length(1),
        ])
        .areas(area);

    let (list_area, editor_area) = if show_editor {
        let [list_area, editor_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .areas(main_area);
        (list_area, Some(editor_area))
    } else {
        (main_area, None)
    };

    LayoutAreas {
        list_area,
        editor_area,
        search_area: show_search.then_some(search_area),
        status_area,
    }
}
