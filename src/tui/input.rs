use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Editable text with a character cursor. Single-line inputs ignore newlines.
pub(crate) struct InputState {
    pub(crate) lines: Vec<String>,
    single_line: bool,
    cursor: InputCursor,
}

impl InputState {
    pub(crate) fn multi_line() -> Self {
        Self {
            lines: vec![String::new()],
            single_line: false,
            cursor: InputCursor::new(),
        }
    }

    pub(crate) fn single_line() -> Self {
        Self {
            single_line: true,
            ..Self::multi_line()
        }
    }

    pub(crate) fn insert_char(&mut self, ch: char) {
        self.ensure_invariants();
        let line = &mut self.lines[self.cursor.line];
        let byte_index = byte_index_at_char(line, self.cursor.col);
        line.insert(byte_index, ch);
        self.cursor.col = self.cursor.col.saturating_add(1);
        self.cursor.preferred_col = None;
    }

    pub(crate) fn backspace(&mut self) {
        self.ensure_invariants();
        if self.cursor.col > 0 {
            let line = &mut self.lines[self.cursor.line];
            let remove_at = byte_index_at_char(line, self.cursor.col.saturating_sub(1));
            if let Some(byte_len) = line[remove_at..].chars().next().map(char::len_utf8) {
                line.replace_range(remove_at..remove_at + byte_len, "");
            }
            self.cursor.col = self.cursor.col.saturating_sub(1);
            self.cursor.preferred_col = None;
            return;
        }
        if self.cursor.line > 0 {
            let current_line = self.lines.remove(self.cursor.line);
            self.cursor.line = self.cursor.line.saturating_sub(1);
            let line = &mut self.lines[self.cursor.line];
            let prev_len = line.chars().count();
            line.push_str(&current_line);
            self.cursor.col = prev_len;
            self.cursor.preferred_col = None;
        }
    }

    pub(crate) fn delete_char(&mut self) {
        self.ensure_invariants();
        let line_len = self.current_line_len();
        if self.cursor.col < line_len {
            let line = &mut self.lines[self.cursor.line];
            let remove_at = byte_index_at_char(line, self.cursor.col);
            if let Some(byte_len) = line[remove_at..].chars().next().map(char::len_utf8) {
                line.replace_range(remove_at..remove_at + byte_len, "");
            }
            self.cursor.preferred_col = None;
            return;
        }
        if self.cursor.line + 1 < self.lines.len() {
            let next_line = self.lines.remove(self.cursor.line + 1);
            self.lines[self.cursor.line].push_str(&next_line);
            self.cursor.preferred_col = None;
        }
    }

    pub(crate) fn newline(&mut self) {
        if self.single_line {
            return;
        }
        self.ensure_invariants();
        let line = &mut self.lines[self.cursor.line];
        let split_at = byte_index_at_char(line, self.cursor.col);
        let tail = line[split_at..].to_string();
        line.truncate(split_at);
        let insert_at = self.cursor.line + 1;
        self.lines.insert(insert_at, tail);
        self.cursor.line = insert_at;
        self.cursor.col = 0;
        self.cursor.preferred_col = None;
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
        self.lines.push(String::new());
        self.cursor = InputCursor::new();
    }

    /// Replaces the text and puts the cursor at its end.
    pub(crate) fn set_text(&mut self, text: &str) {
        self.lines = if self.single_line {
            vec![text.replace(['\n', '\r'], " ")]
        } else {
            text.split('\n').map(str::to_string).collect()
        };
        self.ensure_invariants();
        self.cursor.line = self.lines.len().saturating_sub(1);
        self.cursor.col = self.current_line_len();
        self.cursor.preferred_col = None;
    }

    pub(crate) fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub(crate) fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let content_width = area.width.saturating_sub(2).max(1) as usize;
        let (row, col) = wrapped_cursor_position(&self.lines, &self.cursor, content_width);
        (area.x + col as u16 + 1, area.y + row as u16 + 1)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    pub(crate) fn move_left(&mut self) {
        self.ensure_invariants();
        if self.cursor.col > 0 {
            self.cursor.col = self.cursor.col.saturating_sub(1);
        } else if self.cursor.line > 0 {
            self.cursor.line = self.cursor.line.saturating_sub(1);
            self.cursor.col = self.current_line_len();
        }
        self.cursor.preferred_col = None;
    }

    pub(crate) fn move_right(&mut self) {
        self.ensure_invariants();
        let line_len = self.current_line_len();
        if self.cursor.col < line_len {
            self.cursor.col = self.cursor.col.saturating_add(1);
        } else if self.cursor.line + 1 < self.lines.len() {
            self.cursor.line = self.cursor.line.saturating_add(1);
            self.cursor.col = 0;
        }
        self.cursor.preferred_col = None;
    }

    pub(crate) fn move_up(&mut self) {
        self.ensure_invariants();
        if self.cursor.line == 0 {
            return;
        }
        let target_col = self.cursor.preferred_col.unwrap_or(self.cursor.col);
        self.cursor.line = self.cursor.line.saturating_sub(1);
        self.cursor.col = target_col.min(self.current_line_len());
        self.cursor.preferred_col = Some(target_col);
    }

    pub(crate) fn move_down(&mut self) {
        self.ensure_invariants();
        if self.cursor.line + 1 >= self.lines.len() {
            return;
        }
        let target_col = self.cursor.preferred_col.unwrap_or(self.cursor.col);
        self.cursor.line = self.cursor.line.saturating_add(1);
        self.cursor.col = target_col.min(self.current_line_len());
        self.cursor.preferred_col = Some(target_col);
    }

    fn ensure_invariants(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        if self.cursor.line >= self.lines.len() {
            self.cursor.line = self.lines.len().saturating_sub(1);
        }
        let line_len = self.current_line_len();
        if self.cursor.col > line_len {
            self.cursor.col = line_len;
        }
    }

    fn current_line_len(&self) -> usize {
        self.lines
            .get(self.cursor.line)
            .map(|line| line.chars().count())
            .unwrap_or(0)
    }
}

struct InputCursor {
    line: usize,
    col: usize,
    preferred_col: Option<usize>,
}

impl InputCursor {
    fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            preferred_col: None,
        }
    }
}

fn byte_index_at_char(value: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }
    value
        .char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or_else(|| value.len())
}

fn width_up_to_char(value: &str, char_index: usize) -> usize {
    value
        .chars()
        .take(char_index)
        .map(|ch| UnicodeWidthChar::width(ch).unwrap_or(0))
        .sum()
}

fn wrapped_cursor_position(
    lines: &[String],
    cursor: &InputCursor,
    content_width: usize,
) -> (usize, usize) {
    let mut rows_before = 0usize;
    let cursor_line = cursor.line.min(lines.len().saturating_sub(1));
    for line in lines.iter().take(cursor_line) {
        let line_width = UnicodeWidthStr::width(line.as_str());
        let wrapped_rows = if line_width == 0 {
            0
        } else {
            (line_width - 1) / content_width
        };
        rows_before += wrapped_rows + 1;
    }

    let line = lines.get(cursor_line).map(String::as_str).unwrap_or("");
    let cursor_col = cursor.col.min(line.chars().count());
    let prefix_width = width_up_to_char(line, cursor_col);
    let row = rows_before.saturating_add(prefix_width / content_width);
    let col = prefix_width % content_width;

    (row, col)
}
