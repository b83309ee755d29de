use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

const TAB_INSERT: &str = "    ";
pub const OUTPUT_PAGE_ROWS: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorSnapshot {
    pub buffer: String,
    pub cursor: usize,
}

#[derive(Default, Debug)]
pub struct InputState {
    pub buffer: String,
    pub cursor: usize,
    pub undo_stack: Vec<EditorSnapshot>,
    pub redo_stack: Vec<EditorSnapshot>,
}

/// Multi-line editor holding the draft code.
#[derive(Default, Debug)]
pub struct InputEditor {
    pub input_state: InputState,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    None,
    Analyze,
    ResetInput,
    ResetOutput,
    ScrollOutput(isize),
    Quit,
}

impl InputEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.input_state.buffer
    }

    pub fn cursor(&self) -> usize {
        self.input_state.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.input_state.buffer.is_empty()
    }

    pub fn clamp_cursor_to_boundary_left(&self, mut idx: usize) -> usize {
        idx = idx.min(self.input_state.buffer.len());
        while idx > 0 && !self.input_state.buffer.is_char_boundary(idx) {
            idx -= 1;
        }
        idx
    }

    pub fn prev_char_boundary(&self, idx: usize) -> usize {
        let i = self.clamp_cursor_to_boundary_left(idx);
        if i == 0 {
            return 0;
        }
        let mut j = i - 1;
        while j > 0 && !self.input_state.buffer.is_char_boundary(j) {
            j -= 1;
        }
        j
    }

    pub fn next_char_boundary(&self, idx: usize) -> usize {
        let i = self.clamp_cursor_to_boundary_left(idx);
        if i >= self.input_state.buffer.len() {
            return self.input_state.buffer.len();
        }
        match self.input_state.buffer[i..].chars().next() {
            Some(ch) => i + ch.len_utf8(),
            None => self.input_state.buffer.len(),
        }
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            buffer: self.input_state.buffer.clone(),
            cursor: self.input_state.cursor,
        }
    }

    pub fn push_undo(&mut self) {
        self.input_state.undo_stack.push(self.snapshot());
        self.input_state.redo_stack.clear();
    }

    pub fn restore(&mut self, snap: EditorSnapshot) {
        self.input_state.buffer = snap.buffer;
        self.input_state.cursor = self.clamp_cursor_to_boundary_left(snap.cursor);
    }

    pub fn insert_str(&mut self, value: &str) {
        if value.is_empty() {
            return;
        }
        let cursor = self.clamp_cursor_to_boundary_left(self.input_state.cursor);
        self.push_undo();
        self.input_state.buffer.insert_str(cursor, value);
        self.input_state.cursor = cursor + value.len();
    }

    pub fn backspace(&mut self) {
        let end = self.clamp_cursor_to_boundary_left(self.input_state.cursor);
        if end == 0 {
            return;
        }
        let start = self.prev_char_boundary(end);
        self.push_undo();
        self.input_state.buffer.replace_range(start..end, "");
        self.input_state.cursor = start;
    }

    pub fn delete(&mut self) {
        let start = self.clamp_cursor_to_boundary_left(self.input_state.cursor);
        if start >= self.input_state.buffer.len() {
            return;
        }
        let end = self.next_char_boundary(start);
        self.push_undo();
        self.input_state.buffer.replace_range(start..end, "");
        self.input_state.cursor = start;
    }

    /// Empties the draft. Undoable.
    pub fn clear(&mut self) {
        if self.input_state.buffer.is_empty() {
            return;
        }
        self.push_undo();
        self.input_state.buffer.clear();
        self.input_state.cursor = 0;
    }

    pub fn undo(&mut self) {
        if let Some(previous) = self.input_state.undo_stack.pop() {
            self.input_state.redo_stack.push(self.snapshot());
            self.restore(previous);
        }
    }

    pub fn redo(&mut self) {
        if let Some(next) = self.input_state.redo_stack.pop() {
            self.input_state.undo_stack.push(self.snapshot());
            self.restore(next);
        }
    }

    fn line_start(&self, idx: usize) -> usize {
        let idx = self.clamp_cursor_to_boundary_left(idx);
        self.input_state.buffer[..idx]
            .rfind('\n')
            .map(|pos| pos + 1)
            .unwrap_or(0)
    }

    fn line_end(&self, idx: usize) -> usize {
        let idx = self.clamp_cursor_to_boundary_left(idx);
        self.input_state.buffer[idx..]
            .find('\n')
            .map(|pos| idx + pos)
            .unwrap_or(self.input_state.buffer.len())
    }

    /// Byte offset of the `column`-th char of the line starting at `start`,
    /// clamped to the end of that line.
    fn offset_in_line(&self, start: usize, column: usize) -> usize {
        let end = self.line_end(start);
        self.input_state.buffer[start..end]
            .char_indices()
            .nth(column)
            .map(|(offset, _)| start + offset)
            .unwrap_or(end)
    }

    fn column(&self) -> usize {
        let cursor = self.clamp_cursor_to_boundary_left(self.input_state.cursor);
        self.input_state.buffer[self.line_start(cursor)..cursor]
            .chars()
            .count()
    }

    pub fn move_up(&mut self) {
        let start = self.line_start(self.input_state.cursor);
        if start == 0 {
            self.input_state.cursor = 0;
            return;
        }
        let column = self.column();
        let previous_start = self.line_start(start - 1);
        self.input_state.cursor = self.offset_in_line(previous_start, column);
    }

    pub fn move_down(&mut self) {
        let end = self.line_end(self.input_state.cursor);
        if end >= self.input_state.buffer.len() {
            self.input_state.cursor = self.input_state.buffer.len();
            return;
        }
        let column = self.column();
        self.input_state.cursor = self.offset_in_line(end + 1, column);
    }

    pub fn apply_event(&mut self, event: Event) -> InputAction {
        match event {
            Event::Paste(text) => {
                self.insert_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
                InputAction::None
            }
            Event::Key(key) if key.kind != KeyEventKind::Release => self.apply_key(key),
            _ => InputAction::None,
        }
    }

    pub fn apply_key(&mut self, key: KeyEvent) -> InputAction {
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if control => return InputAction::Quit,
            KeyCode::Char('s') if control => return InputAction::Analyze,
            KeyCode::Char('r') if control => return InputAction::ResetInput,
            KeyCode::Char('l') if control => return InputAction::ResetOutput,
            KeyCode::Char('z') if control => self.undo(),
            KeyCode::Char('y') if control => self.redo(),
            KeyCode::Esc => return InputAction::Quit,
            KeyCode::PageUp => return InputAction::ScrollOutput(-(OUTPUT_PAGE_ROWS as isize)),
            KeyCode::PageDown => return InputAction::ScrollOutput(OUTPUT_PAGE_ROWS as isize),
            KeyCode::Enter => self.insert_str("\n"),
            KeyCode::Tab => self.insert_str(TAB_INSERT),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => {
                self.input_state.cursor = self.prev_char_boundary(self.input_state.cursor);
            }
            KeyCode::Right => {
                self.input_state.cursor = self.next_char_boundary(self.input_state.cursor);
            }
            KeyCode::Up => self.move_up(),
            KeyCode::Down => self.move_down(),
            KeyCode::Home => self.input_state.cursor = self.line_start(self.input_state.cursor),
            KeyCode::End => self.input_state.cursor = self.line_end(self.input_state.cursor),
            KeyCode::Char(ch) if !control && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.insert_str(&ch.to_string());
            }
            _ => {}
        }

        InputAction::None
    }
}
