use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::cli::i18n::texts;
use crate::provider::{find_preset, ProviderRecord};

use super::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(line.len())
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.chars().count();
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = Self::byte_index(&self.value, self.cursor);
        self.value.insert(idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = Self::byte_index(&self.value, self.cursor - 1);
        let end = Self::byte_index(&self.value, self.cursor);
        self.value.replace_range(start..end, "");
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.value.chars().count() {
            return;
        }
        let start = Self::byte_index(&self.value, self.cursor);
        let end = Self::byte_index(&self.value, self.cursor + 1);
        self.value.replace_range(start..end, "");
    }

    /// Editing keys shared by every text field. Returns false if unhandled.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Char(c)
                if !c.is_control()
                    && !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.insert_char(c)
            }
            _ => return false,
        }
        true
    }

    /// Text shown for the field, windowed so the cursor stays inside `width`.
    /// Returns the text and the cursor column within it.
    fn window(&self, masked: bool, width: usize) -> (String, usize) {
        let chars: Vec<char> = if masked {
            vec!['*'; self.value.chars().count()]
        } else {
            self.value.chars().collect()
        };
        let width = width.max(1);
        let start = (self.cursor + 1).saturating_sub(width);
        let shown: String = chars.iter().skip(start).take(width).collect();
        (shown, self.cursor - start)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmPurpose {
    RemoveProvider { name: String },
}

#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    pub yes_selected: bool,
    pub purpose: ConfirmPurpose,
}

impl ConfirmDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>, purpose: ConfirmPurpose) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            yes_selected: false,
            purpose,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> DialogEvent {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.yes_selected = true,
            KeyCode::Right | KeyCode::Char('l') => self.yes_selected = false,
            KeyCode::Tab | KeyCode::BackTab => self.yes_selected = !self.yes_selected,
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                return DialogEvent::Closed(DialogResult::Confirmed(true))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                return DialogEvent::Closed(DialogResult::Confirmed(false))
            }
            KeyCode::Enter => return DialogEvent::Closed(DialogResult::Confirmed(self.yes_selected)),
            _ => {}
        }
        DialogEvent::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    ApiKey,
    BaseUrl,
    Model,
}

impl EditField {
    pub const ALL: [EditField; 3] = [EditField::ApiKey, EditField::BaseUrl, EditField::Model];

    fn index(self) -> usize {
        match self {
            EditField::ApiKey => 0,
            EditField::BaseUrl => 1,
            EditField::Model => 2,
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn label(self) -> &'static str {
        match self {
            EditField::ApiKey => texts::tui_field_api_key(),
            EditField::BaseUrl => texts::tui_field_base_url(),
            EditField::Model => texts::tui_field_model(),
        }
    }
}

/// Credential / endpoint / model form for one provider.
#[derive(Debug, Clone)]
pub struct EditDialog {
    pub name: String,
    pub display_name: String,
    pub key_url: String,
    fallback_base_url: String,
    fallback_model: String,
    inputs: [TextInput; 3],
    pub focus: EditField,
    pub error: Option<String>,
}

impl EditDialog {
    pub fn new(record: ProviderRecord) -> Self {
        let (fallback_base_url, fallback_model) = match find_preset(&record.name) {
            Some(preset) => (preset.base_url.to_string(), preset.model.to_string()),
            None => (record.base_url.clone(), record.model.clone()),
        };
        Self {
            inputs: [
                TextInput::new(record.api_key.clone()),
                TextInput::new(record.base_url.clone()),
                TextInput::new(record.model.clone()),
            ],
            display_name: record.display_label().to_string(),
            name: record.name,
            key_url: record.key_url,
            fallback_base_url,
            fallback_model,
            focus: EditField::ApiKey,
            error: None,
        }
    }

    pub fn input(&self, field: EditField) -> &TextInput {
        &self.inputs[field.index()]
    }

    fn input_mut(&mut self, field: EditField) -> &mut TextInput {
        &mut self.inputs[field.index()]
    }

    fn value_or(&self, field: EditField, fallback: &str) -> String {
        let input = self.input(field);
        if input.is_blank() {
            fallback.to_string()
        } else {
            input.value.trim().to_string()
        }
    }

    /// Record built from the current fields; blanks fall back to the preset.
    pub fn to_record(&self) -> ProviderRecord {
        ProviderRecord {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            api_key: self.input(EditField::ApiKey).value.trim().to_string(),
            base_url: self.value_or(EditField::BaseUrl, &self.fallback_base_url),
            model: self.value_or(EditField::Model, &self.fallback_model),
            key_url: self.key_url.clone(),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> DialogEvent {
        match key.code {
            KeyCode::Esc => return DialogEvent::Closed(DialogResult::Canceled),
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Enter => {
                if self.input(EditField::ApiKey).is_blank() {
                    self.error = Some(texts::tui_error_key_required().to_string());
                    self.focus = EditField::ApiKey;
                    return DialogEvent::Pending;
                }
                return DialogEvent::Closed(DialogResult::Submitted(self.to_record()));
            }
            _ => {
                let focus = self.focus;
                if self.input_mut(focus).handle_key(key) {
                    self.error = None;
                }
            }
        }
        DialogEvent::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    Canceled,
    Confirmed(bool),
    Submitted(ProviderRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    Pending,
    Closed(DialogResult),
}

/// The closed set of modal dialogs.
#[derive(Debug, Clone)]
pub enum Dialog {
    Confirm(ConfirmDialog),
    Edit(EditDialog),
    Help,
}

impl Dialog {
    /// Width x height requested for centering.
    pub fn size(&self) -> (u16, u16) {
        match self {
            Dialog::Confirm(_) => (50, 8),
            Dialog::Edit(_) => (60, 14),
            Dialog::Help => (60, 22),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Dialog::Confirm(c) => c.title.clone(),
            Dialog::Edit(e) => texts::tui_edit_title(&e.name),
            Dialog::Help => texts::tui_help_title().to_string(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> DialogEvent {
        if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
            return DialogEvent::Closed(DialogResult::Canceled);
        }
        match self {
            Dialog::Confirm(confirm) => confirm.handle_key(key),
            Dialog::Edit(edit) => edit.handle_key(key),
            Dialog::Help => DialogEvent::Closed(DialogResult::Canceled),
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.primary))
            .title(format!(" {} ", self.title()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match self {
            Dialog::Confirm(confirm) => render_confirm(frame, inner, theme, confirm),
            Dialog::Edit(edit) => render_edit(frame, inner, theme, edit),
            Dialog::Help => render_help(frame, inner, theme),
        }
    }
}

fn button_style(theme: &Theme, active: bool) -> Style {
    if !active {
        return Style::default().fg(theme.dim);
    }
    if theme.no_color {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
            .fg(ratatui::style::Color::Black)
            .bg(theme.primary)
            .add_modifier(Modifier::BOLD)
    }
}

fn render_confirm(frame: &mut Frame<'_>, area: Rect, theme: &Theme, confirm: &ConfirmDialog) {
    let mut lines: Vec<Line> = vec![Line::raw("")];
    lines.extend(
        confirm
            .message
            .lines()
            .map(|l| Line::styled(format!(" {l}"), Style::default().fg(theme.text))),
    );
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled(
            format!("  {}  ", texts::tui_confirm_yes()),
            button_style(theme, confirm.yes_selected),
        ),
        Span::raw("   "),
        Span::styled(
            format!("  {}  ", texts::tui_confirm_no()),
            button_style(theme, !confirm.yes_selected),
        ),
    ]));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

const EDIT_LABEL_WIDTH: usize = 10;

fn render_edit(frame: &mut Frame<'_>, area: Rect, theme: &Theme, edit: &EditDialog) {
    let value_width = (area.width as usize).saturating_sub(EDIT_LABEL_WIDTH + 4);
    let mut lines: Vec<Line> = vec![Line::styled(
        format!(" {}", edit.display_name),
        Style::default().fg(theme.dim),
    )];
    let mut cursor = None;

    for field in EditField::ALL {
        let focused = edit.focus == field;
        let (shown, col) = edit
            .input(field)
            .window(field == EditField::ApiKey, value_width);
        let label_style = if focused {
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        let marker = if focused { "▸" } else { " " };
        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled(format!("{marker}{:<width$}", field.label(), width = EDIT_LABEL_WIDTH), label_style),
            Span::raw(": "),
            Span::styled(shown, Style::default().fg(theme.text)),
        ]));
        if focused {
            let x = area.x + (1 + EDIT_LABEL_WIDTH + 2 + col) as u16;
            let y = area.y + (lines.len() - 1) as u16;
            cursor = Some((x.min(area.right().saturating_sub(1)), y));
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        format!(" {}", texts::tui_edit_hint()),
        Style::default().fg(theme.dim),
    ));
    if let Some(err) = &edit.error {
        lines.push(Line::styled(format!(" {err}"), Style::default().fg(theme.err)));
    } else if !edit.key_url.is_empty() {
        lines.push(Line::styled(
            format!(" {}", texts::tui_edit_key_url(&edit.key_url)),
            Style::default().fg(theme.dim),
        ));
    }

    frame.render_widget(Paragraph::new(lines), area);
    if let Some(pos) = cursor {
        if pos.1 < area.bottom() {
            frame.set_cursor_position(pos);
        }
    }
}

fn render_help(frame: &mut Frame<'_>, area: Rect, theme: &Theme) {
    let mut lines: Vec<Line> = Vec::new();
    for (idx, (section, keys)) in texts::tui_help_sections().into_iter().enumerate() {
        if idx > 0 {
            lines.push(Line::raw(""));
        }
        lines.push(Line::styled(
            format!(" {section}"),
            Style::default()
                .fg(theme.primary)
                .add_modifier(Modifier::BOLD),
        ));
        for (key, desc) in keys {
            lines.push(Line::from(vec![
                Span::styled(format!("   {key:<12}"), Style::default().fg(theme.accent)),
                Span::styled(desc.to_string(), Style::default().fg(theme.text)),
            ]));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        format!(" {}", texts::tui_help_close_hint()),
        Style::default().fg(theme.dim),
    ));
    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn confirm() -> Dialog {
        Dialog::Confirm(ConfirmDialog::new(
            "Remove",
            "Remove provider?",
            ConfirmPurpose::RemoveProvider {
                name: "alpha".into(),
            },
        ))
    }

    fn edit_for(name: &str, key_value: &str) -> Dialog {
        Dialog::Edit(EditDialog::new(
            ProviderRecord {
                name: name.into(),
                api_key: key_value.into(),
                ..Default::default()
            }
            .with_preset_defaults(),
        ))
    }

    #[test]
    fn confirm_defaults_to_no() {
        let mut dialog = confirm();
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogEvent::Closed(DialogResult::Confirmed(false))
        );
    }

    #[test]
    fn confirm_arrows_tab_and_direct_keys() {
        let mut dialog = confirm();
        assert_eq!(dialog.handle_key(key(KeyCode::Left)), DialogEvent::Pending);
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogEvent::Closed(DialogResult::Confirmed(true))
        );

        let mut dialog = confirm();
        dialog.handle_key(key(KeyCode::Tab));
        dialog.handle_key(key(KeyCode::Tab));
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogEvent::Closed(DialogResult::Confirmed(false))
        );

        assert_eq!(
            confirm().handle_key(key(KeyCode::Char('y'))),
            DialogEvent::Closed(DialogResult::Confirmed(true))
        );
        assert_eq!(
            confirm().handle_key(key(KeyCode::Esc)),
            DialogEvent::Closed(DialogResult::Confirmed(false))
        );
    }

    #[test]
    fn edit_enter_requires_key() {
        let mut dialog = edit_for("deepseek", "");
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), DialogEvent::Pending);
        let Dialog::Edit(edit) = &dialog else {
            panic!("expected edit dialog");
        };
        assert!(edit.error.is_some());

        for c in "sk-1".chars() {
            dialog.handle_key(key(KeyCode::Char(c)));
        }
        let DialogEvent::Closed(DialogResult::Submitted(record)) =
            dialog.handle_key(key(KeyCode::Enter))
        else {
            panic!("expected submit");
        };
        assert_eq!(record.api_key, "sk-1");
        assert_eq!(record.base_url, "https://api.deepseek.com");
    }

    #[test]
    fn edit_focus_cycles_both_ways() {
        let mut dialog = edit_for("kimi", "k");
        let focus = |d: &Dialog| match d {
            Dialog::Edit(e) => e.focus,
            _ => unreachable!(),
        };
        dialog.handle_key(key(KeyCode::BackTab));
        assert_eq!(focus(&dialog), EditField::Model);
        dialog.handle_key(key(KeyCode::Tab));
        assert_eq!(focus(&dialog), EditField::ApiKey);
        dialog.handle_key(key(KeyCode::Down));
        assert_eq!(focus(&dialog), EditField::BaseUrl);
    }

    #[test]
    fn blank_model_falls_back_to_preset() {
        let mut dialog = edit_for("kimi", "k");
        dialog.handle_key(key(KeyCode::Tab));
        dialog.handle_key(key(KeyCode::Tab));
        for _ in 0..40 {
            dialog.handle_key(key(KeyCode::Backspace));
        }
        let DialogEvent::Closed(DialogResult::Submitted(record)) =
            dialog.handle_key(key(KeyCode::Enter))
        else {
            panic!("expected submit");
        };
        assert_eq!(record.model, "moonshot-v1-auto");
    }

    #[test]
    fn edit_escape_discards() {
        let mut dialog = edit_for("kimi", "k");
        dialog.handle_key(key(KeyCode::Char('x')));
        assert_eq!(
            dialog.handle_key(key(KeyCode::Esc)),
            DialogEvent::Closed(DialogResult::Canceled)
        );
    }

    #[test]
    fn help_closes_on_any_key() {
        let mut dialog = Dialog::Help;
        assert_eq!(
            dialog.handle_key(key(KeyCode::Char('q'))),
            DialogEvent::Closed(DialogResult::Canceled)
        );
    }

    #[test]
    fn text_input_edits_multibyte() {
        let mut input = TextInput::new("中文");
        input.move_left();
        input.insert_char('x');
        assert_eq!(input.value, "中x文");
        input.backspace();
        input.delete();
        assert_eq!(input.value, "中");
    }

    #[test]
    fn masked_window_hides_key() {
        let input = TextInput::new("secret");
        let (shown, col) = input.window(true, 20);
        assert_eq!(shown, "******");
        assert_eq!(col, 6);
    }
}
