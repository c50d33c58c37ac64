use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::cli::i18n::texts;
use crate::provider::ProviderRecord;
use crate::services::ConnectionResult;

use super::data::{ProviderEntry, UiData};
use super::dialog::{ConfirmDialog, ConfirmPurpose, Dialog, DialogEvent, DialogResult, EditDialog};
use super::list::ProviderList;
use super::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Searching,
    DialogOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub remaining_ticks: u16,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            remaining_ticks: 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Run { name: String },
    TestConnection { name: String },
    SaveProvider { record: ProviderRecord },
    RemoveProvider { name: String },
    SetDefault { name: String },
}

pub struct App {
    pub list: ProviderList,
    pub dialog: Option<Dialog>,
    pub searching: bool,
    pub theme: Theme,
    pub toast: Option<Toast>,
    pub should_quit: bool,
    /// Provider to launch once the terminal is restored.
    pub run_target: Option<String>,
}

impl App {
    pub fn new(data: &UiData, theme: Theme) -> Self {
        Self {
            list: ProviderList::new(data.entries()),
            dialog: None,
            searching: false,
            theme,
            toast: None,
            should_quit: false,
            run_target: None,
        }
    }

    /// Derived from state so the mode can never disagree with the dialog slot.
    pub fn mode(&self) -> Mode {
        if self.dialog.is_some() {
            Mode::DialogOpen
        } else if self.searching {
            Mode::Searching
        } else {
            Mode::Normal
        }
    }

    pub fn on_tick(&mut self) {
        if let Some(toast) = &mut self.toast {
            if toast.remaining_ticks > 0 {
                toast.remaining_ticks -= 1;
            }
            if toast.remaining_ticks == 0 {
                self.toast = None;
            }
        }
    }

    pub fn push_toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast = Some(Toast::new(message, kind));
    }

    /// Rebuild the item model from freshly loaded data.
    pub fn reload(&mut self, data: &UiData) {
        self.list.set_items(data.entries());
    }

    /// Probe completions are accepted in every mode.
    pub fn apply_connection_result(&mut self, result: &ConnectionResult) {
        if !self.list.apply_result(result) {
            log::debug!("dropping probe result for unknown provider '{}'", result.name);
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, data: &UiData) -> Action {
        match self.mode() {
            Mode::DialogOpen => self.on_dialog_key(key),
            Mode::Searching => self.on_search_key(key),
            Mode::Normal => self.on_normal_key(key, data),
        }
    }

    fn quit(&mut self) -> Action {
        self.should_quit = true;
        Action::Quit
    }

    fn on_dialog_key(&mut self, key: KeyEvent) -> Action {
        let Some(dialog) = self.dialog.as_mut() else {
            return Action::None;
        };
        match dialog.handle_key(key) {
            DialogEvent::Pending => Action::None,
            DialogEvent::Closed(result) => {
                let closed = self.dialog.take();
                self.on_dialog_closed(closed, result)
            }
        }
    }

    fn on_dialog_closed(&mut self, dialog: Option<Dialog>, result: DialogResult) -> Action {
        match (dialog, result) {
            (Some(Dialog::Edit(_)), DialogResult::Submitted(record)) => {
                Action::SaveProvider { record }
            }
            (Some(Dialog::Confirm(confirm)), DialogResult::Confirmed(true)) => {
                match confirm.purpose {
                    ConfirmPurpose::RemoveProvider { name } => Action::RemoveProvider { name },
                }
            }
            _ => Action::None,
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => return self.quit(),
            KeyCode::Esc => {
                self.searching = false;
                self.list.set_query("");
            }
            KeyCode::Enter => self.searching = false,
            KeyCode::Up => self.list.move_up(),
            KeyCode::Char('p') if ctrl => self.list.move_up(),
            KeyCode::Down => self.list.move_down(),
            KeyCode::Char('n') if ctrl => self.list.move_down(),
            KeyCode::Backspace => {
                let mut query = self.list.query().to_string();
                query.pop();
                self.list.set_query(query);
            }
            KeyCode::Char(c) if !ctrl && !c.is_control() => {
                let mut query = self.list.query().to_string();
                query.push(c);
                self.list.set_query(query);
            }
            _ => {}
        }
        Action::None
    }

    fn selected_or_toast(&mut self) -> Option<ProviderEntry> {
        let selected = self.list.selected().cloned();
        if selected.is_none() {
            self.push_toast(texts::tui_toast_no_selection(), ToastKind::Info);
        }
        selected
    }

    fn on_normal_key(&mut self, key: KeyEvent, data: &UiData) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return self.quit(),
                KeyCode::Char('t') => {
                    self.theme = self.theme.toggled();
                }
                _ => {}
            }
            return Action::None;
        }

        match key.code {
            KeyCode::Char('q') => return self.quit(),
            KeyCode::Up | KeyCode::Char('k') => self.list.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.list.move_down(),
            KeyCode::Home | KeyCode::Char('g') => self.list.jump_first(),
            KeyCode::End | KeyCode::Char('G') => self.list.jump_last(),
            KeyCode::PageUp => self.list.page_up(),
            KeyCode::PageDown => self.list.page_down(),
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('?') => self.dialog = Some(Dialog::Help),
            KeyCode::Char('e') | KeyCode::Char('a') => {
                let Some(entry) = self.selected_or_toast() else {
                    return Action::None;
                };
                let record = data.record_for_edit(entry.name()).unwrap_or_else(|| {
                    ProviderRecord {
                        name: entry.name().to_string(),
                        display_name: entry.display_name().to_string(),
                        ..Default::default()
                    }
                });
                self.dialog = Some(Dialog::Edit(EditDialog::new(record)));
            }
            KeyCode::Char('r') => {
                let Some(entry) = self.selected_or_toast() else {
                    return Action::None;
                };
                if !entry.summary.has_record {
                    self.push_toast(texts::tui_toast_not_saved(entry.name()), ToastKind::Warning);
                    return Action::None;
                }
                self.dialog = Some(Dialog::Confirm(ConfirmDialog::new(
                    texts::tui_confirm_remove_title(),
                    texts::tui_confirm_remove_message(entry.name(), entry.display_name()),
                    ConfirmPurpose::RemoveProvider {
                        name: entry.name().to_string(),
                    },
                )));
            }
            KeyCode::Char('d') => {
                let Some(entry) = self.selected_or_toast() else {
                    return Action::None;
                };
                return Action::SetDefault {
                    name: entry.name().to_string(),
                };
            }
            KeyCode::Char('t') => {
                let Some(entry) = self.selected_or_toast() else {
                    return Action::None;
                };
                if !entry.summary.is_configured {
                    self.push_toast(
                        texts::tui_toast_not_configured(entry.name()),
                        ToastKind::Warning,
                    );
                    return Action::None;
                }
                self.list.mark_testing(entry.name());
                return Action::TestConnection {
                    name: entry.name().to_string(),
                };
            }
            KeyCode::Enter => {
                let Some(entry) = self.selected_or_toast() else {
                    return Action::None;
                };
                if !entry.summary.is_configured {
                    self.push_toast(
                        texts::tui_toast_not_configured(entry.name()),
                        ToastKind::Warning,
                    );
                    return Action::None;
                }
                self.run_target = Some(entry.name().to_string());
                self.should_quit = true;
                return Action::Run {
                    name: entry.name().to_string(),
                };
            }
            _ => {}
        }
        Action::None
    }
}
