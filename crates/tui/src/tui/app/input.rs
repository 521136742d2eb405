use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::constants::STATUS_REFRESHED;
use crate::tui::form::FormField;

use super::{App, ConfirmChoice, InputMode};

#[derive(Debug, Clone, Copy)]
pub(crate) enum NormalAction {
    Quit,
    EnterAdd,
    EnterEdit,
    ToggleDone,
    Delete,
    ShowDetails,
    ShowHelp,
    Refresh,
    SelectNext,
    SelectPrev,
    PrevTab,
    NextTab,
    SelectFirst,
    SelectLast,
}

impl NormalAction {
    pub(crate) fn from_event(key: &KeyEvent) -> Option<Self> {
        if matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Self::Quit);
        }

        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('a') => Some(Self::EnterAdd),
            KeyCode::Char('e') => Some(Self::EnterEdit),
            KeyCode::Char('d') | KeyCode::Char(' ') => Some(Self::ToggleDone),
            KeyCode::Char('x') | KeyCode::Delete => Some(Self::Delete),
            KeyCode::Char('h') | KeyCode::Char('?') => Some(Self::ShowHelp),
            KeyCode::Char('r') => Some(Self::Refresh),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Self::SelectPrev),
            KeyCode::Left | KeyCode::BackTab => Some(Self::PrevTab),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => Some(Self::NextTab),
            KeyCode::Enter => Some(Self::ShowDetails),
            KeyCode::Home => Some(Self::SelectFirst),
            KeyCode::End => Some(Self::SelectLast),
            _ => None,
        }
    }
}

impl App {
    pub(crate) fn on_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_mode(key),
            InputMode::Form => self.handle_form_mode(key),
            InputMode::Inspect => self.handle_inspect_mode(key),
            InputMode::Help => self.handle_help_mode(key),
            InputMode::ConfirmDelete => self.handle_confirm_delete_mode(key),
        }
        Ok(())
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) {
        if let Some(action) = NormalAction::from_event(&key) {
            self.execute_normal_action(action);
        }
    }

    fn execute_normal_action(&mut self, action: NormalAction) {
        match action {
            NormalAction::Quit => {
                self.should_quit = true;
            }
            NormalAction::EnterAdd => self.open_add_form(),
            NormalAction::EnterEdit => self.open_edit_form(),
            NormalAction::ToggleDone => self.toggle_current(),
            NormalAction::Delete => self.prompt_delete(),
            NormalAction::ShowDetails => self.show_selected_details(),
            NormalAction::ShowHelp => self.show_help_overlay(),
            NormalAction::Refresh => {
                self.refresh();
                if !self.should_quit() {
                    self.set_status_info(STATUS_REFRESHED);
                }
            }
            NormalAction::SelectNext => self.select_next(),
            NormalAction::SelectPrev => self.select_prev(),
            NormalAction::PrevTab => self.prev_tab(),
            NormalAction::NextTab => self.next_tab(),
            NormalAction::SelectFirst => {
                if !self.visible.is_empty() {
                    self.selected = 0;
                    self.table_state.select(Some(self.selected));
                }
            }
            NormalAction::SelectLast => {
                if !self.visible.is_empty() {
                    self.selected = self.visible.len() - 1;
                    self.table_state.select(Some(self.selected));
                }
            }
        }
    }

    fn handle_form_mode(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            self.input_mode = InputMode::Normal;
            return;
        };

        match key.code {
            KeyCode::Enter => self.submit_form(),
            KeyCode::Esc => self.cancel_form(),
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Char(' ') if form.field == FormField::Category => {
                form.cycle_category(true);
            }
            KeyCode::Right if form.field == FormField::Category => {
                form.cycle_category(true);
            }
            KeyCode::Left if form.field == FormField::Category => {
                form.cycle_category(false);
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = form.active_buffer_mut() {
                    buffer.insert_char(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = form.active_buffer_mut() {
                    buffer.backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(buffer) = form.active_buffer_mut() {
                    buffer.delete_char();
                }
            }
            KeyCode::Left => {
                if let Some(buffer) = form.active_buffer_mut() {
                    buffer.move_left();
                }
            }
            KeyCode::Right => {
                if let Some(buffer) = form.active_buffer_mut() {
                    buffer.move_right();
                }
            }
            KeyCode::Home => {
                if let Some(buffer) = form.active_buffer_mut() {
                    buffer.move_home();
                }
            }
            KeyCode::End => {
                if let Some(buffer) = form.active_buffer_mut() {
                    buffer.move_end();
                }
            }
            _ => {}
        }
    }

    fn handle_inspect_mode(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            self.inspect_task = None;
            self.input_mode = InputMode::Normal;
            self.status = None;
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            self.input_mode = InputMode::Normal;
            self.status = None;
        }
    }

    fn handle_confirm_delete_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
                self.set_status_info("Deletion cancelled");
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                self.confirm_choice = self.confirm_choice.toggle();
            }
            KeyCode::Enter => {
                if self.confirm_choice == ConfirmChoice::Yes {
                    self.perform_delete();
                } else {
                    self.set_status_info("Deletion cancelled");
                }
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }
}
