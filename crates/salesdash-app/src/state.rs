// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::query::FilterField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Filters(FilterField),
    Question,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub focus: Focus,
    pub filters_open: bool,
    pub detail_open: bool,
    pub help_visible: bool,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            focus: Focus::Table,
            filters_open: false,
            detail_open: false,
            help_visible: false,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    ToggleFilters,
    CloseFilters,
    NextFilterField,
    PrevFilterField,
    OpenQuestion,
    CloseQuestion,
    ShowDetail,
    HideDetail,
    ToggleHelp,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    FocusChanged(Focus),
    FilterPanelChanged(bool),
    DetailChanged(bool),
    HelpChanged(bool),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::ToggleFilters => {
                if self.filters_open {
                    self.close_filters()
                } else {
                    self.filters_open = true;
                    self.focus = Focus::Filters(FilterField::ALL[0]);
                    vec![
                        AppEvent::FilterPanelChanged(true),
                        AppEvent::FocusChanged(self.focus),
                    ]
                }
            }
            AppCommand::CloseFilters => self.close_filters(),
            AppCommand::NextFilterField => self.rotate_filter_field(1),
            AppCommand::PrevFilterField => self.rotate_filter_field(-1),
            AppCommand::OpenQuestion => {
                self.focus = Focus::Question;
                vec![
                    AppEvent::FocusChanged(self.focus),
                    self.set_status("ask a question"),
                ]
            }
            AppCommand::CloseQuestion => {
                self.focus = if self.filters_open {
                    Focus::Filters(FilterField::ALL[0])
                } else {
                    Focus::Table
                };
                vec![AppEvent::FocusChanged(self.focus)]
            }
            AppCommand::ShowDetail => self.set_detail(true),
            AppCommand::HideDetail => self.set_detail(false),
            AppCommand::ToggleHelp => {
                self.help_visible = !self.help_visible;
                vec![AppEvent::HelpChanged(self.help_visible)]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn close_filters(&mut self) -> Vec<AppEvent> {
        if !self.filters_open {
            return Vec::new();
        }
        self.filters_open = false;
        let mut events = vec![AppEvent::FilterPanelChanged(false)];
        if matches!(self.focus, Focus::Filters(_)) {
            self.focus = Focus::Table;
            events.push(AppEvent::FocusChanged(self.focus));
        }
        events
    }

    fn set_detail(&mut self, open: bool) -> Vec<AppEvent> {
        if self.detail_open == open {
            return Vec::new();
        }
        self.detail_open = open;
        vec![AppEvent::DetailChanged(open)]
    }

    fn rotate_filter_field(&mut self, delta: isize) -> Vec<AppEvent> {
        let Focus::Filters(current) = self.focus else {
            return Vec::new();
        };
        let fields = FilterField::ALL;
        let index = fields
            .iter()
            .position(|field| *field == current)
            .unwrap_or(0) as isize;
        let len = fields.len() as isize;
        let next = (index + delta).rem_euclid(len) as usize;
        self.focus = Focus::Filters(fields[next]);
        vec![AppEvent::FocusChanged(self.focus)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
