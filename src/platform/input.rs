//! Decoded input events and key mapping

use std::sync::mpsc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use serde::{Deserialize, Serialize};

/// A discrete game input, already decoded from raw keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputEvent {
    MoveLeft,
    MoveRight,
    Confirm,
    Restart,
    /// Start a one-player game from the title screen
    SelectOnePlayer,
    /// Start a two-player game from the title screen
    SelectTwoPlayer,
    MoveLeft2,
    MoveRight2,
    Drop2,
    Confirm2,
}

/// What a key press means to the front end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Game(InputEvent),
    Quit,
}

/// Map a terminal key to an action
pub fn map_key(key: &KeyEvent) -> Option<KeyAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(KeyAction::Quit);
    }
    let event = match key.code {
        KeyCode::Char('a') | KeyCode::Char('A') => InputEvent::MoveLeft,
        KeyCode::Char('d') | KeyCode::Char('D') => InputEvent::MoveRight,
        KeyCode::Char(' ') => InputEvent::Confirm,
        KeyCode::Char('r') | KeyCode::Char('R') => InputEvent::Restart,
        KeyCode::Char('1') => InputEvent::SelectOnePlayer,
        KeyCode::Char('2') => InputEvent::SelectTwoPlayer,
        KeyCode::Left => InputEvent::MoveLeft2,
        KeyCode::Right => InputEvent::MoveRight2,
        KeyCode::Down => InputEvent::Drop2,
        KeyCode::Enter => InputEvent::Confirm2,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Some(KeyAction::Quit),
        _ => return None,
    };
    Some(KeyAction::Game(event))
}

/// Non-blocking per-tick input poll
pub trait InputSource {
    /// Drain everything that arrived since the last poll
    fn poll(&mut self) -> Vec<KeyAction>;
}

/// Input fed by a terminal reader thread
pub struct ChannelInput {
    rx: mpsc::Receiver<Event>,
}

impl ChannelInput {
    pub fn new(rx: mpsc::Receiver<Event>) -> Self {
        Self { rx }
    }
}

impl InputSource for ChannelInput {
    fn poll(&mut self) -> Vec<KeyAction> {
        let mut actions = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            if let Event::Key(key) = event {
                actions.extend(map_key(&key));
            }
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_player_one_keys() {
        assert_eq!(
            map_key(&press(KeyCode::Char('a'))),
            Some(KeyAction::Game(InputEvent::MoveLeft))
        );
        assert_eq!(
            map_key(&press(KeyCode::Char('D'))),
            Some(KeyAction::Game(InputEvent::MoveRight))
        );
        assert_eq!(
            map_key(&press(KeyCode::Char(' '))),
            Some(KeyAction::Game(InputEvent::Confirm))
        );
    }

    #[test]
    fn test_arrow_keys_drive_player_two() {
        assert_eq!(
            map_key(&press(KeyCode::Down)),
            Some(KeyAction::Game(InputEvent::Drop2))
        );
        assert_eq!(
            map_key(&press(KeyCode::Enter)),
            Some(KeyAction::Game(InputEvent::Confirm2))
        );
    }

    #[test]
    fn test_quit_and_unmapped() {
        assert_eq!(map_key(&press(KeyCode::Esc)), Some(KeyAction::Quit));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&ctrl_c), Some(KeyAction::Quit));
        assert_eq!(map_key(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_channel_input_drains_pending_keys() {
        let (tx, rx) = mpsc::channel();
        let mut input = ChannelInput::new(rx);
        tx.send(Event::Key(press(KeyCode::Char('a')))).unwrap();
        tx.send(Event::Key(press(KeyCode::Char('a')))).unwrap();
        tx.send(Event::FocusGained).unwrap();
        let actions = input.poll();
        assert_eq!(actions.len(), 2);
        assert!(input.poll().is_empty());
    }
}
