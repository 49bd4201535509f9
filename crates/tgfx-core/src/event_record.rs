#![forbid(unsafe_code)]

//! Platform key-event records to [`Key`].
//!
//! Record-based consoles deliver whole key events rather than bytes, so
//! there is no escape ambiguity and no state machine: each press maps
//! directly onto the key alphabet. Records are `crossterm` events.
//!
//! Only [`KeyEventKind::Press`] key events are translated. Releases,
//! repeats, and non-key events (mouse, resize, focus, paste) are
//! discarded.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::key::Key;
use crate::key_decoder::ESCAPE;

/// Backspace as delivered by record-based consoles.
const BACKSPACE: u8 = 0x08;

/// Translate a record; `None` means "discard and keep looking".
#[must_use]
pub fn translate_event(event: &Event) -> Option<Key> {
    match event {
        Event::Key(key) => translate_key_event(key),
        _ => None,
    }
}

/// Translate a key record; `None` for anything but a press.
#[must_use]
pub fn translate_key_event(event: &KeyEvent) -> Option<Key> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    Some(translate_key_code(event.code, event.modifiers))
}

fn translate_key_code(code: KeyCode, modifiers: KeyModifiers) -> Key {
    match code {
        KeyCode::Char(c) if c.is_ascii_alphabetic() && modifiers.contains(KeyModifiers::CONTROL) => {
            Key::Char(c.to_ascii_uppercase() as u8 & 0x1F)
        }
        KeyCode::Char(c) if c.is_ascii() && !c.is_ascii_control() => Key::Char(c as u8),
        KeyCode::Enter => Key::Char(b'\r'),
        KeyCode::Tab => Key::Char(b'\t'),
        KeyCode::Backspace => Key::Char(BACKSPACE),
        KeyCode::Esc => Key::Char(ESCAPE),
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        _ => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent, MouseEventKind};

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn press(code: KeyCode) -> Event {
        key(code, KeyEventKind::Press)
    }

    #[test]
    fn printable_presses_map_to_bytes() {
        assert_eq!(translate_event(&press(KeyCode::Char('a'))), Some(Key::Char(b'a')));
        assert_eq!(translate_event(&press(KeyCode::Char('7'))), Some(Key::Char(b'7')));
        assert_eq!(translate_event(&press(KeyCode::Char(' '))), Some(Key::Char(b' ')));
        assert_eq!(translate_event(&press(KeyCode::Char(';'))), Some(Key::Char(b';')));
    }

    #[test]
    fn editing_keys_map_to_control_bytes() {
        assert_eq!(translate_event(&press(KeyCode::Enter)), Some(Key::Char(b'\r')));
        assert_eq!(translate_event(&press(KeyCode::Tab)), Some(Key::Char(b'\t')));
        assert_eq!(translate_event(&press(KeyCode::Backspace)), Some(Key::Char(0x08)));
        assert_eq!(translate_event(&press(KeyCode::Esc)), Some(Key::Char(0x1B)));
    }

    #[test]
    fn arrows_map_directly() {
        assert_eq!(translate_event(&press(KeyCode::Left)), Some(Key::Left));
        assert_eq!(translate_event(&press(KeyCode::Right)), Some(Key::Right));
        assert_eq!(translate_event(&press(KeyCode::Up)), Some(Key::Up));
        assert_eq!(translate_event(&press(KeyCode::Down)), Some(Key::Down));
    }

    #[test]
    fn unrepresentable_keys_are_other() {
        assert_eq!(translate_event(&press(KeyCode::F(5))), Some(Key::Other));
        assert_eq!(translate_event(&press(KeyCode::Home)), Some(Key::Other));
        assert_eq!(translate_event(&press(KeyCode::Char('é'))), Some(Key::Other));
    }

    #[test]
    fn ctrl_letters_become_control_codes() {
        let event = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(translate_event(&event), Some(Key::Char(0x03)));
    }

    #[test]
    fn releases_repeats_and_non_key_events_are_discarded() {
        assert_eq!(translate_event(&key(KeyCode::Char('a'), KeyEventKind::Release)), None);
        assert_eq!(translate_event(&key(KeyCode::Char('a'), KeyEventKind::Repeat)), None);
        assert_eq!(translate_event(&Event::FocusGained), None);
        assert_eq!(translate_event(&Event::Resize(80, 24)), None);
        let mouse = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 1,
            row: 1,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(translate_event(&mouse), None);
    }
}
