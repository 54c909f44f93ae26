use crate::session::messages::{KeyPress, Msg};

/// Map a key press to a zoom message. Shortcuts need Ctrl held.
pub fn handle_key_event(press: &KeyPress) -> Option<Msg> {
    if !press.ctrl {
        return None;
    }
    match (press.key.as_str(), press.code.as_deref()) {
        (_, Some("NumpadSubtract")) | ("-", _) => Some(Msg::zoom_out()),
        (_, Some("NumpadAdd")) | ("=", _) | ("+", _) => Some(Msg::zoom_in()),
        ("0", _) => Some(Msg::zoom_reset()),
        _ => None,
    }
}
