//! Message dispatch for a stage session

use crate::navigation::Viewport;
use crate::session::display::ControlDisplay;
use crate::session::messages::{Msg, RangeMsg, RulerMsg, SlotMsg, ZoomMsg};
use crate::session::shortcuts;
use crate::session::state::{DecodeJob, StageSession};

/// Work the event loop has to do after a message was handled
#[derive(Debug, PartialEq)]
pub enum Effect {
    /// Decode a file off the loop and send back `Msg::Decoded`
    Decode(DecodeJob),
    /// Text for the operator
    Print(String),
    Quit,
}

pub fn handle_msg<V: Viewport, D: ControlDisplay>(
    session: &mut StageSession<V, D>,
    msg: Msg,
) -> Option<Effect> {
    match msg {
        Msg::Range(msg) => {
            handle_range_msg(session, msg);
            None
        }
        Msg::Ruler(msg) => {
            handle_ruler_msg(session, msg);
            None
        }
        Msg::Zoom(msg) => {
            handle_zoom_msg(session, msg);
            None
        }
        Msg::Slot(msg) => handle_slot_msg(session, msg),
        Msg::GoTo(value) => {
            session.go_to(value);
            None
        }
        Msg::Key(press) => {
            let msg = shortcuts::handle_key_event(&press)?;
            handle_msg(session, msg)
        }
        Msg::Decoded(result) => {
            session.finish_upload(result);
            None
        }
        Msg::ShowSlots => Some(Effect::Print(session.slot_lines().join("\n"))),
        Msg::ShowStatus => {
            let status = session.status();
            log::info!("Status: {:?}", status);
            Some(Effect::Print(status.to_string()))
        }
        Msg::Quit => Some(Effect::Quit),
    }
}

fn handle_range_msg<V: Viewport, D: ControlDisplay>(session: &mut StageSession<V, D>, msg: RangeMsg) {
    match msg {
        RangeMsg::SetMin(min) => session.set_min(min),
        RangeMsg::SetMax(max) => session.set_max(max),
        RangeMsg::SetBounds(min, max) => session.set_range(min, max),
    };
}

fn handle_ruler_msg<V: Viewport, D: ControlDisplay>(session: &mut StageSession<V, D>, msg: RulerMsg) {
    match msg {
        RulerMsg::SetInterval(interval) => session.set_interval(interval),
        RulerMsg::SetScalePercent(percent) => session.set_ruler_scale_percent(percent),
    };
}

fn handle_zoom_msg<V: Viewport, D: ControlDisplay>(session: &mut StageSession<V, D>, msg: ZoomMsg) {
    match msg {
        ZoomMsg::In => {
            let scale = session.zoom_in();
            log::info!("Zoomed in to {}%", scale.percent());
        }
        ZoomMsg::Out => {
            let scale = session.zoom_out();
            log::info!("Zoomed out to {}%", scale.percent());
        }
        ZoomMsg::Reset => {
            session.reset_zoom();
            log::info!("Zoom reset");
        }
        ZoomMsg::SetPercent(percent) => {
            session.set_zoom_percent(percent);
        }
        ZoomMsg::SetOrigin(origin) => session.set_origin(origin),
        ZoomMsg::DragStart(at) => {
            if session.zoom().is_dragging() {
                log::debug!("Zoom drag restarted at {:?}", at);
            }
            session.begin_zoom_drag(at);
        }
        ZoomMsg::DragMove(at) => {
            if session.zoom_drag_to(at).is_none() {
                log::debug!("Zoom drag move without a drag in progress");
            }
        }
        ZoomMsg::DragEnd => {
            session.end_zoom_drag();
        }
    }
}

fn handle_slot_msg<V: Viewport, D: ControlDisplay>(
    session: &mut StageSession<V, D>,
    msg: SlotMsg,
) -> Option<Effect> {
    match msg {
        SlotMsg::Upload { slot, path } => session.begin_upload(&slot, path).map(Effect::Decode),
        SlotMsg::Opacity { slot, pct } => {
            session.set_slot_opacity(&slot, pct);
            None
        }
        SlotMsg::Delete(slot) => {
            session.delete_slot(&slot);
            None
        }
        SlotMsg::Move { slot, x, y } => {
            session.move_slot(&slot, x, y);
            None
        }
        SlotMsg::Resize { slot, sx, sy } => {
            session.resize_slot(&slot, sx, sy);
            None
        }
    }
}
