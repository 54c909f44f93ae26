//! Line-oriented control commands
//!
//! Each line read from stdin stands for one edit of a control and parses
//! into one session message.

use crate::config::TransformOrigin;
use crate::domain::Point;
use crate::domain::input::{parse_int, parse_number};
use crate::session::messages::{KeyPress, Msg, RangeMsg, RulerMsg, SlotMsg, ZoomMsg};
use anyhow::{Context, Result, bail};
use std::path::PathBuf;

/// Usage text printed by `help`
pub const HELP: &str = "\
min N | max N | range A B         edit the range inputs
interval N | ruler-scale PCT      label interval, ruler scale in percent
goto V                            center and mark a value
zoom in|out|reset | zoom PCT      page zoom (slider 5-500)
origin NAME                       top-left, top-right, bottom-left, bottom-right, center
drag start|move X Y | drag end    drag zoom gesture
key [ctrl+]KEY                    keyboard shortcut
upload SLOT PATH | delete SLOT    fill or clear an upload slot
opacity SLOT PCT                  overlay opacity 0-100
move SLOT X Y | resize SLOT SX SY transform an overlay
slots | status | quit";

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse(line: &str) -> Result<Option<Msg>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));
    let args: Vec<&str> = rest.split_whitespace().collect();

    let msg = match verb.to_ascii_lowercase().as_str() {
        "min" => Msg::set_min(parse_int(rest)),
        "max" => Msg::set_max(parse_int(rest)),
        "range" => {
            let [min, max] = exact::<2>(verb, &args)?;
            Msg::Range(RangeMsg::SetBounds(parse_int(min), parse_int(max)))
        }
        "interval" => Msg::set_interval(parse_int(rest)),
        "ruler-scale" => Msg::Ruler(RulerMsg::SetScalePercent(parse_number(
            rest.trim_end_matches('%'),
        ))),
        "goto" => Msg::GoTo(parse_int(rest)),
        "zoom" => parse_zoom(rest)?,
        "origin" => {
            let origin = TransformOrigin::from_name(rest)
                .with_context(|| format!("unknown transform origin {rest:?}"))?;
            Msg::Zoom(ZoomMsg::SetOrigin(origin))
        }
        "drag" => parse_drag(&args)?,
        "key" => Msg::Key(parse_key(rest)?),
        "upload" => {
            let (slot, path) = rest
                .split_once(char::is_whitespace)
                .context("usage: upload SLOT PATH")?;
            Msg::upload(slot, PathBuf::from(path.trim()))
        }
        "opacity" => {
            let [slot, pct] = exact::<2>(verb, &args)?;
            Msg::Slot(SlotMsg::Opacity {
                slot: slot.to_string(),
                pct: parse_int(pct),
            })
        }
        "delete" => {
            let [slot] = exact::<1>(verb, &args)?;
            Msg::Slot(SlotMsg::Delete(slot.to_string()))
        }
        "move" => {
            let [slot, x, y] = exact::<3>(verb, &args)?;
            Msg::Slot(SlotMsg::Move {
                slot: slot.to_string(),
                x: number(x)?,
                y: number(y)?,
            })
        }
        "resize" => {
            let [slot, sx, sy] = exact::<3>(verb, &args)?;
            Msg::Slot(SlotMsg::Resize {
                slot: slot.to_string(),
                sx: number(sx)?,
                sy: number(sy)?,
            })
        }
        "slots" => Msg::ShowSlots,
        "status" => Msg::ShowStatus,
        "quit" | "exit" => Msg::Quit,
        other => bail!("unknown command {other:?}"),
    };
    Ok(Some(msg))
}

fn exact<'a, const N: usize>(verb: &str, args: &[&'a str]) -> Result<[&'a str; N]> {
    <[&str; N]>::try_from(args)
        .map_err(|_| anyhow::anyhow!("{} takes {} argument(s), got {}", verb, N, args.len()))
}

fn number(text: &str) -> Result<f64> {
    parse_number(text).with_context(|| format!("{text:?} is not a number"))
}

fn parse_zoom(rest: &str) -> Result<Msg> {
    Ok(match rest.to_ascii_lowercase().as_str() {
        "in" | "+" => Msg::zoom_in(),
        "out" | "-" => Msg::zoom_out(),
        "reset" => Msg::zoom_reset(),
        other => {
            let percent = number(other.trim_end_matches('%'))?;
            Msg::Zoom(ZoomMsg::SetPercent(percent.clamp(5.0, 500.0)))
        }
    })
}

fn parse_drag(args: &[&str]) -> Result<Msg> {
    match args {
        ["end"] => Ok(Msg::Zoom(ZoomMsg::DragEnd)),
        [phase, x, y] => {
            let at = Point::new(number(x)?, number(y)?);
            match *phase {
                "start" => Ok(Msg::Zoom(ZoomMsg::DragStart(at))),
                "move" => Ok(Msg::Zoom(ZoomMsg::DragMove(at))),
                other => bail!("unknown drag phase {other:?}"),
            }
        }
        _ => bail!("usage: drag start|move X Y | drag end"),
    }
}

/// `ctrl+=`, `ctrl+numpadadd`, `0`, ...
fn parse_key(text: &str) -> Result<KeyPress> {
    if text.is_empty() {
        bail!("usage: key [ctrl+]KEY");
    }
    let (ctrl, key) = match text.split_once('+') {
        Some((modifier, key)) if modifier.eq_ignore_ascii_case("ctrl") && !key.is_empty() => {
            (true, key)
        }
        _ => (false, text),
    };

    let code = match key.to_ascii_lowercase().as_str() {
        "numpadadd" => Some("NumpadAdd"),
        "numpadsubtract" => Some("NumpadSubtract"),
        _ => None,
    };
    let key = match code {
        Some("NumpadAdd") => "+",
        Some(_) => "-",
        None => key,
    };
    Ok(KeyPress {
        key: key.to_string(),
        code: code.map(str::to_string),
        ctrl,
    })
}
