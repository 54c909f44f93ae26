use crate::config::StageConfig;
use crate::core::command;
use crate::navigation::Viewport;
use crate::overlays::decode::{DocumentRenderer, NoDocumentBackend, load_upload};
use crate::session::display::ControlDisplay;
use crate::session::handlers::{Effect, handle_msg};
use crate::session::messages::{DecodeResult, Msg};
use crate::session::state::{DecodeJob, StageSession};
use crate::zoom::ZoomDisplay;
use anyhow::Context;
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

pub(crate) fn run() -> anyhow::Result<()> {
    let config = StageConfig::load();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start the event loop")?;
    runtime.block_on(event_loop(config))
}

async fn event_loop(config: StageConfig) -> anyhow::Result<()> {
    let (tx, mut rx) = unbounded_channel::<Msg>();
    spawn_stdin_reader(tx.clone());

    let documents: Arc<dyn DocumentRenderer> = Arc::new(NoDocumentBackend);
    let document_scale = config.document_scale;
    let viewport = ScrollViewport::new(config.viewport_height, config.stage_height as f64);
    let mut session = StageSession::new(config, viewport, ConsoleDisplay)?;
    println!("{}", session.status());

    while let Some(msg) = rx.recv().await {
        match handle_msg(&mut session, msg) {
            Some(Effect::Decode(job)) => {
                spawn_decode(job, documents.clone(), document_scale, tx.clone());
            }
            Some(Effect::Print(text)) => println!("{text}"),
            Some(Effect::Quit) => break,
            None => {}
        }
    }
    log::info!("Event loop finished");
    Ok(())
}

/// Decode off the loop and report back as `Msg::Decoded`
fn spawn_decode(
    job: DecodeJob,
    documents: Arc<dyn DocumentRenderer>,
    document_scale: f32,
    tx: UnboundedSender<Msg>,
) {
    tokio::spawn(async move {
        let DecodeJob { ticket, path } = job;
        let result = load_upload(path.clone(), documents, document_scale).await;
        let decoded = DecodeResult {
            ticket,
            source: path,
            result,
        };
        if tx.send(Msg::Decoded(decoded)).is_err() {
            log::debug!("Decode finished after the event loop stopped");
        }
    });
}

/// Forward parsed stdin lines to the loop; end of input quits
fn spawn_stdin_reader(tx: UnboundedSender<Msg>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    log::error!("Failed to read stdin: {}", err);
                    break;
                }
            };
            if line.trim().eq_ignore_ascii_case("help") {
                println!("{}", command::HELP);
                continue;
            }
            match command::parse(&line) {
                Ok(Some(msg)) => {
                    if tx.send(msg).is_err() {
                        return;
                    }
                }
                Ok(None) => {}
                Err(err) => log::warn!("Ignoring {:?}: {:#}", line, err),
            }
        }
        let _ = tx.send(Msg::Quit);
    });
}

/// Scroll position of the window around the composed view
#[derive(Debug)]
struct ScrollViewport {
    height: f64,
    content_height: f64,
    top: f64,
}

impl ScrollViewport {
    fn new(height: f64, content_height: f64) -> Self {
        Self {
            height,
            content_height,
            top: 0.0,
        }
    }
}

impl Viewport for ScrollViewport {
    fn height(&self) -> f64 {
        self.height
    }

    fn scroll_to(&mut self, top: f64, animated: bool) {
        let max_top = (self.content_height - self.height).max(0.0);
        self.top = top.clamp(0.0, max_top);
        log::info!(
            "Viewport scrolled to {:.1}{}",
            self.top,
            if animated { " (smooth)" } else { "" }
        );
    }
}

/// Mirrors control state to the log
#[derive(Debug)]
struct ConsoleDisplay;

impl ZoomDisplay for ConsoleDisplay {
    fn show_page_scale(&mut self, slider: u32, label: &str) {
        log::info!("Zoom slider {} ({})", slider, label);
    }
}

impl ControlDisplay for ConsoleDisplay {
    fn show_ruler_scale(&mut self, label: &str) {
        log::info!("Ruler scale {}", label);
    }

    fn show_slot_added(&mut self, label: &str) {
        log::info!("Upload slot {} available", label);
    }

    fn show_slot_opacity(&mut self, label: &str, pct: u8) {
        log::info!("Slot {} opacity {}%", label, pct);
    }
}
