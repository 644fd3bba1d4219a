//! `toploader simulate`: replay a scripted navigation session headless.
//!
//! Each step clicks an anchor, waits for the simulated page load, lets the
//! router push the new entry, and waits for the bar to fade out. The
//! recorded style changes are then printed frame by frame.

use crate::cli::output::{self, Styled};
use crate::host::memory::{HistoryEntry, StyleChange};
use crate::host::{ClickEvent, Event, Headless};
use crate::settings::{Direction, Settings};
use crate::{NavigationBinder, ProgressEngine};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::info;

/// Parameters of a simulated session.
#[derive(Debug, Clone)]
pub struct SimulateArgs {
    /// Location the session starts at.
    pub from: String,
    /// Hrefs clicked in order.
    pub clicks: Vec<String>,
    /// Simulated page load time per navigation.
    pub load_ms: u64,
    /// Mirror the engine on a live terminal bar.
    pub live: bool,
}

/// Everything a session produced.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub settings: Settings,
    pub frames: Vec<StyleChange>,
    pub history: Vec<HistoryEntry>,
}

/// Run the simulate command.
pub async fn run(settings: Settings, args: SimulateArgs) -> Result<()> {
    let report = simulate(settings, &args).await?;

    if output::is_json() {
        return output::print_json(&report);
    }
    if !output::is_quiet() {
        print_report(&report);
    }
    Ok(())
}

/// Drive the session and collect what the document saw.
pub async fn simulate(settings: Settings, args: &SimulateArgs) -> Result<SessionReport> {
    let page = Headless::new(&args.from)
        .with_context(|| format!("invalid start location {:?}", args.from))?;
    let binder = NavigationBinder::mount(&page.window, settings);
    let engine = binder.engine().clone();
    let live = if args.live {
        Some(live_bar(engine.clone())?)
    } else {
        None
    };

    for href in &args.clicks {
        info!(href = href.as_str(), "clicking");
        page.window.dispatch(&Event::Click(ClickEvent::on_anchor(href)));
        tokio::time::sleep(Duration::from_millis(args.load_ms)).await;
        page.window
            .push_state(Value::Null, Some(href))
            .with_context(|| format!("router could not navigate to {href:?}"))?;
        wait_until_idle(&engine).await;
    }

    if let Some((bar, task)) = live {
        task.abort();
        bar.finish_and_clear();
    }

    let report = SessionReport {
        settings: engine.settings().clone(),
        frames: page.document.style_changes(),
        history: page.history.entries(),
    };
    binder.unmount();
    Ok(report)
}

async fn wait_until_idle(engine: &ProgressEngine) {
    let step = Duration::from_millis(engine.settings().speed.max(10));
    while engine.is_started() {
        tokio::time::sleep(step).await;
    }
}

fn live_bar(engine: ProgressEngine) -> Result<(ProgressBar, JoinHandle<()>)> {
    let bar = ProgressBar::new(1000);
    bar.set_style(
        ProgressStyle::with_template("  {bar:40.cyan/blue} {msg}")?
            .progress_chars("\u{2501}\u{2501}\u{2500}"),
    );
    let mirror = bar.clone();
    let task = tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_millis(30));
        loop {
            tick.tick().await;
            match engine.status() {
                Some(progress) => {
                    mirror.set_position((progress * 1000.0) as u64);
                    mirror.set_message(format!("{:>5.1}%", progress * 100.0));
                }
                None => {
                    mirror.set_position(0);
                    mirror.set_message("idle");
                }
            }
        }
    });
    Ok((bar, task))
}

fn print_report(report: &SessionReport) {
    let s = Styled::new();
    output::print_header(&s);

    output::print_section(&s, "Frames");
    for frame in &report.frames {
        let position = position_of(frame, report.settings.dir)
            .map(|p| output::progress_bar(p, 20))
            .unwrap_or_default();
        println!(
            "    {} {:<24} {:<12} {:<28} {}",
            s.dim(&format!("+{:>5}ms", frame.at_ms)),
            frame.selector,
            s.cyan(&frame.property),
            frame.value,
            position
        );
    }
    println!();

    output::print_section(&s, "History");
    for entry in &report.history {
        println!("    {} {}", s.ok_sym(), entry.url);
    }
}

/// Progress shown by a positioning frame, if it is one.
fn position_of(frame: &StyleChange, dir: Direction) -> Option<f64> {
    if frame.property != "transform" && frame.property != "margin-left" {
        return None;
    }
    let value = frame.value.as_str();
    let start = value.find('(').map_or(0, |i| i + 1);
    let end = value.find('%')?;
    let offset: f64 = value.get(start..end)?.trim().parse().ok()?;
    Some(match dir {
        Direction::Ltr => 1.0 + offset / 100.0,
        Direction::Rtl => 1.0 - offset / 100.0,
    })
}
