use anyhow::{anyhow, Context, Result};
use app::{AppBuilder, Application};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;
use style_switch::{
    InteractorStyle as _, LocalEventSource, Notification, Settings, SourceHandle, StandardStyle,
    StyleSwitch, SwitchSettings,
};
use tracing::info;

struct SwitchDemo;

impl Application for SwitchDemo {
    const APP_ID: &'static str = "switch_demo";
}

#[derive(Parser, Debug)]
#[command(version, about = "Type mode keys (j t c a m) to switch interactor styles")]
struct Cli {
    /// TOML settings file with a `[style_switch]` section.
    #[arg(long)]
    settings: Option<PathBuf>,
}

/// What the harness should do after a line was processed.
#[derive(Debug, PartialEq, Eq)]
enum LineOutcome {
    Continue,
    Quit,
}

struct Harness {
    source: Rc<LocalEventSource>,
    switch: StyleSwitch,
}

impl Harness {
    fn new(settings: &SwitchSettings) -> Self {
        let source = Rc::new(LocalEventSource::new());
        let mut switch = StyleSwitch::from_settings(settings, StandardStyle::boxed);
        switch.set_event_source(Some(SourceHandle::new(&source)));
        Self { source, switch }
    }

    fn run_line(&mut self, line: &str, out: &mut impl Write) -> io::Result<LineOutcome> {
        for ch in line.chars() {
            match ch {
                'q' => return Ok(LineOutcome::Quit),
                '?' => write!(out, "{}", self.switch)?,
                ch if ch.is_whitespace() => {}
                ch => {
                    let switch = &mut self.switch;
                    let propagation = self
                        .source
                        .emit(&Notification::character(ch), |id, n| switch.deliver(id, n));
                    if !propagation.is_consumed() {
                        writeln!(out, "'{ch}' is not bound")?;
                    }
                }
            }
        }
        match self.switch.active_kind() {
            Some(kind) => writeln!(out, "active: {kind}")?,
            None => writeln!(out, "active: none")?,
        }
        Ok(LineOutcome::Continue)
    }

    fn shutdown(&mut self) {
        let switch = &mut self.switch;
        self.source.shutdown(|id, n| switch.deliver(id, n));
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _ctx = AppBuilder::<SwitchDemo>::new(env!("CARGO_PKG_VERSION"))
        .build()
        .map_err(|e| anyhow!(e))
        .context("initialising logging")?;

    let settings = match &cli.settings {
        Some(path) => SwitchSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => SwitchSettings::default(),
    };
    info!("starting with mode {:?}", settings.initial_mode);

    let mut harness = Harness::new(&settings);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Some(style) = harness.switch.active_style() {
        writeln!(out, "active: {}", style.class_name())?;
    }

    for line in io::stdin().lock().lines() {
        if harness.run_line(&line?, &mut out)? == LineOutcome::Quit {
            break;
        }
    }

    harness.shutdown();
    info!("event source shut down");
    Ok(())
}
