use std::io;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use reelspin_core::{Millis, SettingsError, SpinController, SpinError, WidgetEvent};
use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, info, warn};

use crate::ui::{self, Overlay, View};

/// Redraw interval while nothing is due sooner.
const FRAME_MS: Millis = 33;

enum Flow {
    Continue,
    Quit,
}

/// Monotonic milliseconds since the widget was mounted.
struct Clock(Instant);

impl Clock {
    fn now(&self) -> Millis {
        self.0.elapsed().as_millis() as Millis
    }
}

/// Runs a closure when dropped, so the terminal is restored on every exit path.
struct OnDrop<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

fn restore_terminal() {
    let restored = disable_raw_mode()
        .and_then(|()| execute!(io::stdout(), LeaveAlternateScreen, cursor::Show));
    if let Err(e) = restored {
        warn!(error = %e, "failed to restore terminal");
    }
}

fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Runs the interactive widget until the user quits. Pending timers are
/// cancelled and the terminal restored on the way out, whether the loop
/// ended cleanly or not.
pub async fn run(mut ctl: SpinController) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let restore = OnDrop(Some(restore_terminal));

    let result = async {
        let mut terminal = setup_terminal()?;
        event_loop(&mut terminal, &mut ctl).await
    }
    .await;

    let cancelled = ctl.teardown();
    debug!(cancelled, "timers cancelled on exit");
    drop(restore);
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ctl: &mut SpinController,
) -> anyhow::Result<()> {
    let clock = Clock(Instant::now());
    let mut view = View::default();

    loop {
        let now = clock.now();
        for ev in ctl.advance(now) {
            if let WidgetEvent::CycleComplete { values, .. } = ev {
                info!(?values, "settled");
            }
        }

        terminal.draw(|f| ui::draw(f, ctl, &view, now))?;

        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Flow::Quit = handle_key(key, ctl, &mut view, clock.now()) {
                    return Ok(());
                }
            }
        }

        let now = clock.now();
        let wait = ctl
            .next_due()
            .map_or(FRAME_MS, |due| due.saturating_sub(now))
            .clamp(1, FRAME_MS);
        sleep(Duration::from_millis(wait)).await;
    }
}

fn handle_key(key: KeyEvent, ctl: &mut SpinController, view: &mut View, now: Millis) -> Flow {
    match view.overlay {
        Overlay::Help => {
            view.overlay = view.help_return;
            Flow::Continue
        }
        Overlay::Settings => {
            match key.code {
                KeyCode::Esc | KeyCode::Char('s') => view.overlay = Overlay::None,
                KeyCode::Char('h') => open_help(view),
                KeyCode::Char('m') => {
                    ctl.toggle_sound();
                }
                KeyCode::Left | KeyCode::Char('-') => {
                    let n = ctl.settings().digit_count.saturating_sub(1);
                    resize(ctl, view, n);
                }
                KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') => {
                    let n = ctl.settings().digit_count + 1;
                    resize(ctl, view, n);
                }
                KeyCode::Char('q') => return Flow::Quit,
                _ => {}
            }
            Flow::Continue
        }
        Overlay::None => {
            match key.code {
                KeyCode::Char(' ') | KeyCode::Enter => spin(ctl, view, now),
                KeyCode::Char('s') => view.overlay = Overlay::Settings,
                KeyCode::Char('h') => open_help(view),
                KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
                _ => {}
            }
            Flow::Continue
        }
    }
}

fn open_help(view: &mut View) {
    view.help_return = view.overlay;
    view.overlay = Overlay::Help;
}

fn spin(ctl: &mut SpinController, view: &mut View, now: Millis) {
    match ctl.request_spin(now) {
        Ok(_) => {
            view.spins += 1;
            view.status = None;
        }
        // The button is disabled while spinning; extra presses are ignored.
        Err(SpinError::AlreadySpinning) => {}
        Err(e) => view.status = Some(e.to_string()),
    }
}

fn resize(ctl: &mut SpinController, view: &mut View, n: usize) {
    view.status = match ctl.set_digit_count(n) {
        Ok(()) => None,
        // Pressing past either end of the range does nothing.
        Err(SettingsError::DigitCountOutOfRange(_)) => None,
        Err(e) => Some(e.to_string()),
    };
}
