//! Async event loop: producers feed one consumer that owns the game
//!
//! The input task and the gravity ticker both send `Event`s down a single
//! mpsc channel. The consumer applies them in arrival order, redraws when the
//! game changed, and publishes the current gravity interval on a watch channel
//! that the ticker follows.

use crate::game::{Action, Game};
use crate::input::{Command, KeyMap};
use crate::score;
use crate::settings::Settings;
use crate::ui;
use crossterm::event::{self, Event as TermEvent};
use ratatui::{Terminal, backend::Backend};
use std::io;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Queue depth between the producers and the game
const EVENT_CAPACITY: usize = 64;
/// How often the input task checks whether the game has gone away
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Something the game loop must react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Action(Action),
    Tick,
    Redraw,
    Quit,
}

/// What the consumer does after applying an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Redraw,
    Idle,
    Quit,
}

/// Apply one event to the game
pub fn apply_event(game: &mut Game, event: Event) -> Flow {
    let changed = match event {
        Event::Action(action) => game.process_action(action),
        Event::Tick => game.gravity_tick(),
        Event::Redraw => true,
        Event::Quit => return Flow::Quit,
    };
    if changed { Flow::Redraw } else { Flow::Idle }
}

/// Consume events until a quit arrives or every producer has gone away.
///
/// `redraw` is called once up front and after every event that changed the
/// game. The gravity interval is republished whenever the level moves it.
pub async fn drive<F>(
    game: &mut Game,
    events: &mut mpsc::Receiver<Event>,
    interval: &watch::Sender<Duration>,
    mut redraw: F,
) -> io::Result<()>
where
    F: FnMut(&Game) -> io::Result<()>,
{
    redraw(game)?;
    while let Some(event) = events.recv().await {
        match apply_event(game, event) {
            Flow::Quit => {
                info!("quit requested");
                return Ok(());
            }
            Flow::Idle => {}
            Flow::Redraw => {
                redraw(game)?;
                let next = score::interval_duration(game.level());
                interval.send_if_modified(|current| {
                    if *current == next {
                        return false;
                    }
                    debug!("gravity interval now {:?}", next);
                    *current = next;
                    true
                });
            }
        }
    }
    debug!("all event producers closed");
    Ok(())
}

/// Send a tick after each interval; follows interval changes immediately
pub async fn run_ticker(events: mpsc::Sender<Event>, mut interval: watch::Receiver<Duration>) {
    loop {
        let period = *interval.borrow_and_update();
        tokio::select! {
            _ = tokio::time::sleep(period) => {
                if events.send(Event::Tick).await.is_err() {
                    break;
                }
            }
            changed = interval.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    debug!("ticker stopped");
}

/// Blocking terminal reader; exits once the consumer drops its receiver
fn read_input(events: mpsc::Sender<Event>, keymap: KeyMap) {
    while !events.is_closed() {
        let ready = match event::poll(INPUT_POLL) {
            Ok(ready) => ready,
            Err(e) => {
                warn!("terminal poll failed: {}", e);
                break;
            }
        };
        if !ready {
            continue;
        }
        let event = match event::read() {
            Ok(TermEvent::Key(key)) => match keymap.resolve(key) {
                Some(Command::Play(action)) => Event::Action(action),
                Some(Command::Quit) => Event::Quit,
                None => continue,
            },
            Ok(TermEvent::Resize(..)) => Event::Redraw,
            Ok(_) => continue,
            Err(e) => {
                warn!("terminal read failed: {}", e);
                break;
            }
        };
        if events.blocking_send(event).is_err() {
            break;
        }
    }
    // The ticker keeps the channel open, so a dead terminal must end the session
    let _ = events.blocking_send(Event::Quit);
    debug!("input reader stopped");
}

/// Play one session in the given terminal and return the finished game
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, settings: &Settings) -> io::Result<Game> {
    let mut game = Game::new(settings.gameplay.game_config());
    let (event_tx, mut event_rx) = mpsc::channel(EVENT_CAPACITY);
    let (interval_tx, interval_rx) = watch::channel(score::interval_duration(game.level()));

    let keymap = KeyMap::from_settings(settings);
    let input_tx = event_tx.clone();
    let input = tokio::task::spawn_blocking(move || read_input(input_tx, keymap));
    let ticker = tokio::spawn(run_ticker(event_tx, interval_rx));

    let result = drive(&mut game, &mut event_rx, &interval_tx, |game| {
        terminal.draw(|frame| ui::render_game(frame, game, settings)).map(|_| ())
    })
    .await;

    // Dropping the receiver and the watch sender stops both producers
    drop(event_rx);
    drop(interval_tx);
    if let Err(e) = ticker.await {
        warn!("ticker task failed: {}", e);
    }
    if let Err(e) = input.await {
        warn!("input task failed: {}", e);
    }

    info!(
        "session over: {} points, level {}, {} lines",
        game.points(),
        game.level(),
        game.score().lines
    );
    result.map(|_| game)
}
