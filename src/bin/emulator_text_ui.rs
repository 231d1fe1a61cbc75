use std::process;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use cursive::CbSink;
use log::{error, info, warn};
use thiserror::Error;

use chip_8_interpreter::{
    chip::{
        chip8::{
            cursive_display::{ChipWithCursiveDisplay, Display, DisplayError},
            Chip8,
        },
        Chip, InputPins, LoadProgramError, Speaker,
    },
    config::Config,
};

/// Upper bound for the instruction rate selectable at runtime.
const MAX_INSTRUCTIONS_PER_SECOND: u32 = 64_000;

/// If the loop falls further behind than this, the missed instructions are dropped
/// instead of being executed in a burst.
const MAX_LAG: Duration = Duration::from_millis(100);

/// Error type for errors that occur while loading the program and running it.
#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    InvalidProgram(#[from] LoadProgramError),

    #[error(transparent)]
    Display(#[from] DisplayError),
}

/// Represents an event to be processed by the event loop. It is generic
/// over the type representing the pressed key.
enum Event<T> {
    /// Occurs when the key passed in the enum value was pressed.
    Key(T),

    /// Indicates that all keys are released. Terminals only report key presses,
    /// so one key is assigned to releasing all keys.
    KeyRelease,

    /// Doubles the instruction rate.
    SpeedUp,

    /// Halves the instruction rate.
    SlowDown,

    /// Shut down.
    Quit,
}

/// Represents the channels available to the event loop. It is generic
/// over the type representing the pressed keys.
#[derive(Clone)]
struct EventLoopChannels<T> {
    /// The channel to send the UI refresh messages to.
    gfx_sender: CbSink,

    /// The channel on which the Events are received.
    key_receiver: Receiver<Event<T>>,

    /// A channel to report that the thread has completed
    /// shutdown.
    shutdown_sender: Sender<()>,
}

/// Remembers the last speaker signal so the panel title can follow it.
#[derive(Default)]
struct TitleSpeaker {
    on: bool,
    changed: bool,
}

impl Speaker for TitleSpeaker {
    fn set_speaker(&mut self, on: bool) {
        self.changed |= self.on != on;
        self.on = on;
    }
}

/// Converts a rate in events per second into the period between two events.
fn period(rate: u32) -> Duration {
    Duration::from_secs(1) / rate.max(1)
}

/// The event loop. Constantly loops over (1) process events if there are any.
/// (2) Advance the timers by the elapsed time. (3) Execute the instructions that
/// are due. (4) Refresh the UI at the frame rate. (5) Sleep until the next
/// instruction or frame is due.
fn event_loop<T>(
    mut chip: T,
    config: &Config,
    io_channels: &EventLoopChannels<u8>,
) -> Result<(), Error>
where
    T: Chip + ChipWithCursiveDisplay,
{
    let mut keys = InputPins::new();
    let mut speaker = TitleSpeaker::default();
    let mut ips = config.ips;
    let frame_period = period(config.frame_rate);

    let mut last_timer_update = Instant::now();
    let mut next_step = last_timer_update;
    let mut next_frame = last_timer_update;

    loop {
        loop {
            match io_channels.key_receiver.try_recv() {
                Ok(Event::Key(key)) => keys.set_input_pin(key, true),
                Ok(Event::KeyRelease) => keys.reset_input_pins(),
                Ok(Event::SpeedUp) => {
                    ips = ips.saturating_mul(2).min(MAX_INSTRUCTIONS_PER_SECOND);
                    info!("Running at {} instructions per second", ips);
                }
                Ok(Event::SlowDown) => {
                    ips = (ips / 2).max(1);
                    info!("Running at {} instructions per second", ips);
                }
                Ok(Event::Quit) | Err(TryRecvError::Disconnected) => {
                    info!("Shutting down");
                    return Ok(());
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        let now = Instant::now();

        let elapsed_ms = now.duration_since(last_timer_update).as_millis() as u32;
        if elapsed_ms > 0 {
            chip.tick_timers(elapsed_ms, &mut speaker);
            last_timer_update += Duration::from_millis(elapsed_ms as u64);
        }

        if now.duration_since(next_step) > MAX_LAG {
            warn!("Falling behind, skipping instructions");
            next_step = now;
        }
        let step_period = period(ips);
        while next_step <= now {
            chip.step(&keys);
            next_step += step_period;
        }

        if next_frame <= now {
            chip.update_ui(&io_channels.gfx_sender, speaker.on, speaker.changed)?;
            speaker.changed = false;
            next_frame = now + frame_period;
        }

        let wake_up = next_step.min(next_frame);
        let now = Instant::now();
        if wake_up > now {
            thread::sleep(wake_up - now);
        }
    }
}

/// Builds the chip described by `config` and loads its program.
fn load_chip(config: &Config) -> Result<Chip8, Error> {
    let mut chip8 = match config.seed {
        Some(seed) => Chip8::with_seed(seed),
        None => Chip8::new(),
    };
    let size = chip8.load_program(&config.program, config.program_format())?;
    info!("Loaded {} bytes from {}", size, config.program.display());
    Ok(chip8)
}

/// Forwards `event` to the event loop. A closed channel means the loop has already
/// stopped, which is only worth a warning.
fn forward(sender: &Sender<Event<u8>>, event: Event<u8>) {
    if sender.send(event).is_err() {
        warn!("Event loop is no longer running");
    }
}

/// Constructs the UI and spawns the event loop and the UI thread.
fn main() {
    env_logger::init();
    let config = Config::parse();

    let chip8 = match load_chip(&config) {
        Ok(chip8) => chip8,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let mut siv = cursive::default();

    let (key_sender, key_receiver) = bounded::<Event<u8>>(10);
    let (shutdown_sender, shutdown_receiver) = bounded::<()>(1);
    let channels = EventLoopChannels {
        gfx_sender: siv.cb_sink().clone(),
        key_receiver,
        shutdown_sender,
    };

    let loop_config = config.clone();
    thread::spawn(move || {
        if let Err(e) = event_loop(chip8, &loop_config, &channels) {
            error!("Event loop stopped: {}", e);
        }
        // The receiver may already be gone if the UI closed first.
        let _ = channels.shutdown_sender.send(());
    });

    let sender = key_sender.clone();
    siv.add_global_callback(cursive::event::Key::Esc, move |s| {
        forward(&sender, Event::Quit);
        if shutdown_receiver.recv().is_err() {
            warn!("Event loop exited without reporting shutdown");
        }
        s.quit();
    });

    for &(i, j) in &[
        ('1', 0x1u8),
        ('2', 0x2),
        ('3', 0x3),
        ('4', 0xC),
        ('q', 0x4),
        ('w', 0x5),
        ('e', 0x6),
        ('r', 0xD),
        ('a', 0x7),
        ('s', 0x8),
        ('d', 0x9),
        ('f', 0xE),
        ('z', 0xA),
        ('x', 0x0),
        ('c', 0xB),
        ('v', 0xF),
    ] {
        let sender = key_sender.clone();
        siv.add_global_callback(i, move |_s| forward(&sender, Event::Key(j)));
    }

    let sender = key_sender.clone();
    siv.add_global_callback(' ', move |_s| forward(&sender, Event::KeyRelease));

    let sender = key_sender.clone();
    siv.add_global_callback(cursive::event::Key::Up, move |_s| {
        forward(&sender, Event::SpeedUp)
    });

    let sender = key_sender;
    siv.add_global_callback(cursive::event::Key::Down, move |_s| {
        forward(&sender, Event::SlowDown)
    });

    siv.add_layer(Display::default().framed(false));

    siv.run();
}
