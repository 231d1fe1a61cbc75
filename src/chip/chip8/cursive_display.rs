use crate::chip::{
    chip8::{
        constants::{CHIP8_DISPLAY_HEIGHT, CHIP8_DISPLAY_WIDTH},
        Chip8,
    },
    Chip,
};

use cursive::{
    theme::{BaseColor, Color, ColorStyle},
    view::View,
    views::Panel,
    CbSink, Printer, Vec2,
};
use thiserror::Error;

const TITLE: &str = "CHIP-8";
const TITLE_WITH_SOUND: &str = "CHIP-8 ♪";

/// Errors raised while pushing frames to the user interface.
#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("The user interface is no longer accepting updates")]
    Disconnected,
}

/// Represents the display of the Chip 8
pub struct Display {
    pixels: [bool; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT],
}

impl Display {
    /// Creates a new display from a row-major slice of pixels. Missing pixels are
    /// off and surplus ones are ignored.
    pub fn new(pixels: &[bool]) -> Self {
        let mut tmp = [false; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT];
        tmp.iter_mut().zip(pixels).for_each(|(dst, src)| *dst = *src);
        Display { pixels: tmp }
    }

    /// Wraps the display in a panel whose title shows the speaker state.
    pub fn framed(self, speaker_on: bool) -> Panel<Display> {
        Panel::new(self).title(if speaker_on { TITLE_WITH_SOUND } else { TITLE })
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new(&[])
    }
}

/// Implements cursive::view::View for Display to enable drawing it
/// as a View out of the box.
impl View for Display {
    fn draw(&self, printer: &Printer) {
        printer.with_color(
            ColorStyle::new(Color::Dark(BaseColor::Black), Color::RgbLowRes(0, 0, 0)),
            |printer| {
                for x in 0..CHIP8_DISPLAY_WIDTH {
                    for y in 0..CHIP8_DISPLAY_HEIGHT {
                        if self.pixels[x + CHIP8_DISPLAY_WIDTH * y] {
                            printer.print((x, y), " ");
                        }
                    }
                }
            },
        );
    }

    fn required_size(&mut self, _: Vec2) -> Vec2 {
        Vec2::new(CHIP8_DISPLAY_WIDTH, CHIP8_DISPLAY_HEIGHT)
    }
}

/// A chip whose output pins can be shown by a cursive user interface.
pub trait ChipWithCursiveDisplay {
    /// Sends the current frame to the UI thread if the framebuffer changed since the
    /// last update or `force` is set. Returns whether a frame was sent.
    fn update_ui(
        &mut self,
        gfx_sink: &CbSink,
        speaker_on: bool,
        force: bool,
    ) -> Result<bool, DisplayError>;
}

impl ChipWithCursiveDisplay for Chip8 {
    fn update_ui(
        &mut self,
        gfx_sink: &CbSink,
        speaker_on: bool,
        force: bool,
    ) -> Result<bool, DisplayError> {
        if !self.take_draw_flag() && !force {
            return Ok(false);
        }

        let display = Display::new(self.read_output_pins());
        gfx_sink
            .send(Box::new(move |s: &mut cursive::Cursive| {
                s.pop_layer();
                s.add_layer(display.framed(speaker_on));
            }))
            .map_err(|_| DisplayError::Disconnected)?;
        Ok(true)
    }
}
