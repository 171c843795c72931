//! `Gpio` adapter (spec.md §6 "GPIO"): eight bidirectional pins plus one 8-channel ADC.
//!
//! A host machine has no header to wire this to, so [`SimGpio`] simulates the device state
//! instead of a real one: direction and output-latch registers per pin, and digital reads honor
//! pull-up (spec.md §6) by reporting `true` for an undriven input pin rather than floating.

use basic8::error::ErrorKind;
use basic8::shims::Gpio;

const PIN_COUNT: u8 = 8;

#[derive(Clone, Copy)]
enum Direction {
    Input,
    Output,
}

/// Simulated GPIO/ADC state. All eight pins start undirected; `PINMODE` (spec.md, SPEC_FULL §2)
/// must configure a pin before it can be read or written, exactly as spec.md §6 requires.
pub struct SimGpio {
    direction: [Option<Direction>; PIN_COUNT as usize],
    output: [bool; PIN_COUNT as usize],
    /// Simulated analog samples, settable by a test harness via [`SimGpio::set_analog`];
    /// defaults to `0` for every channel, same as an ADC with nothing connected.
    analog: [u16; PIN_COUNT as usize],
}

impl SimGpio {
    pub fn new() -> SimGpio {
        SimGpio {
            direction: [None; PIN_COUNT as usize],
            output: [false; PIN_COUNT as usize],
            analog: [0; PIN_COUNT as usize],
        }
    }

    pub fn set_analog(&mut self, pin: u8, value: u16) {
        if let Some(slot) = self.analog.get_mut(pin as usize) {
            *slot = value;
        }
    }

    fn check_pin(pin: u8) -> Result<usize, ErrorKind> {
        if pin < PIN_COUNT {
            Ok(pin as usize)
        } else {
            Err(ErrorKind::InvalidPin)
        }
    }
}

impl Default for SimGpio {
    fn default() -> SimGpio {
        SimGpio::new()
    }
}

impl Gpio for SimGpio {
    fn set_direction(&mut self, pin: u8, output: bool) -> Result<(), ErrorKind> {
        let index = SimGpio::check_pin(pin)?;
        self.direction[index] = Some(if output {
            Direction::Output
        } else {
            Direction::Input
        });
        Ok(())
    }

    fn digital_read(&mut self, pin: u8) -> Result<bool, ErrorKind> {
        let index = SimGpio::check_pin(pin)?;
        match self.direction[index] {
            Some(Direction::Input) => Ok(true), // pulled up, undriven
            Some(Direction::Output) => Err(ErrorKind::PinIoError),
            None => Err(ErrorKind::PinIoError),
        }
    }

    fn digital_write(&mut self, pin: u8, high: bool) -> Result<(), ErrorKind> {
        let index = SimGpio::check_pin(pin)?;
        match self.direction[index] {
            Some(Direction::Output) => {
                self.output[index] = high;
                Ok(())
            }
            _ => Err(ErrorKind::PinIoError),
        }
    }

    fn analog_read(&mut self, pin: u8) -> Result<u16, ErrorKind> {
        let index = SimGpio::check_pin(pin)?;
        match self.direction[index] {
            Some(Direction::Output) => Err(ErrorKind::PinIoError),
            _ => Ok(self.analog[index]),
        }
    }
}
