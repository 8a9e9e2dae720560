use bit_field::BitField;
use bitflags::bitflags;
use buzz_core::TimerRegisters;
use buzz_core::embedded_hal::digital::{ErrorType, InputPin};
use core::convert::Infallible;
use volatile_register::RW;

// data-space addresses (I/O address + 0x20)
const TC0_BASE: usize = 0x4F;
const PORTB_BASE: usize = 0x36;

#[repr(C, packed)]
pub struct Tc0 {
    pub tccr0a: RW<u8>, // 0x4F
    _reserved: [RW<u8>; 2],
    pub tcnt0: RW<u8>,  // 0x52
    pub tccr0b: RW<u8>, // 0x53
    pub mcusr: RW<u8>,
    pub mcucr: RW<u8>,
    pub ocr0a: RW<u8>,  // 0x56
}

impl Tc0 {
    pub unsafe fn new() -> &'static mut Tc0 {
        unsafe { &mut *(TC0_BASE as *mut Tc0) }
    }
}

impl TimerRegisters for Tc0 {
    #[inline(always)]
    fn read_tccr0a(&self) -> u8 {
        self.tccr0a.read()
    }

    #[inline(always)]
    fn write_tccr0a(&mut self, value: u8) {
        unsafe { self.tccr0a.write(value) }
    }

    #[inline(always)]
    fn read_tccr0b(&self) -> u8 {
        self.tccr0b.read()
    }

    #[inline(always)]
    fn write_tccr0b(&mut self, value: u8) {
        unsafe { self.tccr0b.write(value) }
    }

    #[inline(always)]
    fn write_ocr0a(&mut self, value: u8) {
        unsafe { self.ocr0a.write(value) }
    }
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct Pins: u8 {
        const PB0 = 1 << 0;
        const PB1 = 1 << 1;
        const PB2 = 1 << 2;
        const PB3 = 1 << 3;
        const PB4 = 1 << 4;
        const PB5 = 1 << 5;
    }
}

/// OC0A.
pub const SPEAKER: Pins = Pins::PB0;
pub const BUTTON: Pins = Pins::PB3;

#[repr(C, packed)]
pub struct PortB {
    pub pinb: RW<u8>,  // 0x36
    pub ddrb: RW<u8>,  // 0x37
    pub portb: RW<u8>, // 0x38
}

impl PortB {
    pub unsafe fn new() -> &'static mut PortB {
        unsafe { &mut *(PORTB_BASE as *mut PortB) }
    }

    pub fn make_output(&mut self, pins: Pins) {
        unsafe { self.ddrb.modify(|ddrb| ddrb | pins.bits()) }
    }

    /// Input with the internal pull-up, so an open button reads high.
    pub fn make_pulled_up_input(&mut self, pins: Pins) {
        unsafe {
            self.ddrb.modify(|ddrb| ddrb & !pins.bits());
            self.portb.modify(|portb| portb | pins.bits());
        }
    }

    pub fn input(&self, pin: Pins) -> Input<'_> {
        Input { port: self, bit: pin.bits().trailing_zeros() as usize }
    }
}

pub struct Input<'a> {
    port: &'a PortB,
    bit: usize,
}

impl ErrorType for Input<'_> {
    type Error = Infallible;
}

impl InputPin for Input<'_> {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.port.pinb.read().get_bit(self.bit))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.port.pinb.read().get_bit(self.bit))
    }
}
