// The constants are specified by the CHIP-8 specification
pub const DISPLAY_X: usize = 64;
pub const DISPLAY_Y: usize = 32;
pub const FRAME_LEN: usize = DISPLAY_X * DISPLAY_Y;

pub const MEMORY_SIZE: usize = 4096;
pub const ROM_START_ADDRESS: usize = 0x200;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - ROM_START_ADDRESS;
/// Addresses, the program counter and the index register are 12 bits wide.
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// Reference stepping cadence: one instruction every 2ms.
pub const STEP_HZ: f64 = 500.0;
pub const TIMER_HZ: f64 = 60.0;
pub const TIMER_PERIOD_MS: f64 = 1000.0 / TIMER_HZ;

/// Opaque white.
pub const PIXEL_ON: u32 = 0xFFFF_FFFF;
/// Opaque black.
pub const PIXEL_OFF: u32 = 0xFF00_0000;

/// Packed monochrome display, one word per row. Bit 63 is the leftmost pixel.
pub type Display = [u64; DISPLAY_Y];
/// Linear row-major pixel buffer produced by the renderer.
pub type Frame = [u32; FRAME_LEN];

/// Error types that can occur while setting up a CHIP-8 machine
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("Step rate must be a positive number of hertz, got {hz}")]
    InvalidStepRate { hz: f64 },
}
