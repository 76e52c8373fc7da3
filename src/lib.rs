//! A CHIP-8 interpreter core.
//!
//! The host owns the cadence: it calls [`emu::Chip8::step`] at a fixed rate
//! (500Hz by default), pushes the key bitmask with [`emu::Chip8::update_keys`]
//! and pulls pixels with [`emu::Chip8::render_frame`].

pub mod emu;
mod nibble;

pub use nibble::u4;
