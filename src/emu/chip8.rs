use super::{
    ADDRESS_MASK, Chip8Error, DISPLAY_X, DISPLAY_Y, Display, FONT, FONT_END_ADDRESS,
    FONT_START_ADDRESS, FRAME_LEN, Frame, MAX_ROM_SIZE, MEMORY_SIZE, Opcode, PIXEL_OFF,
    ROM_START_ADDRESS, STEP_HZ, TIMER_PERIOD_MS,
};
use crate::u4;

/// CHIP-8 virtual machine state
pub struct Chip8 {
    /// 4KB memory array
    pub(crate) memory: [u8; MEMORY_SIZE],
    /// Display buffer: 32 rows of 64 packed pixels
    pub(crate) display: Display,
    /// Reusable output of `render_frame`
    pub(crate) frame: Box<Frame>,

    /// Program counter: address of the next instruction to execute
    pub(crate) pc: u16,
    /// Index register: used for memory operations
    pub(crate) i: u16,
    /// General-purpose registers V0-VF (VF is used as a flag register)
    pub(crate) v: [u8; 16],
    /// Call stack for subroutine returns
    pub(crate) stack: [u16; 16],
    /// Stack pointer: next free slot, wraps around on overflow
    pub(crate) sp: u4,

    /// Delay timer: decrements at 60Hz until it reaches 0
    pub(crate) delay_timer: u8,
    /// Sound timer: decrements at 60Hz, beeps while non-zero
    pub(crate) sound_timer: u8,
    /// Milliseconds left until the next 60Hz timer decrement
    pub(crate) timer_ms: f64,
    /// Wall time covered by one `step` call
    pub(crate) step_ms: f64,

    /// Key latch: bit i set = key i pressed
    pub(crate) keys: u16,
    /// Destination register of a pending FX0A; the CPU is halted while this is set
    pub(crate) waiting_for_key: Option<u4>,
}

impl Chip8 {
    /// Creates a machine stepping at the reference 500Hz cadence.
    pub fn new() -> Self {
        Self::with_step_ms(1000.0 / STEP_HZ)
    }

    /// Creates a machine that will be stepped `hz` times per second.
    ///
    /// The rate only affects how quickly the 60Hz timers are drained per step.
    pub fn with_step_hz(hz: f64) -> Result<Self, Chip8Error> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(Chip8Error::InvalidStepRate { hz });
        }

        Ok(Self::with_step_ms(1000.0 / hz))
    }

    fn with_step_ms(step_ms: f64) -> Self {
        let mut chip8 = Chip8 {
            memory: [0; MEMORY_SIZE],
            display: [0; DISPLAY_Y],
            frame: Box::new([PIXEL_OFF; FRAME_LEN]),
            pc: ROM_START_ADDRESS as u16,
            i: 0,
            v: [0; 16],
            stack: [0; 16],
            sp: u4::new(0),
            delay_timer: 0,
            sound_timer: 0,
            timer_ms: TIMER_PERIOD_MS,
            step_ms,
            keys: 0,
            waiting_for_key: None,
        };
        chip8.reset();
        chip8
    }

    /// Resets the whole machine and loads a ROM at 0x200.
    ///
    /// A ROM that does not fit is rejected before anything is touched, so the
    /// previous state survives a failed call.
    pub fn initialize(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }

        self.reset();

        let rom_end = ROM_START_ADDRESS + rom.len();
        self.memory[ROM_START_ADDRESS..rom_end].copy_from_slice(rom);

        log::debug!(
            "Loaded {} byte ROM at {:#05X}-{:#05X}",
            rom.len(),
            ROM_START_ADDRESS,
            rom_end
        );

        Ok(())
    }

    /// Advances the timers and, unless waiting for a key, executes one instruction.
    pub fn step(&mut self) {
        self.timers_cycle();

        if self.is_halted() {
            return;
        }

        self.cpu_cycle();
    }

    /// Replaces the key latch, completing a pending FX0A if any key is down.
    pub fn update_keys(&mut self, mask: u16) {
        self.keys = mask;

        if let Some(x) = self.waiting_for_key
            && let Some(key) = self.lowest_pressed_key()
        {
            self.v[x] = key;
            self.waiting_for_key = None;
            log::debug!("Key {key:X} resolved wait, stored in V{x}");
        }
    }

    /// Executes a single CPU cycle (fetch, decode, execute).
    pub(crate) fn cpu_cycle(&mut self) {
        let address = self.pc;
        let opcode = self.fetch();
        let decoded_opcode = Opcode::decode(opcode);

        log::trace!("{address:#05X}: {opcode:04X} {decoded_opcode}");

        self.execute(decoded_opcode);
    }

    /// Fetches the next 16-bit opcode from memory.
    fn fetch(&self) -> u16 {
        let high = self.mem_read(self.pc);
        let low = self.mem_read(self.pc.wrapping_add(1));

        u16::from_be_bytes([high, low])
    }

    fn reset(&mut self) {
        self.memory = [0; MEMORY_SIZE];
        self.memory[FONT_START_ADDRESS..FONT_END_ADDRESS].copy_from_slice(&FONT);
        self.display = [0; DISPLAY_Y];
        self.frame.fill(PIXEL_OFF);
        self.pc = ROM_START_ADDRESS as u16;
        self.i = 0;
        self.v = [0; 16];
        self.stack = [0; 16];
        self.sp = u4::new(0);
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.timer_ms = TIMER_PERIOD_MS;
        self.keys = 0;
        self.waiting_for_key = None;
    }

    pub(crate) fn lowest_pressed_key(&self) -> Option<u8> {
        (self.keys != 0).then(|| self.keys.trailing_zeros() as u8)
    }

    /// Reads memory, wrapping the address into the 4KB space.
    pub(crate) fn mem_read(&self, addr: u16) -> u8 {
        self.memory[(addr & ADDRESS_MASK) as usize]
    }

    /// Writes memory, wrapping the address into the 4KB space.
    pub(crate) fn mem_write(&mut self, addr: u16, value: u8) {
        self.memory[(addr & ADDRESS_MASK) as usize] = value;
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn v(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn sp(&self) -> u4 {
        self.sp
    }

    pub fn stack(&self) -> &[u16; 16] {
        &self.stack
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn keys(&self) -> u16 {
        self.keys
    }

    pub fn memory(&self) -> &[u8; MEMORY_SIZE] {
        &self.memory
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    /// True while an FX0A instruction is blocked waiting for a key press.
    pub fn is_halted(&self) -> bool {
        self.waiting_for_key.is_some()
    }

    /// Returns true if the sound timer is greater than zero, indicating a beep should be played.
    pub fn should_beep(&self) -> bool {
        self.sound_timer > 0
    }

    /// Get the state of a pixel on the display (true = on, false = off).
    ///
    /// Coordinates outside the 64x32 display read as off.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        if x >= DISPLAY_X || y >= DISPLAY_Y {
            return false;
        }
        self.display[y] & (1 << (DISPLAY_X - 1 - x)) != 0
    }

    /// Wall time in seconds covered by one `step` call.
    pub(crate) fn step_seconds(&self) -> f64 {
        self.step_ms / 1000.0
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}
