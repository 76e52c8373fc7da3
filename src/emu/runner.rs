use super::{Chip8, Frame};

/// Never run more than this many steps per update, so a stalled host does not
/// spend seconds catching up.
pub const MAX_STEPS_PER_UPDATE: u32 = 64;

/// High-level emulator runner that turns elapsed wall time into fixed-cadence steps.
pub struct Chip8Runner {
    chip8: Chip8,
    step_time: f64,
    dt_accumulator: f64,
}

impl Chip8Runner {
    /// Runner stepping at the machine's own step rate, so its 60Hz timers
    /// stay in sync with wall time.
    pub fn new(chip8: Chip8) -> Self {
        Self {
            step_time: chip8.step_seconds(),
            chip8,
            dt_accumulator: 0.0,
        }
    }

    /// Update emulator by delta time in seconds.
    ///
    /// Runs as many steps as fit in the accumulated time and returns how many ran.
    pub fn update(&mut self, dt: f64) -> u32 {
        self.dt_accumulator += dt;

        let mut steps = 0;
        while self.dt_accumulator >= self.step_time {
            if steps == MAX_STEPS_PER_UPDATE {
                // Drop the backlog instead of "catching up" in the next frame.
                log::debug!("Dropping {:.3}s of emulation backlog", self.dt_accumulator);
                self.dt_accumulator = 0.0;
                break;
            }

            self.dt_accumulator -= self.step_time;
            self.chip8.step();
            steps += 1;
        }

        steps
    }

    /// Returns true if the sound timer is active, indicating a beep should be played.
    pub fn should_beep(&self) -> bool {
        self.chip8.should_beep()
    }

    /// Push the current 16-key bitmask.
    pub fn update_keys(&mut self, mask: u16) {
        self.chip8.update_keys(mask)
    }

    pub fn render_frame(&mut self) -> &Frame {
        self.chip8.render_frame()
    }

    pub fn chip8_ref(&self) -> &Chip8 {
        &self.chip8
    }

    pub fn chip8_mut(&mut self) -> &mut Chip8 {
        &mut self.chip8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner(rom: &[u8]) -> Chip8Runner {
        let mut chip8 = Chip8::new();
        chip8.initialize(rom).unwrap();
        Chip8Runner::new(chip8)
    }

    #[test]
    fn update_runs_steps_for_elapsed_time() {
        // ADD V0, 1 ; JP 0x200
        let mut runner = runner(&[0x70, 0x01, 0x12, 0x00]);

        assert_eq!(runner.update(0.0105), 5);
        assert_eq!(runner.chip8_ref().v()[0], 3);

        // Leftover 0.5ms plus 1.6ms crosses one more step.
        assert_eq!(runner.update(0.0016), 1);
    }

    #[test]
    fn update_bounds_catch_up() {
        let mut runner = runner(&[0x12, 0x00]);

        assert_eq!(runner.update(10.0), MAX_STEPS_PER_UPDATE);
        assert_eq!(runner.update(0.0), 0);
    }

    #[test]
    fn forwards_keys_to_machine() {
        let mut runner = runner(&[0xF5, 0x0A]);
        runner.update(0.002);
        assert!(runner.chip8_ref().is_halted());

        runner.update_keys(1 << 9);

        assert!(!runner.chip8_ref().is_halted());
        assert_eq!(runner.chip8_ref().v()[5], 9);
    }

    #[test]
    fn step_rate_comes_from_machine() {
        // 1000Hz: 10ms holds ten steps, and 60 ticks of the timer take one second.
        let mut chip8 = Chip8::with_step_hz(1000.0).unwrap();
        chip8.initialize(&[0x70, 0x01, 0x12, 0x00]).unwrap();
        let mut runner = Chip8Runner::new(chip8);

        assert_eq!(runner.update(0.0105), 10);
        assert_eq!(runner.chip8_ref().v()[0], 5);

        runner.chip8_mut().delay_timer = 100;
        for _ in 0..100 {
            runner.update(0.01);
        }
        assert_eq!(runner.chip8_ref().delay_timer(), 40);
    }
}
