use super::{Chip8, TIMER_PERIOD_MS};

impl Chip8 {
    /// Drains one step's worth of wall time from the 60Hz timer envelope.
    ///
    /// Called once per `step`, even while halted.
    pub(crate) fn timers_cycle(&mut self) {
        self.timer_ms -= self.step_ms;

        if self.timer_ms < 0.0 {
            // Number of 60Hz periods that elapsed during this step.
            let ticks = (-self.timer_ms / TIMER_PERIOD_MS).ceil();
            let decrement = ticks.min(f64::from(u8::MAX)) as u8;

            self.delay_timer = self.delay_timer.saturating_sub(decrement);
            self.sound_timer = self.sound_timer.saturating_sub(decrement);
            self.timer_ms =
                (self.timer_ms + ticks * TIMER_PERIOD_MS).clamp(0.0, TIMER_PERIOD_MS);
        }
    }
}
