use super::{Chip8, DISPLAY_X, Frame, PIXEL_OFF, PIXEL_ON};

impl Chip8 {
    /// Expands the packed display into the reusable row-major pixel buffer.
    ///
    /// The same buffer is overwritten on every call.
    pub fn render_frame(&mut self) -> &Frame {
        for (row, pixels) in self
            .display
            .iter()
            .zip(self.frame.chunks_exact_mut(DISPLAY_X))
        {
            for (x, pixel) in pixels.iter_mut().enumerate() {
                *pixel = if (*row >> (DISPLAY_X - 1 - x)) & 1 != 0 {
                    PIXEL_ON
                } else {
                    PIXEL_OFF
                };
            }
        }

        &self.frame
    }
}
