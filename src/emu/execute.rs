use super::{
    ADDRESS_MASK, Chip8, DISPLAY_X, DISPLAY_Y, FONT_GLYPH_SIZE, FONT_START_ADDRESS, Opcode,
    OpcodeALU,
};
use crate::u4;

impl Chip8 {
    pub(crate) fn execute(&mut self, opcode: Opcode) {
        self.pc = self.pc.wrapping_add(2) & ADDRESS_MASK;

        match opcode {
            Opcode::ClearDisplay => {
                self.display = [0; DISPLAY_Y];
            }
            Opcode::Return => {
                self.sp = self.sp.wrapping_sub(1);
                self.pc = self.stack[self.sp];
            }
            Opcode::Jump { nnn } => {
                self.pc = nnn;
            }
            Opcode::JumpWithOffset { nnn } => {
                self.pc = nnn.wrapping_add(self.v[0].into()) & ADDRESS_MASK;
            }
            Opcode::Call { nnn } => {
                self.stack[self.sp] = self.pc;
                self.sp = self.sp.wrapping_add(1);
                self.pc = nnn;
            }
            Opcode::SkipRegEqualImm { x, kk } => {
                if self.v[x] == kk {
                    self.skip();
                }
            }
            Opcode::SkipRegNotEqualImm { x, kk } => {
                if self.v[x] != kk {
                    self.skip();
                }
            }
            Opcode::SkipRegEqualReg { x, y } => {
                if self.v[x] == self.v[y] {
                    self.skip();
                }
            }
            Opcode::SkipRegNotEqualReg { x, y } => {
                if self.v[x] != self.v[y] {
                    self.skip();
                }
            }
            Opcode::SetRegImm { x, kk } => {
                self.v[x] = kk;
            }
            Opcode::AddRegImm { x, kk } => {
                self.v[x] = self.v[x].wrapping_add(kk);
            }
            Opcode::ALU { x, y, op } => {
                self.execute_alu(x, y, op);
            }
            Opcode::Random { x, kk } => {
                let rand_byte: u8 = rand::random();
                self.v[x] = rand_byte & kk;
            }
            Opcode::SetIndexImm { nnn } => {
                self.i = nnn;
            }
            Opcode::AddIndexReg { x } => {
                self.i = self.i.wrapping_add(self.v[x].into()) & ADDRESS_MASK;
            }
            Opcode::Draw { x, y, n } => {
                self.execute_draw(x, y, n);
            }
            Opcode::SkipIfPressed { x } => {
                if self.is_key_down(self.v[x]) {
                    self.skip();
                }
            }
            Opcode::SkipIfNotPressed { x } => {
                if !self.is_key_down(self.v[x]) {
                    self.skip();
                }
            }
            Opcode::WaitForKey { x } => {
                self.execute_wait_for_key(x);
            }
            Opcode::ReadDelayTimer { x } => {
                self.v[x] = self.delay_timer;
            }
            Opcode::SetDelayTimer { x } => {
                self.delay_timer = self.v[x];
            }
            Opcode::SetSoundTimer { x } => {
                self.sound_timer = self.v[x];
            }
            Opcode::FontChar { x } => {
                let digit = self.v[x] & 0x0F;
                self.i = (FONT_START_ADDRESS + digit as usize * FONT_GLYPH_SIZE) as u16;
            }
            Opcode::BCD { x } => {
                let value = self.v[x];
                self.mem_write(self.i, value / 100);
                self.mem_write(self.i.wrapping_add(1), (value / 10) % 10);
                self.mem_write(self.i.wrapping_add(2), value % 10);
            }
            Opcode::StoreRegs { x } => {
                for reg_index in 0..=usize::from(x) {
                    self.mem_write(self.i.wrapping_add(reg_index as u16), self.v[reg_index]);
                }
                self.i = self.i.wrapping_add(u16::from(x.get()) + 1) & ADDRESS_MASK;
            }
            Opcode::LoadRegs { x } => {
                for reg_index in 0..=usize::from(x) {
                    self.v[reg_index] = self.mem_read(self.i.wrapping_add(reg_index as u16));
                }
                self.i = self.i.wrapping_add(u16::from(x.get()) + 1) & ADDRESS_MASK;
            }
            Opcode::Unknown(opcode) => {
                // PC has already moved past it, so this behaves as a no-op.
                log::warn!(
                    "Illegal instruction {opcode:#06X} at {:#05X}",
                    self.pc.wrapping_sub(2) & ADDRESS_MASK
                );
            }
        };
    }

    fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2) & ADDRESS_MASK;
    }

    fn is_key_down(&self, key: u8) -> bool {
        self.keys & (1 << (key & 0x0F)) != 0
    }

    fn execute_alu(&mut self, x: u4, y: u4, op: OpcodeALU) {
        match op {
            OpcodeALU::Set => self.v[x] = self.v[y],
            OpcodeALU::Or => self.v[x] |= self.v[y],
            OpcodeALU::And => self.v[x] &= self.v[y],
            OpcodeALU::Xor => self.v[x] ^= self.v[y],
            // VF is written first; when x is F the later write to Vx wins.
            OpcodeALU::Add => {
                let (res, overflow) = self.v[x].overflowing_add(self.v[y]);
                self.v[0xF] = overflow as u8;
                self.v[x] = res;
            }
            OpcodeALU::Sub => {
                self.v[0xF] = (self.v[x] > self.v[y]) as u8;
                self.v[x] = self.v[x].wrapping_sub(self.v[y]);
            }
            OpcodeALU::SubReverse => {
                self.v[0xF] = (self.v[y] > self.v[x]) as u8;
                self.v[x] = self.v[y].wrapping_sub(self.v[x]);
            }
            OpcodeALU::ShiftRight => {
                self.v[0xF] = self.v[x] & 1;
                self.v[x] >>= 1;
            }
            OpcodeALU::ShiftLeft => {
                self.v[0xF] = self.v[x] >> 7;
                self.v[x] <<= 1;
            }
        }
    }

    fn execute_draw(&mut self, x: u4, y: u4, n: u4) {
        let x_pos = self.v[x] as u32 % DISPLAY_X as u32;
        let y_pos = self.v[y] as usize % DISPLAY_Y;

        self.v[0xF] = 0;
        for row in 0..usize::from(n) {
            let sprite_byte = self.mem_read(self.i.wrapping_add(row as u16));

            // Align the byte to the leftmost column, then wrap it around the row.
            let pixels = (u64::from(sprite_byte) << (DISPLAY_X - 8)).rotate_right(x_pos);

            let target = &mut self.display[(y_pos + row) % DISPLAY_Y];
            if *target & pixels != 0 {
                self.v[0xF] = 1;
            }
            *target ^= pixels;
        }
    }

    fn execute_wait_for_key(&mut self, x: u4) {
        match self.lowest_pressed_key() {
            Some(key) => self.v[x] = key,
            None => {
                // Stay halted until `update_keys` delivers a press.
                self.waiting_for_key = Some(x);
                log::debug!("Waiting for key into V{x} at {:#05X}", self.pc);
            }
        }
    }
}
