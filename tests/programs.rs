use chip8_vm::{
    emu::{Chip8, Chip8Error, FRAME_LEN, MAX_ROM_SIZE, PIXEL_OFF, PIXEL_ON},
    u4,
};

fn assemble(program: &[u16]) -> Vec<u8> {
    program.iter().flat_map(|op| op.to_be_bytes()).collect()
}

fn boot(program: &[u16]) -> Chip8 {
    let mut chip8 = Chip8::new();
    chip8.initialize(&assemble(program)).unwrap();
    chip8
}

#[test]
fn load_then_add() {
    let mut chip8 = boot(&[0x6005, 0x7003]);

    chip8.step();
    chip8.step();

    assert_eq!(chip8.v()[0], 8);
    assert_eq!(chip8.pc(), 0x204);
}

#[test]
fn countdown_loop_uses_delay_timer() {
    // 0x200: LD V0, 3 ; LD DT, V0 ; LD V1, DT ; SE V1, 0 ; JP 0x204 ; JP 0x20A
    let mut chip8 = boot(&[0x6003, 0xF015, 0xF107, 0x3100, 0x1204, 0x120A]);

    // Three 60Hz ticks take 50ms, i.e. 25 steps at the reference cadence.
    for _ in 0..40 {
        chip8.step();
    }

    assert_eq!(chip8.delay_timer(), 0);
    assert_eq!(chip8.pc(), 0x20A);
}

#[test]
fn nested_calls_unwind_in_order() {
    // 0x200: CALL 0x206 ; LD VA, 1 ; JP 0x204
    // 0x206: CALL 0x20C ; ADD V0, 1 ; RET
    // 0x20C: ADD V0, 0x10 ; RET
    let mut chip8 = boot(&[
        0x2206, 0x6A01, 0x1204, 0x220C, 0x7001, 0x00EE, 0x7010, 0x00EE,
    ]);

    for _ in 0..7 {
        chip8.step();
    }

    assert_eq!(chip8.v()[0], 0x11);
    assert_eq!(chip8.v()[0xA], 1);
    assert_eq!(chip8.sp(), u4::new(0));
    assert_eq!(chip8.pc(), 0x204);
}

#[test]
fn pc_stays_even_and_stack_pointer_in_range() {
    // Recursive call that overflows the stack, mixed with skips.
    let mut chip8 = boot(&[0x7001, 0x3003, 0x2200, 0x00EE]);

    for _ in 0..500 {
        chip8.step();
        assert_eq!(chip8.pc() % 2, 0);
        assert!(usize::from(chip8.sp()) < 16);
    }
}

#[test]
fn blocking_key_read_resumes_on_input() {
    // LD V2, K ; ADD V2, 1
    let mut chip8 = boot(&[0xF20A, 0x7201]);

    chip8.step();
    let halted_pc = chip8.pc();
    for _ in 0..10 {
        chip8.step();
        assert!(chip8.is_halted());
        assert_eq!(chip8.pc(), halted_pc);
    }

    chip8.update_keys(0b0100_0000_0100_0000);
    assert!(!chip8.is_halted());
    assert_eq!(chip8.v()[2], 6);

    chip8.step();
    assert_eq!(chip8.v()[2], 7);
}

#[test]
fn clear_then_render_is_blank() {
    // LD I, 0 ; DRW V0, V0, 5 ; CLS
    let mut chip8 = boot(&[0xA000, 0xD005, 0x00E0]);

    chip8.step();
    chip8.step();
    assert!(chip8.render_frame().contains(&PIXEL_ON));

    chip8.step();
    let frame = chip8.render_frame();
    assert_eq!(frame.len(), FRAME_LEN);
    assert!(frame.iter().all(|&p| p == PIXEL_OFF));
}

#[test]
fn drawn_glyph_appears_in_frame() {
    // LD V0, 8 ; LD F, V0 ; LD V1, 2 ; DRW V1, V1, 5
    let mut chip8 = boot(&[0x6008, 0xF029, 0x6102, 0xD115]);
    for _ in 0..4 {
        chip8.step();
    }

    let frame = chip8.render_frame();
    let row = |y: usize| &frame[y * 64 + 2..y * 64 + 6];

    // "8" glyph: F0 90 F0 90 F0
    assert!(row(2).iter().all(|&p| p == PIXEL_ON));
    assert_eq!(row(3), &[PIXEL_ON, PIXEL_OFF, PIXEL_OFF, PIXEL_ON]);
    assert!(row(4).iter().all(|&p| p == PIXEL_ON));
    assert_eq!(chip8.v()[0xF], 0);
}

#[test]
fn oversized_rom_is_an_error() {
    let mut chip8 = Chip8::new();
    assert!(matches!(
        chip8.initialize(&vec![0; MAX_ROM_SIZE + 2]),
        Err(Chip8Error::RomTooLarge { .. })
    ));
}

#[test]
fn illegal_instructions_do_not_stop_execution() {
    let mut chip8 = boot(&[0xFFFF, 0x5AB1, 0x6142]);
    for _ in 0..3 {
        chip8.step();
    }
    assert_eq!(chip8.v()[1], 0x42);
    assert_eq!(chip8.pc(), 0x206);
}
