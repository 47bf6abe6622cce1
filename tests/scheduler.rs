#![allow(missing_docs)]
//! Host-level tests for per-cycle timing, frame advancement, hooks, and switching.

use lamp_matrix::frame4x4::Frame4x4;
use lamp_matrix::lfsr::Lfsr;
use lamp_matrix::program::{PROGRAMS, ProgramTable, STILL_FRAME_DELAY};
use lamp_matrix::scheduler::{
    AnimationScheduler, STARFIELD_PHASES, ScheduleState, StarfieldPhase, Tick, UpdateHook,
};

/// A scheduler with `program_index` selected and not yet ticked.
fn scheduler_at(program_index: u8) -> AnimationScheduler {
    let mut scheduler = AnimationScheduler::new(PROGRAMS);
    for _ in 0..program_index {
        scheduler.switch_program();
    }
    assert_eq!(scheduler.state().program_index, program_index);
    scheduler
}

/// Tick until the next frame advance and return the framebuffer it left.
fn next_advance(scheduler: &mut AnimationScheduler) -> Frame4x4 {
    for _ in 0..=u32::from(u8::MAX) {
        if scheduler.tick() == Tick::Advanced {
            return scheduler.framebuffer();
        }
    }
    panic!("no advance within 256 ticks");
}

#[test]
fn starts_on_first_program_with_empty_framebuffer() {
    let scheduler = AnimationScheduler::new(PROGRAMS);
    assert_eq!(scheduler.state(), ScheduleState::default());
    assert_eq!(scheduler.framebuffer(), Frame4x4::EMPTY);
    assert_eq!(scheduler.program().name(), "circle");
    assert_eq!(scheduler.lfsr(), Lfsr::new());
    assert_eq!(scheduler.starfield_phase(), StarfieldPhase::new());
}

#[test]
fn still_program_renders_once_and_freezes() {
    let mut scheduler = AnimationScheduler::new(PROGRAMS);
    assert_eq!(scheduler.tick(), Tick::Advanced);
    assert_eq!(scheduler.framebuffer(), Frame4x4::new(0x6996));
    assert_eq!(scheduler.state().wait_remaining, STILL_FRAME_DELAY);

    for _ in 0..10_000 {
        assert_eq!(scheduler.tick(), Tick::Waiting);
    }
    assert_eq!(scheduler.state().wait_remaining, STILL_FRAME_DELAY);
    assert_eq!(scheduler.state().frame_index, 0);
    assert_eq!(scheduler.framebuffer(), Frame4x4::new(0x6996));
}

#[test]
fn wait_counts_down_by_one_per_tick() {
    let mut scheduler = scheduler_at(2);
    assert_eq!(scheduler.tick(), Tick::Advanced);
    assert_eq!(scheduler.state().wait_remaining, 70);
    for expected in (0..70).rev() {
        assert_eq!(scheduler.tick(), Tick::Waiting);
        assert_eq!(scheduler.state().wait_remaining, expected);
    }
    assert_eq!(scheduler.tick(), Tick::Advanced);
}

#[test]
fn horizontal_scroll_cycles_and_returns_to_start() {
    let mut scheduler = scheduler_at(2);
    let mut rendered = Vec::new();
    let mut x_shifts = Vec::new();
    for _ in 0..5 {
        rendered.push(next_advance(&mut scheduler).bits());
        x_shifts.push(scheduler.state().x_shift);
    }
    assert_eq!(rendered, [0x1111, 0x2222, 0x4444, 0x8888, 0x1111]);
    assert_eq!(x_shifts, [1, 2, 3, 0, 1]);
}

#[test]
fn horizontal_scroll_period_is_four_frames_of_seventy_one_ticks() {
    let mut scheduler = scheduler_at(2);
    assert_eq!(scheduler.tick(), Tick::Advanced);
    let start = scheduler.state();
    for _ in 0..4 * 71 {
        scheduler.tick();
    }
    assert_eq!(scheduler.state(), start);
    assert_eq!(scheduler.framebuffer(), Frame4x4::new(0x1111));
}

#[test]
fn vertical_scroll_moves_line_through_every_row() {
    let mut scheduler = scheduler_at(3);
    let mut rendered = Vec::new();
    for _ in 0..5 {
        rendered.push(next_advance(&mut scheduler).bits());
        assert_eq!(scheduler.state().x_shift, 0);
    }
    assert_eq!(rendered, [0x000F, 0xF000, 0x0F00, 0x00F0, 0x000F]);
}

#[test]
fn chevron_wraps_after_three_frames() {
    let mut scheduler = scheduler_at(4);
    let mut states = Vec::new();
    for _ in 0..4 {
        next_advance(&mut scheduler);
        let state = scheduler.state();
        states.push((state.frame_index, state.x_shift));
    }
    assert_eq!(states, [(1, 1), (2, 2), (0, 0), (1, 1)]);
}

#[test]
fn sequence_plays_stored_frames_in_order() {
    let mut scheduler = scheduler_at(5);
    let frames = PROGRAMS.get(5).frames();
    for round in 0..2 {
        for (index, expected) in frames.iter().enumerate() {
            assert_eq!(
                next_advance(&mut scheduler),
                *expected,
                "round {round} frame {index}"
            );
            assert!(scheduler.state().frame_index < 6);
        }
    }
}

#[test]
fn frame_index_stays_below_frame_count() {
    for program_index in 0..PROGRAMS.len() {
        let mut scheduler = scheduler_at(program_index);
        let frame_count = scheduler.program().frame_count();
        for _ in 0..2_000 {
            scheduler.tick();
            let frame_index = scheduler.state().frame_index;
            if frame_count == 0 {
                assert_eq!(frame_index, 0);
            } else {
                assert!(frame_index < frame_count, "program {program_index}");
            }
            assert!(scheduler.state().x_shift < 4);
            assert!(scheduler.state().y_shift < 4);
        }
    }
}

#[test]
fn switch_resets_timing_and_scroll() {
    let mut scheduler = scheduler_at(2);
    next_advance(&mut scheduler);
    next_advance(&mut scheduler);
    scheduler.tick();
    assert_ne!(scheduler.state().x_shift, 0);

    let program = scheduler.switch_program();
    assert_eq!(program.name(), "horizontal line scroll");
    assert_eq!(
        scheduler.state(),
        ScheduleState {
            program_index: 3,
            ..ScheduleState::default()
        }
    );

    // The new program renders on the very next tick.
    assert_eq!(scheduler.tick(), Tick::Advanced);
    assert_eq!(scheduler.framebuffer(), Frame4x4::new(0x000F));
}

#[test]
fn switch_keeps_framebuffer_until_next_render() {
    let mut scheduler = AnimationScheduler::new(PROGRAMS);
    scheduler.tick();
    scheduler.switch_program();
    assert_eq!(scheduler.framebuffer(), Frame4x4::new(0x6996));
}

#[test]
fn program_index_wraps_to_first() {
    let mut scheduler = scheduler_at(6);
    assert_eq!(scheduler.switch_program().name(), "circle");
    assert_eq!(scheduler.state().program_index, 0);
}

#[test]
fn starfield_hook_flashes_one_star_per_five_invocations() {
    let mut state = ScheduleState::default();
    let mut framebuffer = Frame4x4::FULL;
    let mut lfsr = Lfsr::new();
    let mut phase = StarfieldPhase::new();

    let mut seen = Vec::new();
    for _ in 0..STARFIELD_PHASES {
        UpdateHook::Starfield.apply(0, &mut state, &mut framebuffer, &mut lfsr, &mut phase);
        seen.push(framebuffer);
    }

    assert_eq!(seen[0], Frame4x4::single(15));
    assert_eq!(seen[0].lit_count(), 1);
    assert!(seen[1..].iter().all(|frame| *frame == Frame4x4::EMPTY));
    assert_eq!(phase, StarfieldPhase::new());
    assert_eq!(lfsr.value(), 0xCFAF);
    assert_eq!(state, ScheduleState::default());
}

#[test]
fn shift_hooks_only_touch_their_axis() {
    let mut state = ScheduleState::default();
    let mut framebuffer = Frame4x4::new(0x1234);
    let mut lfsr = Lfsr::new();
    let mut phase = StarfieldPhase::new();

    UpdateHook::HorizontalShift.apply(3, &mut state, &mut framebuffer, &mut lfsr, &mut phase);
    assert_eq!((state.x_shift, state.y_shift), (3, 0));
    UpdateHook::VerticalShift.apply(6, &mut state, &mut framebuffer, &mut lfsr, &mut phase);
    assert_eq!((state.x_shift, state.y_shift), (3, 2));
    UpdateHook::None.apply(1, &mut state, &mut framebuffer, &mut lfsr, &mut phase);
    assert_eq!((state.x_shift, state.y_shift), (3, 2));

    assert_eq!(framebuffer, Frame4x4::new(0x1234));
    assert_eq!(lfsr, Lfsr::new());
    assert_eq!(phase, StarfieldPhase::new());
}

#[test]
fn starfield_program_sparkles_from_the_boot_seed() {
    let mut scheduler = AnimationScheduler::new(ProgramTable::new(core::slice::from_ref(
        PROGRAMS.get(6),
    )));
    let stars: Vec<u16> = (0..10).map(|_| next_advance(&mut scheduler).bits()).collect();
    assert_eq!(
        stars,
        [0x8000, 0, 0, 0, 0, 0x0400, 0, 0, 0, 0],
        "LFSR states 0xCFAF and 0xD97A pick bits 15 and 10"
    );
    assert_eq!(scheduler.state().frame_index, 0);
}

#[test]
fn starfield_resumes_after_switching_away() {
    let mut scheduler = scheduler_at(6);
    next_advance(&mut scheduler);
    let lfsr = scheduler.lfsr();
    assert_eq!(scheduler.starfield_phase().get(), 1);

    scheduler.switch_program();
    next_advance(&mut scheduler);
    for _ in 0..6 {
        scheduler.switch_program();
    }
    assert_eq!(scheduler.program().name(), "starfield");
    assert_eq!(scheduler.lfsr(), lfsr);
    assert_eq!(scheduler.starfield_phase().get(), 1);

    // Phase 1 clears whatever the circle left behind.
    assert_eq!(next_advance(&mut scheduler), Frame4x4::EMPTY);
}
