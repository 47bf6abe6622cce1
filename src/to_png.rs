#![cfg(feature = "host")]
//! Host-side previews of lamp frames and whole programs as PNG and APNG files.

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use png::{BitDepth, ColorType, Encoder, ScaledFloat};

use crate::frame4x4::{Frame4x4, SIZE};
use crate::program::{AnimationProgram, ProgramTable, STILL_FRAME_DELAY};
use crate::scanner::SCAN_PERIOD_US;
use crate::scheduler::{AnimationScheduler, Tick};

const PREVIEW_INVERSE_GAMMA: f32 = 2.2;

/// Color of a lit lamp.
const LIT_RGB: [u8; 3] = [255, 176, 0];

/// Color of an unlit lamp, kept faintly visible so the grid reads.
const UNLIT_RGB: [u8; 3] = [48, 40, 32];

/// Render one frame into a PNG file sized to the requested maximum dimension.
pub fn write_frame_png(
    frame: Frame4x4,
    output_path: impl AsRef<Path>,
    target_max_dimension: u32,
) -> Result<(), Box<dyn Error>> {
    let output_path = output_path.as_ref();
    let (cell_size, led_margin) = cell_geometry(target_max_dimension);
    let (width, height, pixels) = panel_pixels(frame, cell_size, led_margin);
    create_parent(output_path)?;

    let file = File::create(output_path)?;
    let mut encoder = Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Sixteen);
    encoder.set_source_gamma(ScaledFloat::new(1.0));
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&pixels)?;
    println!("wrote PNG to {}", output_path.display());
    Ok(())
}

/// Play `program` on its own and record it as a looping APNG.
///
/// One image is written per frame advance, up to `max_frames`, each held for the
/// program's frame period at the nominal scan rate. A still program yields one image.
///
/// Returns the number of images written.
pub fn write_program_apng(
    program: &'static AnimationProgram,
    output_path: impl AsRef<Path>,
    target_max_dimension: u32,
    max_frames: usize,
) -> Result<usize, Box<dyn Error>> {
    assert!(max_frames > 0, "max_frames must be positive");
    let output_path = output_path.as_ref();
    let frames = simulate(program, max_frames);
    let frame_count = u32::try_from(frames.len())?;
    let delay_num = u16::try_from(frame_period_ms(program))?;
    let delay_den = 1000u16;

    let (cell_size, led_margin) = cell_geometry(target_max_dimension);
    let (width, height, _) = panel_pixels(Frame4x4::EMPTY, cell_size, led_margin);
    create_parent(output_path)?;

    let file = File::create(output_path)?;
    let mut encoder = Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Sixteen);
    encoder.set_source_gamma(ScaledFloat::new(1.0));
    encoder.set_animated(frame_count, 0)?;
    let mut writer = encoder.write_header()?;
    for frame in &frames {
        let (_, _, pixels) = panel_pixels(*frame, cell_size, led_margin);
        writer.set_frame_delay(delay_num, delay_den)?;
        writer.write_image_data(&pixels)?;
    }
    writer.finish()?;
    println!(
        "wrote APNG of '{}' ({} frames) to {}",
        program.name(),
        frames.len(),
        output_path.display()
    );
    Ok(frames.len())
}

/// The framebuffer after each of the first `max_frames` frame advances.
fn simulate(program: &'static AnimationProgram, max_frames: usize) -> Vec<Frame4x4> {
    let mut scheduler = AnimationScheduler::new(ProgramTable::new(core::slice::from_ref(program)));
    let mut frames = Vec::with_capacity(max_frames);
    while frames.len() < max_frames {
        if scheduler.tick() == Tick::Advanced {
            frames.push(scheduler.framebuffer());
            if program.frame_delay() == STILL_FRAME_DELAY {
                break;
            }
        }
    }
    frames
}

/// One advance plus `frame_delay` waiting cycles.
fn frame_period_ms(program: &AnimationProgram) -> u64 {
    let cycles = u64::from(program.frame_delay()) + 1;
    (cycles * SCAN_PERIOD_US / 1000).max(1)
}

fn create_parent(output_path: &Path) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn cell_geometry(target_max_dimension: u32) -> (u32, u32) {
    assert!(
        target_max_dimension >= 8,
        "target_max_dimension must be at least 8"
    );
    let panel = SIZE as u32;
    let mut cell_size = target_max_dimension;
    while cell_size > 8 {
        let led_margin = (cell_size / 8).max(1);
        let led_radius = (cell_size - (led_margin * 2)) / 2;
        let max_dimension = panel * cell_size + led_radius * 2;
        if max_dimension <= target_max_dimension {
            break;
        }
        cell_size -= 1;
    }
    (cell_size, (cell_size / 8).max(1))
}

fn panel_pixels(frame: Frame4x4, cell_size: u32, led_margin: u32) -> (u32, u32, Vec<u8>) {
    assert!(
        led_margin < cell_size / 2,
        "led_margin must fit inside cell"
    );
    let led_radius = (cell_size - (led_margin * 2)) / 2;
    let fade_width = (led_radius / 3).max(1);

    let border = led_radius;
    let side = SIZE as u32 * cell_size + border * 2;
    let mut bytes = vec![0u8; (side * side * 3 * 2) as usize];
    let center = (cell_size - 1) as i32 / 2;
    let led_radius_f = led_radius as f32;
    let inner_radius_f = led_radius.saturating_sub(fade_width) as f32;
    let radius_sq = (led_radius as i32) * (led_radius as i32);

    for (row_index, row) in frame.rows().into_iter().enumerate() {
        for column_index in 0..SIZE {
            let rgb = if (row >> column_index) & 1 == 1 {
                LIT_RGB
            } else {
                UNLIT_RGB
            };
            let linear = rgb.map(inverse_gamma_to_linear);
            let cell_origin_x = (column_index as u32) * cell_size;
            let cell_origin_y = (row_index as u32) * cell_size;

            for local_y in 0..cell_size {
                let delta_y = local_y as i32 - center;
                for local_x in 0..cell_size {
                    let delta_x = local_x as i32 - center;
                    let distance_sq = delta_x * delta_x + delta_y * delta_y;
                    if distance_sq > radius_sq {
                        continue;
                    }
                    let distance = (distance_sq as f32).sqrt();
                    let intensity = if distance <= inner_radius_f {
                        1.0
                    } else {
                        let fade_span = led_radius_f - inner_radius_f;
                        (1.0 - (distance - inner_radius_f) / fade_span).max(0.0)
                    };
                    let x = border + cell_origin_x + local_x;
                    let y = border + cell_origin_y + local_y;
                    let pixel_index = ((y * side + x) * 3 * 2) as usize;
                    for (channel, value) in linear.iter().enumerate() {
                        let level = linear_to_u16(value * intensity);
                        bytes[pixel_index + channel * 2..pixel_index + channel * 2 + 2]
                            .copy_from_slice(&level.to_be_bytes());
                    }
                }
            }
        }
    }

    (side, side, bytes)
}

fn inverse_gamma_to_linear(channel: u8) -> f32 {
    let normalized = f32::from(channel) / 255.0;
    normalized.powf(PREVIEW_INVERSE_GAMMA)
}

fn linear_to_u16(value: f32) -> u16 {
    let clamped = value.clamp(0.0, 1.0);
    (clamped * 65535.0).round() as u16
}
