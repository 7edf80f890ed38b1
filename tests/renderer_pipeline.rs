//! End-to-end tests for the command renderer: submission, sorting, culling, compositing
//! and presentation.

use pixelfw::{
    Bitmap, Compositing, FlushOptions, ImageHandle, Renderer, Rgba, SoftwarePresenter,
    SortMode,
};
use proptest::prelude::*;
use std::sync::Arc;

fn solid(width: u32, height: u32, color: Rgba) -> ImageHandle {
    Arc::new(Bitmap::filled(width, height, color))
}

fn headless(width: u32, height: u32, pixel_size: u32) -> (Renderer, SoftwarePresenter) {
    let presenter = SoftwarePresenter::new();
    let renderer = Renderer::new(width, height, pixel_size, Box::new(presenter.clone()));
    (renderer, presenter)
}

/// Index of the command that ends up on top when every command covers the same pixel.
fn expected_winner(ys: &[i32], sort: SortMode) -> usize {
    let last = ys.len() - 1;
    match sort {
        SortMode::None => last,
        SortMode::Back => 0,
        SortMode::Y => {
            let max = ys.iter().copied().max().unwrap_or_default();
            ys.iter().rposition(|&y| y == max).unwrap_or(last)
        }
        SortMode::YDescending => {
            let min = ys.iter().copied().min().unwrap_or_default();
            ys.iter().rposition(|&y| y == min).unwrap_or(last)
        }
    }
}

fn sort_mode() -> impl Strategy<Value = SortMode> {
    prop_oneof![
        Just(SortMode::None),
        Just(SortMode::Back),
        Just(SortMode::Y),
        Just(SortMode::YDescending),
    ]
}

/// A queued command: a sprite `(x, y, w, h)`, a line `(x0, y0, x1, y1)` or a pixel.
#[derive(Debug, Clone)]
enum Queued {
    Sprite(i32, i32, u32, u32),
    Line(f32, f32, f32, f32),
    Pixel(f32, f32),
}

fn coordinate() -> impl Strategy<Value = f32> {
    prop_oneof![3 => -100.0f32..160.0, 1 => -2.0e9f32..2.0e9]
}

fn queued() -> impl Strategy<Value = Queued> {
    prop_oneof![
        (-64i32..96, -64i32..96, 1u32..32, 1u32..32)
            .prop_map(|(x, y, w, h)| Queued::Sprite(x, y, w, h)),
        (coordinate(), coordinate(), coordinate(), coordinate())
            .prop_map(|(x0, y0, x1, y1)| Queued::Line(x0, y0, x1, y1)),
        (-8.0f32..72.0, -8.0f32..56.0).prop_map(|(x, y)| Queued::Pixel(x, y)),
    ]
}

/// Queues `item` and reports whether its box overlaps a 64x48 viewport.
fn queue(r: &mut Renderer, item: &Queued) -> bool {
    let (x, y, w, h) = match *item {
        Queued::Sprite(x, y, w, h) => {
            r.sprite(&solid(w, h, Rgba::WHITE), x as f32, y as f32, 0.0, 0.0);
            (x as f32, y as f32, w as f32, h as f32)
        }
        Queued::Line(x0, y0, x1, y1) => {
            r.line(x0, y0, x1, y1, Rgba::WHITE);
            (x0.min(x1), y0.min(y1), (x1 - x0).abs(), (y1 - y0).abs())
        }
        Queued::Pixel(x, y) => {
            r.pixel(x, y, Rgba::WHITE);
            (x, y, 0.0, 0.0)
        }
    };
    x + w >= 0.0 && x < 64.0 && y + h >= 0.0 && y < 48.0
}

proptest! {
    #[test]
    fn prop_flush_counts_match_visibility(
        items in prop::collection::vec(queued(), 0..40)
    ) {
        let (mut r, _) = headless(64, 48, 1);
        r.set_apply_camera(false);

        let mut visible = 0;
        for item in &items {
            if queue(&mut r, item) {
                visible += 1;
            }
        }

        let stats = r.flush(SortMode::None);
        prop_assert_eq!(stats.submitted, items.len());
        prop_assert_eq!(stats.drawn, visible);
        prop_assert_eq!(stats.culled, items.len() - visible);
        prop_assert!(r.commands().is_empty());
    }

    #[test]
    fn prop_sort_mode_decides_top_sprite(
        ys in prop::collection::vec(-100i32..100, 1..24),
        sort in sort_mode(),
    ) {
        let (mut r, _) = headless(16, 16, 1);

        // Each sprite sits at a different world y, but the camera follows it so every
        // one lands on back-buffer pixel (5, 5).
        for (i, &y) in ys.iter().enumerate() {
            r.set_camera(8.0, (y - 5 + 8) as f32);
            let img = solid(1, 1, Rgba::from_rgb8(i as u8, 0, 200));
            r.sprite(&img, 5.0, y as f32, 0.0, 0.0);
        }

        r.flush(sort);
        let winner = expected_winner(&ys, sort);
        prop_assert_eq!(r.back_buffer().pixel(5, 5), Some([winner as u8, 0, 200, 255]));
    }
}

#[test]
fn test_y_sort_draws_lower_sprite_in_front() {
    let (mut r, presenter) = headless(64, 64, 2);
    r.set_apply_camera(false);
    r.clear(Rgba::BLACK);

    let red = solid(8, 8, Rgba::rgb(1.0, 0.0, 0.0));
    let blue = solid(8, 8, Rgba::rgb(0.0, 0.0, 1.0));

    // Red stands lower on screen, so it is in front once y-sorted even though it was
    // submitted first.
    r.sprite(&red, 10.0, 14.0, 0.0, 0.0);
    r.sprite(&blue, 12.0, 10.0, 0.0, 0.0);
    let stats = r.flush(SortMode::Y);

    assert_eq!(stats.drawn, 2);
    assert_eq!(r.back_buffer().pixel(13, 15), Some([255, 0, 0, 255]));
    assert_eq!(r.back_buffer().pixel(13, 11), Some([0, 0, 255, 255]));
    assert_eq!(r.back_buffer().pixel(0, 0), Some([0, 0, 0, 255]));

    let frame = presenter.frame();
    assert_eq!((frame.width(), frame.height()), (64, 64));
    assert_eq!(frame.pixel(26, 30), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(27, 31), Some([255, 0, 0, 255]));
}

#[test]
fn test_three_sprites_composite_in_effective_y_order() {
    let (mut r, _) = headless(64, 64, 1);
    r.set_apply_camera(false);
    r.clear(Rgba::BLACK);

    let at_10 = solid(16, 16, Rgba::rgb(1.0, 0.0, 0.0));
    let at_5 = solid(16, 16, Rgba::rgb(0.0, 1.0, 0.0));
    let at_20 = solid(16, 16, Rgba::rgb(0.0, 0.0, 1.0));
    r.sprite(&at_10, 0.0, 10.0, 0.0, 0.0);
    r.sprite(&at_5, 0.0, 5.0, 0.0, 0.0);
    r.sprite(&at_20, 0.0, 20.0, 0.0, 0.0);

    let ys: Vec<f32> = r.commands().iter().map(|c| c.effective_y).collect();
    assert_eq!(ys, vec![10.0, 5.0, 20.0]);
    r.flush(SortMode::Y);

    // Rows 5..10 only see the first sprite drawn, 10..20 the second, 20.. the last.
    assert_eq!(r.back_buffer().pixel(4, 7), Some([0, 255, 0, 255]));
    assert_eq!(r.back_buffer().pixel(4, 16), Some([255, 0, 0, 255]));
    assert_eq!(r.back_buffer().pixel(4, 20), Some([0, 0, 255, 255]));
    assert_eq!(r.back_buffer().pixel(4, 2), Some([0, 0, 0, 255]));
}

#[test]
fn test_line_from_far_offscreen_crosses_viewport() {
    let (mut r, presenter) = headless(64, 64, 1);
    r.set_apply_camera(false);
    r.clear(Rgba::BLACK);

    r.line(-1.0e9, -1.0e9, 1.0e9, 1.0e9, Rgba::WHITE);
    r.line(10.0, 40.0, 2.0e8, 40.0, Rgba::rgb(1.0, 0.0, 0.0));
    let stats = r.flush(SortMode::None);

    assert_eq!(stats.drawn, 2);
    assert_eq!(r.back_buffer().pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(r.back_buffer().pixel(63, 63), Some([255, 255, 255, 255]));
    assert_eq!(r.back_buffer().pixel(9, 40), Some([0, 0, 0, 255]));
    assert_eq!(r.back_buffer().pixel(10, 40), Some([255, 0, 0, 255]));
    assert_eq!(r.back_buffer().pixel(63, 40), Some([255, 0, 0, 255]));
    assert_eq!(presenter.frames_presented(), 1);
}

#[test]
fn test_wide_sprite_partly_left_of_viewport() {
    let mut pixels = Vec::new();
    for x in 0..4000u32 {
        pixels.extend_from_slice(&[(x % 251) as u8, 0, 0, 255]);
    }
    let strip: ImageHandle = Arc::new(Bitmap::from_rgba8(4000, 1, pixels).unwrap());

    let (mut r, _) = headless(16, 4, 1);
    r.set_apply_camera(false);
    r.clear(Rgba::BLACK);
    r.sprite(&strip, -3990.0, 1.0, 0.0, 0.0);
    r.flush(SortMode::None);

    // Source column 3990 lands on x = 0, 3999 on x = 9.
    assert_eq!(r.back_buffer().pixel(0, 1), Some([(3990 % 251) as u8, 0, 0, 255]));
    assert_eq!(r.back_buffer().pixel(9, 1), Some([(3999 % 251) as u8, 0, 0, 255]));
    assert_eq!(r.back_buffer().pixel(10, 1), Some([0, 0, 0, 255]));
}

#[test]
fn test_submission_order_without_sort() {
    let (mut r, _) = headless(32, 32, 1);
    r.set_apply_camera(false);

    r.sprite(&solid(8, 8, Rgba::rgb(1.0, 0.0, 0.0)), 10.0, 14.0, 0.0, 0.0);
    r.sprite(&solid(8, 8, Rgba::rgb(0.0, 0.0, 1.0)), 12.0, 10.0, 0.0, 0.0);
    r.flush(SortMode::None);

    assert_eq!(r.back_buffer().pixel(13, 15), Some([0, 0, 255, 255]));
}

#[test]
fn test_back_buffer_persists_between_flushes() {
    let (mut r, presenter) = headless(16, 16, 1);
    r.set_apply_camera(false);
    r.clear(Rgba::BLACK);
    r.pixel(3.0, 3.0, Rgba::WHITE);
    r.flush(SortMode::None);

    let stats = r.flush(SortMode::None);
    assert_eq!(stats.submitted, 0);
    assert_eq!(r.back_buffer().pixel(3, 3), Some([255, 255, 255, 255]));
    assert_eq!(presenter.frames_presented(), 2);
}

#[test]
fn test_tint_alpha_fades_sprite() {
    let (mut r, _) = headless(16, 16, 1);
    r.set_apply_camera(false);
    r.clear(Rgba::BLACK);

    let img = solid(4, 4, Rgba::WHITE);
    r.raw(&img, 0.0, 0.0, 0.0, 0.0, None, Some(Rgba::new(1.0, 0.0, 0.0, 0.5)));
    r.flush(SortMode::None);

    // Blend mode ignores the tint's color channels.
    let [red, green, blue, alpha] = r.back_buffer().pixel(1, 1).unwrap();
    assert_eq!(alpha, 255);
    assert!((126..=129).contains(&red));
    assert_eq!(red, green);
    assert_eq!(green, blue);
}

#[test]
fn test_cutout_compositing_skips_faint_pixels() {
    let (mut r, _) = headless(16, 16, 1);
    r.set_compositing(Compositing::Cutout { threshold: 0.5 });
    r.set_apply_camera(false);
    r.clear(Rgba::BLACK);

    let mut pixels = Vec::new();
    pixels.extend_from_slice(&[255, 255, 255, 255]);
    pixels.extend_from_slice(&[255, 255, 255, 40]);
    let img: ImageHandle = Arc::new(Bitmap::from_rgba8(2, 1, pixels).unwrap());

    r.raw(&img, 4.0, 4.0, 0.0, 0.0, None, Some(Rgba::rgb(0.0, 1.0, 0.0)));
    r.flush(SortMode::None);

    assert_eq!(r.back_buffer().pixel(4, 4), Some([0, 255, 0, 255]));
    assert_eq!(r.back_buffer().pixel(5, 4), Some([0, 0, 0, 255]));
}

#[test]
fn test_flush_can_switch_camera_for_next_frame() {
    let (mut r, _) = headless(100, 100, 1);
    r.set_camera(50.0, 50.0);
    let img = solid(2, 2, Rgba::WHITE);

    r.sprite(&img, 10.0, 10.0, 0.0, 0.0);
    r.flush_with(FlushOptions {
        sort: SortMode::None,
        apply_camera: Some(false),
    });
    assert!(!r.camera().applies());

    r.set_camera(0.0, 0.0);
    r.sprite(&img, 10.0, 10.0, 0.0, 0.0);
    assert_eq!((r.commands()[0].x, r.commands()[0].y), (10.0, 10.0));
}

#[test]
fn test_sprite_sheet_tile_selects_cell() {
    let mut pixels = Vec::new();
    for cell in 0..4u8 {
        for _ in 0..2 {
            pixels.extend_from_slice(&[cell * 60, 0, 0, 255]);
        }
    }
    // 8x1 sheet, four 2x1 cells.
    let sheet: ImageHandle = Arc::new(Bitmap::from_rgba8(8, 1, pixels).unwrap());

    let (mut r, _) = headless(8, 8, 1);
    r.set_apply_camera(false);
    r.tile(&sheet, 0.0, 0.0, 0.0, 0.0, 2, 1, 4, None);
    r.flush(SortMode::None);

    assert_eq!(r.back_buffer().pixel(0, 0), Some([120, 0, 0, 255]));
    assert_eq!(r.back_buffer().pixel(1, 0), Some([120, 0, 0, 255]));
    assert_eq!(r.back_buffer().pixel(2, 0), Some([0, 0, 0, 0]));
}

#[test]
fn test_custom_order_with_sorted_by() {
    let (mut r, _) = headless(16, 16, 1);
    r.set_apply_camera(false);

    r.pixel(1.0, 1.0, Rgba::rgb(1.0, 0.0, 0.0));
    r.pixel(1.0, 1.0, Rgba::rgb(0.0, 1.0, 0.0));

    // Greener commands first, so red ends on top.
    let stats = r.flush_sorted_by(|a, b| b.color.g.total_cmp(&a.color.g));
    assert_eq!(stats.drawn, 2);
    assert_eq!(r.back_buffer().pixel(1, 1), Some([255, 0, 0, 255]));
}
