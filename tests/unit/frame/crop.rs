use image::Rgb;

use super::*;

fn canvas(w: u32, h: u32, bg: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb(bg))
}

#[test]
fn tolerance_is_strict_per_channel() {
    assert!(is_background([10, 10, 10], [0, 0, 0], 11));
    assert!(!is_background([10, 10, 10], [0, 0, 0], 10));
    assert!(!is_background([0, 0, 10], [0, 0, 0], 10));
}

#[test]
fn zero_tolerance_matches_exact_colors_only() {
    assert!(is_background([5, 6, 7], [5, 6, 7], 0));
    assert!(!is_background([5, 6, 8], [5, 6, 7], 0));
}

#[test]
fn alpha_is_not_part_of_the_comparison() {
    // Only RGB reaches the comparison; the canvas is opaque by construction.
    assert!(is_background([1, 2, 3], [1, 2, 3], 1));
}

#[test]
fn grid_step_never_drops_to_zero() {
    assert_eq!(grid_step(720, 100), 7);
    assert_eq!(grid_step(50, 100), 1);
    assert_eq!(grid_step(0, 100), 1);
    assert_eq!(grid_step(10, 0), 10);
}

#[test]
fn uniform_frame_gives_degenerate_box() {
    let img = canvas(200, 100, [30, 40, 50]);
    assert_eq!(find_bounds(&img, 10, 100), BoundingBox::DEGENERATE);

    let result = crop(&img, 10, 100);
    assert_eq!(result.image.dimensions(), (1, 1));
    assert_eq!((result.pos_x, result.pos_y), (0, 0));
}

#[test]
fn near_background_noise_is_ignored() {
    let mut img = canvas(100, 100, [100, 100, 100]);
    img.put_pixel(50, 50, Rgb([105, 95, 100]));
    assert_eq!(find_bounds(&img, 10, 10), BoundingBox::DEGENERATE);
}

#[test]
fn single_pixel_box_is_one_step_around_it() {
    let mut img = canvas(100, 200, [0, 0, 0]);
    // Grid is 10 x 20 with steps = 10; (40, 60) sits on it.
    img.put_pixel(40, 60, Rgb([255, 255, 255]));

    let b = find_bounds(&img, 10, 10);
    assert!(b.contains(40, 60));
    assert_eq!(
        b,
        BoundingBox {
            min_x: 30,
            min_y: 40,
            max_x: 50,
            max_y: 80,
        }
    );
}

#[test]
fn expansion_is_clamped_to_canvas() {
    let mut img = canvas(100, 100, [0, 0, 0]);
    img.put_pixel(90, 90, Rgb([255, 0, 0]));
    img.put_pixel(10, 0, Rgb([255, 0, 0]));

    let b = find_bounds(&img, 10, 10);
    assert_eq!(b.min_x, 0);
    assert_eq!(b.min_y, 0);
    assert_eq!(b.max_x, 99);
    assert_eq!(b.max_y, 99);
}

#[test]
fn background_comes_from_the_frame_origin() {
    let mut img = canvas(10, 10, [255, 255, 255]);
    img.put_pixel(0, 0, Rgb([0, 0, 0]));
    // Everything but the origin now differs from the background.
    let b = find_bounds(&img, 10, 10);
    assert_eq!(b.min_x, 0);
    assert_eq!(b.min_y, 0);
    assert_eq!(b.max_x, 9);
    assert_eq!(b.max_y, 9);
}

#[test]
fn crop_returns_region_and_origin() {
    let mut img = canvas(100, 100, [0, 0, 0]);
    for y in 40..=60 {
        for x in 20..=30 {
            img.put_pixel(x, y, Rgb([200, 10, 10]));
        }
    }

    let result = crop(&img, 10, 10);
    assert_eq!((result.pos_x, result.pos_y), (10, 30));
    assert_eq!(result.image.dimensions(), (30, 40));
    assert_eq!(result.image.get_pixel(15, 15).0, [200, 10, 10]);
    assert_eq!(result.trim_line(), "30x40+10+30");
}

#[test]
fn one_pixel_wide_frame_is_degenerate() {
    let mut img = canvas(1, 5, [0, 0, 0]);
    img.put_pixel(0, 3, Rgb([255, 255, 255]));
    assert_eq!(find_bounds(&img, 10, 100), BoundingBox::DEGENERATE);
}
