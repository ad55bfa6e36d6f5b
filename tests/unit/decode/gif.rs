use std::{borrow::Cow, path::PathBuf};

use super::*;

const RED: u8 = 0;
const GREEN: u8 = 1;
const BLUE: u8 = 2;
const WHITE: u8 = 3;
const GLOBAL: [u8; 12] = [255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];

struct Region {
    left: u16,
    top: u16,
    width: u16,
    height: u16,
    fill: u8,
    palette: Option<Vec<u8>>,
    transparent: Option<u8>,
}

fn full(fill: u8) -> Region {
    Region {
        left: 0,
        top: 0,
        width: 4,
        height: 4,
        fill,
        palette: None,
        transparent: None,
    }
}

fn write_gif(name: &str, regions: &[Region]) -> PathBuf {
    let dir = PathBuf::from("target").join("unit").join("decode_gif");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);

    let mut bytes = Vec::new();
    {
        let mut enc = gif::Encoder::new(&mut bytes, 4, 4, &GLOBAL).unwrap();
        for r in regions {
            let indices = vec![r.fill; usize::from(r.width) * usize::from(r.height)];
            let frame = gif::Frame {
                left: r.left,
                top: r.top,
                width: r.width,
                height: r.height,
                buffer: Cow::Owned(indices),
                palette: r.palette.clone(),
                transparent: r.transparent,
                ..gif::Frame::default()
            };
            enc.write_frame(&frame).unwrap();
        }
    }
    std::fs::write(&path, bytes).unwrap();
    path
}

fn rgba(frame: &RawFrame, x: u32, y: u32) -> [u8; 4] {
    let at = ((y * frame.width + x) * 4) as usize;
    [
        frame.rgba8[at],
        frame.rgba8[at + 1],
        frame.rgba8[at + 2],
        frame.rgba8[at + 3],
    ]
}

#[test]
fn full_mode_frames_stand_alone() {
    let path = write_gif("full.gif", &[full(RED), full(GREEN), full(BLUE)]);
    assert_eq!(detect_redraw_mode(&path).unwrap(), RedrawMode::Full);

    let frames: Vec<RawFrame> = decode(&path).unwrap().map(Result::unwrap).collect();
    assert_eq!(frames.len(), 3);
    for (frame, expected) in frames.iter().zip([
        [255, 0, 0, 255],
        [0, 255, 0, 255],
        [0, 0, 255, 255],
    ]) {
        assert_eq!((frame.width, frame.height), (4, 4));
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(rgba(frame, x, y), expected);
            }
        }
    }
}

#[test]
fn full_mode_does_not_carry_transparent_pixels_over() {
    let mut see_through = full(WHITE);
    see_through.transparent = Some(WHITE);
    let path = write_gif("full_transparent.gif", &[full(RED), see_through]);

    let frames: Vec<RawFrame> = decode(&path).unwrap().map(Result::unwrap).collect();
    assert_eq!(frames.len(), 2);
    assert_eq!(rgba(&frames[1], 2, 2), [0, 0, 0, 0]);
}

#[test]
fn partial_mode_accumulates_region_updates() {
    let path = write_gif(
        "partial.gif",
        &[
            full(RED),
            Region {
                left: 1,
                top: 1,
                width: 2,
                height: 2,
                fill: BLUE,
                palette: None,
                transparent: None,
            },
            Region {
                left: 0,
                top: 0,
                width: 1,
                height: 1,
                fill: GREEN,
                palette: None,
                transparent: None,
            },
        ],
    );
    assert_eq!(detect_redraw_mode(&path).unwrap(), RedrawMode::Partial);

    let stream = decode(&path).unwrap();
    assert_eq!(stream.mode(), RedrawMode::Partial);
    assert_eq!(stream.screen(), (4, 4));
    let frames: Vec<RawFrame> = stream.map(Result::unwrap).collect();
    assert_eq!(frames.len(), 3);

    for y in 0..4 {
        for x in 0..4 {
            let inside = (1..3).contains(&x) && (1..3).contains(&y);
            let expected = if inside {
                [0, 0, 255, 255]
            } else {
                rgba(&frames[0], x, y)
            };
            assert_eq!(rgba(&frames[1], x, y), expected, "pixel ({x},{y})");
        }
    }

    assert_eq!(rgba(&frames[2], 0, 0), [0, 255, 0, 255]);
    assert_eq!(rgba(&frames[2], 1, 1), [0, 0, 255, 255]);
    assert_eq!(rgba(&frames[2], 3, 3), [255, 0, 0, 255]);
}

#[test]
fn local_color_table_wins_over_global() {
    let mut local = full(0);
    local.palette = Some(vec![10, 20, 30, 40, 50, 60]);
    let path = write_gif("local.gif", &[full(RED), local]);

    let frames: Vec<RawFrame> = decode(&path).unwrap().map(Result::unwrap).collect();
    assert_eq!(rgba(&frames[0], 0, 0), [255, 0, 0, 255]);
    assert_eq!(rgba(&frames[1], 0, 0), [10, 20, 30, 255]);
}

#[test]
fn next_canvas_is_a_pure_step() {
    let palette = [9, 9, 9];
    let sub = SubImage {
        left: 1,
        top: 0,
        width: 1,
        height: 1,
        indices: &[0],
        palette: &palette,
        transparent: None,
    };

    let base = RgbaImage::from_pixel(2, 1, Rgba([1, 1, 1, 255]));
    let partial = next_canvas(Some(base.clone()), &sub, RedrawMode::Partial, 2, 1);
    assert_eq!(partial.get_pixel(0, 0).0, [1, 1, 1, 255]);
    assert_eq!(partial.get_pixel(1, 0).0, [9, 9, 9, 255]);

    let full = next_canvas(Some(base), &sub, RedrawMode::Full, 2, 1);
    assert_eq!(full.get_pixel(0, 0).0, [0, 0, 0, 0]);
    assert_eq!(full.get_pixel(1, 0).0, [9, 9, 9, 255]);
}

#[test]
fn next_canvas_clips_regions_past_the_screen() {
    let palette = [200, 100, 50];
    let sub = SubImage {
        left: 1,
        top: 1,
        width: 3,
        height: 3,
        indices: &[0; 9],
        palette: &palette,
        transparent: None,
    };
    let canvas = next_canvas(None, &sub, RedrawMode::Partial, 2, 2);
    assert_eq!(canvas.dimensions(), (2, 2));
    assert_eq!(canvas.get_pixel(1, 1).0, [200, 100, 50, 255]);
    assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0, 0]);
}

#[test]
fn malformed_data_is_a_decode_error() {
    let dir = PathBuf::from("target").join("unit").join("decode_gif");
    std::fs::create_dir_all(&dir).unwrap();

    let garbage = dir.join("garbage.gif");
    std::fs::write(&garbage, b"definitely not a gif").unwrap();
    assert!(matches!(decode(&garbage), Err(PackError::Decode(_))));

    let truncated = dir.join("truncated.gif");
    std::fs::write(&truncated, b"GIF89a\x04\x00").unwrap();
    assert!(matches!(decode(&truncated), Err(PackError::Decode(_))));
}
