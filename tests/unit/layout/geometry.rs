use super::*;

#[test]
fn alignment_anchors_are_margin_center_and_mirrored_margin() {
    let w = f64::from(CANVAS_WIDTH);
    assert_eq!(anchor_x(HAlign::Start, w), 40.0);
    assert_eq!(anchor_x(HAlign::Center, w), 540.0);
    assert_eq!(anchor_x(HAlign::End, w), 1040.0);
}

#[test]
fn line_left_respects_measured_width() {
    assert_eq!(line_left(HAlign::Start, 40.0, 100.0), 40.0);
    assert_eq!(line_left(HAlign::Center, 540.0, 100.0), 490.0);
    assert_eq!(line_left(HAlign::End, 1040.0, 100.0), 940.0);
}

#[test]
fn caption_max_width_reserves_both_margins() {
    assert_eq!(caption_max_width(1080.0), 1000.0);
}

#[test]
fn standard_placement_scales_to_width_and_centers() {
    // A 16:9 landscape clip.
    let p = standard_placement(1920, 1080).unwrap();
    assert_eq!(p.target_width, 1080.0);
    assert!((p.target_height - 607.5).abs() < 1e-9);
    assert!((p.y_offset - 656.25).abs() < 1e-9);

    // A clip already at canvas aspect fills the full height.
    let p = standard_placement(1080, 1920).unwrap();
    assert!((p.target_height - 1920.0).abs() < 1e-9);
    assert!((p.y_offset - 0.0).abs() < 1e-9);

    assert!(standard_placement(0, 100).is_err());
}

#[test]
fn vertical_anchoring_matches_hello_world_scenario() {
    // Two lines at size 78, block bottom anchored at 25% of 1920 = 480.
    let anchor_y = 0.25 * f64::from(CANVAS_HEIGHT);
    let last = caption_line_bottom(anchor_y, 2, 1, 78.0);
    let first = caption_line_bottom(anchor_y, 2, 0, 78.0);
    assert!((last - 480.0).abs() < 1e-9);
    assert!((first - 394.2).abs() < 1e-9);
}

#[test]
fn crop_caption_lines_stack_down_from_top_pad() {
    assert!((caption_line_top(CROP_TOP_PAD, 0, 78.0) - 30.0).abs() < 1e-9);
    assert!((caption_line_top(CROP_TOP_PAD, 1, 78.0) - 115.8).abs() < 1e-9);
}

#[test]
fn crop_geometry_derives_canvas_from_caption() {
    let g = crop_geometry(2, 78.0, 607.5);
    assert_eq!(g.text_top, 30.0);
    assert!((g.video_top - (30.0 + 171.6 + 15.0)).abs() < 1e-9);
    assert!((g.canvas_height - (g.video_top + 607.5 + 15.0)).abs() < 1e-9);
}

#[test]
fn crop_video_top_is_shared_between_sizing_and_reprojection() {
    // The property the design protects: the video_top used to size the
    // canvas is the same value labels are reprojected against.
    let placement = standard_placement(1920, 1080).unwrap();
    for line_count in [1usize, 2, 3, 5] {
        let g = crop_geometry(line_count, 78.0, placement.target_height);
        let anchor = LabelAnchor {
            x: 540.0,
            y: placement.y_offset,
        };
        let projected = reproject_label(anchor, &placement, g.video_top).unwrap();
        assert!((projected.y - g.video_top).abs() < 1e-9);
    }
}

#[test]
fn labels_outside_the_clip_band_are_dropped() {
    let placement = standard_placement(1920, 1080).unwrap();
    let g = crop_geometry(2, 78.0, placement.target_height);

    // Above the band.
    let above = LabelAnchor { x: 100.0, y: placement.y_offset - 1.0 };
    assert!(reproject_label(above, &placement, g.video_top).is_none());

    // Below the band.
    let below = LabelAnchor {
        x: 100.0,
        y: placement.y_offset + placement.target_height + 1.0,
    };
    assert!(reproject_label(below, &placement, g.video_top).is_none());

    // Inside: the offset from the clip top is preserved, x unchanged.
    let inside = LabelAnchor { x: 100.0, y: placement.y_offset + 43.75 };
    let projected = reproject_label(inside, &placement, g.video_top).unwrap();
    assert_eq!(projected.x, 100.0);
    assert!((projected.y - (g.video_top + 43.75)).abs() < 1e-9);
}

#[test]
fn label_anchor_resolves_percentages() {
    let a = label_anchor(50.0, 25.0, 1080.0, 1920.0);
    assert_eq!(a.x, 540.0);
    assert_eq!(a.y, 480.0);
}

#[test]
fn label_box_pads_measured_bounds() {
    let r = label_box(LabelAnchor { x: 100.0, y: 200.0 }, 50.0, 40.0);
    assert_eq!(r.x0, 65.0);
    assert_eq!(r.y0, 175.0);
    assert_eq!(r.x1, 135.0);
    assert_eq!(r.y1, 225.0);
}

#[test]
fn resize_tolerance_is_two_pixels() {
    assert!(!needs_resize(1920.0, 1921.5));
    assert!(!needs_resize(1920.0, 1922.0));
    assert!(needs_resize(1920.0, 1922.5));
}
