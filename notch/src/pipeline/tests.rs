//! Tests for the batch pipelines.

use tempfile::TempDir;

use super::*;

fn spike_frame(width: usize, height: usize, channels: usize, spikes: &[(usize, usize)]) -> Frame {
    let mut frame = Frame::zeros(width, height, channels);
    for &(row, col) in spikes {
        frame.pixel_mut(col, row).fill(1.0);
    }
    frame
}

fn hard_auto(notch_radius: u32, protect_dc: u32) -> AutoNotch {
    AutoNotch::from_config(AutoNotchConfig {
        threshold_rel: 0.5,
        min_distance: 4,
        notch_radius,
        protect_dc,
        feather: 0.0,
    })
    .unwrap()
}

fn manual_in(dir: &TempDir, feather: f32, protect_dc: u32) -> ManualNotch {
    ManualNotch::from_config(ManualNotchConfig {
        feather,
        protect_dc,
    })
    .unwrap()
    .with_preview_dir(dir.path())
}

fn assert_filtered_is_product(frame: &Frame, mask: &Frame, filtered: &Frame) {
    for ((px, m), out) in frame
        .iter_pixels()
        .zip(mask.iter_pixels())
        .zip(filtered.iter_pixels())
    {
        for (&v, &o) in px.iter().zip(out) {
            assert_eq!(o, v * (1.0 - m[0]));
        }
    }
}

// ============================================================================
// Automatic mode
// ============================================================================

#[test]
fn test_invalid_config_rejected() {
    let config = AutoNotchConfig {
        notch_radius: 0,
        ..Default::default()
    };
    assert!(AutoNotch::from_config(config).is_err());
}

#[test]
fn test_auto_empty_batch_is_error() {
    let err = hard_auto(3, 0).process(&[]).unwrap_err();
    assert!(matches!(err, NotchError::EmptyBatch));
}

#[test]
fn test_auto_output_shapes() {
    let frames = vec![
        spike_frame(24, 16, 3, &[(4, 4)]),
        spike_frame(24, 16, 3, &[(10, 20)]),
    ];
    let output = hard_auto(2, 0).process(&frames).unwrap();

    assert_eq!(output.filtered.len(), 2);
    for i in 0..2 {
        assert_eq!(output.filtered[i].dims(), frames[i].dims());
        assert_eq!(output.previews[i].dims(), frames[i].dims());
        assert_eq!(output.masks[i].dims(), FrameDims::new(24, 16, 3));
    }
    assert_eq!(output.peaks, vec![vec![Peak::new(4, 4)], vec![Peak::new(10, 20)]]);
}

#[test]
fn test_auto_filtered_is_frame_times_inverse_mask() {
    let mut frame = spike_frame(32, 32, 3, &[(6, 6), (25, 9)]);
    for (i, v) in frame.pixels_mut().iter_mut().enumerate() {
        *v += (i % 7) as f32 * 0.01;
    }

    let auto = AutoNotch::from_config(AutoNotchConfig {
        min_distance: 3,
        notch_radius: 3,
        protect_dc: 4,
        feather: 1.5,
        ..Default::default()
    })
    .unwrap();
    let output = auto.process(std::slice::from_ref(&frame)).unwrap();

    assert_filtered_is_product(&frame, &output.masks[0], &output.filtered[0]);
    assert!(output.masks[0]
        .pixels()
        .iter()
        .all(|v| (0.0..=1.0).contains(v)));
}

#[test]
fn test_auto_peak_json_reports_first_frame_only() {
    let frames = vec![
        spike_frame(40, 40, 1, &[(5, 7)]),
        spike_frame(40, 40, 1, &[(30, 30), (5, 30)]),
    ];
    let output = hard_auto(6, 0).process(&frames).unwrap();
    assert_eq!(output.peak_positions_json(), r#"[{"x":7,"y":5,"r":6}]"#);
}

#[test]
fn test_auto_centre_peak_is_protected() {
    let frame = spike_frame(33, 33, 3, &[(16, 16)]);

    let protected = hard_auto(3, 5).process(std::slice::from_ref(&frame)).unwrap();
    assert!(protected.peaks[0].is_empty());
    assert_eq!(protected.filtered[0], frame);

    let unprotected = hard_auto(3, 0).process(std::slice::from_ref(&frame)).unwrap();
    assert_eq!(unprotected.peaks[0], vec![Peak::new(16, 16)]);
}

#[test]
fn test_auto_preview_does_not_affect_filtering() {
    let frame = spike_frame(32, 32, 3, &[(8, 8)]);
    let auto = hard_auto(3, 10);
    let result = auto.process_frame(&frame);

    assert_ne!(result.preview, frame);
    assert_eq!(result.filtered, apply_mask(&frame, &result.mask));
}

// ============================================================================
// Manual mode
// ============================================================================

#[test]
fn test_manual_empty_batch_is_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let err = manual_in(&dir, 0.0, 0).process(&[], &[]).unwrap_err();
    assert!(matches!(err, NotchError::EmptyBatch));
}

#[test]
fn test_manual_points_use_their_own_radius() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let manual = manual_in(&dir, 0.0, 0);
    let dims = FrameDims::new(40, 40, 1);

    let mask = manual.build_mask(dims, &[NotchPoint::new(10, 5, 2), NotchPoint::new(30, 30, 6)]);
    assert_eq!(mask[(10, 7)], 1.0);
    assert_eq!(mask[(10, 8)], 0.0);
    assert_eq!(mask[(36, 30)], 1.0);
    assert_eq!(mask[(37, 30)], 0.0);
}

#[test]
fn test_manual_dc_disk_is_forced_without_points() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let frame = Frame::new(32, 32, 1, vec![0.5; 32 * 32]).unwrap();

    let output = manual_in(&dir, 0.0, 4)
        .process(std::slice::from_ref(&frame), &[])
        .unwrap();

    let mask = &output.masks[0];
    assert_eq!(mask.pixel(16, 16), &[1.0, 1.0, 1.0]);
    assert_eq!(mask.pixel(20, 16), &[1.0, 1.0, 1.0]);
    assert_eq!(mask.pixel(21, 16), &[0.0, 0.0, 0.0]);
    assert_eq!(output.filtered[0].pixel(16, 16), &[0.0]);
    assert_eq!(output.filtered[0].pixel(0, 0), &[0.5]);
}

#[test]
fn test_manual_without_points_or_dc_is_identity() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let frame = Frame::new(8, 8, 3, (0..192).map(|i| i as f32 / 192.0).collect()).unwrap();

    let output = manual_in(&dir, 2.0, 0)
        .process(std::slice::from_ref(&frame), &[])
        .unwrap();
    assert!(output.masks[0].pixels().iter().all(|&v| v == 0.0));
    assert_eq!(output.filtered[0], frame);
}

#[test]
fn test_manual_extreme_point_values_are_not_fatal() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let frame = Frame::new(16, 16, 1, vec![0.5; 256]).unwrap();
    let manual = manual_in(&dir, 0.0, 0);

    let masked = |json: &str| {
        let output = manual
            .process_json(std::slice::from_ref(&frame), json)
            .unwrap();
        output.masks[0].iter_pixels().filter(|px| px[0] == 1.0).count()
    };

    assert_eq!(masked(r#"[{"x":5,"y":5,"r":4294967296}]"#), 256);
    assert_eq!(masked(r#"[{"x":5,"y":5,"r":-9223372036854775808}]"#), 256);
    assert_eq!(masked(r#"[{"x":9223372036854775807,"y":5,"r":3}]"#), 0);
    assert_eq!(masked(r#"[{"x":1e300,"y":5,"r":3}]"#), 0);
    assert_eq!(masked(r#"[{"x":5,"y":-1e300,"r":1e300}]"#), 0);
}

#[test]
fn test_manual_malformed_json_matches_empty_array() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let frames = vec![spike_frame(16, 16, 3, &[(3, 3)])];
    let manual = manual_in(&dir, 1.0, 3);

    let malformed = manual.process_json(&frames, "{not json").unwrap();
    let empty = manual.process_json(&frames, "[]").unwrap();
    assert_eq!(malformed.filtered, empty.filtered);
    assert_eq!(malformed.masks, empty.masks);
}

#[test]
fn test_manual_exports_first_input_frame() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let frames = vec![
        spike_frame(10, 6, 1, &[(2, 3)]),
        spike_frame(10, 6, 1, &[(4, 4)]),
    ];

    let output = manual_in(&dir, 0.0, 0)
        .process(&frames, &[NotchPoint::new(3, 2, 1)])
        .unwrap();

    let path = output.preview.path_in(dir.path());
    let exported = image::open(&path).unwrap().to_rgb8();
    assert_eq!(exported.dimensions(), (10, 6));
    // The preview shows the unfiltered input, not the notched output.
    assert_eq!(exported.get_pixel(3, 2).0, [255, 255, 255]);
    assert_eq!(output.filtered[0].pixel(3, 2), &[0.0]);
}

#[test]
fn test_manual_filtered_is_frame_times_inverse_mask() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let frame = Frame::new(20, 20, 3, (0..1200).map(|i| (i % 13) as f32 / 13.0).collect()).unwrap();
    let points = [NotchPoint::new(4, 4, 3), NotchPoint::new(6, 5, 2)];

    let output = manual_in(&dir, 2.0, 2)
        .process(std::slice::from_ref(&frame), &points)
        .unwrap();
    assert_filtered_is_product(&frame, &output.masks[0], &output.filtered[0]);
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_auto_peaks_reproduce_mask_in_manual_mode() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let frame = spike_frame(64, 48, 3, &[(5, 5), (5, 50), (40, 20), (12, 60)]);

    let auto = hard_auto(4, 6);
    let auto_output = auto.process(std::slice::from_ref(&frame)).unwrap();
    assert_eq!(auto_output.peaks[0].len(), 4);

    let manual = manual_in(&dir, 0.0, 0);
    let manual_output = manual
        .process_json(std::slice::from_ref(&frame), &auto_output.peak_positions_json())
        .unwrap();

    assert_eq!(manual_output.masks[0], auto_output.masks[0]);
    assert_eq!(manual_output.filtered[0], auto_output.filtered[0]);
}
