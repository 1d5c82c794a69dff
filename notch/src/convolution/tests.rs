//! Tests for Gaussian feathering.

use super::*;

#[test]
fn test_kernel_normalized_and_symmetric() {
    for sigma in [0.5, 1.0, 2.0, 5.0, 20.0] {
        let kernel = gaussian_kernel_1d(sigma);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "sum {sum} for sigma={sigma}");

        let n = kernel.len();
        for i in 0..n / 2 {
            assert!((kernel[i] - kernel[n - 1 - i]).abs() < 1e-7);
        }
    }
}

#[test]
fn test_kernel_radius_is_four_sigma() {
    assert_eq!(gaussian_kernel_1d(1.0).len(), 9);
    assert_eq!(gaussian_kernel_1d(2.0).len(), 17);
    // 4 * 0.3 + 0.5 = 1.7 -> radius 1
    assert_eq!(gaussian_kernel_1d(0.3).len(), 3);
    // 4 * 0.1 + 0.5 = 0.9 -> radius 0, identity kernel
    assert_eq!(gaussian_kernel_1d(0.1), vec![1.0]);
}

#[test]
#[should_panic(expected = "Sigma must be positive")]
fn test_kernel_zero_sigma_panics() {
    gaussian_kernel_1d(0.0);
}

#[test]
fn test_reflect_index() {
    // d c b a | a b c d | d c b a
    let len = 4;
    let mapped: Vec<usize> = (-4..8).map(|i| reflect_index(i, len)).collect();
    assert_eq!(mapped, vec![3, 2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0]);

    // Offsets wider than the axis keep folding.
    assert_eq!(reflect_index(-1, 1), 0);
    assert_eq!(reflect_index(5, 1), 0);
    assert_eq!(reflect_index(9, 3), 2);
}

#[test]
fn test_uniform_plane_is_unchanged() {
    let plane = Buffer2::new_filled(16, 12, 0.5f32);
    let blurred = gaussian_blur(&plane, 2.0);
    for v in blurred.iter() {
        assert!((v - 0.5).abs() < 1e-5, "uniform plane drifted to {v}");
    }
}

#[test]
fn test_reflect_border_preserves_flux() {
    // With reflect borders no mass leaves the image.
    let mut plane = Buffer2::new_default(20, 20);
    plane[(0, 0)] = 1.0f32;
    plane[(10, 10)] = 1.0;

    let blurred = gaussian_blur(&plane, 1.5);
    let total: f32 = blurred.iter().sum();
    assert!((total - 2.0).abs() < 1e-4, "total flux {total}");
}

#[test]
fn test_point_spreads_symmetrically() {
    let mut plane = Buffer2::new_default(21, 21);
    plane[(10, 10)] = 1.0f32;

    let blurred = gaussian_blur(&plane, 2.0);
    let center = blurred[(10, 10)];
    assert!(center < 1.0 && center > 0.0);
    assert!((blurred[(7, 10)] - blurred[(13, 10)]).abs() < 1e-7);
    assert!((blurred[(10, 7)] - blurred[(7, 10)]).abs() < 1e-7);
    assert!(blurred[(9, 10)] < center);
}

#[test]
fn test_kernel_larger_than_image() {
    let mut plane = Buffer2::new_default(3, 2);
    plane[(1, 0)] = 1.0f32;

    let blurred = gaussian_blur(&plane, 5.0);
    let total: f32 = blurred.iter().sum();
    assert!((total - 1.0).abs() < 1e-4);
    assert!(blurred.iter().all(|v| v.is_finite() && *v >= 0.0));
}
