use approx::assert_relative_eq;
use nalgebra::Vector3;
use qconv::conversion::{area, linear, point};
use qconv::float_types::{Real, TAU};

#[test]
fn zero_angle_point_geometry_returns_scaled_beam() {
    // single x+ sample circle, single z+ detector circle, both at zero
    let q = point(&[0.0], &[0.0], 1, &["x+"], &["z+"], Vector3::z(), 1.54).unwrap();
    assert_eq!(q.len(), 1);
    assert_relative_eq!(q[0], Vector3::new(0.0, 0.0, TAU / 1.54), epsilon = 1e-12);
}

#[test]
fn symmetric_reflection_hits_the_bragg_norm() {
    // beam along +y, sample rocked to theta about x+, detector arm at two
    // theta: the center channel must see |q| = 4 pi sin(theta) / lambda,
    // pointing along +z for this geometry
    let wl = 1.54;
    let theta: Real = (15.0 as Real).to_radians();
    let q = linear(
        &[theta],
        &[2.0 * theta],
        1,
        &["x+"],
        &["x+"],
        Vector3::y(),
        "z+",
        160.0,
        0.05,
        160..161,
        wl,
    )
    .unwrap();
    let expected = 2.0 * TAU * theta.sin() / wl;
    assert_relative_eq!(q[0], Vector3::new(0.0, 0.0, expected), epsilon = 1e-10);
}

#[test]
fn center_channel_sees_zero_momentum_transfer() {
    // at all-zero angles the center channel looks straight into the beam
    let q = linear(
        &[0.0],
        &[0.0],
        1,
        &["z+"],
        &["z+"],
        Vector3::y(),
        "x+",
        4.0,
        0.1,
        0..9,
        1.54,
    )
    .unwrap();
    assert_eq!(q.len(), 9);
    assert_relative_eq!(q[4], Vector3::zeros(), epsilon = 1e-12);

    // channels mirror around the center along the mount direction
    for offset in 1..=4 {
        assert!(
            (q[4 - offset].x + q[4 + offset].x).abs() < 1e-12,
            "x components should be antisymmetric around the center channel"
        );
        assert!(
            (q[4 - offset].y - q[4 + offset].y).abs() < 1e-12,
            "y components should be symmetric around the center channel"
        );
        assert_relative_eq!(q[4 + offset].z, 0.0, epsilon = 1e-12);
    }
}

#[test]
fn area_with_a_single_pinned_row_matches_linear() {
    let sample = [0.35, -0.2];
    let detector = [0.6, 1.1];
    let lin = linear(
        &sample,
        &detector,
        2,
        &["x+"],
        &["x+"],
        Vector3::y(),
        "z+",
        3.5,
        0.05,
        0..8,
        1.54,
    )
    .unwrap();
    // the second pixel coordinate sits on its center channel and cancels
    let ar = area(
        &sample,
        &detector,
        2,
        &["x+"],
        &["x+"],
        Vector3::y(),
        "z+",
        "x+",
        3.5,
        6.0,
        0.05,
        0.08,
        0..8,
        6..7,
        1.54,
    )
    .unwrap();
    assert_eq!(lin.len(), ar.len());
    for (ql, qa) in lin.iter().zip(&ar) {
        assert_relative_eq!(*ql, *qa, epsilon = 1e-12);
    }
}

#[test]
fn area_layout_is_position_then_j2_then_j1() {
    let sample = [0.1, 0.3];
    let detector = [0.2, 0.5];
    let all = area(
        &sample,
        &detector,
        2,
        &["y+"],
        &["x-"],
        Vector3::y(),
        "z-",
        "x+",
        3.0,
        8.0,
        0.05,
        0.04,
        2..5,
        7..9,
        1.2,
    )
    .unwrap();
    assert_eq!(all.len(), 2 * 3 * 2);

    // first output row is position 0, pixel (j1 = 2, j2 = 7)
    let corner = area(
        &sample[..1],
        &detector[..1],
        1,
        &["y+"],
        &["x-"],
        Vector3::y(),
        "z-",
        "x+",
        3.0,
        8.0,
        0.05,
        0.04,
        2..3,
        7..8,
        1.2,
    )
    .unwrap();
    assert_relative_eq!(all[0], corner[0], epsilon = 1e-12);

    // last output row is position 1, pixel (j1 = 4, j2 = 8):
    // idx = 1*3*2 + (8-7)*3 + (4-2)
    let single = area(
        &sample[1..],
        &detector[1..],
        1,
        &["y+"],
        &["x-"],
        Vector3::y(),
        "z-",
        "x+",
        3.0,
        8.0,
        0.05,
        0.04,
        4..5,
        8..9,
        1.2,
    )
    .unwrap();
    assert_relative_eq!(all[11], single[0], epsilon = 1e-12);
}

#[test]
fn batch_conversion_equals_per_position_conversion() {
    let sample: Vec<Real> = vec![0.0, 0.15, 0.3, 0.45];
    let detector: Vec<Real> = vec![0.0, 0.3, 0.6, 0.9];
    let batch = linear(
        &sample,
        &detector,
        4,
        &["x+"],
        &["x+"],
        Vector3::y(),
        "z+",
        2.0,
        0.1,
        0..5,
        1.54,
    )
    .unwrap();
    assert_eq!(batch.len(), 20);

    for i in 0..4 {
        let single = linear(
            &sample[i..=i],
            &detector[i..=i],
            1,
            &["x+"],
            &["x+"],
            Vector3::y(),
            "z+",
            2.0,
            0.1,
            0..5,
            1.54,
        )
        .unwrap();
        assert_eq!(&batch[i * 5..(i + 1) * 5], &single[..]);
    }
}
