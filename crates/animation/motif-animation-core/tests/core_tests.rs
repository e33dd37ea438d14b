use motif_animation_core::{Clip, ClipSet, Curve, Interpolator, Keyframe, PathInterpolator};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn linear_curve(points: &[(f32, f32)]) -> Curve<f32> {
    points.iter().map(|(t, v)| Keyframe::new(*t, *v)).collect()
}

#[test]
fn evaluate_clamps_to_boundary_keyframes() {
    let curves = [
        linear_curve(&[(0.5, 3.0)]),
        linear_curve(&[(0.0, 1.0), (1.0, 2.0)]),
        linear_curve(&[(2.0, -4.0), (0.25, 8.0), (1.0, 0.0)]),
    ];
    for c in &curves {
        let first = c.keyframes()[0];
        let last = c.keyframes()[c.len() - 1];
        for t in [first.time, first.time - 0.5, first.time - 100.0] {
            assert_eq!(c.evaluate(t), first.value);
        }
        for t in [last.time, last.time + 0.5, last.time + 100.0] {
            assert_eq!(c.evaluate(t), last.value);
        }
    }
}

#[test]
fn two_key_linear_midpoint_is_mean() {
    for (t0, v0, t1, v1) in [
        (0.0, 0.0, 1.0, 10.0),
        (1.5, -3.0, 4.0, 7.0),
        (0.1, 100.0, 0.2, -100.0),
    ] {
        let mut c = Curve::new();
        c.insert(t0, v0, None);
        c.insert(t1, v1, Some(Interpolator::Linear));
        approx(c.evaluate((t0 + t1) * 0.5), (v0 + v1) * 0.5, 1e-4);
    }
}

#[test]
fn destination_keyframe_chooses_the_ease() {
    let mut c = Curve::new();
    c.insert(0.0, 0.0, Some(Interpolator::Step));
    c.insert(1.0, 10.0, None);
    c.insert(2.0, 20.0, Some(Interpolator::Step));
    // first segment arrives linearly, second holds until its end
    approx(c.evaluate(0.5), 5.0, 1e-6);
    approx(c.evaluate(1.9), 10.0, 1e-6);
    approx(c.evaluate(2.0), 20.0, 1e-6);
}

#[test]
fn duplicate_times_resolve_to_last_inserted_inside_and_stored_order_at_edges() {
    let mut c = Curve::new();
    c.insert(0.0, 1.0, None);
    c.insert(0.0, 2.0, None);
    c.insert(1.0, 10.0, None);
    c.insert(1.0, 20.0, None);
    c.insert(2.0, 0.0, None);

    // at or before the first time: the first stored keyframe
    assert_eq!(c.evaluate(0.0), 1.0);
    // inside: the last keyframe inserted at the shared time
    assert_eq!(c.evaluate(1.0), 20.0);
    // the next segment leaves from that keyframe
    approx(c.evaluate(1.5), 10.0, 1e-6);
    assert_eq!(c.evaluate(2.0), 0.0);
}

#[test]
fn empty_curve_has_checked_evaluation() {
    let c: Curve<f32> = Curve::new();
    assert!(c.is_empty());
    assert_eq!(c.try_evaluate(0.0), None);
}

#[test]
fn byte_interpolators_hit_endpoints_and_are_monotone() {
    let steps = [0u8, 20, 64, 107, 127];
    for &b0 in &steps {
        for &b1 in &steps {
            for &b2 in &steps {
                for &b3 in &steps {
                    let ip = PathInterpolator::from_bytes([b0, b1, b2, b3]);
                    assert_eq!(ip.ease(0.0), 0.0);
                    assert_eq!(ip.ease(1.0), 1.0);
                    let mut prev = 0.0f32;
                    for i in 0..=64 {
                        let y = ip.ease(i as f32 / 64.0);
                        assert!(y.is_finite() && (0.0..=1.0).contains(&y));
                        assert!(
                            y >= prev - 1e-5,
                            "bytes {:?} not monotone at {i}: {y} < {prev}",
                            [b0, b1, b2, b3]
                        );
                        prev = y;
                    }
                }
            }
        }
    }
}

#[test]
fn byte_order_swaps_middle_bytes() {
    let ip = PathInterpolator::from_bytes([127, 0, 0, 127]);
    assert_eq!(ip.x0, 1.0);
    assert_eq!(ip.y0, 0.0);
    assert_eq!(ip.x1, 0.0);
    assert_eq!(ip.y1, 1.0);
}

#[test]
fn clip_set_fixture_deserializes_sorted_and_positional() {
    let set: ClipSet<f32> =
        motif_test_fixtures::clip_sets::load("bounce").expect("load bounce fixture");
    assert_eq!(set.len(), 2);
    let ball: &Clip<f32> = set.get(0).unwrap();
    assert_eq!(ball.name(), "ball");
    assert!(ball.curve("Camera:fov").unwrap().is_empty());
    approx(ball.curve("LocalPosition.y").unwrap().evaluate(0.5), 5.0, 1e-6);

    let shadow = set.get(1).unwrap();
    let size = shadow.curve("shadow_size").unwrap();
    // the step keyframe holds the previous value while approaching it
    approx(size.evaluate(0.5), 1.0, 1e-6);
    approx(size.evaluate(1.5), 0.75, 1e-6);
    assert_eq!(set.duration(), 2.0);
}
