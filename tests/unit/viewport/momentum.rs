use super::*;

#[test]
fn yields_initial_velocity_first() {
    let mut m = Momentum::new(Vec2::new(10.0, -4.0));
    assert_eq!(m.step(), Some(Vec2::new(10.0, -4.0)));
}

#[test]
fn decays_by_factor_each_frame() {
    let mut m = Momentum::new(Vec2::new(10.0, 0.0));
    m.step();
    assert_eq!(m.step(), Some(Vec2::new(9.5, 0.0)));
    assert_eq!(m.step(), Some(Vec2::new(9.025, 0.0)));
}

#[test]
fn terminates_within_bound_and_never_resumes() {
    // From |v|=v0, decay 0.95 per frame: frames to reach 0.5 is
    // ceil(ln(0.5 / v0) / ln(0.95)).
    let v0 = 40.0_f64;
    let bound = ((0.5 / v0).ln() / 0.95_f64.ln()).ceil() as usize + 1;

    let mut m = Momentum::new(Vec2::new(v0, v0));
    let mut frames = 0;
    while m.step().is_some() {
        frames += 1;
        assert!(frames <= bound, "momentum failed to terminate within {bound} frames");
    }
    assert!(m.is_finished());
    // Terminated is terminal.
    assert_eq!(m.step(), None);
    assert_eq!(m.step(), None);
}

#[test]
fn below_threshold_velocity_never_starts() {
    let mut m = Momentum::new(Vec2::new(0.49, 0.49));
    assert!(m.is_finished());
    assert_eq!(m.step(), None);
}

#[test]
fn one_large_axis_keeps_it_running() {
    let mut m = Momentum::new(Vec2::new(0.1, 5.0));
    assert!(!m.is_finished());
    assert!(m.step().is_some());
}
