use collide_core::testing::{
    spawn_test_dense_field, spawn_test_head_on_pair, spawn_test_immovable_obstacle,
    spawn_test_overlapping_pair, spawn_test_segment_approach, spawn_test_wall_approach,
};

#[test]
fn head_on_pair_reverses_after_enough_time() {
    let mut sched = spawn_test_head_on_pair();
    let (v0_before, v1_before) = (
        sched.particles().get(0).unwrap().vx,
        sched.particles().get(1).unwrap().vx,
    );
    sched.advance(3.0);
    let (v0_after, v1_after) = (
        sched.particles().get(0).unwrap().vx,
        sched.particles().get(1).unwrap().vx,
    );
    assert_ne!(v0_before.signum(), v0_after.signum());
    assert_ne!(v1_before.signum(), v1_after.signum());
}

#[test]
fn wall_approach_bounces_off_the_boundary() {
    let mut sched = spawn_test_wall_approach();
    let before_vy = sched.particles().get(0).unwrap().vy;
    sched.advance(2.0);
    let after_vy = sched.particles().get(0).unwrap().vy;
    assert!(before_vy > 0.0);
    assert!(after_vy < 0.0);
}

#[test]
fn segment_approach_reflects_velocity() {
    let mut sched = spawn_test_segment_approach();
    let before_vx = sched.particles().get(0).unwrap().vx;
    sched.advance(3.0);
    let after_vx = sched.particles().get(0).unwrap().vx;
    assert!(before_vx > 0.0);
    assert!(after_vx < 0.0);
}

#[test]
fn overlapping_pair_resolves_without_getting_stuck() {
    let mut sched = spawn_test_overlapping_pair();
    sched.advance(1.0);
    // Both particles should have had at least one velocity-changing event;
    // a stuck scheduler would leave them still moving toward each other.
    let a = sched.particles().get(0).unwrap();
    let b = sched.particles().get(1).unwrap();
    assert!(a.gen > 0 || b.gen > 0);
}

#[test]
fn immovable_obstacle_never_moves() {
    let mut sched = spawn_test_immovable_obstacle();
    sched.advance(5.0);
    let obstacle = sched.particles().get(1).unwrap();
    assert_eq!(obstacle.vx, 0.0);
    assert_eq!(obstacle.vy, 0.0);
}

#[test]
fn dense_field_runs_to_completion_without_panicking() {
    let mut sched = spawn_test_dense_field(40);
    sched.advance(2.0);
    assert_eq!(sched.particles().len(), 40);
}
