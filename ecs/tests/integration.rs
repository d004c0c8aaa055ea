use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use rstest::rstest;
use trellis_core::math::{Mat4, Quat, Vec3};
use trellis_ecs::components::*;
use trellis_ecs::{
    PropagationError, TransformPropagation, World, despawn_recursive, remove_parent,
    run_transform_systems, set_parent,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn tick(world: &mut World, propagation: &mut TransformPropagation) {
    run_transform_systems(world, propagation).expect("propagation pass failed");
}

fn world_of(world: &World, node: trellis_ecs::NodeId) -> WorldTransform {
    *world
        .get::<WorldTransform>(node)
        .expect("node has no world transform")
}

/// A 1920x1080 screen-like root.
fn spawn_screen(world: &mut World) -> trellis_ecs::NodeId {
    let screen = world.spawn_node();
    world.insert(screen, Scale(Vec3::new(1920.0, 1080.0, 1.0)));
    screen
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

#[test]
fn root_without_attributes_is_identity() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let node = world.spawn_node();

    tick(&mut world, &mut propagation);

    assert_eq!(world_of(&world, node), WorldTransform::IDENTITY);
    assert_eq!(world.get::<WorldRotation>(node), Some(&WorldRotation::IDENTITY));
}

#[test]
fn scale_applies_before_translation() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let node = world.spawn_node();
    world.insert(node, Scale(Vec3::new(2.0, 1.0, 2.0)));
    world.insert(node, Position(Vec3::new(2.0, 2.0, 6.0)));

    tick(&mut world, &mut propagation);

    let expected = Mat4::from_translation(Vec3::new(2.0, 2.0, 6.0))
        * Mat4::from_scale(Vec3::new(2.0, 1.0, 2.0));
    let resolved = world_of(&world, node);
    assert!(resolved.0.abs_diff_eq(expected, 1e-6));
    assert!(resolved
        .transform_point(Vec3::ONE)
        .abs_diff_eq(Vec3::new(4.0, 3.0, 8.0), 1e-6));
}

#[test]
fn child_offset_follows_parent_rotation_and_scale() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let parent = world.spawn_node();
    world.insert(parent, Position(Vec3::new(5.0, 0.0, 0.0)));
    world.insert(parent, Rotation(Quat::from_rotation_y(FRAC_PI_2)));
    world.insert(parent, Scale::uniform(2.0));
    let child = world.spawn_node();
    world.insert(child, Position(Vec3::new(0.0, 0.0, 2.0)));
    set_parent(&mut world, child, parent);

    tick(&mut world, &mut propagation);

    let resolved = world_of(&world, child);
    assert!(resolved.translation().abs_diff_eq(Vec3::new(9.0, 0.0, 0.0), 0.1));
    assert!(resolved.scale().abs_diff_eq(Vec3::splat(2.0), 1e-4));
}

#[test]
fn world_rotation_accumulates_without_scale() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let parent = world.spawn_node();
    world.insert(parent, Rotation(Quat::from_rotation_z(FRAC_PI_4)));
    world.insert(parent, Scale(Vec3::new(3.0, 0.5, 7.0)));
    let child = world.spawn_node();
    world.insert(child, Rotation(Quat::from_rotation_z(FRAC_PI_4)));
    world.insert(child, Scale::uniform(10.0));
    set_parent(&mut world, child, parent);

    tick(&mut world, &mut propagation);

    let rotation = world.get::<WorldRotation>(child).unwrap().0;
    assert!(rotation.abs_diff_eq(Quat::from_rotation_z(FRAC_PI_2), 1e-5));
    assert!((rotation.length() - 1.0).abs() < 1e-6);
}

#[test]
fn euler_angles_compose_before_rotation() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let node = world.spawn_node();
    world.insert(node, EulerAngles(Vec3::new(0.0, 0.0, FRAC_PI_4)));
    world.insert(node, Rotation(Quat::from_rotation_z(FRAC_PI_4)));

    tick(&mut world, &mut propagation);

    let rotation = world.get::<WorldRotation>(node).unwrap().0;
    assert!(rotation.abs_diff_eq(Quat::from_rotation_z(FRAC_PI_2), 1e-5));
}

// ---------------------------------------------------------------------------
// Anchors and pivots
// ---------------------------------------------------------------------------

#[rstest]
#[case::center(
    Anchor::CENTER,
    Vec3::new(32.0, 1.0, 1.0),
    Vec3::new(960.0, 540.0, 0.0),
    Vec3::new(32.0, 1.0, 1.0)
)]
#[case::margins(
    Anchor::margins(10.0, 10.0, 10.0, 10.0),
    Vec3::ONE,
    Vec3::new(10.0, 10.0, 0.0),
    Vec3::new(1900.0, 1060.0, 1.0)
)]
#[case::stretch(
    Anchor::STRETCH,
    Vec3::ONE,
    Vec3::ZERO,
    Vec3::new(1920.0, 1080.0, 1.0)
)]
#[case::stretch_half_scale(
    Anchor::STRETCH,
    Vec3::new(0.5, 0.5, 1.0),
    Vec3::ZERO,
    Vec3::new(960.0, 540.0, 1.0)
)]
fn anchored_child_is_laid_out_in_parent_box(
    #[case] anchor: Anchor,
    #[case] scale: Vec3,
    #[case] expected_position: Vec3,
    #[case] expected_scale: Vec3,
) {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let screen = spawn_screen(&mut world);
    let child = world.spawn_node();
    world.insert(child, anchor);
    world.insert(child, Scale(scale));
    set_parent(&mut world, child, screen);

    tick(&mut world, &mut propagation);

    let resolved = world_of(&world, child);
    assert!(resolved.translation().abs_diff_eq(expected_position, 1e-3));
    assert!(resolved.scale().abs_diff_eq(expected_scale, 1e-3));
}

#[rstest]
#[case::x_axis(AnchorEdge::absolute(20.0), AnchorEdge::absolute(1900.0), 0)]
#[case::y_axis(AnchorEdge::fraction(0.25), AnchorEdge::fraction(0.25), 1)]
fn zero_anchor_extent_clamps_to_unit_scale(
    #[case] min: AnchorEdge,
    #[case] max: AnchorEdge,
    #[case] axis: usize,
) {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let screen = spawn_screen(&mut world);
    let mut anchor = Anchor::STRETCH;
    match axis {
        0 => {
            anchor.min_x = min;
            anchor.max_x = max;
        }
        _ => {
            anchor.min_y = min;
            anchor.max_y = max;
        }
    }
    let child = world.spawn_node();
    world.insert(child, anchor);
    set_parent(&mut world, child, screen);

    tick(&mut world, &mut propagation);

    let scale = world_of(&world, child).scale();
    assert_eq!(scale[axis], 1.0);
    assert!(scale.cmpgt(Vec3::ZERO).all());
}

#[rstest]
#[case::no_pivot(Vec3::ZERO, Vec3::new(10.0, 10.0, 0.0))]
#[case::centered(Vec3::new(0.5, 0.5, 0.0), Vec3::new(8.0, 9.0, 0.0))]
#[case::far_corner(Vec3::new(1.0, 1.0, 0.0), Vec3::new(6.0, 8.0, 0.0))]
fn pivot_offsets_node_by_its_own_scale(#[case] pivot: Vec3, #[case] expected: Vec3) {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let node = world.spawn_node();
    world.insert(node, Position(Vec3::new(10.0, 10.0, 0.0)));
    world.insert(node, Scale(Vec3::new(4.0, 2.0, 1.0)));
    world.insert(node, Pivot(pivot));

    tick(&mut world, &mut propagation);

    assert!(world_of(&world, node).translation().abs_diff_eq(expected, 1e-5));
}

#[test]
fn anchored_pivot_uses_resolved_world_scale() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let screen = spawn_screen(&mut world);
    let button = world.spawn_node();
    world.insert(button, Anchor::CENTER);
    world.insert(button, Scale(Vec3::new(100.0, 50.0, 1.0)));
    world.insert(button, Pivot(Vec3::new(0.5, 0.5, 0.0)));
    set_parent(&mut world, button, screen);

    tick(&mut world, &mut propagation);

    let resolved = world_of(&world, button);
    assert!(resolved
        .translation()
        .abs_diff_eq(Vec3::new(910.0, 515.0, 0.0), 1e-3));
    assert!(resolved.scale().abs_diff_eq(Vec3::new(100.0, 50.0, 1.0), 1e-3));
}

#[test]
fn anchor_on_root_is_ignored() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let node = world.spawn_node();
    world.insert(node, Anchor::margins(10.0, 10.0, 10.0, 10.0));
    world.insert(node, Position(Vec3::new(3.0, 4.0, 0.0)));

    tick(&mut world, &mut propagation);

    let resolved = world_of(&world, node);
    assert!(resolved.translation().abs_diff_eq(Vec3::new(3.0, 4.0, 0.0), 1e-6));
    assert!(resolved.scale().abs_diff_eq(Vec3::ONE, 1e-6));
}

#[test]
fn anchored_root_skips_both_pivot_stages() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let node = world.spawn_node();
    world.insert(node, Anchor::CENTER);
    world.insert(node, Position(Vec3::new(10.0, 10.0, 0.0)));
    world.insert(node, Scale(Vec3::new(4.0, 2.0, 1.0)));
    world.insert(node, Pivot(Vec3::new(0.5, 0.5, 0.0)));

    tick(&mut world, &mut propagation);

    let resolved = world_of(&world, node);
    assert!(resolved.translation().abs_diff_eq(Vec3::new(10.0, 10.0, 0.0), 1e-6));
    assert!(resolved.scale().abs_diff_eq(Vec3::new(4.0, 2.0, 1.0), 1e-6));
}

// ---------------------------------------------------------------------------
// Ordering and hierarchy changes
// ---------------------------------------------------------------------------

#[test]
fn deep_chain_resolves_regardless_of_spawn_order() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();

    // Spawn leaf first so enumeration order is the reverse of depth order.
    let nodes: Vec<_> = (0..5).map(|_| world.spawn_node()).collect();
    for node in &nodes {
        world.insert(*node, Position(Vec3::X));
    }
    for pair in nodes.windows(2) {
        set_parent(&mut world, pair[0], pair[1]);
    }

    let stats = run_transform_systems(&mut world, &mut propagation).unwrap();

    assert_eq!(stats.nodes, 5);
    assert_eq!(stats.depth_levels, 5);
    assert!(world_of(&world, nodes[0])
        .translation()
        .abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-5));
    assert!(world_of(&world, nodes[4])
        .translation()
        .abs_diff_eq(Vec3::X, 1e-6));
}

#[test]
fn repeated_passes_are_identical() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let screen = spawn_screen(&mut world);
    let panel = world.spawn_node();
    world.insert(panel, Anchor::margins(12.0, 8.0, 12.0, 8.0));
    world.insert(panel, Rotation(Quat::from_rotation_z(0.3)));
    world.insert(panel, Pivot(Vec3::splat(0.5)));
    set_parent(&mut world, panel, screen);

    tick(&mut world, &mut propagation);
    let first = (world_of(&world, panel), *world.get::<WorldRotation>(panel).unwrap());
    tick(&mut world, &mut propagation);
    let second = (world_of(&world, panel), *world.get::<WorldRotation>(panel).unwrap());

    assert_eq!(first, second);
}

#[test]
fn reparenting_takes_effect_next_pass() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let a = world.spawn_node();
    world.insert(a, Position(Vec3::new(10.0, 0.0, 0.0)));
    let b = world.spawn_node();
    world.insert(b, Position(Vec3::new(0.0, 10.0, 0.0)));
    let child = world.spawn_node();
    world.insert(child, Position(Vec3::X));
    set_parent(&mut world, child, a);

    tick(&mut world, &mut propagation);
    assert!(world_of(&world, child)
        .translation()
        .abs_diff_eq(Vec3::new(11.0, 0.0, 0.0), 1e-6));

    set_parent(&mut world, child, b);
    tick(&mut world, &mut propagation);
    assert!(world_of(&world, child)
        .translation()
        .abs_diff_eq(Vec3::new(1.0, 10.0, 0.0), 1e-6));

    remove_parent(&mut world, child);
    tick(&mut world, &mut propagation);
    assert!(world_of(&world, child).translation().abs_diff_eq(Vec3::X, 1e-6));
}

#[test]
fn child_of_non_transform_parent_resolves_as_root() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let group = world.spawn();
    world.insert(group, Position(Vec3::new(100.0, 0.0, 0.0)));
    let child = world.spawn_node();
    world.insert(child, Position(Vec3::new(1.0, 2.0, 3.0)));
    set_parent(&mut world, child, group);

    tick(&mut world, &mut propagation);

    assert!(world_of(&world, child)
        .translation()
        .abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-6));
    assert!(world.get::<WorldTransform>(group).is_none());
}

#[test]
fn despawned_subtree_is_skipped_and_handles_are_reused() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let root = world.spawn_node();
    let child = world.spawn_node();
    world.insert(child, Position(Vec3::X));
    set_parent(&mut world, child, root);
    tick(&mut world, &mut propagation);

    despawn_recursive(&mut world, root);
    let reused = world.spawn_node();
    world.insert(reused, Position(Vec3::Y));
    let stats = run_transform_systems(&mut world, &mut propagation).unwrap();

    assert_eq!(stats.nodes, 1);
    assert_eq!(stats.attributes_requested, 1);
    assert!(world_of(&world, reused).translation().abs_diff_eq(Vec3::Y, 1e-6));
}

#[test]
fn despawned_parent_does_not_adopt_children_through_reused_handle() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let parent = world.spawn_node();
    world.insert(parent, Position(Vec3::new(5.0, 0.0, 0.0)));
    let child = world.spawn_node();
    world.insert(child, Position(Vec3::X));
    set_parent(&mut world, child, parent);
    tick(&mut world, &mut propagation);

    world.despawn(parent);
    let stranger = world.spawn_node();
    world.insert(stranger, Position(Vec3::new(100.0, 0.0, 0.0)));
    tick(&mut world, &mut propagation);

    assert_eq!(stranger, parent);
    assert!(world.get::<Parent>(child).is_none());
    assert!(world_of(&world, child).translation().abs_diff_eq(Vec3::X, 1e-6));
    assert!(
        world_of(&world, stranger)
            .translation()
            .abs_diff_eq(Vec3::new(100.0, 0.0, 0.0), 1e-6)
    );
}

#[test]
fn cycle_is_reported_and_previous_results_survive() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let a = world.spawn_node();
    world.insert(a, Position(Vec3::X));
    let b = world.spawn_node();
    set_parent(&mut world, b, a);
    tick(&mut world, &mut propagation);
    let before = world_of(&world, b);

    world.insert(b, Position(Vec3::Z));
    set_parent(&mut world, a, b);
    let err = run_transform_systems(&mut world, &mut propagation).unwrap_err();

    assert!(matches!(err, PropagationError::CyclicHierarchy { .. }));
    assert_eq!(world_of(&world, b), before);

    remove_parent(&mut world, a);
    tick(&mut world, &mut propagation);
    assert!(world_of(&world, b)
        .translation()
        .abs_diff_eq(Vec3::new(1.0, 0.0, 1.0), 1e-6));
}

#[test]
fn new_nodes_receive_results_in_their_first_pass() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    world.spawn_node();
    tick(&mut world, &mut propagation);

    let late = world.spawn_node();
    world.insert(late, Position(Vec3::new(0.0, 0.0, -4.0)));
    let stats = run_transform_systems(&mut world, &mut propagation).unwrap();

    assert_eq!(stats.attributes_requested, 1);
    assert_eq!(stats.written, 2);
    assert!(world_of(&world, late)
        .translation()
        .abs_diff_eq(Vec3::new(0.0, 0.0, -4.0), 1e-6));
}

#[test]
fn scratch_capacity_tracks_handle_range() {
    init_logging();
    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    for _ in 0..100 {
        world.spawn_node();
    }

    tick(&mut world, &mut propagation);

    assert_eq!(propagation.capacity(), 128);
    assert!(propagation.capacity().is_power_of_two());
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[cfg(feature = "serialize")]
#[test]
fn layout_attributes_survive_ron() {
    let anchor = Anchor::margins(10.0, 20.0, 10.0, 20.0);
    let text = ron::to_string(&anchor).unwrap();
    let parsed: Anchor = ron::from_str(&text).unwrap();
    assert_eq!(parsed, anchor);

    let mut world = World::new();
    let mut propagation = TransformPropagation::new();
    let screen = spawn_screen(&mut world);
    let child = world.spawn_node();
    world.insert(child, parsed);
    set_parent(&mut world, child, screen);
    tick(&mut world, &mut propagation);

    let result = world_of(&world, child);
    let text = ron::to_string(&result).unwrap();
    let parsed: WorldTransform = ron::from_str(&text).unwrap();
    assert!(parsed.0.abs_diff_eq(result.0, 1e-3));
}
