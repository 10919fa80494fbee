//! Integration tests for the six concrete scenarios, wired through the
//! real `Zone`/`Cell`/`Registry` types rather than the bare geometry used
//! by the per-module unit tests.

use lib_warrencore::prelude::*;

fn open_zone(extent: Extent, border: u32) -> Zone<Cell> {
    let mut zone = Zone::new(extent, border, Cell::OPEN, Cell::CLOSED);
    if border > 0 {
        zone.set_region(Region::Border, Cell::CLOSED);
    }
    zone
}

#[test]
fn scenario_1_empty_zone_fov_sees_exactly_29_offsets() {
    let zone = open_zone(Extent::new(11, 11), 0);
    let origin = Offset::new(5, 5);
    let area = shadow_cast(origin, 3, None, |p| !zone.get(p).has(Trait::Opaque));

    let mut expected = 0;
    for y in 2..=8 {
        for x in 2..=8 {
            let p = Offset::new(x, y);
            if origin.chebyshev(&p) <= 3 && origin.euclidean(&p) <= 3.0 {
                expected += 1;
                assert!(area.contains(p));
            }
        }
    }
    assert_eq!(area.len(), 29);
    assert_eq!(area.len(), expected);
}

#[test]
fn scenario_2_a_wall_occludes_the_cells_behind_it() {
    let mut zone = open_zone(Extent::new(11, 11), 0);
    let wall = Offset::new(5, 4);
    zone.set(wall, Cell::OPEN.with(Trait::Opaque, true).with(Trait::Solid, true));

    let origin = Offset::new(5, 5);
    let area = shadow_cast(origin, 5, None, |p| !zone.get(p).has(Trait::Opaque));

    assert!(area.contains(wall));
    for y in 0..=3 {
        assert!(!area.contains(Offset::new(5, y)), "({},{}) should be occluded", 5, y);
    }
    assert!(area.contains(Offset::new(4, 4)));
    assert!(area.contains(Offset::new(6, 4)));
}

#[test]
fn scenario_3_bresenham_diagonal_tie_break() {
    let path = line(Offset::new(0, 0), Offset::new(3, 2));
    assert_eq!(
        path,
        vec![Offset::new(0, 0), Offset::new(1, 1), Offset::new(2, 1), Offset::new(3, 2)]
    );
}

#[test]
fn scenario_4_astar_detours_around_a_solid_column() {
    let mut zone = open_zone(Extent::new(5, 5), 0);
    for y in 0..4 {
        zone.set(Offset::new(2, y), Cell::OPEN.with(Trait::Solid, true));
    }

    let path = astar(
        Offset::new(0, 0),
        Offset::new(4, 0),
        Distance::Octile,
        |p| !zone.get(p).has(Trait::Solid),
        |_| false,
    );

    assert_eq!(path.len(), 9);
    assert!(path.contains(&Offset::new(2, 4)));
    assert!(path.iter().all(|&p| !zone.get(p).has(Trait::Solid)));
}

#[test]
fn scenario_5_goal_map_descent() {
    let zone = open_zone(Extent::new(10, 10), 0);
    let field = Field::build(zone.extent(), &[Offset::new(0, 0)], Distance::Octile, |p| !zone.get(p).has(Trait::Solid), |_| false);

    assert_eq!(field.at(Offset::new(3, 4)), Some(7));
    let down = field.descend(Offset::new(3, 4), |_| false).expect("should have a descent");
    assert_eq!(field.at(down), Some(6));
}

#[test]
fn scenario_6_sanguine_invocation_converts_two_fresh_skulls_then_becomes_a_no_op() {
    let zone = open_zone(Extent::new(10, 10), 1);
    let mut registry = Registry::new();
    registry.set_player(PlayerEntity { offset: Offset::new(5, 5), hp: 10, max_hp: 10, armor: 0, energy: 3, max_energy: 3 });
    registry.add_skull(SkullEntity { offset: Offset::new(5, 4), fresh: true });
    registry.add_skull(SkullEntity { offset: Offset::new(6, 5), fresh: true });

    let cmd = EntityCommand::new(EntityCommandKind::SanguineInvocation, Offset::new(5, 5), Offset::new(5, 5));
    assert!(registry.process_command(cmd, &zone, false));
    assert_eq!(registry.player().unwrap().energy, 0);
    assert_eq!(registry.skulls().count(), 0);
    assert_eq!(registry.evil_positions().len(), 2);

    assert!(!registry.process_command(cmd, &zone, false));
}
