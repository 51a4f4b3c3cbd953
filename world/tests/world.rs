use maze_runner_core::{
    ActorId, CellCode, CellCoord, Command, Direction, EditError, Event, Grid, Heading, Occupancy,
    PlacementError, PlayMode, Position, SessionOutcome,
};
use maze_runner_world::{apply, query, World};

/// Two routes lead from the spawn in the bottom right corner to the goal.
fn looped_world() -> World {
    World::with_grid(
        Grid::from_rows(vec![vec![1, 0, 0], vec![0, -1, 0], vec![0, 0, 2]])
            .expect("rectangular grid"),
    )
}

fn playing(mut world: World) -> World {
    let mut events = Vec::new();
    apply(
        &mut world,
        Command::SetPlayMode {
            mode: PlayMode::Play,
        },
        &mut events,
    );
    assert_eq!(
        events,
        vec![Event::PlayModeChanged {
            mode: PlayMode::Play
        }]
    );
    world
}

fn place_wall(world: &mut World, cell: CellCoord, occupancy: Occupancy) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, Command::PlaceWall { cell, occupancy }, &mut events);
    events
}

fn resting(cells: &[CellCoord]) -> Occupancy {
    Occupancy::resting(cells.to_vec())
}

fn rejection(cell: CellCoord, reason: PlacementError) -> Vec<Event> {
    vec![Event::WallPlacementRejected { cell, reason }]
}

#[test]
fn legal_wall_is_placed_and_resolved() {
    let mut world = playing(looped_world());
    let actor = CellCoord::new(2, 2);
    let target = CellCoord::new(0, 1);

    let events = place_wall(&mut world, target, resting(&[actor]));

    assert_eq!(
        events,
        vec![
            Event::CellChanged {
                cell: target,
                from: CellCode::OPEN,
                to: CellCode::WALL
            },
            Event::WallPlaced { cell: target },
            Event::MazeSolved {
                fully_reachable: true
            },
        ]
    );
    assert_eq!(query::grid(&world).get(target), Some(CellCode::WALL));
    assert_eq!(query::distance(&world, actor), Some(4));
    assert_eq!(query::distance(&world, CellCoord::new(0, 2)), Some(6));
    assert_eq!(
        query::heading(&world, CellCoord::new(0, 2)),
        Heading::Move(Direction::Down)
    );
}

#[test]
fn wall_under_an_actor_is_rejected() {
    let mut world = playing(looped_world());
    let actor = CellCoord::new(2, 1);

    let events = place_wall(&mut world, actor, resting(&[actor]));

    assert_eq!(events, rejection(actor, PlacementError::Occupied));
    assert_eq!(query::grid(&world).get(actor), Some(CellCode::OPEN));
}

#[test]
fn wall_under_a_moving_actor_footprint_is_rejected() {
    let mut world = playing(looped_world());
    let moving = Position {
        row: 2.0,
        column: 1.5,
    };
    let target = CellCoord::new(2, 1);

    let events = place_wall(
        &mut world,
        target,
        Occupancy::new(moving.footprint(), vec![moving.nearest()]),
    );

    assert_eq!(events, rejection(target, PlacementError::Occupied));
}

#[test]
fn stranding_wall_leaves_the_maze_untouched() {
    let mut world = playing(World::with_grid(
        Grid::from_rows(vec![vec![1, 0, 0, 0, 2]]).expect("rectangular grid"),
    ));
    let grid_before = query::grid(&world).clone();
    let solution_before = query::solution(&world).clone();
    let target = CellCoord::new(0, 2);

    let events = place_wall(&mut world, target, resting(&[CellCoord::new(0, 4)]));

    assert_eq!(events, rejection(target, PlacementError::WouldStrand));
    assert_eq!(query::grid(&world), &grid_before);
    assert_eq!(query::grid(&world).cells(), grid_before.cells());
    assert_eq!(query::solution(&world), &solution_before);
}

#[test]
fn stranding_is_checked_for_every_occupied_cell() {
    let mut world = playing(World::with_grid(
        Grid::from_rows(vec![vec![2, 0, 1, 0, 0, 3]]).expect("rectangular grid"),
    ));
    let target = CellCoord::new(0, 4);
    let standing = [CellCoord::new(0, 0), CellCoord::new(0, 5)];

    let events = place_wall(&mut world, target, resting(&standing));

    assert_eq!(events, rejection(target, PlacementError::WouldStrand));
}

#[test]
fn hop_into_a_wall_does_not_count_as_stranded() {
    let mut world = playing(World::with_grid(
        Grid::from_rows(vec![
            vec![1, 0, 0, 0],
            vec![-1, -1, -1, 0],
            vec![7, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .expect("rectangular grid"),
    ));
    let hopping = Position {
        row: 1.75,
        column: 0.0,
    };
    let occupancy = Occupancy::new(hopping.footprint(), vec![hopping.nearest()]);
    assert!(occupancy.covers(CellCoord::new(1, 0)));
    let target = CellCoord::new(3, 3);

    let events = place_wall(&mut world, target, occupancy.clone());

    assert!(events.contains(&Event::WallPlaced { cell: target }));
    assert_eq!(query::grid(&world).get(target), Some(CellCode::WALL));

    let events = place_wall(&mut world, CellCoord::new(2, 0), occupancy);
    assert_eq!(
        events,
        rejection(CellCoord::new(2, 0), PlacementError::Occupied)
    );
}

#[test]
fn only_open_cells_accept_walls() {
    let mut world = playing(looped_world());

    for cell in [
        CellCoord::new(0, 0),
        CellCoord::new(1, 1),
        CellCoord::new(2, 2),
    ] {
        let events = place_wall(&mut world, cell, Occupancy::default());
        assert_eq!(events, rejection(cell, PlacementError::NotOpen));
    }

    let outside = CellCoord::new(5, 5);
    let events = place_wall(&mut world, outside, Occupancy::default());
    assert_eq!(events, rejection(outside, PlacementError::OutOfBounds));
}

#[test]
fn walls_cannot_be_placed_while_editing() {
    let mut world = looped_world();
    let target = CellCoord::new(0, 1);

    let events = place_wall(&mut world, target, Occupancy::default());

    assert_eq!(events, rejection(target, PlacementError::InvalidMode));
}

#[test]
fn cells_cannot_be_painted_during_play() {
    let mut world = playing(looped_world());
    let mut events = Vec::new();
    let cell = CellCoord::new(0, 1);

    apply(
        &mut world,
        Command::SetCell {
            cell,
            code: CellCode::WALL,
        },
        &mut events,
    );

    assert_eq!(
        events,
        vec![Event::CellEditRejected {
            cell,
            reason: EditError::InvalidMode
        }]
    );
}

#[test]
fn ending_play_restores_the_pre_play_grid() {
    let original = looped_world();
    let grid_before = query::grid(&original).clone();
    let mut world = playing(original);
    let _ = place_wall(&mut world, CellCoord::new(0, 1), resting(&[CellCoord::new(2, 2)]));
    assert_ne!(query::grid(&world), &grid_before);

    let outcome = SessionOutcome::GoalReached {
        actor: ActorId::new(0),
        elapsed: std::time::Duration::from_secs(4),
    };
    let mut events = Vec::new();
    apply(&mut world, Command::EndPlay { outcome }, &mut events);

    assert_eq!(query::grid(&world), &grid_before);
    assert_eq!(query::play_mode(&world), PlayMode::Edit);
    assert_eq!(
        events,
        vec![
            Event::PlayEnded { outcome },
            Event::MazeSolved {
                fully_reachable: true
            },
            Event::PlayModeChanged {
                mode: PlayMode::Edit
            },
        ]
    );
    assert_eq!(
        query::heading(&world, CellCoord::new(0, 2)),
        Heading::Move(Direction::Left)
    );
}

#[test]
fn path_overlay_is_available_from_queries() {
    let world = looped_world();

    let overlay = query::path_overlay(&world).expect("overlay");

    assert_eq!(
        overlay.to_string(),
        "0010 0000 0000\n1010 0000 0000\n1100 0101 0001\n"
    );
}
