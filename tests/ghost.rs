use common::OPEN_ROOM;
use glam::{IVec2, Vec2};
use jujutsu_pacman::constants::{CHASE_DURATION, GHOST_BASE_SPEED, SCATTER_DURATION};
use jujutsu_pacman::ghost::mode::{Countdown, GhostMode};
use jujutsu_pacman::ghost::movement::is_valid_position;
use jujutsu_pacman::ghost::personality::Personality;
use jujutsu_pacman::ghost::{level_speed, CollisionOutcome, Ghost};
use jujutsu_pacman::map::direction::Direction;
use jujutsu_pacman::map::Grid;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

#[test]
fn test_release_with_zero_timer_scatters_to_corner() {
    let state = common::state(&OPEN_ROOM);
    let mut rng = common::rng();
    let mut ghost = Ghost::new(Personality::Ambusher, &state.grid, state.house);
    ghost.set_release_ticks(0);

    ghost.update(&state, None, &mut rng);

    assert_eq!(ghost.mode(), GhostMode::Scatter);
    assert_eq!(ghost.scatter_tile(), IVec2::new(1, 1));
    assert_eq!(ghost.target(), ghost.scatter_tile());
    assert_eq!(ghost.scatter_countdown(), Countdown::ticks(SCATTER_DURATION));
}

#[test]
fn test_release_waits_for_delay() {
    let state = common::state(&OPEN_ROOM);
    let mut rng = common::rng();
    let mut ghost = Ghost::new(Personality::Ambusher, &state.grid, state.house);

    for _ in 0..Personality::Ambusher.release_delay() - 1 {
        ghost.update(&state, None, &mut rng);
        assert_eq!(ghost.mode(), GhostMode::InHouse);
        assert_eq!(ghost.target(), state.house.interior);
    }
    ghost.update(&state, None, &mut rng);

    assert_eq!(ghost.mode(), GhostMode::Scatter);
}

#[test]
fn test_direct_chaser_spawns_outside_house() {
    let state = common::state(&OPEN_ROOM);
    let chaser = Ghost::new(Personality::DirectChaser, &state.grid, state.house);
    let flanker = Ghost::new(Personality::Flanker, &state.grid, state.house);

    assert_eq!(chaser.tile(), state.house.exit);
    assert_eq!(flanker.tile(), state.house.interior);
    assert_eq!(chaser.mode(), GhostMode::InHouse);
}

#[test]
fn test_scatter_expiry_flips_to_chase() {
    let state = common::state(&OPEN_ROOM);
    let mut rng = common::rng();
    let mut ghost = common::ghost_at(&state, Personality::DirectChaser, IVec2::new(5, 3), GhostMode::Scatter, Countdown::ticks(1));

    ghost.update(&state, None, &mut rng);

    assert_eq!(ghost.mode(), GhostMode::Chase);
    assert_eq!(ghost.chase_countdown(), Countdown::ticks(CHASE_DURATION));
    assert_eq!(ghost.target(), state.player_tile());
}

#[test]
fn test_chase_expiry_flips_to_scatter() {
    let state = common::state(&OPEN_ROOM);
    let mut rng = common::rng();
    let mut ghost = common::ghost_at(&state, Personality::Flanker, IVec2::new(5, 3), GhostMode::Chase, Countdown::ticks(1));

    ghost.update(&state, None, &mut rng);

    assert_eq!(ghost.mode(), GhostMode::Scatter);
    assert_eq!(ghost.scatter_countdown(), Countdown::ticks(SCATTER_DURATION));
    assert_eq!(ghost.target(), IVec2::new(9, 7));
}

#[test]
fn test_indefinite_chase_never_flips() {
    let state = common::state(&OPEN_ROOM);
    let mut rng = common::rng();
    let mut ghost = common::ghost_at(&state, Personality::Ambusher, IVec2::new(5, 3), GhostMode::Chase, Countdown::Indefinite);

    for _ in 0..2000 {
        ghost.update(&state, None, &mut rng);
    }

    assert_eq!(ghost.mode(), GhostMode::Chase);
}

#[test]
fn test_set_frightened_reverses_and_slows() {
    let state = common::state(&OPEN_ROOM);
    let mut ghost = common::ghost_at(&state, Personality::Ambusher, IVec2::new(5, 3), GhostMode::Chase, Countdown::ticks(100));
    let before = ghost.direction();

    ghost.set_frightened(600);

    assert_eq!(ghost.mode(), GhostMode::Frightened);
    assert_eq!(ghost.direction(), before.opposite());
    assert_that(&close(ghost.speed(), GHOST_BASE_SPEED * 0.5)).is_true();
    assert_that(&ghost.can_be_eaten()).is_true();
}

#[test]
fn test_set_frightened_ignores_house_and_dead() {
    let mut state = common::state(&OPEN_ROOM);
    let mut in_house = Ghost::new(Personality::Flanker, &state.grid, state.house);
    in_house.set_frightened(600);
    assert_eq!(in_house.mode(), GhostMode::InHouse);

    let tile = IVec2::new(3, 3);
    common::place_player(&mut state, tile);
    let mut dead = common::ghost_at(&state, Personality::Flanker, tile, GhostMode::Frightened, Countdown::ticks(600));
    assert_eq!(dead.collide_with_player(state.player_position), CollisionOutcome::GhostEaten);
    dead.set_frightened(600);
    assert_eq!(dead.mode(), GhostMode::Dead);
}

#[test]
fn test_edible_window_closes_before_fright_ends() {
    let state = common::state(&OPEN_ROOM);
    let mut rng = common::rng();
    let mut ghost = common::ghost_at(&state, Personality::Ambusher, IVec2::new(5, 3), GhostMode::Chase, Countdown::Indefinite);
    ghost.set_frightened(61);
    assert_that(&ghost.can_be_eaten()).is_true();

    ghost.update(&state, None, &mut rng);

    assert_eq!(ghost.mode(), GhostMode::Frightened);
    assert_that(&ghost.can_be_eaten()).is_false();
}

#[test]
fn test_fright_expiry_returns_to_scatter_at_normal_speed() {
    let state = common::state(&OPEN_ROOM);
    let mut rng = common::rng();
    let mut ghost = common::ghost_at(&state, Personality::Ambusher, IVec2::new(5, 3), GhostMode::Chase, Countdown::Indefinite);
    ghost.set_frightened(1);

    ghost.update(&state, None, &mut rng);

    assert_eq!(ghost.mode(), GhostMode::Scatter);
    assert_that(&close(ghost.speed(), GHOST_BASE_SPEED)).is_true();
}

#[test]
fn test_collision_outcomes() {
    let mut state = common::state(&OPEN_ROOM);
    let tile = IVec2::new(3, 3);
    common::place_player(&mut state, tile);
    let player = state.player_position;

    let mut chasing = common::ghost_at(&state, Personality::DirectChaser, tile, GhostMode::Chase, Countdown::Indefinite);
    assert_eq!(chasing.collide_with_player(player), CollisionOutcome::PlayerCaught);
    assert_eq!(chasing.mode(), GhostMode::Chase);

    let mut scattering = common::ghost_at(&state, Personality::DirectChaser, tile, GhostMode::Scatter, Countdown::Indefinite);
    assert_eq!(scattering.collide_with_player(player), CollisionOutcome::PlayerCaught);

    let mut frightened = common::ghost_at(&state, Personality::Ambusher, tile, GhostMode::Chase, Countdown::Indefinite);
    frightened.set_frightened(600);
    assert_eq!(frightened.collide_with_player(player), CollisionOutcome::GhostEaten);
    assert_eq!(frightened.mode(), GhostMode::Dead);
    assert_that(&frightened.visible()).is_false();
    assert_that(&close(frightened.speed(), GHOST_BASE_SPEED * 2.0)).is_true();

    let mut warning = common::ghost_at(&state, Personality::Ambusher, tile, GhostMode::Chase, Countdown::Indefinite);
    warning.set_frightened(30);
    assert_eq!(warning.collide_with_player(player), CollisionOutcome::None);
    assert_eq!(warning.mode(), GhostMode::Frightened);

    let mut in_house = Ghost::new(Personality::Flanker, &state.grid, state.house);
    in_house.set_position(player);
    assert_eq!(in_house.collide_with_player(player), CollisionOutcome::None);
}

#[test]
fn test_collision_threshold_is_strict() {
    let state = common::state(&OPEN_ROOM);
    let player = Vec2::new(48.0, 48.0);

    let mut touching = common::ghost_at(&state, Personality::DirectChaser, IVec2::new(3, 3), GhostMode::Chase, Countdown::Indefinite);
    touching.set_position(player + Vec2::new(16.0, 0.0));
    assert_eq!(touching.collide_with_player(player), CollisionOutcome::None);

    touching.set_position(player + Vec2::new(15.5, 0.0));
    assert_eq!(touching.collide_with_player(player), CollisionOutcome::PlayerCaught);
}

#[test]
fn test_dead_ghost_returns_home_and_respawns() {
    let mut state = common::state(&OPEN_ROOM);
    let mut rng = common::rng();
    let tile = IVec2::new(5, 2);
    common::place_player(&mut state, tile);
    let mut ghost = common::ghost_at(&state, Personality::Ambusher, tile, GhostMode::Chase, Countdown::Indefinite);
    ghost.set_frightened(600);
    assert_eq!(ghost.collide_with_player(state.player_position), CollisionOutcome::GhostEaten);

    common::place_player(&mut state, IVec2::new(1, 1));
    let mut ticks = 0;
    while ghost.mode() == GhostMode::Dead && ticks < 300 {
        ghost.update(&state, None, &mut rng);
        ticks += 1;
    }

    assert_eq!(ghost.mode(), GhostMode::Scatter);
    assert_that(&ghost.visible()).is_true();
    assert_that(&close(ghost.speed(), GHOST_BASE_SPEED)).is_true();
    assert_that(&ticks).is_less_than(300);
}

#[test]
fn test_global_fright_flag_frightens_once_per_window() {
    let mut state = common::state(&OPEN_ROOM);
    let mut rng = common::rng();
    let mut ghost = common::ghost_at(&state, Personality::Ambusher, IVec2::new(5, 3), GhostMode::Chase, Countdown::Indefinite);

    state.fright_active = true;
    state.fright_remaining = Countdown::ticks(250);
    ghost.update(&state, None, &mut rng);
    assert_eq!(ghost.mode(), GhostMode::Frightened);
    assert_eq!(ghost.fright_countdown(), Countdown::ticks(250));

    ghost.force_mode(GhostMode::Scatter, Countdown::ticks(SCATTER_DURATION));
    ghost.update(&state, None, &mut rng);
    assert_eq!(ghost.mode(), GhostMode::Scatter);

    state.fright_active = false;
    ghost.update(&state, None, &mut rng);
    state.fright_active = true;
    ghost.update(&state, None, &mut rng);
    assert_eq!(ghost.mode(), GhostMode::Frightened);
}

#[test]
fn test_fright_shortened_at_higher_levels() {
    let mut state = common::state(&OPEN_ROOM);
    state.level = 17;
    let mut rng = common::rng();
    let mut ghost = common::ghost_at(&state, Personality::Ambusher, IVec2::new(5, 3), GhostMode::Chase, Countdown::Indefinite);
    ghost.set_frightened(600);

    ghost.update(&state, None, &mut rng);

    assert_eq!(ghost.fright_countdown().remaining(), Some(120));
}

#[test]
fn test_speed_scales_with_level_and_elroy() {
    let mut state = common::state(&OPEN_ROOM);
    let mut rng = common::rng();
    state.level = 3;
    let mut ambusher = common::ghost_at(&state, Personality::Ambusher, IVec2::new(5, 3), GhostMode::Chase, Countdown::Indefinite);
    ambusher.update(&state, None, &mut rng);
    assert_that(&close(ambusher.speed(), level_speed(3))).is_true();

    state.level = 1;
    state.dots_remaining = 5;
    let mut chaser = common::ghost_at(&state, Personality::DirectChaser, IVec2::new(5, 3), GhostMode::Chase, Countdown::Indefinite);
    chaser.update(&state, None, &mut rng);
    assert_that(&close(chaser.speed(), GHOST_BASE_SPEED * 1.1)).is_true();

    state.dots_remaining = 15;
    chaser.update(&state, None, &mut rng);
    assert_that(&close(chaser.speed(), GHOST_BASE_SPEED * 1.05)).is_true();
}

#[test]
fn test_chaser_catches_stationary_player() {
    let state = common::state(&OPEN_ROOM);
    let mut rng = common::rng();
    let mut ghost = common::ghost_at(&state, Personality::DirectChaser, IVec2::new(9, 5), GhostMode::Chase, Countdown::Indefinite);

    let mut caught = false;
    for _ in 0..400 {
        ghost.update(&state, None, &mut rng);
        assert_that(&is_valid_position(&state.grid, ghost.position(), ghost.size())).is_true();
        if ghost.collide_with_player(state.player_position) == CollisionOutcome::PlayerCaught {
            caught = true;
            break;
        }
    }

    assert_that(&caught).is_true();
}

#[test]
fn test_path_ends_at_target() {
    let state = common::state(&OPEN_ROOM);
    let mut rng = common::rng();
    let mut ghost = common::ghost_at(&state, Personality::DirectChaser, IVec2::new(9, 5), GhostMode::Chase, Countdown::Indefinite);

    ghost.update(&state, None, &mut rng);

    assert_eq!(ghost.path().last(), Some(&ghost.target()));
    assert_eq!(ghost.path().first(), Some(&IVec2::new(9, 5)));
}

#[test]
fn test_unreachable_target_keeps_ghost_on_walkable_tiles() {
    let state = common::state(&["#######", "#P   ##", "#######", "#E H  #", "#######"]);
    let mut rng = common::rng();
    let mut ghost = Ghost::new(Personality::DirectChaser, &state.grid, state.house);

    let mut tiles = std::collections::HashSet::new();
    for _ in 0..600 {
        ghost.update(&state, None, &mut rng);
        assert_that(&is_valid_position(&state.grid, ghost.position(), ghost.size())).is_true();
        tiles.insert(ghost.tile());
    }

    assert_that(&tiles.len()).is_greater_than(1);
    assert_that(&tiles.iter().all(|tile| tile.y == 3)).is_true();
}

#[test]
fn test_stuck_ghost_takes_a_detour() {
    let state = common::state(&["#########", "#P#  E H#", "#########"]);
    let mut rng = common::rng();
    let mut ghost = common::ghost_at(&state, Personality::DirectChaser, IVec2::new(3, 1), GhostMode::Chase, Countdown::Indefinite);

    let mut ticks = 0;
    while ghost.path().is_empty() && ticks < 200 {
        ghost.update(&state, None, &mut rng);
        ticks += 1;
        assert_eq!(ghost.tile(), IVec2::new(3, 1));
    }

    assert_eq!(ticks, ghost.stuck_threshold() + 1);
    assert_eq!(ghost.path(), &[IVec2::new(3, 1), IVec2::new(4, 1)]);

    let mut moved = false;
    for _ in 0..40 {
        ghost.update(&state, None, &mut rng);
        if ghost.tile() == IVec2::new(4, 1) {
            moved = true;
            break;
        }
    }
    assert_that(&moved).is_true();
}

#[test]
fn test_reverse_direction() {
    let state = common::state(&OPEN_ROOM);
    let mut ghost = Ghost::new(Personality::Ambusher, &state.grid, state.house);
    assert_eq!(ghost.direction(), Direction::Up);

    ghost.reverse_direction();

    assert_eq!(ghost.direction(), Direction::Down);
}

#[test]
fn test_reset_restores_spawn() {
    let state = common::state(&OPEN_ROOM);
    let mut rng = common::rng();
    let mut ghost = common::ghost_at(&state, Personality::Flanker, IVec2::new(2, 2), GhostMode::Chase, Countdown::Indefinite);
    ghost.set_frightened(600);
    ghost.update(&state, None, &mut rng);

    ghost.reset();

    assert_eq!(ghost.mode(), GhostMode::InHouse);
    assert_eq!(ghost.position(), Grid::tile_origin(state.house.interior));
    assert_eq!(ghost.release_countdown(), Countdown::ticks(Personality::Flanker.release_delay()));
    assert_that(&ghost.visible()).is_true();
    assert_that(&ghost.path().is_empty()).is_true();
}
