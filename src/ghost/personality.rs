//! Per-personality targeting.
//!
//! [`select_target`] is a pure function of the ghost's personality, its mode and a snapshot
//! of the surroundings; the only other input is the random source used while frightened.

use glam::IVec2;
use rand::seq::IndexedRandom;
use rand::Rng;
use smallvec::SmallVec;
use strum_macros::{AsRefStr, Display};

use crate::constants::{AMBUSH_LOOKAHEAD, FLANK_PIVOT_LOOKAHEAD, SHY_DISTANCE};
use crate::ghost::mode::GhostMode;
use crate::map::direction::Direction;
use crate::map::grid::Grid;
use crate::map::parser::HouseLayout;

/// The four ghost personalities, named after the cursed spirits that play them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display)]
pub enum Personality {
    /// Heads straight for the player.
    #[strum(serialize = "jogo")]
    DirectChaser,
    /// Aims a few tiles ahead of the player.
    #[strum(serialize = "sukuna")]
    Ambusher,
    /// Reflects the direct chaser through a point ahead of the player.
    #[strum(serialize = "kenjaku")]
    Flanker,
    /// Chases from afar, retreats up close.
    #[strum(serialize = "mahito")]
    DistanceBased,
}

/// Which corner of the grid a ghost retreats to while scattering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// The corner tile itself, which may be a wall.
    pub fn tile(self, grid: &Grid) -> IVec2 {
        let max = IVec2::new(grid.cols() as i32 - 1, grid.rows() as i32 - 1);
        match self {
            Corner::TopLeft => IVec2::ZERO,
            Corner::TopRight => IVec2::new(max.x, 0),
            Corner::BottomLeft => IVec2::new(0, max.y),
            Corner::BottomRight => max,
        }
    }
}

impl Personality {
    pub const ALL: [Personality; 4] = [
        Personality::DirectChaser,
        Personality::Ambusher,
        Personality::Flanker,
        Personality::DistanceBased,
    ];

    pub const fn corner(self) -> Corner {
        match self {
            Personality::DirectChaser => Corner::TopRight,
            Personality::Ambusher => Corner::TopLeft,
            Personality::Flanker => Corner::BottomRight,
            Personality::DistanceBased => Corner::BottomLeft,
        }
    }

    /// Ticks spent in the house before the first release.
    pub const fn release_delay(self) -> u32 {
        match self {
            Personality::DirectChaser => 0,
            Personality::Ambusher => 300,
            Personality::Flanker => 600,
            Personality::DistanceBased => 900,
        }
    }

    /// The walkable tile nearest this personality's corner.
    pub fn scatter_tile(self, grid: &Grid) -> IVec2 {
        let corner = self.corner().tile(grid);
        grid.nearest_walkable(corner).unwrap_or(corner)
    }
}

/// Everything target selection needs to know about the world for one ghost.
#[derive(Debug, Clone, Copy)]
pub struct TargetContext<'a> {
    pub grid: &'a Grid,
    pub house: HouseLayout,
    pub player_tile: IVec2,
    pub player_direction: Direction,
    pub ghost_tile: IVec2,
    pub scatter_tile: IVec2,
    /// The direct chaser's tile, used by the flanker.
    pub partner: Option<IVec2>,
    pub current_target: IVec2,
    /// Whether an in-house ghost is still waiting for release.
    pub release_pending: bool,
}

/// Chooses the tile a ghost should head for.
///
/// Frightened and Dead override the personality; in-house ghosts only ever target the house.
pub fn select_target<R: Rng + ?Sized>(personality: Personality, mode: GhostMode, ctx: &TargetContext<'_>, rng: &mut R) -> IVec2 {
    match mode {
        GhostMode::InHouse if ctx.release_pending => ctx.house.interior,
        GhostMode::InHouse => ctx.house.exit,
        GhostMode::Dead => ctx.house.interior,
        GhostMode::Scatter => ctx.scatter_tile,
        GhostMode::Frightened => frightened_target(ctx, rng),
        GhostMode::Chase => chase_target(personality, ctx),
    }
}

fn chase_target(personality: Personality, ctx: &TargetContext<'_>) -> IVec2 {
    let facing = ctx.player_direction.as_ivec2();
    match personality {
        Personality::DirectChaser => ctx.player_tile,
        Personality::Ambusher => ctx.player_tile + facing * AMBUSH_LOOKAHEAD,
        Personality::Flanker => {
            let pivot = ctx.player_tile + facing * FLANK_PIVOT_LOOKAHEAD;
            match ctx.partner {
                Some(partner) => pivot + (pivot - partner),
                None => pivot,
            }
        }
        Personality::DistanceBased => {
            if ctx.ghost_tile.as_vec2().distance(ctx.player_tile.as_vec2()) > SHY_DISTANCE {
                ctx.player_tile
            } else {
                ctx.scatter_tile
            }
        }
    }
}

/// Picks a walkable neighbor at random, weighted towards those farther from the player.
fn frightened_target<R: Rng + ?Sized>(ctx: &TargetContext<'_>, rng: &mut R) -> IVec2 {
    let candidates: SmallVec<[IVec2; 4]> = ctx.grid.neighbors(ctx.ghost_tile).collect();
    let weight = |tile: &IVec2| tile.as_vec2().distance(ctx.player_tile.as_vec2()).floor() as u32 + 1;

    candidates
        .choose_weighted(rng, weight)
        .copied()
        .unwrap_or(ctx.current_target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        let names: Vec<String> = Personality::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["jogo", "sukuna", "kenjaku", "mahito"]);
    }

    #[test]
    fn test_release_delays_increase() {
        let delays: Vec<u32> = Personality::ALL.iter().map(|p| p.release_delay()).collect();
        assert_eq!(delays, vec![0, 300, 600, 900]);
    }
}
