//! Gridsight demo entry point
//!
//! Scatters walls over a grid, plans a path across it, then runs one
//! collision pass with a handful of moving bodies and logs the results.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gridsight demo starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().unwrap_or_else(|| "gridsight.json".to_string());
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42u64);

    let settings = gridsight::EngineSettings::load_or_default(&settings_path);
    demo::run(&settings, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser surface; the library is used directly
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::{IVec2, Vec2};
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use gridsight::collision::{StaticLookup, dedup_records, slide_against};
    use gridsight::{
        Body, BodyHandle, EngineSettings, NavGrid, PathFollower, Shape, SpatialHashGrid, TileGrid,
        TileKind, find_path, has_line_of_sight, run_collision_pass,
    };

    const MAP_WIDTH: i32 = 24;
    const MAP_HEIGHT: i32 = 16;
    const WALL_CHANCE: f64 = 0.18;
    const SIM_DT: f32 = 1.0 / 60.0;
    const MOVER_SPEED: f32 = 180.0;

    pub fn run(settings: &EngineSettings, seed: u64) {
        let grid = scatter_walls(settings.grid_cell_size, seed);
        let start = IVec2::ZERO;
        let goal = IVec2::new(MAP_WIDTH - 1, MAP_HEIGHT - 1);

        let path = find_path(start, goal, &grid);
        if path.is_empty() {
            log::info!("No path from {} to {} (seed {})", start, goal, seed);
        } else {
            log::info!(
                "Path {} -> {}: {} cells, cost {:.2}",
                start,
                goal,
                path.len(),
                gridsight::nav::path_cost(&path)
            );
        }

        let visible = has_line_of_sight(grid.cell_to_world(start), grid.cell_to_world(goal), &grid);
        log::info!("Line of sight corner to corner: {}", visible);

        // Static collision geometry: one box per wall cell
        let half = Vec2::splat(grid.cell_size() / 2.0);
        let walls: Vec<Body> = grid
            .cells_of(TileKind::Wall)
            .enumerate()
            .map(|(i, cell)| Body::new(BodyHandle(i as u32), grid.cell_to_world(cell), Shape::rect(half)))
            .collect();
        let hash = SpatialHashGrid::build(&walls, grid.world_extents(), settings.hash_cell_size);
        log::info!(
            "Spatial hash: {} walls in {}x{} buckets",
            walls.len(),
            hash.width(),
            hash.height()
        );

        let movers = spawn_movers(&grid, walls.len() as u32, seed);
        let mut lookup = StaticLookup::new(&hash, &walls);
        if settings.swept_broad_phase {
            lookup = lookup.swept(SIM_DT);
        }
        let mut records = run_collision_pass(&movers, SIM_DT, |body| lookup.candidates(body));
        dedup_records(&mut records);
        log::info!("Collision pass: {} contacts", records.len());

        for record in &records {
            let mover = movers.iter().find(|m| m.handle == record.a);
            let wall = walls.iter().find(|w| w.handle == record.b);
            if let (Some(mover), Some(wall)) = (mover, wall) {
                let slid = slide_against(mover.position, mover.velocity, wall);
                log::debug!(
                    "{:?} hit wall {:?}: velocity {} -> {}",
                    mover.handle,
                    wall.handle,
                    mover.velocity,
                    slid
                );
            } else {
                log::debug!("{:?} touched {:?}", record.a, record.b);
            }
        }

        follow_path(&grid, settings, start, goal);
    }

    /// Random walls, keeping both map corners open
    fn scatter_walls(cell_size: f32, seed: u64) -> TileGrid {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut grid = TileGrid::new(MAP_WIDTH, MAP_HEIGHT, cell_size);
        for y in 0..MAP_HEIGHT {
            for x in 0..MAP_WIDTH {
                if rng.random_bool(WALL_CHANCE) {
                    grid.set_tile(IVec2::new(x, y), TileKind::Wall);
                }
            }
        }
        grid.set_tile(IVec2::ZERO, TileKind::Floor);
        grid.set_tile(IVec2::new(MAP_WIDTH - 1, MAP_HEIGHT - 1), TileKind::Floor);
        grid
    }

    /// A few circles on open cells with random headings
    fn spawn_movers(grid: &TileGrid, first_handle: u32, seed: u64) -> Vec<Body> {
        let mut rng = Pcg32::seed_from_u64(seed.wrapping_add(1));
        let open: Vec<IVec2> = grid.cells_of(TileKind::Floor).collect();
        if open.is_empty() {
            return Vec::new();
        }
        let radius = grid.cell_size() * 0.4;
        (0..8u32)
            .map(|i| {
                let cell = open[rng.random_range(0..open.len())];
                let heading = rng.random_range(0.0..std::f32::consts::TAU);
                let velocity = Vec2::from_angle(heading) * MOVER_SPEED;
                Body::new(BodyHandle(first_handle + i), grid.cell_to_world(cell), Shape::circle(radius))
                    .with_velocity(velocity)
            })
            .collect()
    }

    /// Walk a follower along the planned path until it arrives
    fn follow_path(grid: &TileGrid, settings: &EngineSettings, start: IVec2, goal: IVec2) {
        let mut follower = PathFollower::new(settings.waypoint_arrival_distance);
        if follower.needs_replan(goal, true) && !follower.replan(start, goal, grid) {
            log::info!("Follower: goal unreachable");
            return;
        }

        let mut position = grid.cell_to_world(start);
        let mut steps = 0u32;
        while !follower.is_finished() && steps < 10_000 {
            position += follower.steer(position, MOVER_SPEED, grid) * SIM_DT;
            steps += 1;
        }
        log::info!(
            "Follower: {} waypoints in {} ticks, ended at {}",
            follower.waypoints().len(),
            steps,
            position
        );
    }
}
