pub const GRID_WIDTH: i32 = 20;
pub const GRID_HEIGHT: i32 = 20;
pub const TICK_MS: u64 = 150;
pub const MIN_TICK_MS: u64 = 10;
pub const MAX_TICK_MS: u64 = 5000;
pub const MAX_GRID_CELLS: usize = 1 << 20;
pub const STARTING_LENGTH: usize = 4;
pub const FOOD_COUNT: usize = 1;
pub const OBSTACLE_COUNT: usize = 12;
pub const MAX_SPAWN_ATTEMPTS: usize = 64;
