use super::types::{GridResolution, Position};

pub fn to_index(position: Position, resolution: GridResolution) -> usize {
  position.z as usize * resolution.width as usize + position.x as usize
}

pub fn from_index(index: usize, resolution: GridResolution) -> Position {
  let width = resolution.width as usize;
  Position {
    x: (index % width) as i32,
    z: (index / width) as i32,
  }
}

pub fn wrap(position: Position, resolution: GridResolution) -> Position {
  Position {
    x: wrap_axis(position.x, resolution.width),
    z: wrap_axis(position.z, resolution.height),
  }
}

fn wrap_axis(value: i32, bound: i32) -> i32 {
  if value < 0 || value >= bound {
    value.rem_euclid(bound)
  } else {
    value
  }
}

pub fn dot(a: (i32, i32), b: (i32, i32)) -> i32 {
  a.0 * b.0 + a.1 * b.1
}
