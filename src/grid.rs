use std::collections::HashMap;

use glam::Vec2;

use crate::particle::Particle;

pub type Cell = (i32, i32);

/// Uniform grid bucketing particle indices by cell.
///
/// The grid is a derived cache: it is rebuilt from scratch every frame and
/// never holds empty buckets.
#[derive(Debug, Default)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<Cell, Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn set_cell_size(&mut self, cell_size: f32) {
        self.cell_size = cell_size;
        self.cells.clear();
    }

    pub fn cell_of(&self, position: Vec2) -> Cell {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.y / self.cell_size).floor() as i32,
        )
    }

    pub fn rebuild(&mut self, particles: &mut [Particle]) {
        self.cells.clear();

        for (i, particle) in particles.iter_mut().enumerate() {
            let cell = self.cell_of(particle.position);
            particle.cell = Some(cell);
            self.cells.entry(cell).or_default().push(i);
        }
    }

    pub fn bucket(&self, cell: Cell) -> &[usize] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Indices in the 3x3 block of cells centred on `cell`
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = usize> + '_ {
        let (cx, cy) = cell;
        (-1..=1)
            .flat_map(move |dx| (-1..=1).map(move |dy| (cx + dx, cy + dy)))
            .flat_map(move |c| self.bucket(c).iter().copied())
    }

    #[cfg(test)]
    pub fn bucket_count(&self) -> usize {
        self.cells.len()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }
}
