use glam::Vec3;

/// Position for slots that have never been written
///
/// Sits behind the camera so unfilled slots are clipped rather than drawn at
/// the origin.
pub const TRAIL_SENTINEL: Vec3 = Vec3::new(0.0, 0.0, 10_000.0);

/// Fixed-capacity history of pointer positions, newest first
///
/// Backed by a circular index: `push` is O(1) and logical slot 0 is always
/// the most recent sample.
#[derive(Debug, Clone)]
pub struct PointerTrail {
    slots: Vec<Vec3>,
    head: usize,
}

impl PointerTrail {
    /// Create a trail with `capacity` sentinel slots (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: vec![TRAIL_SENTINEL; capacity],
            head: 0,
        }
    }

    /// Record a new sample; the oldest one falls off the tail
    pub fn push(&mut self, position: Vec3) {
        self.head = (self.head + self.slots.len() - 1) % self.slots.len();
        self.slots[self.head] = position;
    }

    /// Sample at logical slot `index` (0 = newest)
    pub fn get(&self, index: usize) -> Option<Vec3> {
        (index < self.slots.len()).then(|| self.slots[(self.head + index) % self.slots.len()])
    }

    /// Most recent sample
    pub fn head(&self) -> Vec3 {
        self.slots[self.head]
    }

    /// Samples ordered newest to oldest
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Vec3> + '_ {
        let len = self.slots.len();
        (0..len).map(move |i| self.slots[(self.head + i) % len])
    }

    /// Always equal to the capacity
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_trail_is_all_sentinel() {
        let trail = PointerTrail::new(8);
        assert_eq!(trail.len(), 8);
        assert!(trail.iter().all(|p| p == TRAIL_SENTINEL));
    }

    #[test]
    fn push_puts_newest_first() {
        let mut trail = PointerTrail::new(3);
        trail.push(Vec3::X);
        trail.push(Vec3::Y);

        assert_eq!(trail.get(0), Some(Vec3::Y));
        assert_eq!(trail.get(1), Some(Vec3::X));
        assert_eq!(trail.get(2), Some(TRAIL_SENTINEL));
        assert_eq!(trail.get(3), None);
    }

    #[test]
    fn oldest_sample_is_dropped() {
        let mut trail = PointerTrail::new(2);
        trail.push(Vec3::X);
        trail.push(Vec3::Y);
        trail.push(Vec3::Z);

        let samples: Vec<_> = trail.iter().collect();
        assert_eq!(samples, vec![Vec3::Z, Vec3::Y]);
    }

    #[test]
    fn length_never_changes() {
        let mut trail = PointerTrail::new(5);
        for i in 0..23 {
            trail.push(Vec3::splat(i as f32));
            assert_eq!(trail.len(), 5);
            assert_eq!(trail.iter().len(), 5);
        }
        assert_eq!(trail.head(), Vec3::splat(22.0));
        assert_eq!(trail.get(4), Some(Vec3::splat(18.0)));
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut trail = PointerTrail::new(0);
        trail.push(Vec3::ONE);
        assert_eq!(trail.capacity(), 1);
        assert_eq!(trail.head(), Vec3::ONE);
    }
}
