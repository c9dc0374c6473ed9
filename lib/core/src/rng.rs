/// Mulberry32: a 32-bit seeded generator with a bit-exact, portable output stream.
///
/// Centroid initialization draws from this, so identical seeds and input order
/// always yield identical clusters.
#[derive(Clone, Copy, Debug)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next float in [0, 1)
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Index in [0, end), as `floor(next_f64() * end)`
    #[inline]
    pub fn gen_index(&mut self, end: usize) -> usize {
        (self.next_f64() * end as f64) as usize
    }
}
