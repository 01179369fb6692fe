//! RNG module - deterministic random source
//!
//! A small LCG shared by everything that needs randomness. Replaying the same seed and
//! the same sequence of calls reproduces the same boards.

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits: the low bits of a power-of-two LCG have short periods.
        (self.next_u32() >> 8) % max
    }

    /// Uniform value in [0, 1)
    pub fn next_unit(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Current RNG state (for restarting with the same sequence)
    pub fn state(&self) -> u32 {
        self.state
    }
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new(1)
    }
}
