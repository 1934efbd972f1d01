// Reproducible random number streams for Monte Carlo sampling.
//
// A PCG generator on top of a 64-bit LCG: every particle gets one seed per
// stream, derived from the master seed by skipping ahead a fixed stride per
// particle id, so histories are reproducible independently of run order.

use rand::{RngCore, SeedableRng};

/// LCG multiplier
const PRN_MULT: u64 = 6364136223846793005;
/// LCG additive constant
const PRN_ADD: u64 = 1442695040888963407;
/// Number of LCG steps reserved for each particle history
pub const PRN_STRIDE: u64 = 152917;
/// Master seed used when none is configured
pub const DEFAULT_SEED: u64 = 1;

/// Number of independent streams carried by each particle.
pub const N_STREAMS: usize = 4;

/// Identifier of an independent random number stream.
///
/// Separate physical quantities draw from separate streams so that changing
/// how one is sampled does not shift the variates seen by the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Tracking = 0,
    Source = 1,
    UrrPtable = 2,
    Volume = 3,
}

impl Stream {
    pub const ALL: [Stream; N_STREAMS] = [
        Stream::Tracking,
        Stream::Source,
        Stream::UrrPtable,
        Stream::Volume,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[inline(always)]
fn permute(state: u64) -> u64 {
    // RXS-M-XS output permutation
    let word = ((state >> ((state >> 59) + 5)) ^ state).wrapping_mul(12605985483714917081);
    (word >> 43) ^ word
}

/// Advance `seed` one step and return a pseudo-random number in [0, 1).
///
/// Uses the top 53 bits of the output, the same conversion `rand` applies
/// for `gen::<f64>()`, so `prn` and samplers drawing through `Rng` agree.
#[inline(always)]
pub fn prn(seed: &mut u64) -> f64 {
    *seed = PRN_MULT.wrapping_mul(*seed).wrapping_add(PRN_ADD);
    // 2^-53; scaling all 64 bits by 2^-64 could round up to 1.0
    ((permute(*seed) >> 11) as f64) * 1.1102230246251565e-16
}

/// Seed obtained by advancing the LCG `n` steps from `seed`, in O(log n).
pub fn future_seed(mut n: u64, seed: u64) -> u64 {
    let mut g = PRN_MULT;
    let mut c = PRN_ADD;
    let mut g_new: u64 = 1;
    let mut c_new: u64 = 0;

    while n > 0 {
        if n & 1 == 1 {
            g_new = g_new.wrapping_mul(g);
            c_new = c_new.wrapping_mul(g).wrapping_add(c);
        }
        c = c.wrapping_mul(g.wrapping_add(1));
        g = g.wrapping_mul(g);
        n >>= 1;
    }

    g_new.wrapping_mul(seed).wrapping_add(c_new)
}

/// Starting seed for history `id` on the stream at `offset`.
pub fn init_seed(id: u64, offset: u64, master_seed: u64) -> u64 {
    future_seed(id.wrapping_mul(PRN_STRIDE), master_seed.wrapping_add(offset))
}

/// Single-stream PCG-LCG generator.
///
/// Holds nothing but the 64-bit LCG state, so copying it snapshots the
/// stream and comparing two of them compares stream state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FastRng {
    seed: u64,
}

impl FastRng {
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Generate a random f64 in [0, 1)
    #[inline(always)]
    pub fn random(&mut self) -> f64 {
        prn(&mut self.seed)
    }

    #[inline]
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Skip `n` variates ahead without generating them.
    pub fn advance(&mut self, n: u64) {
        self.seed = future_seed(n, self.seed);
    }
}

impl SeedableRng for FastRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self {
            seed: u64::from_le_bytes(seed),
        }
    }

    fn seed_from_u64(seed: u64) -> Self {
        Self::new(seed)
    }
}

impl RngCore for FastRng {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.seed = PRN_MULT.wrapping_mul(self.seed).wrapping_add(PRN_ADD);
        permute(self.seed)
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// The full set of stream generators owned by one particle history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParticleSeeds {
    streams: [FastRng; N_STREAMS],
}

impl ParticleSeeds {
    /// Seeds for history `id`, one independent stream per [`Stream`].
    pub fn new(id: u64, master_seed: u64) -> Self {
        let mut streams = [FastRng::new(0); N_STREAMS];
        for stream in Stream::ALL {
            streams[stream.index()] =
                FastRng::new(init_seed(id, stream.index() as u64, master_seed));
        }
        Self { streams }
    }

    /// Exclusive access to one stream's generator.
    pub fn stream(&mut self, stream: Stream) -> &mut FastRng {
        &mut self.streams[stream.index()]
    }

    pub fn seed(&self, stream: Stream) -> u64 {
        self.streams[stream.index()].seed()
    }
}
