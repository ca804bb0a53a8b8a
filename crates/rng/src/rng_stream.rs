use serde::{Deserialize, Serialize};
use super::chacha20::ChaCha20Rng;

/// Named RNG role for stream isolation.
///
/// Each role gets its own isolated RNG stream so that enabling or
/// disabling one role's consumers (e.g. operational events) cannot
/// perturb any other role's output.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum RngSubsystem {
    /// Run-level batch biases (illumination, gain, operator/day/plate shifts).
    /// Sampled exactly once per run.
    Batch = 0,
    /// Rare discrete operational events (e.g. contamination), isolated so
    /// toggling them leaves biology byte-identical.
    OperationalEvents = 1,
    /// Growth, stress, and hazard stochasticity.
    Biology = 2,
    /// Measurement noise only; never advances biology.
    Assay = 3,
    /// Per-vessel treatment commitment-delay sampling.
    Treatment = 4,
}

impl RngSubsystem {
    /// Human-readable name for logging, audit records, and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            RngSubsystem::Batch => "rng_batch",
            RngSubsystem::OperationalEvents => "rng_operational_events",
            RngSubsystem::Biology => "rng_biology",
            RngSubsystem::Assay => "rng_assay",
            RngSubsystem::Treatment => "rng_treatment",
        }
    }
}

/// Isolated RNG stream for one role, optionally split per entity.
///
/// Each stream maintains its own ChaCha20 state and nonce, so that two
/// streams for different roles (or the same role split on different
/// `stream_id`s) are statistically independent.
#[derive(Debug, Clone, PartialEq)]
pub struct RngStream {
    subsystem: RngSubsystem,
    stream_id: u64,
    rng: ChaCha20Rng,
}

impl RngStream {
    /// Create a new stream for `subsystem`, split on `stream_id`.
    ///
    /// Nonce = `blake3(global_seed || subsystem_id || stream_id)[..12]`.
    /// Splitting is stable under reordering of unrelated work: the nonce
    /// depends only on the triple `(global_seed, subsystem, stream_id)`,
    /// never on call order.
    pub fn new(global_seed: [u8; 32], subsystem: RngSubsystem, stream_id: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        let _ = hasher.update(&global_seed);
        let _ = hasher.update(&(subsystem as u64).to_le_bytes());
        let _ = hasher.update(&stream_id.to_le_bytes());
        let nonce_bytes = hasher.finalize();

        let mut nonce = [0u8; 12];
        nonce.copy_from_slice(&nonce_bytes.as_bytes()[0..12]);

        Self {
            subsystem,
            stream_id,
            rng: ChaCha20Rng::new(global_seed, nonce),
        }
    }

    /// Derive a child stream keyed by an arbitrary byte string (e.g. a
    /// vessel id), for per-entity isolation within the same role.
    ///
    /// `stream_id' = blake3(subsystem || parent_stream_id || key)` folded
    /// into a u64, so splitting by vessel id is deterministic and does not
    /// depend on iteration order over the vessel map.
    pub fn split(&self, global_seed: [u8; 32], key: &[u8]) -> Self {
        let mut hasher = blake3::Hasher::new();
        let _ = hasher.update(&(self.subsystem as u64).to_le_bytes());
        let _ = hasher.update(&self.stream_id.to_le_bytes());
        let _ = hasher.update(key);
        let digest = hasher.finalize();
        let mut id_bytes = [0u8; 8];
        id_bytes.copy_from_slice(&digest.as_bytes()[0..8]);
        let child_id = u64::from_le_bytes(id_bytes);

        RngStream::new(global_seed, self.subsystem, child_id)
    }

    /// Generate the next 32-bit value from this stream.
    pub fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    /// Generate the next 64-bit value from this stream.
    pub fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    /// Generate the next value in `[0, 1)` from this stream.
    pub fn next_f64(&mut self) -> f64 {
        self.rng.next_f64()
    }

    /// Sample a standard-normal value via Box-Muller, consuming two draws.
    pub fn next_gaussian(&mut self) -> f64 {
        let u1 = self.next_f64().max(f64::MIN_POSITIVE);
        let u2 = self.next_f64();
        (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }

    /// Sample a lognormal value with the given underlying-normal mean/sigma.
    pub fn next_lognormal(&mut self, mu: f64, sigma: f64) -> f64 {
        (mu + sigma * self.next_gaussian()).exp()
    }

    /// Role this stream belongs to.
    pub fn subsystem(&self) -> RngSubsystem {
        self.subsystem
    }

    /// Split id within the role.
    pub fn stream_id(&self) -> u64 {
        self.stream_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_stream_determinism() {
        let seed = [42u8; 32];

        let mut stream1 = RngStream::new(seed, RngSubsystem::Biology, 0);
        let mut stream2 = RngStream::new(seed, RngSubsystem::Biology, 0);

        assert_eq!(stream1.next_u64(), stream2.next_u64());
        assert_eq!(stream1.next_u64(), stream2.next_u64());
    }

    #[test]
    fn test_different_subsystems_differ() {
        let seed = [42u8; 32];

        let mut biology = RngStream::new(seed, RngSubsystem::Biology, 0);
        let mut assay = RngStream::new(seed, RngSubsystem::Assay, 0);

        assert_ne!(biology.next_u64(), assay.next_u64());
    }

    #[test]
    fn test_different_stream_ids_differ() {
        let seed = [42u8; 32];

        let mut stream1 = RngStream::new(seed, RngSubsystem::Biology, 0);
        let mut stream2 = RngStream::new(seed, RngSubsystem::Biology, 1);

        assert_ne!(stream1.next_u64(), stream2.next_u64());
    }

    #[test]
    fn test_split_is_order_independent() {
        let seed = [7u8; 32];
        let parent = RngStream::new(seed, RngSubsystem::Biology, 0);

        let a1 = parent.split(seed, b"vessel-a");
        let b1 = parent.split(seed, b"vessel-b");
        // Splitting in reverse order must produce identical children.
        let b2 = parent.split(seed, b"vessel-b");
        let a2 = parent.split(seed, b"vessel-a");

        let mut a1 = a1;
        let mut a2 = a2;
        let mut b1 = b1;
        let mut b2 = b2;

        assert_eq!(a1.next_u64(), a2.next_u64());
        assert_eq!(b1.next_u64(), b2.next_u64());
    }
}
