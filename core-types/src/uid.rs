// Copyright (c) James Kassemi, SC, US. All rights reserved.

//! 128-bit identifiers for staking orders.

use blake3::Hasher;
use time::OffsetDateTime;

use crate::types::{OrderId, OrderMode, Tier};

pub const UID_LEN: usize = 16;

struct UidBuilder {
    hasher: Hasher,
}

impl UidBuilder {
    fn new(domain: &[u8]) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(&(domain.len() as u32).to_le_bytes());
        hasher.update(domain);
        Self { hasher }
    }

    fn write_str(&mut self, value: &str) -> &mut Self {
        self.hasher.update(&(value.len() as u32).to_le_bytes());
        self.hasher.update(value.as_bytes());
        self
    }

    fn write_u64(&mut self, value: u64) -> &mut Self {
        self.hasher.update(&value.to_le_bytes());
        self
    }

    fn write_u32(&mut self, value: u32) -> &mut Self {
        self.hasher.update(&value.to_le_bytes());
        self
    }

    fn write_f64(&mut self, value: f64) -> &mut Self {
        self.hasher.update(&value.to_le_bytes());
        self
    }

    fn write_option<T>(
        &mut self,
        value: Option<T>,
        f: impl FnOnce(&mut Self, T) -> &mut Self,
    ) -> &mut Self {
        match value {
            Some(v) => {
                self.hasher.update(&[1]);
                f(self, v)
            }
            None => {
                self.hasher.update(&[0]);
                self
            }
        }
    }

    fn finish(self) -> OrderId {
        let hash = self.hasher.finalize();
        let hex = hash.to_hex();
        hex.as_str()[..UID_LEN * 2].to_string()
    }
}

/// Fields of a deposit request that feed into its id.
#[derive(Debug, Clone, Copy)]
pub struct OrderUidInput {
    pub amount: f64,
    pub mode: OrderMode,
    pub duration_days: Option<u32>,
    pub package_tier: Option<Tier>,
    pub start_day: u32,
}

/// Issues order ids from a seed and a monotonically increasing sequence.
///
/// Two generators with the same seed yield the same ids for the same requests.
#[derive(Debug, Clone)]
pub struct OrderIdGenerator {
    seed: u64,
    sequence: u64,
}

impl OrderIdGenerator {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, sequence: 0 }
    }

    /// Seeds from the wall clock.
    pub fn from_clock() -> Self {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        Self::with_seed(nanos as u64)
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn next_id(&mut self, input: &OrderUidInput) -> OrderId {
        self.sequence += 1;
        let mut builder = UidBuilder::new(b"staking_order_uid.v1");
        builder
            .write_u64(self.seed)
            .write_u64(self.sequence)
            .write_f64(input.amount)
            .write_str(input.mode.label())
            .write_option(input.duration_days, UidBuilder::write_u32)
            .write_option(input.package_tier, UidBuilder::write_u32)
            .write_u32(input.start_day);
        builder.finish()
    }
}
