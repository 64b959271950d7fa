//! Test doubles shared by the unit tests

use boombarge_hal::OutputPin;
use rand_core::RngCore;

/// Output pin that records every level it was driven to
#[derive(Debug, Default)]
pub struct MockPin {
    pub writes: Vec<bool>,
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.writes.push(true);
    }

    fn set_low(&mut self) {
        self.writes.push(false);
    }

    fn is_set_high(&self) -> bool {
        self.writes.last().copied().unwrap_or(false)
    }
}

/// Rng that cycles through a fixed list of values
pub struct ScriptedRng {
    values: Vec<u32>,
    next: usize,
}

impl ScriptedRng {
    pub fn new(values: &[u32]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        let v = self.values[self.next % self.values.len()];
        self.next += 1;
        v
    }

    fn next_u64(&mut self) -> u64 {
        self.next_u32() as u64
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for b in dest {
            *b = self.next_u32() as u8;
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
