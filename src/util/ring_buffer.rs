use std::fmt;

use log::{debug, trace};
use serde::Serialize;

use crate::error::{RingBufferError, RingResult};
use crate::util::human::{fmt_sample, fmt_samples, DEFAULT_PRECISION};

/// Fixed-capacity ring buffer of samples. Oldest entry is overwritten when full,
/// and a running sum of the retained samples is kept alongside.
///
/// Logical index 0 is the slot at `head`, i.e. the oldest sample once the
/// buffer has filled. After [`RingBuffer::destroy`] the storage is released and
/// every operation returns [`RingBufferError::Uninitialized`].
#[derive(Debug)]
pub struct RingBuffer {
    data: Option<Vec<f64>>,
    head: usize,
    len:  usize,
    cap:  usize,
    sum:  RunningSum,
    non_finite: usize,  // retained samples that are inf or NaN
}

/// Neumaier-compensated accumulator, so evicting a large sample does not take
/// the small retained ones with it.
#[derive(Debug, Clone, Copy, Default)]
struct RunningSum {
    sum:  f64,
    comp: f64,
}

impl RunningSum {
    fn over(vals: &[f64]) -> Self {
        let mut acc = Self::default();
        vals.iter().for_each(|v| acc.add(*v));
        acc
    }

    fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if !t.is_finite() {
            self.sum = t;
            self.comp = 0.0;
            return;
        }
        if self.sum.abs() >= x.abs() {
            self.comp += (self.sum - t) + x;
        } else {
            self.comp += (x - t) + self.sum;
        }
        self.sum = t;
    }

    fn total(&self) -> f64 {
        self.sum + self.comp
    }
}

/// Point-in-time copy of a buffer's bookkeeping and slots (physical order).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub capacity:  usize,
    pub head:      usize,
    pub occupancy: usize,
    pub sum:       f64,
    pub average:   Option<f64>,
    pub slots:     Vec<f64>,
}

impl RingBuffer {
    pub fn new(cap: usize) -> RingResult<Self> {
        if cap == 0 {
            return Err(RingBufferError::InvalidArgument(
                "capacity must be non-zero".to_string(),
            ));
        }
        let mut data = Vec::new();
        data.try_reserve_exact(cap)?;
        data.resize(cap, 0.0);
        debug!("created ring buffer with capacity {}", cap);
        Ok(Self {
            data: Some(data),
            head: 0,
            len:  0,
            cap,
            sum:  RunningSum::default(),
            non_finite: 0,
        })
    }

    fn slots(&self) -> RingResult<&[f64]> {
        self.data.as_deref().ok_or(RingBufferError::Uninitialized)
    }

    /// Push a sample. When full, the oldest sample (the one at `head`) is
    /// evicted from the sum and returned.
    ///
    /// The sum is updated in O(1) while every retained sample is finite. While
    /// an inf/NaN is retained, or when the evicted sample or the previous sum
    /// was not finite, it is recomputed from the slots instead.
    pub fn push(&mut self, val: f64) -> RingResult<Option<f64>> {
        let data = self.data.as_mut().ok_or(RingBufferError::Uninitialized)?;

        let evicted = if self.len == self.cap {
            let old = data[self.head];
            trace!("evicted {} from slot {}", old, self.head);
            Some(old)
        } else {
            self.len += 1;
            None
        };

        if !val.is_finite() {
            self.non_finite += 1;
        }
        let evicted_non_finite = evicted.is_some_and(|old| !old.is_finite());
        if evicted_non_finite {
            self.non_finite -= 1;
        }
        let resum = self.non_finite > 0 || evicted_non_finite || !self.sum.total().is_finite();

        data[self.head] = val;
        self.head = (self.head + 1) % self.cap;

        if resum {
            // unwritten slots hold zero, so summing every slot is exact
            self.sum = RunningSum::over(data);
        } else {
            if let Some(old) = evicted {
                self.sum.add(-old);
            }
            self.sum.add(val);
        }
        Ok(evicted)
    }

    /// Sample at logical `index`. The range is bounded by capacity, not
    /// occupancy: slots never written read back as zero.
    pub fn get(&self, index: usize) -> RingResult<f64> {
        let data = self.slots()?;
        if index >= self.cap {
            return Err(RingBufferError::InvalidArgument(format!(
                "index {} out of range for capacity {}",
                index, self.cap
            )));
        }
        Ok(data[(self.head + index) % self.cap])
    }

    pub fn sum(&self) -> RingResult<f64> {
        self.slots()?;
        Ok(self.sum.total())
    }

    /// Capacity of the buffer.
    pub fn size(&self) -> RingResult<usize> {
        self.slots()?;
        Ok(self.cap)
    }

    /// Slot the next push writes to.
    pub fn head_index(&self) -> RingResult<usize> {
        self.slots()?;
        Ok(self.head)
    }

    /// Number of retained samples.
    pub fn occupancy(&self) -> RingResult<usize> {
        self.slots()?;
        Ok(self.len)
    }

    pub fn is_full(&self) -> RingResult<bool> {
        self.slots()?;
        Ok(self.len == self.cap)
    }

    /// Mean of the retained samples; `None` while empty.
    pub fn average(&self) -> RingResult<Option<f64>> {
        self.slots()?;
        if self.len == 0 {
            return Ok(None);
        }
        Ok(Some(self.sum.total() / self.len as f64))
    }

    /// Returns up to `n` most-recent values, oldest first.
    pub fn last_n(&self, n: usize) -> RingResult<Vec<f64>> {
        let data = self.slots()?;
        let n = n.min(self.len);
        let mut out = Vec::with_capacity(n);
        for i in (0..n).rev() {
            let idx = (self.head + self.cap - 1 - i) % self.cap;
            out.push(data[idx]);
        }
        Ok(out)
    }

    /// All retained values, oldest first.
    pub fn values(&self) -> RingResult<Vec<f64>> {
        self.last_n(self.len)
    }

    /// Forget every sample but keep the storage.
    pub fn clear(&mut self) -> RingResult<()> {
        let data = self.data.as_mut().ok_or(RingBufferError::Uninitialized)?;
        data.iter_mut().for_each(|v| *v = 0.0);
        self.head = 0;
        self.len = 0;
        self.sum = RunningSum::default();
        self.non_finite = 0;
        debug!("cleared ring buffer with capacity {}", self.cap);
        Ok(())
    }

    pub fn snapshot(&self) -> RingResult<Snapshot> {
        let data = self.slots()?;
        Ok(Snapshot {
            capacity:  self.cap,
            head:      self.head,
            occupancy: self.len,
            sum:       self.sum.total(),
            average:   self.average()?,
            slots:     data.to_vec(),
        })
    }

    /// Head, sum and every physical slot, e.g.
    /// `Head: 1, Sum: 1.000000, Buffer: { 1.000000, 0.000000 }`.
    pub fn describe(&self) -> RingResult<String> {
        self.slots()?;
        Ok(self.to_string())
    }

    /// Release the storage. The buffer stays around as an empty shell that
    /// rejects every further operation, including a second `destroy`.
    pub fn destroy(&mut self) -> RingResult<()> {
        if self.data.take().is_none() {
            return Err(RingBufferError::Uninitialized);
        }
        debug!("destroyed ring buffer with capacity {}", self.cap);
        self.head = 0;
        self.len = 0;
        self.cap = 0;
        self.sum = RunningSum::default();
        self.non_finite = 0;
        Ok(())
    }

    pub fn is_destroyed(&self) -> bool {
        self.data.is_none()
    }
}

impl fmt::Display for RingBuffer {
    /// Honours a precision (`{:.2}`); six decimals otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(DEFAULT_PRECISION);
        match &self.data {
            Some(data) => write!(
                f,
                "Head: {}, Sum: {}, Buffer: {}",
                self.head,
                fmt_sample(self.sum.total(), prec),
                fmt_samples(data, prec)
            ),
            None => f.write_str("uninitialized ring buffer"),
        }
    }
}
