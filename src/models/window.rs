use serde::Serialize;

use crate::error::RingResult;
use crate::util::ring_buffer::RingBuffer;

/// Buffer state right after one sample was pushed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowStep {
    pub step:      usize,        // 1-based push counter
    pub value:     f64,
    pub head:      usize,
    pub occupancy: usize,
    pub sum:       f64,
    pub average:   Option<f64>,
    pub evicted:   Option<f64>,
}

/// Push every value in order, recording the buffer after each push.
pub fn run_window<I>(buf: &mut RingBuffer, values: I) -> RingResult<Vec<WindowStep>>
where
    I: IntoIterator<Item = f64>,
{
    let mut steps = Vec::new();
    for (i, value) in values.into_iter().enumerate() {
        let evicted = buf.push(value)?;
        steps.push(WindowStep {
            step:      i + 1,
            value,
            head:      buf.head_index()?,
            occupancy: buf.occupancy()?,
            sum:       buf.sum()?,
            average:   buf.average()?,
            evicted,
        });
    }
    Ok(steps)
}

/// Number of steps that pushed a sample out of the window.
pub fn evictions(steps: &[WindowStep]) -> usize {
    steps.iter().filter(|s| s.evicted.is_some()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RingBufferError;

    #[test]
    fn records_every_push() {
        let mut buf = RingBuffer::new(5).unwrap();
        let steps = run_window(&mut buf, (1..=7).map(|v| v as f64)).unwrap();
        assert_eq!(steps.len(), 7);

        let sums: Vec<f64> = steps.iter().map(|s| s.sum).collect();
        assert_eq!(sums, vec![1.0, 3.0, 6.0, 10.0, 15.0, 20.0, 25.0]);

        let last = steps.last().unwrap();
        assert_eq!(last.step, 7);
        assert_eq!(last.head, 2);
        assert_eq!(last.occupancy, 5);
        assert_eq!(last.average, Some(5.0));
        assert_eq!(last.evicted, Some(2.0));
        assert_eq!(evictions(&steps), 2);
    }

    #[test]
    fn empty_input_records_nothing() {
        let mut buf = RingBuffer::new(2).unwrap();
        let steps = run_window(&mut buf, Vec::new()).unwrap();
        assert!(steps.is_empty());
        assert_eq!(buf.occupancy().unwrap(), 0);
    }

    #[test]
    fn destroyed_buffer_stops_the_run() {
        let mut buf = RingBuffer::new(2).unwrap();
        buf.destroy().unwrap();
        let err = run_window(&mut buf, vec![1.0]).unwrap_err();
        assert!(matches!(err, RingBufferError::Uninitialized));
    }
}
