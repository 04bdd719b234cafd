use crate::error::EngineError;

/*
Gain Automation
===============

An automation curve is an ordered list of breakpoints that move a parameter
over real time. It is how one-shot sounds get their amplitude envelope.

Vocabulary
----------

  breakpoint  A (time, value, ramp) triple: "reach `value` at `time`, using
              `ramp` to get there from the previous breakpoint".

  ramp        How the value travels between two breakpoints:

                Immediate    hold the previous value, then jump at `time`
                Linear       straight line (constant slope)
                Exponential  straight line in the log domain; every equal
                             slice of time multiplies the value by the same
                             factor. Needs strictly positive endpoints.

  initial     The value before the first breakpoint.


The Math
--------

Between breakpoint A = (t0, v0) and B = (t1, v1), for t0 <= t < t1:

    Linear:       v(t) = v0 + (v1 - v0) * (t - t0) / (t1 - t0)
    Exponential:  v(t) = v0 * (v1 / v0) ^ ((t - t0) / (t1 - t0))
    Immediate:    v(t) = v0

After the last breakpoint the curve holds its final value.


The Shredder Envelope
---------------------

    gain
    0.8 ┤  ╱‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾──___
    0.6 ┤ ╱                          ‾‾╲
        │╱                               ╲__
    0.0 ┼─────────────────────────────────────→ t
        0  0.1                        2.5   3.0

    Immediate 0.0 @ 0.0
    Linear    0.8 @ 0.1          fast attack
    Linear    0.6 @ 2.5          slow sag while the paper feeds through
    Exp       0.01 @ 3.0         natural-sounding tail

`value_at` is a pure function of time so envelopes can be checked without
rendering any audio.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampKind {
    Immediate,
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    /// Seconds from the start of the curve.
    pub time: f64,
    pub value: f32,
    pub ramp: RampKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Automation {
    initial: f32,
    points: Vec<Breakpoint>,
}

impl Automation {
    pub fn new(initial: f32) -> Self {
        Self {
            initial,
            points: Vec::new(),
        }
    }

    /// Append a breakpoint. Times must not go backwards and exponential
    /// targets must be strictly positive.
    pub fn push(&mut self, point: Breakpoint) -> Result<(), EngineError> {
        if !point.time.is_finite() || point.time < self.end_time() {
            return Err(EngineError::InvalidParameter {
                name: "breakpoint time",
                value: point.time as f32,
            });
        }
        if !point.value.is_finite()
            || (point.ramp == RampKind::Exponential && point.value <= 0.0)
        {
            return Err(EngineError::InvalidParameter {
                name: "breakpoint value",
                value: point.value,
            });
        }

        self.points.push(point);
        Ok(())
    }

    pub fn set_value_at(mut self, value: f32, time: f64) -> Result<Self, EngineError> {
        self.push(Breakpoint {
            time,
            value,
            ramp: RampKind::Immediate,
        })?;
        Ok(self)
    }

    pub fn linear_ramp_to(mut self, value: f32, time: f64) -> Result<Self, EngineError> {
        self.push(Breakpoint {
            time,
            value,
            ramp: RampKind::Linear,
        })?;
        Ok(self)
    }

    pub fn exponential_ramp_to(mut self, value: f32, time: f64) -> Result<Self, EngineError> {
        self.push(Breakpoint {
            time,
            value,
            ramp: RampKind::Exponential,
        })?;
        Ok(self)
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.points
    }

    /// Time of the last breakpoint (0 for an empty curve).
    pub fn end_time(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.time)
    }

    /// Value of the curve at `time` seconds.
    pub fn value_at(&self, time: f64) -> f32 {
        let next = self.points.partition_point(|p| p.time <= time);

        let (t0, v0) = match next.checked_sub(1) {
            Some(prev) => (self.points[prev].time, self.points[prev].value),
            None => (0.0, self.initial),
        };

        let Some(target) = self.points.get(next) else {
            return v0;
        };

        let span = target.time - t0;
        if span <= 0.0 {
            return v0;
        }
        let progress = ((time - t0) / span).clamp(0.0, 1.0);

        match target.ramp {
            RampKind::Immediate => v0,
            RampKind::Linear => v0 + (target.value - v0) * progress as f32,
            RampKind::Exponential => {
                if v0 <= 0.0 {
                    // No log-domain path from zero; hold until the breakpoint
                    v0
                } else {
                    let ratio = (target.value / v0) as f64;
                    (v0 as f64 * ratio.powf(progress)) as f32
                }
            }
        }
    }

    /// Fill `out` with consecutive values starting at `start` seconds.
    pub fn render(&self, out: &mut [f32], start: f64, sample_rate: f32) {
        let dt = 1.0 / sample_rate as f64;
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = self.value_at(start + i as f64 * dt);
        }
    }
}
