/// Cooperative single-flight guard with coalesced retry.
///
/// A plain flag pair, not a lock: the engine is single-threaded and only
/// needs to serialize interleaved async callbacks. While one flight is in
/// progress, any number of further requests collapse into a single pending
/// bit; when the flight settles, [`Self::settle`] reports whether exactly one
/// follow-up should be scheduled.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleFlight {
    in_flight: bool,
    pending: bool,
}

impl SingleFlight {
    /// Create an idle guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to start a flight.
    ///
    /// Returns `true` when the caller now owns the flight. Returns `false`
    /// when one is already in progress, in which case the request is recorded
    /// as pending and coalesced with any earlier pending request.
    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            self.pending = true;
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Settle the current flight (success or failure alike).
    ///
    /// Returns `true` when a request arrived mid-flight; the caller must then
    /// schedule exactly one follow-up flight, which this call has already
    /// claimed (the guard stays in-flight for it).
    pub fn settle(&mut self) -> bool {
        debug_assert!(self.in_flight, "settle without a flight");
        if self.pending {
            self.pending = false;
            // Guard stays held: the follow-up is the next flight.
            true
        } else {
            self.in_flight = false;
            false
        }
    }

    /// Whether a flight is currently in progress.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/single_flight.rs"]
mod tests;
