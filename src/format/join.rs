//! Fork-join task group

/// Run three independent tasks in parallel and wait for all of them.
///
/// Tasks run on the rayon pool; the calling thread takes part in the work.
/// Every task runs to completion before the results are returned, so a
/// failure reported by one task never leaves another one in flight.
pub fn join3<A, B, C, RA, RB, RC>(a: A, b: B, c: C) -> (RA, RB, RC)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    C: FnOnce() -> RC + Send,
    RA: Send,
    RB: Send,
    RC: Send,
{
    let (ra, (rb, rc)) = rayon::join(a, || rayon::join(b, c));
    (ra, rb, rc)
}
