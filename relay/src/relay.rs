use crate::probe::Probe;
use crate::reading::Reading;
use crate::sink::Sink;
use crate::spool::Spool;
use anyhow::Result;
use tracing::warn;

/// Where a reading ended up after one relay cycle.
#[derive(Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Committed to the remote store, together with `replayed` readings
    /// drained from the spool backlog.
    Delivered { replayed: usize },
    /// Probe negative; reading appended to the local spool.
    Spooled { backlog: usize },
    /// Probe positive but the remote write failed; reading spooled.
    SpooledAfterFailure,
}

/// One relay cycle: probe, pick a sink, write. The probe is advisory, so a
/// failed remote write after a positive probe still routes the reading to
/// the spool instead of dropping it. The spool is truncated only after the
/// remote transaction commits; a crash in between replays the backlog next
/// cycle (duplicates allowed, loss not).
pub async fn run_cycle<P: Probe, R: Sink>(
    probe: &mut P,
    remote: &mut R,
    spool: &mut Spool,
    reading: Reading,
) -> Result<CycleOutcome> {
    if !probe.is_remote_reachable().await {
        spool.store(std::slice::from_ref(&reading)).await?;
        let backlog = spool.pending()?.len();
        return Ok(CycleOutcome::Spooled { backlog });
    }

    let mut batch = spool.pending()?;
    let replayed = batch.len();
    batch.push(reading.clone());

    match remote.store(&batch).await {
        Ok(()) => {
            spool.clear()?;
            Ok(CycleOutcome::Delivered { replayed })
        }
        Err(e) => {
            warn!("remote write failed, spooling reading: {:#}", e);
            spool.store(std::slice::from_ref(&reading)).await?;
            Ok(CycleOutcome::SpooledAfterFailure)
        }
    }
}
