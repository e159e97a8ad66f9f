mod config;
mod probe;
mod reading;
mod relay;
mod sink;
mod spool;

use crate::config::Config;
use crate::probe::NetProbe;
use crate::relay::CycleOutcome;
use crate::sink::RemoteStore;
use crate::spool::Spool;
use anyhow::Result;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    info!("Starting farmwatch relay");
    info!(
        "Cycle interval: {:?}, probe timeout: {:?}, herd size: {}",
        config.cycle_interval, config.probe_timeout, config.herd_size
    );
    info!("Spool: {}", config.spool_path.display());

    let mut spool = Spool::open(&config.spool_path)?;
    let mut probe = NetProbe::new(config.probe_timeout);
    let mut remote = RemoteStore::connect_lazy(&config.db);
    let mut rng = rand::thread_rng();

    // Fixed cadence, no backoff: a failed cycle simply retries on the next
    // tick, and the loop only stops with the process.
    loop {
        let reading = reading::generate_reading(&mut rng, config.herd_size);
        let id_vaca = reading.id_vaca.clone();

        match relay::run_cycle(&mut probe, &mut remote, &mut spool, reading).await {
            Ok(CycleOutcome::Delivered { replayed: 0 }) => {
                info!("reading from {} delivered to remote store", id_vaca);
            }
            Ok(CycleOutcome::Delivered { replayed }) => {
                info!(
                    "reading from {} delivered, {} spooled readings replayed",
                    id_vaca, replayed
                );
            }
            Ok(CycleOutcome::Spooled { backlog }) => {
                warn!(
                    "no connectivity, reading from {} spooled ({} pending)",
                    id_vaca, backlog
                );
            }
            Ok(CycleOutcome::SpooledAfterFailure) => {
                warn!("remote write failed, reading from {} spooled", id_vaca);
            }
            Err(e) => error!("relay cycle failed: {:#}", e),
        }

        tokio::time::sleep(config.cycle_interval).await;
    }
}
