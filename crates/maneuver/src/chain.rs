//! Stored maneuver plans and their replay into the host.

use karto_core::ids::VesselId;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::{Burn, ManeuverActuator, ManeuverError, remove_all_nodes};

/// A restore that stopped part-way. Fully placed nodes stay in the host; a node that was created
/// but could not be set is removed again.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("restore stopped after {restored} of {total} burns: {source}")]
pub struct RestoreError {
    pub restored: usize,
    pub total: usize,
    #[source]
    pub source: ManeuverError,
}

/// Owned copy of a multi-node plan, in the temporal order the nodes had when it was captured.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManeuverChain {
    burns: Vec<Burn>,
}

impl ManeuverChain {
    /// Deep-copy the live burns. Nothing is captured from an empty list.
    pub fn snapshot<I>(live: I) -> Option<Self>
    where
        I: IntoIterator<Item = Burn>,
    {
        let burns: Vec<Burn> = live.into_iter().collect();
        (!burns.is_empty()).then_some(Self { burns })
    }

    pub fn burns(&self) -> &[Burn] {
        &self.burns
    }

    pub fn len(&self) -> usize {
        self.burns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.burns.is_empty()
    }

    /// Sum of burn magnitudes (m/s).
    pub fn total_delta_v(&self) -> f64 {
        self.burns.iter().fold(0.0, |acc, burn| acc + burn.magnitude())
    }

    /// Seconds from `now` until the first burn.
    pub fn time_until_first(&self, now: f64) -> Option<f64> {
        self.burns.first().map(|burn| burn.ut - now)
    }

    /// Replace the host's live nodes with this chain, node by node in stored order.
    ///
    /// Returns the number of nodes created. A rejected node stops the replay without rolling back
    /// the nodes already created.
    pub fn restore<A>(&self, host: &mut A, vessel: &VesselId) -> Result<usize, RestoreError>
    where
        A: ManeuverActuator + ?Sized,
    {
        let total = self.burns.len();
        remove_all_nodes(host, vessel).map_err(|source| RestoreError {
            restored: 0,
            total,
            source,
        })?;

        for (restored, burn) in self.burns.iter().enumerate() {
            let placed = host.add_node(vessel, burn.ut).and_then(|handle| {
                host.set_node(handle, *burn).or_else(|source| {
                    // Drop the blank node so only fully placed burns remain.
                    if let Err(cleanup) = host.remove_node(handle) {
                        warn!(%vessel, %handle, "could not remove half-placed node: {cleanup}");
                    }
                    Err(source)
                })
            });
            if let Err(source) = placed {
                warn!(%vessel, restored, total, "restore halted: {source}");
                return Err(RestoreError {
                    restored,
                    total,
                    source,
                });
            }
        }
        info!(%vessel, total, "restored maneuver chain");
        Ok(total)
    }
}

/// The list of plans the user has stored during the session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredManeuvers {
    chains: Vec<ManeuverChain>,
}

impl StoredManeuvers {
    pub fn new(chains: Vec<ManeuverChain>) -> Self {
        Self { chains }
    }

    /// Store a captured chain and return its index.
    pub fn store(&mut self, chain: ManeuverChain) -> usize {
        self.chains.push(chain);
        self.chains.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Option<ManeuverChain> {
        (index < self.chains.len()).then(|| self.chains.remove(index))
    }

    pub fn clear(&mut self) {
        self.chains.clear();
    }

    pub fn get(&self, index: usize) -> Option<&ManeuverChain> {
        self.chains.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ManeuverChain> {
        self.chains.iter()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Replay the chain at `index`. The stored entry is kept.
    pub fn restore<A>(
        &self,
        index: usize,
        host: &mut A,
        vessel: &VesselId,
    ) -> Result<usize, RestoreError>
    where
        A: ManeuverActuator + ?Sized,
    {
        let chain = self.get(index).ok_or(RestoreError {
            restored: 0,
            total: 0,
            source: ManeuverError::NoSuchChain(index),
        })?;
        chain.restore(host, vessel)
    }
}

impl<'a> IntoIterator for &'a StoredManeuvers {
    type Item = &'a ManeuverChain;
    type IntoIter = std::slice::Iter<'a, ManeuverChain>;

    fn into_iter(self) -> Self::IntoIter {
        self.chains.iter()
    }
}
