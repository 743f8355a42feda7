//! Snapshot reconciliation
//!
//! Compares the baseline snapshot with a fresh one and turns every deal that
//! disappeared or appeared into exactly one notification message. Closed
//! deals are always reported before opened ones within a pass.

use tracing::{debug, warn};

use crate::common::traits::PositionSource;
use crate::common::types::{Position, PositionDetail, PositionSnapshot, Session};

/// A position lifecycle change between two snapshots
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Present in the baseline, gone now
    Closed(Position),
    /// New since the baseline, with its fetched detail
    Opened(PositionDetail),
}

impl Transition {
    pub fn deal_id(&self) -> &str {
        match self {
            Transition::Closed(position) => &position.deal_id,
            Transition::Opened(detail) => &detail.deal_id,
        }
    }

    /// Notification text for this transition
    pub fn message(&self) -> String {
        match self {
            Transition::Closed(position) => format!(
                "{} order closed: Trading: {}",
                position.direction, position.instrument_name
            ),
            Transition::Opened(detail) => format!(
                "{} order opened: Trading: {} Position price: {}",
                detail.direction,
                detail.instrument_name,
                detail.level_text()
            ),
        }
    }
}

/// Deals that closed and opened between two snapshots
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapshotDiff<'a> {
    /// In baseline listing order
    pub closed: Vec<&'a Position>,
    /// In current listing order
    pub opened: Vec<&'a Position>,
}

impl SnapshotDiff<'_> {
    pub fn is_empty(&self) -> bool {
        self.closed.is_empty() && self.opened.is_empty()
    }

    pub fn len(&self) -> usize {
        self.closed.len() + self.opened.len()
    }
}

/// Compute the closed and opened sets; no I/O
pub fn diff<'a>(previous: &'a PositionSnapshot, current: &'a PositionSnapshot) -> SnapshotDiff<'a> {
    SnapshotDiff {
        closed: previous
            .iter()
            .filter(|p| !current.contains(&p.deal_id))
            .collect(),
        opened: current
            .iter()
            .filter(|p| !previous.contains(&p.deal_id))
            .collect(),
    }
}

/// Turn a diff into transitions, fetching detail for every opened deal
///
/// An opened deal whose detail cannot be fetched is dropped for good; it is
/// part of the new baseline and will not be looked at again.
pub async fn resolve<P>(diff: &SnapshotDiff<'_>, source: &P, session: &Session) -> Vec<Transition>
where
    P: PositionSource + ?Sized,
{
    let mut transitions: Vec<Transition> = diff
        .closed
        .iter()
        .map(|&position| Transition::Closed(position.clone()))
        .collect();

    for position in &diff.opened {
        match source.fetch_position(session, &position.deal_id).await {
            Ok(detail) => transitions.push(Transition::Opened(detail)),
            Err(e) => warn!(
                deal_id = %position.deal_id,
                "Skipping opened notification, detail fetch failed: {}", e
            ),
        }
    }

    transitions
}

/// Reconcile two snapshots into an ordered list of notification messages
pub async fn reconcile<P>(
    previous: &PositionSnapshot,
    current: &PositionSnapshot,
    source: &P,
    session: &Session,
) -> Vec<String>
where
    P: PositionSource + ?Sized,
{
    let diff = diff(previous, current);
    if diff.is_empty() {
        return Vec::new();
    }
    debug!(
        closed = diff.closed.len(),
        opened = diff.opened.len(),
        "Snapshot changed"
    );

    let transitions = resolve(&diff, source, session).await;
    for transition in &transitions {
        debug!(deal_id = %transition.deal_id(), "{}", transition.message());
    }
    transitions.iter().map(Transition::message).collect()
}
