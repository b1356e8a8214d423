use crate::*;

/// Where an applied snapshot came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SnapshotOrigin {
    /// Delivered by the push channel.
    Push,
    /// Response to the command with this sequence number.
    Command(u64),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// A response to a command issued before an already applied one.
    Stale,
}

pub type RenderObserver = Box<dyn FnMut(&BoardSnapshot, RenderMetrics)>;

/// Latest engine snapshot and the metrics derived from it.
///
/// The most recently applied snapshot wins regardless of origin, except that
/// command responses are ordered among themselves by sequence number so a slow
/// response cannot replace the answer to a later command.
pub struct BoardStateStore {
    snapshot: Option<BoardSnapshot>,
    metrics: RenderMetrics,
    surface_width: Option<u32>,
    revision: u64,
    issued_commands: u64,
    applied_command: u64,
    last_failure: Option<CommandFailure>,
    observer: Option<RenderObserver>,
}

impl BoardStateStore {
    pub fn new() -> Self {
        Self {
            snapshot: None,
            metrics: RenderMetrics::default(),
            surface_width: None,
            revision: 0,
            issued_commands: 0,
            applied_command: 0,
            last_failure: None,
            observer: None,
        }
    }

    /// Callback invoked synchronously after every applied snapshot.
    pub fn set_observer(&mut self, observer: RenderObserver) {
        self.observer = Some(observer);
    }

    pub fn snapshot(&self) -> Option<&BoardSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn metrics(&self) -> RenderMetrics {
        self.metrics
    }

    /// Number of snapshots applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn last_failure(&self) -> Option<&CommandFailure> {
        self.last_failure.as_ref()
    }

    /// Engine-reported elapsed time, `0` when unknown.
    pub fn duration(&self) -> u64 {
        self.snapshot
            .as_ref()
            .and_then(BoardSnapshot::elapsed)
            .unwrap_or(0)
    }

    /// Reserves the sequence number for a command about to be sent.
    pub fn next_command_seq(&mut self) -> u64 {
        self.issued_commands += 1;
        self.issued_commands
    }

    pub fn set_snapshot(&mut self, snapshot: BoardSnapshot, origin: SnapshotOrigin) -> ApplyOutcome {
        if let SnapshotOrigin::Command(seq) = origin {
            if seq <= self.applied_command {
                log::debug!(
                    "dropping stale response to command #{} (already applied #{})",
                    seq,
                    self.applied_command
                );
                return ApplyOutcome::Stale;
            }
            self.applied_command = seq;
        }

        self.metrics = RenderMetrics::compute(snapshot.columns(), self.layout_width());
        self.revision += 1;
        self.last_failure = None;
        log::debug!(
            "snapshot #{} from {:?}: {}x{} {:?}, cell size {}",
            self.revision,
            origin,
            snapshot.rows(),
            snapshot.columns(),
            snapshot.progress(),
            self.metrics.cell_size
        );

        let snapshot = self.snapshot.insert(snapshot);
        if let Some(observer) = self.observer.as_mut() {
            observer(snapshot, self.metrics);
        }

        ApplyOutcome::Applied
    }

    pub fn record_failure(&mut self, failure: CommandFailure) {
        log::warn!(
            "command {:?} failed, keeping previous board: {}",
            failure.command,
            failure.error
        );
        self.last_failure = Some(failure);
    }

    /// Updates the width metrics are fitted to. Does not request a render.
    pub fn set_surface_width(&mut self, width: u32) {
        self.surface_width = Some(width);
        if let Some(snapshot) = &self.snapshot {
            self.metrics = RenderMetrics::compute(snapshot.columns(), width);
        }
    }

    /// Drops the snapshot and the observer.
    pub fn clear(&mut self) {
        self.snapshot = None;
        self.observer = None;
        self.last_failure = None;
        self.metrics = RenderMetrics::default();
    }

    fn layout_width(&self) -> u32 {
        self.surface_width.unwrap_or(FALLBACK_SURFACE_WIDTH)
    }
}

impl Default for BoardStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for BoardStateStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BoardStateStore")
            .field("snapshot", &self.snapshot)
            .field("metrics", &self.metrics)
            .field("surface_width", &self.surface_width)
            .field("revision", &self.revision)
            .field("last_failure", &self.last_failure)
            .finish_non_exhaustive()
    }
}
