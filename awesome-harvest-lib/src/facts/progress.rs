/// Progress reporting for the per-entry harvest loop.
pub trait Progress {
    /// Set the phase label shown before the bar (e.g. "Processing", "Waiting").
    fn set_phase(&self, phase: &str);

    /// Set the total number of work items.
    fn set_length(&self, len: u64);

    /// Mark one work item as complete.
    fn advance(&self);

    fn set_message(&self, message: &str);

    /// Finish and clear the progress indicator.
    fn done(&self);
}
