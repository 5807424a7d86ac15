//! Navigation target the browser signals once a sample is ready.

use crate::state::Sample;

/// What: Receiver of the browser's user-visible outcomes.
///
/// Details:
/// - `show` is called exactly once per request that reaches `Ready`.
/// - `alert` is called for failures that are not user cancellations.
pub trait DetailPresenter {
    /// Present the detail screen for `sample`.
    fn show(&mut self, sample: &Sample);

    /// Surface a failure message to the user.
    fn alert(&mut self, message: &str);
}
