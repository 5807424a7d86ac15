//! Core value types shared by the catalog, browser logic, and UI layers.

/// One catalog entry representing a demo screen.
///
/// Records are created when the manifest is loaded and never mutated
/// afterwards; the browser refers to them by catalog index.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Sample {
    /// Display name shown in the results list.
    pub name: String,
    /// Free-form description shown when the row is expanded.
    pub description: String,
    /// Stable identifier of the detail screen to present.
    pub id: String,
    /// Asset bundle tags that must be present before the sample can be shown.
    /// Ordered, without duplicates.
    pub dependencies: Vec<String>,
    /// Readme location relative to the manifest directory, if any.
    pub readme: Option<String>,
    /// Category heading the sample was listed under in the manifest.
    pub category: Option<String>,
}

impl Sample {
    /// Whether selecting this sample requires an asset fetch.
    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }
}

/// Identity of a single on-demand resource request.
///
/// Tokens are allocated monotonically by the browser; events carrying a token
/// other than the active one are stale and get dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchToken(pub u64);

impl std::fmt::Display for FetchToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle phase of the current resource request.
///
/// `Idle -> Checking -> {AlreadyAvailable -> Ready, Downloading -> {Ready, Failed, Cancelled}}`
#[derive(Clone, Debug, PartialEq, Default)]
pub enum FetchPhase {
    /// No request has been made since the last reset.
    #[default]
    Idle,
    /// Asking the provider whether the assets are already present.
    Checking,
    /// Provider reported the assets present; completion follows.
    AlreadyAvailable,
    /// Assets are being transferred; `progress` is in `0.0..=1.0`.
    Downloading { progress: f64 },
    /// Assets present; the detail screen has been presented.
    Ready,
    /// Request ended with an error that was surfaced to the user.
    Failed { message: String },
    /// Request was cancelled by the user.
    Cancelled,
}

impl FetchPhase {
    /// What: Report whether a request is still outstanding in this phase.
    ///
    /// Output:
    /// - `true` for `Checking`, `AlreadyAvailable`, and `Downloading`.
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            FetchPhase::Checking | FetchPhase::AlreadyAvailable | FetchPhase::Downloading { .. }
        )
    }

    /// Terminal phases: `Ready`, `Failed`, `Cancelled`.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FetchPhase::Ready | FetchPhase::Failed { .. } | FetchPhase::Cancelled
        )
    }

    /// Fractional progress to display, if the phase has one.
    pub fn progress(&self) -> Option<f64> {
        match self {
            FetchPhase::Checking => Some(0.0),
            FetchPhase::AlreadyAvailable => Some(1.0),
            FetchPhase::Downloading { progress } => Some(*progress),
            _ => None,
        }
    }
}

/// Which input area currently receives key presses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    /// The search box at the top.
    #[default]
    Search,
    /// The results list.
    Results,
}

/// Selectable filtering behaviour for the search box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum StrategyKind {
    /// Case-insensitive substring match, catalog order preserved.
    #[default]
    Substring,
    /// Ordered-subsequence match ranked by closeness.
    Fuzzy,
}

impl StrategyKind {
    /// What: Parse a strategy from a config or CLI value.
    ///
    /// Inputs:
    /// - `val`: Raw value such as `substring`, `contains`, `fuzzy`.
    ///
    /// Output:
    /// - `Some(kind)` when recognised; `None` otherwise.
    pub fn from_config_key(val: &str) -> Option<Self> {
        match val.trim().to_ascii_lowercase().as_str() {
            "substring" | "contains" | "plain" => Some(StrategyKind::Substring),
            "fuzzy" | "subsequence" => Some(StrategyKind::Fuzzy),
            _ => None,
        }
    }

    /// Key written back to config files and shown in the UI title.
    pub fn as_config_key(self) -> &'static str {
        match self {
            StrategyKind::Substring => "substring",
            StrategyKind::Fuzzy => "fuzzy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Confirm phase classification helpers agree with the fetch lifecycle.
    fn phase_flags_partition_lifecycle() {
        assert!(!FetchPhase::Idle.is_in_flight());
        assert!(!FetchPhase::Idle.is_terminal());
        assert!(FetchPhase::Checking.is_in_flight());
        assert!(FetchPhase::Downloading { progress: 0.3 }.is_in_flight());
        assert!(FetchPhase::Ready.is_terminal());
        assert!(FetchPhase::Cancelled.is_terminal());
        assert!(
            FetchPhase::Failed {
                message: "x".into()
            }
            .is_terminal()
        );
        assert_eq!(
            FetchPhase::Downloading { progress: 0.25 }.progress(),
            Some(0.25)
        );
        assert_eq!(FetchPhase::Ready.progress(), None);
    }

    #[test]
    fn strategy_kind_parses_aliases() {
        assert_eq!(
            StrategyKind::from_config_key(" Fuzzy "),
            Some(StrategyKind::Fuzzy)
        );
        assert_eq!(
            StrategyKind::from_config_key("contains"),
            Some(StrategyKind::Substring)
        );
        assert_eq!(StrategyKind::from_config_key("regex"), None);
        assert_eq!(StrategyKind::Fuzzy.as_config_key(), "fuzzy");
    }
}
