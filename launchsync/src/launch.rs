//! Launch gating after a sync run.
//!
//! Combines the sync outcome with the user's session into a single
//! decision. The session is an explicit value so the decision can be tested
//! without any sign-in machinery.

use crate::manager::SyncOutcome;

/// Identity state of the user starting the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// Whether the user completed sign-in.
    pub signed_in: bool,
    /// Whether the signed-in account owns the game.
    pub entitled: bool,
}

impl Session {
    /// Session for shells without a sign-in flow; always allowed to launch.
    pub fn offline() -> Self {
        Self {
            signed_in: true,
            entitled: true,
        }
    }

    /// Session whose user has not signed in.
    pub fn signed_out() -> Self {
        Self {
            signed_in: false,
            entitled: false,
        }
    }
}

/// Why a launch was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    NotSignedIn,
    NotEntitled,
    SetupFailed,
    Miscount,
}

impl AbortReason {
    /// Message suitable for the user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotSignedIn => "sign-in required before launching",
            Self::NotEntitled => "this account does not own the game",
            Self::SetupFailed => "setup failed; see the log for details",
            Self::Miscount => "installed files do not match the release",
        }
    }
}

/// What the shell should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchDecision {
    /// Start the game.
    Launch,
    /// Start the game, but tell the user the installation is inconsistent.
    LaunchWithWarning,
    /// Do not start the game.
    Abort(AbortReason),
}

/// Decide whether to launch.
///
/// Session checks come first: an unverified user never launches, whatever
/// the state of the files. A miscount launches only when the user opted in.
pub fn decide(
    outcome: SyncOutcome,
    session: &Session,
    proceed_on_miscount: bool,
) -> LaunchDecision {
    if !session.signed_in {
        return LaunchDecision::Abort(AbortReason::NotSignedIn);
    }
    if !session.entitled {
        return LaunchDecision::Abort(AbortReason::NotEntitled);
    }

    match outcome {
        SyncOutcome::Success => LaunchDecision::Launch,
        SyncOutcome::MiscountError if proceed_on_miscount => LaunchDecision::LaunchWithWarning,
        SyncOutcome::MiscountError => LaunchDecision::Abort(AbortReason::Miscount),
        SyncOutcome::Failure => LaunchDecision::Abort(AbortReason::SetupFailed),
    }
}
