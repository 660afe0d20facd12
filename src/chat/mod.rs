//! Chat layer
//!
//! Text in, text out: intent classification, the guided setup dialogue and
//! the orchestrator that ties them to the services.

pub mod format;
pub mod intent;
pub mod onboarding;
pub mod orchestrator;

pub use intent::{Intent, IntentKind};
pub use onboarding::{Onboarding, OnboardingState};
pub use orchestrator::Orchestrator;
