//! The shellwright turn pipeline.
//!
//! 1. **Record** the user's message in the conversation
//! 2. **Complete** — send the whole history to the provider
//! 3. **Parse** the reply for file blocks and `$SHELL:` lines ([`directive`])
//! 4. **Execute** — write files, then run commands until one fails ([`executor`])
//! 5. **Record** the raw reply and hand back an [`AgentTurnResult`]
//!
//! Steps run strictly one after another; a turn finishes before the next
//! one can start.

pub mod directive;
pub mod executor;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use directive::{parse, Directives, FileDirective};
pub use executor::{ExecutionResult, Executor};
pub use session::{Agent, AgentTurnResult, TurnPhase, DEFAULT_SYSTEM_PROMPT};
