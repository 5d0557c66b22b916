//! One conversation with the model, turn by turn.
//!
//! A turn moves through [`TurnPhase`]s:
//!
//! ```text
//! Idle → AwaitingCompletion → Parsing → Executing → Done
//!              └─────────────→ Failed (transport error)
//! ```
//!
//! The user message is recorded before the provider is called and is kept
//! even if the call fails. The assistant message is the raw reply, recorded
//! whether or not its directives executed cleanly.

use crate::directive;
use crate::executor::{ExecutionResult, Executor};
use shellwright_config::AppConfig;
use shellwright_core::message::{Conversation, Message};
use shellwright_core::provider::{Provider, ProviderRequest};
use shellwright_core::Error;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Instructions sent ahead of the dialogue unless the config overrides them.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a coding assistant that can create files and run shell commands on the user's machine.

To create or overwrite a file, put its full content in a fenced block whose label is the file name:

```hello.py
print(\"hello\")
```

File names are a single word with an optional extension (e.g. main.py, Makefile). \
To run a command, write it on its own line after the marker shown here:

$SHELL: python hello.py

Files are written before any command runs. Commands run in order and stop at the first failure. \
Explain what you are doing in plain prose around the blocks.";

/// Where a turn is, or where the last one ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnPhase {
    #[default]
    Idle,
    AwaitingCompletion,
    Parsing,
    Executing,
    Done,
    Failed,
}

/// What a turn hands back to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTurnResult {
    /// The model's reply, verbatim.
    pub model_text: String,
    /// Joined execution log, absent when nothing was logged.
    pub execution_output: Option<String>,
    /// Why execution stopped, if it did.
    pub execution_error: Option<String>,
}

impl AgentTurnResult {
    fn from_execution(model_text: String, result: &ExecutionResult) -> Self {
        Self {
            model_text,
            execution_output: result.joined_output(),
            execution_error: result.error().map(str::to_string),
        }
    }

    /// Human-facing rendering: the reply followed by what happened.
    pub fn render(&self) -> String {
        let mut text = self.model_text.clone();
        if let Some(output) = &self.execution_output {
            text.push_str("\n\nHere's what happened:\n");
            text.push_str(output);
        }
        if let Some(error) = &self.execution_error {
            text.push_str("\n\nUh oh:\n");
            text.push_str(error);
        }
        text
    }
}

/// The conversational agent: owns the history and drives each turn.
pub struct Agent {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    executor: Executor,
    conversation: Conversation,
    last_phase: TurnPhase,
}

impl Agent {
    /// Create an agent whose history starts with `system_prompt`.
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: None,
            executor: Executor::new(),
            conversation: Conversation::with_system_prompt(system_prompt),
            last_phase: TurnPhase::Idle,
        }
    }

    /// Build an agent from configuration.
    ///
    /// Returns [`Error::CredentialMissing`] when no API key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let provider = shellwright_providers::build_from_config(config)?;
        let system_prompt = config
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let mut agent = Self::new(provider, &config.model, system_prompt)
            .with_temperature(config.temperature);
        if let Some(max) = config.max_tokens {
            agent = agent.with_max_tokens(max);
        }
        if let Some(dir) = &config.workspace_dir {
            agent = agent.with_executor(Executor::with_working_dir(dir));
        }
        Ok(agent)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    /// The full dialogue so far, oldest first.
    pub fn history(&self) -> &Conversation {
        &self.conversation
    }

    /// Phase the most recent turn ended in (`Idle` before the first turn).
    pub fn last_phase(&self) -> TurnPhase {
        self.last_phase
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    fn enter(&mut self, phase: TurnPhase) {
        debug!(from = ?self.last_phase, to = ?phase, "Turn phase");
        self.last_phase = phase;
    }

    /// Run one turn: send `user_text` with the full history, execute the
    /// reply's directives, and record the reply.
    ///
    /// Directive failures come back inside the result; only a transport
    /// failure is an `Err`, and then no assistant message is recorded.
    pub async fn handle_turn(&mut self, user_text: &str) -> Result<AgentTurnResult, Error> {
        self.enter(TurnPhase::Idle);
        self.conversation.push(Message::user(user_text));

        self.enter(TurnPhase::AwaitingCompletion);
        info!(
            conversation_id = %self.conversation.id(),
            messages = self.conversation.len(),
            model = %self.model,
            "Requesting completion"
        );

        let request = ProviderRequest {
            model: self.model.clone(),
            messages: self.conversation.messages().to_vec(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let reply = match self.provider.complete(request).await {
            Ok(response) => response.content,
            Err(e) => {
                warn!(provider = %self.provider.name(), error = %e, "Completion failed");
                self.enter(TurnPhase::Failed);
                return Err(e.into());
            }
        };

        self.enter(TurnPhase::Parsing);
        let directives = directive::parse(&reply);
        debug!(
            files = directives.file_count(),
            commands = directives.commands().len(),
            "Parsed directives"
        );

        self.enter(TurnPhase::Executing);
        let execution = self.executor.execute(&directives).await;

        self.conversation.push(Message::assistant(reply.clone()));
        self.enter(TurnPhase::Done);

        info!(
            success = execution.success(),
            log_lines = execution.output_log().len(),
            "Turn complete"
        );
        Ok(AgentTurnResult::from_execution(reply, &execution))
    }
}
