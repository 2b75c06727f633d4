use console::style;
use dialoguer::Input;
use shoplist_catalog::{PromptRequest, ValuePrompt};

/// Asks on the terminal. Any input error (closed stdin, Ctrl-C) counts as cancel.
pub(crate) struct TerminalPrompt;

impl ValuePrompt for TerminalPrompt {
    fn ask(&mut self, request: &PromptRequest) -> Option<String> {
        eprintln!("{}", style(&request.title).bold());
        Input::<String>::new()
            .with_prompt(&request.message)
            .allow_empty(true)
            .interact_text()
            .map_err(|err| log::debug!("Prompt cancelled: {err}"))
            .ok()
    }
}

/// Answers with a value already typed on the command line.
pub(crate) struct PresetAnswer(pub(crate) String);

impl ValuePrompt for PresetAnswer {
    fn ask(&mut self, _request: &PromptRequest) -> Option<String> {
        Some(self.0.clone())
    }
}
