// Line console abstraction
//
// The session and the rating prompts only ever need "show a prompt,
// read one line" and "print a line", so that is the whole trait. The
// seam exists so the blocking retry-until-valid prompt loops can be
// exercised from tests with scripted input.

use anyhow::Result;
use rustyline::DefaultEditor;

pub trait Console {
    /// Display `prompt` and block until the user enters one line.
    fn read_line(&mut self, prompt: &str) -> Result<String>;

    /// Print one line of transcript output.
    fn print(&mut self, text: &str);
}

/// Real terminal console backed by rustyline.
pub struct LineConsole {
    editor: DefaultEditor,
}

impl LineConsole {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl Console for LineConsole {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        let line = self.editor.readline(prompt)?;
        Ok(line)
    }

    fn print(&mut self, text: &str) {
        println!("{}", text);
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    use super::Console;
    use anyhow::{bail, Result};
    use std::collections::VecDeque;

    /// Test console fed from a fixed script of input lines; records
    /// everything that was prompted or printed.
    pub struct ScriptedConsole {
        inputs: VecDeque<String>,
        pub prompts: Vec<String>,
        pub printed: Vec<String>,
    }

    impl ScriptedConsole {
        pub fn new(inputs: &[&str]) -> Self {
            Self {
                inputs: inputs.iter().map(|s| s.to_string()).collect(),
                prompts: Vec::new(),
                printed: Vec::new(),
            }
        }
    }

    impl Console for ScriptedConsole {
        fn read_line(&mut self, prompt: &str) -> Result<String> {
            self.prompts.push(prompt.to_string());
            match self.inputs.pop_front() {
                Some(line) => Ok(line),
                None => bail!("script exhausted at prompt: {}", prompt),
            }
        }

        fn print(&mut self, text: &str) {
            self.printed.push(text.to_string());
        }
    }
}
