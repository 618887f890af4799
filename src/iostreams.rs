use std::io::Write;

use anyhow::Result;

pub struct IoStreams {
    pub stdin: Box<dyn std::io::Read + Send + Sync>,
    pub out: Box<dyn std::io::Write + Send + Sync>,
    pub err_out: Box<dyn std::io::Write + Send + Sync>,

    color_enabled: bool,

    stdin_tty_override: bool,
    stdin_is_tty: bool,
    stdout_tty_override: bool,
    stdout_is_tty: bool,

    never_prompt: bool,
}

impl IoStreams {
    pub fn color_enabled(&self) -> bool {
        self.color_enabled
    }

    pub fn set_color_enabled(&mut self, color_enabled: bool) {
        self.color_enabled = color_enabled;
    }

    pub fn set_stdin_tty(&mut self, is_tty: bool) {
        self.stdin_tty_override = true;
        self.stdin_is_tty = is_tty;
    }

    pub fn is_stdin_tty(&self) -> bool {
        if self.stdin_tty_override {
            return self.stdin_is_tty;
        }

        atty::is(atty::Stream::Stdin)
    }

    pub fn set_stdout_tty(&mut self, is_tty: bool) {
        self.stdout_tty_override = true;
        self.stdout_is_tty = is_tty;
    }

    pub fn is_stdout_tty(&self) -> bool {
        if self.stdout_tty_override {
            return self.stdout_is_tty;
        }

        atty::is(atty::Stream::Stdout)
    }

    /// Interactive prompts need a terminal on both ends and prompting not disabled in config.
    pub fn can_prompt(&self) -> bool {
        if self.never_prompt {
            return false;
        }

        self.is_stdin_tty() && self.is_stdout_tty()
    }

    #[cfg(test)]
    pub fn get_never_prompt(&self) -> bool {
        self.never_prompt
    }

    pub fn set_never_prompt(&mut self, never_prompt: bool) {
        self.never_prompt = never_prompt;
    }

    pub fn color_scheme(&self) -> crate::colors::ColorScheme {
        crate::colors::ColorScheme::new(self.color_enabled())
    }

    pub fn write_json(&mut self, json: &serde_json::Value) -> Result<()> {
        if self.color_enabled() {
            writeln!(self.out, "{}", colored_json::to_colored_json_auto(json)?)?;
        } else {
            writeln!(self.out, "{}", serde_json::to_string_pretty(json)?)?;
        }

        Ok(())
    }

    pub fn write_yaml(&mut self, value: &serde_json::Value) -> Result<()> {
        write!(self.out, "{}", serde_yaml::to_string(value)?)?;

        Ok(())
    }

    pub fn system() -> Self {
        let stdout_is_tty = atty::is(atty::Stream::Stdout);

        if stdout_is_tty {
            // On Windows 10 the application must enable ANSI support first.
            #[cfg(windows)]
            let _ = ansi_term::enable_ansi_support();
            #[cfg(windows)]
            let _ = colored_json::enable_ansi_support();
        }

        let mut io = IoStreams {
            stdin: Box::new(std::io::stdin()),
            out: Box::new(std::io::stdout()),
            err_out: Box::new(std::io::stderr()),
            color_enabled: crate::colors::env_color_forced() || (!crate::colors::env_color_disabled() && stdout_is_tty),

            stdin_tty_override: false,
            stdin_is_tty: atty::is(atty::Stream::Stdin),
            stdout_tty_override: false,
            stdout_is_tty,

            never_prompt: false,
        };

        // prevent duplicate is_terminal queries now that we know the answer.
        io.set_stdout_tty(stdout_is_tty);

        io
    }

    #[cfg(test)]
    pub fn test() -> (Self, String, String) {
        let mut io = IoStreams::system();

        let (stdout, stdout_path) = tempfile::NamedTempFile::new().unwrap().keep().unwrap();
        let (stderr, stderr_path) = tempfile::NamedTempFile::new().unwrap().keep().unwrap();

        io.out = Box::new(stdout);
        io.err_out = Box::new(stderr);

        (
            io,
            stdout_path.into_os_string().into_string().unwrap(),
            stderr_path.into_os_string().into_string().unwrap(),
        )
    }
}
