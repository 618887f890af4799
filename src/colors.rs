use crate::config_file::get_env_var;

pub fn env_color_disabled() -> bool {
    !get_env_var("NO_COLOR").is_empty() || get_env_var("CLICOLOR") == "0"
}

pub fn env_color_forced() -> bool {
    !get_env_var("CLICOLOR_FORCE").is_empty() && get_env_var("CLICOLOR_FORCE") != "0"
}

pub struct ColorScheme {
    enabled: bool,
}

impl ColorScheme {
    pub fn new(enabled: bool) -> Self {
        ColorScheme { enabled }
    }

    fn paint(&self, style: ansi_term::Style, t: &str) -> String {
        if !self.enabled {
            return t.to_string();
        }

        style.paint(t).to_string()
    }

    pub fn bold(&self, t: &str) -> String {
        self.paint(ansi_term::Style::new().bold(), t)
    }

    pub fn red(&self, t: &str) -> String {
        self.paint(ansi_term::Colour::Red.normal(), t)
    }

    pub fn yellow(&self, t: &str) -> String {
        self.paint(ansi_term::Colour::Yellow.normal(), t)
    }

    pub fn green(&self, t: &str) -> String {
        self.paint(ansi_term::Colour::Green.normal(), t)
    }

    pub fn gray(&self, t: &str) -> String {
        self.paint(ansi_term::Colour::Fixed(242).normal(), t)
    }

    pub fn success_icon(&self) -> String {
        self.green("✔")
    }

    pub fn warning_icon(&self) -> String {
        self.yellow("!")
    }

    pub fn failure_icon(&self) -> String {
        self.red("✘")
    }
}
