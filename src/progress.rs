use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for one check: a spinner on a terminal, plain stderr
/// lines otherwise (indicatif draws nothing when stderr is not a TTY).
pub struct CheckProgress {
    name: String,
    bar: Option<ProgressBar>,
}

pub fn check_spinner(name: &str) -> CheckProgress {
    let message = format!("Testing {name}...");

    if !Term::stderr().is_term() {
        eprintln!("{message}");
        return CheckProgress {
            name: name.to_string(),
            bar: None,
        };
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner} {msg}")
            .expect("invalid spinner template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    CheckProgress {
        name: name.to_string(),
        bar: Some(pb),
    }
}

pub fn check_line(name: &str, success: bool, detail: &str) -> String {
    let mark = if success { "✓" } else { "✗" };
    format!("{mark} {name} - {detail}")
}

impl CheckProgress {
    /// Replace the spinner with a final ✓/✗ line for the check.
    pub fn finish(&self, success: bool, detail: &str) {
        let line = check_line(&self.name, success, detail);
        match &self.bar {
            Some(pb) => pb.finish_with_message(line),
            None => eprintln!("{line}"),
        }
    }
}
