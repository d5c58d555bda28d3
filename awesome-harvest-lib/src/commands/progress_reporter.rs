use crate::facts::Progress;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

const TEMPLATE: &str = "{prefix:>12.bold.cyan} [{bar:25}] {pos}/{len} {msg}";
const TEMPLATE_NO_COLOR: &str = "{prefix:>12} [{bar:25}] {pos}/{len} {msg}";

/// Terminal progress bar over the entries of the awesome list.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a progress bar drawn on stderr, or a hidden one when `visible` is false.
    ///
    /// When `use_colors` is false, the bar is rendered without ANSI styling.
    #[must_use]
    pub fn new(visible: bool, use_colors: bool) -> Self {
        let target = if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };

        let bar = ProgressBar::with_draw_target(Some(0), target);
        let template = if use_colors { TEMPLATE } else { TEMPLATE_NO_COLOR };
        let style = ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);

        Self { bar }
    }
}

impl Progress for ProgressReporter {
    fn set_phase(&self, phase: &str) {
        self.bar.set_prefix(phase.to_string());
    }

    fn set_length(&self, len: u64) {
        self.bar.set_length(len);
    }

    fn advance(&self) {
        self.bar.inc(1);
    }

    fn set_message(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn done(&self) {
        self.bar.finish_and_clear();
    }
}
