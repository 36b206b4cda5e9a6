//! Console output for the `importsave` command
//!
//! One numbered line per savegame, then a timing summary.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::HumanDuration;

// Plain terminals get no symbol at all
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

fn step_line(current: usize, total: usize, emoji: &Emoji, msg: &str) -> String {
    let counter = style(format!("[{current}/{total}]")).bold().dim();
    format!("{counter} {emoji}{msg}")
}

fn done_line(elapsed: Duration) -> String {
    format!("{SPARKLE}Finished in {}", HumanDuration(elapsed))
}

/// Announce savegame `current` of `total`, e.g. `[2/5] ⚙️  HEX0.HXS`
pub fn print_step(current: usize, total: usize, emoji: Emoji, msg: &str) {
    println!("{}", step_line(current, total, &emoji, msg));
}

/// Summary line once the batch has finished
pub fn print_done(elapsed: Duration) {
    println!("{}", done_line(elapsed));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_line_numbers_the_save() {
        let line = console::strip_ansi_codes(&step_line(2, 5, &GEAR, "HEX0.HXS")).into_owned();
        assert!(line.starts_with("[2/5] "));
        assert!(line.ends_with("HEX0.HXS"));
    }

    #[test]
    fn test_done_line_reports_elapsed_time() {
        let line = done_line(Duration::from_secs(3));
        assert!(line.ends_with("Finished in 3 seconds"));
    }
}
