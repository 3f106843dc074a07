use colored::*;
use tracing::info;

use crate::terminal::colors;
use crate::terminal::logging::PRINT_TARGET;

pub const TOTAL_WIDTH: usize = 64;
const KEY_WIDTH: usize = 8;
const TREE_KEY_WIDTH: usize = 7;

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("")
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg)
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn banner(no_banner: bool, q_level: u8) {
    if no_banner || q_level > 0 {
        return;
    }

    let text_content: String = format!("⟦ SWEEPR v{} ⟧ ", env!("CARGO_PKG_VERSION"));
    let text_width: usize = console::measure_text_width(&text_content);
    let text: ColoredString = text_content.bright_green().bold();
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2).bright_black();
    let output: String = format!("{}{}{}", sep, text, sep);

    print(&output);
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }

    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = formatted.chars().count();

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().bright_green(),
        "─".repeat(right)
    )
    .bright_black();

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).bright_black();
    print(&format!("{}", sep));
}

/// Dots plus colon that pad `key` out to `width` columns.
fn leader(key: &str, width: usize) -> String {
    format!("{}:", ".".repeat(width.saturating_sub(key.chars().count())))
}

/// `> Key.....: value`, keys padded so values line up.
pub fn aligned_line(key: &str, value: impl AsRef<str>) {
    print_status(format!(
        "{}{} {}",
        key.color(colors::PRIMARY),
        leader(key, KEY_WIDTH + 1).color(colors::SEPARATOR),
        value.as_ref().color(colors::TEXT_DEFAULT)
    ));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    let message: String = format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT));
    print(&message);
}

pub fn tree_head(idx: usize, name: &str) {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    let output: String = format!(
        "{} {}",
        idx_str.color(colors::SEPARATOR),
        name.color(colors::PRIMARY)
    );
    print(&output);
}

pub fn as_tree_one_level(key_value_pair: Vec<(String, ColoredString)>) {
    for (i, (key, value)) in key_value_pair.iter().enumerate() {
        let last: bool = i + 1 == key_value_pair.len();
        let branch: ColoredString = if !last {
            "├─".bright_black()
        } else {
            "└─".bright_black()
        };
        let output: String = format!(
            " {} {}{} {}",
            branch,
            key.color(colors::TEXT_DEFAULT),
            leader(key, TREE_KEY_WIDTH).color(colors::SEPARATOR),
            value
        );
        print(&output);
    }
}

pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}{}", space, msg, space));
}

pub fn no_results(what: &str) {
    centerln(&format!("{}", format!("no {what} found").red().bold()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_pads_keys_to_a_common_column() {
        assert_eq!(leader("Target", KEY_WIDTH + 1), "...:");
        assert_eq!(leader("Flags", KEY_WIDTH + 1), "....:");
        assert_eq!(format!("Port{}", leader("Port", TREE_KEY_WIDTH)).len(), TREE_KEY_WIDTH + 1);
    }

    #[test]
    fn mprint_fits_in_expression_position() {
        for quiet in 0..3u8 {
            match quiet {
                2 => crate::mprint!("10.0.0.1"),
                _ => crate::mprint!(),
            }
        }
    }

    #[test]
    fn overlong_key_gets_only_the_colon() {
        assert_eq!(leader("Interfaces", KEY_WIDTH + 1), ":");
    }
}
