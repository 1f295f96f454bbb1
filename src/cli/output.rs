//! Output formatting for CLI

use crate::{
    arena::{MatchSession, RewardSignal},
    types::Side,
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Format a learning signal the way a learner receives it
pub fn format_signal(signal: RewardSignal) -> String {
    format!("{:+.2}", signal.signed())
}

/// One-line status of both fighters
pub fn status_line(session: &MatchSession) -> String {
    let fighter = |side: Side| {
        let c = session.combatant(side);
        let guard = if c.armor_active() { " [guard]" } else { "" };
        format!(
            "{side} HP {:>3}/{} MP {:>3}/{} Arrows {:>2}{guard}",
            c.hp(),
            c.max_hp(),
            c.mana(),
            c.max_mana(),
            c.ammo()
        )
    };
    format!(
        "{} | {} | distance {:.1} ({})",
        fighter(Side::Player),
        fighter(Side::Enemy),
        session.field().separation(),
        session.regime()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7), "7");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_status_line_mentions_both_sides() {
        let session = MatchSession::standard(Default::default());
        let line = status_line(&session);
        assert!(line.starts_with("Red HP 100/100 MP  80/120"));
        assert!(line.contains("Blue HP"));
        assert!(line.ends_with("distance 15.0 (far)"));
    }
}
