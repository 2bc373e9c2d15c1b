//! Interpretation of console answers. Input is already trimmed.

pub const QUIT_TOKEN: &str = "q";

pub fn is_quit(input: &str) -> bool {
    input.eq_ignore_ascii_case(QUIT_TOKEN)
}

pub fn is_yes(input: &str) -> bool {
    input.eq_ignore_ascii_case("y") || input.eq_ignore_ascii_case("yes")
}

pub fn is_no(input: &str) -> bool {
    input.eq_ignore_ascii_case("n") || input.eq_ignore_ascii_case("no")
}

/// Parses a 1-based menu choice; bounds are checked against the inventory.
pub fn parse_choice(input: &str) -> Option<usize> {
    input.parse::<usize>().ok()
}

/// Parses a quantity strictly greater than zero.
pub fn parse_quantity(input: &str) -> Option<u32> {
    input.parse::<u32>().ok().filter(|qty| *qty > 0)
}
