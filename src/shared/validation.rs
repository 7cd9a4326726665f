use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating country codes
    /// Must be exactly two letters, case-insensitive
    /// - Valid: "NL", "tl", "Cz"
    /// - Invalid: "N", "NLD", "N1", "#$@!", ""
    pub static ref COUNTRY_CODE_REGEX: Regex = Regex::new(r"^[A-Za-z]{2}$").unwrap();
}
