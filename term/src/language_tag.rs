//! I check that language tags are well-formed
//! according to the `LANGTAG` production of
//! [Turtle](https://www.w3.org/TR/turtle/#grammar-production-LANGTAG) (without the leading `@`).
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LANG_TAG: Regex = Regex::new(r"^[a-zA-Z]{1,8}(-[a-zA-Z0-9]{1,8})*$").unwrap();
}

/// Whether `tag` is a well-formed language tag.
pub fn is_valid_language_tag(tag: &str) -> bool {
    LANG_TAG.is_match(tag)
}
