//! IETF BCP 47 (RFC 5646) language tag syntax check.
//!
//! Only the well-formedness production of RFC 5646 section 2.1 is checked.
//! Registry validity (whether `xx` is an assigned language subtag) is not.

use regex::Regex;
use std::sync::OnceLock;

static LANGUAGE_TAG_RE: OnceLock<Regex> = OnceLock::new();

fn language_tag_re() -> &'static Regex {
    LANGUAGE_TAG_RE.get_or_init(|| {
        Regex::new(
            r"(?x)^(?:
                (?:
                    (?:[A-Za-z]{2,3}(?:-[A-Za-z]{3}){0,3}|[A-Za-z]{4}|[A-Za-z]{5,8})
                    (?:-[A-Za-z]{4})?
                    (?:-(?:[A-Za-z]{2}|[0-9]{3}))?
                    (?:-(?:[A-Za-z0-9]{5,8}|[0-9][A-Za-z0-9]{3}))*
                    (?:-[0-9A-WY-Za-wy-z](?:-[A-Za-z0-9]{2,8})+)*
                    (?:-[xX](?:-[A-Za-z0-9]{1,8})+)?
                )
                |[xX](?:-[A-Za-z0-9]{1,8})+
                |(?i:
                    en-GB-oed|i-ami|i-bnn|i-default|i-enochian|i-hak|i-klingon|i-lux
                    |i-mingo|i-navajo|i-pwn|i-tao|i-tay|i-tsu|sgn-BE-FR|sgn-BE-NL|sgn-CH-DE
                    |art-lojban|cel-gaulish|no-bok|no-nyn|zh-guoyu|zh-hakka|zh-min|zh-min-nan
                    |zh-xiang
                )
            )$",
        )
        .expect("language tag pattern is valid")
    })
}

/// Returns `true` when `tag` is a well-formed BCP 47 language tag.
pub fn is_valid_language_tag(tag: &str) -> bool {
    !tag.is_empty() && language_tag_re().is_match(tag)
}
