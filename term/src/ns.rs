//! Standard and custom namespaces.
//!
//! This module provides:
//! * the [`namespace!`](../macro.namespace.html) macro, for declaring a set of IRIs sharing a prefix;
//! * the [`rdf`] and [`xsd`] namespaces, which are used throughout this workspace.
//!
//! Every term of a namespace is a `&'static str`,
//! so it can be compared with [`Literal::datatype`](crate::Literal::datatype)
//! or passed to [`Term::new_iri_unchecked`](crate::Term::new_iri_unchecked) directly.

/// Create a "namespace module"
/// defining a set of IRI constants within a given IRI space.
///
/// # Tests
/// This macro also creates a test module checking that all created IRIs are valid,
/// so the constants can be used unchecked at runtime.
#[macro_export]
macro_rules! namespace {
    ($iri_prefix:literal, $($suffix:ident),*; $($r_id:ident, $r_sf:literal),*) => {
        /// Prefix used in this namespace.
        pub const PREFIX: &str = $iri_prefix;
        $(
            /// Generated term.
            #[allow(non_upper_case_globals)]
            pub const $suffix: &str = concat!($iri_prefix, stringify!($suffix));
        )*
        $(
            /// Generated term.
            #[allow(non_upper_case_globals)]
            pub const $r_id: &str = concat!($iri_prefix, $r_sf);
        )*

        #[cfg(test)]
        mod test_valid_iri {
            $(
                #[allow(non_snake_case)]
                #[test]
                fn $suffix() {
                    assert!(::oxiri::Iri::parse(super::$suffix).is_ok());
                }
            )*
            $(
                #[allow(non_snake_case)]
                #[test]
                fn $r_id() {
                    assert!(::oxiri::Iri::parse(super::$r_id).is_ok());
                }
            )*
        }
    };
    ($iri_prefix:literal, $($suffix:ident),*) => {
        $crate::namespace!($iri_prefix, $($suffix),*;);
    };
}

/// The standard `rdf:` namespace.
#[rustfmt::skip]
pub mod rdf {
    namespace!(
        "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
        // classes
        Alt, Bag, HTML, JSON, List, PlainLiteral, Property, Seq, Statement, XMLLiteral, langString,
        // properties
        first, object, predicate, rest, subject, value,
        // individuals
        nil;
        type_, "type"
    );
}

/// The standard `xsd:` namespace.
#[rustfmt::skip]
pub mod xsd {
    namespace!(
        "http://www.w3.org/2001/XMLSchema#",
        anyURI, base64Binary, boolean, byte, date, dateTime, dateTimeStamp, decimal, double,
        duration, float, gDay, gMonth, gMonthDay, gYear, gYearMonth, hexBinary, int, integer,
        language, long, negativeInteger, nonNegativeInteger, nonPositiveInteger,
        normalizedString, positiveInteger, short, string, time, token, unsignedByte,
        unsignedInt, unsignedLong, unsignedShort
    );

    /// The datatypes whose values read back as numbers.
    pub const NUMERIC: &[&str] = &[
        byte, decimal, double, float, int, integer, long, negativeInteger,
        nonNegativeInteger, nonPositiveInteger, positiveInteger, short,
        unsignedByte, unsignedInt, unsignedLong, unsignedShort,
    ];

    /// Whether `datatype` is one of the [`NUMERIC`] datatypes.
    pub fn is_numeric(datatype: &str) -> bool {
        NUMERIC.contains(&datatype)
    }
}
