use serde::de::{self, Visitor};
use serde::Deserializer;
use std::fmt;

use crate::stun::CookieMode;

/**
 * Compliance type definition: which RFC the outgoing requests follow
 */

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Compliance {
    /**
     * Classic STUN. Requests carry a zero magic cookie and servers are expected
     * to answer with MAPPED-ADDRESS / CHANGED-ADDRESS
     * https://datatracker.ietf.org/doc/html/rfc3489
     */
    RFC3489,
    /**
     * Requests carry the 0x2112A442 magic cookie, servers answer with XOR-MAPPED-ADDRESS
     * https://datatracker.ietf.org/doc/html/rfc5389
     */
    #[default]
    RFC5389,
    /**
     * NAT behaviour discovery. Same header as RFC 5389, servers add OTHER-ADDRESS
     * https://datatracker.ietf.org/doc/html/rfc5780
     */
    RFC5780,
}

impl Compliance {
    /**
     * Returns the string representation of the compliance level.
     *
     * @return A string slice representing the compliance level.
     */
    pub fn as_str(&self) -> &str {
        match *self {
            Compliance::RFC3489 => "RFC3489",
            Compliance::RFC5389 => "RFC5389",
            Compliance::RFC5780 => "RFC5780",
        }
    }

    /**
     * The magic cookie mode requests are built with
     */
    pub fn cookie_mode(&self) -> CookieMode {
        match *self {
            Compliance::RFC3489 => CookieMode::Legacy,
            Compliance::RFC5389 | Compliance::RFC5780 => CookieMode::Rfc5389,
        }
    }
}

impl std::str::FromStr for Compliance {
    type Err = ();

    /**
     * Parse a string into a `Compliance` enum. Unrecognised values fall back to RFC 5389.
     */
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rfc3489" | "legacy" => Ok(Compliance::RFC3489),
            "rfc5389" => Ok(Compliance::RFC5389),
            "rfc5780" => Ok(Compliance::RFC5780),
            _ => Ok(Compliance::RFC5389),
        }
    }
}

/**
 * Deserialize the compliance level from the configuration file.
 *
 * Anything that is not a recognised string yields RFC 5389.
 */
pub fn deserialize<'de, D>(deserializer: D) -> Result<Compliance, D::Error>
where
    D: Deserializer<'de>,
{
    match deserializer.deserialize_str(ComplianceVisitor) {
        Ok(c) => Ok(c),
        Err(_) => Ok(Compliance::RFC5389),
    }
}

struct ComplianceVisitor;

impl<'de> Visitor<'de> for ComplianceVisitor {
    type Value = Compliance;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string representing a compliance level")
    }

    fn visit_str<E>(self, value: &str) -> Result<Compliance, E>
    where
        E: de::Error,
    {
        value
            .parse::<Compliance>()
            .map_err(|_| de::Error::unknown_variant(value, &["rfc3489", "rfc5389", "rfc5780"]))
    }
}
