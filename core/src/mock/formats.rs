#![deny(missing_docs)]

//! # Format Values
//!
//! Synthetic values for the string `format`s the synthesizer knows about.
//! Every value is drawn from the caller's rng.

use chrono::{SecondsFormat, TimeZone, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Filler vocabulary for untyped values and format parts.
pub(crate) const WORDS: [&str; 12] = [
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "tempor", "magna",
];

const TLDS: [&str; 4] = ["com", "org", "net", "io"];

// 2000-01-01T00:00:00Z ..= 2030-12-31T23:59:59Z
const EARLIEST: i64 = 946_684_800;
const LATEST: i64 = 1_924_991_999;

/// Picks one filler word.
pub(crate) fn word<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    WORDS.choose(rng).copied().unwrap_or("lorem")
}

fn tld<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    TLDS.choose(rng).copied().unwrap_or("com")
}

/// A value for `format`, or `None` when the format is not recognised.
pub(crate) fn format_value<R: Rng + ?Sized>(format: &str, rng: &mut R) -> Option<Value> {
    let text = match format {
        "date" => timestamp(rng)?.format("%Y-%m-%d").to_string(),
        "date-time" => timestamp(rng)?.to_rfc3339_opts(SecondsFormat::Secs, true),
        "email" => format!(
            "{}{}@{}.{}",
            word(rng),
            rng.gen_range(1..=999),
            word(rng),
            tld(rng)
        ),
        "uri" | "url" => format!("https://{}.{}/{}", word(rng), tld(rng), word(rng)),
        "uuid" => {
            let mut bytes = [0u8; 16];
            rng.fill_bytes(&mut bytes);
            uuid::Builder::from_random_bytes(bytes)
                .into_uuid()
                .to_string()
        }
        "hostname" => format!("{}.{}", word(rng), tld(rng)),
        "ipv4" => {
            let mut octets = [0u8; 4];
            rng.fill_bytes(&mut octets);
            Ipv4Addr::from(octets).to_string()
        }
        "ipv6" => {
            let mut octets = [0u8; 16];
            rng.fill_bytes(&mut octets);
            Ipv6Addr::from(octets).to_string()
        }
        _ => return None,
    };
    Some(Value::String(text))
}

fn timestamp<R: Rng + ?Sized>(rng: &mut R) -> Option<chrono::DateTime<Utc>> {
    Utc.timestamp_opt(rng.gen_range(EARLIEST..=LATEST), 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn text(format: &str, seed: u64) -> String {
        let mut rng = StdRng::seed_from_u64(seed);
        format_value(format, &mut rng)
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap()
    }

    #[test]
    fn test_date_formats() {
        let date = text("date", 1);
        assert!(chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok());

        let date_time = text("date-time", 2);
        assert!(chrono::DateTime::parse_from_rfc3339(&date_time).is_ok());
        assert!(date_time.ends_with('Z'));
    }

    #[test]
    fn test_uuid_is_v4() {
        let id = uuid::Uuid::parse_str(&text("uuid", 3)).unwrap();
        assert_eq!(id.get_version_num(), 4);
    }

    #[test]
    fn test_network_formats() {
        assert!(text("ipv4", 4).parse::<Ipv4Addr>().is_ok());
        assert!(text("ipv6", 5).parse::<Ipv6Addr>().is_ok());
        assert!(url::Url::parse(&text("uri", 6)).is_ok());

        let email = text("email", 7);
        let (local, domain) = email.split_once('@').unwrap();
        assert!(!local.is_empty());
        assert!(domain.contains('.'));

        assert!(!text("hostname", 8).contains('/'));
    }

    #[test]
    fn test_unknown_format() {
        let mut rng = StdRng::seed_from_u64(9);
        assert_eq!(format_value("binary", &mut rng), None);
    }
}
