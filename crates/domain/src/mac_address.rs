use crate::errors::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 48-bit hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// All-zero address. Neighbor tables report it for unresolved entries, so it is
    /// treated the same as "no hardware address".
    pub const ZERO: Self = Self([0; 6]);

    pub const BROADCAST: Self = Self([0xff; 6]);

    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == Self::ZERO.0
    }

    fn parse_groups(s: &str, separator: char) -> Option<[u8; 6]> {
        let mut octets = [0u8; 6];
        let mut count = 0;
        for part in s.split(separator) {
            if count == 6
                || part.is_empty()
                || part.len() > 2
                || !part.bytes().all(|b| b.is_ascii_hexdigit())
            {
                return None;
            }
            octets[count] = u8::from_str_radix(part, 16).ok()?;
            count += 1;
        }
        (count == 6).then_some(octets)
    }

    fn parse_bare(s: &str) -> Option<[u8; 6]> {
        if s.len() != 12 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let mut octets = [0u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(octets)
    }
}

impl FromStr for MacAddress {
    type Err = DomainError;

    /// Accepts `aa:bb:cc:dd:ee:ff`, `aa-bb-cc-dd-ee-ff` and `aabbccddeeff`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let octets = if s.contains(':') {
            Self::parse_groups(s, ':')
        } else if s.contains('-') {
            Self::parse_groups(s, '-')
        } else {
            Self::parse_bare(s)
        };

        octets
            .map(Self)
            .ok_or_else(|| DomainError::InvalidMacAddress(s.to_string()))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_colon_separated() {
        let mac: MacAddress = "AA:bb:0c:dd:ee:FF".parse().unwrap();
        assert_eq!(mac.octets(), [0xaa, 0xbb, 0x0c, 0xdd, 0xee, 0xff]);
        assert_eq!(mac.to_string(), "aa:bb:0c:dd:ee:ff");
    }

    #[test]
    fn test_parse_dash_and_bare_forms() {
        let dashed: MacAddress = "aa-bb-cc-dd-ee-ff".parse().unwrap();
        let bare: MacAddress = "aabbccddeeff".parse().unwrap();
        assert_eq!(dashed, bare);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("aa:bb:cc:dd:ee".parse::<MacAddress>().is_err());
        assert!("aa:bb:cc:dd:ee:ff:00".parse::<MacAddress>().is_err());
        assert!("aa:bb:cc:dd:ee:gg".parse::<MacAddress>().is_err());
        assert!("aa:bb:cc:dd:ee:fff".parse::<MacAddress>().is_err());
        assert!("aa:bb-cc:dd:ee:ff".parse::<MacAddress>().is_err());
        assert!("".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_parse_rejects_sign_prefixed_groups() {
        assert!("+a:bb:cc:dd:ee:ff".parse::<MacAddress>().is_err());
        assert!("aa-bb-cc-dd-ee-+f".parse::<MacAddress>().is_err());
        assert!("+abbccddeeff".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(MacAddress::ZERO.is_zero());
        assert!("00:00:00:00:00:00".parse::<MacAddress>().unwrap().is_zero());
        assert!(!MacAddress::BROADCAST.is_zero());
    }
}
