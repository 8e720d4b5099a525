//! Permissive version values.
//!
//! Package versions in the wild are sloppy: `v1.2`, `1.0rc1`, `2.1.0-beta`,
//! `1.10.0.post2`. [`LooseVersion`] accepts all of them and provides a weak
//! total ordering instead of rejecting anything that is not strict semver.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// One piece of a parsed version.
///
/// Numbers keep their digits without leading zeros, so runs of any length
/// stay numeric.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Component {
    Number(String),
    Text(String),
}

impl Component {
    fn number(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        Component::Number(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Component::Number(a), Component::Number(b)) => {
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            }
            (Component::Text(a), Component::Text(b)) => a.cmp(b),
            // Mixed kinds fall back to case-insensitive textual order.
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Number(n) => write!(f, "{}", n),
            Component::Text(s) => f.write_str(s),
        }
    }
}

/// A version compared component by component.
///
/// Runs of digits compare numerically, runs of letters compare as lowercase
/// text, and punctuation only separates components. A version that is a
/// prefix of another sorts first, so `1.2 < 1.2.0 < 1.2.1`.
///
/// # Example
///
/// ```
/// use buildreq::LooseVersion;
///
/// let old: LooseVersion = "1.9".parse().unwrap();
/// let new: LooseVersion = "v1.10".parse().unwrap();
/// assert!(old < new);
/// assert_eq!(new.to_string(), "v1.10");
/// ```
#[derive(Debug, Clone)]
pub struct LooseVersion {
    text: String,
    components: Vec<Component>,
}

impl LooseVersion {
    /// Parse a version string. Never fails.
    pub fn parse(input: &str) -> Self {
        let text = input.trim().to_string();

        let mut body = text.as_str();
        let mut chars = body.chars();
        if let (Some('v' | 'V'), Some(next)) = (chars.next(), chars.next()) {
            if next.is_ascii_digit() {
                body = &body[1..];
            }
        }

        Self {
            components: split_components(body),
            text,
        }
    }

    /// The trimmed text this version was parsed from.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the version has no comparable components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Numeric components up to the first non-numeric one.
    ///
    /// `3.6.1rc2` yields `[3, 6, 1]`. Stops early at a number too large for
    /// `u64`.
    pub fn numeric_prefix(&self) -> Vec<u64> {
        self.components
            .iter()
            .map_while(|c| match c {
                Component::Number(n) => n.parse().ok(),
                Component::Text(_) => None,
            })
            .collect()
    }
}

fn split_components(body: &str) -> Vec<Component> {
    let mut components = Vec::new();
    let mut current = String::new();
    let mut digits = false;

    let flush = |current: &mut String, digits: bool, components: &mut Vec<Component>| {
        if current.is_empty() {
            return;
        }
        let component = if digits {
            Component::number(current)
        } else {
            Component::Text(current.to_lowercase())
        };
        components.push(component);
        current.clear();
    };

    for c in body.chars() {
        if c.is_ascii_digit() {
            if !digits {
                flush(&mut current, digits, &mut components);
                digits = true;
            }
            current.push(c);
        } else if c.is_alphabetic() {
            if digits {
                flush(&mut current, digits, &mut components);
                digits = false;
            }
            current.push(c);
        } else {
            flush(&mut current, digits, &mut components);
        }
    }
    flush(&mut current, digits, &mut components);

    components
}

impl Ord for LooseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.components.iter().zip(other.components.iter()) {
            match a.compare(b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        self.components.len().cmp(&other.components.len())
    }
}

impl PartialOrd for LooseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LooseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LooseVersion {}

impl FromStr for LooseVersion {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for LooseVersion {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for LooseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for LooseVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for LooseVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::parse(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> LooseVersion {
        LooseVersion::parse(s)
    }

    #[test]
    fn numeric_components_compare_numerically() {
        assert!(v("1.9") < v("1.10"));
        assert!(v("1.18") > v("1.16"));
        assert!(v("2.0") > v("1.99.99"));
    }

    #[test]
    fn prefix_sorts_first() {
        assert!(v("1.2") < v("1.2.0"));
        assert!(v("1.2.0") < v("1.2.1"));
    }

    #[test]
    fn leading_zeros_are_equal() {
        assert_eq!(v("1.0"), v("1.00"));
        assert_ne!(v("1.0"), v("1.0.0"));
    }

    #[test]
    fn v_prefix_is_ignored() {
        assert_eq!(v("v12.4.0"), v("12.4.0"));
        assert_eq!(v("V3"), v("3"));
    }

    #[test]
    fn v_without_digit_is_text() {
        let version = v("version");
        assert!(!version.is_empty());
        assert!(version.numeric_prefix().is_empty());
    }

    #[test]
    fn text_components_are_case_insensitive() {
        assert_eq!(v("1.0RC1"), v("1.0rc1"));
        assert!(v("1.0a") < v("1.0b"));
    }

    #[test]
    fn mixed_components_fall_back_to_text_order() {
        // "1" < "rc" as text
        assert!(v("1.0.1") < v("1.0rc"));
    }

    #[test]
    fn punctuation_separates_components() {
        assert_eq!(v("2.1.0-beta"), v("2.1.0.beta"));
        assert_eq!(v("1_62"), v("1.62"));
    }

    #[test]
    fn display_keeps_original_text() {
        assert_eq!(v("  v1.2-rc1 ").to_string(), "v1.2-rc1");
    }

    #[test]
    fn numeric_prefix_stops_at_text() {
        assert_eq!(v("3.6.1rc2").numeric_prefix(), vec![3, 6, 1]);
        assert_eq!(v("11.4.0").numeric_prefix(), vec![11, 4, 0]);
    }

    #[test]
    fn empty_version_has_no_components() {
        assert!(v("").is_empty());
        assert!(v("...").is_empty());
        assert!(v("") < v("0"));
    }

    #[test]
    fn huge_numbers_compare_numerically() {
        let big = v("99999999999999999999999.1");
        assert!(!big.is_empty());
        assert!(big > v("18446744073709551615.9"));
        assert!(v("100000000000000000000") > v("10"));
        assert_eq!(v("000100000000000000000000"), v("100000000000000000000000"));
        assert!(big.numeric_prefix().is_empty());
    }

    #[test]
    fn ordering_is_transitive_across_huge_numbers() {
        let huge = v("100000000000000000000");
        let two = v("2");
        let ten = v("10");
        assert!(two < ten);
        assert!(ten < huge);
        assert!(two < huge);

        let mut versions = vec![huge.clone(), ten.clone(), two.clone()];
        versions.sort();
        assert_eq!(versions, vec![two, ten, huge.clone()]);
        assert_eq!(vec![v("2"), v("10"), huge.clone()].into_iter().max(), Some(huge));
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&v("1.18")).unwrap();
        assert_eq!(json, "\"1.18\"");
        let back: LooseVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v("1.18"));
    }
}
