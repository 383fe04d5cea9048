//! Identifier types for routing entities.
//!
//! Newtypes keep destination and buyer identifiers from being mixed up when
//! they travel through the option universe and the decision tables.

use std::fmt;

/// Unique identifier for a delivery destination (discharge market).
///
/// # Examples
///
/// ```
/// use lng_core::types::DestinationId;
///
/// let id = DestinationId::new("Singapore");
/// assert_eq!(id.as_str(), "Singapore");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct DestinationId(String);

impl DestinationId {
    /// Creates a new destination ID.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DestinationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DestinationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for DestinationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Unique identifier for a buyer (offtake counterparty).
///
/// # Examples
///
/// ```
/// use lng_core::types::BuyerId;
///
/// let id = BuyerId::new("Gunvor");
/// assert_eq!(id.to_string(), "Gunvor");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BuyerId(String);

impl BuyerId {
    /// Creates a new buyer ID.
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuyerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for BuyerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for BuyerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
