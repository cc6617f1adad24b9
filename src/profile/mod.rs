// User profiles - per-user visit counts and session ratings

mod store;

pub use store::ProfileStore;

/// Durable per-user record: how often they have visited and how they
/// rated each completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Opaque case-sensitive identifier, doubles as the storage key.
    pub name: String,
    /// 1 on first contact, incremented in memory each time the profile
    /// is reopened. The stored value only changes at save.
    pub visits: u32,
    /// One record per completed session, in visit order.
    pub ratings: Vec<RatingRecord>,
}

impl Profile {
    /// Fresh profile for a first-time visitor.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            visits: 1,
            ratings: Vec::new(),
        }
    }
}

/// Satisfaction scores for one completed session, each in 1..=10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingRecord {
    /// Visit number that was active during the rated session.
    pub visit: u32,
    pub accuracy: u32,
    pub detail: u32,
    pub recommended: u32,
    pub overall: u32,
}
