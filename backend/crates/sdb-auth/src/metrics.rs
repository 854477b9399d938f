use sdb_core::AuthLevel;

use metrics::counter;

/// Counters for authentication outcomes
#[derive(Clone)]
pub struct AuthMetrics {
    prefix: &'static str,
}

impl AuthMetrics {
    pub fn new() -> Self {
        Self { prefix: "sdb_auth" }
    }

    /// Record credentials being presented, labelled "basic" or "bearer"
    pub fn attempt(&self, method: &str) {
        counter!(format!("{}.attempts", self.prefix)).increment(1);
        counter!(format!("{}.attempts.{}", self.prefix, method)).increment(1);
    }

    pub fn success(&self, level: AuthLevel) {
        counter!(format!("{}.success", self.prefix)).increment(1);
        counter!(format!("{}.success.{}", self.prefix, level.as_str())).increment(1);
    }

    /// Record a rejected request by its error code
    pub fn failure(&self, code: &str) {
        counter!(format!("{}.failure", self.prefix)).increment(1);
        counter!(format!("{}.failure.{}", self.prefix, code)).increment(1);
    }

    /// Request carried no recognised credentials
    pub fn anonymous(&self) {
        counter!(format!("{}.anonymous", self.prefix)).increment(1);
    }
}

impl Default for AuthMetrics {
    fn default() -> Self {
        Self::new()
    }
}
