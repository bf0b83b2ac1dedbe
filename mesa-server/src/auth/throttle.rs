//! Login throttling
//!
//! 按用户名统计连续失败次数；窗口内超限直接拒绝，
//! 成功登录清零。配合 handler 里的固定延迟防时序攻击。

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Failures allowed before the lockout kicks in
const MAX_FAILURES: u32 = 5;

/// Lockout / counting window
const WINDOW: Duration = Duration::from_secs(300);

#[derive(Debug, Default)]
pub struct LoginThrottle {
    attempts: DashMap<String, (u32, Instant)>,
}

impl LoginThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this username is currently locked out
    pub fn is_locked(&self, username: &str) -> bool {
        match self.attempts.get(username) {
            Some(entry) => {
                let (count, since) = *entry;
                count >= MAX_FAILURES && since.elapsed() < WINDOW
            }
            None => false,
        }
    }

    /// Record a failed attempt; counts reset once the window passes
    pub fn record_failure(&self, username: &str) {
        let mut entry = self
            .attempts
            .entry(username.to_string())
            .or_insert((0, Instant::now()));
        let (count, since) = *entry;
        if since.elapsed() >= WINDOW {
            *entry = (1, Instant::now());
        } else {
            *entry = (count + 1, since);
        }
    }

    /// Successful login clears the counter
    pub fn clear(&self, username: &str) {
        self.attempts.remove(username);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locks_after_max_failures() {
        let throttle = LoginThrottle::new();
        assert!(!throttle.is_locked("eve"));
        for _ in 0..MAX_FAILURES {
            throttle.record_failure("eve");
        }
        assert!(throttle.is_locked("eve"));

        // Other users are unaffected
        assert!(!throttle.is_locked("alice"));

        throttle.clear("eve");
        assert!(!throttle.is_locked("eve"));
    }
}
