//! UTC trading-session gate

use crate::error::ConfigError;

/// Half-open hour range `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionWindow {
    start_hour: u32,
    end_hour: u32,
}

impl SessionWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self, ConfigError> {
        if end_hour > 24 || start_hour >= end_hour {
            return Err(ConfigError::Constraint(format!(
                "session hours must satisfy 0 <= start < end <= 24, got [{}, {})",
                start_hour, end_hour
            )));
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour < self.end_hour
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }
}

impl Default for SessionWindow {
    fn default() -> Self {
        Self {
            start_hour: 5,
            end_hour: 22,
        }
    }
}
