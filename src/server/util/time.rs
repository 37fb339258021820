#[cfg(not(test))]
use chrono::{DateTime, Utc};

pub(crate) mod helper {
    #[cfg(not(test))]
    pub use super::get_utc_now;
    #[cfg(test)]
    pub use super::mock_chrono::{get_utc_now, set_mock_now};
}

#[cfg(test)]
mod mock_chrono {
    use chrono::{DateTime, Utc};
    use std::cell::Cell;

    thread_local! {
        static MOCK_NOW_MILLIS: Cell<i64> = const { Cell::new(0) };
    }

    pub fn get_utc_now() -> DateTime<Utc> {
        MOCK_NOW_MILLIS
            .with(|now| DateTime::<Utc>::from_timestamp_millis(now.get()))
            .expect("invalid timestamp")
    }

    /// pin the clock of the current test thread
    pub fn set_mock_now(millis: i64) {
        MOCK_NOW_MILLIS.with(|now| now.set(millis));
    }
}

#[cfg(not(test))]
pub fn get_utc_now() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::helper::{get_utc_now, set_mock_now};

    #[test]
    fn mock_clock_is_settable() {
        set_mock_now(1_700_000_000_123);
        assert_eq!(get_utc_now().timestamp_millis(), 1_700_000_000_123);
    }
}
