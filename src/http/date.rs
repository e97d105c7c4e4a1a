//! Fechas en formato HTTP (`Date`, `Last-Modified`).

use chrono::{DateTime, Utc};
use std::time::SystemTime;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Fecha actual, ej: `Sat, 17 Oct 2026 10:04:05 GMT`
pub fn now() -> String {
    format(Utc::now())
}

/// Formatea un instante del sistema de archivos (mtime)
pub fn from_system_time(time: SystemTime) -> String {
    format(DateTime::<Utc>::from(time))
}

fn format(time: DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_epoch() {
        assert_eq!(from_system_time(UNIX_EPOCH), "Thu, 01 Jan 1970 00:00:00 GMT");
    }

    #[test]
    fn test_known_instant() {
        let time = UNIX_EPOCH + Duration::from_secs(784_111_777);
        assert_eq!(from_system_time(time), "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[test]
    fn test_now_shape() {
        let date = now();
        assert!(date.ends_with(" GMT"));
        assert_eq!(date.len(), "Sun, 06 Nov 1994 08:49:37 GMT".len());
    }
}
