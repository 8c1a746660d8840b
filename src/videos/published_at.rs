use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const HOURS_PER_DAY: i64 = 24;
const DAYS_PER_MONTH: i64 = 30;

/// Renders how long ago `iso_date` was, relative to `now`, as
/// `"Hace N hora(s)" | "Hace N dia(s)" | "Hace N mes(es)"`.
///
/// Unparseable and future timestamps both render as zero hours. Months are
/// the coarsest unit; there is no year tier.
pub fn format_published_at(iso_date: &str, now: DateTime<Utc>) -> String {
    let Some(published_at) = parse_timestamp(iso_date) else {
        return zero_hours();
    };

    let diff = now.signed_duration_since(published_at);
    if diff <= chrono::Duration::zero() {
        return zero_hours();
    }

    let total_hours = diff.num_hours();
    if total_hours < HOURS_PER_DAY {
        return format_amount(total_hours, "hora", "horas");
    }

    let total_days = total_hours / HOURS_PER_DAY;
    if total_days < DAYS_PER_MONTH {
        return format_amount(total_days, "dia", "dias");
    }

    format_amount(total_days / DAYS_PER_MONTH, "mes", "meses")
}

fn zero_hours() -> String {
    format_amount(0, "hora", "horas")
}

fn format_amount(value: i64, singular: &str, plural: &str) -> String {
    let unit = if value == 1 { singular } else { plural };
    format!("Hace {value} {unit}")
}

/// RFC 3339 first, then offset-less forms read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2026-02-25T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn hours_below_a_day() {
        assert_eq!(
            format_published_at("2026-02-25T09:00:00.000Z", now()),
            "Hace 3 horas"
        );
        assert_eq!(
            format_published_at("2026-02-25T10:30:00Z", now()),
            "Hace 1 hora"
        );
    }

    #[test]
    fn days_below_a_month() {
        assert_eq!(
            format_published_at("2026-02-20T12:00:00.000Z", now()),
            "Hace 5 dias"
        );
        assert_eq!(
            format_published_at("2026-02-24T11:00:00Z", now()),
            "Hace 1 dia"
        );
    }

    #[test]
    fn months_from_thirty_days_on() {
        assert_eq!(
            format_published_at("2025-12-25T12:00:00.000Z", now()),
            "Hace 2 meses"
        );
        assert_eq!(
            format_published_at("2026-01-26T12:00:00Z", now()),
            "Hace 1 mes"
        );
        assert_eq!(
            format_published_at("2020-02-25T12:00:00Z", now()),
            "Hace 73 meses"
        );
    }

    #[test]
    fn invalid_and_future_dates_are_zero_hours() {
        assert_eq!(format_published_at("invalid-date", now()), "Hace 0 horas");
        assert_eq!(format_published_at("", now()), "Hace 0 horas");
        assert_eq!(
            format_published_at("2026-03-01T12:00:00.000Z", now()),
            "Hace 0 horas"
        );
        assert_eq!(
            format_published_at("2026-02-25T12:00:00Z", now()),
            "Hace 0 horas"
        );
    }

    #[test]
    fn honours_offsets_and_offsetless_forms() {
        assert_eq!(
            format_published_at("2026-02-25T10:00:00+01:00", now()),
            "Hace 3 horas"
        );
        assert_eq!(
            format_published_at("2026-02-25T07:00:00", now()),
            "Hace 5 horas"
        );
        assert_eq!(format_published_at("2026-02-23", now()), "Hace 2 dias");
    }
}
