use {
    crate::{constants::*, SignatureError},
    chrono::{
        format::{ParseError, ParseResult},
        offset::{FixedOffset, TimeZone},
        DateTime, NaiveDate, NaiveTime, Utc,
    },
    lazy_static::lazy_static,
    regex::{Captures, Regex},
    std::str::FromStr,
};

lazy_static! {
    /// ISO 8601 timestamp format, in either basic (`20130524T000000Z`) or extended (`2013-05-24T00:00:00Z`) form.
    static ref ISO_8601_REGEX: Regex = Regex::new(
        r"(?x)^
        (?P<year>\d{4})-?
        (?P<month>0[1-9]|1[0-2])-?
        (?P<day>0[1-9]|[12][0-9]|3[01])
        T
        (?P<hour>[01][0-9]|2[0-3]):?
        (?P<minute>[0-5][0-9]):?
        (?P<second>[0-5][0-9])
        (?:[.,](?P<frac>[0-9]+))?
        (?P<offset>[-+][01][0-9]:?[0-5][0-9]|Z)$").unwrap();

    static ref INVALID: ParseError = DateTime::<FixedOffset>::from_str("").unwrap_err();
}

pub trait ParseISO8601<T> {
    fn parse_from_iso8601(s: &str) -> ParseResult<T>;
}

/// Pull a named numeric group out of a successful match. The regex only admits digits in these groups.
fn capture_num<T: FromStr>(cap: &Captures, name: &str) -> ParseResult<T> {
    cap.name(name).and_then(|m| T::from_str(m.as_str()).ok()).ok_or(*INVALID)
}

impl ParseISO8601<DateTime<FixedOffset>> for DateTime<FixedOffset> {
    fn parse_from_iso8601(s: &str) -> ParseResult<DateTime<FixedOffset>> {
        let cap = ISO_8601_REGEX.captures(s).ok_or(*INVALID)?;

        let year: i32 = capture_num(&cap, "year")?;
        let month: u32 = capture_num(&cap, "month")?;
        let day: u32 = capture_num(&cap, "day")?;
        let hour: u32 = capture_num(&cap, "hour")?;
        let minute: u32 = capture_num(&cap, "minute")?;
        let second: u32 = capture_num(&cap, "second")?;

        let nanos = match cap.name("frac") {
            None => 0,
            Some(frac_match) => {
                let mut frac_str = frac_match.as_str().to_string();
                while frac_str.len() < 9 {
                    frac_str.push('0');
                }

                frac_str.truncate(9);
                u32::from_str(&frac_str).map_err(|_| *INVALID)?
            }
        };

        let offset_str = cap.name("offset").map(|m| m.as_str()).ok_or(*INVALID)?;
        let offset_secs = if offset_str == "Z" {
            0
        } else {
            // Must be [+-]HHMM once the colon is gone.
            let offset_condensed = offset_str.replace(':', "");
            let (sign_str, hm) = offset_condensed.split_at(1);
            let (hour_off_str, minute_off_str) = hm.split_at(2);

            let sign = if sign_str == "-" {
                -1
            } else {
                1
            };

            let hour = i32::from_str(hour_off_str).map_err(|_| *INVALID)?;
            let min = i32::from_str(minute_off_str).map_err(|_| *INVALID)?;
            sign * (hour * 3600 + min * 60)
        };

        // Day-of-month overflow (e.g. 2013-02-30) passes the regex but not chrono.
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or(*INVALID)?;
        let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nanos).ok_or(*INVALID)?;
        let offset = FixedOffset::east_opt(offset_secs).ok_or(*INVALID)?;
        offset.from_local_datetime(&date.and_time(time)).single().ok_or(*INVALID)
    }
}

/// Parse a caller-supplied timestamp (an `x-amz-date` header or a `request-date` property) and normalize it to UTC.
///
/// The `what` argument names the input in the error message.
pub(crate) fn parse_signing_timestamp(value: &str, what: &str) -> Result<DateTime<Utc>, String> {
    DateTime::<FixedOffset>::parse_from_iso8601(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("{} is not a valid ISO 8601 timestamp: {}", what, value))
}

/// Parse the `x-amz-date` header of a source request.
pub(crate) fn parse_amz_date_header(value: &str) -> Result<DateTime<Utc>, SignatureError> {
    parse_signing_timestamp(value, HDR_X_AMZ_DATE).map_err(SignatureError::MalformedHeader)
}

/// Render a timestamp in the compact form used in the string to sign and the `x-amz-date` header.
#[inline(always)]
pub(crate) fn format_amz_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(ISO8601_COMPACT_FORMAT).to_string()
}

/// Render the date stamp used in the credential scope.
#[inline(always)]
pub(crate) fn format_date_stamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(ISO8601_DATE_FORMAT).to_string()
}
