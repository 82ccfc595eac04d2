//! Form fields and submission validation.

use chrono::NaiveDate;
use thiserror::Error;

use crate::phone;

/// Minimum characters in a name.
pub const MIN_NAME_CHARS: usize = 2;

/// Minimum digits in a phone number, counting every digit in the field.
pub const MIN_PHONE_DIGITS: usize = 8;

/// Date format produced by `<input type="date">`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The form inputs the handler reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Service,
    Name,
    Phone,
    Date,
    Time,
    Notes,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Service,
        Field::Name,
        Field::Phone,
        Field::Date,
        Field::Time,
        Field::Notes,
    ];

    /// Element id of the input on the page.
    pub fn element_id(self) -> &'static str {
        match self {
            Field::Service => "bookingService",
            Field::Name => "bookingName",
            Field::Phone => "bookingPhone",
            Field::Date => "bookingDate",
            Field::Time => "bookingTime",
            Field::Notes => "bookingNotes",
        }
    }
}

/// Values read from the form, with `name`, `phone` and `notes` trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingRequest {
    pub service: String,
    pub name: String,
    pub phone: String,
    pub date: String,
    pub time: String,
    pub notes: String,
}

impl BookingRequest {
    /// Build a request from raw field values, reading them in [`Field::ALL`]
    /// order and stopping at the first failed read.
    pub fn read_from<E>(mut read: impl FnMut(Field) -> Result<String, E>) -> Result<Self, E> {
        Ok(Self {
            service: read(Field::Service)?,
            name: read(Field::Name)?.trim().to_string(),
            phone: read(Field::Phone)?.trim().to_string(),
            date: read(Field::Date)?,
            time: read(Field::Time)?,
            notes: read(Field::Notes)?.trim().to_string(),
        })
    }
}

/// Why a submission was rejected. `Display` is the message shown to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter your full name (minimum 2 characters)")]
    NameTooShort,
    #[error("Please enter a valid Omani phone number")]
    InvalidPhone,
    #[error("Please select a date")]
    MissingDate,
    #[error("Please select a time")]
    MissingTime,
    #[error("Please select a valid date")]
    InvalidDate,
    #[error("Please select a future date")]
    DateNotInFuture,
}

impl ValidationError {
    /// The input that receives focus after the rejection.
    pub fn field(self) -> Field {
        match self {
            Self::NameTooShort => Field::Name,
            Self::InvalidPhone => Field::Phone,
            Self::MissingDate | Self::InvalidDate | Self::DateNotInFuture => Field::Date,
            Self::MissingTime => Field::Time,
        }
    }
}

/// Run the checks in their fixed order, stopping at the first failure.
///
/// On success returns the parsed appointment date.
pub fn validate(request: &BookingRequest, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    if request.name.chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::NameTooShort);
    }

    if phone::digit_count(&request.phone) < MIN_PHONE_DIGITS {
        return Err(ValidationError::InvalidPhone);
    }

    if request.date.is_empty() {
        return Err(ValidationError::MissingDate);
    }

    if request.time.is_empty() {
        return Err(ValidationError::MissingTime);
    }

    let date = NaiveDate::parse_from_str(request.date.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate)?;

    // Today itself does not count as the future.
    if date <= today {
        return Err(ValidationError::DateNotInFuture);
    }

    Ok(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn valid() -> BookingRequest {
        BookingRequest {
            service: "Haircut".into(),
            name: "Aisha Said".into(),
            phone: "+968 9234 5678".into(),
            date: "2026-10-17".into(),
            time: "14:00".into(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert_eq!(
            validate(&valid(), today()),
            Ok(NaiveDate::from_ymd_opt(2026, 10, 17).unwrap())
        );
    }

    #[test]
    fn test_short_name_rejected() {
        let request = BookingRequest {
            name: "A".into(),
            ..valid()
        };
        let err = validate(&request, today()).unwrap_err();
        assert_eq!(err, ValidationError::NameTooShort);
        assert_eq!(err.field(), Field::Name);
    }

    #[test]
    fn test_two_char_multibyte_name_accepted() {
        let request = BookingRequest {
            name: "عل".into(),
            ..valid()
        };
        assert!(validate(&request, today()).is_ok());
    }

    #[test]
    fn test_phone_needs_eight_digits() {
        for phone in ["", "+968 1234 ", "+968 1234", "1234567"] {
            let request = BookingRequest {
                phone: phone.into(),
                ..valid()
            };
            assert_eq!(
                validate(&request, today()),
                Err(ValidationError::InvalidPhone),
                "phone {phone:?}"
            );
        }

        let unformatted = BookingRequest {
            phone: "92345678".into(),
            ..valid()
        };
        assert!(validate(&unformatted, today()).is_ok());
    }

    #[test]
    fn test_mask_prefix_digits_count() {
        // "+968 1234 5" carries eight digits in total.
        let request = BookingRequest {
            phone: phone::format_phone("12345"),
            ..valid()
        };
        assert_eq!(request.phone, "+968 1234 5");
        assert!(validate(&request, today()).is_ok());
    }

    #[test]
    fn test_missing_date_then_time() {
        let request = BookingRequest {
            date: String::new(),
            time: String::new(),
            ..valid()
        };
        assert_eq!(validate(&request, today()), Err(ValidationError::MissingDate));

        let request = BookingRequest {
            time: String::new(),
            ..valid()
        };
        let err = validate(&request, today()).unwrap_err();
        assert_eq!(err, ValidationError::MissingTime);
        assert_eq!(err.field(), Field::Time);
    }

    #[test]
    fn test_today_and_past_rejected() {
        for date in ["2026-10-16", "2026-10-15", "2020-01-01"] {
            let request = BookingRequest {
                date: date.into(),
                ..valid()
            };
            assert_eq!(
                validate(&request, today()),
                Err(ValidationError::DateNotInFuture),
                "date {date}"
            );
        }
    }

    #[test]
    fn test_unparseable_date_rejected() {
        let request = BookingRequest {
            date: "next tuesday".into(),
            ..valid()
        };
        let err = validate(&request, today()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidDate);
        assert_eq!(err.field(), Field::Date);
    }

    #[test]
    fn test_order_name_before_phone() {
        let request = BookingRequest {
            name: String::new(),
            phone: String::new(),
            ..valid()
        };
        assert_eq!(validate(&request, today()), Err(ValidationError::NameTooShort));
    }

    #[test]
    fn test_read_from_trims_text_inputs() {
        let request = BookingRequest::read_from(|field| {
            Ok::<_, ()>(match field {
                Field::Name => "  Aisha  ".to_string(),
                Field::Phone => " +968 9234 5678 ".to_string(),
                Field::Notes => "\tfringe only\n".to_string(),
                Field::Time => " 14:00 ".to_string(),
                other => other.element_id().to_string(),
            })
        })
        .unwrap();
        assert_eq!(request.name, "Aisha");
        assert_eq!(request.phone, "+968 9234 5678");
        assert_eq!(request.notes, "fringe only");
        assert_eq!(request.time, " 14:00 ");
        assert_eq!(request.service, "bookingService");
    }

    #[test]
    fn test_read_from_stops_at_first_failure() {
        let mut seen = Vec::new();
        let result = BookingRequest::read_from(|field| {
            seen.push(field);
            if field == Field::Phone { Err(field.element_id()) } else { Ok(String::new()) }
        });
        assert_eq!(result, Err("bookingPhone"));
        assert_eq!(seen, [Field::Service, Field::Name, Field::Phone]);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::InvalidPhone.to_string(),
            "Please enter a valid Omani phone number"
        );
        assert_eq!(
            ValidationError::DateNotInFuture.to_string(),
            "Please select a future date"
        );
    }
}
