use super::error::JobError;
use super::model::{Action, DEFAULT_TRIM_DURATION, DEFAULT_TRIM_START, TransformSpec};
use crate::common::timecode::parse_time;
use std::time::Duration;

/// Raw, unvalidated transform parameters as they arrive on the request.
#[derive(Debug, Clone, Default)]
pub struct TransformParams {
    pub start: Option<String>,
    pub duration: Option<String>,
}

/// Build a [`TransformSpec`] from an action name and its parameters.
///
/// A missing action means `compress`; an unrecognised one is rejected.
/// Missing trim parameters take their defaults (0s start, 10s duration),
/// malformed ones are rejected. Parameters are ignored for other actions.
pub fn resolve(action: Option<&str>, params: &TransformParams) -> Result<TransformSpec, JobError> {
    let action = match non_empty(action) {
        None => Action::Compress,
        Some(name) => Action::from_name(name)
            .ok_or_else(|| JobError::Validation(format!("Unsupported action: {}", name)))?,
    };

    Ok(match action {
        Action::Compress => TransformSpec::Compress,
        Action::Convert => TransformSpec::Convert,
        Action::Trim => {
            let start = time_param("start", params.start.as_deref(), DEFAULT_TRIM_START)?;
            let duration =
                time_param("duration", params.duration.as_deref(), DEFAULT_TRIM_DURATION)?;
            if duration.is_zero() {
                return Err(JobError::Validation(
                    "Trim duration must be greater than zero".to_string(),
                ));
            }
            TransformSpec::Trim { start, duration }
        }
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn time_param(name: &str, value: Option<&str>, default: Duration) -> Result<Duration, JobError> {
    match non_empty(value) {
        None => Ok(default),
        Some(raw) => parse_time(raw)
            .ok_or_else(|| JobError::Validation(format!("Invalid {} value: {}", name, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(start: Option<&str>, duration: Option<&str>) -> TransformParams {
        TransformParams {
            start: start.map(String::from),
            duration: duration.map(String::from),
        }
    }

    #[test]
    fn missing_action_defaults_to_compress() {
        let none = TransformParams::default();
        assert_eq!(resolve(None, &none).unwrap(), TransformSpec::Compress);
        assert_eq!(resolve(Some(" "), &none).unwrap(), TransformSpec::Compress);
    }

    #[test]
    fn known_actions_resolve() {
        let none = TransformParams::default();
        assert_eq!(resolve(Some("convert"), &none).unwrap(), TransformSpec::Convert);
        assert_eq!(resolve(Some("Compress"), &none).unwrap(), TransformSpec::Compress);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = resolve(Some("explode"), &TransformParams::default()).unwrap_err();
        assert!(matches!(err, JobError::Validation(ref m) if m == "Unsupported action: explode"));
    }

    #[test]
    fn trim_defaults_when_parameters_are_omitted() {
        for p in [params(None, None), params(Some(""), Some(""))] {
            assert_eq!(
                resolve(Some("trim"), &p).unwrap(),
                TransformSpec::Trim {
                    start: Duration::ZERO,
                    duration: Duration::from_secs(10),
                }
            );
        }
    }

    #[test]
    fn trim_carries_exact_parameters() {
        let spec = resolve(Some("trim"), &params(Some("5"), Some("3"))).unwrap();
        assert_eq!(
            spec,
            TransformSpec::Trim {
                start: Duration::from_secs(5),
                duration: Duration::from_secs(3),
            }
        );

        let spec = resolve(Some("trim"), &params(Some("00:01:00.5"), None)).unwrap();
        assert_eq!(
            spec,
            TransformSpec::Trim {
                start: Duration::from_millis(60_500),
                duration: Duration::from_secs(10),
            }
        );
    }

    #[test]
    fn malformed_trim_parameters_are_rejected() {
        assert!(matches!(
            resolve(Some("trim"), &params(Some("-5"), None)),
            Err(JobError::Validation(_))
        ));
        assert!(matches!(
            resolve(Some("trim"), &params(None, Some("ten"))),
            Err(JobError::Validation(_))
        ));
        assert!(matches!(
            resolve(Some("trim"), &params(None, Some("0"))),
            Err(JobError::Validation(_))
        ));
    }

    #[test]
    fn parameters_are_ignored_for_other_actions() {
        let spec = resolve(Some("convert"), &params(Some("garbage"), Some("-1"))).unwrap();
        assert_eq!(spec, TransformSpec::Convert);
    }
}
